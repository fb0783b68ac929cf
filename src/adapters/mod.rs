//! Concrete implementations of the domain ports: the Confluence producer and
//! downloader, the Kafka queue, and the mutator chain.

pub mod confluence;
pub mod mutators;
pub mod queue;
