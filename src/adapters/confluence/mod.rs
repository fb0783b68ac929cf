//! The Confluence producer and downloader: the one shipped platform
//! integration for the `downloader == "confluence"` tag.

pub mod downloader;
pub mod producer;
pub mod wire;

pub use downloader::ConfluenceDownloader;
pub use producer::ConfluenceProducer;
