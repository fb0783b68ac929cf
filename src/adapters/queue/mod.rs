//! Kafka-backed submitter and consumer: the durable, partitioned,
//! ordered-per-partition log decoupling the scraper from the worker.

use async_trait::async_trait;
use futures::stream::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer as RdConsumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::domain::config::KafkaConfig;
use crate::domain::models::{Task, TaskResult};
use crate::domain::ports::{Consumer, QueueSubmitter, TaskStream};
use crate::error::QueueError;

/// Submits Task instances to a Kafka topic, keyed by `idempotency_key`.
pub struct KafkaQueueSubmitter {
    config: KafkaConfig,
    producer: Option<FutureProducer>,
}

impl KafkaQueueSubmitter {
    pub fn new(config: KafkaConfig) -> Self {
        Self {
            config,
            producer: None,
        }
    }
}

#[async_trait]
impl QueueSubmitter for KafkaQueueSubmitter {
    async fn open(&mut self) -> Result<(), QueueError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &self.config.bootstrap_servers)
            .set("client.id", &self.config.client_id)
            .set("enable.idempotence", "true")
            .create()?;
        self.producer = Some(producer);
        Ok(())
    }

    async fn submit(&self, task: &Task) -> Result<(), QueueError> {
        let producer = self.producer.as_ref().ok_or(QueueError::NotOpened)?;
        let payload = serde_json::to_vec(task)?;
        let record = FutureRecord::to(&self.config.topic)
            .key(&task.idempotency_key)
            .payload(&payload);
        producer
            .send(record, Timeout::Never)
            .await
            .map_err(|(err, _)| QueueError::DeliveryFailed(err.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), QueueError> {
        if let Some(producer) = self.producer.take() {
            producer.flush(Timeout::Never)?;
        }
        Ok(())
    }
}

/// Consumes Task instances from a Kafka topic within a shared consumer
/// group, so `--workers=N` worker tasks divide the topic's partitions
/// between them without manual assignment.
pub struct KafkaConsumer {
    consumer: StreamConsumer,
}

impl KafkaConsumer {
    pub fn connect(config: &KafkaConfig) -> Result<Self, QueueError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("group.id", config.group_id())
            .set("bootstrap.servers", &config.bootstrap_servers)
            .set("client.id", &config.client_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()?;
        consumer.subscribe(&[config.topic.as_str()])?;
        Ok(Self { consumer })
    }
}

#[async_trait]
impl Consumer for KafkaConsumer {
    async fn stream(&self) -> Result<TaskStream<'_>, QueueError> {
        let stream = self.consumer.stream().filter_map(|message| async move {
            let message = match message {
                Ok(m) => m,
                Err(err) => {
                    tracing::warn!(error = %err, "kafka consumer error");
                    return None;
                }
            };
            let payload = match message.payload() {
                Some(p) => p,
                None => {
                    tracing::warn!("kafka message carried no payload");
                    return None;
                }
            };
            match serde_json::from_slice::<Task>(payload) {
                Ok(task) => Some(task),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to deserialize Task from queue wire format");
                    None
                }
            }
        });
        Ok(Box::pin(stream))
    }

    async fn acknowledge(&self, _result: &TaskResult) -> Result<(), QueueError> {
        // Commits the consumer's current position across all assigned
        // partitions, mirroring the upstream client's coarse
        // per-poll-loop commit rather than a per-message offset lookup.
        self.consumer.commit_consumer_state(CommitMode::Async)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_id_namespaces_by_client_id() {
        let config = KafkaConfig {
            bootstrap_servers: "localhost:19092".into(),
            topic: "tasks".into(),
            client_id: "scraper-1".into(),
        };
        assert_eq!(config.group_id(), "scraper-1-group");
    }
}
