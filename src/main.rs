use batch_receive::{
    batch::{BatchReceiver, Messages},
    config::{Config, DemoConfig},
    pool::IncomingQueue,
    MessageId, ReceivedMessage,
};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::info;

/// The main entry point for the batch receive demo.
///
/// Initializes logging, loads the configuration, starts a producer feeding
/// the incoming queue in the background, then receives the configured number
/// of batches into a single reused container.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load("config/default.toml")?;
    info!("Batch receive starting with config: {:?}", config);

    let queue = Arc::new(IncomingQueue::new());

    // Producer stands in for the broker connection
    let producer = tokio::spawn(produce(queue.clone(), config.demo.clone()));
    info!("Producer started");

    let receiver = BatchReceiver::new(queue, config.batch_receive)?;
    let mut batch = Messages::from_policy(receiver.policy());

    for n in 1..=config.demo.batches {
        let received = receiver.batch_receive_into(&mut batch).await;
        let first = batch.iter().next().map(|m| m.id.to_string());
        let last = batch.iter().last().map(|m| m.id.to_string());
        info!(
            "Batch #{} received {} messages ({} bytes), ids {:?}..{:?}",
            n,
            received,
            batch.total_bytes(),
            first,
            last
        );
    }

    producer.abort();
    Ok(())
}

/// Push generated messages into the queue at the configured pace
async fn produce(queue: Arc<IncomingQueue<ReceivedMessage>>, demo: DemoConfig) {
    let interval = Duration::from_millis(demo.publish_interval_ms);
    let max_payload = demo.max_payload_bytes.max(1);
    let mut entry_id = 0u64;

    loop {
        // Spread payload sizes so both limits come into play
        let size = (entry_id as usize * 37) % max_payload + 1;
        let message = ReceivedMessage::new(MessageId::new(1, entry_id), demo.topic.as_str(), vec![0u8; size])
            .with_property("producer", "demo");
        queue.push(message).await;

        entry_id += 1;
        sleep(interval).await;
    }
}
