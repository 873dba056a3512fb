use crate::communication::dispatcher::CentralDispatcher;
use crate::communication::messages::{PreemptionMessage, PreemptionNotice};
use crate::event_log::{
    log_preemption_clear, log_preemption_event, PreemptionClearRecord, PreemptionEventRecord,
};
use crate::global_variables::{AMQP_URL, QUEUE_EMERGENCY_EVENTS, QUEUE_SIGNAL_STATUS};
use crate::shared_data::current_timestamp;
use amiquip::{
    Connection, ConsumerMessage, ConsumerOptions, Exchange, Publish, QueueDeclareOptions,
    Result as AmiquipResult,
};
use std::sync::Arc;
use tokio::task;

/// Consumes emergency events from RabbitMQ and relays them through the
/// dispatcher. Each handled command is answered with a [`PreemptionNotice`]
/// on the status queue and appended to the CSV audit log. Malformed payloads
/// are logged and acked; they never stop the feed.
pub async fn start_preemption_feed(dispatcher: Arc<CentralDispatcher>) -> AmiquipResult<()> {
    task::spawn_blocking(move || -> AmiquipResult<()> {
        let mut connection = Connection::insecure_open(AMQP_URL)?;
        let channel = connection.open_channel(None)?;
        let exchange = Exchange::direct(&channel);
        let event_queue =
            channel.queue_declare(QUEUE_EMERGENCY_EVENTS, QueueDeclareOptions::default())?;
        let consumer = event_queue.consume(ConsumerOptions::default())?;
        println!(
            "[PreemptionFeed] Waiting for emergency events on '{}'...",
            QUEUE_EMERGENCY_EVENTS
        );

        channel.queue_declare(QUEUE_SIGNAL_STATUS, QueueDeclareOptions::default())?;

        for message in consumer.receiver() {
            match message {
                ConsumerMessage::Delivery(delivery) => {
                    let ts = current_timestamp();
                    if let Ok(json_str) = std::str::from_utf8(&delivery.body) {
                        match serde_json::from_str::<PreemptionMessage>(json_str) {
                            Ok(msg) => {
                                let notice = handle_message(&dispatcher, msg, ts);
                                if let Ok(notice_json) = serde_json::to_string(&notice) {
                                    exchange.publish(Publish::new(
                                        notice_json.as_bytes(),
                                        QUEUE_SIGNAL_STATUS,
                                    ))?;
                                }
                            }
                            Err(e) => {
                                log::warn!("[PreemptionFeed] Unparseable payload: {}", e);
                            }
                        }
                    }
                    consumer.ack(delivery)?;
                }
                other => {
                    println!("[PreemptionFeed] Consumer ended: {:?}", other);
                    break;
                }
            }
        }
        connection.close()
    })
    .await
    .unwrap()
}

fn handle_message(
    dispatcher: &CentralDispatcher,
    msg: PreemptionMessage,
    timestamp: u64,
) -> PreemptionNotice {
    let controller_id = dispatcher.controller().controller_id.clone();
    match msg {
        PreemptionMessage::EmergencyApproach {
            vehicle_id,
            location,
            route,
            emergency_state,
        } => {
            let outcome = dispatcher.send_emergency_vehicle_data(
                &vehicle_id,
                location,
                &route,
                emergency_state.as_ref(),
            );
            log_preemption_event(PreemptionEventRecord {
                timestamp,
                controller_id: controller_id.clone(),
                vehicle_id,
                signal_id: outcome.signal_id().map(str::to_string),
                outcome: outcome.to_string(),
            });
            PreemptionNotice {
                timestamp,
                controller_id,
                signal_id: outcome.signal_id().map(str::to_string),
                outcome: outcome.to_string(),
                emergency_active: dispatcher.controller().emergency_active(),
            }
        }
        PreemptionMessage::EmergencyClear { signal_id } => {
            let outcome = dispatcher.trigger_end_emergency_preemption(signal_id.as_deref());
            log_preemption_clear(PreemptionClearRecord {
                timestamp,
                controller_id: controller_id.clone(),
                signal_id: signal_id.clone(),
                outcome: outcome.to_string(),
            });
            PreemptionNotice {
                timestamp,
                controller_id,
                signal_id,
                outcome: outcome.to_string(),
                emergency_active: dispatcher.controller().emergency_active(),
            }
        }
    }
}
