//! Broker subscription loop.
//!
//! Keeps a best-effort feed of the latest object count alive for the whole
//! process: authenticate, connect, subscribe, and start over with capped
//! exponential backoff whenever anything fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, Transport};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;

use super::auth::CognitoClient;
use super::error::SubscriberError;

/// Initial reconnect delay in seconds.
const BACKOFF_START_SECS: u64 = 1;

/// Upper bound on the reconnect delay in seconds.
const BACKOFF_CAP_SECS: u64 = 600;

/// MQTT keep-alive interval.
const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// TLS MQTT port on the broker endpoint.
const BROKER_PORT: u16 = 8883;

/// Double a backoff delay, capped.
fn next_backoff(secs: u64) -> u64 {
    (secs * 2).min(BACKOFF_CAP_SECS)
}

/// Number of entries in a payload's `objects` array.
///
/// Malformed payloads count as zero; the subscription keeps running.
fn object_count(payload: &[u8]) -> usize {
    match serde_json::from_slice::<serde_json::Value>(payload) {
        Ok(value) => match value.get("objects").and_then(|v| v.as_array()) {
            Some(objects) => objects.len(),
            None => {
                warn!("payload has no objects array, counting 0");
                0
            }
        },
        Err(e) => {
            warn!("failed to decode payload, counting 0: {e}");
            0
        }
    }
}

/// Spawn the worker on the runtime.
///
/// There is no stop signal; the task lives until the process exits.
pub fn spawn(config: Config, latest: Arc<AtomicUsize>) -> JoinHandle<()> {
    tokio::spawn(run(config, latest))
}

/// Run the subscription loop forever.
///
/// `latest` is overwritten on every decoded message. The backoff delay
/// grows across failures and only resets with the process.
pub async fn run(config: Config, latest: Arc<AtomicUsize>) {
    let mut identity_id: Option<String> = None;
    let mut backoff_secs = BACKOFF_START_SECS;

    loop {
        if let Err(e) = session(&config, &mut identity_id, &latest).await {
            warn!("subscription dropped: {e}");
        }
        info!(delay_secs = backoff_secs, "reconnecting after backoff");
        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
        backoff_secs = next_backoff(backoff_secs);
    }
}

/// One full authenticate-connect-subscribe-listen cycle.
///
/// Only ever returns with an error; a healthy session listens forever.
async fn session(
    config: &Config,
    identity_id: &mut Option<String>,
    latest: &AtomicUsize,
) -> Result<(), SubscriberError> {
    let cognito = CognitoClient::new(config)?;
    let id_token = cognito.fetch_id_token(&config.refresh_token).await?;

    // The identity is resolved at most once per process; reconnects reuse
    // it and only refresh the token.
    if identity_id.is_none() {
        *identity_id = Some(cognito.fetch_identity_id(&id_token).await?);
    }
    let identity = identity_id.as_deref().unwrap_or_default();

    let mut options = MqttOptions::new(&config.client_id, &config.endpoint, BROKER_PORT);
    options.set_transport(Transport::tls_with_default_config());
    options.set_keep_alive(KEEP_ALIVE);
    options.set_clean_session(false);
    options.set_credentials(identity, &id_token);

    let (client, mut eventloop) = AsyncClient::new(options, 10);
    client
        .subscribe(&config.message_topic, QoS::AtMostOnce)
        .await?;
    info!(topic = %config.message_topic, "subscribing");

    loop {
        match eventloop.poll().await? {
            Event::Incoming(Packet::ConnAck(ack)) => {
                info!(session_present = ack.session_present, "connected to broker");
            }
            Event::Incoming(Packet::Publish(publish)) => {
                let count = object_count(&publish.payload);
                latest.store(count, Ordering::Relaxed);
            }
            _ => {}
        }
    }
}
