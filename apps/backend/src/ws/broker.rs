//! Redis pub/sub fan-out so several backend processes can share rooms.
//!
//! Every process publishes session events to Redis and delivers whatever its
//! subscriber receives into its local [`WsRegistry`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::random;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{PlayerId, RoomId, SessionView};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::protocol::{PrivateEvent, RoomEvent};
use crate::services::propagation::EventPublisher;
use crate::ws::hub::WsRegistry;

const ROOM_CHANNEL_PREFIX: &str = "room";
const PLAYER_CHANNEL_PREFIX: &str = "player";
const MIRROR_KEY_PREFIX: &str = "tienlen:session";
const MIRROR_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EventEnvelope {
    Room { event: RoomEvent },
    Private { player_id: PlayerId, event: PrivateEvent },
}

/// Why a Redis operation failed, and whether trying again could help.
#[derive(Debug)]
struct BrokerError {
    detail: String,
    transient: bool,
}

impl BrokerError {
    fn redis(detail: impl Into<String>, err: &RedisError) -> Self {
        Self {
            detail: format!("{}: {err}", detail.into()),
            transient: is_transient_error(err),
        }
    }

    fn into_app(self) -> AppError {
        AppError::internal(ErrorCode::InternalError, self.detail)
    }
}

pub struct RealtimeBroker {
    registry: Arc<WsRegistry>,
    publisher: Mutex<ConnectionManager>,
}

impl RealtimeBroker {
    pub async fn connect(redis_url: &str, registry: Arc<WsRegistry>) -> Result<Arc<Self>, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;

        let manager = ConnectionManager::new(client.clone())
            .await
            .map_err(|err| {
                AppError::internal(
                    ErrorCode::ConfigError,
                    format!("Unable to initialize Redis connection manager: {err}"),
                )
            })?;

        let broker = Arc::new(Self {
            registry: registry.clone(),
            publisher: Mutex::new(manager),
        });

        spawn_subscriber(client, registry);

        Ok(broker)
    }

    pub fn registry(&self) -> Arc<WsRegistry> {
        self.registry.clone()
    }

    async fn publish_to_channel(
        &self,
        channel: String,
        envelope: EventEnvelope,
    ) -> Result<(), AppError> {
        let encoded = serde_json::to_string(&envelope).map_err(|err| {
            AppError::internal(
                ErrorCode::InternalError,
                format!("Failed to serialize realtime envelope: {err}"),
            )
        })?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let publish_res = {
                let mut publisher = self.publisher.lock().await;
                publisher
                    .publish::<_, _, ()>(channel.clone(), encoded.clone())
                    .await
            };

            match publish_res {
                Ok(()) => return Ok(()),
                Err(err) => {
                    let broker_err =
                        BrokerError::redis("Failed to publish realtime event to Redis", &err);

                    if attempt >= PUBLISHER_MAX_ATTEMPTS || !broker_err.transient {
                        return Err(broker_err.into_app());
                    }

                    let delay_ms = PUBLISHER_INITIAL_RETRY_DELAY_MS
                        .saturating_mul(2_u64.pow(attempt - 1))
                        .min(PUBLISHER_MAX_RETRY_DELAY_MS);
                    warn!(
                        error = %broker_err.detail,
                        attempt,
                        retry_delay_ms = delay_ms,
                        "Redis publish failed, retrying"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl EventPublisher for RealtimeBroker {
    async fn publish_room(&self, room_id: RoomId, event: RoomEvent) -> Result<(), AppError> {
        self.publish_to_channel(room_channel(room_id), EventEnvelope::Room { event })
            .await
    }

    async fn publish_private(
        &self,
        player_id: PlayerId,
        event: PrivateEvent,
    ) -> Result<(), AppError> {
        self.publish_to_channel(
            player_channel(player_id),
            EventEnvelope::Private { player_id, event },
        )
        .await
    }

    async fn mirror(&self, room_id: RoomId, view: Option<&SessionView>) -> Result<(), AppError> {
        let key = format!("{MIRROR_KEY_PREFIX}:{room_id}");
        let mut conn = self.publisher.lock().await;
        let res = match view {
            Some(view) => {
                let encoded = serde_json::to_string(view)?;
                conn.set_ex::<_, _, ()>(&key, encoded, MIRROR_TTL_SECS).await
            }
            None => conn.del::<_, ()>(&key).await,
        };
        res.map_err(|err| BrokerError::redis("Failed to update session mirror", &err).into_app())
    }
}

// Subscriber retry configuration (background task)
const INITIAL_RETRY_DELAY_SECS: u64 = 1;
const MAX_RETRY_DELAY_SECS: u64 = 60;
const RETRY_DELAY_MULTIPLIER: f64 = 2.0;
const JITTER_PERCENT: f64 = 0.2;

// Publisher retry configuration (request path)
const PUBLISHER_MAX_ATTEMPTS: u32 = 3;
const PUBLISHER_INITIAL_RETRY_DELAY_MS: u64 = 50;
const PUBLISHER_MAX_RETRY_DELAY_MS: u64 = 200;

fn spawn_subscriber(client: Client, registry: Arc<WsRegistry>) {
    tokio::spawn(async move {
        run_subscription_loop_with_retry(client, registry).await;
    });
}

fn is_transient_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped()
}

fn calculate_retry_delay(attempt: u32) -> Duration {
    let base_delay =
        INITIAL_RETRY_DELAY_SECS as f64 * RETRY_DELAY_MULTIPLIER.powi(attempt as i32 - 1);
    let capped_delay = base_delay.min(MAX_RETRY_DELAY_SECS as f64);

    let jitter_range = capped_delay * JITTER_PERCENT;
    let jitter = (random::<f64>() * 2.0 - 1.0) * jitter_range;
    let final_delay = (capped_delay + jitter).max(0.1);

    Duration::from_secs_f64(final_delay)
}

async fn run_subscription_loop_with_retry(client: Client, registry: Arc<WsRegistry>) {
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match run_subscription_loop(&client, &registry).await {
            Ok(()) => {
                info!("Redis subscription loop completed normally");
                break;
            }
            Err(err) => {
                if !err.transient {
                    error!(
                        error = %err.detail,
                        attempt,
                        "Redis subscription failed with permanent error, exiting"
                    );
                    break;
                }

                let delay = calculate_retry_delay(attempt);
                warn!(
                    error = %err.detail,
                    attempt,
                    retry_delay_secs = delay.as_secs_f64(),
                    "Redis subscription failed, retrying"
                );
                sleep(delay).await;

                if attempt >= 20 {
                    attempt = 10;
                }
            }
        }
    }
}

async fn run_subscription_loop(client: &Client, registry: &WsRegistry) -> Result<(), BrokerError> {
    let mut pubsub = client
        .get_async_pubsub()
        .await
        .map_err(|err| BrokerError::redis("Failed to open Redis pubsub connection", &err))?;

    info!("Subscribing to Redis patterns 'room:*' and 'player:*'");
    for pattern in [
        format!("{ROOM_CHANNEL_PREFIX}:*"),
        format!("{PLAYER_CHANNEL_PREFIX}:*"),
    ] {
        pubsub
            .psubscribe(&pattern)
            .await
            .map_err(|err| BrokerError::redis(format!("Failed to subscribe to {pattern}"), &err))?;
    }

    info!("Redis subscription established, processing messages");

    let mut stream = pubsub.into_on_message();

    while let Some(msg) = stream.next().await {
        let started = Instant::now();
        let Ok(channel) = msg.get_channel::<String>() else {
            continue;
        };
        let Ok(payload) = msg.get_payload::<String>() else {
            continue;
        };

        match serde_json::from_str::<EventEnvelope>(&payload) {
            Ok(EventEnvelope::Room { event }) => {
                if parse_room_channel(&channel) != Some(event.room_id()) {
                    warn!(
                        channel = %channel,
                        room_id = %event.room_id(),
                        "Room event received on mismatched channel"
                    );
                    continue;
                }
                registry.broadcast_room(event.room_id(), event);
            }
            Ok(EventEnvelope::Private { player_id, event }) => {
                if parse_player_channel(&channel) != Some(player_id) {
                    warn!(
                        channel = %channel,
                        %player_id,
                        "Private event received on mismatched channel"
                    );
                    continue;
                }
                registry.send_to_player(player_id, event);
            }
            Err(err) => {
                error!(
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis(),
                    channel = %channel,
                    "Failed to decode Redis realtime payload"
                );
            }
        }
    }

    warn!("Redis subscription stream ended, connection lost");
    Err(BrokerError {
        detail: "Redis subscription stream ended unexpectedly".to_string(),
        transient: true,
    })
}

fn room_channel(room_id: RoomId) -> String {
    format!("{ROOM_CHANNEL_PREFIX}:{room_id}")
}

fn player_channel(player_id: PlayerId) -> String {
    format!("{PLAYER_CHANNEL_PREFIX}:{player_id}")
}

fn parse_channel(channel: &str, expected_prefix: &str) -> Option<Uuid> {
    let (prefix, id) = channel.split_once(':')?;
    if prefix != expected_prefix {
        return None;
    }
    id.parse().ok()
}

fn parse_room_channel(channel: &str) -> Option<RoomId> {
    parse_channel(channel, ROOM_CHANNEL_PREFIX)
}

fn parse_player_channel(channel: &str) -> Option<PlayerId> {
    parse_channel(channel, PLAYER_CHANNEL_PREFIX)
}
