use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The persisted user session for one client slot
    Session(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Session(slot) => write!(f, "session:{}", slot.to_lowercase()),
        }
    }
}

/// Creates a Redis client for session persistence
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Queued change to apply in Redis
///
/// Sets and deletes share one queue so they land in the order they were
/// issued; a logout can never be overtaken by an earlier save.
#[derive(Debug)]
enum CacheOp {
    Set { key: String, value: String, ttl: u64 },
    Delete { key: String },
}

/// Redis-backed key/value store with a background writer
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    op_tx: mpsc::UnboundedSender<CacheOp>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Asks the writer to flush everything queued so far and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, op_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            op_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Applies queued operations one at a time, in order
    ///
    /// On shutdown every operation still queued is applied before exiting.
    async fn cache_writer_task(
        client: Client,
        mut op_rx: mpsc::UnboundedReceiver<CacheOp>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(op) = op_rx.recv() => {
                    if let Err(e) = Self::apply(&client, op).await {
                        tracing::error!(error = %e, "Failed to apply Redis cache operation");
                    }
                }
                Some(()) = shutdown_rx.recv() => {
                    op_rx.close();
                    let mut flushed = 0;
                    while let Some(op) = op_rx.recv().await {
                        if let Err(e) = Self::apply(&client, op).await {
                            tracing::error!(error = %e, "Failed to flush cache operation during shutdown");
                        }
                        flushed += 1;
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
                else => break,
            }
        }
    }

    async fn apply(client: &Client, op: CacheOp) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        match op {
            CacheOp::Set { key, value, ttl } => {
                let _: () = conn.set_ex(key, value, ttl).await?;
            }
            CacheOp::Delete { key } => {
                let _: () = conn.del(key).await?;
            }
        }
        Ok(())
    }

    fn enqueue(&self, op: CacheOp) {
        if let Err(e) = self.op_tx.send(op) {
            tracing::error!(error = %e, "Failed to queue cache operation");
        }
    }

    /// Retrieves and deserializes a value, `None` when the key is absent
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a write and returns immediately
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        self.enqueue(CacheOp::Set {
            key: key.to_string(),
            value: json,
            ttl,
        });
    }

    /// Queues a delete behind any writes already pending
    pub fn delete_in_background(&self, key: &CacheKey) {
        self.enqueue(CacheOp::Delete {
            key: key.to_string(),
        });
    }
}
