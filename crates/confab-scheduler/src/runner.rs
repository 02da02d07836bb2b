//! Tokio task runner for deferred replies
//!
//! Each scheduled reply becomes its own tokio task that sleeps for its
//! offset and then hands the reply to the sink. A reply that is cancelled
//! (individually or via shutdown) before its offset elapses is simply never
//! delivered; there is no retry or compensation path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A synthesized reply waiting for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReply {
    pub reply_id: String,
    pub group_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_avatar: String,
    pub content: String,
}

/// Receives replies whose offset has elapsed. Implementations append the
/// reply to conversation state, surface it in a front-end, or both.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn deliver(&self, reply: ScheduledReply);
}

/// Configuration for the reply runner
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    /// Delay before the first reply of a batch fires
    pub initial_delay: Duration,

    /// Extra delay added per position within a batch
    pub stagger: Duration,

    /// Maximum number of undelivered replies held at once
    pub max_pending: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            stagger: Duration::from_millis(1500),
            max_pending: 64,
        }
    }
}

/// Manages the lifecycle of deferred reply tasks
pub struct ReplyRunner {
    config: ReplyConfig,

    /// Where elapsed replies are delivered
    sink: Arc<dyn ReplySink>,

    /// Pending reply tasks (reply_id -> CancellationToken)
    pending: Arc<RwLock<HashMap<String, CancellationToken>>>,

    /// Global shutdown token
    shutdown_token: CancellationToken,
}

impl ReplyRunner {
    /// Create a new runner with default timing
    pub fn new(sink: Arc<dyn ReplySink>) -> Self {
        Self::with_config(sink, ReplyConfig::default())
    }

    /// Create a new runner with custom timing
    pub fn with_config(sink: Arc<dyn ReplySink>, config: ReplyConfig) -> Self {
        Self {
            config,
            sink,
            pending: Arc::new(RwLock::new(HashMap::new())),
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ReplyConfig {
        &self.config
    }

    /// Schedule one reply for delivery after `delay`.
    pub async fn schedule(&self, reply: ScheduledReply, delay: Duration) -> Result<()> {
        let pending = self.pending.read().await;
        if pending.len() >= self.config.max_pending {
            anyhow::bail!("maximum pending replies reached: {}", self.config.max_pending);
        }
        if pending.contains_key(&reply.reply_id) {
            warn!("Reply {} is already pending", reply.reply_id);
            return Ok(());
        }
        drop(pending);

        debug!(
            "Scheduling reply {} from {} for group {} in {:?}",
            reply.reply_id, reply.sender_id, reply.group_id, delay
        );

        let token = CancellationToken::new();
        self.pending
            .write()
            .await
            .insert(reply.reply_id.clone(), token.clone());

        let sink = self.sink.clone();
        let pending = self.pending.clone();
        let shutdown = self.shutdown_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = sleep(delay) => {
                    pending.write().await.remove(&reply.reply_id);
                    debug!("Delivering reply {} to group {}", reply.reply_id, reply.group_id);
                    sink.deliver(reply).await;
                }
                _ = token.cancelled() => {
                    pending.write().await.remove(&reply.reply_id);
                    debug!("Reply {} cancelled before delivery", reply.reply_id);
                }
                _ = shutdown.cancelled() => {
                    pending.write().await.remove(&reply.reply_id);
                }
            }
        });

        Ok(())
    }

    /// Schedule a batch of replies with increasing offsets so they arrive
    /// one at a time: `initial_delay + index * stagger`.
    pub async fn schedule_staggered(&self, replies: Vec<ScheduledReply>) -> Result<usize> {
        let mut scheduled = 0;
        for (index, reply) in replies.into_iter().enumerate() {
            let delay = self.config.initial_delay + self.config.stagger * index as u32;
            self.schedule(reply, delay).await?;
            scheduled += 1;
        }
        Ok(scheduled)
    }

    /// Cancel a pending reply. Returns false if it was not pending (already
    /// delivered, already cancelled, or never scheduled).
    pub async fn cancel(&self, reply_id: &str) -> bool {
        let mut pending = self.pending.write().await;
        if let Some(token) = pending.remove(reply_id) {
            debug!("Cancelling reply {}", reply_id);
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Cancel every pending reply. The runner stays usable.
    pub async fn cancel_all(&self) {
        let mut pending = self.pending.write().await;
        for (reply_id, token) in pending.drain() {
            debug!("Cancelling reply: {}", reply_id);
            token.cancel();
        }
    }

    /// Tear the runner down: cancel everything pending and refuse delivery
    /// of anything scheduled afterwards.
    pub async fn shutdown(&self) {
        info!("Shutting down reply runner");
        self.shutdown_token.cancel();
        self.cancel_all().await;
    }

    /// Number of replies scheduled but not yet delivered
    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }

    /// Whether a reply is still waiting for its offset to elapse
    pub async fn is_pending(&self, reply_id: &str) -> bool {
        self.pending.read().await.contains_key(reply_id)
    }
}
