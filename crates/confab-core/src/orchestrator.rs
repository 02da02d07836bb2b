//! Conversation orchestration
//!
//! Wires the pure engine (selection + synthesis) to conversation state and
//! the reply runner. A user message either lands in the active group or
//! auto-creates one; every agent participant then gets one staggered,
//! individually cancellable reply. Replies whose group disappeared before
//! delivery are dropped by the sink.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

use confab_scheduler::{ReplyRunner, ReplySink, ScheduledReply};

use crate::agent_selector::select_agents;
use crate::agents::{AgentCatalog, AgentProfile};
use crate::conversation::{AgentToggle, ConversationStore};
use crate::responder::synthesize_response;
use crate::types::ChatMessage;

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on agents joining an auto-created group
    pub max_agents: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_agents: crate::agent_selector::DEFAULT_MAX_AGENTS,
        }
    }
}

/// What handling one user message did
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub group_id: String,
    pub created_group: bool,
    pub scheduled_replies: usize,
}

/// Delivery sink that appends replies to their group and optionally echoes
/// them to a front-end channel.
pub struct GroupAppendSink {
    store: Arc<RwLock<ConversationStore>>,
    echo_tx: Option<mpsc::UnboundedSender<ChatMessage>>,
}

impl GroupAppendSink {
    pub fn new(store: Arc<RwLock<ConversationStore>>) -> Self {
        Self {
            store,
            echo_tx: None,
        }
    }

    /// Also forward every delivered message to `echo_tx` (for display)
    pub fn with_echo(
        store: Arc<RwLock<ConversationStore>>,
        echo_tx: mpsc::UnboundedSender<ChatMessage>,
    ) -> Self {
        Self {
            store,
            echo_tx: Some(echo_tx),
        }
    }
}

#[async_trait]
impl ReplySink for GroupAppendSink {
    async fn deliver(&self, reply: ScheduledReply) {
        let message = ChatMessage::new(
            reply.content,
            reply.sender_id,
            reply.sender_name,
            reply.sender_avatar,
            true,
        );
        let appended = self
            .store
            .write()
            .await
            .append_message(&reply.group_id, message.clone());
        if appended {
            if let Some(tx) = &self.echo_tx {
                let _ = tx.send(message);
            }
        }
    }
}

/// Drives conversations: group lifecycle, message flow, reply scheduling
pub struct ChatOrchestrator {
    store: Arc<RwLock<ConversationStore>>,
    catalog: Arc<RwLock<AgentCatalog>>,
    runner: ReplyRunner,
    config: OrchestratorConfig,
}

impl ChatOrchestrator {
    pub fn new(
        store: Arc<RwLock<ConversationStore>>,
        catalog: Arc<RwLock<AgentCatalog>>,
        runner: ReplyRunner,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            runner,
            config,
        }
    }

    pub fn runner(&self) -> &ReplyRunner {
        &self.runner
    }

    /// Handle one user message.
    ///
    /// With no active group, or an active group that has no messages yet,
    /// a group is auto-created: agents are selected once for it, from the
    /// installed snapshot against this first message. One reply per agent
    /// participant is then synthesized and scheduled with increasing
    /// offsets.
    pub async fn send_message(&self, content: &str) -> Result<SendOutcome> {
        let installed = self.catalog.read().await.installed();

        let mut store = self.store.write().await;
        let active = store
            .active_group()
            .filter(|group| !group.messages.is_empty())
            .map(|group| group.id.clone());
        let (group_id, created_group) = match active {
            Some(id) => (id, false),
            None => {
                let selected = select_agents(content, &installed, self.config.max_agents);
                debug!("Auto-creating group with {} agents", selected.len());
                (store.auto_create_group(selected), true)
            }
        };

        let user_message = ChatMessage::from_user(store.user(), content);
        store.append_message(&group_id, user_message);

        let agents: Vec<AgentProfile> = store
            .group(&group_id)
            .map(|g| g.agents().into_iter().cloned().collect())
            .unwrap_or_default();
        drop(store);

        let replies: Vec<ScheduledReply> = agents
            .iter()
            .map(|agent| ScheduledReply {
                reply_id: format!("reply-{}", Uuid::new_v4()),
                group_id: group_id.clone(),
                sender_id: agent.id.clone(),
                sender_name: agent.name.clone(),
                sender_avatar: agent.avatar.clone(),
                content: synthesize_response(content, agent),
            })
            .collect();

        let scheduled_replies = self.runner.schedule_staggered(replies).await?;
        info!(
            "Message routed to group {} ({} replies scheduled)",
            group_id, scheduled_replies
        );

        Ok(SendOutcome {
            group_id,
            created_group,
            scheduled_replies,
        })
    }

    /// Add the agent to the group, or remove it if already present. A
    /// newly added agent answers the most recent user message after the
    /// initial delay. Returns None for an unknown group.
    pub async fn toggle_agent(
        &self,
        group_id: &str,
        agent: AgentProfile,
    ) -> Result<Option<AgentToggle>> {
        let mut store = self.store.write().await;
        let Some(outcome) = store.toggle_agent(group_id, agent.clone()) else {
            return Ok(None);
        };

        let late_reply = if outcome == AgentToggle::Added {
            store
                .group(group_id)
                .and_then(|g| g.latest_user_message())
                .map(|last| synthesize_response(&last.content, &agent))
        } else {
            None
        };
        drop(store);

        if let Some(content) = late_reply {
            let reply = ScheduledReply {
                reply_id: format!("reply-{}", Uuid::new_v4()),
                group_id: group_id.to_string(),
                sender_id: agent.id.clone(),
                sender_name: agent.name.clone(),
                sender_avatar: agent.avatar.clone(),
                content,
            };
            self.runner
                .schedule(reply, self.runner.config().initial_delay)
                .await?;
        }

        Ok(Some(outcome))
    }

    /// Cancel all pending replies and refuse new ones
    pub async fn shutdown(&self) {
        self.runner.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::builtin_profiles;
    use crate::types::UserProfile;
    use confab_scheduler::ReplyConfig;
    use std::time::Duration;
    use tokio::time::sleep;

    fn fast_config() -> ReplyConfig {
        ReplyConfig {
            initial_delay: Duration::from_millis(10),
            stagger: Duration::from_millis(10),
            max_pending: 64,
        }
    }

    fn make_orchestrator() -> (
        ChatOrchestrator,
        Arc<RwLock<ConversationStore>>,
        mpsc::UnboundedReceiver<ChatMessage>,
    ) {
        let user = UserProfile::new("user-1", "当前用户", "User");
        let store = Arc::new(RwLock::new(ConversationStore::new(user)));
        let catalog = Arc::new(RwLock::new(AgentCatalog::with_profiles(builtin_profiles())));
        let (echo_tx, echo_rx) = mpsc::unbounded_channel();
        let sink = Arc::new(GroupAppendSink::with_echo(store.clone(), echo_tx));
        let runner = ReplyRunner::with_config(sink, fast_config());
        let orchestrator =
            ChatOrchestrator::new(store.clone(), catalog, runner, OrchestratorConfig::default());
        (orchestrator, store, echo_rx)
    }

    #[tokio::test]
    async fn test_first_message_auto_creates_group() {
        let (orchestrator, store, _echo_rx) = make_orchestrator();

        let outcome = orchestrator.send_message("如何提高工作效率").await.unwrap();
        assert!(outcome.created_group);
        assert!(outcome.scheduled_replies <= 3);
        assert!(outcome.scheduled_replies > 0);

        let store = store.read().await;
        let group = store.group(&outcome.group_id).unwrap();
        assert!(group.is_auto_created);
        assert_eq!(group.messages.len(), 1);
        assert!(!group.messages[0].is_agent);
    }

    #[tokio::test]
    async fn test_replies_arrive_in_group() {
        let (orchestrator, store, _echo_rx) = make_orchestrator();

        let outcome = orchestrator.send_message("效率 优化").await.unwrap();
        sleep(Duration::from_millis(150)).await;

        let store = store.read().await;
        let group = store.group(&outcome.group_id).unwrap();
        let agent_replies = group.messages.iter().filter(|m| m.is_agent).count();
        assert_eq!(agent_replies, outcome.scheduled_replies);
        assert_eq!(orchestrator.runner().pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_second_message_reuses_group() {
        let (orchestrator, _store, _echo_rx) = make_orchestrator();

        let first = orchestrator.send_message("效率 问题").await.unwrap();
        sleep(Duration::from_millis(120)).await;
        let second = orchestrator.send_message("继续刚才的话题").await.unwrap();

        assert!(!second.created_group);
        assert_eq!(first.group_id, second.group_id);
    }

    #[tokio::test]
    async fn test_replies_echoed_in_offset_order() {
        let (orchestrator, _store, mut echo_rx) = make_orchestrator();

        let outcome = orchestrator.send_message("效率 优化 流程").await.unwrap();
        sleep(Duration::from_millis(200)).await;

        let mut echoed = Vec::new();
        while let Ok(msg) = echo_rx.try_recv() {
            echoed.push(msg);
        }
        assert_eq!(echoed.len(), outcome.scheduled_replies);
        assert!(echoed.iter().all(|m| m.is_agent));
    }

    #[tokio::test]
    async fn test_shutdown_drops_pending_replies() {
        let (orchestrator, store, _echo_rx) = make_orchestrator();

        let outcome = orchestrator.send_message("效率 问题").await.unwrap();
        orchestrator.shutdown().await;
        sleep(Duration::from_millis(120)).await;

        let store = store.read().await;
        let group = store.group(&outcome.group_id).unwrap();
        assert_eq!(group.messages.iter().filter(|m| m.is_agent).count(), 0);
    }

    #[tokio::test]
    async fn test_added_agent_answers_latest_user_message() {
        let (orchestrator, store, _echo_rx) = make_orchestrator();

        let outcome = orchestrator.send_message("效率 问题").await.unwrap();
        sleep(Duration::from_millis(150)).await;

        let mut joiner = AgentProfile::new("market-agent-4", "学习辅导员");
        joiner.is_installed = true;
        let toggled = orchestrator
            .toggle_agent(&outcome.group_id, joiner)
            .await
            .unwrap();
        assert_eq!(toggled, Some(AgentToggle::Added));

        sleep(Duration::from_millis(80)).await;
        let store = store.read().await;
        let group = store.group(&outcome.group_id).unwrap();
        assert!(group.has_agent("market-agent-4"));
        assert!(
            group
                .messages
                .iter()
                .any(|m| m.sender_id == "market-agent-4")
        );
    }

    #[tokio::test]
    async fn test_toggle_out_removes_without_reply() {
        let (orchestrator, store, _echo_rx) = make_orchestrator();

        let outcome = orchestrator.send_message("效率 问题").await.unwrap();
        sleep(Duration::from_millis(150)).await;

        let present = {
            let store = store.read().await;
            store.group(&outcome.group_id).unwrap().agents()[0].clone()
        };
        let before = orchestrator.runner().pending_count().await;

        let toggled = orchestrator
            .toggle_agent(&outcome.group_id, present.clone())
            .await
            .unwrap();
        assert_eq!(toggled, Some(AgentToggle::Removed));
        assert_eq!(orchestrator.runner().pending_count().await, before);

        let store = store.read().await;
        assert!(!store.group(&outcome.group_id).unwrap().has_agent(&present.id));
    }

    #[tokio::test]
    async fn test_toggle_unknown_group() {
        let (orchestrator, _store, _echo_rx) = make_orchestrator();
        let agent = AgentProfile::new("agent-1", "Direct Solver");
        let toggled = orchestrator.toggle_agent("group-missing", agent).await.unwrap();
        assert!(toggled.is_none());
    }
}
