//! Conversation groups and the in-memory store
//!
//! Groups hold their participants and message log directly; nothing is
//! persisted, so every run starts empty apart from what the caller seeds.

use chrono::Local;
use tracing::{debug, info};
use uuid::Uuid;

use crate::agents::AgentProfile;
use crate::types::{ChatMessage, Participant, UserProfile};

/// A named conversation between the user and one or more agents
#[derive(Debug, Clone)]
pub struct ChatGroup {
    pub id: String,
    pub name: String,
    pub participants: Vec<Participant>,
    pub messages: Vec<ChatMessage>,
    pub is_auto_created: bool,
    /// Union of the selected agents' tags, recorded at auto-creation
    pub meta_prompt_tags: Vec<String>,
}

impl ChatGroup {
    pub fn new(name: impl Into<String>, user: &UserProfile, agents: Vec<AgentProfile>) -> Self {
        let mut participants = vec![Participant::Human(user.clone())];
        participants.extend(agents.into_iter().map(Participant::Agent));
        Self {
            id: format!("group-{}", Uuid::new_v4()),
            name: name.into(),
            participants,
            messages: Vec::new(),
            is_auto_created: false,
            meta_prompt_tags: Vec::new(),
        }
    }

    /// Agent participants, in join order
    pub fn agents(&self) -> Vec<&AgentProfile> {
        self.participants
            .iter()
            .filter_map(Participant::as_agent)
            .collect()
    }

    pub fn has_agent(&self, agent_id: &str) -> bool {
        self.agents().iter().any(|a| a.id == agent_id)
    }

    /// The most recent message sent by the human user
    pub fn latest_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| !m.is_agent)
    }
}

/// What `toggle_agent` did to the group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentToggle {
    Added,
    Removed,
}

/// In-memory store of every conversation group plus the active selection
pub struct ConversationStore {
    user: UserProfile,
    groups: Vec<ChatGroup>,
    active_group_id: Option<String>,
}

impl ConversationStore {
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            groups: Vec::new(),
            active_group_id: None,
        }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Create a named group and make it active. Returns the group id.
    pub fn create_group(&mut self, name: &str, agents: Vec<AgentProfile>) -> String {
        let group = ChatGroup::new(name, &self.user, agents);
        let id = group.id.clone();
        info!("Created group '{}' ({})", group.name, id);
        self.groups.push(group);
        self.active_group_id = Some(id.clone());
        id
    }

    /// Create an auto-named group for the given agents and make it active.
    /// The name carries the local creation time; the agents' tags are
    /// recorded on the group. Returns the group id.
    pub fn auto_create_group(&mut self, agents: Vec<AgentProfile>) -> String {
        let name = format!("AI助手群 {}", Local::now().format("%-m月%-d日 %H:%M"));
        let meta_prompt_tags: Vec<String> =
            agents.iter().flat_map(|a| a.tags.iter().cloned()).collect();

        let mut group = ChatGroup::new(name, &self.user, agents);
        group.is_auto_created = true;
        group.meta_prompt_tags = meta_prompt_tags;

        let id = group.id.clone();
        info!(
            "Auto-created group '{}' ({}) with {} agents",
            group.name,
            id,
            group.agents().len()
        );
        self.groups.push(group);
        self.active_group_id = Some(id.clone());
        id
    }

    pub fn group(&self, id: &str) -> Option<&ChatGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut ChatGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn groups(&self) -> &[ChatGroup] {
        &self.groups
    }

    pub fn active_group(&self) -> Option<&ChatGroup> {
        self.active_group_id.as_deref().and_then(|id| self.group(id))
    }

    /// Switch the active group. Returns false if the id is unknown.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.group(id).is_some() {
            self.active_group_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Clear the active selection so the next message starts a new group
    pub fn clear_active(&mut self) {
        self.active_group_id = None;
    }

    /// Append a message to a group. Returns false if the group is gone
    /// (the message is dropped, which is the defined outcome for replies
    /// landing after their conversation disappeared).
    pub fn append_message(&mut self, group_id: &str, message: ChatMessage) -> bool {
        match self.group_mut(group_id) {
            Some(group) => {
                group.messages.push(message);
                true
            }
            None => {
                debug!("Dropping message for unknown group {}", group_id);
                false
            }
        }
    }

    /// Add the agent to the group, or remove it if already present.
    /// Returns None if the group is unknown.
    pub fn toggle_agent(&mut self, group_id: &str, agent: AgentProfile) -> Option<AgentToggle> {
        let group = self.group_mut(group_id)?;
        if group.has_agent(&agent.id) {
            group
                .participants
                .retain(|p| p.as_agent().is_none_or(|a| a.id != agent.id));
            debug!("Removed agent '{}' from group {}", agent.id, group_id);
            Some(AgentToggle::Removed)
        } else {
            debug!("Added agent '{}' to group {}", agent.id, group_id);
            group.participants.push(Participant::Agent(agent));
            Some(AgentToggle::Added)
        }
    }

    /// Remove an agent from every group (after an uninstall or delete)
    pub fn remove_agent_everywhere(&mut self, agent_id: &str) {
        for group in &mut self.groups {
            group
                .participants
                .retain(|p| p.as_agent().is_none_or(|a| a.id != agent_id));
        }
    }
}
