//! Agent catalog — install/uninstall bookkeeping over the persona list
//!
//! The catalog is an order-preserving list: the selector breaks score ties
//! by catalog position, so insertion order is part of the contract. All
//! state is in-memory and lost on exit.

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::builtin::builtin_profiles;
use super::profile::{AgentDraft, AgentProfile};

/// Prefix identifying user-created agents; only these may be removed.
const CUSTOM_ID_PREFIX: &str = "agent-custom-";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
    #[error("agent already in catalog: {0}")]
    DuplicateAgent(String),
    #[error("not a custom agent, refusing to remove: {0}")]
    NotCustom(String),
}

/// Holds every known persona and its installed status
pub struct AgentCatalog {
    profiles: Vec<AgentProfile>,
}

impl AgentCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
        }
    }

    /// Create a catalog seeded with the built-in personas
    pub fn builtin() -> Self {
        let catalog = Self {
            profiles: builtin_profiles(),
        };
        info!(
            "Catalog: loaded {} built-in agents ({} installed)",
            catalog.count(),
            catalog.installed().len()
        );
        catalog
    }

    /// Create a catalog from an explicit profile list
    pub fn with_profiles(profiles: Vec<AgentProfile>) -> Self {
        Self { profiles }
    }

    /// Add a profile at the end of the catalog
    pub fn add(&mut self, profile: AgentProfile) -> Result<(), CatalogError> {
        if self.get(&profile.id).is_some() {
            return Err(CatalogError::DuplicateAgent(profile.id));
        }
        debug!("Catalog: added agent '{}' ({})", profile.id, profile.name);
        self.profiles.push(profile);
        Ok(())
    }

    /// Look up a profile by identifier
    pub fn get(&self, id: &str) -> Option<&AgentProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Mark an agent installed, making it eligible for auto-selection
    pub fn install(&mut self, id: &str) -> Result<(), CatalogError> {
        let profile = self.get_mut(id)?;
        if profile.is_installed {
            warn!("Catalog: agent '{}' is already installed", id);
        }
        profile.is_installed = true;
        info!("Catalog: installed agent '{}'", id);
        Ok(())
    }

    /// Mark an agent not installed; it will never be auto-selected
    pub fn uninstall(&mut self, id: &str) -> Result<(), CatalogError> {
        let profile = self.get_mut(id)?;
        profile.is_installed = false;
        info!("Catalog: uninstalled agent '{}'", id);
        Ok(())
    }

    /// Create a custom agent from a draft. Custom agents start installed
    /// and flagged as new, with zero rating and downloads.
    pub fn create(&mut self, draft: AgentDraft) -> AgentProfile {
        let profile = AgentProfile {
            id: format!("{}{}", CUSTOM_ID_PREFIX, Uuid::new_v4()),
            name: draft.name,
            avatar: draft.avatar,
            meta_prompt: draft.meta_prompt,
            category: draft.category,
            description: draft.description,
            tags: draft.tags,
            rating: Some(0.0),
            downloads: Some(0),
            is_new: true,
            is_installed: true,
        };
        info!("Catalog: created custom agent '{}' ({})", profile.id, profile.name);
        self.profiles.push(profile.clone());
        profile
    }

    /// Replace an existing profile. The identifier must already be present;
    /// identifiers themselves never change.
    pub fn update(&mut self, profile: AgentProfile) -> Result<(), CatalogError> {
        let slot = self
            .profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| CatalogError::UnknownAgent(profile.id.clone()))?;
        debug!("Catalog: updated agent '{}'", profile.id);
        *slot = profile;
        Ok(())
    }

    /// Delete a custom agent from the catalog. Built-in agents can only be
    /// uninstalled, never removed.
    pub fn remove(&mut self, id: &str) -> Result<(), CatalogError> {
        if !id.starts_with(CUSTOM_ID_PREFIX) {
            warn!("Catalog: refusing to remove non-custom agent '{}'", id);
            return Err(CatalogError::NotCustom(id.to_string()));
        }
        let index = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownAgent(id.to_string()))?;
        self.profiles.remove(index);
        info!("Catalog: removed custom agent '{}'", id);
        Ok(())
    }

    /// Snapshot of installed profiles in catalog order. This is the
    /// immutable view handed to the selector.
    pub fn installed(&self) -> Vec<AgentProfile> {
        self.profiles
            .iter()
            .filter(|p| p.is_installed)
            .cloned()
            .collect()
    }

    /// Every profile, in catalog order
    pub fn all(&self) -> &[AgentProfile] {
        &self.profiles
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut AgentProfile, CatalogError> {
        self.profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownAgent(id.to_string()))
    }
}

impl Default for AgentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> AgentDraft {
        AgentDraft {
            name: name.to_string(),
            avatar: "Brain".to_string(),
            meta_prompt: "帮助用户解决问题。".to_string(),
            category: Some("效率".to_string()),
            description: Some("自定义助手。".to_string()),
            tags: vec!["自定义".to_string()],
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = AgentCatalog::builtin();
        assert_eq!(catalog.count(), 14);
        assert_eq!(catalog.installed().len(), 6);
    }

    #[test]
    fn test_install_flips_visibility() {
        let mut catalog = AgentCatalog::builtin();
        assert!(!catalog.installed().iter().any(|p| p.id == "market-agent-1"));

        catalog.install("market-agent-1").unwrap();
        assert!(catalog.installed().iter().any(|p| p.id == "market-agent-1"));

        catalog.uninstall("market-agent-1").unwrap();
        assert!(!catalog.installed().iter().any(|p| p.id == "market-agent-1"));
    }

    #[test]
    fn test_install_unknown_fails() {
        let mut catalog = AgentCatalog::builtin();
        assert!(matches!(
            catalog.install("agent-999"),
            Err(CatalogError::UnknownAgent(_))
        ));
    }

    #[test]
    fn test_create_custom_agent() {
        let mut catalog = AgentCatalog::builtin();
        let profile = catalog.create(draft("我的助手"));

        assert!(profile.id.starts_with("agent-custom-"));
        assert!(profile.is_installed);
        assert!(profile.is_new);
        assert_eq!(profile.rating, Some(0.0));
        assert_eq!(profile.downloads, Some(0));
        assert_eq!(catalog.count(), 15);
        assert!(catalog.installed().iter().any(|p| p.id == profile.id));
    }

    #[test]
    fn test_remove_custom_agent() {
        let mut catalog = AgentCatalog::builtin();
        let profile = catalog.create(draft("临时助手"));

        catalog.remove(&profile.id).unwrap();
        assert_eq!(catalog.count(), 14);
        assert!(catalog.get(&profile.id).is_none());
    }

    #[test]
    fn test_remove_builtin_refused() {
        let mut catalog = AgentCatalog::builtin();
        assert!(matches!(
            catalog.remove("agent-1"),
            Err(CatalogError::NotCustom(_))
        ));
        assert_eq!(catalog.count(), 14);
    }

    #[test]
    fn test_update_profile() {
        let mut catalog = AgentCatalog::builtin();
        let mut profile = catalog.get("agent-1").unwrap().clone();
        profile.name = "Direct Solver v2".to_string();

        catalog.update(profile).unwrap();
        assert_eq!(catalog.get("agent-1").unwrap().name, "Direct Solver v2");
    }

    #[test]
    fn test_update_unknown_fails() {
        let mut catalog = AgentCatalog::builtin();
        let profile = AgentProfile::new("agent-999", "Ghost");
        assert!(matches!(
            catalog.update(profile),
            Err(CatalogError::UnknownAgent(_))
        ));
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut catalog = AgentCatalog::builtin();
        let dup = AgentProfile::new("agent-1", "Impostor");
        assert!(matches!(
            catalog.add(dup),
            Err(CatalogError::DuplicateAgent(_))
        ));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut catalog = AgentCatalog::new();
        catalog.add(AgentProfile::new("b", "B")).unwrap();
        catalog.add(AgentProfile::new("a", "A")).unwrap();
        catalog.add(AgentProfile::new("c", "C")).unwrap();

        let ids: Vec<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
