//! Agent selector
//!
//! Scores every installed agent against the keywords of a message and
//! returns an ordered top-N subset. Used once per auto-created
//! conversation to decide which personas join.

use std::collections::HashSet;

use tracing::debug;

use crate::agents::AgentProfile;
use crate::keywords::extract_keywords;

/// Default number of agents joining an auto-created conversation
pub const DEFAULT_MAX_AGENTS: usize = 3;

/// Select up to `max_agents` installed agents for a message.
///
/// Each installed agent is scored: +3 per matching tag, +2 for a matching
/// category, +0.5 per matching description word. Agents with no signal are
/// dropped; the rest are sorted by score descending (catalog order breaks
/// ties). If nothing matches at all, the most-downloaded installed agents
/// are returned instead. An empty catalog yields an empty result.
pub fn select_agents(
    message: &str,
    catalog: &[AgentProfile],
    max_agents: usize,
) -> Vec<AgentProfile> {
    let keywords = extract_keywords(message);

    let mut scored: Vec<(AgentProfile, f64)> = catalog
        .iter()
        .filter(|agent| agent.is_installed)
        .map(|agent| (agent.clone(), score_agent(agent, &keywords)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    if scored.is_empty() {
        debug!("No keyword overlap, ranking installed agents by downloads");
        let mut installed: Vec<AgentProfile> = catalog
            .iter()
            .filter(|agent| agent.is_installed)
            .cloned()
            .collect();
        installed.sort_by(|a, b| b.downloads.unwrap_or(0).cmp(&a.downloads.unwrap_or(0)));
        installed.truncate(max_agents);
        return installed;
    }

    // sort_by is stable, so equal scores keep catalog order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(max_agents);

    debug!(
        "Selected {} agents: {:?}",
        scored.len(),
        scored
            .iter()
            .map(|(agent, score)| (agent.id.as_str(), *score))
            .collect::<Vec<_>>()
    );

    scored.into_iter().map(|(agent, _)| agent).collect()
}

/// Additive match strength between a message's keywords and one agent.
fn score_agent(agent: &AgentProfile, keywords: &HashSet<String>) -> f64 {
    let tag_score = agent
        .tags
        .iter()
        .filter(|tag| keyword_match(keywords, &tag.to_lowercase()))
        .count() as f64
        * 3.0;

    let category_score = match &agent.category {
        Some(category) if keyword_match(keywords, &category.to_lowercase()) => 2.0,
        _ => 0.0,
    };

    // Description words are matched as raw space-split tokens, without the
    // punctuation stripping or stop-word filtering applied to the message.
    let description_score = agent
        .description
        .as_deref()
        .unwrap_or("")
        .to_lowercase()
        .split(' ')
        .filter(|word| keywords.contains(*word))
        .count() as f64
        * 0.5;

    tag_score + category_score + description_score
}

/// Whether a tag or category term is carried by the keyword set. An
/// unspaced CJK keyword run carries every term it contains, so "效率提升方案"
/// still matches the tag "效率".
fn keyword_match(keywords: &HashSet<String>, term: &str) -> bool {
    !term.is_empty() && keywords.iter().any(|keyword| keyword.contains(term))
}
