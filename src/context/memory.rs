//! Session memory: conversation and decision logs, detected preferences and
//! the recent-files list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::analysis::Severity;

/// Conversation log keeps only the latest entries
pub const MAX_CONVERSATIONS: usize = 100;

/// Recent-files list is capped at this length
pub const MAX_RECENT_FILES: usize = 20;

const DECISION_KEYWORDS: [&str; 6] = [
    "architecture",
    "design",
    "pattern",
    "structure",
    "refactor",
    "migrate",
];

const RELATED_CONVERSATIONS: usize = 5;
const RELATED_DECISIONS: usize = 3;

/// One query/response exchange reported by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interaction {
    pub query: String,
    pub response: String,
    #[serde(default, alias = "filesModified")]
    pub files_modified: Vec<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub query: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEntry {
    pub id: Uuid,
    pub description: String,
    pub decision: String,
    pub timestamp: DateTime<Utc>,
    pub impact: Severity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub prefer_const: bool,
    pub prefer_async: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    /// Bounded at [`MAX_CONVERSATIONS`], oldest dropped first
    pub conversations: VecDeque<ConversationEntry>,
    /// Unbounded for the life of the session; decisions are never evicted
    pub decisions: Vec<DecisionEntry>,
    pub preferences: Preferences,
}

/// Memory surfaced alongside a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub recent_conversations: Vec<ConversationEntry>,
    pub relevant_decisions: Vec<DecisionEntry>,
    pub preferences: Preferences,
}

/// Per-session state that is not derived from repository content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicState {
    /// Most recent first
    pub recent_files: Vec<String>,
    pub current_focus: Option<String>,
}

impl DynamicState {
    /// Move `path` to the front of the recent-files list
    pub fn touch(&mut self, path: &str) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_string());
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}

pub fn is_architectural_decision(interaction: &Interaction) -> bool {
    let query = interaction.query.to_lowercase();
    let response = interaction.response.to_lowercase();
    DECISION_KEYWORDS
        .iter()
        .any(|k| query.contains(k) || response.contains(k))
}

pub fn assess_impact(files_modified: usize) -> Severity {
    if files_modified > 5 {
        Severity::High
    } else if files_modified > 2 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// More than two of `a`'s longer words also appear as words in `b`
pub fn is_related(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let b_words: Vec<&str> = b.split_whitespace().collect();

    a.split_whitespace()
        .filter(|w| w.chars().count() > 3 && b_words.contains(w))
        .count()
        > 2
}

impl MemoryStore {
    /// Append the conversation, log it as a decision when it reads like one,
    /// and update preferences from the response
    pub fn record(&mut self, interaction: &Interaction) {
        let now = Utc::now();

        self.conversations.push_back(ConversationEntry {
            id: Uuid::new_v4(),
            query: interaction.query.clone(),
            response: interaction.response.clone(),
            timestamp: now,
            context: interaction.context.clone(),
        });
        while self.conversations.len() > MAX_CONVERSATIONS {
            self.conversations.pop_front();
        }

        if is_architectural_decision(interaction) {
            self.decisions.push(DecisionEntry {
                id: Uuid::new_v4(),
                description: interaction.query.clone(),
                decision: interaction.response.clone(),
                timestamp: now,
                impact: assess_impact(interaction.files_modified.len()),
            });
        }

        if interaction.response.contains("const") {
            self.preferences.prefer_const = true;
        }
        if interaction.response.contains("async/await") {
            self.preferences.prefer_async = true;
        }
    }

    /// Latest related conversations (oldest first) and earliest related decisions
    pub fn relevant_for(&self, query: &str) -> MemoryBlock {
        let related: Vec<&ConversationEntry> = self
            .conversations
            .iter()
            .filter(|c| is_related(&c.query, query))
            .collect();
        let skip = related.len().saturating_sub(RELATED_CONVERSATIONS);

        MemoryBlock {
            recent_conversations: related.into_iter().skip(skip).cloned().collect(),
            relevant_decisions: self
                .decisions
                .iter()
                .filter(|d| is_related(&d.description, query))
                .take(RELATED_DECISIONS)
                .cloned()
                .collect(),
            preferences: self.preferences,
        }
    }
}
