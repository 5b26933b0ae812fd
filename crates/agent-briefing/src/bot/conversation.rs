//! Session history for the briefing bot
//!
//! History is append-only and lives only as long as the session.

use chrono::{DateTime, Utc};

/// A single interaction
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    /// User's input
    pub user_input: String,
    /// Label of the intent the input was classified as
    pub intent: &'static str,
    /// Bot's reply
    pub response: String,
    /// Timestamp of the turn
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user_input: String, intent: &'static str, response: String) -> Self {
        Self {
            user_input,
            intent,
            response,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only interaction log
#[derive(Debug, Default)]
pub struct ConversationManager {
    history: Vec<ConversationTurn>,
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a turn
    pub fn add_turn(&mut self, user_input: String, intent: &'static str, response: String) {
        self.history.push(ConversationTurn::new(user_input, intent, response));
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Get the last N turns, newest first
    pub fn last_turns(&self, n: usize) -> Vec<&ConversationTurn> {
        self.history.iter().rev().take(n).collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Render the log for `/history`
    pub fn format_history(&self) -> String {
        if self.history.is_empty() {
            return "No queries yet this session.".to_string();
        }

        let mut out = String::from("Session history:");
        for (i, turn) in self.history.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. [{}] {} ({})",
                i + 1,
                turn.timestamp.format("%H:%M:%S"),
                turn.user_input,
                turn.intent
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_turn() {
        let mut manager = ConversationManager::new();
        assert!(manager.is_empty());

        manager.add_turn("news".to_string(), "news", "Latest General News: ...".to_string());
        manager.add_turn("stock TCS".to_string(), "stock-price", "₹3900.00".to_string());

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.last_turns(1)[0].user_input, "stock TCS");
        assert_eq!(manager.history()[0].intent, "news");
    }

    #[test]
    fn test_history_is_never_trimmed() {
        let mut manager = ConversationManager::new();
        for i in 0..500 {
            manager.add_turn(format!("Query {i}"), "unknown", String::new());
        }
        assert_eq!(manager.len(), 500);
        assert_eq!(manager.history()[0].user_input, "Query 0");
    }

    #[test]
    fn test_format_history() {
        let mut manager = ConversationManager::new();
        assert_eq!(manager.format_history(), "No queries yet this session.");

        manager.add_turn("weather Pune".to_string(), "weather", "Weather in Pune".to_string());
        let text = manager.format_history();
        assert!(text.starts_with("Session history:\n1. ["));
        assert!(text.ends_with("] weather Pune (weather)"));
    }
}
