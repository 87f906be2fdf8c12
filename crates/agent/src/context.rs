//! Prompt assembly for the AI fallback.
//!
//! Layout of the rendered prompt:
//!
//! ```text
//! <system prompt>
//!
//! Previous conversation:
//! User: ...
//! Assistant: ...
//!
//! Current user message: <message>
//! ```
//!
//! The "Previous conversation" block is omitted when there is no history.

use supportbot_core::Turn;

/// How many trailing turns feed the prompt by default.
pub const DEFAULT_CONTEXT_TURNS: usize = 5;

/// Renders a bounded window of history plus the current message.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    system_prompt: String,
    window: usize,
}

impl ContextBuilder {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            window: DEFAULT_CONTEXT_TURNS,
        }
    }

    /// Set how many of the most recent turns are included.
    pub fn with_window(mut self, turns: usize) -> Self {
        self.window = turns;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Render the prompt. Does not touch `history`.
    pub fn build(&self, history: &[Turn], message: &str) -> String {
        let mut prompt = format!("{}\n\n", self.system_prompt);

        let recent = &history[history.len().saturating_sub(self.window)..];
        if !recent.is_empty() {
            prompt.push_str("Previous conversation:\n");
            for turn in recent {
                prompt.push_str(&format!(
                    "User: {}\nAssistant: {}\n\n",
                    turn.user, turn.assistant
                ));
            }
        }

        prompt.push_str("Current user message: ");
        prompt.push_str(message);
        prompt
    }
}

/// Render a prompt with the default five-turn window.
pub fn build_context(system_prompt: &str, history: &[Turn], message: &str) -> String {
    ContextBuilder::new(system_prompt).build(history, message)
}
