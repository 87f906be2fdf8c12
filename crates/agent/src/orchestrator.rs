//! One chat turn: FAQ first, AI fallback on a miss.

use std::sync::Arc;
use supportbot_config::AppConfig;
use supportbot_core::provider::Provider;
use supportbot_core::{FaqRecord, SessionId, Source, Turn};
use tracing::info;

use crate::context::ContextBuilder;
use crate::corpus::FaqCorpus;
use crate::fallback::AiFallback;
use crate::matcher::FaqMatcher;

/// What a turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub source: Source,
    /// The input history with exactly one turn appended
    pub history: Vec<Turn>,
}

/// Routes a message to the FAQ corpus or the AI fallback.
///
/// Holds no per-session state. Callers pass in a history snapshot and
/// persist the returned one.
pub struct TurnOrchestrator {
    corpus: Arc<FaqCorpus>,
    matcher: FaqMatcher,
    context: ContextBuilder,
    fallback: AiFallback,
}

impl TurnOrchestrator {
    pub fn new(
        corpus: Arc<FaqCorpus>,
        matcher: FaqMatcher,
        context: ContextBuilder,
        fallback: AiFallback,
    ) -> Self {
        Self {
            corpus,
            matcher,
            context,
            fallback,
        }
    }

    /// Wire the components from configuration around an existing corpus and
    /// provider.
    pub fn from_config(
        config: &AppConfig,
        corpus: Arc<FaqCorpus>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self::new(
            corpus,
            FaqMatcher::new(config.faq.match_threshold),
            ContextBuilder::new(&config.conversation.system_prompt)
                .with_window(config.conversation.context_turns),
            AiFallback::from_config(provider, config),
        )
    }

    pub fn faqs(&self) -> &[FaqRecord] {
        self.corpus.records()
    }

    pub fn fallback(&self) -> &AiFallback {
        &self.fallback
    }

    /// Produce a reply and the history with the new turn appended.
    ///
    /// Never fails: a generation error becomes an apology reply with source
    /// `AI`. `session_id` and `message` are assumed non-empty.
    pub async fn handle_turn(
        &self,
        session_id: &SessionId,
        message: &str,
        history: &[Turn],
    ) -> TurnOutcome {
        let (reply, source) = match self.matcher.find_answer(message, self.corpus.records()) {
            Some(answer) => (answer.to_string(), Source::Faq),
            None => {
                let prompt = self.context.build(history, message);
                (self.fallback.generate(&prompt).await, Source::Ai)
            }
        };

        info!(session_id = %session_id, source = %source, "Turn handled");

        let mut updated = history.to_vec();
        updated.push(Turn::new(message, reply.clone(), source));

        TurnOutcome {
            reply,
            source,
            history: updated,
        }
    }
}
