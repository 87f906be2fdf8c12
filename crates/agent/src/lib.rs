//! The routing core of supportbot.
//!
//! Every incoming message follows the same path:
//!
//! 1. **Match** the message against the FAQ corpus ([`matcher`], [`scorer`])
//! 2. **On a hit**, reply with the canned answer (source `FAQ`)
//! 3. **On a miss**, build a prompt from the recent history ([`context`]) and
//!    ask the generation service ([`fallback`]) (source `AI`)
//! 4. **Append** one turn to a copy of the history and hand it back
//!    ([`orchestrator`]) for the [`service`] to persist
//!
//! Nothing in steps 1 through 4 owns mutable state; the corpus and the generation
//! client are injected at construction.

pub mod context;
pub mod corpus;
pub mod fallback;
pub mod matcher;
pub mod orchestrator;
pub mod scorer;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use context::{ContextBuilder, DEFAULT_CONTEXT_TURNS, build_context};
pub use corpus::{FaqCorpus, load_corpus};
pub use fallback::{AiFallback, GenerationOutcome};
pub use matcher::{DEFAULT_MATCH_THRESHOLD, FaqMatcher};
pub use orchestrator::{TurnOrchestrator, TurnOutcome};
pub use scorer::score;
pub use service::{ChatReply, ChatService};
