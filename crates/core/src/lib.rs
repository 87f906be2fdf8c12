//! # Supportbot Core
//!
//! Domain types, traits, and error definitions for the supportbot
//! customer-support assistant. This crate performs **no I/O**: it defines
//! the records that flow through a chat turn and the collaborator traits
//! (generation service, history store) that other crates implement.
//!
//! ## Layout
//!
//! - [`faq`]: the static FAQ record type
//! - [`turn`]: conversation turns, reply provenance, session identifiers
//! - [`provider`]: the generation service client trait
//! - [`history`]: the per-session history store trait
//! - [`error`]: the error taxonomy shared by every crate

pub mod error;
pub mod faq;
pub mod history;
pub mod provider;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use faq::FaqRecord;
pub use history::HistoryStore;
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use turn::{SessionId, Source, Turn};
