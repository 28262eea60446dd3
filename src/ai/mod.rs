//! AI opponent over an OpenAI-style HTTP move source
//!
//! The remote server's surface is unknown at call time: depending on version
//! it may expose a models listing, a chat-completions endpoint, a legacy
//! completions endpoint, or nothing at all. This module turns that
//! uncertainty into a guaranteed legal move:
//!
//! - `connection` - probes the server on an interval and publishes
//!   [`ConnectionState`] (which also names the model the fetcher asks for)
//! - `prompt` - renders the position and legal-move list into plain text
//! - `fetch` - issues the move request, trying both request shapes
//! - `resolve` - maps raw model output onto the legal-move set in stages
//! - `fallback` - deterministic priority-bucket selector used whenever the
//!   pipeline above yields nothing usable
//!
//! The pipeline never mutates the caller's position; each stage trial-applies
//! on a disposable copy and hands back an [`crate::rules::Applied`] value the
//! orchestrator commits.

pub mod connection;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod prompt;
pub mod resolve;

pub use connection::{probe, ConnectionMonitor, ConnectionState, SharedConnectionState};
pub use error::AiError;
pub use fallback::{FallbackMove, MoveQuality};
pub use fetch::{fetch_raw_move, RemoteMoveSource};
pub use prompt::MovePrompt;
pub use resolve::resolve;
