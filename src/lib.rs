//! lmchess - terminal chess against an OpenAI-style move server
//!
//! The server is treated as an unreliable move source: its surface is
//! probed rather than assumed, every answer is validated against the
//! legal-move set, and a deterministic fallback selector guarantees a legal
//! move whenever the pipeline fails. Chess rules themselves are delegated
//! to `shakmaty` through the `rules` capability layer.

pub mod ai;
pub mod config;
pub mod game;
pub mod rules;
pub mod storage;

pub use game::GameSession;
