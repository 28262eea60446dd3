//! Game state and orchestration
//!
//! Pure state: no networking and no rules logic of its own. The modules
//! here keep one game consistent across human moves, remote moves, the
//! fallback path, and undo/redo:
//!
//! - `history` - snapshot log with cursor (undo/redo, branch discard)
//! - `moves` - forward-only SAN move log
//! - `captured` - forward-only captured-piece tally
//! - `turn` - turn-ownership state machine, including the pending-promotion
//!   transient and terminal states
//! - `orchestrator` - [`GameSession`], which owns all of the above plus the
//!   live position and drives the remote-move pipeline
//! - `error` - the orchestration error type

pub mod captured;
pub mod error;
pub mod history;
pub mod moves;
pub mod orchestrator;
pub mod turn;

pub use captured::CapturedPieces;
pub use error::GameError;
pub use history::PositionHistory;
pub use moves::{MoveLog, MoveRecord};
pub use orchestrator::{GameSession, HumanMoveOutcome, MoveOrigin, PlyReport};
pub use turn::TurnState;
