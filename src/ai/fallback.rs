//! Deterministic fallback move selection
//!
//! Used whenever the acquisition pipeline fails: unreachable server, garbage
//! text, unresolvable move. Legal moves are partitioned into priority
//! buckets and the choice is uniform within the highest non-empty bucket:
//!
//! check > capture > promotion > developing (knight/bishop non-capture) > any
//!
//! Bucket priority is absolute, not weighted. Only the intra-bucket
//! tie-break is random, and that randomness sits behind an injected
//! [`rand::Rng`] so tests can pin the bucket while still exercising the
//! draw. Each selection carries a fixed rationale string and quality label
//! for the status line; these are heuristic commentary, not a scoring
//! engine.

use rand::Rng;
use shakmaty::{Chess, Role};
use tracing::{error, info};

use super::error::AiError;
use crate::rules::{self, Applied, MoveDescriptor};

/// Heuristic quality label attached to a fallback move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveQuality {
    Excellent,
    Good,
    Fair,
}

impl std::fmt::Display for MoveQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveQuality::Excellent => write!(f, "excellent"),
            MoveQuality::Good => write!(f, "good"),
            MoveQuality::Fair => write!(f, "fair"),
        }
    }
}

/// A fallback-selected move with its rationale
#[derive(Debug, Clone)]
pub struct FallbackMove {
    pub applied: Applied,
    pub rationale: &'static str,
    pub quality: MoveQuality,
}

const RATIONALE_CHECK: &str = "puts the opponent in check";
const RATIONALE_CAPTURE: &str = "captures material";
const RATIONALE_PROMOTION: &str = "promotes a pawn";
const RATIONALE_DEVELOPING: &str = "develops a minor piece";
const RATIONALE_OTHER: &str = "keeps the game going";

/// Select a fallback move using the thread RNG
///
/// Total while the position has at least one legal move; a terminal
/// position is the caller's responsibility to recognize first.
pub fn select(position: &Chess) -> Result<FallbackMove, AiError> {
    select_with(position, &mut rand::rng())
}

/// Select a fallback move with an injected RNG
pub fn select_with<R: Rng + ?Sized>(
    position: &Chess,
    rng: &mut R,
) -> Result<FallbackMove, AiError> {
    let descriptors = rules::legal_descriptors(position);
    if descriptors.is_empty() {
        return Err(AiError::Inconsistency {
            message: "fallback selection invoked on a terminal position".to_string(),
        });
    }

    let (bucket, rationale, quality) = partition(&descriptors);
    let chosen = bucket[rng.random_range(0..bucket.len())];

    let applied = rules::apply_san(position, &chosen.san).map_err(|err| {
        // A legal-set move must apply; this is a contract violation, not a
        // recoverable fetch failure.
        error!("[AI] fallback move {} failed to apply: {err}", chosen.san);
        AiError::Inconsistency {
            message: format!("fallback move {} rejected by rules: {err}", chosen.san),
        }
    })?;

    info!(
        "[AI] fallback selected {} ({rationale}, {quality})",
        applied.notation
    );
    Ok(FallbackMove {
        applied,
        rationale,
        quality,
    })
}

/// Highest-priority non-empty bucket with its rationale and quality label
fn partition(
    descriptors: &[MoveDescriptor],
) -> (Vec<&MoveDescriptor>, &'static str, MoveQuality) {
    let checks: Vec<&MoveDescriptor> =
        descriptors.iter().filter(|d| d.gives_check).collect();
    if !checks.is_empty() {
        return (checks, RATIONALE_CHECK, MoveQuality::Excellent);
    }

    let captures: Vec<&MoveDescriptor> =
        descriptors.iter().filter(|d| d.captured.is_some()).collect();
    if !captures.is_empty() {
        return (captures, RATIONALE_CAPTURE, MoveQuality::Good);
    }

    let promotions: Vec<&MoveDescriptor> =
        descriptors.iter().filter(|d| d.promotion.is_some()).collect();
    if !promotions.is_empty() {
        return (promotions, RATIONALE_PROMOTION, MoveQuality::Excellent);
    }

    let developing: Vec<&MoveDescriptor> = descriptors
        .iter()
        .filter(|d| {
            matches!(d.role, Role::Knight | Role::Bishop) && d.captured.is_none()
        })
        .collect();
    if !developing.is_empty() {
        return (developing, RATIONALE_DEVELOPING, MoveQuality::Good);
    }

    (
        descriptors.iter().collect(),
        RATIONALE_OTHER,
        MoveQuality::Fair,
    )
}
