use serde::{Deserialize, Serialize};

use crate::segment::Unit;
use crate::vectorize::{SparseVector, UnitVector};

/// Number of candidates considered for the answer.
pub const TOP_K: usize = 3;

/// Minimum similarity before a match is trusted.
pub const SCORE_THRESHOLD: f32 = 0.20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredUnit {
    pub unit: Unit,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    /// Top candidates in descending score order, each at or above the
    /// threshold. Never empty.
    Confident(Vec<ScoredUnit>),
    NoConfidentMatch,
}

/// Cosine similarity, defined as 0 when either vector has zero norm.
/// Weights are non-negative, so the result is clamped into [0, 1] to absorb
/// rounding.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Scores every unit against the query, orders by score with document order
/// breaking ties, keeps the top [`TOP_K`], and applies the confidence gate.
pub fn rank(query_vector: &SparseVector, unit_vectors: Vec<UnitVector>) -> RankOutcome {
    let mut scored: Vec<ScoredUnit> = unit_vectors
        .into_iter()
        .map(|uv| ScoredUnit {
            score: cosine_similarity(query_vector, &uv.vector),
            unit: uv.unit,
        })
        .collect();

    // Stable sort: equal scores keep their document order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(TOP_K);

    let best_is_confident = scored
        .first()
        .map(|s| s.score >= SCORE_THRESHOLD)
        .unwrap_or(false);
    if !best_is_confident {
        return RankOutcome::NoConfidentMatch;
    }

    // The threshold also applies per entry, so fewer than TOP_K may remain.
    scored.retain(|s| s.score >= SCORE_THRESHOLD);
    RankOutcome::Confident(scored)
}
