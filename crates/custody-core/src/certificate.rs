use custody_canonical::BatchId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::BatchEvent;
use crate::scoring::{compute_information_gain_with, ScoringMode};

/// Certificate level derived from a batch score. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CertificateTier {
    /// Below every threshold.
    None,
    /// Score of at least 10.
    Bronze,
    /// Score of at least 25.
    Silver,
    /// Score of at least 50.
    Gold,
    /// Score of at least 80.
    Diamond,
}

impl CertificateTier {
    /// Tier names from highest to lowest, with their minimum scores.
    const THRESHOLDS: [(i64, CertificateTier); 4] = [
        (80, CertificateTier::Diamond),
        (50, CertificateTier::Gold),
        (25, CertificateTier::Silver),
        (10, CertificateTier::Bronze),
    ];

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateTier::None => "None",
            CertificateTier::Bronze => "Bronze",
            CertificateTier::Silver => "Silver",
            CertificateTier::Gold => "Gold",
            CertificateTier::Diamond => "Diamond",
        }
    }
}

impl fmt::Display for CertificateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a score to its tier. Thresholds are inclusive.
pub fn classify(score: i64) -> CertificateTier {
    CertificateTier::THRESHOLDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(CertificateTier::None)
}

/// A batch's history with its score and tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Batch the certificate is about.
    pub batch_id: BatchId,
    /// Information-gain score.
    pub score: i64,
    /// Tier for `score`.
    pub tier: CertificateTier,
    /// History the score was computed from, in ledger order.
    pub events: Vec<BatchEvent>,
}

impl Certificate {
    /// Scores `events` and classifies the result.
    pub fn issue(batch_id: BatchId, events: Vec<BatchEvent>, mode: ScoringMode) -> Self {
        let score = compute_information_gain_with(&events, mode);
        Self {
            batch_id,
            score,
            tier: classify(score),
            events,
        }
    }
}
