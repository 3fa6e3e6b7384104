//! Information-gain scoring.
//!
//! A batch's history is walked once, front to back. Each event adjusts a
//! running integer score; `FINALIZED` triggers a reconciliation over the
//! delivery legs and lifecycle flags seen so far. The score is never
//! clamped and the same history always yields the same score.

use serde::{Deserialize, Serialize};

use crate::events::{BatchEvent, EventPayload};

/// When reconciliation is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Reconcile at every `FINALIZED`, with the state accumulated up to it.
    /// A history finalized twice is reconciled twice.
    #[default]
    Inline,
    /// Reconcile once, after the last event, over the complete history.
    /// Only applies when the history contains at least one `FINALIZED`.
    Deferred,
}

const BATCH_CREATED: i64 = 2;
const IOT_UPDATE: i64 = 1;
const HANDOFF: i64 = 3;
const HOT_PENALTY: i64 = -5;
const HUMID_PENALTY: i64 = -3;
const HOT_ABOVE: f64 = 24.0;
const HUMID_ABOVE: f64 = 90.0;

const OPEN_LEG: i64 = -4;
const ALL_LEGS: i64 = 10;
const MOST_LEGS: i64 = 6;
const HALF_LEGS: i64 = 2;
const FEW_LEGS: i64 = -5;
const NO_IOT: i64 = -3;
const NOT_CREATED: i64 = -5;

#[derive(Debug, Clone, Copy, Default)]
struct Leg {
    received: bool,
}

/// Streaming scorer: feed events in order, then call [`InformationGain::finish`].
#[derive(Debug, Clone, Default)]
pub struct InformationGain {
    mode: ScoringMode,
    score: i64,
    created: bool,
    iot_seen: bool,
    finalized: bool,
    legs: Vec<Leg>,
    ratings: i64,
}

impl InformationGain {
    /// Fresh scorer with a zero score.
    pub fn new(mode: ScoringMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Score accumulated so far, without any pending deferred reconciliation.
    pub fn running_score(&self) -> i64 {
        self.score
    }

    /// Applies one event.
    pub fn observe(&mut self, event: &BatchEvent) {
        match event.payload() {
            EventPayload::BatchCreated => {
                self.score += BATCH_CREATED;
                self.created = true;
            }
            EventPayload::IotUpdate(reading) => {
                self.score += IOT_UPDATE;
                self.iot_seen = true;
                if reading.temperature.is_some_and(|t| t > HOT_ABOVE) {
                    self.score += HOT_PENALTY;
                }
                if reading.humidity.is_some_and(|h| h > HUMID_ABOVE) {
                    self.score += HUMID_PENALTY;
                }
            }
            EventPayload::Dispatched(_) => {
                self.legs.push(Leg::default());
                self.score += HANDOFF;
            }
            EventPayload::Received(_) => {
                if let Some(leg) = self.legs.last_mut() {
                    leg.received = true;
                }
                self.score += HANDOFF;
            }
            EventPayload::Rating(rating) => {
                self.ratings += 1;
                self.score += rating_delta(rating.rating, self.ratings);
            }
            EventPayload::QualityInspection(inspection) => {
                self.score += inspection_delta(inspection.rating);
            }
            EventPayload::Finalized(_) => {
                self.finalized = true;
                if self.mode == ScoringMode::Inline {
                    self.score += self.reconciliation();
                }
            }
            EventPayload::Other { .. } => {}
        }
    }

    /// Final score for the events observed.
    pub fn finish(self) -> i64 {
        match self.mode {
            ScoringMode::Deferred if self.finalized => self.score + self.reconciliation(),
            _ => self.score,
        }
    }

    fn reconciliation(&self) -> i64 {
        let total = self.legs.len() as i64;
        let completed = self.legs.iter().filter(|leg| leg.received).count() as i64;
        let open = total - completed;

        let ratio_bonus = if total == 0 {
            FEW_LEGS
        } else if completed == total {
            ALL_LEGS
        } else if completed * 4 >= total * 3 {
            MOST_LEGS
        } else if completed * 2 >= total {
            HALF_LEGS
        } else {
            FEW_LEGS
        };

        let mut delta = open * OPEN_LEG + ratio_bonus;
        if !self.iot_seen {
            delta += NO_IOT;
        }
        if !self.created {
            delta += NOT_CREATED;
        }
        delta
    }
}

fn rating_delta(rating: Option<f64>, nth: i64) -> i64 {
    match rating {
        Some(r) if r >= 4.0 => nth,
        Some(r) if r <= 2.0 => -2 * nth,
        _ => 0,
    }
}

fn inspection_delta(rating: Option<f64>) -> i64 {
    match rating {
        Some(r) if r >= 4.0 => 5,
        Some(r) if r == 3.0 => 2,
        Some(r) if r <= 2.0 => -6,
        _ => 0,
    }
}

/// Scores a history with [`ScoringMode::Inline`].
pub fn compute_information_gain(events: &[BatchEvent]) -> i64 {
    compute_information_gain_with(events, ScoringMode::Inline)
}

/// Scores a history with the given reconciliation mode.
pub fn compute_information_gain_with(events: &[BatchEvent], mode: ScoringMode) -> i64 {
    let mut scorer = InformationGain::new(mode);
    for event in events {
        scorer.observe(event);
    }
    scorer.finish()
}
