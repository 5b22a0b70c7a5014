//! Release-level readiness report.

use serde::{Deserialize, Serialize};

use crate::prep::PrepSummary;
use crate::tickets::ExternalTicket;

use super::band::{ReadinessBand, StatusTone};
use super::scorer::combined_readiness_score;

/// Combined readiness of a release with its inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseReadiness {
    pub score: u8,
    pub band: ReadinessBand,
    pub label: String,
    pub tone: StatusTone,
    pub color: String,
    pub prep_completed: usize,
    pub prep_total: usize,
    pub open_external: usize,
}

impl ReleaseReadiness {
    /// Score the release from its checklist and its unresolved external tickets.
    pub fn evaluate(prep: PrepSummary, tickets: &[ExternalTicket]) -> Self {
        let open_external = tickets.iter().filter(|t| !t.is_done()).count();
        Self::from_counts(open_external, prep.completed, prep.total)
    }

    pub fn from_counts(open_external: usize, prep_completed: usize, prep_total: usize) -> Self {
        let score = combined_readiness_score(open_external, prep_completed, prep_total);
        let band = ReadinessBand::from_score(score);
        let tone = band.tone();
        Self {
            score,
            band,
            label: band.label().to_string(),
            tone,
            color: tone.color().to_string(),
            prep_completed,
            prep_total,
            open_external,
        }
    }
}
