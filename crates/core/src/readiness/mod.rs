//! Readiness scoring.
//!
//! Pure functions: group progress and risk for ticket groups, and the
//! combined release score blending checklist completion with open tickets.

mod band;
mod report;
mod scorer;

pub use band::{ReadinessBand, StatusTone};
pub use report::ReleaseReadiness;
pub use scorer::{
    combined_readiness_score, group_progress, group_risk_score, open_ticket_score, prep_score,
    OPEN_TICKET_CEILING, PREP_WEIGHT, TICKET_WEIGHT,
};
