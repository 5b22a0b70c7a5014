//! Readiness bands and their display tones.

use serde::{Deserialize, Serialize};

/// Display tone associated with a band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Healthy,
    Primary,
    Degraded,
    Critical,
}

impl StatusTone {
    /// Hex color used by dashboards for this tone.
    pub fn color(&self) -> &'static str {
        match self {
            StatusTone::Healthy => "#16a34a",
            StatusTone::Primary => "#2563eb",
            StatusTone::Degraded => "#d97706",
            StatusTone::Critical => "#dc2626",
        }
    }
}

/// Coarse classification of a readiness score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    NotReady,
    NeedsWork,
    AlmostReady,
    Ready,
}

impl ReadinessBand {
    /// `>= 90` Ready, `>= 75` Almost Ready, `>= 60` Needs Work, else Not Ready.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => ReadinessBand::Ready,
            75..=89 => ReadinessBand::AlmostReady,
            60..=74 => ReadinessBand::NeedsWork,
            _ => ReadinessBand::NotReady,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReadinessBand::Ready => "Ready",
            ReadinessBand::AlmostReady => "Almost Ready",
            ReadinessBand::NeedsWork => "Needs Work",
            ReadinessBand::NotReady => "Not Ready",
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            ReadinessBand::Ready => StatusTone::Healthy,
            ReadinessBand::AlmostReady => StatusTone::Primary,
            ReadinessBand::NeedsWork => StatusTone::Degraded,
            ReadinessBand::NotReady => StatusTone::Critical,
        }
    }
}

impl std::fmt::Display for ReadinessBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ReadinessBand::from_score(100), ReadinessBand::Ready);
        assert_eq!(ReadinessBand::from_score(90), ReadinessBand::Ready);
        assert_eq!(ReadinessBand::from_score(89), ReadinessBand::AlmostReady);
        assert_eq!(ReadinessBand::from_score(75), ReadinessBand::AlmostReady);
        assert_eq!(ReadinessBand::from_score(74), ReadinessBand::NeedsWork);
        assert_eq!(ReadinessBand::from_score(60), ReadinessBand::NeedsWork);
        assert_eq!(ReadinessBand::from_score(59), ReadinessBand::NotReady);
        assert_eq!(ReadinessBand::from_score(0), ReadinessBand::NotReady);
    }

    #[test]
    fn test_band_tones() {
        assert_eq!(ReadinessBand::Ready.tone(), StatusTone::Healthy);
        assert_eq!(ReadinessBand::AlmostReady.tone(), StatusTone::Primary);
        assert_eq!(ReadinessBand::NeedsWork.tone(), StatusTone::Degraded);
        assert_eq!(ReadinessBand::NotReady.tone(), StatusTone::Critical);
        assert_eq!(format!("{}", ReadinessBand::NeedsWork), "Needs Work");
    }
}
