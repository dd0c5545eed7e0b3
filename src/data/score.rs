//! Composite health score.

use pulsewatch_types::DomainSummary;

use super::status::StatusClass;

const BASE_SCORE: i32 = 50;

/// Integer health score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HealthScore(u8);

impl HealthScore {
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Display band for the score.
    pub fn grade(&self) -> Grade {
        match self.0 {
            80.. => Grade::Excellent,
            65..=79 => Grade::Good,
            50..=64 => Grade::Fair,
            _ => Grade::Poor,
        }
    }
}

impl std::fmt::Display for HealthScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Good => "Good",
            Grade::Fair => "Fair",
            Grade::Poor => "Poor",
        }
    }

    pub fn status(&self) -> StatusClass {
        match self {
            Grade::Excellent => StatusClass::Excellent,
            Grade::Good => StatusClass::Good,
            Grade::Fair => StatusClass::Fair,
            Grade::Poor => StatusClass::Poor,
        }
    }
}

/// Compute the score from a summary.
///
/// Starts at 50 and adds a contribution per present figure; absent figures
/// add nothing.
pub fn compute(summary: &DomainSummary) -> HealthScore {
    let mut score = BASE_SCORE;

    if let Some(bpm) = summary.heart_rate_avg() {
        score += if (60.0..=100.0).contains(&bpm) {
            20
        } else if (50.0..=110.0).contains(&bpm) {
            15
        } else {
            5
        };
    }

    if let Some(steps) = summary.avg_steps() {
        score += if steps >= 10_000.0 {
            20
        } else if steps >= 7_500.0 {
            15
        } else if steps >= 5_000.0 {
            10
        } else {
            5
        };
    }

    if let Some(hours) = summary.sleep_hours() {
        score += if (7.0..=8.0).contains(&hours) {
            20
        } else if (6.0..=9.0).contains(&hours) {
            15
        } else {
            5
        };
    }

    if let Some(pct) = summary.sleep_efficiency() {
        score += if pct >= 90.0 {
            10
        } else if pct >= 80.0 {
            7
        } else if pct >= 70.0 {
            5
        } else {
            0
        };
    }

    HealthScore(score.clamp(0, 100) as u8)
}
