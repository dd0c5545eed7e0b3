//! Per-domain status classification.
//!
//! Every function here is pure: the same figure always yields the same
//! [`Assessment`]. Statuses are recomputed on demand and never stored.

use pulsewatch_types::DomainSummary;

/// Classification attached to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Low,
    Normal,
    High,
    Good,
    Excellent,
    Fair,
    Poor,
    Warning,
    Critical,
}

impl StatusClass {
    /// Health level used to pick a display tone.
    pub fn health(&self) -> HealthLevel {
        match self {
            StatusClass::Normal | StatusClass::Good | StatusClass::Excellent => HealthLevel::Healthy,
            StatusClass::Low | StatusClass::High | StatusClass::Fair | StatusClass::Warning => {
                HealthLevel::Warning
            }
            StatusClass::Poor | StatusClass::Critical => HealthLevel::Critical,
        }
    }
}

/// Coarse health level for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthLevel {
    Healthy,
    Warning,
    Critical,
}

/// A display label paired with the status that drives its tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub label: &'static str,
    pub status: StatusClass,
}

impl Assessment {
    const fn new(label: &'static str, status: StatusClass) -> Self {
        Self { label, status }
    }
}

/// Systolic/diastolic pair in mmHg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl std::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Heart rate: below 60 is low, above 100 is high.
pub fn heart_rate(avg_bpm: f64) -> Assessment {
    if avg_bpm < 60.0 {
        Assessment::new("Low", StatusClass::Warning)
    } else if avg_bpm > 100.0 {
        Assessment::new("High", StatusClass::Warning)
    } else {
        Assessment::new("Normal", StatusClass::Normal)
    }
}

/// Sleep duration in hours.
pub fn sleep_duration(hours: f64) -> Assessment {
    if hours < 6.0 {
        Assessment::new("Too Little", StatusClass::Warning)
    } else if hours > 9.0 {
        Assessment::new("Too Much", StatusClass::Warning)
    } else if (7.0..=8.0).contains(&hours) {
        Assessment::new("Excellent", StatusClass::Excellent)
    } else {
        Assessment::new("Good", StatusClass::Normal)
    }
}

/// Sleep efficiency percentage.
pub fn sleep_efficiency(pct: f64) -> Assessment {
    if pct >= 90.0 {
        Assessment::new("Excellent", StatusClass::Excellent)
    } else if pct >= 80.0 {
        Assessment::new("Good", StatusClass::Normal)
    } else if pct >= 70.0 {
        Assessment::new("Fair", StatusClass::Warning)
    } else {
        Assessment::new("Poor", StatusClass::Critical)
    }
}

/// Blood pressure: high wins over low when both bounds are crossed.
pub fn blood_pressure(bp: BloodPressure) -> Assessment {
    if bp.systolic >= 140 || bp.diastolic >= 90 {
        Assessment::new("High", StatusClass::Warning)
    } else if bp.systolic < 90 || bp.diastolic < 60 {
        Assessment::new("Low", StatusClass::Warning)
    } else {
        Assessment::new("Normal", StatusClass::Normal)
    }
}

/// Placeholder reading derived from average heart rate.
///
/// There is no blood pressure feed yet; this maps 70 bpm to 120/80 and
/// moves both values with heart rate so the card has something stable to
/// show.
pub fn estimate_blood_pressure(avg_bpm: f64) -> BloodPressure {
    let delta = avg_bpm - 70.0;
    let systolic = (120.0 + delta * 0.5).round().clamp(70.0, 200.0);
    let diastolic = (80.0 + delta * 0.3).round().clamp(40.0, 130.0);
    BloodPressure {
        systolic: systolic as u16,
        diastolic: diastolic as u16,
    }
}

/// Assessments for every metric that has a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainStatuses {
    pub heart_rate: Option<Assessment>,
    pub sleep_duration: Option<Assessment>,
    pub sleep_efficiency: Option<Assessment>,
    pub blood_pressure: Option<(BloodPressure, Assessment)>,
}

impl DomainStatuses {
    /// Classify every present figure of a summary.
    pub fn evaluate(summary: &DomainSummary) -> Self {
        let avg_bpm = summary.heart_rate_avg();
        Self {
            heart_rate: avg_bpm.map(heart_rate),
            sleep_duration: summary.sleep_hours().map(sleep_duration),
            sleep_efficiency: summary.sleep_efficiency().map(sleep_efficiency),
            blood_pressure: avg_bpm.map(|bpm| {
                let bp = estimate_blood_pressure(bpm);
                (bp, blood_pressure(bp))
            }),
        }
    }

    /// Worst health level among the present assessments.
    pub fn worst(&self) -> Option<HealthLevel> {
        [
            self.heart_rate,
            self.sleep_duration,
            self.sleep_efficiency,
            self.blood_pressure.map(|(_, a)| a),
        ]
        .into_iter()
        .flatten()
        .map(|a| a.status.health())
        .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_rate_boundaries() {
        assert_eq!(heart_rate(59.0).label, "Low");
        assert_eq!(heart_rate(60.0).label, "Normal");
        assert_eq!(heart_rate(100.0).label, "Normal");
        assert_eq!(heart_rate(101.0).label, "High");
        assert_eq!(heart_rate(101.0).status, StatusClass::Warning);
    }

    #[test]
    fn sleep_duration_bands() {
        assert_eq!(sleep_duration(5.9).label, "Too Little");
        assert_eq!(sleep_duration(6.5), Assessment::new("Good", StatusClass::Normal));
        assert_eq!(sleep_duration(7.0).status, StatusClass::Excellent);
        assert_eq!(sleep_duration(8.0).status, StatusClass::Excellent);
        assert_eq!(sleep_duration(8.5).label, "Good");
        assert_eq!(sleep_duration(9.0).label, "Good");
        assert_eq!(sleep_duration(9.1).label, "Too Much");
    }

    #[test]
    fn sleep_efficiency_bands() {
        assert_eq!(sleep_efficiency(90.0).status, StatusClass::Excellent);
        assert_eq!(sleep_efficiency(85.0).label, "Good");
        assert_eq!(sleep_efficiency(70.0).status, StatusClass::Warning);
        assert_eq!(sleep_efficiency(69.9), Assessment::new("Poor", StatusClass::Critical));
    }

    #[test]
    fn blood_pressure_bands() {
        let bp = |systolic, diastolic| BloodPressure { systolic, diastolic };
        assert_eq!(blood_pressure(bp(140, 80)).label, "High");
        assert_eq!(blood_pressure(bp(120, 90)).label, "High");
        assert_eq!(blood_pressure(bp(89, 70)).label, "Low");
        assert_eq!(blood_pressure(bp(110, 59)).label, "Low");
        assert_eq!(blood_pressure(bp(120, 80)).label, "Normal");
        assert_eq!(blood_pressure(bp(150, 50)).label, "High");
    }

    #[test]
    fn estimate_is_deterministic() {
        assert_eq!(estimate_blood_pressure(70.0), BloodPressure { systolic: 120, diastolic: 80 });
        assert_eq!(estimate_blood_pressure(72.0), estimate_blood_pressure(72.0));
        assert!(estimate_blood_pressure(150.0).systolic >= 140);
    }

    #[test]
    fn evaluate_skips_absent_domains() {
        let statuses = DomainStatuses::evaluate(&DomainSummary::new().with_sleep(450.0, 82.0));
        assert!(statuses.heart_rate.is_none());
        assert!(statuses.blood_pressure.is_none());
        assert_eq!(statuses.sleep_duration.unwrap().label, "Excellent");
        assert_eq!(statuses.sleep_efficiency.unwrap().label, "Good");
        assert_eq!(statuses.worst(), Some(HealthLevel::Healthy));

        assert_eq!(DomainStatuses::evaluate(&DomainSummary::new()).worst(), None);
    }
}
