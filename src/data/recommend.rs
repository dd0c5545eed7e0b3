//! Recommendation rules.

use pulsewatch_types::{Domain, DomainSummary};

/// A single piece of advice shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub icon: &'static str,
    pub text: &'static str,
    /// Domain the advice was triggered by; `None` for general advice.
    pub domain: Option<Domain>,
}

impl Recommendation {
    const fn new(icon: &'static str, text: &'static str, domain: Option<Domain>) -> Self {
        Self { icon, text, domain }
    }
}

const HIGH_HEART_RATE: Recommendation = Recommendation::new(
    "♥",
    "Your average heart rate is elevated. Try breathing exercises and check in with a doctor if it stays high.",
    Some(Domain::HeartRate),
);

const LOW_HEART_RATE: Recommendation = Recommendation::new(
    "♥",
    "Your average heart rate is below 60 bpm. That is fine for athletes, but see a doctor if you feel dizzy or tired.",
    Some(Domain::HeartRate),
);

const MORE_STEPS: Recommendation = Recommendation::new(
    "⚑",
    "Aim for at least 7,500 steps a day. A short walk after meals adds up quickly.",
    Some(Domain::Activity),
);

const MORE_SLEEP: Recommendation = Recommendation::new(
    "☾",
    "You are sleeping less than 7 hours. Keep a consistent bedtime and avoid screens before bed.",
    Some(Domain::Sleep),
);

const LESS_SLEEP: Recommendation = Recommendation::new(
    "☾",
    "You are sleeping more than 9 hours. Oversleeping can point to poor sleep quality.",
    Some(Domain::Sleep),
);

/// General advice used when no rule fires.
pub const DEFAULT_RECOMMENDATIONS: [Recommendation; 3] = [
    Recommendation::new("≈", "Stay hydrated: drink water regularly through the day.", None),
    Recommendation::new("✿", "Eat a balanced diet with plenty of vegetables and protein.", None),
    Recommendation::new("○", "Take a few minutes each day for mindfulness or meditation.", None),
];

/// Derive recommendations in heart rate, activity, sleep order.
///
/// Each domain contributes at most one entry. The result is never empty.
pub fn recommend(summary: &DomainSummary) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if let Some(bpm) = summary.heart_rate_avg() {
        if bpm > 100.0 {
            recommendations.push(HIGH_HEART_RATE);
        } else if bpm < 60.0 {
            recommendations.push(LOW_HEART_RATE);
        }
    }

    if let Some(steps) = summary.avg_steps() {
        if steps < 7_500.0 {
            recommendations.push(MORE_STEPS);
        }
    }

    if let Some(hours) = summary.sleep_hours() {
        if hours < 7.0 {
            recommendations.push(MORE_SLEEP);
        } else if hours > 9.0 {
            recommendations.push(LESS_SLEEP);
        }
    }

    if recommendations.is_empty() {
        recommendations.extend(DEFAULT_RECOMMENDATIONS);
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_gets_default_triple() {
        let recs = recommend(&DomainSummary::new());
        assert_eq!(recs, DEFAULT_RECOMMENDATIONS.to_vec());
        assert!(recs.iter().all(|r| r.domain.is_none()));
    }

    #[test]
    fn healthy_summary_gets_default_triple() {
        let summary = DomainSummary::new()
            .with_heart_rate(72.0, 60.0, 110.0)
            .with_activity(8547.0, 2000.0, 30.0)
            .with_sleep(450.0, 82.0);
        assert_eq!(recommend(&summary).len(), 3);
        assert!(recommend(&summary).iter().all(|r| r.domain.is_none()));
    }

    #[test]
    fn breaches_come_in_priority_order() {
        let summary = DomainSummary::new()
            .with_sleep(300.0, 75.0)
            .with_activity(2000.0, 1500.0, 5.0)
            .with_heart_rate(110.0, 90.0, 140.0);
        let domains: Vec<_> = recommend(&summary).iter().map(|r| r.domain).collect();
        assert_eq!(
            domains,
            vec![Some(Domain::HeartRate), Some(Domain::Activity), Some(Domain::Sleep)]
        );
    }

    #[test]
    fn one_entry_per_domain() {
        let summary = DomainSummary::new().with_heart_rate(45.0, 40.0, 50.0);
        let recs = recommend(&summary);
        assert_eq!(recs, vec![LOW_HEART_RATE]);

        let summary = DomainSummary::new().with_sleep(600.0, 90.0);
        assert_eq!(recommend(&summary), vec![LESS_SLEEP]);
    }

    #[test]
    fn boundaries_do_not_fire() {
        let summary = DomainSummary::new()
            .with_heart_rate(60.0, 60.0, 60.0)
            .with_activity(7_500.0, 0.0, 0.0)
            .with_sleep(540.0, 90.0);
        assert!(recommend(&summary).iter().all(|r| r.domain.is_none()));
    }
}
