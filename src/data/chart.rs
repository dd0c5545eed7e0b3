//! Sleep chart series.

use chrono::NaiveDate;
use pulsewatch_types::SleepNight;

/// Maximum number of nights shown on the chart.
pub const MAX_CHART_POINTS: usize = 7;

/// One bar of the sleep chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// Short weekday name ("Mon").
    pub label: String,
    pub hours: f64,
    pub efficiency_pct: f64,
}

/// Keep the most recent nights in ascending date order, labelled by weekday.
pub fn adapt(series: &[SleepNight]) -> Vec<ChartPoint> {
    let mut nights: Vec<&SleepNight> = series.iter().collect();
    nights.sort_by_key(|n| n.sleep_date);

    let skip = nights.len().saturating_sub(MAX_CHART_POINTS);
    nights
        .into_iter()
        .skip(skip)
        .map(|n| ChartPoint {
            date: n.sleep_date,
            label: n.sleep_date.format("%a").to_string(),
            hours: n.hours_asleep(),
            efficiency_pct: n.sleep_efficiency,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_seven_most_recent_ascending() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        // Newest first, as the service returns them.
        let series: Vec<SleepNight> = (0..30)
            .rev()
            .map(|d| SleepNight::new(start + chrono::Days::new(d), 400 + d as u32, 85.0))
            .collect();

        let points = adapt(&series);
        assert_eq!(points.len(), MAX_CHART_POINTS);
        assert_eq!(points[0].date, start + chrono::Days::new(23));
        assert_eq!(points[6].date, start + chrono::Days::new(29));
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn labels_are_short_weekdays() {
        // 2024-04-01 was a Monday.
        let monday = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let points = adapt(&[SleepNight::new(monday, 450, 91.0)]);
        assert_eq!(points[0].label, "Mon");
        assert_eq!(points[0].hours, 7.5);
        assert_eq!(points[0].efficiency_pct, 91.0);
    }

    #[test]
    fn short_and_empty_series() {
        assert!(adapt(&[]).is_empty());
        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let series = vec![SleepNight::new(day, 420, 80.0); 3];
        assert_eq!(adapt(&series).len(), 3);
    }
}
