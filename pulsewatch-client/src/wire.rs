//! Wire format of the dashboard endpoint.
//!
//! The service returns `{summary, raw_data, last_updated}` where an empty
//! summary object (`{}`) means the domain had no data. These types accept
//! that shape and convert it into a [`DashboardSnapshot`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use pulsewatch_types::{
    ActivityDay, ActivitySummary, DashboardSnapshot, DomainSummary, HeartRateSample,
    HeartRateSummary, RawSeries, SleepNight, SleepSummary,
};

use crate::ClientError;

/// Timestamp layouts the service is known to emit.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Body of `GET /api/dashboard/{user_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardPayload {
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub summary: WireSummary,
    #[serde(default)]
    pub raw_data: WireRawData,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Summary block; each domain may be missing or an empty object.
#[derive(Debug, Default, Deserialize)]
pub struct WireSummary {
    #[serde(default)]
    pub heart_rate: Option<WireHeartRate>,
    #[serde(default)]
    pub activity: Option<WireActivity>,
    #[serde(default)]
    pub sleep: Option<WireSleep>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireHeartRate {
    #[serde(default, alias = "avg")]
    pub avg_heart_rate: Option<f64>,
    #[serde(default, alias = "min")]
    pub min_heart_rate: Option<f64>,
    #[serde(default, alias = "max")]
    pub max_heart_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireActivity {
    #[serde(default)]
    pub avg_steps: Option<f64>,
    #[serde(default)]
    pub avg_calories: Option<f64>,
    #[serde(default)]
    pub avg_active_minutes: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireSleep {
    #[serde(default, alias = "avg_sleep_duration_minutes")]
    pub avg_sleep_duration: Option<f64>,
    #[serde(default, alias = "avg_sleep_efficiency_pct")]
    pub avg_sleep_efficiency: Option<f64>,
}

/// Raw rows as stored by the service.
#[derive(Debug, Default, Deserialize)]
pub struct WireRawData {
    #[serde(default)]
    pub heart_rate: Vec<WireHeartRateRow>,
    #[serde(default)]
    pub activity: Vec<ActivityDay>,
    #[serde(default)]
    pub sleep: Vec<SleepNight>,
}

#[derive(Debug, Deserialize)]
pub struct WireHeartRateRow {
    pub timestamp: String,
    pub heart_rate: f64,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl DashboardPayload {
    /// Parse a payload from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClientError> {
        serde_json::from_slice(bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Convert into a snapshot for `user_id`.
    ///
    /// `fallback_time` is used when the payload carries no parseable
    /// `last_updated`.
    pub fn into_snapshot(self, user_id: u64, fallback_time: DateTime<Utc>) -> DashboardSnapshot {
        let fetched_at = self
            .last_updated
            .as_deref()
            .and_then(parse_datetime)
            .unwrap_or(fallback_time);

        let heart_rate = self
            .raw_data
            .heart_rate
            .into_iter()
            .filter_map(|row| match parse_timestamp(&row.timestamp) {
                Some(timestamp) => Some(HeartRateSample {
                    timestamp,
                    heart_rate: row.heart_rate,
                    device_id: row.device_id,
                }),
                None => {
                    tracing::debug!(timestamp = %row.timestamp, "skipping heart rate row");
                    None
                }
            })
            .collect();

        let raw_series = RawSeries {
            heart_rate,
            activity: self.raw_data.activity,
            sleep: self.raw_data.sleep,
        };

        DashboardSnapshot::builder(self.user_id.unwrap_or(user_id))
            .summary(self.summary.into_summary())
            .raw_series(raw_series)
            .fetched_at(fetched_at)
            .build()
    }
}

impl WireSummary {
    /// Convert, treating all-empty domain objects as absent.
    pub fn into_summary(self) -> DomainSummary {
        let heart_rate = self.heart_rate.and_then(|h| {
            let summary = HeartRateSummary {
                avg: h.avg_heart_rate,
                min: h.min_heart_rate,
                max: h.max_heart_rate,
            };
            (summary != HeartRateSummary::default()).then_some(summary)
        });
        let activity = self.activity.and_then(|a| {
            let summary = ActivitySummary {
                avg_steps: a.avg_steps,
                avg_calories: a.avg_calories,
                avg_active_minutes: a.avg_active_minutes,
            };
            (summary != ActivitySummary::default()).then_some(summary)
        });
        let sleep = self.sleep.and_then(|s| {
            let summary = SleepSummary {
                avg_sleep_duration_minutes: s.avg_sleep_duration,
                avg_sleep_efficiency_pct: s.avg_sleep_efficiency,
            };
            (summary != SleepSummary::default()).then_some(summary)
        });

        DomainSummary {
            heart_rate,
            activity,
            sleep,
        }
    }
}

/// Parse a naive timestamp in any of the layouts the service emits.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

/// Parse an RFC 3339 or naive timestamp; naive values are taken as UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| parse_timestamp(s).map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "user_id": 3,
        "summary": {
            "activity": {"avg_steps": 8547, "avg_calories": 2210.5, "avg_active_minutes": 41},
            "sleep": {"avg_sleep_duration": 450, "avg_sleep_efficiency": 82},
            "heart_rate": {}
        },
        "raw_data": {
            "heart_rate": [
                {"id": 1, "user_id": 3, "timestamp": "2024-05-02 08:15:00", "heart_rate": 71, "device_id": "band"},
                {"id": 2, "user_id": 3, "timestamp": "not a time", "heart_rate": 80}
            ],
            "activity": [
                {"id": 9, "activity_date": "2024-05-01", "total_steps": 8547, "calories": 2210, "very_active_minutes": 20, "fairly_active_minutes": 21}
            ],
            "sleep": [
                {"sleep_date": "2024-05-01", "total_minutes_asleep": 450, "sleep_efficiency": 82.0}
            ]
        },
        "last_updated": "2024-05-02T09:00:00.250000"
    }"#;

    fn fallback() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn parses_service_payload() {
        let payload = DashboardPayload::from_slice(SAMPLE.as_bytes()).unwrap();
        let snapshot = payload.into_snapshot(99, fallback());

        assert_eq!(snapshot.user_id, 3);
        assert!(!snapshot.degraded);
        assert_eq!(snapshot.summary.avg_steps(), Some(8547.0));
        assert_eq!(snapshot.summary.sleep_hours(), Some(7.5));
        assert_eq!(snapshot.summary.sleep_efficiency(), Some(82.0));
        // Empty object means absent.
        assert!(snapshot.summary.heart_rate.is_none());

        // The unparseable row is dropped.
        assert_eq!(snapshot.raw_series.heart_rate.len(), 1);
        assert_eq!(snapshot.raw_series.heart_rate[0].device_id.as_deref(), Some("band"));
        assert_eq!(snapshot.raw_series.activity[0].active_minutes(), 41);
        assert_eq!(snapshot.raw_series.sleep.len(), 1);

        assert_eq!(snapshot.fetched_at, Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap() + chrono::Duration::milliseconds(250));
    }

    #[test]
    fn missing_blocks_default_to_empty() {
        let payload = DashboardPayload::from_slice(b"{}").unwrap();
        let snapshot = payload.into_snapshot(5, fallback());
        assert_eq!(snapshot.user_id, 5);
        assert!(snapshot.summary.is_empty());
        assert!(snapshot.raw_series.is_empty());
        assert_eq!(snapshot.fetched_at, fallback());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = DashboardPayload::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn timestamp_layouts() {
        assert!(parse_timestamp("2024-05-02T08:15:00").is_some());
        assert!(parse_timestamp("2024-05-02 08:15:00.123456").is_some());
        assert!(parse_timestamp("2024-05-02T08:15:00+02:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn summary_aliases_accept_spec_style_keys() {
        let json = r#"{"heart_rate": {"avg": 64, "min": 51, "max": 130}}"#;
        let summary: WireSummary = serde_json::from_str(json).unwrap();
        let summary = summary.into_summary();
        assert_eq!(summary.heart_rate_avg(), Some(64.0));
        assert_eq!(summary.heart_rate.unwrap().max, Some(130.0));
    }
}
