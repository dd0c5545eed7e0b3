//! Device presence inferred from which series carry data.
//!
//! There is no device registry behind the dashboard service yet, so a device
//! is reported for each recognized series that has readings. Battery level
//! and last sync time come from the injected random source.

use chrono::{DateTime, Duration, Utc};
use pulsewatch_types::{Domain, RawSeries};
use rand::{Rng, RngCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Connected,
    Disconnected,
}

impl DeviceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Connected => "Connected",
            DeviceStatus::Disconnected => "Disconnected",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub name: &'static str,
    pub domain: Domain,
    pub status: DeviceStatus,
    pub battery_pct: u8,
    pub last_sync: DateTime<Utc>,
}

/// Series that map to a device, in display order.
const RECOGNIZED: [(Domain, &str); 2] = [
    (Domain::HeartRate, "Heart Rate Monitor"),
    (Domain::Sleep, "Sleep Tracker"),
];

/// One connected device per recognized, non-empty series.
pub fn resolve(series: &RawSeries, now: DateTime<Utc>, rng: &mut dyn RngCore) -> Vec<DeviceRecord> {
    RECOGNIZED
        .iter()
        .filter(|(domain, _)| series.has(*domain))
        .map(|&(domain, name)| DeviceRecord {
            name,
            domain,
            status: DeviceStatus::Connected,
            battery_pct: rng.gen_range(60..=100),
            last_sync: now - Duration::minutes(rng.gen_range(1..=30)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pulsewatch_types::{ActivityDay, HeartRateSample, SleepNight};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn heart_rate() -> HeartRateSample {
        HeartRateSample {
            timestamp: day().and_hms_opt(8, 0, 0).unwrap(),
            heart_rate: 70.0,
            device_id: None,
        }
    }

    #[test]
    fn one_device_per_recognized_series() {
        let mut rng = StdRng::seed_from_u64(7);

        assert!(resolve(&RawSeries::default(), now(), &mut rng).is_empty());

        let mut series = RawSeries::default();
        series.activity.push(ActivityDay::new(day(), 9000, 2000));
        // Activity alone has no device.
        assert!(resolve(&series, now(), &mut rng).is_empty());

        series.heart_rate.push(heart_rate());
        let devices = resolve(&series, now(), &mut rng);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Heart Rate Monitor");

        series.sleep.push(SleepNight::new(day(), 420, 88.0));
        let names: Vec<_> =
            resolve(&series, now(), &mut rng).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Heart Rate Monitor", "Sleep Tracker"]);
    }

    #[test]
    fn random_fields_stay_in_range() {
        let mut series = RawSeries::default();
        series.heart_rate.push(heart_rate());
        series.sleep.push(SleepNight::new(day(), 420, 88.0));

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            for device in resolve(&series, now(), &mut rng) {
                assert_eq!(device.status, DeviceStatus::Connected);
                assert!((60..=100).contains(&device.battery_pct));
                let age = now() - device.last_sync;
                assert!(age >= Duration::minutes(1) && age <= Duration::minutes(30));
            }
        }
    }

    #[test]
    fn same_seed_same_devices() {
        let mut series = RawSeries::default();
        series.heart_rate.push(heart_rate());
        let a = resolve(&series, now(), &mut StdRng::seed_from_u64(1));
        let b = resolve(&series, now(), &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
