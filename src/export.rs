//! CSV export of a user's health data.
//!
//! The service renders the CSV; without a service the raw series of the
//! current snapshot is rendered locally. Either way the file is written to a
//! temporary file in the target directory and renamed into place, so a
//! failed export never leaves a partial file behind.

use std::fmt;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pulsewatch_client::HealthApiClient;
use pulsewatch_types::RawSeries;

/// `health-data-<YYYY-MM-DD>.csv`
pub fn file_name(date: NaiveDate) -> String {
    format!("health-data-{}.csv", date.format("%Y-%m-%d"))
}

/// Write `bytes` to `dir/name` atomically.
pub fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let target = dir.join(name);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}

/// Render the raw series as CSV, one section per domain.
pub fn render_csv(series: &RawSeries) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_csv(&mut out, series)?;
    Ok(out)
}

fn write_csv(out: &mut impl fmt::Write, series: &RawSeries) -> fmt::Result {
    writeln!(out, "Heart Rate Data")?;
    writeln!(out, "timestamp,heart_rate,device_id")?;
    for s in &series.heart_rate {
        writeln!(
            out,
            "{},{},{}",
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            s.heart_rate,
            s.device_id.as_deref().unwrap_or("")
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Activity Data")?;
    writeln!(
        out,
        "activity_date,total_steps,total_distance,very_active_minutes,fairly_active_minutes,lightly_active_minutes,sedentary_minutes,calories"
    )?;
    for a in &series.activity {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            a.activity_date,
            a.total_steps,
            a.total_distance,
            a.very_active_minutes,
            a.fairly_active_minutes,
            a.lightly_active_minutes,
            a.sedentary_minutes,
            a.calories
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Sleep Data")?;
    writeln!(
        out,
        "sleep_date,total_sleep_records,total_minutes_asleep,total_time_in_bed,sleep_efficiency"
    )?;
    for n in &series.sleep {
        writeln!(
            out,
            "{},{},{},{},{}",
            n.sleep_date,
            n.total_sleep_records,
            n.total_minutes_asleep,
            n.total_time_in_bed,
            n.sleep_efficiency
        )?;
    }
    Ok(())
}

/// Download the service's export for `user_id` into `dir`.
pub async fn export_remote(
    client: &HealthApiClient,
    user_id: u64,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let bytes = client
        .export_csv(user_id)
        .await
        .context("Export request failed")?;
    let path = write_atomic(dir, &file_name(date), &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(path)
}

/// Render `series` locally into `dir`.
pub fn export_local(series: &RawSeries, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    let path = write_atomic(dir, &file_name(date), render_csv(series)?.as_bytes())?;
    tracing::info!(path = %path.display(), "local export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsewatch_types::{ActivityDay, SleepNight};
    use std::time::Duration;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 7).unwrap()
    }

    #[test]
    fn file_name_uses_iso_date() {
        assert_eq!(file_name(date()), "health-data-2024-06-07.csv");
    }

    #[test]
    fn local_export_writes_all_sections() {
        let dir = TempDir::new().unwrap();
        let mut series = RawSeries::default();
        series.activity.push(ActivityDay::new(date(), 8547, 2100));
        series.sleep.push(SleepNight::new(date(), 450, 82.0));

        let path = export_local(&series, dir.path(), date()).unwrap();
        assert_eq!(path, dir.path().join("health-data-2024-06-07.csv"));

        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.contains("Heart Rate Data"));
        assert!(csv.contains("2024-06-07,8547,"));
        assert!(csv.contains("2024-06-07,1,450,"));
    }

    #[test]
    fn empty_series_renders_headers_only() {
        let csv = render_csv(&RawSeries::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Heart Rate Data");
        assert_eq!(lines[1], "timestamp,heart_rate,device_id");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Activity Data");
        assert_eq!(lines[6], "Sleep Data");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        write_atomic(dir.path(), "out.csv", b"old").unwrap();
        write_atomic(dir.path(), "out.csv", b"new").unwrap();
        assert_eq!(std::fs::read(dir.path().join("out.csv")).unwrap(), b"new");
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(write_atomic(&missing, "out.csv", b"x").is_err());
    }

    #[tokio::test]
    async fn failed_download_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let client = HealthApiClient::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        assert!(export_remote(&client, 1, dir.path(), date()).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
