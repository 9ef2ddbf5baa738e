//! Usage report extraction
//!
//! Turns decoded rings into the rows downstream consumers (tables, charts,
//! JSON export) want: sentinel slots dropped, stored order preserved, byte
//! counts labelled with short binary-unit strings.

use serde::Serialize;

use crate::schema::Version;
use crate::types::{Record, SpeedSample, UsageEntry};

/// Default usage cap for summary lines: 1 TB
pub const DEFAULT_USAGE_CAP: u64 = 1_000_000_000_000;

/// One reportable usage row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRow {
    /// Calendar date label, "YYYY/MM/DD"
    pub date: String,
    /// Short-form download size, e.g. "1.0MiB"
    pub down: String,
    /// Raw downloaded bytes
    pub down_bytes: u64,
    /// Short-form upload size
    pub up: String,
    /// Raw uploaded bytes
    pub up_bytes: u64,
}

/// A usage series with sentinel slots filtered out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    pub rows: Vec<UsageRow>,
}

impl UsageReport {
    /// Build a report from ring entries, dropping unpopulated slots and
    /// preserving the stored order of the rest
    pub fn from_entries(entries: &[UsageEntry]) -> Self {
        let rows = entries
            .iter()
            .filter(|entry| !entry.is_sentinel())
            .map(|entry| UsageRow {
                date: entry.date.to_string(),
                down: format_size(entry.download),
                down_bytes: entry.download,
                up: format_size(entry.upload),
                up_bytes: entry.upload,
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Downloaded bytes summed over the most recent `days` rows
    pub fn total_recent(&self, days: usize) -> u64 {
        let skip = self.rows.len().saturating_sub(days);
        self.rows.iter().skip(skip).map(|row| row.down_bytes).sum()
    }

    /// Recent download total as a percentage of a usage cap
    pub fn cap_usage(&self, days: usize, cap_bytes: u64) -> f64 {
        if cap_bytes == 0 {
            return 0.0;
        }
        self.total_recent(days) as f64 / cap_bytes as f64 * 100.0
    }
}

/// One reportable speed row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeedRow {
    /// Wall-clock label of the 2-minute interval, "HH:MM"
    pub time: String,
    pub rx: u64,
    pub tx: u64,
}

impl SpeedRow {
    fn from_sample(sample: &SpeedSample) -> Self {
        Self {
            time: sample.clock_label(),
            rx: sample.rx,
            tx: sample.tx,
        }
    }
}

/// Report over one decoded record
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    /// Source IP (extended records only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub version: Version,
    /// Last firmware update of the record, RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    pub daily: UsageReport,
    pub monthly: UsageReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Vec<SpeedRow>>,
}

impl RecordReport {
    /// Build the usage report for a record, without the speed table
    pub fn from_record(record: &Record) -> Self {
        Self {
            ip: record.ip(),
            version: record.version,
            updated: record.updated_at().map(|ts| ts.to_rfc3339()),
            daily: UsageReport::from_entries(&record.daily),
            monthly: UsageReport::from_entries(&record.monthly),
            speed: None,
        }
    }

    /// Builder method: include the 2-minute speed table
    pub fn with_speed(mut self, record: &Record) -> Self {
        self.speed = Some(record.speed.iter().map(SpeedRow::from_sample).collect());
        self
    }
}

/// Short-form binary size label: "512.0B", "2.0KiB", "1.0MiB", ...
pub fn format_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"] {
        if num < 1024.0 {
            return format!("{:.1}{}B", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}YiB", num)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::PackedDate;
    use crate::testutil::pack_date;

    fn entry(raw_date: u64, download: u64, upload: u64) -> UsageEntry {
        UsageEntry {
            date: PackedDate::decode(raw_date),
            download,
            upload,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0B");
        assert_eq!(format_size(512), "512.0B");
        assert_eq!(format_size(2048), "2.0KiB");
        assert_eq!(format_size(1_048_576), "1.0MiB");
        assert_eq!(format_size(1_610_612_736), "1.5GiB");
        assert_eq!(format_size(u64::MAX), "16.0EiB");
    }

    #[test]
    fn test_sentinels_dropped_order_preserved() {
        let entries = vec![
            entry(0, 999, 999),
            entry(pack_date(2024, 3, 14), 100, 10),
            entry(0, 999, 999),
            entry(pack_date(2024, 3, 15), 200, 20),
        ];
        let report = UsageReport::from_entries(&entries);
        assert_eq!(report.len(), 2);
        assert_eq!(report.rows[0].date, "2024/03/14");
        assert_eq!(report.rows[1].date, "2024/03/15");
        assert_eq!(report.rows[1].down, "200.0B");
        assert_eq!(report.rows[1].down_bytes, 200);
    }

    #[test]
    fn test_all_sentinels_yield_empty_report() {
        let entries = vec![entry(0, 1, 1); 25];
        assert!(UsageReport::from_entries(&entries).is_empty());
    }

    #[test]
    fn test_total_recent_takes_newest_rows() {
        let entries: Vec<_> = (1..=40u16)
            .map(|day| entry(pack_date(2024, 3, day.min(31)), day as u64, 0))
            .collect();
        let report = UsageReport::from_entries(&entries);
        // last 30 of 40 rows: days 11..=40
        assert_eq!(report.total_recent(30), (11..=40u64).sum::<u64>());
        // more days than rows: everything
        assert_eq!(report.total_recent(100), (1..=40u64).sum::<u64>());
    }

    #[test]
    fn test_cap_usage_percentage() {
        let entries = vec![entry(pack_date(2024, 3, 15), 500_000_000_000, 0)];
        let report = UsageReport::from_entries(&entries);
        let usage = report.cap_usage(30, DEFAULT_USAGE_CAP);
        assert!((usage - 50.0).abs() < 1e-9);
        assert_eq!(report.cap_usage(30, 0), 0.0);
    }
}
