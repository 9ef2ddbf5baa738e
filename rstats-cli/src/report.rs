//! Report rendering (text and JSON)
//!
//! The text layout follows the firmware's own stats dump: per-record
//! header, daily and monthly sections, pointer and marker fields, and a
//! recent-usage summary against a configurable cap.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use rstats_decoder::report::format_size;
use rstats_decoder::{DecodedFile, Format, RecordReport, UsageReport};

/// How many of the newest daily rows feed the usage summary
const RECENT_DAYS: usize = 30;

/// Rendering knobs shared by both output modes
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub json: bool,
    pub include_speed: bool,
    pub cap: u64,
}

/// Whole-file JSON payload
#[derive(Serialize)]
struct FileReport {
    format: Format,
    trailing_bytes: usize,
    records: Vec<RecordReport>,
}

pub fn render(decoded: &DecodedFile, opts: &RenderOptions) -> Result<String> {
    if opts.json {
        render_json(decoded, opts)
    } else {
        render_text(decoded, opts)
    }
}

fn build_reports(decoded: &DecodedFile, opts: &RenderOptions) -> Vec<RecordReport> {
    decoded
        .records
        .iter()
        .map(|record| {
            let report = RecordReport::from_record(record);
            if opts.include_speed {
                report.with_speed(record)
            } else {
                report
            }
        })
        .collect()
}

fn render_json(decoded: &DecodedFile, opts: &RenderOptions) -> Result<String> {
    let payload = FileReport {
        format: decoded.format,
        trailing_bytes: decoded.trailing_bytes,
        records: build_reports(decoded, opts),
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

fn render_text(decoded: &DecodedFile, opts: &RenderOptions) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "format: {} | {} record(s)", decoded.format, decoded.records.len())?;

    for (index, record) in decoded.records.iter().enumerate() {
        let report = RecordReport::from_record(record);
        match record.ip() {
            Some(ip) => writeln!(out, "\n========== {} ({}) ==========", ip, record.version)?,
            None => writeln!(out, "\n========== record {} ({}) ==========", index, record.version)?,
        }
        if let Some(updated) = &report.updated {
            writeln!(out, "updated: {}", updated)?;
        }

        writeln!(out, "---------- Daily ----------")?;
        write_usage(&mut out, &report.daily)?;
        writeln!(out, "dailyp: {}", record.daily_ptr)?;

        writeln!(out, "---------- Monthly ----------")?;
        write_usage(&mut out, &report.monthly)?;
        writeln!(out, "monthlyp: {}", record.monthly_ptr)?;

        if let (Some(tail), Some(sync)) = (record.tail, record.sync) {
            writeln!(out, "tail: {}, sync: {}", tail, sync)?;
        }

        if opts.include_speed && !record.speed.is_empty() {
            writeln!(out, "---------- RX/TX Speed ----------")?;
            writeln!(out, "Time,RX bytes,TX bytes")?;
            for sample in &record.speed {
                writeln!(out, "{},{},{}", sample.clock_label(), sample.rx, sample.tx)?;
            }
            if let (Some(rx), Some(tx)) = (record.last_rx, record.last_tx) {
                writeln!(out, "last: rx={}, tx={}", rx, tx)?;
            }
        }

        let total = report.daily.total_recent(RECENT_DAYS);
        writeln!(
            out,
            "last {} days: {} used ({:.1}% of {} cap)",
            RECENT_DAYS,
            format_size(total),
            report.daily.cap_usage(RECENT_DAYS, opts.cap),
            format_size(opts.cap)
        )?;
    }

    if decoded.trailing_bytes > 0 {
        writeln!(out, "\nwarning: {} trailing byte(s) left unread", decoded.trailing_bytes)?;
    }
    Ok(out)
}

fn write_usage(out: &mut String, report: &UsageReport) -> Result<()> {
    if report.is_empty() {
        writeln!(out, "(no data)")?;
    }
    for row in &report.rows {
        writeln!(out, "Date: {}, Down: {}, Up: {}", row.date, row.down, row.up)?;
    }
    Ok(())
}
