//! Dump a stats file to stdout.
//!
//! Usage: cargo run --example dump_stats -- <file.gz>

use std::path::Path;

use rstats_decoder::{Decoder, DecoderConfig, RecordReport};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: dump_stats <file.gz>"))?;

    let decoded = Decoder::new().decode_file(Path::new(&path), &DecoderConfig::new())?;
    println!("format: {}, {} record(s)", decoded.format, decoded.records.len());

    for record in &decoded.records {
        let report = RecordReport::from_record(record);
        if let Some(ip) = &report.ip {
            println!("========== {} ==========", ip);
        }
        println!("---------- Daily ----------");
        for row in &report.daily.rows {
            println!("Date: {}, Down: {}, Up: {}", row.date, row.down, row.up);
        }
        println!("---------- Monthly ----------");
        for row in &report.monthly.rows {
            println!("Date: {}, Down: {}, Up: {}", row.date, row.down, row.up);
        }
    }
    Ok(())
}
