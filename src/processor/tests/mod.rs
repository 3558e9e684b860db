//! Integration tests for the processor module
//!
//! Runs the complete pipeline over temporary directories of synthetic
//! country exports.

pub mod basic_processing;

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "Timestamp,GHI,DNI,DHI,ModA,ModB,WS,WSgust,RH,Tamb,BP,Cleaning,Precipitation,Comments";

/// Write `days` of hourly readings for one station, irradiance scaled by `scale`
pub fn write_station_csv(dir: &Path, file_name: &str, days: usize, scale: f64) -> PathBuf {
    let mut csv = String::from(HEADER);
    csv.push('\n');

    for row in 0..days * 24 {
        let day = 9 + row / 24;
        let hour = row % 24;
        let ghi = if (6..=18).contains(&hour) {
            scale * 900.0 * (std::f64::consts::PI * (hour as f64 - 6.0) / 12.0).sin()
        } else {
            -1.5
        };
        writeln!(
            csv,
            "2021-08-{:02} {:02}:00,{:.2},{:.2},{:.2},{:.2},{:.2},{:.1},{:.1},{},{},998,{},{},",
            day,
            hour,
            ghi,
            ghi * 0.7,
            ghi * 0.25,
            ghi * 0.95,
            ghi * 0.93,
            2.0 + (row % 5) as f64 * 0.3,
            3.0 + (row % 5) as f64 * 0.3,
            60 + row % 10,
            25 + hour % 6,
            u8::from(row % 100 == 0),
            if row % 50 == 0 { "0.5" } else { "0" },
        )
        .unwrap();
    }

    let path = dir.join(file_name);
    fs::write(&path, csv).unwrap();
    path
}

/// Input directory holding three countries' exports
pub fn create_country_exports(root: &Path) -> PathBuf {
    let input = root.join("data");
    fs::create_dir_all(&input).unwrap();
    write_station_csv(&input, "benin-malanville.csv", 3, 1.1);
    write_station_csv(&input, "sierraleone-bumbuna.csv", 3, 0.8);
    write_station_csv(&input, "togo-dapaong_qc.csv", 3, 1.0);
    input
}
