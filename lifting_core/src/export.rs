//! CSV export of a generated program.
//!
//! One row per prescribed set. Weight and percentage are left blank when
//! they are zero (accessories).

use crate::{PrescribedSet, Program, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name used when none is given
pub const DEFAULT_CSV_NAME: &str = "531_bbb.csv";

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Week")]
    week: u32,
    #[serde(rename = "Day")]
    day: u32,
    #[serde(rename = "Exercise")]
    exercise: &'a str,
    #[serde(rename = "Sets")]
    sets: u32,
    #[serde(rename = "Reps")]
    reps: &'a str,
    #[serde(rename = "Weight")]
    weight: String,
    #[serde(rename = "Percentage")]
    percentage: String,
}

impl<'a> CsvRow<'a> {
    fn new(week: u32, day: u32, set: &'a PrescribedSet) -> Self {
        CsvRow {
            week,
            day,
            exercise: &set.exercise,
            sets: set.sets,
            reps: &set.reps,
            weight: if set.weight > 0.0 {
                format!("{:.0}", set.weight)
            } else {
                String::new()
            },
            percentage: if set.percentage > 0.0 {
                format!("{:.0}%", set.percentage)
            } else {
                String::new()
            },
        }
    }
}

/// Normalize a user-supplied output name: empty means the default, and a
/// `.csv` suffix is added when missing.
pub fn output_path(name: Option<&str>) -> PathBuf {
    match name.map(str::trim) {
        None | Some("") => PathBuf::from(DEFAULT_CSV_NAME),
        Some(name) if name.ends_with(".csv") => PathBuf::from(name),
        Some(name) => PathBuf::from(format!("{}.csv", name)),
    }
}

/// Write the program as CSV to any writer
pub fn write_csv<W: Write>(program: &Program, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for day in &program.days {
        for set in &day.sets {
            writer.serialize(CsvRow::new(day.week, day.day, set))?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write the program to a CSV file, creating parent directories as needed
pub fn to_csv_file(program: &Program, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_csv(program, &file)?;
    file.sync_all()?;

    tracing::info!("Exported {} days to {:?}", program.days.len(), path);
    Ok(())
}
