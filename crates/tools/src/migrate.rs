// Copyright (c) 2024 Mike Tsao

//! Migrates `.vox` charts from format version 10 to 12.
//!
//! Version 12 stores laser positions as fractions on a 1/32 grid rather than
//! 0..=127 integers, and its laser rows carry two more columns than version
//! 10's. Only the `#FORMAT VERSION` block and the `#TRACK1` and `#TRACK8`
//! laser blocks change; every other line is copied as is.

use anyhow::Context;
use std::path::{Path, PathBuf};
use voxcurve::CurveError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Block {
    #[default]
    Other,
    FormatVersion,
    Laser,
}

/// Maps a version-10 laser value (0..=127) to its version-12 fraction.
pub fn convert_laser_value(value: u32) -> f64 {
    let value = if (1..63).contains(&value) {
        129 - value
    } else {
        value
    };
    (value as f64 * 32.0 / 127.0).round() / 32.0
}

/// Migrates the lines of a chart. Returns the migrated lines, each ending in a
/// newline.
pub fn migrate_lines<I, S>(lines: I) -> Result<Vec<String>, CurveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut block = Block::Other;
    let mut format_version = None;
    let mut migrated = Vec::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();
        match trimmed {
            "#FORMAT VERSION" => block = Block::FormatVersion,
            "#TRACK1" | "#TRACK8" => block = Block::Laser,
            "#END" => block = Block::Other,
            _ => {}
        }

        let output = match block {
            Block::FormatVersion
                if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) =>
            {
                let version: u32 = trimmed.parse().map_err(|_| CurveError::RowFormat {
                    line: index + 1,
                    reason: format!("format version \"{trimmed}\" is too large"),
                })?;
                format_version = Some(version);
                if version == 10 {
                    "12".to_string()
                } else {
                    line.to_string()
                }
            }
            Block::Laser => migrate_laser_row(line, format_version)
                .map_err(|e| e.at_line(index + 1))?
                .unwrap_or_else(|| line.to_string()),
            _ => line.to_string(),
        };
        migrated.push(output + "\n");
    }
    Ok(migrated)
}

fn looks_numeric(field: &str) -> bool {
    let digits = field.replacen('.', "", 1);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// Returns None for lines in a laser block that aren't laser rows.
fn migrate_laser_row(
    line: &str,
    format_version: Option<u32>,
) -> Result<Option<String>, CurveError> {
    let mut fields: Vec<String> = line.split('\t').map(str::to_string).collect();
    if fields.len() < 2 || !looks_numeric(&fields[1]) {
        return Ok(None);
    }
    if format_version == Some(10) {
        let value: u32 = fields[1].parse().map_err(|_| CurveError::RowFormat {
            line: 0,
            reason: format!("version 10 laser value \"{}\" isn't an integer", fields[1]),
        })?;
        fields[1] = format!("{:.6}", convert_laser_value(value));
    }
    let last = fields.len() - 1;
    fields.insert(last, "0".to_string());
    if let Some(last) = fields.last_mut() {
        *last = last.trim().to_string();
    }
    fields.push("0".to_string());
    Ok(Some(fields.join("\t")))
}

/// Where [migrate_file()] writes its output: `name_processed.vox` next to the
/// input.
pub fn migrated_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_processed.vox"))
}

/// Migrates the chart at `path` and returns where the result went.
pub fn migrate_file(path: &Path) -> anyhow::Result<PathBuf> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;
    let lines = migrate_lines(text.lines())
        .with_context(|| format!("while migrating {}", path.display()))?;
    let output_path = migrated_path(path);
    std::fs::write(&output_path, lines.concat())
        .with_context(|| format!("couldn't write {}", output_path.display()))?;
    log::info!("{} migrated to {}", path.display(), output_path.display());
    Ok(output_path)
}
