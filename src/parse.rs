use crate::config::{MonthWindow, TechnicianConfig};
use crate::models::{ParseDiagnostics, SkipReason};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2})/(\d{2})/(\d{4})").expect("date pattern is valid")
});

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not locate the technician data section")]
    SectionNotFound,
}

#[derive(Debug)]
pub struct ParseOutcome {
    /// One dense day series per configured technician, index = day - 1.
    pub series: Vec<Vec<u32>>,
    pub diagnostics: ParseDiagnostics,
}

/// Scans a loosely structured CSV export for the technician data section and
/// reads it into dense per-day series. Rows outside the target month window,
/// rows without a recognizable date, and rows with too few fields are skipped
/// and recorded in the diagnostics; they are never fatal.
pub fn parse_sheet(
    text: &str,
    window: &MonthWindow,
    technicians: &[TechnicianConfig],
) -> Result<ParseOutcome, ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    debug!("scanning {} non-empty lines", lines.len());

    let header = locate_section(&lines, window, technicians)?;
    let days = window.days_in_month() as usize;
    let mut series = vec![vec![0u32; days]; technicians.len()];
    let mut diagnostics = ParseDiagnostics::default();

    let end = (header + 1 + days).min(lines.len());
    for (row, line) in lines[header + 1..end].iter().enumerate() {
        diagnostics.rows_seen += 1;
        let fields: Vec<String> = line
            .split(',')
            .map(|field| field.trim().replace('"', ""))
            .collect();

        if fields.len() < 1 + technicians.len() {
            diagnostics.skip(row + 1, SkipReason::TooFewFields);
            continue;
        }

        let Some(captures) = DATE_RE.captures(&fields[0]) else {
            diagnostics.skip(row + 1, SkipReason::NoDateMatch);
            continue;
        };
        // The pattern guarantees all three groups are digit runs.
        let day: u32 = captures[1].parse().unwrap_or(0);
        let month: u32 = captures[2].parse().unwrap_or(0);
        let year: i32 = captures[3].parse().unwrap_or(0);

        if month != window.month || year != window.year || day < 1 || day as usize > days {
            diagnostics.skip(row + 1, SkipReason::OutsideWindow);
            continue;
        }

        // Last write wins when the same date appears twice.
        for (tech, values) in series.iter_mut().enumerate() {
            values[day as usize - 1] = fields[1 + tech].parse().unwrap_or(0);
        }
        diagnostics.rows_applied += 1;
    }

    Ok(ParseOutcome {
        series,
        diagnostics,
    })
}

/// Finds the index of the header line that opens the data section. Primary
/// marker: a line naming both the date column and the first technician.
/// Secondary: any line carrying the target month's date fragment or the bare
/// year.
fn locate_section(
    lines: &[&str],
    window: &MonthWindow,
    technicians: &[TechnicianConfig],
) -> Result<usize, ParseError> {
    let tech_marker = technicians
        .first()
        .map(|tech| tech.key.to_lowercase())
        .unwrap_or_default();

    if let Some(index) = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        lower.contains("data") && lower.contains(&tech_marker)
    }) {
        return Ok(index);
    }

    let month_fragment = format!("/{:02}/{}", window.month, window.year);
    let year_fragment = window.year.to_string();
    lines
        .iter()
        .position(|line| line.contains(&month_fragment) || line.contains(&year_fragment))
        .ok_or(ParseError::SectionNotFound)
}
