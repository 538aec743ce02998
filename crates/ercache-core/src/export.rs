//! CSV export of flat records.
//!
//! Column order is fixed: `precinct,contest,candidate,votes,percentage`.
//! Contest names routinely contain commas ("MEMBER, HOUSE OF
//! REPRESENTATIVES ..."), so fields are quoted when needed.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::Path;

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::models::FlatRecord;

pub const HEADER: [&str; 5] = ["precinct", "contest", "candidate", "votes", "percentage"];

const SEP: char = ',';

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{}", SEP)?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Write a header line and one row per record.
pub fn write_records<W: Write>(mut w: W, records: &[FlatRecord]) -> io::Result<()> {
    write_row(&mut w, &HEADER)?;
    for r in records {
        let votes = r.votes.to_string();
        // `{:?}` keeps the decimal point on whole values ("50.0", not "50")
        let percentage = format!("{:?}", r.percentage);
        write_row(
            &mut w,
            &[
                r.precinct.as_str(),
                r.contest.as_str(),
                r.candidate.as_str(),
                votes.as_str(),
                percentage.as_str(),
            ],
        )?;
    }
    w.flush()
}

pub fn write_csv_file(path: &Path, records: &[FlatRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::filesystem(parent, e))?;
    }
    let file = fs::File::create(path).map_err(|e| PipelineError::filesystem(path, e))?;
    write_records(BufWriter::new(file), records).map_err(|e| PipelineError::filesystem(path, e))?;
    info!(path = %path.display(), rows = records.len(), "Wrote CSV");
    Ok(())
}

/// Split CSV text into rows of fields (quotes and CRLF tolerant).
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            c if c == SEP && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// Parse CSV text produced by [`write_records`]. `origin` names the source in
/// errors.
pub fn read_records(origin: &str, text: &str) -> Result<Vec<FlatRecord>> {
    let mut rows = parse_rows(text).into_iter();

    match rows.next() {
        Some(header) if header == HEADER => {}
        Some(header) => {
            return Err(PipelineError::decode(origin, format!("unexpected header {:?}", header)))
        }
        None => return Ok(Vec::new()),
    }

    rows.enumerate()
        .map(|(i, row)| {
            let line = i + 2;
            let [precinct, contest, candidate, votes, percentage]: [String; 5] =
                row.try_into().map_err(|row: Vec<String>| {
                    PipelineError::decode(origin, format!("line {}: expected 5 fields, got {}", line, row.len()))
                })?;
            Ok(FlatRecord {
                precinct,
                contest,
                candidate,
                votes: votes
                    .parse()
                    .map_err(|e| PipelineError::decode(origin, format!("line {}: votes: {}", line, e)))?,
                percentage: percentage
                    .parse()
                    .map_err(|e| PipelineError::decode(origin, format!("line {}: percentage: {}", line, e)))?,
            })
        })
        .collect()
}

pub fn read_csv_file(path: &Path) -> Result<Vec<FlatRecord>> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::filesystem(path, e))?;
    read_records(&path.display().to_string(), &text)
}
