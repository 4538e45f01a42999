//! Seeding import: ranked contestants from CSV (as exported by group-stage standings).
//!
//! Expected layout, header required, one row per contestant:
//!
//! ```text
//! rank,participant_1,participant_2
//! 1,6f1c...,a03e...
//! 2,...
//! ```
//!
//! Any number of participant columns is allowed; empty cells are skipped.

use crate::models::{BracketError, Contestant, ParticipantId};
use std::collections::BTreeMap;
use std::io::Read;

/// Parse ranked contestants from CSV, ordered best-to-worst.
/// Ranks need not be contiguous but must be unique.
pub fn parse_seeding_csv<R: Read>(reader: R) -> Result<Vec<Contestant>, BracketError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut ranked: BTreeMap<u32, Contestant> = BTreeMap::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| BracketError::InvalidInput(format!("CSV: {}", e)))?;
        let row = line + 2;
        let rank: u32 = record
            .get(0)
            .unwrap_or_default()
            .parse()
            .map_err(|_| BracketError::InvalidInput(format!("row {}: rank is not a number", row)))?;

        let members = record
            .iter()
            .skip(1)
            .filter(|cell| !cell.is_empty())
            .map(|cell| {
                cell.parse::<ParticipantId>().map_err(|_| {
                    BracketError::InvalidInput(format!("row {}: '{}' is not a participant id", row, cell))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if ranked.insert(rank, Contestant::new(members)).is_some() {
            return Err(BracketError::InvalidInput(format!("rank {} listed twice", rank)));
        }
    }

    log::debug!("Parsed {} ranked contestants from CSV", ranked.len());
    Ok(ranked.into_values().collect())
}
