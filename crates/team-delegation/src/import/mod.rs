//! CSV roster import for the CLI and demo tooling.

mod parser;

use crate::delegation::{IntakeError, Member};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row {row}: {source}")]
    Member {
        row: usize,
        #[source]
        source: IntakeError,
    },
    #[error("roster row {row}: duplicate member name '{name}'")]
    Duplicate { row: usize, name: String },
}

/// Loads a roster from `name,performance,growth,skills,projects` CSV rows.
///
/// `skills` and `projects` hold `;`-separated `key:value` pairs.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Member>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Member>, RosterImportError> {
        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for (row, form) in parser::parse_rows(reader)? {
            let member = form
                .into_member()
                .map_err(|source| RosterImportError::Member { row, source })?;
            if !seen.insert(member.name().to_string()) {
                return Err(RosterImportError::Duplicate {
                    row,
                    name: member.name().to_string(),
                });
            }
            members.push(member);
        }

        Ok(members)
    }
}
