//! CSV importer that loads the four census tables into a [`RecordSnapshot`].

mod normalizer;
mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::workflows::prediction::domain::HouseholdId;
use crate::workflows::prediction::RecordSnapshot;
pub(crate) use normalizer::matching_key;
pub use normalizer::same_barangay;
use parser::ParseError;

pub const BARANGAYS_FILE: &str = "barangays.csv";
pub const CENSUS_FILE: &str = "census_submissions.csv";
pub const MEMBERS_FILE: &str = "household_members.csv";
pub const RULES_FILE: &str = "event_rules.csv";

#[derive(Debug)]
pub enum CensusImportError {
    Io(std::io::Error),
    Csv { table: &'static str, source: csv::Error },
    MissingTable { path: PathBuf },
    InvalidRecord {
        table: &'static str,
        line: u64,
        reason: String,
    },
}

impl std::fmt::Display for CensusImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CensusImportError::Io(err) => write!(f, "failed to read census export: {}", err),
            CensusImportError::Csv { table, source } => {
                write!(f, "invalid CSV data in {}: {}", table, source)
            }
            CensusImportError::MissingTable { path } => {
                write!(f, "census table not found: {}", path.display())
            }
            CensusImportError::InvalidRecord {
                table,
                line,
                reason,
            } => write!(f, "invalid row in {} at line {}: {}", table, line, reason),
        }
    }
}

impl std::error::Error for CensusImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CensusImportError::Io(err) => Some(err),
            CensusImportError::Csv { source, .. } => Some(source),
            CensusImportError::MissingTable { .. } | CensusImportError::InvalidRecord { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for CensusImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

fn table_error(table: &'static str) -> impl Fn(ParseError) -> CensusImportError {
    move |err| match err {
        ParseError::Csv(source) => CensusImportError::Csv { table, source },
        ParseError::Row(row) => CensusImportError::InvalidRecord {
            table,
            line: row.line,
            reason: row.reason,
        },
    }
}

pub struct CensusSnapshotImporter;

impl CensusSnapshotImporter {
    /// Load `barangays.csv`, `census_submissions.csv`, `household_members.csv` and
    /// `event_rules.csv` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<RecordSnapshot, CensusImportError> {
        let dir = dir.as_ref();
        let snapshot = Self::from_readers(
            open_table(dir, BARANGAYS_FILE)?,
            open_table(dir, CENSUS_FILE)?,
            open_table(dir, MEMBERS_FILE)?,
            open_table(dir, RULES_FILE)?,
        )?;

        info!(
            data_dir = %dir.display(),
            barangays = snapshot.barangays().len(),
            households = snapshot.census().len(),
            members = snapshot.members().len(),
            rules = snapshot.rules().len(),
            "loaded census snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_readers<B, C, M, R>(
        barangays: B,
        census: C,
        members: M,
        rules: R,
    ) -> Result<RecordSnapshot, CensusImportError>
    where
        B: Read,
        C: Read,
        M: Read,
        R: Read,
    {
        let barangays = parser::parse_barangays(barangays).map_err(table_error(BARANGAYS_FILE))?;
        let census = parser::parse_census(census).map_err(table_error(CENSUS_FILE))?;
        let members = parser::parse_members(members).map_err(table_error(MEMBERS_FILE))?;
        let rules = parser::parse_rules(rules).map_err(table_error(RULES_FILE))?;

        let known: HashSet<HouseholdId> = census.iter().map(|record| record.id).collect();
        let orphans = members
            .iter()
            .filter(|member| !member.household_id.is_some_and(|id| known.contains(&id)))
            .count();
        if orphans > 0 {
            warn!(orphans, "household members without a census submission are ignored");
        }

        Ok(RecordSnapshot::new(barangays, census, members, rules))
    }
}

fn open_table(dir: &Path, file: &str) -> Result<std::fs::File, CensusImportError> {
    let path = dir.join(file);
    match std::fs::File::open(&path) {
        Ok(handle) => Ok(handle),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(CensusImportError::MissingTable { path })
        }
        Err(err) => Err(err.into()),
    }
}
