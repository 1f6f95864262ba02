//! Append-only log of leads who asked to keep their calculation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Error as SerdeError, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::domain::{CostInput, CostResult};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "Sparesharing";
const APP_NAME: &str = "LandedCost";
const LEADS_FILE: &str = "leads.json";

/// Contact details from the form, plus the storage consent checkbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadContact {
    pub email: String,
    pub company: String,
    pub consent: bool,
}

impl Default for LeadContact {
    fn default() -> Self {
        Self {
            email: String::new(),
            company: String::new(),
            consent: true,
        }
    }
}

impl LeadContact {
    /// A lead is stored only with consent and an email address.
    pub fn should_record(&self) -> bool {
        self.consent && !self.email.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadResult {
    pub total_landed: f64,
    pub unit_landed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: Uuid,
    /// UTC, RFC 3339 with a `Z` suffix.
    pub timestamp: String,
    pub email: String,
    pub company: String,
    pub input: CostInput,
    pub result: LeadResult,
}

impl LeadRecord {
    pub fn new(contact: &LeadContact, input: &CostInput, result: &CostResult) -> Self {
        Self::at(OffsetDateTime::now_utc(), contact, input, result)
    }

    pub fn at(
        timestamp: OffsetDateTime,
        contact: &LeadContact,
        input: &CostInput,
        result: &CostResult,
    ) -> Self {
        let timestamp = timestamp
            .to_offset(time::UtcOffset::UTC)
            .format(&Rfc3339)
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            timestamp,
            email: contact.email.trim().to_string(),
            company: contact.company.trim().to_string(),
            input: input.clone(),
            result: LeadResult {
                total_landed: result.total,
                unit_landed: result.unit_cost,
            },
        }
    }
}

/// `leads.json` in the platform data directory.
pub fn default_lead_log_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).map(|dirs| dirs.data_dir().join(LEADS_FILE))
}

/// Reads every stored lead in the current record shape.
pub fn load_leads(path: &Path) -> Result<Vec<LeadRecord>, LeadLogError> {
    match fs::read_to_string(path) {
        Ok(data) if data.trim().is_empty() => Ok(Vec::new()),
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Appends one record and returns the number of stored entries.
///
/// Existing entries are kept as they are, whatever their shape. A file that
/// is not a JSON array is left untouched and reported as an error.
pub fn append_lead(path: &Path, record: &LeadRecord) -> Result<usize, LeadLogError> {
    let mut entries: Vec<Value> = match fs::read_to_string(path) {
        Ok(data) if data.trim().is_empty() => Vec::new(),
        Ok(data) => serde_json::from_str(&data)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(err.into()),
    };
    entries.push(serde_json::to_value(record)?);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&entries)?;
    write_replacing(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), count = entries.len(), "lead stored");
    Ok(entries.len())
}

// Writes next to the target, then renames over it.
fn write_replacing(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = fs::write(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

#[derive(Debug, thiserror::Error)]
pub enum LeadLogError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
