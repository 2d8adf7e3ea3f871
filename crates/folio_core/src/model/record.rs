//! Record identity and the per-type contract used by content managers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static HTTP_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid url regex"));

/// Identifier of one record within its type's list.
///
/// Seed records use short numeric ids (`"1"`, `"2"`), so this stays a string
/// rather than a `Uuid`. Freshly generated ids are UUID v4 text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Field-level validation failure for a record about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyId,
    BlankField { field: &'static str },
    InvalidUrl { field: &'static str, value: String },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id cannot be empty"),
            Self::BlankField { field } => write!(f, "`{field}` cannot be blank"),
            Self::InvalidUrl { field, value } => {
                write!(f, "`{field}` must be an http(s) URL, got `{value}`")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// Contract every content type implements to be managed by
/// [`ContentManager`](crate::service::content_manager::ContentManager).
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Short plural name used in logs and CLI output (`projects`).
    const KIND: &'static str;
    /// Store key holding this type's JSON array.
    const STORAGE_KEY: &'static str;

    fn id(&self) -> &RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Seed list written when the store has no value for `STORAGE_KEY`.
    fn defaults() -> Vec<Self>;

    /// Checks field rules. Called on every write path.
    fn validate(&self) -> Result<(), RecordValidationError>;

    /// Canonicalizes free-form fields before validation. No-op by default.
    fn normalize(&mut self) {}
}

/// Records the dashboard can hide or pin to the page's initial view.
pub trait Showcase: Record {
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
    /// "Show in initial view".
    fn is_newest(&self) -> bool;
    fn set_newest(&mut self, newest: bool);
}

/// Shared check for required text fields.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), RecordValidationError> {
    if value.trim().is_empty() {
        return Err(RecordValidationError::BlankField { field });
    }
    Ok(())
}

pub(crate) fn require_http_url(
    field: &'static str,
    value: &str,
) -> Result<(), RecordValidationError> {
    if !HTTP_URL_RE.is_match(value) {
        return Err(RecordValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_id(id: &RecordId) -> Result<(), RecordValidationError> {
    if id.is_blank() {
        return Err(RecordValidationError::EmptyId);
    }
    Ok(())
}
