use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the owning entity whose related records are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentKey(String);

impl ParentKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParentKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Backend-shaped related record, as returned by the fetch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Amount", default)]
    pub amount: Option<f64>,
    #[serde(rename = "StageName", default)]
    pub stage_name: String,
    #[serde(rename = "CloseDate", default)]
    pub close_date: Option<String>,
    #[serde(rename = "MainCompetitors__c", default)]
    pub main_competitors: Option<String>,
    /// Win probability as sent by the backend (e.g. `0.5` or `50`).
    #[serde(rename = "Probability", default)]
    pub probability: Option<f64>,
}

/// Presentation-only projection of a [`RawRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub name: String,
    pub link_url: String,
    pub amount: Option<f64>,
    pub stage_name: String,
    pub close_date: Option<String>,
    pub main_competitors: Option<String>,
    pub probability_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Latest outcome of a related-records fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Loading,
    Success(Vec<RawRecord>),
    Failure(ErrorDetail),
}

impl QueryResult {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryResult::Loading)
    }
}

impl From<Result<Vec<RawRecord>, ErrorDetail>> for QueryResult {
    fn from(result: Result<Vec<RawRecord>, ErrorDetail>) -> Self {
        match result {
            Ok(records) => QueryResult::Success(records),
            Err(err) => QueryResult::Failure(err),
        }
    }
}

/// Push message naming records that were created, updated, deleted or undeleted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeNotification {
    pub affected: HashSet<RecordId>,
    /// `CREATE`, `UPDATE`, ... when the transport supplies it.
    pub change_type: Option<String>,
    pub entity_name: Option<String>,
}

impl ChangeNotification {
    pub fn new<I, T>(affected: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RecordId>,
    {
        Self {
            affected: affected.into_iter().map(Into::into).collect(),
            change_type: None,
            entity_name: None,
        }
    }
}
