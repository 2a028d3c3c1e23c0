//! Shared wire types and schema constants for Unified Entity Cards (UEC).
//! The envelope types give a typed view of a validated card; payload, meta,
//! settings and extensions stay generic JSON so unknown keys survive verbatim.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema family name carried by every card.
pub const SCHEMA_NAME: &str = "UEC";
/// First-generation schema version literal.
pub const SCHEMA_V1: &str = "1.0";
/// Second-generation schema version literal.
pub const SCHEMA_V2: &str = "2.0";

/// The closed set of schema versions this toolkit understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SchemaVersion {
    #[serde(rename = "1.0")]
    V1,
    #[serde(rename = "2.0")]
    V2,
}

impl SchemaVersion {
    /// Map a raw version string onto the known set; anything else is unknown.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            SCHEMA_V1 => Some(SchemaVersion::V1),
            SCHEMA_V2 => Some(SchemaVersion::V2),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1 => SCHEMA_V1,
            SchemaVersion::V2 => SCHEMA_V2,
        }
    }
}

/// `schema` header of a card.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CardSchema {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compat: Option<String>,
}

/// Discriminator selecting whether `payload` is a Character or Persona shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Character,
    Persona,
}

impl CardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CardKind::Character => "character",
            CardKind::Persona => "persona",
        }
    }
}

/// Typed view of a card envelope, handed out once validation succeeds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Card {
    pub schema: CardSchema,
    pub kind: CardKind,
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_specific_settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

// -------- Validation / parsing results --------

/// Accumulated validation outcome; `errors` is empty exactly when `ok`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Result of parsing wire text and validating the parsed document.
/// `value` is present only when the document passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParseOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub errors: Vec<String>,
}

// -------- Version transfer --------

/// Downgraded card plus one warning per piece of dropped information.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DowngradeOutcome {
    pub card: Value,
    pub warnings: Vec<String>,
}

// -------- Diff / merge --------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    Added,
    Removed,
    Changed,
}

/// One leaf divergence between two documents, addressed by dotted path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffEntry {
    pub path: String,
    pub op: DiffOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// How array pairs reconcile during a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMerge {
    #[default]
    Replace,
    Concat,
}

/// Which side wins when a conflict has to be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConflictWinner {
    #[default]
    Incoming,
    Base,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct MergeOptions {
    #[serde(default)]
    pub array: ArrayMerge,
    #[serde(default)]
    pub conflict: ConflictWinner,
}

/// Merged value plus the deduplicated, sorted paths that disagreed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MergeOutcome {
    pub value: Value,
    pub conflicts: Vec<String>,
}

// -------- Asset discovery --------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetRefKind {
    /// Legacy bare URL or data-URI string.
    String,
    /// Typed asset-locator object.
    Locator,
}

/// A located asset-like value somewhere inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetRef {
    pub path: String,
    pub kind: AssetRefKind,
    pub value: Value,
}

// -------- Lint --------

/// Non-fatal quality findings; never blocks any other operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LintReport {
    pub ok: bool,
    pub warnings: Vec<String>,
}
