//! Core suggestion and schema types shared across the completion engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Attribute types accepted in `define stream` / `define table` schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    Int,
    Long,
    Float,
    Double,
    Bool,
    Time,
    Object,
    String,
}

impl AttrType {
    /// Keyword spelling used in definition statements.
    pub fn keyword(self) -> &'static str {
        match self {
            AttrType::Int => "int",
            AttrType::Long => "long",
            AttrType::Float => "float",
            AttrType::Double => "double",
            AttrType::Bool => "bool",
            AttrType::Time => "time",
            AttrType::Object => "object",
            AttrType::String => "string",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AttrType {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" => Ok(AttrType::Int),
            "long" => Ok(AttrType::Long),
            "float" => Ok(AttrType::Float),
            "double" => Ok(AttrType::Double),
            "bool" => Ok(AttrType::Bool),
            "time" => Ok(AttrType::Time),
            "object" => Ok(AttrType::Object),
            "string" => Ok(AttrType::String),
            other => Err(MetadataError::UnknownAttributeType(other.to_string())),
        }
    }
}

/// A named attribute in a stream or table schema.
///
/// Streams inferred from `insert into` targets carry no type information,
/// so the type is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub ty: Option<AttrType>,
}

impl Attribute {
    /// An attribute with a declared type.
    pub fn typed(name: impl Into<String>, ty: AttrType) -> Self {
        Attribute {
            name: name.into(),
            ty: Some(ty),
        }
    }

    /// An attribute whose type is unknown (inferred stream schemas).
    pub fn untyped(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            ty: None,
        }
    }
}

/// Grouping label attached to every suggestion so the host can sort by
/// category first and by rank within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Keyword,
    Annotation,
    Stream,
    Table,
    Attribute,
    Function,
    Namespace,
    Processor,
    Alias,
    EventReference,
    Type,
}

/// A single ranked completion candidate.
///
/// `rank` is a handler-local priority: lower integers group first within one
/// handler's output, but ranks are not comparable across handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text shown in the completion popup.
    pub label: String,
    /// Text inserted when the suggestion is accepted.
    pub insert: String,
    pub rank: u8,
    pub category: SuggestionCategory,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, rank: u8, category: SuggestionCategory) -> Self {
        let label = text.into();
        Suggestion {
            insert: label.clone(),
            label,
            rank,
            category,
        }
    }
}

/// Wrap plain strings into suggestions at a fixed rank and category.
pub(crate) fn make<I, S>(words: I, rank: u8, category: SuggestionCategory) -> Vec<Suggestion>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| Suggestion::new(w.as_ref(), rank, category))
        .collect()
}
