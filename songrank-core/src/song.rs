//! Domain types for the `songs` table.
//!
//! Column names arriving from callers are parsed into [`SongField`] at the
//! boundary, so unknown names are rejected before any query is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for column names and column values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("field list is empty")]
    EmptyFieldList,

    #[error("field '{field}' is not a score column")]
    NotScoreField { field: SongField },

    #[error("field '{field}' is read-only")]
    ReadOnlyField { field: SongField },

    #[error("field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: SongField,
        expected: &'static str,
        found: String,
    },
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Uuid,
    Text,
    Score,
    Timestamp,
}

/// A known column of the `songs` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SongField {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "artist")]
    Artist,
    #[serde(rename = "youtube_url")]
    YoutubeUrl,
    #[serde(rename = "previous_score")]
    PreviousScore,
    #[serde(rename = "score_2024_10")]
    Score2024Oct,
    #[serde(rename = "score_2024_q3")]
    Score2024Q3,
    #[serde(rename = "score_2025_01")]
    Score2025Jan,
    #[serde(rename = "score")]
    Score,
    #[serde(rename = "average_score")]
    AverageScore,
    #[serde(rename = "created_at")]
    CreatedAt,
    #[serde(rename = "updated_at")]
    UpdatedAt,
}

impl SongField {
    pub const ALL: [SongField; 12] = [
        SongField::Id,
        SongField::Title,
        SongField::Artist,
        SongField::YoutubeUrl,
        SongField::PreviousScore,
        SongField::Score2024Oct,
        SongField::Score2024Q3,
        SongField::Score2025Jan,
        SongField::Score,
        SongField::AverageScore,
        SongField::CreatedAt,
        SongField::UpdatedAt,
    ];

    /// Columns returned when the caller does not pick any.
    pub const RESPONSE: [SongField; 11] = [
        SongField::Id,
        SongField::Title,
        SongField::Artist,
        SongField::YoutubeUrl,
        SongField::PreviousScore,
        SongField::Score2024Oct,
        SongField::Score2024Q3,
        SongField::Score2025Jan,
        SongField::Score,
        SongField::CreatedAt,
        SongField::UpdatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SongField::Id => "id",
            SongField::Title => "title",
            SongField::Artist => "artist",
            SongField::YoutubeUrl => "youtube_url",
            SongField::PreviousScore => "previous_score",
            SongField::Score2024Oct => "score_2024_10",
            SongField::Score2024Q3 => "score_2024_q3",
            SongField::Score2025Jan => "score_2025_01",
            SongField::Score => "score",
            SongField::AverageScore => "average_score",
            SongField::CreatedAt => "created_at",
            SongField::UpdatedAt => "updated_at",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SongField::Id => FieldKind::Uuid,
            SongField::Title | SongField::Artist | SongField::YoutubeUrl => FieldKind::Text,
            SongField::PreviousScore
            | SongField::Score2024Oct
            | SongField::Score2024Q3
            | SongField::Score2025Jan
            | SongField::Score
            | SongField::AverageScore => FieldKind::Score,
            SongField::CreatedAt | SongField::UpdatedAt => FieldKind::Timestamp,
        }
    }

    pub fn is_score(self) -> bool {
        self.kind() == FieldKind::Score
    }

    /// Columns managed by the store and never written by callers.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            SongField::Id | SongField::CreatedAt | SongField::UpdatedAt
        )
    }
}

impl fmt::Display for SongField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SongField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        SongField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| FieldError::UnknownField {
                name: name.to_string(),
            })
    }
}

/// A column known to hold a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreField(SongField);

impl ScoreField {
    pub fn field(self) -> SongField {
        self.0
    }
}

impl TryFrom<SongField> for ScoreField {
    type Error = FieldError;

    fn try_from(field: SongField) -> Result<Self, Self::Error> {
        if field.is_score() {
            Ok(Self(field))
        } else {
            Err(FieldError::NotScoreField { field })
        }
    }
}

impl FromStr for ScoreField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<SongField>()?.try_into()
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Ordered, de-duplicated, non-empty list of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList(Vec<SongField>);

impl FieldList {
    pub fn new(fields: impl IntoIterator<Item = SongField>) -> Result<Self, FieldError> {
        let mut list = Vec::new();
        for field in fields {
            if !list.contains(&field) {
                list.push(field);
            }
        }
        if list.is_empty() {
            return Err(FieldError::EmptyFieldList);
        }
        Ok(Self(list))
    }

    /// The default response columns.
    pub fn response() -> Self {
        Self(SongField::RESPONSE.to_vec())
    }

    /// Parse an optional comma-separated list, falling back to the response
    /// columns when absent.
    pub fn parse_or_response(raw: Option<&str>) -> Result<Self, FieldError> {
        match raw {
            Some(raw) => raw.parse(),
            None => Ok(Self::response()),
        }
    }

    pub fn fields(&self) -> &[SongField] {
        &self.0
    }

    pub fn contains(&self, field: SongField) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = SongField> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for FieldList {
    type Err = FieldError;

    /// Blank segments (`"a,,b"`, trailing commas) are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<SongField>, _>>()?;
        Self::new(fields)
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(field.as_str())?;
        }
        Ok(())
    }
}

/// A row of the `songs` table.
///
/// Every column is optional: callers choose which columns to select and the
/// rest come back as `null`. `average_score` is not a response column, so it
/// is only serialized when a query selected it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub youtube_url: Option<String>,
    pub previous_score: Option<f64>,
    pub score_2024_10: Option<f64>,
    pub score_2024_q3: Option<f64>,
    pub score_2025_01: Option<f64>,
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Song {
    /// Value of a score column.
    pub fn score_of(&self, field: ScoreField) -> Option<f64> {
        match field.field() {
            SongField::PreviousScore => self.previous_score,
            SongField::Score2024Oct => self.score_2024_10,
            SongField::Score2024Q3 => self.score_2024_q3,
            SongField::Score2025Jan => self.score_2025_01,
            SongField::Score => self.score,
            SongField::AverageScore => self.average_score,
            _ => None,
        }
    }

    /// Column value as JSON (`null` when absent).
    pub fn get(&self, field: SongField) -> Value {
        let value = match field {
            SongField::Id => self.id.map(|id| Value::String(id.to_string())),
            SongField::Title => self.title.clone().map(Value::String),
            SongField::Artist => self.artist.clone().map(Value::String),
            SongField::YoutubeUrl => self.youtube_url.clone().map(Value::String),
            SongField::CreatedAt => self.created_at.map(|t| Value::String(t.to_rfc3339())),
            SongField::UpdatedAt => self.updated_at.map(|t| Value::String(t.to_rfc3339())),
            score => ScoreField::try_from(score)
                .ok()
                .and_then(|f| self.score_of(f))
                .map(Value::from),
        };
        value.unwrap_or(Value::Null)
    }

    /// Reset a column to `None`.
    pub fn clear(&mut self, field: SongField) {
        match field {
            SongField::Id => self.id = None,
            SongField::Title => self.title = None,
            SongField::Artist => self.artist = None,
            SongField::YoutubeUrl => self.youtube_url = None,
            SongField::PreviousScore => self.previous_score = None,
            SongField::Score2024Oct => self.score_2024_10 = None,
            SongField::Score2024Q3 => self.score_2024_q3 = None,
            SongField::Score2025Jan => self.score_2025_01 = None,
            SongField::Score => self.score = None,
            SongField::AverageScore => self.average_score = None,
            SongField::CreatedAt => self.created_at = None,
            SongField::UpdatedAt => self.updated_at = None,
        }
    }

    /// Keep only the listed columns.
    pub fn project(&self, fields: &FieldList) -> Song {
        let mut projected = self.clone();
        for field in SongField::ALL {
            if !fields.contains(field) {
                projected.clear(field);
            }
        }
        projected
    }

    /// Apply a validated update to this row.
    pub fn apply(&mut self, update: &FieldUpdate) {
        let text = || update.value.as_str().map(str::to_string);
        let number = || update.value.as_f64();
        match update.field {
            SongField::Title => self.title = text(),
            SongField::Artist => self.artist = text(),
            SongField::YoutubeUrl => self.youtube_url = text(),
            SongField::PreviousScore => self.previous_score = number(),
            SongField::Score2024Oct => self.score_2024_10 = number(),
            SongField::Score2024Q3 => self.score_2024_q3 = number(),
            SongField::Score2025Jan => self.score_2025_01 = number(),
            SongField::Score => self.score = number(),
            SongField::AverageScore => self.average_score = number(),
            // Rejected by FieldUpdate::new
            SongField::Id | SongField::CreatedAt | SongField::UpdatedAt => {}
        }
    }
}

/// Insert payload for a new song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_2024_10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_2024_q3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_2025_01: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl NewSong {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            youtube_url: None,
            previous_score: None,
            score_2024_10: None,
            score_2024_q3: None,
            score_2025_01: None,
            score: None,
        }
    }

    /// Build the stored row, leaving store-managed columns empty.
    pub fn into_song(self) -> Song {
        Song {
            title: Some(self.title),
            artist: Some(self.artist),
            youtube_url: self.youtube_url,
            previous_score: self.previous_score,
            score_2024_10: self.score_2024_10,
            score_2024_q3: self.score_2024_q3,
            score_2025_01: self.score_2025_01,
            score: self.score,
            ..Song::default()
        }
    }
}

/// A single-column change, checked against the column's type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    field: SongField,
    value: Value,
}

impl FieldUpdate {
    pub fn new(field: SongField, value: Value) -> Result<Self, FieldError> {
        if field.is_read_only() {
            return Err(FieldError::ReadOnlyField { field });
        }

        let (ok, expected) = match field.kind() {
            FieldKind::Score => (value.is_null() || value.is_number(), "a number or null"),
            FieldKind::Text => (value.is_null() || value.is_string(), "a string or null"),
            // Read-only kinds were rejected above.
            FieldKind::Uuid | FieldKind::Timestamp => (false, "nothing"),
        };
        if !ok {
            return Err(FieldError::TypeMismatch {
                field,
                expected,
                found: json_type_name(&value).to_string(),
            });
        }

        Ok(Self { field, value })
    }

    pub fn field(&self) -> SongField {
        self.field
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The `{column: value}` body sent to the store.
    pub fn to_patch(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(self.field.as_str().to_string(), self.value.clone());
        Value::Object(body)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn average_score_only_serialized_when_present() {
        let row = Song {
            title: Some("A".into()),
            ..Song::default()
        };
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("average_score").is_none());
        assert_eq!(value["score"], Value::Null);

        let ranked = Song {
            average_score: Some(91.5),
            ..row
        };
        assert_eq!(serde_json::to_value(&ranked).unwrap()["average_score"], json!(91.5));
    }

    #[test]
    fn field_names_roundtrip_through_parse() {
        for field in SongField::ALL {
            assert_eq!(field.as_str().parse::<SongField>().unwrap(), field);
        }
    }

    #[test]
    fn serde_names_match_column_names() {
        for field in SongField::ALL {
            assert_eq!(serde_json::to_value(field).unwrap(), json!(field.as_str()));
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert_eq!(
            "scores".parse::<SongField>(),
            Err(FieldError::UnknownField {
                name: "scores".into()
            })
        );
    }

    #[test]
    fn score_field_requires_numeric_column() {
        assert!("score_2024_q3".parse::<ScoreField>().is_ok());
        assert_eq!(
            "title".parse::<ScoreField>(),
            Err(FieldError::NotScoreField {
                field: SongField::Title
            })
        );
    }

    #[test]
    fn field_list_trims_and_dedups() {
        let list: FieldList = " title, artist ,title,,score ".parse().unwrap();
        assert_eq!(
            list.fields(),
            &[SongField::Title, SongField::Artist, SongField::Score]
        );
        assert_eq!(list.to_string(), "title,artist,score");
    }

    #[test]
    fn empty_field_list_is_rejected() {
        assert_eq!("".parse::<FieldList>(), Err(FieldError::EmptyFieldList));
        assert_eq!(" , ".parse::<FieldList>(), Err(FieldError::EmptyFieldList));
    }

    #[test]
    fn field_list_fails_on_first_unknown_name() {
        let err = "title,bogus,score".parse::<FieldList>().unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownField {
                name: "bogus".into()
            }
        );
    }

    #[test]
    fn default_response_excludes_average_score() {
        let list = FieldList::parse_or_response(None).unwrap();
        assert_eq!(list.len(), 11);
        assert!(!list.contains(SongField::AverageScore));
    }

    #[test]
    fn song_deserializes_partial_rows() {
        let song: Song = serde_json::from_value(json!({
            "title": "Song A",
            "score": 95.5
        }))
        .unwrap();
        assert_eq!(song.title.as_deref(), Some("Song A"));
        assert_eq!(song.score, Some(95.5));
        assert!(song.id.is_none());
    }

    #[test]
    fn unselected_columns_serialize_as_null() {
        let song = Song {
            title: Some("Song A".into()),
            ..Song::default()
        };
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["title"], json!("Song A"));
        assert_eq!(value["score"], Value::Null);
        assert_eq!(value.as_object().unwrap().len(), 12);
    }

    #[test]
    fn project_keeps_only_listed_columns() {
        let song = Song {
            title: Some("Song A".into()),
            artist: Some("Artist".into()),
            score: Some(91.0),
            ..Song::default()
        };
        let projected = song.project(&"title,score".parse().unwrap());
        assert_eq!(projected.title.as_deref(), Some("Song A"));
        assert_eq!(projected.score, Some(91.0));
        assert!(projected.artist.is_none());
    }

    #[test]
    fn get_reads_columns_as_json() {
        let song = Song {
            artist: Some("Artist".into()),
            score_2025_01: Some(88.0),
            ..Song::default()
        };
        assert_eq!(song.get(SongField::Artist), json!("Artist"));
        assert_eq!(song.get(SongField::Score2025Jan), json!(88.0));
        assert_eq!(song.get(SongField::Score), Value::Null);
    }

    #[test]
    fn update_rejects_read_only_columns() {
        assert_eq!(
            FieldUpdate::new(SongField::Id, json!("x")),
            Err(FieldError::ReadOnlyField {
                field: SongField::Id
            })
        );
    }

    #[test]
    fn update_checks_value_type() {
        let err = FieldUpdate::new(SongField::Score, json!("high")).unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                field: SongField::Score,
                expected: "a number or null",
                found: "a string".into()
            }
        );
        assert!(FieldUpdate::new(SongField::Score, Value::Null).is_ok());
        assert!(FieldUpdate::new(SongField::Title, json!("New")).is_ok());
    }

    #[test]
    fn apply_and_patch_body() {
        let update = FieldUpdate::new(SongField::Score2024Q3, json!(97.5)).unwrap();
        assert_eq!(update.to_patch(), json!({"score_2024_q3": 97.5}));

        let mut song = Song::default();
        song.apply(&update);
        assert_eq!(song.score_2024_q3, Some(97.5));
    }

    #[test]
    fn new_song_skips_absent_scores() {
        let mut new_song = NewSong::new("Song A", "Artist");
        new_song.score = Some(90.0);
        let body = serde_json::to_value(&new_song).unwrap();
        assert_eq!(
            body,
            json!({"title": "Song A", "artist": "Artist", "score": 90.0})
        );
    }
}
