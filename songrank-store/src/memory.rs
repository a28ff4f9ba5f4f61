//! In-process song store.
//!
//! Evaluates [`SongQuery`] against rows held in memory, with the semantics
//! PostgREST gives the hosted table:
//! - comparisons against a null column never match
//! - `desc` puts nulls first, `asc` puts them last
//! - the selection projects rows down to the chosen columns
//!
//! Used for tests and for running the API without a hosted project.

use crate::provider::{SongStore, StoreError};
use crate::query::{Direction, Filter, Literal, Ordering, SongQuery};
use chrono::Utc;
use serde_json::Value;
use songrank_core::song::{FieldUpdate, NewSong, Song};
use std::cmp::Ordering as CmpOrdering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Song store holding its rows in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Song>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows. Rows without an id get one.
    pub fn with_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        let rows = songs
            .into_iter()
            .map(|mut song| {
                song.id.get_or_insert_with(Uuid::new_v4);
                song
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Load seed rows from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let songs: Vec<Song> = serde_json::from_str(json)
            .map_err(|e| StoreError::ResponseFormatChanged(format!("seed rows: {e}")))?;
        Ok(Self::with_songs(songs))
    }

    pub fn len(&self) -> usize {
        self.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Song>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Other("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Song>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Other("memory store lock poisoned".into()))
    }
}

impl SongStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, query: &SongQuery) -> Result<Vec<Song>, StoreError> {
        let rows = self.read()?;
        let mut matched: Vec<Song> = rows
            .iter()
            .filter(|song| query.filters().iter().all(|f| matches(song, f)))
            .cloned()
            .collect();
        drop(rows);

        matched.sort_by(|a, b| compare_rows(a, b, query.orderings()));

        if let Some(fields) = query.selection() {
            matched = matched.iter().map(|song| song.project(fields)).collect();
        }
        Ok(matched)
    }

    fn insert(&self, song: &NewSong) -> Result<Vec<Song>, StoreError> {
        let now = Utc::now();
        let row = Song {
            id: Some(Uuid::new_v4()),
            created_at: Some(now),
            updated_at: Some(now),
            ..song.clone().into_song()
        };
        self.write()?.push(row.clone());
        Ok(vec![row])
    }

    fn update(&self, id: Uuid, update: &FieldUpdate) -> Result<Vec<Song>, StoreError> {
        let mut rows = self.write()?;
        let updated = rows
            .iter_mut()
            .filter(|song| song.id == Some(id))
            .map(|song| {
                song.apply(update);
                song.updated_at = Some(Utc::now());
                song.clone()
            })
            .collect();
        Ok(updated)
    }
}

fn matches(song: &Song, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, literal) => match (song.get(*field), literal) {
            (Value::Number(n), Literal::Number(x)) => n.as_f64() == Some(*x),
            (Value::String(s), Literal::Text(t)) => &s == t,
            _ => false,
        },
        Filter::Gte(field, x) => song.score_of(*field).is_some_and(|v| v >= *x),
        Filter::Lt(field, x) => song.score_of(*field).is_some_and(|v| v < *x),
        Filter::IsNull(field) => song.get(*field).is_null(),
    }
}

fn compare_rows(a: &Song, b: &Song, orderings: &[Ordering]) -> CmpOrdering {
    orderings
        .iter()
        .map(|o| compare_values(&a.get(o.field), &b.get(o.field), o.direction))
        .find(|ord| *ord != CmpOrdering::Equal)
        .unwrap_or(CmpOrdering::Equal)
}

fn compare_values(a: &Value, b: &Value, direction: Direction) -> CmpOrdering {
    let desc = direction == Direction::Desc;
    match (a.is_null(), b.is_null()) {
        (true, true) => CmpOrdering::Equal,
        (true, false) if desc => CmpOrdering::Less,
        (true, false) => CmpOrdering::Greater,
        (false, true) if desc => CmpOrdering::Greater,
        (false, true) => CmpOrdering::Less,
        (false, false) => {
            let ord = match (a, b) {
                (Value::Number(x), Value::Number(y)) => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(CmpOrdering::Equal),
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => CmpOrdering::Equal,
            };
            if desc {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use songrank_core::song::SongField;

    fn song(title: &str, score: Option<f64>) -> Song {
        Song {
            title: Some(title.into()),
            artist: Some("Artist".into()),
            score,
            ..Song::default()
        }
    }

    fn titles(rows: &[Song]) -> Vec<&str> {
        rows.iter().filter_map(|s| s.title.as_deref()).collect()
    }

    #[test]
    fn seeded_rows_get_ids() {
        let store = MemoryStore::with_songs(vec![song("A", None)]);
        let rows = store.fetch(&SongQuery::new()).unwrap();
        assert!(rows[0].id.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn gte_skips_nulls_and_desc_orders_nulls_first() {
        let store = MemoryStore::with_songs(vec![
            song("low", Some(80.0)),
            song("null", None),
            song("high", Some(99.0)),
            song("mid", Some(90.0)),
        ]);

        let all = store
            .fetch(&SongQuery::new().order_desc(SongField::Score))
            .unwrap();
        assert_eq!(titles(&all), vec!["null", "high", "mid", "low"]);

        let above = store
            .fetch(
                &SongQuery::new()
                    .gte("score".parse().unwrap(), 90.0)
                    .order_desc(SongField::Score),
            )
            .unwrap();
        assert_eq!(titles(&above), vec!["high", "mid"]);
    }

    #[test]
    fn asc_orders_nulls_last() {
        let store = MemoryStore::with_songs(vec![song("null", None), song("a", Some(1.0))]);
        let rows = store
            .fetch(&SongQuery::new().order_asc(SongField::Score))
            .unwrap();
        assert_eq!(titles(&rows), vec!["a", "null"]);
    }

    #[test]
    fn eq_matches_numbers_and_text() {
        let store = MemoryStore::with_songs(vec![song("A", Some(90.0)), song("B", Some(91.0))]);
        let by_score = store
            .fetch(&SongQuery::new().eq(SongField::Score, 91.0))
            .unwrap();
        assert_eq!(titles(&by_score), vec!["B"]);

        let by_title = store
            .fetch(&SongQuery::new().eq(SongField::Title, "A"))
            .unwrap();
        assert_eq!(titles(&by_title), vec!["A"]);
    }

    #[test]
    fn selection_projects_rows() {
        let store = MemoryStore::with_songs(vec![song("A", Some(90.0))]);
        let rows = store
            .fetch(&SongQuery::new().select("title".parse().unwrap()))
            .unwrap();
        assert_eq!(rows[0].title.as_deref(), Some("A"));
        assert!(rows[0].score.is_none());
        assert!(rows[0].id.is_none());
    }

    #[test]
    fn insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let inserted = store.insert(&NewSong::new("New", "Band")).unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(inserted[0].id.is_some());
        assert!(inserted[0].created_at.is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_changes_one_row() {
        let store = MemoryStore::new();
        let id = store.insert(&NewSong::new("New", "Band")).unwrap()[0]
            .id
            .unwrap();
        let update = FieldUpdate::new(SongField::Score, json!(93.5)).unwrap();

        let updated = store.update(id, &update).unwrap();
        assert_eq!(updated[0].score, Some(93.5));

        let missing = store.update(Uuid::new_v4(), &update).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn seed_json_parses_rows() {
        let store = MemoryStore::from_json(r#"[{"title":"A","score":90}]"#).unwrap();
        assert_eq!(store.len(), 1);
        assert!(MemoryStore::from_json("{").is_err());
    }
}
