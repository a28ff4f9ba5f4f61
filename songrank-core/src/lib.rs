//! SongRank Core: weighted range generator, value formatting, songs domain model.
//!
//! - [`generator`]: the weighted sequence over an integer range
//! - [`format`]: rendering and per-value counts for generated sequences
//! - [`song`]: typed columns, rows, and write payloads for the `songs` table

pub mod format;
pub mod generator;
pub mod song;

pub use format::{format_value, histogram, print_sequence};
pub use generator::{generate_numbers, GenerateError, WeightTable, WeightedRangeGenerator};
pub use song::{FieldError, FieldKind, FieldList, FieldUpdate, NewSong, ScoreField, Song, SongField};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared with the HTTP layer are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<WeightedRangeGenerator>();
        require_sync::<WeightedRangeGenerator>();
        require_send::<GenerateError>();
        require_sync::<GenerateError>();
        require_send::<Song>();
        require_sync::<Song>();
        require_send::<FieldList>();
        require_sync::<FieldList>();
        require_send::<FieldUpdate>();
        require_sync::<FieldUpdate>();
        require_send::<NewSong>();
        require_sync::<NewSong>();
    }

    #[test]
    fn generated_sequence_prints_like_the_documented_example() {
        let numbers = generate_numbers(99, 90, 100).unwrap();
        let mut out = Vec::new();
        print_sequence(&numbers, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("99"));
        assert_eq!(lines.next(), Some("98.2"));
        assert_eq!(lines.next(), Some("98.1"));
        assert_eq!(lines.next(), Some("98"));
        assert_eq!(text.lines().count(), 100);
    }
}
