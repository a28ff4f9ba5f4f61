//! Weighted range generator.
//!
//! Produces a descending sequence of one-decimal values over an integer range
//! `[min_num, max_num]`, where integers nearer the minimum repeat more often.
//! Every integer gets one mandatory base occurrence; the rest of the budget
//! (`total_count - range_size`) is spread as "extras" that grow linearly with
//! distance from the maximum.
//!
//! For each integer `N` the run is laid out as:
//! 1. up to nine fractional companions `N.9, N.8, ..., N.1` (descending)
//! 2. `N` itself
//! 3. plain duplicates of `N` for any extras beyond the nine fractions

use thiserror::Error;

/// Number of one-decimal sub-steps available between `N` and `N + 1`.
pub const DECIMAL_STEPS: usize = 9;

/// Largest sequence the generator will allocate.
pub const MAX_TOTAL_COUNT: usize = 10_000_000;

/// Errors from validating generator inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("max_num ({max_num}) must be greater than min_num ({min_num})")]
    InvalidRange { max_num: i64, min_num: i64 },

    #[error(
        "total_count ({total_count}) is smaller than the range size ({range_size}); \
         every integer in the range needs one occurrence"
    )]
    CountBelowRange { total_count: usize, range_size: u64 },

    #[error("total_count ({total_count}) exceeds the limit of {max}")]
    CountTooLarge { total_count: usize, max: usize },
}

/// Extra occurrences per range position, highest value first.
///
/// Only the positions visited before the budget ran out are stored. Positions
/// past the end carry no extras but still get their base occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    weights: Vec<usize>,
}

impl WeightTable {
    /// Distribute `remaining` extras over `range_size` positions.
    ///
    /// Position 0 (the maximum) always gets 0. Position `i` gets
    /// `min(2 * i, budget left)`, and the walk stops as soon as the budget is
    /// spent. If the range runs out first, the shortfall lands on the last
    /// position so the extras always sum to `remaining`.
    pub fn build(range_size: usize, remaining: usize) -> Self {
        let mut weights = Vec::with_capacity(range_size);
        let mut total = 0usize;

        for i in 0..range_size {
            let weight = if i == 0 {
                0
            } else {
                i.saturating_mul(2).min(remaining - total)
            };
            weights.push(weight);
            total += weight;

            if total >= remaining {
                break;
            }
        }

        if total < remaining {
            if let Some(last) = weights.last_mut() {
                *last += remaining - total;
            }
        }

        Self { weights }
    }

    /// Extras for a position; zero for positions the walk never reached.
    pub fn extras_at(&self, position: usize) -> usize {
        self.weights.get(position).copied().unwrap_or(0)
    }

    /// Number of positions the walk visited.
    pub fn computed_positions(&self) -> usize {
        self.weights.len()
    }

    /// Sum of all extras.
    pub fn total(&self) -> usize {
        self.weights.iter().sum()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.weights
    }
}

/// Validated generator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedRangeGenerator {
    max_num: i64,
    min_num: i64,
    total_count: usize,
    range_size: usize,
}

impl WeightedRangeGenerator {
    /// Validate a range and target length.
    ///
    /// Fails with [`GenerateError::InvalidRange`] when `max_num <= min_num`, and
    /// with [`GenerateError::CountTooLarge`] above [`MAX_TOTAL_COUNT`], and with
    /// [`GenerateError::CountBelowRange`] when `total_count` cannot cover one
    /// occurrence per integer.
    pub fn new(max_num: i64, min_num: i64, total_count: usize) -> Result<Self, GenerateError> {
        if max_num <= min_num {
            return Err(GenerateError::InvalidRange { max_num, min_num });
        }
        if total_count > MAX_TOTAL_COUNT {
            return Err(GenerateError::CountTooLarge {
                total_count,
                max: MAX_TOTAL_COUNT,
            });
        }

        let range_size = max_num.abs_diff(min_num).saturating_add(1);
        let range_size = match usize::try_from(range_size) {
            Ok(size) if size <= total_count => size,
            _ => {
                return Err(GenerateError::CountBelowRange {
                    total_count,
                    range_size,
                })
            }
        };

        Ok(Self {
            max_num,
            min_num,
            total_count,
            range_size,
        })
    }

    pub fn max_num(&self) -> i64 {
        self.max_num
    }

    pub fn min_num(&self) -> i64 {
        self.min_num
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Count of integers in `[min_num, max_num]`.
    pub fn range_size(&self) -> usize {
        self.range_size
    }

    /// Extras left after every integer has its base occurrence.
    pub fn remaining_count(&self) -> usize {
        self.total_count - self.range_size
    }

    pub fn weight_table(&self) -> WeightTable {
        WeightTable::build(self.range_size, self.remaining_count())
    }

    /// Emit the full sequence, highest integer first.
    pub fn generate(&self) -> Vec<f64> {
        let table = self.weight_table();
        let mut numbers = Vec::with_capacity(self.total_count);

        for (position, n) in (self.min_num..=self.max_num).rev().enumerate() {
            let extras = table.extras_at(position);
            let decimals = extras.min(DECIMAL_STEPS);
            let base = n as f64;

            for d in (1..=decimals).rev() {
                numbers.push(with_tenths(n, d));
            }
            numbers.push(base);
            numbers.extend(std::iter::repeat(base).take(extras - decimals));
        }

        numbers
    }
}

/// Generate the weighted sequence for `[min_num, max_num]` with exactly
/// `total_count` values.
pub fn generate_numbers(
    max_num: i64,
    min_num: i64,
    total_count: usize,
) -> Result<Vec<f64>, GenerateError> {
    Ok(WeightedRangeGenerator::new(max_num, min_num, total_count)?.generate())
}

/// `n + tenths / 10`, rounded to one decimal place.
fn with_tenths(n: i64, tenths: usize) -> f64 {
    (n as f64 * 10.0 + tenths as f64) / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_example_weights() {
        let gen = WeightedRangeGenerator::new(99, 90, 100).unwrap();
        assert_eq!(gen.range_size(), 10);
        assert_eq!(gen.remaining_count(), 90);
        assert_eq!(
            gen.weight_table().as_slice(),
            &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18]
        );
    }

    #[test]
    fn weight_is_capped_by_remaining_budget() {
        // 2 + 4 = 6, then min(6, 4) = 4 exhausts the budget of 10.
        let table = WeightTable::build(10, 10);
        assert_eq!(table.as_slice(), &[0, 2, 4, 4]);
        assert_eq!(table.total(), 10);
        assert_eq!(table.extras_at(7), 0);
    }

    #[test]
    fn shortfall_lands_on_last_position() {
        // 0 + 2 + 4 = 6, short of 20 by 14.
        let table = WeightTable::build(3, 20);
        assert_eq!(table.as_slice(), &[0, 2, 18]);
    }

    #[test]
    fn zero_budget_stops_at_first_position() {
        let table = WeightTable::build(5, 0);
        assert_eq!(table.as_slice(), &[0]);
        assert_eq!(table.computed_positions(), 1);
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn fractional_run_for_small_weight() {
        // Range 2..=3, total 5: weights [0, 3]
        let numbers = generate_numbers(3, 2, 5).unwrap();
        assert_eq!(numbers, vec![3.0, 2.3, 2.2, 2.1, 2.0]);
    }

    #[test]
    fn whole_duplicates_beyond_nine_decimals() {
        // Range 1..=2, total 14: weights [0, 12]
        let numbers = generate_numbers(2, 1, 14).unwrap();
        assert_eq!(numbers.len(), 14);
        assert_eq!(numbers[0], 2.0);
        assert_eq!(
            &numbers[1..10],
            &[1.9, 1.8, 1.7, 1.6, 1.5, 1.4, 1.3, 1.2, 1.1]
        );
        assert_eq!(&numbers[10..], &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn negative_ranges_keep_fractions_above_the_integer() {
        let numbers = generate_numbers(-4, -5, 4).unwrap();
        assert_eq!(numbers, vec![-4.0, -4.8, -4.9, -5.0]);
    }

    #[test]
    fn rejects_inverted_range() {
        assert_eq!(
            generate_numbers(90, 99, 100),
            Err(GenerateError::InvalidRange {
                max_num: 90,
                min_num: 99
            })
        );
    }

    #[test]
    fn rejects_equal_bounds() {
        assert!(matches!(
            generate_numbers(5, 5, 10),
            Err(GenerateError::InvalidRange { .. })
        ));
    }

    #[test]
    fn rejects_count_below_range() {
        assert_eq!(
            generate_numbers(99, 90, 9),
            Err(GenerateError::CountBelowRange {
                total_count: 9,
                range_size: 10
            })
        );
    }

    #[test]
    fn rejects_count_above_limit() {
        assert_eq!(
            generate_numbers(99, 90, usize::MAX),
            Err(GenerateError::CountTooLarge {
                total_count: usize::MAX,
                max: MAX_TOTAL_COUNT
            })
        );
        assert!(WeightedRangeGenerator::new(1, 0, MAX_TOTAL_COUNT).is_ok());
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let err = generate_numbers(i64::MAX, i64::MIN, 100).unwrap_err();
        assert!(matches!(err, GenerateError::CountBelowRange { .. }));
    }
}
