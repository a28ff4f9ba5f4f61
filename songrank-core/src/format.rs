//! Rendering of generated sequences.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// Render a value as a bare integer when it has no fractional part,
/// otherwise with one decimal place.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Write one formatted value per line.
pub fn print_sequence<W: Write>(values: &[f64], out: &mut W) -> io::Result<()> {
    for &value in values {
        writeln!(out, "{}", format_value(value))?;
    }
    Ok(())
}

/// Count values per integer part (floor), highest integer first.
pub fn histogram(values: &[f64]) -> Vec<(i64, usize)> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &value in values {
        *counts.entry(value.floor() as i64).or_default() += 1;
    }
    counts.into_iter().rev().collect()
}
