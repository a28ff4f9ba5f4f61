//! Query builder for the `songs` table.
//!
//! A [`SongQuery`] records column selection, filters, and ordering. The
//! Supabase store renders it as PostgREST query parameters; the memory store
//! evaluates it directly.

use songrank_core::song::{FieldList, ScoreField, SongField};
use std::fmt;

/// Literal compared against a column with `eq`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => f.write_str(&format_number(*n)),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(SongField, Literal),
    Gte(ScoreField, f64),
    Lt(ScoreField, f64),
    IsNull(SongField),
}

impl Filter {
    pub fn field(&self) -> SongField {
        match self {
            Filter::Eq(field, _) | Filter::IsNull(field) => *field,
            Filter::Gte(field, _) | Filter::Lt(field, _) => field.field(),
        }
    }

    /// PostgREST operator expression, e.g. `gte.90`.
    pub fn operator(&self) -> String {
        match self {
            Filter::Eq(_, literal) => format!("eq.{literal}"),
            Filter::Gte(_, n) => format!("gte.{}", format_number(*n)),
            Filter::Lt(_, n) => format!("lt.{}", format_number(*n)),
            Filter::IsNull(_) => "is.null".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: SongField,
    pub direction: Direction,
}

/// Select / filter / order over the `songs` table.
#[derive(Debug, Clone, PartialEq)]
pub struct SongQuery {
    select: Option<FieldList>,
    filters: Vec<Filter>,
    order: Vec<Ordering>,
}

impl Default for SongQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SongQuery {
    /// A query selecting every column with no filters.
    pub fn new() -> Self {
        Self {
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn select(mut self, fields: FieldList) -> Self {
        self.select = Some(fields);
        self
    }

    pub fn eq(mut self, field: SongField, value: impl Into<Literal>) -> Self {
        self.filters.push(Filter::Eq(field, value.into()));
        self
    }

    pub fn gte(mut self, field: ScoreField, value: f64) -> Self {
        self.filters.push(Filter::Gte(field, value));
        self
    }

    pub fn lt(mut self, field: ScoreField, value: f64) -> Self {
        self.filters.push(Filter::Lt(field, value));
        self
    }

    pub fn is_null(mut self, field: SongField) -> Self {
        self.filters.push(Filter::IsNull(field));
        self
    }

    /// Orderings apply in the order they are added.
    pub fn order(mut self, field: SongField, direction: Direction) -> Self {
        self.order.push(Ordering { field, direction });
        self
    }

    pub fn order_desc(self, field: SongField) -> Self {
        self.order(field, Direction::Desc)
    }

    pub fn order_asc(self, field: SongField) -> Self {
        self.order(field, Direction::Asc)
    }

    pub fn selection(&self) -> Option<&FieldList> {
        self.select.as_ref()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.order
    }

    /// Render as PostgREST query parameters.
    ///
    /// `select` comes first, then one parameter per filter, then a single
    /// combined `order` parameter.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);

        let select = self
            .select
            .as_ref()
            .map(|fields| fields.to_string())
            .unwrap_or_else(|| "*".to_string());
        params.push(("select".to_string(), select));

        for filter in &self.filters {
            params.push((filter.field().as_str().to_string(), filter.operator()));
        }

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.field.as_str(), o.direction.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        params
    }
}

/// Integral values render without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
