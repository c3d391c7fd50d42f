//! Filter compilers for the external store.
//!
//! The store is a query oracle: it is handed a declarative [`Filter`] (term
//! matches, a half-open date window, a sort, paging) and returns an ordered
//! sequence of documents. The two builders here compile the registry's
//! query shapes; they are deterministic pure functions with no I/O and no
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field names the registry filters and sorts on.
pub mod fields {
    /// Record modification timestamp.
    pub const LAST_MODIFIED: &str = "last_modified";
    /// Statistic generation date.
    pub const DATE: &str = "date";
    /// Record a statistic is about.
    pub const ABOUT: &str = "about";
    /// Statistic contributing source.
    pub const SOURCE: &str = "source";
    /// Statistic type tag.
    pub const TYPE: &str = "type";
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Oldest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Most recent first.
    #[serde(rename = "desc")]
    Descending,
}

/// Sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    /// Field to sort on.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Exact-match criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Field to match.
    pub field: String,
    /// Required value.
    pub value: String,
}

/// Half-open date window `[from, until)` on a date field. An unset bound is
/// unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// Field the window applies to.
    pub field: String,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub until: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Whether a timestamp falls inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if ts < from {
                return false;
            }
        }
        if let Some(until) = self.until {
            if ts >= until {
                return false;
            }
        }
        true
    }
}

/// A declarative query description: all criteria combine with AND logic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Exact-match criteria.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<Term>,

    /// Date window criterion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,

    /// Sort criterion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortClause>,

    /// Result offset, for paging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Maximum result count, for paging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    /// Empty filter matching everything, unordered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match criterion.
    pub fn term(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.push(Term {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Constrain a date field to `[from, until)`.
    pub fn window(
        mut self,
        field: impl Into<String>,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Self {
        self.window = Some(DateWindow {
            field: field.into(),
            from,
            until,
        });
        self
    }

    /// Sort on a field.
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(SortClause {
            field: field.into(),
            direction,
        });
        self
    }

    /// Skip the first `offset` results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Cap the result count.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Compiles the change-list query: records modified in `[from, until)`,
/// oldest first, so external consumers can walk the change feed
/// incrementally.
pub fn change_list(
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    offset: Option<usize>,
    limit: Option<usize>,
) -> Filter {
    let mut filter = Filter::new()
        .window(fields::LAST_MODIFIED, from, until)
        .sort_by(fields::LAST_MODIFIED, SortDirection::Ascending);
    filter.offset = offset;
    filter.limit = limit;
    filter
}

/// Compiles the statistics query: statistics about one record, optionally
/// narrowed by date window, contributing source, and type, most recent
/// first.
pub fn statistics(
    about: &str,
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    source: Option<&str>,
    stat_type: Option<&str>,
) -> Filter {
    let mut filter = Filter::new()
        .term(fields::ABOUT, about)
        .window(fields::DATE, from, until)
        .sort_by(fields::DATE, SortDirection::Descending);

    if let Some(source) = source {
        filter = filter.term(fields::SOURCE, source);
    }
    if let Some(stat_type) = stat_type {
        filter = filter.term(fields::TYPE, stat_type);
    }
    filter
}
