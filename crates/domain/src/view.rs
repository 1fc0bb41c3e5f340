//! Filter/sort projection over an in-memory record list.
//!
//! A [`ViewQuery`] is plain UI state. [`project`] derives the display sequence
//! from a list and a query without touching the list itself.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use marketdesk_core::AppError;
use serde::{Deserialize, Serialize};

/// Sort direction toggled from a column header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}

/// Value of one record field as seen by filters and sorts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text, compared case-insensitively.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean flag.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// Field absent on this record.
    Missing,
}

impl FieldValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a text value or [`FieldValue::Missing`] for `None`.
    #[must_use]
    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::text)
    }

    /// Returns the exact-match key used by categorical filters.
    #[must_use]
    pub fn facet_key(&self) -> Option<String> {
        match self {
            Self::Text(value) => Some(value.clone()),
            Self::Number(value) => Some(value.to_string()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Date(value) => Some(value.to_string()),
            Self::Timestamp(value) => Some(value.to_rfc3339()),
            Self::Missing => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Date(_) => 3,
            Self::Timestamp(_) => 4,
            Self::Text(_) => 5,
        }
    }

    /// Compares two values with the natural ordering of their kind.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.to_lowercase().cmp(&right.to_lowercase()),
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Timestamp(left), Self::Timestamp(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A record type that can be searched, filtered and sorted.
pub trait Queryable {
    /// Field selector for this record type.
    type Field: Copy + Eq + Debug + Send + Sync + 'static;

    /// Fields matched by the free-text search box.
    fn search_fields() -> &'static [Self::Field];

    /// Returns the value of one field.
    fn field_value(&self, field: Self::Field) -> FieldValue;
}

/// Categorical filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FacetValue {
    /// Sentinel that disables the filter.
    #[default]
    All,
    /// Keep records whose field equals this key.
    Exact(String),
}

impl FacetValue {
    /// Parses a select-box value, treating `all` and blanks as the sentinel.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Exact(trimmed.to_owned())
        }
    }
}

/// Exact-match predicate on one categorical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetFilter<F> {
    /// Filtered field.
    pub field: F,
    /// Current selection.
    pub value: FacetValue,
}

/// Sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    /// Sorted field.
    pub field: F,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Search, filter and sort state of one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery<F> {
    search: String,
    facets: Vec<FacetFilter<F>>,
    sort: Option<SortSpec<F>>,
}

impl<F> Default for ViewQuery<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            facets: Vec::new(),
            sort: None,
        }
    }
}

impl<F: Copy + Eq> ViewQuery<F> {
    /// Creates a query that matches everything in list order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term.
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Sets or replaces the facet on `field`.
    #[must_use]
    pub fn with_facet(mut self, field: F, value: FacetValue) -> Self {
        self.set_facet(field, value);
        self
    }

    /// Sets the sort field and direction.
    #[must_use]
    pub fn with_sort(mut self, field: F, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { field, direction });
        self
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Sets or replaces the facet on `field`.
    pub fn set_facet(&mut self, field: F, value: FacetValue) {
        match self.facets.iter_mut().find(|facet| facet.field == field) {
            Some(facet) => facet.value = value,
            None => self.facets.push(FacetFilter { field, value }),
        }
    }

    /// Selects a sort field like a column header click does.
    ///
    /// Clicking the active field flips its direction; a new field starts ascending.
    pub fn sort_by(&mut self, field: F) {
        self.sort = Some(match self.sort {
            Some(spec) if spec.field == field => SortSpec {
                field,
                direction: spec.direction.toggled(),
            },
            _ => SortSpec {
                field,
                direction: SortDirection::Asc,
            },
        });
    }

    /// Flips the direction of the active sort, if any.
    pub fn toggle_direction(&mut self) {
        if let Some(spec) = self.sort.as_mut() {
            spec.direction = spec.direction.toggled();
        }
    }

    /// Returns the search term.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.as_str()
    }

    /// Returns active facets.
    #[must_use]
    pub fn facets(&self) -> &[FacetFilter<F>] {
        &self.facets
    }

    /// Returns the active sort.
    #[must_use]
    pub fn sort(&self) -> Option<SortSpec<F>> {
        self.sort
    }

    /// Returns whether the query keeps every record.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty()
            && self
                .facets
                .iter()
                .all(|facet| facet.value == FacetValue::All)
    }
}

/// Returns whether `record` passes the search term and every facet.
#[must_use]
pub fn matches<R: Queryable>(record: &R, query: &ViewQuery<R::Field>) -> bool {
    let term = query.search.trim().to_lowercase();
    let search_hit = term.is_empty()
        || R::search_fields().iter().any(|field| {
            matches!(
                record.field_value(*field),
                FieldValue::Text(value) if value.to_lowercase().contains(&term)
            )
        });

    search_hit
        && query.facets.iter().all(|facet| match &facet.value {
            FacetValue::All => true,
            FacetValue::Exact(expected) => {
                record.field_value(facet.field).facet_key().as_deref() == Some(expected.as_str())
            }
        })
}

/// Derives the filtered, sorted display sequence.
///
/// The sort is stable. Descending reverses the comparator rather than the
/// output, so records with equal keys keep their list order in both directions.
#[must_use]
pub fn project<R: Queryable + Clone>(records: &[R], query: &ViewQuery<R::Field>) -> Vec<R> {
    let mut view: Vec<R> = records
        .iter()
        .filter(|record| matches(*record, query))
        .cloned()
        .collect();

    if let Some(spec) = query.sort {
        view.sort_by(|left, right| {
            let ordering = left
                .field_value(spec.field)
                .compare(&right.field_value(spec.field));
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    view
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        status: String,
        price: f64,
        joined: NaiveDate,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RowField {
        Name,
        Status,
        Price,
        Joined,
    }

    impl Queryable for Row {
        type Field = RowField;

        fn search_fields() -> &'static [RowField] {
            &[RowField::Name]
        }

        fn field_value(&self, field: RowField) -> FieldValue {
            match field {
                RowField::Name => FieldValue::text(self.name.as_str()),
                RowField::Status => FieldValue::text(self.status.as_str()),
                RowField::Price => FieldValue::Number(self.price),
                RowField::Joined => FieldValue::Date(self.joined),
            }
        }
    }

    fn row(name: &str, status: &str, price: f64, day: u32) -> Row {
        Row {
            name: name.to_owned(),
            status: status.to_owned(),
            price,
            joined: NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default(),
        }
    }

    fn row_strategy() -> impl Strategy<Value = Row> {
        (
            "[A-Za-z]{0,6}",
            prop_oneof![Just("active"), Just("expired")],
            0_u32..5,
            1_u32..28,
        )
            .prop_map(|(name, status, price, day)| row(&name, status, f64::from(price), day))
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = vec![row("Drinks", "active", 1.0, 1), row("Snacks", "active", 2.0, 2)];
        let view = project(&rows, &ViewQuery::new().with_search("sna"));
        assert_eq!(view, vec![rows[1].clone()]);
    }

    #[test]
    fn facet_filters_exact_value() {
        let rows = vec![row("a", "active", 1.0, 1), row("b", "expired", 2.0, 2)];
        let query = ViewQuery::new().with_facet(RowField::Status, FacetValue::parse("expired"));
        assert_eq!(project(&rows, &query), vec![rows[1].clone()]);

        let query = ViewQuery::new().with_facet(RowField::Status, FacetValue::parse("exp"));
        assert!(project(&rows, &query).is_empty());
    }

    #[test]
    fn all_sentinel_disables_facet() {
        assert_eq!(FacetValue::parse("all"), FacetValue::All);
        assert_eq!(FacetValue::parse(" "), FacetValue::All);
    }

    #[test]
    fn text_sort_ignores_case() {
        let rows = vec![row("beta", "active", 1.0, 1), row("Alpha", "active", 1.0, 1)];
        let query = ViewQuery::new().with_sort(RowField::Name, SortDirection::Asc);
        let names: Vec<String> = project(&rows, &query).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alpha".to_owned(), "beta".to_owned()]);
    }

    #[test]
    fn date_sort_descending() {
        let rows = vec![row("a", "active", 1.0, 3), row("b", "active", 1.0, 9)];
        let query = ViewQuery::new().with_sort(RowField::Joined, SortDirection::Desc);
        assert_eq!(project(&rows, &query)[0].name, "b");
    }

    #[test]
    fn header_click_toggles_active_field() {
        let mut query: ViewQuery<RowField> = ViewQuery::new();
        query.sort_by(RowField::Price);
        query.sort_by(RowField::Price);
        assert_eq!(
            query.sort().map(|spec| spec.direction),
            Some(SortDirection::Desc)
        );
        query.sort_by(RowField::Name);
        assert_eq!(
            query.sort(),
            Some(SortSpec {
                field: RowField::Name,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn missing_values_sort_first() {
        assert_eq!(
            FieldValue::Missing.compare(&FieldValue::text("a")),
            Ordering::Less
        );
    }

    proptest! {
        #[test]
        fn unfiltered_query_is_identity(rows in proptest::collection::vec(row_strategy(), 0..20)) {
            let query = ViewQuery::new()
                .with_search("  ")
                .with_facet(RowField::Status, FacetValue::All);
            prop_assert!(query.is_unfiltered());
            prop_assert_eq!(project(&rows, &query), rows);
        }

        #[test]
        fn double_toggle_restores_ascending(rows in proptest::collection::vec(row_strategy(), 0..20)) {
            let mut query = ViewQuery::new().with_sort(RowField::Price, SortDirection::Asc);
            let ascending = project(&rows, &query);
            query.toggle_direction();
            query.toggle_direction();
            prop_assert_eq!(project(&rows, &query), ascending);
        }

        #[test]
        fn projection_never_adds_records(
            rows in proptest::collection::vec(row_strategy(), 0..20),
            term in "[a-z]{0,2}",
        ) {
            let view = project(&rows, &ViewQuery::new().with_search(term));
            prop_assert!(view.len() <= rows.len());
            prop_assert!(view.iter().all(|record| rows.contains(record)));
        }
    }
}
