//! Record grid: search, sort and pagination
//!
//! `query` is a pure pipeline (full collection -> searched -> sorted -> paged
//! slice). State changes that belong to the caller, like jumping back to page 1
//! when the search term changes, live on [`GridQuery`] and in the dashboard
//! update loop, never inside `query`.

use crate::record::{collate, Record, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Search term, sort column and page of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridQuery {
    pub search: String,
    pub sort: Option<SortSpec>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for GridQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl GridQuery {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// New search term; always lands on page 1
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            ..self
        }
    }

    /// Column-header click
    pub fn with_sort(self, field: &str) -> Self {
        let sort = next_sort(self.sort.as_ref(), field);
        Self {
            sort: Some(sort),
            ..self
        }
    }

    pub fn with_page(self, page: usize) -> Self {
        Self { page, ..self }
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

/// One page of results plus the numbers a pager needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPage<'a> {
    pub rows: Vec<&'a Record>,
    /// Effective (clamped) page
    pub page: usize,
    pub total_pages: usize,
    pub total_matched: usize,
    pub page_size: usize,
}

impl GridPage<'_> {
    /// 1-based index of the first row shown, 0 when nothing matched
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    pub fn last_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.first_row() + self.rows.len() - 1
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Same field flips direction, a new field starts ascending
pub fn next_sort(current: Option<&SortSpec>, field: &str) -> SortSpec {
    match current {
        Some(spec) if spec.field == field => SortSpec {
            field: spec.field.clone(),
            direction: spec.direction.flip(),
        },
        _ => SortSpec::asc(field),
    }
}

/// Case-insensitive substring match against the display form of every field
pub fn matches_search(record: &Record, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || record
            .values()
            .any(|v| v.to_string().to_lowercase().contains(needle_lower))
}

pub fn filter_by_search<'a>(records: &'a [Record], search: &str) -> Vec<&'a Record> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .collect()
}

fn class_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::Text(_) => 1,
        Value::Missing => 2,
    }
}

/// Ascending order for one column.
///
/// Two numbers compare numerically and two texts by [`collate`]. Mixed pairs
/// order numbers before text before missing values, which keeps the ordering
/// total on columns that mix both. Mixed pairs deliberately do not fall back
/// to comparing display text: that is not transitive (`2 < 10 < "1a" < 2`).
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::Text(x), Value::Text(y)) => collate(x, y),
        _ => class_rank(a).cmp(&class_rank(b)),
    }
}

/// Stable sort. Descending is the exact reverse of ascending, ties included.
pub fn sort_records(rows: &mut [&Record], sort: Option<&SortSpec>) {
    let Some(spec) = sort else {
        return;
    };
    rows.sort_by(|a, b| compare_values(a.get(&spec.field), b.get(&spec.field)));
    if spec.direction == SortDirection::Desc {
        rows.reverse();
    }
}

pub fn total_pages(matched: usize, page_size: usize) -> usize {
    matched.div_ceil(page_size.max(1))
}

/// Clamp into `[1, max(1, total_pages)]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub fn query<'a>(records: &'a [Record], query: &GridQuery) -> GridPage<'a> {
    let page_size = query.page_size();
    let mut rows = filter_by_search(records, &query.search);
    sort_records(&mut rows, query.sort.as_ref());

    let total_matched = rows.len();
    let total_pages = total_pages(total_matched, page_size);
    let page = clamp_page(query.page, total_pages);

    let start = ((page - 1) * page_size).min(total_matched);
    let end = (start + page_size).min(total_matched);

    GridPage {
        rows: rows[start..end].to_vec(),
        page,
        total_pages,
        total_matched,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<Record> {
        vec![
            Record::new().with("id", 1).with("rule", "ALLOW_HTTP").with("count", 15420).with("percentage", "45.2%"),
            Record::new().with("id", 2).with("rule", "BLOCK_MALWARE").with("count", 8730).with("percentage", "25.6%"),
            Record::new().with("id", 3).with("rule", "ALLOW_HTTPS").with("count", 6890).with("percentage", "20.2%"),
            Record::new().with("id", 4).with("rule", "MONITOR_DNS").with("count", 3080).with("percentage", "9.0%"),
        ]
    }

    fn numbered(n: i64) -> Vec<Record> {
        (1..=n).map(|i| Record::new().with("n", i)).collect()
    }

    fn ids(page: &GridPage<'_>) -> Vec<String> {
        page.rows.iter().map(|r| r.text("id")).collect()
    }

    // --- Search ---

    #[test]
    fn test_search_case_insensitive() {
        let records = vec![
            Record::new().with("name", "Alpha").with("value", 1),
            Record::new().with("name", "Beta").with("value", 2),
        ];
        let matched = filter_by_search(&records, "b");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].text("name"), "Beta");
    }

    #[test]
    fn test_search_matches_numbers_and_any_field() {
        let records = rules();
        assert_eq!(filter_by_search(&records, "8730").len(), 1);
        assert_eq!(filter_by_search(&records, "allow").len(), 2);
        assert_eq!(filter_by_search(&records, "%").len(), 4);
        assert_eq!(filter_by_search(&records, "xyz").len(), 0);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let records = rules();
        let page = query(&records, &GridQuery::default());
        assert_eq!(page.total_matched, records.len());
    }

    // --- Sort ---

    #[test]
    fn test_no_sort_keeps_order() {
        let records = rules();
        let page = query(&records, &GridQuery::default());
        assert_eq!(ids(&page), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_numeric_sort() {
        let records = rules();
        let q = GridQuery {
            sort: Some(SortSpec::asc("count")),
            ..GridQuery::default()
        };
        assert_eq!(ids(&query(&records, &q)), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn test_numeric_sort_is_not_lexicographic() {
        let records = vec![
            Record::new().with("n", 10),
            Record::new().with("n", 9),
            Record::new().with("n", 100),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_records(&mut rows, Some(&SortSpec::asc("n")));
        let order: Vec<String> = rows.iter().map(|r| r.text("n")).collect();
        assert_eq!(order, vec!["9", "10", "100"]);
    }

    #[test]
    fn test_text_sort_desc() {
        let records = rules();
        let q = GridQuery {
            sort: Some(SortSpec::desc("rule")),
            ..GridQuery::default()
        };
        assert_eq!(ids(&query(&records, &q)), vec!["4", "2", "3", "1"]);
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let records = vec![
            Record::new().with("h", "beta"),
            Record::new().with("h", "Alpha"),
            Record::new().with("h", "alpha"),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_records(&mut rows, Some(&SortSpec::asc("h")));
        let order: Vec<String> = rows.iter().map(|r| r.text("h")).collect();
        assert_eq!(order, vec!["alpha", "Alpha", "beta"]);
    }

    #[test]
    fn test_mixed_column_orders_numbers_first() {
        let records = vec![
            Record::new().with("v", "n/a"),
            Record::new().with("v", Value::Missing),
            Record::new().with("v", 3),
        ];
        let mut rows: Vec<&Record> = records.iter().collect();
        sort_records(&mut rows, Some(&SortSpec::asc("v")));
        assert_eq!(rows[0].get("v"), &Value::Number(3.0));
        assert_eq!(rows[1].get("v"), &Value::Text("n/a".to_string()));
        assert!(rows[2].get("v").is_missing());
    }

    #[test]
    fn test_mixed_pairs_stay_transitive() {
        let two = Value::from(2);
        let ten = Value::from(10);
        let text = Value::from("1a");
        assert_eq!(compare_values(&two, &ten), Ordering::Less);
        assert_eq!(compare_values(&ten, &text), Ordering::Less);
        assert_eq!(compare_values(&two, &text), Ordering::Less);
    }

    #[test]
    fn test_desc_is_exact_reverse_with_ties() {
        let records = vec![
            Record::new().with("k", "a").with("id", 1),
            Record::new().with("k", "a").with("id", 2),
            Record::new().with("k", "b").with("id", 3),
        ];
        let mut asc: Vec<&Record> = records.iter().collect();
        let mut desc = asc.clone();
        sort_records(&mut asc, Some(&SortSpec::asc("k")));
        sort_records(&mut desc, Some(&SortSpec::desc("k")));
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_next_sort() {
        let first = next_sort(None, "count");
        assert_eq!(first, SortSpec::asc("count"));
        let second = next_sort(Some(&first), "count");
        assert_eq!(second, SortSpec::desc("count"));
        let other = next_sort(Some(&second), "rule");
        assert_eq!(other, SortSpec::asc("rule"));
    }

    // --- Pagination ---

    #[test]
    fn test_last_partial_page() {
        let records = numbered(12);
        let page = query(&records, &GridQuery::default().with_page(3));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].text("n"), "11");
        assert_eq!(page.rows[1].text("n"), "12");
        assert_eq!(page.first_row(), 11);
        assert_eq!(page.last_row(), 12);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let records = numbered(12);
        let high = query(&records, &GridQuery::default().with_page(99));
        assert_eq!(high.page, 3);
        let low = query(&records, &GridQuery::default().with_page(0));
        assert_eq!(low.page, 1);
        assert_eq!(low.rows.len(), 5);
    }

    #[test]
    fn test_empty_result() {
        let records = numbered(3);
        let page = query(&records, &GridQuery::default().with_search("nothing"));
        assert_eq!(page.total_matched, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.first_row(), 0);
    }

    #[test]
    fn test_search_resets_page() {
        let q = GridQuery::default().with_page(3).with_search("x");
        assert_eq!(q.page, 1);
    }

    #[test]
    fn test_sort_keeps_page() {
        let q = GridQuery::default().with_page(2).with_sort("n");
        assert_eq!(q.page, 2);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let records = numbered(3);
        let q = GridQuery {
            page_size: 0,
            ..GridQuery::default()
        };
        let page = query(&records, &q);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(7, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 0);
    }
}
