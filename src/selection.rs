//! Chart selection state
//!
//! Two filters decide what a chart shows: the active category and the set of
//! individually included labels. Both live here, behind explicit operations, so
//! the inclusion semantics are defined once.
//!
//! "No inclusion filter" and "everything deselected" are different states:
//! [`Inclusion::Unfiltered`] shows every record of the active category, while
//! `Inclusion::Only` with an empty set shows nothing.

use crate::collection::{in_category, labels};
use crate::record::Record;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Category dropdown value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` selects everything, anything else a single category
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => f.write_str(c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    /// No label filter applied
    #[default]
    Unfiltered,
    /// Only these labels are shown; an empty set shows nothing
    Only(BTreeSet<String>),
}

/// Whether label inclusion follows the category dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionScope {
    /// Labels outside the newly selected category are pruned on category change
    #[default]
    Category,
    /// The inclusion set spans the whole collection and survives category changes
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub category: CategoryFilter,
    pub inclusion: Inclusion,
    pub scope: SelectionScope,
}

impl Selection {
    pub fn new(scope: SelectionScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Back to "all" category, no inclusion filter. Used on collection change.
    pub fn reset(&mut self) {
        *self = Self::new(self.scope);
    }

    /// Labels the checkboxes operate on: the active category's labels, or the
    /// whole collection's under [`SelectionScope::Global`]
    pub fn candidate_labels(&self, records: &[Record], schema: &Schema) -> Vec<String> {
        match self.scope {
            SelectionScope::Category => labels(records, schema, &self.category),
            SelectionScope::Global => labels(records, schema, &CategoryFilter::All),
        }
    }

    pub fn set_category(&mut self, category: CategoryFilter, records: &[Record], schema: &Schema) {
        if schema.category_field.is_none() && !category.is_all() {
            tracing::debug!(%category, "collection has no category field, ignoring");
            return;
        }
        self.category = category;

        if self.scope == SelectionScope::Global {
            return;
        }
        let Inclusion::Only(included) = &mut self.inclusion else {
            return;
        };
        if included.is_empty() {
            return;
        }

        let present = labels(records, schema, &self.category);
        let before = included.len();
        included.retain(|label| present.contains(label));
        let pruned = before - included.len();
        if pruned > 0 {
            tracing::debug!(pruned, category = %self.category, "dropped stale label selections");
        }
        if included.is_empty() {
            self.inclusion = Inclusion::Unfiltered;
        }
    }

    /// Flip one checkbox. From the unfiltered state every candidate label
    /// starts checked, so the first toggle unchecks `label`.
    pub fn toggle_label(&mut self, label: &str, records: &[Record], schema: &Schema) {
        let candidates = self.candidate_labels(records, schema);
        if !candidates.iter().any(|c| c == label) {
            tracing::debug!(label, "toggle for a label outside the current selection scope");
            return;
        }

        if self.inclusion == Inclusion::Unfiltered {
            self.inclusion = Inclusion::Only(candidates.into_iter().collect());
        }
        if let Inclusion::Only(included) = &mut self.inclusion {
            if !included.remove(label) {
                included.insert(label.to_string());
            }
        }
    }

    pub fn select_all(&mut self, records: &[Record], schema: &Schema) {
        let candidates = self.candidate_labels(records, schema);
        self.inclusion = Inclusion::Only(candidates.into_iter().collect());
    }

    /// Explicitly show nothing
    pub fn deselect_all(&mut self) {
        self.inclusion = Inclusion::Only(BTreeSet::new());
    }

    /// Drop the label filter entirely
    pub fn clear(&mut self) {
        self.inclusion = Inclusion::Unfiltered;
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.inclusion, Inclusion::Only(_))
    }

    pub fn is_checked(&self, label: &str) -> bool {
        match &self.inclusion {
            Inclusion::Unfiltered => true,
            Inclusion::Only(included) => included.contains(label),
        }
    }

    /// Records visible under the current selection, in collection order
    pub fn resolve<'a>(&self, records: &'a [Record], schema: &Schema) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|r| in_category(r, schema, &self.category))
            .filter(|r| match &self.inclusion {
                Inclusion::Unfiltered => true,
                Inclusion::Only(included) => included.contains(&r.text(&schema.label_field)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::infer_collection;

    fn two_categories() -> (Vec<Record>, Schema) {
        let records = vec![
            Record::new().with("name", "A").with("value", 10).with("cat", "X"),
            Record::new().with("name", "B").with("value", 5).with("cat", "Y"),
        ];
        let schema = infer_collection(&records, Some("cat")).unwrap();
        (records, schema)
    }

    fn by_app() -> (Vec<Record>, Schema) {
        let records = vec![
            Record::new().with("name", "HTTP").with("value", 18420).with("category", "Web Browser"),
            Record::new().with("name", "HTTPS").with("value", 15730).with("category", "Web Browser"),
            Record::new().with("name", "SSH").with("value", 8890).with("category", "Terminal"),
            Record::new().with("name", "FTP").with("value", 6980).with("category", "File Manager"),
        ];
        let schema = infer_collection(&records, Some("category")).unwrap();
        (records, schema)
    }

    fn names(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r.text("name")).collect()
    }

    #[test]
    fn test_default_shows_everything() {
        let (records, schema) = by_app();
        let selection = Selection::default();
        assert_eq!(selection.resolve(&records, &schema).len(), 4);
        assert!(selection.is_checked("SSH"));
        assert!(!selection.is_filtered());
    }

    #[test]
    fn test_category_then_toggle_last_item_leaves_nothing() {
        let (records, schema) = two_categories();
        let mut selection = Selection::default();

        selection.set_category(CategoryFilter::parse("X"), &records, &schema);
        assert_eq!(names(&selection.resolve(&records, &schema)), vec!["A"]);

        selection.toggle_label("A", &records, &schema);
        assert!(selection.resolve(&records, &schema).is_empty());
        assert_eq!(selection.inclusion, Inclusion::Only(BTreeSet::new()));
    }

    #[test]
    fn test_toggle_twice_restores_item() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.toggle_label("SSH", &records, &schema);
        assert_eq!(
            names(&selection.resolve(&records, &schema)),
            vec!["HTTP", "HTTPS", "FTP"]
        );
        selection.toggle_label("SSH", &records, &schema);
        assert_eq!(selection.resolve(&records, &schema).len(), 4);
        // still an explicit filter, just one that includes everything
        assert!(selection.is_filtered());
    }

    #[test]
    fn test_deselect_all_is_not_unfiltered() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.deselect_all();
        assert!(selection.resolve(&records, &schema).is_empty());
        assert!(!selection.is_checked("HTTP"));

        selection.toggle_label("FTP", &records, &schema);
        assert_eq!(names(&selection.resolve(&records, &schema)), vec!["FTP"]);
    }

    #[test]
    fn test_select_all_matches_unfiltered_view() {
        let (records, schema) = by_app();
        let unfiltered = Selection::default();
        let mut all = Selection::default();
        all.select_all(&records, &schema);
        assert_eq!(
            all.resolve(&records, &schema),
            unfiltered.resolve(&records, &schema)
        );

        let mut cleared = Selection::default();
        cleared.deselect_all();
        cleared.clear();
        assert_eq!(
            cleared.resolve(&records, &schema),
            all.resolve(&records, &schema)
        );
    }

    #[test]
    fn test_select_all_is_category_scoped() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.set_category(CategoryFilter::parse("Web Browser"), &records, &schema);
        selection.select_all(&records, &schema);
        assert_eq!(
            selection.inclusion,
            Inclusion::Only(["HTTP".to_string(), "HTTPS".to_string()].into_iter().collect())
        );

        // hidden-category items don't come back when returning to "all"
        selection.set_category(CategoryFilter::All, &records, &schema);
        assert_eq!(
            names(&selection.resolve(&records, &schema)),
            vec!["HTTP", "HTTPS"]
        );
    }

    #[test]
    fn test_category_change_prunes_stale_labels() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.toggle_label("FTP", &records, &schema); // HTTP, HTTPS, SSH remain
        selection.set_category(CategoryFilter::parse("Web Browser"), &records, &schema);
        assert_eq!(
            selection.inclusion,
            Inclusion::Only(["HTTP".to_string(), "HTTPS".to_string()].into_iter().collect())
        );
    }

    #[test]
    fn test_pruning_to_nothing_drops_the_filter() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.set_category(CategoryFilter::parse("Terminal"), &records, &schema);
        selection.select_all(&records, &schema); // {SSH}
        selection.set_category(CategoryFilter::parse("File Manager"), &records, &schema);
        assert_eq!(selection.inclusion, Inclusion::Unfiltered);
        assert_eq!(names(&selection.resolve(&records, &schema)), vec!["FTP"]);
    }

    #[test]
    fn test_explicit_empty_survives_category_change() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.deselect_all();
        selection.set_category(CategoryFilter::parse("Terminal"), &records, &schema);
        assert!(selection.resolve(&records, &schema).is_empty());
    }

    #[test]
    fn test_global_scope_keeps_labels_across_categories() {
        let (records, schema) = by_app();
        let mut selection = Selection::new(SelectionScope::Global);
        selection.set_category(CategoryFilter::parse("Terminal"), &records, &schema);
        selection.toggle_label("HTTP", &records, &schema); // allowed: global candidates
        selection.set_category(CategoryFilter::parse("Web Browser"), &records, &schema);
        assert_eq!(names(&selection.resolve(&records, &schema)), vec!["HTTPS"]);
        selection.set_category(CategoryFilter::All, &records, &schema);
        assert_eq!(
            names(&selection.resolve(&records, &schema)),
            vec!["HTTPS", "SSH", "FTP"]
        );
    }

    #[test]
    fn test_toggle_outside_category_is_ignored() {
        let (records, schema) = by_app();
        let mut selection = Selection::default();
        selection.set_category(CategoryFilter::parse("Terminal"), &records, &schema);
        selection.toggle_label("HTTP", &records, &schema);
        assert_eq!(selection.inclusion, Inclusion::Unfiltered);
    }

    #[test]
    fn test_category_ignored_without_category_field() {
        let records = vec![Record::new().with("name", "A").with("value", 1)];
        let schema = infer_collection(&records, None).unwrap();
        let mut selection = Selection::default();
        selection.set_category(CategoryFilter::parse("X"), &records, &schema);
        assert_eq!(selection.category, CategoryFilter::All);
        assert_eq!(selection.resolve(&records, &schema).len(), 1);
    }

    #[test]
    fn test_reset_keeps_scope() {
        let mut selection = Selection::new(SelectionScope::Global);
        selection.deselect_all();
        selection.category = CategoryFilter::parse("X");
        selection.reset();
        assert_eq!(selection, Selection::new(SelectionScope::Global));
    }
}
