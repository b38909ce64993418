//! reportgrid - browse analysis job reports as tables and charts
//!
//! Loads the flat JSON record arrays an analysis backend produces per job and
//! answers the two questions a report page asks of them: which rows to show in
//! a searchable, sortable, paged grid, and which `(label, value)` pairs to plot
//! given the current category and checkbox selection.
//!
//! # Overview
//!
//! Reports carry no schema, so roles are inferred from the first record:
//!
//! | Role | Rule |
//! |------|------|
//! | `value` | last numeric field, else the last field |
//! | `label` | first field that is neither the category nor the value |
//! | `category` | only when named by report metadata |
//!
//! All of the logic is pure: [`grid::query`] and [`chart::bind`] are functions
//! of the records plus a small state value, and the [`dashboard`] module wires
//! them into an update loop.
//!
//! # Quick Start
//!
//! ```
//! use reportgrid::{chart, grid, records_from_json, Collection, GridQuery, Selection};
//!
//! let records = records_from_json(
//!     r#"[{"name": "ALLOW_HTTP", "value": 15420}, {"name": "BLOCK_SPAM", "value": 2150}]"#,
//! )
//! .unwrap();
//! let collection = Collection::new(records, None);
//! let schema = collection.schema().unwrap();
//!
//! let page = grid::query(collection.records(), &GridQuery::default().with_search("spam"));
//! assert_eq!(page.total_matched, 1);
//!
//! let view = chart::bind(collection.records(), schema, &Selection::default());
//! assert_eq!(view.series.total(), 17570.0);
//! ```

pub mod catalog;
pub mod chart;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod grid;
pub mod logging;
pub mod record;
pub mod render;
pub mod schema;
pub mod selection;

pub use catalog::{Job, ReportCatalog, ReportFile};
pub use chart::{ChartView, Diagnostic, Series, SeriesPoint};
pub use collection::Collection;
pub use config::Config;
pub use dashboard::{Dashboard, DirectorySource, ReportSource};
pub use error::{Error, Result};
pub use grid::{GridPage, GridQuery, SortDirection, SortSpec};
pub use record::{load_records, records_from_json, Record, Value};
pub use schema::Schema;
pub use selection::{CategoryFilter, Inclusion, Selection, SelectionScope};
