//! Dashboard update function
//!
//! ```text
//! update : Msg -> Model -> (Model, Cmd)
//! ```
//!
//! `update` is pure. Anything that needs the network (listing reports,
//! fetching records, deleting files) comes back as a [`Cmd`] for the API client
//! to execute; its answers re-enter as messages.

use super::msg::{Msg, Ticket};
use crate::catalog::ReportCatalog;
use crate::chart::{self, ChartView};
use crate::collection::Collection;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::grid::{self, GridPage, GridQuery};
use crate::selection::Selection;

/// Side effects for the runtime (API client) to execute
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No command
    None,
    /// List the report files of a job
    FetchReportList { job_id: String },
    /// Fetch report records; answer with `Msg::ReportLoaded` carrying the same ticket
    FetchReport {
        ticket: Ticket,
        job_id: String,
        report: String,
    },
    /// Delete report files on the backend. On failure the runtime re-lists the
    /// job so the file list matches what is actually left.
    DeleteReports { job_id: String, files: Vec<String> },
}

/// Dashboard state: report browser, loaded collection, grid query and chart selection
#[derive(Debug, Clone)]
pub struct Model {
    pub catalog: ReportCatalog,
    /// Snapshot of the open report; `None` until one loads
    pub collection: Option<Collection>,
    pub grid: GridQuery,
    pub selection: Selection,
    pub config: Config,
    /// Ticket of the most recent fetch; responses with any other ticket are stale
    pub latest_ticket: Ticket,
    pub loading: bool,
    pub status_message: Option<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Model {
    pub fn new(config: Config) -> Self {
        Self {
            catalog: ReportCatalog::default(),
            collection: None,
            grid: GridQuery::with_page_size(config.page_size()),
            selection: Selection::new(config.chart.selection_scope),
            config,
            latest_ticket: 0,
            loading: false,
            status_message: None,
        }
    }

    /// Current grid page, `None` when no report is open
    pub fn grid_page(&self) -> Option<GridPage<'_>> {
        self.collection
            .as_ref()
            .map(|c| grid::query(c.records(), &self.grid))
    }

    /// Chart for the open report. No report, or an empty one, is `EmptyCollection`.
    pub fn chart_view(&self) -> Result<ChartView> {
        let collection = self.collection.as_ref().ok_or(Error::EmptyCollection)?;
        let schema = collection.schema()?;
        Ok(chart::bind(collection.records(), schema, &self.selection))
    }

    pub fn chart_title(&self) -> Option<&str> {
        self.catalog
            .open_report
            .as_deref()
            .map(|name| self.config.title(name))
    }

    /// Forget the open report's derived state
    fn close_report(&mut self) {
        self.collection = None;
        self.grid = GridQuery::with_page_size(self.config.page_size());
        self.selection.reset();
        self.loading = false;
    }

    /// Keep `grid.page` inside `[1, max(1, total_pages)]`
    fn clamp_grid_page(&mut self) {
        let clamped = self.grid_page().map(|p| p.page);
        if let Some(page) = clamped {
            self.grid.page = page;
        }
    }
}

/// Process one message
pub fn update(msg: Msg, mut model: Model) -> (Model, Cmd) {
    if msg.is_chart_event() {
        return (update_selection(msg, model), Cmd::None);
    }

    match msg {
        // === Report browser ===
        Msg::JobsLoaded(jobs) => {
            model.catalog.set_jobs(jobs);
            (model, Cmd::None)
        }

        Msg::SelectJob(job_id) => {
            model.catalog.select_job(&job_id);
            model.close_report();
            // invalidate any fetch still in flight for the previous job
            model.latest_ticket += 1;
            (model, Cmd::FetchReportList { job_id })
        }

        Msg::ReportListLoaded { job_id, files } => {
            model.catalog.set_files(&job_id, files);
            (model, Cmd::None)
        }

        Msg::ToggleFileMark(name) => {
            model.catalog.toggle_mark(&name);
            (model, Cmd::None)
        }

        Msg::DeleteMarked => {
            let Some(job_id) = model.catalog.selected_job.clone() else {
                return (model, Cmd::None);
            };
            let deletion = model.catalog.delete_marked();
            if deletion.removed.is_empty() {
                return (model, Cmd::None);
            }
            if deletion.closed_open_report {
                model.close_report();
                model.latest_ticket += 1;
            }
            model.status_message = Some(format!("Deleted {} report(s)", deletion.removed.len()));
            let cmd = Cmd::DeleteReports {
                job_id,
                files: deletion.removed,
            };
            (model, cmd)
        }

        Msg::OpenReport(report) => {
            let Some(job_id) = model.catalog.selected_job.clone() else {
                return (model, Cmd::None);
            };
            if !model.catalog.open(&report) {
                return (model, Cmd::None);
            }
            model.latest_ticket += 1;
            model.loading = true;
            let cmd = Cmd::FetchReport {
                ticket: model.latest_ticket,
                job_id,
                report,
            };
            (model, cmd)
        }

        Msg::ReportLoaded { ticket, records } => {
            if ticket != model.latest_ticket {
                tracing::debug!(ticket, latest = model.latest_ticket, "dropping stale report response");
                return (model, Cmd::None);
            }
            let hint = model
                .catalog
                .open_report
                .as_deref()
                .and_then(|name| model.config.category_field(name))
                .map(str::to_string);
            model.close_report();
            let collection = Collection::new(records, hint.as_deref());
            model.status_message = collection
                .is_empty()
                .then(|| "Report has no rows".to_string());
            model.collection = Some(collection);
            (model, Cmd::None)
        }

        Msg::ReportFailed { ticket, error } => {
            if ticket != model.latest_ticket {
                return (model, Cmd::None);
            }
            model.loading = false;
            model.status_message = Some(error);
            (model, Cmd::None)
        }

        // === Grid ===
        Msg::SetSearch(search) => {
            model.grid = model.grid.with_search(search);
            model.clamp_grid_page();
            (model, Cmd::None)
        }

        Msg::SortBy(field) => {
            model.grid = model.grid.with_sort(&field);
            model.clamp_grid_page();
            (model, Cmd::None)
        }

        Msg::NextPage => {
            model.grid.page = model.grid.page.saturating_add(1);
            model.clamp_grid_page();
            (model, Cmd::None)
        }

        Msg::PrevPage => {
            model.grid.page = model.grid.page.saturating_sub(1);
            model.clamp_grid_page();
            (model, Cmd::None)
        }

        Msg::GoToPage(page) => {
            model.grid.page = page;
            model.clamp_grid_page();
            (model, Cmd::None)
        }

        // handled above
        Msg::SelectCategory(_)
        | Msg::ToggleLabel(_)
        | Msg::SelectAll
        | Msg::DeselectAll
        | Msg::ClearSelection => (model, Cmd::None),
    }
}

fn update_selection(msg: Msg, mut model: Model) -> Model {
    let Some(collection) = model.collection.as_ref() else {
        return model;
    };
    let Ok(schema) = collection.schema() else {
        return model;
    };
    let records = collection.records();
    let selection = &mut model.selection;

    match msg {
        Msg::SelectCategory(category) => selection.set_category(category, records, schema),
        Msg::ToggleLabel(label) => selection.toggle_label(&label, records, schema),
        Msg::SelectAll => selection.select_all(records, schema),
        Msg::DeselectAll => selection.deselect_all(),
        Msg::ClearSelection => selection.clear(),
        _ => {}
    }
    model
}
