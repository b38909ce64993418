//! Dashboard messages
//!
//! One variant per user interaction, plus the responses the API client feeds
//! back. Messages describe what happened; `update` decides what it means.

use crate::catalog::{Job, ReportFile};
use crate::record::Record;
use crate::selection::CategoryFilter;

/// Identifies a report fetch so late responses can be told apart from the latest one
pub type Ticket = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Report browser ===
    /// Job list arrived from the API client
    JobsLoaded(Vec<Job>),
    /// User picked a job
    SelectJob(String),
    /// File list for a job arrived
    ReportListLoaded { job_id: String, files: Vec<ReportFile> },
    /// Check/uncheck a file for deletion
    ToggleFileMark(String),
    /// Delete every checked file
    DeleteMarked,
    /// User clicked a report to view it
    OpenReport(String),
    /// Records for a fetch arrived
    ReportLoaded { ticket: Ticket, records: Vec<Record> },
    /// A fetch failed
    ReportFailed { ticket: Ticket, error: String },

    // === Grid ===
    /// Search box changed
    SetSearch(String),
    /// Column header clicked
    SortBy(String),
    NextPage,
    PrevPage,
    GoToPage(usize),

    // === Chart ===
    /// Category dropdown changed
    SelectCategory(CategoryFilter),
    /// Checkbox clicked
    ToggleLabel(String),
    SelectAll,
    DeselectAll,
    /// Drop the label filter entirely
    ClearSelection,
}

impl Msg {
    /// True for messages that only touch the chart selection
    pub fn is_chart_event(&self) -> bool {
        matches!(
            self,
            Msg::SelectCategory(_)
                | Msg::ToggleLabel(_)
                | Msg::SelectAll
                | Msg::DeselectAll
                | Msg::ClearSelection
        )
    }
}
