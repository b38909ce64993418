//! Report dashboard event loop
//!
//! Follows The Elm Architecture: every user interaction is a [`Msg`], the pure
//! [`update`] function turns `(Msg, Model)` into a new model plus a [`Cmd`], and
//! the [`Dashboard`] shell executes commands against a [`ReportSource`], feeding
//! the answers back in as messages. Transport lives entirely behind
//! `ReportSource`.

pub mod msg; // what happened
pub mod update; // state transitions

pub use msg::{Msg, Ticket};
pub use update::{update, Cmd, Model};

use crate::catalog::{self, Job, ReportFile};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{load_records, Record};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Where jobs, report lists and report records come from
pub trait ReportSource {
    fn list_jobs(&self) -> Result<Vec<Job>>;
    fn list_reports(&self, job_id: &str) -> Result<Vec<ReportFile>>;
    fn fetch_report(&self, job_id: &str, report: &str) -> Result<Vec<Record>>;
    /// Delete every file it can; the first failure is returned after all were attempted
    fn delete_reports(&self, job_id: &str, files: &[String]) -> Result<()>;
}

/// Reports stored as `<root>/<job_id>/<report>.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReportSource for DirectorySource {
    fn list_jobs(&self) -> Result<Vec<Job>> {
        catalog::scan_jobs(&self.root)
    }

    fn list_reports(&self, job_id: &str) -> Result<Vec<ReportFile>> {
        catalog::scan_reports(&self.root, job_id)
    }

    fn fetch_report(&self, job_id: &str, report: &str) -> Result<Vec<Record>> {
        load_records(&catalog::report_path(&self.root, job_id, report))
    }

    fn delete_reports(&self, job_id: &str, files: &[String]) -> Result<()> {
        let mut first_error = None;
        for file in files {
            let path = catalog::report_path(&self.root, job_id, file);
            if let Err(source) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %source, "failed to delete report");
                first_error.get_or_insert(Error::DeleteFile { path, source });
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Imperative shell: owns the model and runs commands synchronously
pub struct Dashboard<S> {
    model: Model,
    source: S,
}

impl<S: ReportSource> Dashboard<S> {
    /// Start a dashboard with the source's job list loaded
    pub fn new(config: Config, source: S) -> Result<Self> {
        let jobs = source.list_jobs()?;
        let mut dashboard = Self {
            model: Model::new(config),
            source,
        };
        dashboard.dispatch(Msg::JobsLoaded(jobs));
        Ok(dashboard)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Apply one message and everything it triggers, before returning
    pub fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let model = std::mem::take(&mut self.model);
            let (model, cmd) = update(msg, model);
            self.model = model;
            self.run(cmd, &mut queue);
        }
    }

    fn run(&mut self, cmd: Cmd, queue: &mut VecDeque<Msg>) {
        match cmd {
            Cmd::None => {}
            Cmd::FetchReportList { job_id } => match self.source.list_reports(&job_id) {
                Ok(files) => queue.push_back(Msg::ReportListLoaded { job_id, files }),
                Err(e) => {
                    tracing::warn!(job_id, error = %e, "failed to list reports");
                    self.model.status_message = Some(format!("Failed to fetch job reports: {}", e));
                }
            },
            Cmd::FetchReport {
                ticket,
                job_id,
                report,
            } => match self.source.fetch_report(&job_id, &report) {
                Ok(records) => queue.push_back(Msg::ReportLoaded { ticket, records }),
                Err(e) => {
                    tracing::warn!(job_id, report, error = %e, "failed to fetch report");
                    queue.push_back(Msg::ReportFailed {
                        ticket,
                        error: format!("Failed to fetch report data: {}", e),
                    });
                }
            },
            Cmd::DeleteReports { job_id, files } => {
                if let Err(e) = self.source.delete_reports(&job_id, &files) {
                    tracing::warn!(job_id, error = %e, "failed to delete reports");
                    self.model.status_message = Some(format!("Failed to delete reports: {}", e));
                    // files were dropped from the list up front; re-list what survived
                    self.run(Cmd::FetchReportList { job_id }, queue);
                }
            }
        }
    }
}
