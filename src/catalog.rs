//! Analysis jobs and their report files
//!
//! `ReportCatalog` is the pure state behind the report browser: which job is
//! selected, which report is open, which files are marked for deletion. The
//! directory scan at the bottom backs the CLI, which reads reports laid out as
//! `<root>/<job_id>/<report>.json`.

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};

const JOB_PREFIX: &str = "Report_";
const JOB_TIMESTAMP: &str = "%d-%m-%Y-%H-%M-%S";

/// One analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: String,
    /// Parsed from ids shaped `Report_DD-MM-YYYY-HH-MM-SS`
    pub created: Option<NaiveDateTime>,
}

impl Job {
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let created = id
            .strip_prefix(JOB_PREFIX)
            .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, JOB_TIMESTAMP).ok());
        Self { id, created }
    }

    pub fn created_display(&self) -> String {
        self.created
            .map(|c| c.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFile {
    pub name: String,
    pub size: String,
    pub modified: String,
}

impl ReportFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: String::new(),
            modified: String::new(),
        }
    }
}

/// What `delete_marked` removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deletion {
    pub removed: Vec<String>,
    /// The open report was among the removed files and has been closed
    pub closed_open_report: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportCatalog {
    pub jobs: Vec<Job>,
    pub selected_job: Option<String>,
    pub files: Vec<ReportFile>,
    /// Files checked for deletion, in the order they were checked
    pub marked: Vec<String>,
    pub open_report: Option<String>,
}

impl ReportCatalog {
    pub fn set_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }

    /// Switching jobs forgets the previous job's files, marks and open report
    pub fn select_job(&mut self, job_id: &str) {
        self.selected_job = Some(job_id.to_string());
        self.files.clear();
        self.marked.clear();
        self.open_report = None;
    }

    /// Install a job's file list. Lists for a job that is no longer selected are ignored.
    pub fn set_files(&mut self, job_id: &str, files: Vec<ReportFile>) -> bool {
        if self.selected_job.as_deref() != Some(job_id) {
            tracing::debug!(job_id, "ignoring report list for a job that is no longer selected");
            return false;
        }
        self.files = files;
        self.marked.retain(|m| self.files.iter().any(|f| f.name == *m));
        true
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    pub fn toggle_mark(&mut self, name: &str) {
        if !self.has_file(name) {
            return;
        }
        match self.marked.iter().position(|m| m == name) {
            Some(idx) => {
                self.marked.remove(idx);
            }
            None => self.marked.push(name.to_string()),
        }
    }

    pub fn is_marked(&self, name: &str) -> bool {
        self.marked.iter().any(|m| m == name)
    }

    pub fn delete_marked(&mut self) -> Deletion {
        if self.marked.is_empty() {
            return Deletion::default();
        }
        let removed = std::mem::take(&mut self.marked);
        self.files.retain(|f| !removed.contains(&f.name));

        let closed_open_report = self
            .open_report
            .as_ref()
            .is_some_and(|open| removed.contains(open));
        if closed_open_report {
            self.open_report = None;
        }

        Deletion {
            removed,
            closed_open_report,
        }
    }

    /// Open a report of the selected job
    pub fn open(&mut self, name: &str) -> bool {
        if !self.has_file(name) {
            return false;
        }
        self.open_report = Some(name.to_string());
        true
    }
}

/// Human-readable size in the backend's style: `2.4 MB`
pub fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

fn read_dir(path: &Path) -> Result<std::fs::ReadDir> {
    std::fs::read_dir(path).map_err(|source| Error::ReadDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Job directories under `root`, newest first; undated ids sort last by name
pub fn scan_jobs(root: &Path) -> Result<Vec<Job>> {
    let mut jobs: Vec<Job> = read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(Job::from_id))
        .collect();

    jobs.sort_by(|a, b| match (a.created, b.created) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    Ok(jobs)
}

pub fn report_path(root: &Path, job_id: &str, report: &str) -> PathBuf {
    root.join(job_id).join(report)
}

/// JSON report files of one job, sorted by name
pub fn scan_reports(root: &Path, job_id: &str) -> Result<Vec<ReportFile>> {
    let dir = root.join(job_id);
    let mut files: Vec<ReportFile> = read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let meta = entry.metadata().ok()?;
            let modified = meta
                .modified()
                .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            Some(ReportFile {
                name,
                size: human_size(meta.len()),
                modified,
            })
        })
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
