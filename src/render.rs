//! Plain-text rendering for the CLI
//!
//! Every function returns a `String` so output can be asserted on directly;
//! colour is applied by the caller.

use crate::catalog::{Job, ReportFile};
use crate::chart::ChartView;
use crate::grid::{GridPage, SortSpec};
use crate::schema::Schema;
use std::fmt::Write;

pub const EMPTY_STATE: &str = "No data available";
pub const NO_ITEMS: &str = "No items selected";

const BAR_WIDTH: usize = 40;
const BAR: char = '█';

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    format!("{}{}", s, " ".repeat(to.saturating_sub(width(s))))
}

/// Column headers, with the sort arrow on the sorted column
fn header_cells(columns: &[String], sort: Option<&SortSpec>) -> Vec<String> {
    columns
        .iter()
        .map(|c| match sort {
            Some(spec) if spec.field == *c => format!("{} {}", c, spec.direction.arrow()),
            _ => c.clone(),
        })
        .collect()
}

/// One grid page as an aligned text table
pub fn table(columns: &[String], page: &GridPage<'_>, sort: Option<&SortSpec>) -> String {
    if columns.is_empty() {
        return format!("{}\n", EMPTY_STATE);
    }

    let headers = header_cells(columns, sort);
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|r| columns.iter().map(|c| r.text(c)).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| width(&row[i]))
                .chain(std::iter::once(width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(&headers)).unwrap();
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("  ")).unwrap();

    if cells.is_empty() {
        writeln!(out, "{}", EMPTY_STATE).unwrap();
    }
    for row in &cells {
        writeln!(out, "{}", line(row)).unwrap();
    }
    out
}

/// `Showing 11 to 12 of 12 results (page 3 of 3)`
pub fn pager(page: &GridPage<'_>) -> String {
    format!(
        "Showing {} to {} of {} results (page {} of {})",
        page.first_row(),
        page.last_row(),
        page.total_matched,
        page.page,
        page.total_pages.max(1)
    )
}

pub fn schema(schema: &Schema, columns: &[String]) -> String {
    let mut out = String::new();
    writeln!(out, "columns:  {}", columns.join(", ")).unwrap();
    writeln!(out, "label:    {}", schema.label_field).unwrap();
    writeln!(out, "value:    {}", schema.value_field).unwrap();
    writeln!(
        out,
        "category: {}",
        schema.category_field.as_deref().unwrap_or("-")
    )
    .unwrap();
    out
}

/// Horizontal bar chart, bars scaled to the largest value
pub fn bar_chart(view: &ChartView) -> String {
    let points = &view.series.points;
    if points.is_empty() {
        return format!("{}\n", NO_ITEMS);
    }

    let label_width = points.iter().map(|p| width(&p.label)).max().unwrap_or(0);
    let max = view.series.max();

    let mut out = String::new();
    for point in points {
        let len = if max > 0.0 && point.value > 0.0 {
            ((point.value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = BAR.to_string().repeat(len);
        writeln!(
            out,
            "{}  {} {}",
            pad(&point.label, label_width),
            bar,
            point.value
        )
        .unwrap();
    }
    out
}

/// Category dropdown and item checkboxes
pub fn controls(view: &ChartView) -> String {
    let mut out = String::new();
    if !view.categories.is_empty() {
        let options: Vec<String> = view
            .categories
            .iter()
            .map(|c| {
                if c.selected {
                    format!("[{}]", c.value)
                } else {
                    c.value.to_string()
                }
            })
            .collect();
        writeln!(out, "category: {}", options.join(" | ")).unwrap();
    }
    for item in &view.items {
        let mark = if item.checked { 'x' } else { ' ' };
        writeln!(out, "[{}] {}", mark, item.label).unwrap();
    }
    out
}

pub fn jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs found\n".to_string();
    }
    let id_width = jobs.iter().map(|j| width(&j.id)).max().unwrap_or(0);
    let mut out = String::new();
    for job in jobs {
        writeln!(out, "{}  {}", pad(&job.id, id_width), job.created_display())
            .unwrap();
    }
    // created is empty for undated ids
    out.lines().map(|l| format!("{}\n", l.trim_end())).collect()
}

pub fn reports(files: &[ReportFile]) -> String {
    if files.is_empty() {
        return "No reports found\n".to_string();
    }
    let name_width = files.iter().map(|f| width(&f.name)).max().unwrap_or(0);
    let size_width = files.iter().map(|f| width(&f.size)).max().unwrap_or(0);
    let mut out = String::new();
    for file in files {
        writeln!(
            out,
            "{}  {}  {}",
            pad(&file.name, name_width),
            pad(&file.size, size_width),
            file.modified
        )
        .unwrap();
    }
    out
}
