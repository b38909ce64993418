use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use reportgrid::{
    chart, grid, load_records, logging, render, CategoryFilter, ChartView, Collection, Config,
    DirectorySource, Error, GridQuery, ReportSource, Result, Schema, Selection, SortDirection,
    SortSpec,
};
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "reportgrid")]
#[command(author, version, about = "Browse analysis job reports as tables and charts")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug logging for reportgrid (REPORTGRID_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the columns of a report and the roles inferred for them
    Fields {
        /// Report file (JSON array of flat objects)
        file: PathBuf,

        /// Field that groups records into categories
        #[arg(long)]
        category_field: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one page of a report as a table
    Table {
        /// Report file (JSON array of flat objects)
        file: PathBuf,

        /// Case-insensitive substring matched against every field
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// 1-based page number (clamped to the available pages)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page (default: config `grid.page_size`, else 5)
        #[arg(long)]
        page_size: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Plot a report as a bar chart
    Chart {
        /// Report file (JSON array of flat objects)
        file: PathBuf,

        /// Field that groups records into categories
        #[arg(long)]
        category_field: Option<String>,

        /// Only plot one category ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Uncheck a label (repeatable)
        #[arg(long, conflicts_with = "only")]
        exclude: Vec<String>,

        /// Plot only these labels (repeatable)
        #[arg(long)]
        only: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List analysis jobs under a reports directory, newest first
    Jobs {
        /// Directory containing one subdirectory per job
        root: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the report files of one job
    Reports {
        /// Directory containing one subdirectory per job
        root: PathBuf,

        /// Job id, e.g. Report_07-09-2025-22-10-15
        job: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Serialize)]
struct FieldsOutput<'a> {
    columns: Vec<String>,
    schema: &'a Schema,
}

#[derive(Serialize)]
struct ChartOutput<'a> {
    title: &'a str,
    schema: &'a Schema,
    #[serde(flatten)]
    view: &'a ChartView,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli.command) {
        Ok(()) => {}
        Err(Error::EmptyCollection) => println!("{}", render::EMPTY_STATE.dimmed()),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = std::error::Error::source(cause);
            }
            std::process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<()> {
    let config = Config::load();

    match command {
        Command::Fields {
            file,
            category_field,
            json,
        } => {
            let collection = open_collection(&file, category_field, &config)?;
            let schema = collection.schema()?;
            let columns = collection.columns();
            if json {
                print_json(&FieldsOutput {
                    columns,
                    schema,
                })?;
            } else {
                print!("{}", render::schema(schema, &columns));
            }
        }

        Command::Table {
            file,
            search,
            sort,
            desc,
            page,
            page_size,
            json,
        } => {
            let collection = open_collection(&file, None, &config)?;
            let mut query = GridQuery::with_page_size(page_size.unwrap_or(config.page_size()))
                .with_search(search)
                .with_page(page);
            query.sort = sort.map(|field| SortSpec {
                field,
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            });

            let result = grid::query(collection.records(), &query);
            if json {
                print_json(&result)?;
            } else {
                print!(
                    "{}",
                    render::table(&collection.columns(), &result, query.sort.as_ref())
                );
                println!("{}", render::pager(&result).dimmed());
            }
        }

        Command::Chart {
            file,
            category_field,
            category,
            exclude,
            only,
            json,
        } => {
            let collection = open_collection(&file, category_field, &config)?;
            let records = collection.records();
            let schema = collection.schema()?;

            let mut selection = Selection::new(config.chart.selection_scope);
            if let Some(category) = category {
                selection.set_category(CategoryFilter::parse(&category), records, schema);
            }
            if !only.is_empty() {
                selection.deselect_all();
            }
            for label in only.iter().chain(&exclude) {
                selection.toggle_label(label, records, schema);
            }

            let view = chart::bind(records, schema, &selection);
            let title = config.title(file_name(&file));
            for diagnostic in &view.series.diagnostics {
                eprintln!("{} {}", "warning:".yellow(), diagnostic);
            }

            if json {
                print_json(&ChartOutput {
                    title,
                    schema,
                    view: &view,
                })?;
            } else {
                println!("{}", title.bold());
                print!("{}", render::bar_chart(&view));
                println!();
                print!("{}", render::controls(&view));
            }
        }

        Command::Jobs { root, json } => {
            let jobs = DirectorySource::new(root).list_jobs()?;
            if json {
                print_json(&jobs)?;
            } else {
                print!("{}", render::jobs(&jobs));
            }
        }

        Command::Reports { root, job, json } => {
            let files = DirectorySource::new(root).list_reports(&job)?;
            if json {
                print_json(&files)?;
            } else {
                print!("{}", render::reports(&files));
            }
        }

        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "reportgrid", &mut io::stdout());
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Load a report, taking the category hint from the flag or the report's config entry
fn open_collection(path: &Path, category_field: Option<String>, config: &Config) -> Result<Collection> {
    let records = load_records(path)?;
    let hint = category_field.or_else(|| config.category_field(file_name(path)).map(str::to_string));
    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        category_field = ?hint,
        "loaded report"
    );
    Ok(Collection::new(records, hint.as_deref()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
