//! manpower CLI - Construction Manpower Scheduler
//!
//! Command-line interface for building, previewing and exporting staffing
//! curves.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{parse_department, sanitize_file_stem, Overrides, ProjectConfig};
use manpower_core::{Department, Renderer, ScheduleSummary, ScheduleTable, Scheduler};
use manpower_render::{SvgChartRenderer, TextRenderer, DEFAULT_FILE_NAME};
use manpower_solver::CurveScheduler;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "manpower")]
#[command(author, version, about = "Construction manpower scheduler", long_about = None)]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a schedule and print a preview
    Plan {
        #[command(flatten)]
        input: InputArgs,

        /// Preview format
        #[arg(short, long, value_enum, default_value_t = PreviewFormat::Text)]
        format: PreviewFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a schedule and write it as an Excel workbook with a chart
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Output file path
        #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
        output: PathBuf,
    },

    /// Write a starter config file
    Init {
        /// Project name
        #[arg(default_value = "manpower")]
        name: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Where schedule parameters come from
#[derive(Args, Clone, Debug)]
struct InputArgs {
    /// Config file (TOML)
    #[arg(short, long, value_name = "FILE", env = "MANPOWER_CONFIG")]
    config: Option<PathBuf>,

    /// Project duration in weeks
    #[arg(short, long)]
    weeks: Option<u32>,

    /// Total scope units
    #[arg(short, long)]
    scope: Option<f64>,

    /// Department allocation, e.g. --dept Electricians=0.4 (repeatable)
    #[arg(long = "dept", value_name = "NAME=RATIO", value_parser = parse_department)]
    departments: Vec<Department>,

    /// Use only the departments given with --dept
    #[arg(long)]
    only: bool,
}

impl InputArgs {
    fn resolve(&self) -> Result<ProjectConfig> {
        let mut config = ProjectConfig::load_or_default(self.config.as_deref())?;
        config.apply(&Overrides {
            weeks: self.weeks,
            scope: self.scope,
            departments: self.departments.clone(),
            only: self.only,
        });
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PreviewFormat {
    Text,
    Json,
    Svg,
}

/// JSON preview document
#[derive(Serialize)]
struct PlanReport<'a> {
    parameters: &'a manpower_core::ScheduleParameters,
    table: &'a ScheduleTable,
    summary: ScheduleSummary,
    scope_coverage: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan {
            input,
            format,
            output,
        } => cmd_plan(&input, format, output.as_deref()),
        Commands::Export { input, output } => cmd_export(&input, &output),
        Commands::Init {
            name,
            output,
            force,
        } => cmd_init(&name, &output, force),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build(config: &ProjectConfig) -> Result<ScheduleTable> {
    let params = &config.schedule;
    info!(
        weeks = params.total_weeks,
        scope = params.total_scope,
        departments = params.departments.len(),
        "building schedule"
    );
    CurveScheduler::new()
        .schedule(params)
        .context("Failed to build schedule")
}

fn cmd_plan(input: &InputArgs, format: PreviewFormat, output: Option<&Path>) -> Result<()> {
    let config = input.resolve()?;
    let table = build(&config)?;

    let rendered = match format {
        PreviewFormat::Text => {
            let mut text = TextRenderer::new().render(&table)?;
            if let Some(coverage) = table.summary().scope_coverage(config.schedule.total_scope) {
                text.push_str(&format!("Scope coverage: {:.1}%\n", coverage * 100.0));
            }
            text
        }
        PreviewFormat::Json => {
            let summary = table.summary();
            let report = PlanReport {
                parameters: &config.schedule,
                table: &table,
                scope_coverage: summary.scope_coverage(config.schedule.total_scope),
                summary,
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            json
        }
        PreviewFormat::Svg => {
            let title = match &config.name {
                Some(name) => format!("{} - {}", config.workbook.chart_title, name),
                None => config.workbook.chart_title.clone(),
            };
            SvgChartRenderer::new().title(title).render(&table)?
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn cmd_export(input: &InputArgs, output: &Path) -> Result<()> {
    let config = input.resolve()?;
    let table = build(&config)?;

    let bytes = config
        .workbook
        .renderer()
        .render(&table)
        .context("Failed to render workbook")?;

    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(bytes = bytes.len(), path = %output.display(), "workbook written");
    println!(
        "Wrote: {} ({} weeks, {} departments)",
        output.display(),
        table.week_count(),
        table.departments.len()
    );
    Ok(())
}

fn cmd_init(name: &str, dir: &Path, force: bool) -> Result<()> {
    let stem = sanitize_file_stem(name)?;
    let path = dir.join(format!("{stem}.toml"));

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&path, ProjectConfig::template(name)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created: {}", path.display());
    Ok(())
}
