//! Project configuration files
//!
//! A config file is TOML with a `[schedule]` table (the schedule parameters)
//! and an optional `[workbook]` table for export labels:
//!
//! ```toml
//! name = "tower-b"
//!
//! [schedule]
//! total_weeks = 20
//! total_scope = 1000.0
//!
//! [[schedule.departments]]
//! name = "Engineering"
//! ratio = 0.25
//!
//! [workbook]
//! sheet_name = "Manpower Schedule"
//! chart_title = "Construction Manpower Schedule"
//! ```
//!
//! Command-line flags are applied on top of whatever the file provides.

use anyhow::{bail, Context, Result};
use manpower_core::{Department, ScheduleParameters};
use manpower_render::ExcelRenderer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a project config file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project label, used for titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub schedule: ScheduleParameters,
    #[serde(default)]
    pub workbook: WorkbookConfig,
}

/// Labels used in the exported workbook
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    pub sheet_name: String,
    pub chart_title: String,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        let renderer = ExcelRenderer::default();
        Self {
            sheet_name: renderer.sheet_name,
            chart_title: renderer.chart_title,
        }
    }
}

impl WorkbookConfig {
    pub fn renderer(&self) -> ExcelRenderer {
        ExcelRenderer::new()
            .sheet_name(self.sheet_name.as_str())
            .chart_title(self.chart_title.as_str())
    }
}

/// Flag values that override the config file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub weeks: Option<u32>,
    pub scope: Option<f64>,
    pub departments: Vec<Department>,
    /// Drop file/default departments and keep only `departments`
    pub only: bool,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or start from the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Starter file written by `manpower init`
    pub fn template(name: &str) -> Result<String> {
        let config = Self {
            name: Some(name.to_string()),
            ..Self::default()
        };
        let body = toml::to_string(&config).context("Failed to serialize config")?;
        Ok(format!(
            "# Manpower schedule configuration\n\
             # Department ratios are fractions of total scope and must not sum past 1.0\n\n{body}"
        ))
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(weeks) = overrides.weeks {
            self.schedule.total_weeks = weeks;
        }
        if let Some(scope) = overrides.scope {
            self.schedule.total_scope = scope;
        }
        if overrides.only {
            self.schedule.departments.clear();
        }
        for dept in &overrides.departments {
            self.schedule.set_department(&dept.name, dept.ratio);
        }
    }
}

/// Parse a `NAME=RATIO` flag value
pub fn parse_department(arg: &str) -> Result<Department, String> {
    let (name, ratio) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=RATIO, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing department name in '{arg}'"));
    }
    let ratio: f64 = ratio
        .trim()
        .parse()
        .map_err(|_| format!("invalid ratio '{}' for {}", ratio.trim(), name))?;
    Ok(Department::new(name, ratio))
}

/// Turn a project name into a safe file stem
pub fn sanitize_file_stem(name: &str) -> Result<String> {
    let mut stem = String::new();
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_matches('-').to_string();
    if stem.is_empty() {
        bail!("Project name '{name}' has no usable characters");
    }
    Ok(stem)
}
