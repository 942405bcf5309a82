//! # manpower-core
//!
//! Core domain model and traits for the manpower staffing planner.
//!
//! This crate provides:
//! - Domain types: `Department`, `ScheduleParameters`, `ManpowerCurve`, `ScheduleTable`
//! - Core traits: `Scheduler`, `Renderer`
//! - Error types and parameter validation
//!
//! ## Example
//!
//! ```rust
//! use manpower_core::ScheduleParameters;
//!
//! let params = ScheduleParameters::new(20, 1000.0)
//!     .department("Engineering", 0.25)
//!     .department("Electricians", 0.40);
//!
//! assert!(params.validate().is_ok());
//! assert_eq!(params.department_names(), vec!["Engineering", "Electricians"]);
//! ```

pub mod summary;

pub use summary::{DepartmentSummary, ScheduleSummary};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Header of the week column in every tabular output
pub const WEEK_COLUMN: &str = "Week";

/// Header of the aggregate column in every tabular output
pub const TOTAL_COLUMN: &str = "Total";

/// Slack allowed when comparing the summed department ratios against 1.0
pub const ALLOCATION_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Parameters
// ============================================================================

/// A named category of labor with a fractional share of total scope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Department {
    /// Display name, unique within one schedule
    pub name: String,
    /// Fraction of total scope assigned to this department (0.0..=1.0)
    pub ratio: f64,
}

impl Department {
    pub fn new(name: impl Into<String>, ratio: f64) -> Self {
        Self {
            name: name.into(),
            ratio,
        }
    }

    /// Scope units assigned to this department
    pub fn scope(&self, total_scope: f64) -> f64 {
        total_scope * self.ratio
    }
}

/// Input to one schedule computation
///
/// Departments are kept in caller order; that order becomes the column
/// order of the resulting table and of every chart series built from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParameters {
    /// Project duration in weeks
    pub total_weeks: u32,
    /// Total scope units for the project
    pub total_scope: f64,
    /// Departments with their allocation ratios
    #[serde(default)]
    pub departments: Vec<Department>,
}

impl Default for ScheduleParameters {
    fn default() -> Self {
        Self::new(20, 1000.0)
            .department("Engineering", 0.25)
            .department("Superintendents", 0.15)
            .department("Foreman", 0.20)
            .department("Electricians", 0.40)
    }
}

impl ScheduleParameters {
    /// Create parameters with no departments
    pub fn new(total_weeks: u32, total_scope: f64) -> Self {
        Self {
            total_weeks,
            total_scope,
            departments: Vec::new(),
        }
    }

    /// Append a department
    pub fn department(mut self, name: impl Into<String>, ratio: f64) -> Self {
        self.departments.push(Department::new(name, ratio));
        self
    }

    /// Replace the ratio of an existing department, or append it
    pub fn set_department(&mut self, name: &str, ratio: f64) {
        match self.departments.iter_mut().find(|d| d.name == name) {
            Some(dept) => dept.ratio = ratio,
            None => self.departments.push(Department::new(name, ratio)),
        }
    }

    /// Sum of all department ratios
    pub fn allocated_ratio(&self) -> f64 {
        self.departments.iter().map(|d| d.ratio).sum()
    }

    pub fn department_names(&self) -> Vec<&str> {
        self.departments.iter().map(|d| d.name.as_str()).collect()
    }

    /// Check the parameters before any computation runs.
    ///
    /// Errors are reported in a fixed order: duration, scope, individual
    /// ratios, duplicate names, then the combined allocation.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.total_weeks < 1 {
            return Err(ScheduleError::InvalidDuration(self.total_weeks));
        }

        if !self.total_scope.is_finite() || self.total_scope <= 0.0 {
            return Err(ScheduleError::InvalidScope(self.total_scope));
        }

        let mut seen = HashSet::new();
        for dept in &self.departments {
            if !dept.ratio.is_finite() || !(0.0..=1.0).contains(&dept.ratio) {
                return Err(ScheduleError::InvalidRatio {
                    department: dept.name.clone(),
                    ratio: dept.ratio,
                });
            }
            if !seen.insert(dept.name.as_str()) {
                return Err(ScheduleError::DuplicateDepartment(dept.name.clone()));
            }
        }

        let allocated = self.allocated_ratio();
        if allocated > 1.0 + ALLOCATION_TOLERANCE {
            return Err(ScheduleError::AllocationOverflow(allocated));
        }

        Ok(())
    }
}

// ============================================================================
// Curves and Tables
// ============================================================================

/// Weekly manpower values for a single department
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManpowerCurve(Vec<f64>);

impl ManpowerCurve {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest weekly value (0.0 for an empty curve)
    pub fn peak(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the first week holding the peak value
    pub fn peak_index(&self) -> Option<usize> {
        let peak = self.peak();
        self.0.iter().position(|&v| v == peak)
    }

    /// Sum of all weekly values (manpower-weeks)
    pub fn area(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// One week of the schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based week number
    pub week: u32,
    /// One value per department, in table column order
    pub manpower: Vec<Decimal>,
    /// Exact sum of `manpower`
    pub total: Decimal,
}

impl ScheduleRow {
    /// Build a row; the total is derived from the department values
    pub fn new(week: u32, manpower: Vec<Decimal>) -> Self {
        let total = manpower.iter().sum();
        Self {
            week,
            manpower,
            total,
        }
    }
}

/// The week-by-department grid produced by a [`Scheduler`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTable {
    /// Department names, in column order
    pub departments: Vec<String>,
    /// One row per week, in week order
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    pub fn new(departments: Vec<String>) -> Self {
        Self {
            departments,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: ScheduleRow) {
        self.rows.push(row);
    }

    pub fn week_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers: `Week`, each department, then `Total`
    pub fn headers(&self) -> Vec<&str> {
        std::iter::once(WEEK_COLUMN)
            .chain(self.departments.iter().map(String::as_str))
            .chain(std::iter::once(TOTAL_COLUMN))
            .collect()
    }

    /// Number of columns including `Week` and `Total`
    pub fn column_count(&self) -> usize {
        self.departments.len() + 2
    }

    /// Values of one department column
    pub fn column(&self, department: &str) -> Option<Vec<Decimal>> {
        let idx = self.departments.iter().position(|d| d == department)?;
        self.rows
            .iter()
            .map(|row| row.manpower.get(idx).copied())
            .collect()
    }

    /// Values of the `Total` column
    pub fn totals(&self) -> Vec<Decimal> {
        self.rows.iter().map(|row| row.total).collect()
    }

    /// Check that every row matches the header and weeks run 1..=N.
    pub fn check_well_formed(&self) -> Result<(), RenderError> {
        if self.rows.is_empty() {
            return Err(RenderError::MalformedTable("table has no rows".into()));
        }

        let width = self.departments.len();
        for (idx, row) in self.rows.iter().enumerate() {
            let expected_week = idx as u32 + 1;
            if row.week != expected_week {
                return Err(RenderError::MalformedTable(format!(
                    "row {} has week {}, expected {}",
                    idx + 1,
                    row.week,
                    expected_week
                )));
            }
            if row.manpower.len() != width {
                return Err(RenderError::MalformedTable(format!(
                    "week {} has {} values for {} departments",
                    row.week,
                    row.manpower.len(),
                    width
                )));
            }
        }

        Ok(())
    }

    /// Peaks, peak weeks and manpower-weeks per column
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_table(self)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Turns parameters into a schedule table
pub trait Scheduler: Send + Sync {
    fn schedule(&self, params: &ScheduleParameters) -> Result<ScheduleTable, ScheduleError>;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a schedule table to the output format
    fn render(&self, table: &ScheduleTable) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Scheduling error
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid duration: {0} weeks (must be at least 1)")]
    InvalidDuration(u32),

    #[error("Invalid scope: {0} (must be a positive number)")]
    InvalidScope(f64),

    #[error("Invalid ratio {ratio} for department '{department}' (must be within 0..=1)")]
    InvalidRatio { department: String, ratio: f64 },

    #[error("Duplicate department: {0}")]
    DuplicateDepartment(String),

    #[error("Total allocation exceeds 100%: {0:.4}")]
    AllocationOverflow(f64),

    #[error("Non-finite manpower value: {0}")]
    NonFiniteValue(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Malformed table: {0}")]
    MalformedTable(String),
}

// ============================================================================
// Tests
// ============================================================================
