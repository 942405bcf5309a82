//! # manpower-solver
//!
//! Turns schedule parameters into a week-by-department manpower table.
//!
//! This crate provides:
//! - Bell-shaped curve generation (`curve`)
//! - Peak manpower derivation from department scope
//! - Table assembly with a round-then-sum `Total` column
//!
//! ## Example
//!
//! ```rust
//! use manpower_core::{ScheduleParameters, Scheduler};
//! use manpower_solver::CurveScheduler;
//!
//! let params = ScheduleParameters::new(4, 100.0).department("A", 1.0);
//! let table = CurveScheduler::new().schedule(&params).unwrap();
//!
//! assert_eq!(table.week_count(), 4);
//! assert_eq!(table.rows[1].total, rust_decimal::Decimal::from(50));
//! ```

pub mod curve;

pub use curve::{generate_curve, BellCurve};

use manpower_core::{
    Department, ScheduleError, ScheduleParameters, ScheduleRow, ScheduleTable, Scheduler,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Default multiplier from average weekly rate to curve peak
pub const DEFAULT_PEAK_FACTOR: f64 = 2.0;

/// Default number of decimal places kept in the table
pub const DEFAULT_PRECISION: u32 = 2;

/// Scheduler that staffs every department with a bell curve
#[derive(Clone, Debug)]
pub struct CurveScheduler {
    /// Curve shape shared by all departments
    pub curve: BellCurve,
    /// Peak = department scope / weeks * peak_factor
    pub peak_factor: f64,
    /// Decimal places each weekly value is rounded to
    pub precision: u32,
}

impl Default for CurveScheduler {
    fn default() -> Self {
        Self {
            curve: BellCurve::default(),
            peak_factor: DEFAULT_PEAK_FACTOR,
            precision: DEFAULT_PRECISION,
        }
    }
}

impl CurveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the curve shape
    pub fn curve(mut self, curve: BellCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Set the peak factor
    pub fn peak_factor(mut self, factor: f64) -> Self {
        self.peak_factor = factor;
        self
    }

    /// Set the rounding precision
    pub fn precision(mut self, places: u32) -> Self {
        self.precision = places;
        self
    }

    /// Peak weekly manpower for a department carrying `dept_scope` units.
    ///
    /// The area under a bell spanning the whole duration is roughly
    /// `peak * weeks / 2`, hence the default factor of two. This is an
    /// approximation; the curve's sum does not reproduce `dept_scope`
    /// exactly.
    pub fn peak_manpower(&self, dept_scope: f64, total_weeks: u32) -> f64 {
        dept_scope / f64::from(total_weeks) * self.peak_factor
    }

    /// Round one weekly value half-to-even
    fn round(&self, value: f64, department: &str) -> Result<Decimal, ScheduleError> {
        Decimal::from_f64(value)
            .map(|d| {
                d.round_dp_with_strategy(self.precision, RoundingStrategy::MidpointNearestEven)
            })
            .ok_or_else(|| ScheduleError::NonFiniteValue(format!("{department}: {value}")))
    }

    /// Rounded curve for one department
    fn department_column(
        &self,
        dept: &Department,
        params: &ScheduleParameters,
    ) -> Result<Vec<Decimal>, ScheduleError> {
        let dept_scope = dept.scope(params.total_scope);
        let peak = self.peak_manpower(dept_scope, params.total_weeks);
        let curve = self.curve.generate(params.total_weeks as usize, peak);

        debug!(
            department = %dept.name,
            ratio = dept.ratio,
            scope = dept_scope,
            peak,
            "generated manpower curve"
        );

        curve
            .iter()
            .map(|&value| self.round(value, &dept.name))
            .collect()
    }

    /// Validate the parameters and assemble the table
    pub fn build(&self, params: &ScheduleParameters) -> Result<ScheduleTable, ScheduleError> {
        params.validate()?;

        let columns = params
            .departments
            .iter()
            .map(|dept| self.department_column(dept, params))
            .collect::<Result<Vec<_>, _>>()?;

        let mut table = ScheduleTable::new(
            params
                .departments
                .iter()
                .map(|d| d.name.clone())
                .collect(),
        );

        for (idx, week) in (1..=params.total_weeks).enumerate() {
            let manpower = columns.iter().map(|column| column[idx]).collect();
            table.push_row(ScheduleRow::new(week, manpower));
        }

        debug!(
            weeks = params.total_weeks,
            departments = params.departments.len(),
            "assembled schedule table"
        );

        Ok(table)
    }
}

impl Scheduler for CurveScheduler {
    fn schedule(&self, params: &ScheduleParameters) -> Result<ScheduleTable, ScheduleError> {
        self.build(params)
    }
}

/// Build a schedule with the default curve, peak factor and precision
pub fn build_schedule(
    total_weeks: u32,
    departments: &[Department],
    total_scope: f64,
) -> Result<ScheduleTable, ScheduleError> {
    let params = ScheduleParameters {
        total_weeks,
        total_scope,
        departments: departments.to_vec(),
    };
    CurveScheduler::new().build(&params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn scheduler_defaults() {
        let scheduler = CurveScheduler::new();
        assert_eq!(scheduler.peak_factor, 2.0);
        assert_eq!(scheduler.precision, 2);
        assert_eq!(scheduler.curve, BellCurve::default());
    }

    #[test]
    fn peak_manpower_doubles_average_rate() {
        let scheduler = CurveScheduler::new();
        assert_eq!(scheduler.peak_manpower(100.0, 4), 50.0);
        assert_eq!(scheduler.peak_manpower(250.0, 20), 25.0);
    }

    #[test]
    fn custom_peak_factor() {
        let scheduler = CurveScheduler::new().peak_factor(1.5);
        assert_eq!(scheduler.peak_manpower(100.0, 4), 37.5);
    }

    #[test]
    fn rounds_half_to_even() {
        let scheduler = CurveScheduler::new();
        assert_eq!(scheduler.round(1.4283, "A").unwrap(), dec!(1.43));
        assert_eq!(scheduler.round(0.125, "A").unwrap(), dec!(0.12));
        assert_eq!(scheduler.round(0.375, "A").unwrap(), dec!(0.38));
    }

    #[test]
    fn rounding_rejects_nan() {
        let scheduler = CurveScheduler::new();
        assert!(matches!(
            scheduler.round(f64::NAN, "A"),
            Err(ScheduleError::NonFiniteValue(_))
        ));
    }

    #[test]
    fn precision_controls_decimal_places() {
        let params = ScheduleParameters::new(4, 100.0).department("A", 1.0);
        let table = CurveScheduler::new().precision(0).build(&params).unwrap();
        assert_eq!(table.column("A").unwrap(), vec![dec!(1), dec!(50), dec!(50), dec!(1)]);
    }

    #[test]
    fn build_schedule_shortcut() {
        let departments = vec![Department::new("A", 1.0)];
        let table = build_schedule(4, &departments, 100.0).unwrap();
        assert_eq!(
            table.column("A").unwrap(),
            vec![dec!(1.43), dec!(50.00), dec!(50.00), dec!(1.43)]
        );
    }

    #[test]
    fn build_fails_fast_on_invalid_parameters() {
        let err = build_schedule(0, &[Department::new("A", 0.5)], 100.0).unwrap_err();
        assert_eq!(err, ScheduleError::InvalidDuration(0));

        let err = build_schedule(4, &[Department::new("A", 0.5)], 0.0).unwrap_err();
        assert_eq!(err, ScheduleError::InvalidScope(0.0));
    }
}
