//! Schedule summary statistics
//!
//! Condenses a [`ScheduleTable`] into peaks and manpower-weeks per column.
//!
//! Manpower-weeks are the plain sum of a column. The peak rule used by the
//! builder (`scope / weeks * 2`) only approximates the area under the curve,
//! so `scope_coverage` reports how far the planned manpower-weeks drift from
//! the requested scope instead of correcting the table.

use crate::ScheduleTable;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statistics for one department column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub name: String,
    /// Highest weekly value
    pub peak: Decimal,
    /// First week reaching `peak`
    pub peak_week: Option<u32>,
    /// Sum of the column
    pub manpower_weeks: Decimal,
}

/// Statistics for a whole table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub departments: Vec<DepartmentSummary>,
    /// Highest weekly total
    pub peak_total: Decimal,
    /// First week reaching `peak_total`
    pub peak_week: Option<u32>,
    /// Sum of the total column
    pub manpower_weeks: Decimal,
}

impl ScheduleSummary {
    pub fn from_table(table: &ScheduleTable) -> Self {
        let weeks: Vec<u32> = table.rows.iter().map(|r| r.week).collect();

        let departments = table
            .departments
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<Decimal> = table
                    .rows
                    .iter()
                    .map(|row| row.manpower.get(idx).copied().unwrap_or_default())
                    .collect();
                let (peak, peak_week) = peak_of(&values, &weeks);
                DepartmentSummary {
                    name: name.clone(),
                    peak,
                    peak_week,
                    manpower_weeks: values.iter().sum(),
                }
            })
            .collect();

        let totals = table.totals();
        let (peak_total, peak_week) = peak_of(&totals, &weeks);

        Self {
            departments,
            peak_total,
            peak_week,
            manpower_weeks: totals.iter().sum(),
        }
    }

    /// Planned manpower-weeks divided by the requested scope
    pub fn scope_coverage(&self, total_scope: f64) -> Option<f64> {
        if total_scope <= 0.0 {
            return None;
        }
        self.manpower_weeks.to_f64().map(|mw| mw / total_scope)
    }

    pub fn department(&self, name: &str) -> Option<&DepartmentSummary> {
        self.departments.iter().find(|d| d.name == name)
    }
}

fn peak_of(values: &[Decimal], weeks: &[u32]) -> (Decimal, Option<u32>) {
    let mut best: Option<(Decimal, u32)> = None;
    for (value, week) in values.iter().zip(weeks) {
        match best {
            Some((peak, _)) if *value <= peak => {}
            _ => best = Some((*value, *week)),
        }
    }
    match best {
        Some((peak, week)) => (peak, Some(week)),
        None => (Decimal::ZERO, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScheduleRow;
    use rust_decimal_macros::dec;

    fn table() -> ScheduleTable {
        let mut table = ScheduleTable::new(vec!["A".into(), "B".into()]);
        table.push_row(ScheduleRow::new(1, vec![dec!(1.00), dec!(2.00)]));
        table.push_row(ScheduleRow::new(2, vec![dec!(5.00), dec!(2.00)]));
        table.push_row(ScheduleRow::new(3, vec![dec!(5.00), dec!(0.50)]));
        table
    }

    #[test]
    fn peaks_pick_first_maximum() {
        let summary = table().summary();
        let a = summary.department("A").unwrap();
        assert_eq!(a.peak, dec!(5));
        assert_eq!(a.peak_week, Some(2));

        let b = summary.department("B").unwrap();
        assert_eq!(b.peak, dec!(2));
        assert_eq!(b.peak_week, Some(1));

        assert_eq!(summary.peak_total, dec!(7));
        assert_eq!(summary.peak_week, Some(2));
    }

    #[test]
    fn manpower_weeks_sum_columns() {
        let summary = table().summary();
        assert_eq!(summary.department("A").unwrap().manpower_weeks, dec!(11));
        assert_eq!(summary.manpower_weeks, dec!(15.5));
    }

    #[test]
    fn scope_coverage_ratio() {
        let summary = table().summary();
        let coverage = summary.scope_coverage(31.0).unwrap();
        assert!((coverage - 0.5).abs() < 1e-12);
        assert_eq!(summary.scope_coverage(0.0), None);
    }

    #[test]
    fn empty_table_summary() {
        let summary = ScheduleTable::new(vec!["A".into()]).summary();
        assert_eq!(summary.peak_week, None);
        assert_eq!(summary.manpower_weeks, Decimal::ZERO);
        assert_eq!(summary.departments[0].peak_week, None);
    }
}
