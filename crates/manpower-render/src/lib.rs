//! # manpower-render
//!
//! Rendering backends for manpower schedules.
//!
//! This crate provides:
//! - Excel workbook export with an embedded line chart
//! - SVG line chart preview
//! - Text grid preview for terminals
//!
//! ## Example
//!
//! ```rust,ignore
//! use manpower_core::{Renderer, ScheduleParameters, Scheduler};
//! use manpower_render::{ExcelRenderer, SvgChartRenderer, TextRenderer};
//! use manpower_solver::CurveScheduler;
//!
//! let table = CurveScheduler::new().schedule(&ScheduleParameters::default())?;
//!
//! // Terminal preview
//! println!("{}", TextRenderer::new().render(&table)?);
//!
//! // Chart preview
//! let svg = SvgChartRenderer::new().render(&table)?;
//!
//! // Spreadsheet
//! let xlsx_bytes = ExcelRenderer::new().render(&table)?;
//! std::fs::write("Construction_Schedule.xlsx", xlsx_bytes)?;
//! ```

pub mod chart;
pub mod excel;

pub use chart::SvgChartRenderer;
pub use excel::{CellRange, ExcelRenderer, SeriesLayout, SheetLayout, DEFAULT_FILE_NAME, XLSX_MIME_TYPE};

use manpower_core::{RenderError, Renderer, ScheduleTable};

/// Export a table as xlsx bytes with the default workbook settings
pub fn export(table: &ScheduleTable) -> Result<Vec<u8>, RenderError> {
    ExcelRenderer::new().render(table)
}

/// Fixed-width text grid for console output
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Append peak and manpower-week lines after the grid
    pub show_summary: bool,
    /// Decimal places shown for manpower values
    pub decimals: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_summary: true,
            decimals: 2,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid only, no summary lines
    pub fn no_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    fn cells(&self, table: &ScheduleTable) -> Vec<Vec<String>> {
        let prec = self.decimals;
        table
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.week.to_string())
                    .chain(row.manpower.iter().map(|v| format!("{:.prec$}", v)))
                    .chain(std::iter::once(format!("{:.prec$}", row.total)))
                    .collect()
            })
            .collect()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, table: &ScheduleTable) -> Result<String, RenderError> {
        table.check_well_formed()?;

        let headers = table.headers();
        let cells = self.cells(table);

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                cells
                    .iter()
                    .map(|row| row[col].len())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let join = |items: Vec<String>| items.join(" | ");
        let mut out = String::new();

        out.push_str(&join(
            headers
                .iter()
                .zip(&widths)
                .map(|(h, w)| format!("{:>w$}", h, w = *w))
                .collect(),
        ));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');

        for row in &cells {
            out.push_str(&join(
                row.iter()
                    .zip(&widths)
                    .map(|(c, w)| format!("{:>w$}", c, w = *w))
                    .collect(),
            ));
            out.push('\n');
        }

        if self.show_summary {
            let summary = table.summary();
            let prec = self.decimals;
            out.push('\n');
            if let Some(week) = summary.peak_week {
                out.push_str(&format!(
                    "Peak total: {:.prec$} (week {})\n",
                    summary.peak_total, week
                ));
            }
            out.push_str(&format!(
                "Manpower-weeks: {:.prec$}\n",
                summary.manpower_weeks
            ));
        }

        Ok(out)
    }
}
