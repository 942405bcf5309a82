//! Excel manpower workbook renderer
//!
//! Generates an XLSX file with a single sheet holding the schedule table and
//! a line chart drawn from it.
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Manpower Schedule
//! | Week | Engineering | Foreman | Total |      [ line chart anchored at H2 ]
//! |------|-------------|---------|-------|
//! | 1    | 0.46        | 0.37    | 0.83  |
//! | 2    | 0.83        | 0.66    | 1.49  |
//! ```
//!
//! The chart has one series per column after `Week`, each named from its
//! header cell, with the `Week` values as categories:
//!
//! ```text
//! categories = 'Manpower Schedule'!$A$2:$A$21
//! series B   = 'Manpower Schedule'!$B$2:$B$21   name = $B$1
//! ...
//! series F   = 'Manpower Schedule'!$F$2:$F$21   name = $F$1   (Total)
//! ```
//!
//! Cell and chart placement is computed up front as a [`SheetLayout`], so the
//! structure of the workbook can be inspected without unpacking the file.

use manpower_core::{RenderError, Renderer, ScheduleTable};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Chart, ChartType, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

/// MIME type callers should declare for the exported bytes
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Suggested file name for downloads
pub const DEFAULT_FILE_NAME: &str = "Construction_Schedule.xlsx";

/// Rectangular block of cells (zero-based, inclusive)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl CellRange {
    pub fn new(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self {
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    /// Single column range
    pub fn column(col: u16, first_row: u32, last_row: u32) -> Self {
        Self::new(first_row, col, last_row, col)
    }

    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    pub fn col_count(&self) -> u16 {
        self.last_col - self.first_col + 1
    }

    /// Absolute A1 reference, e.g. `'Manpower Schedule'!$B$2:$B$5`
    pub fn to_formula(&self, sheet: &str) -> String {
        format!(
            "{}!{}:{}",
            quote_sheet_name(sheet),
            absolute_cell(self.first_row, self.first_col),
            absolute_cell(self.last_row, self.last_col)
        )
    }

    fn with_sheet<'a>(&self, sheet: &'a str) -> (&'a str, u32, u16, u32, u16) {
        (sheet, self.first_row, self.first_col, self.last_row, self.last_col)
    }
}

/// Placement of one chart series
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesLayout {
    /// Header text of the column
    pub name: String,
    /// Header cell the series takes its name from
    pub name_cell: (u32, u16),
    /// Data cells below the header
    pub values: CellRange,
}

/// Where everything goes on the sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    /// Header plus data rows
    pub table: CellRange,
    /// `Week` column data cells
    pub categories: CellRange,
    /// One entry per column after `Week`
    pub series: Vec<SeriesLayout>,
    /// Top-left cell of the chart
    pub chart_anchor: (u32, u16),
}

impl SheetLayout {
    /// Total rows written, header included
    pub fn row_count(&self) -> u32 {
        self.table.row_count()
    }

    /// Block covering every series column, header included
    pub fn series_block(&self) -> Option<CellRange> {
        let first = self.series.first()?;
        let last = self.series.last()?;
        Some(CellRange::new(
            first.name_cell.0,
            first.values.first_col,
            last.values.last_row,
            last.values.last_col,
        ))
    }
}

/// Excel manpower workbook renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// Chart title
    pub chart_title: String,
    /// Category (x) axis title
    pub x_axis_title: String,
    /// Value (y) axis title
    pub y_axis_title: String,
    /// Built-in Excel chart style (1-48)
    pub chart_style: u8,
    /// Chart width in pixels
    pub chart_width: u32,
    /// Chart height in pixels
    pub chart_height: u32,
    /// Preferred top-left cell of the chart (row, col)
    pub chart_anchor: (u32, u16),
    /// Number format for manpower cells
    pub number_format: String,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Manpower Schedule".into(),
            chart_title: "Construction Manpower Schedule".into(),
            x_axis_title: "Week".into(),
            y_axis_title: "Manpower".into(),
            chart_style: 10,
            // 20cm x 12cm
            chart_width: 756,
            chart_height: 454,
            // H2
            chart_anchor: (1, 7),
            number_format: "0.00".into(),
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set chart title
    pub fn chart_title(mut self, title: impl Into<String>) -> Self {
        self.chart_title = title.into();
        self
    }

    /// Set axis titles
    pub fn axis_titles(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_title = x.into();
        self.y_axis_title = y.into();
        self
    }

    /// Set chart size in pixels
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }

    /// Set preferred chart position
    pub fn chart_anchor(mut self, row: u32, col: u16) -> Self {
        self.chart_anchor = (row, col);
        self
    }

    /// Compute cell and chart placement for a table.
    ///
    /// The chart keeps at least one empty column between itself and the
    /// data, moving right of the preferred anchor when the table is wide.
    pub fn layout(&self, table: &ScheduleTable) -> SheetLayout {
        let last_row = table.week_count() as u32;
        let last_col = (table.column_count() - 1) as u16;

        let series = table
            .headers()
            .into_iter()
            .enumerate()
            .skip(1)
            .map(|(col, name)| {
                let col = col as u16;
                SeriesLayout {
                    name: name.to_string(),
                    name_cell: (0, col),
                    values: CellRange::column(col, 1, last_row),
                }
            })
            .collect();

        let (anchor_row, anchor_col) = self.chart_anchor;

        SheetLayout {
            table: CellRange::new(0, 0, last_row, last_col),
            categories: CellRange::column(0, 1, last_row),
            series,
            chart_anchor: (anchor_row, anchor_col.max(last_col + 2)),
        }
    }

    /// Generate Excel workbook bytes.
    ///
    /// Fails with [`RenderError::MalformedTable`] before anything is written
    /// when the table is empty or ragged.
    pub fn render_to_bytes(&self, table: &ScheduleTable) -> Result<Vec<u8>, RenderError> {
        table.check_well_formed()?;
        let layout = self.layout(table);
        let formats = self.create_formats();

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        self.write_table(sheet, table, &formats)?;

        let chart = self.build_chart(&layout);
        let (row, col) = layout.chart_anchor;
        sheet
            .insert_chart(row, col, &chart)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        debug!(
            rows = layout.row_count(),
            series = layout.series.len(),
            anchor = ?layout.chart_anchor,
            "rendered manpower workbook"
        );

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Create reusable formats
    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let week = Format::new()
            .set_num_format("0")
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let number = Format::new()
            .set_num_format(&self.number_format)
            .set_border(FormatBorder::Thin);

        let total = Format::new()
            .set_bold()
            .set_num_format(&self.number_format)
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            header,
            week,
            number,
            total,
        }
    }

    /// Write the header row and one row per week
    fn write_table(
        &self,
        sheet: &mut Worksheet,
        table: &ScheduleTable,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        for (col, header) in table.headers().iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, *header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            let width = (header.chars().count() + 4).max(10);
            sheet
                .set_column_width(col as u16, width as f64)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let total_col = (table.column_count() - 1) as u16;
        for (idx, row) in table.rows.iter().enumerate() {
            let r = idx as u32 + 1;
            sheet
                .write_number_with_format(r, 0, f64::from(row.week), &formats.week)
                .map_err(|e| RenderError::Format(e.to_string()))?;

            for (col, value) in row.manpower.iter().enumerate() {
                sheet
                    .write_number_with_format(r, col as u16 + 1, to_cell(*value)?, &formats.number)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }

            sheet
                .write_number_with_format(r, total_col, to_cell(row.total)?, &formats.total)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        Ok(())
    }

    /// Line chart with one series per non-week column
    fn build_chart(&self, layout: &SheetLayout) -> Chart {
        let sheet = self.sheet_name.as_str();
        let mut chart = Chart::new(ChartType::Line);

        for series in &layout.series {
            let (name_row, name_col) = series.name_cell;
            chart
                .add_series()
                .set_categories(layout.categories.with_sheet(sheet))
                .set_values(series.values.with_sheet(sheet))
                .set_name((sheet, name_row, name_col));
        }

        chart.title().set_name(self.chart_title.as_str());
        chart.x_axis().set_name(self.x_axis_title.as_str());
        chart.y_axis().set_name(self.y_axis_title.as_str());
        chart.set_style(self.chart_style);
        chart.set_width(self.chart_width);
        chart.set_height(self.chart_height);

        chart
    }

    /// Convert column number to Excel letter (0 -> A, 25 -> Z, 26 -> AA)
    pub fn col_to_letter(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32;
        loop {
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        result
    }
}

/// Reusable Excel formats
struct ExcelFormats {
    header: Format,
    week: Format,
    number: Format,
    // Bold green tint for the aggregate column
    total: Format,
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, table: &ScheduleTable) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(table)
    }
}

fn to_cell(value: Decimal) -> Result<f64, RenderError> {
    value
        .to_f64()
        .ok_or_else(|| RenderError::InvalidData(format!("{value} is not representable")))
}

fn absolute_cell(row: u32, col: u16) -> String {
    format!("${}${}", ExcelRenderer::col_to_letter(col), row + 1)
}

fn quote_sheet_name(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manpower_core::ScheduleRow;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn create_test_table() -> ScheduleTable {
        let mut table = ScheduleTable::new(vec!["A".into()]);
        table.push_row(ScheduleRow::new(1, vec![dec!(1.43)]));
        table.push_row(ScheduleRow::new(2, vec![dec!(50.00)]));
        table.push_row(ScheduleRow::new(3, vec![dec!(50.00)]));
        table.push_row(ScheduleRow::new(4, vec![dec!(1.43)]));
        table
    }

    #[test]
    fn excel_renderer_defaults() {
        let renderer = ExcelRenderer::new();
        assert_eq!(renderer.sheet_name, "Manpower Schedule");
        assert_eq!(renderer.chart_title, "Construction Manpower Schedule");
        assert_eq!(renderer.x_axis_title, "Week");
        assert_eq!(renderer.y_axis_title, "Manpower");
        assert_eq!(renderer.chart_style, 10);
        assert_eq!(renderer.chart_anchor, (1, 7));
    }

    #[test]
    fn excel_renderer_with_options() {
        let renderer = ExcelRenderer::new()
            .sheet_name("Crew")
            .chart_title("Crew Curve")
            .axis_titles("Weeks", "Headcount")
            .chart_size(600, 400)
            .chart_anchor(3, 9);

        assert_eq!(renderer.sheet_name, "Crew");
        assert_eq!(renderer.chart_title, "Crew Curve");
        assert_eq!(renderer.x_axis_title, "Weeks");
        assert_eq!(renderer.y_axis_title, "Headcount");
        assert_eq!((renderer.chart_width, renderer.chart_height), (600, 400));
        assert_eq!(renderer.chart_anchor, (3, 9));
    }

    #[test]
    fn layout_has_header_plus_data_rows() {
        let layout = ExcelRenderer::new().layout(&create_test_table());
        assert_eq!(layout.row_count(), 5);
        assert_eq!(layout.table, CellRange::new(0, 0, 4, 2));
        assert_eq!(layout.categories, CellRange::column(0, 1, 4));
    }

    #[test]
    fn layout_series_cover_department_and_total_columns() {
        let layout = ExcelRenderer::new().layout(&create_test_table());
        let names: Vec<&str> = layout.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Total"]);
        assert_eq!(layout.series[0].values, CellRange::column(1, 1, 4));
        assert_eq!(layout.series[1].name_cell, (0, 2));
        assert_eq!(layout.series_block(), Some(CellRange::new(0, 1, 4, 2)));
    }

    #[test]
    fn layout_keeps_default_anchor_for_narrow_tables() {
        let layout = ExcelRenderer::new().layout(&create_test_table());
        assert_eq!(layout.chart_anchor, (1, 7));
    }

    #[test]
    fn layout_moves_chart_right_of_wide_tables() {
        let departments: Vec<String> = (0..8).map(|i| format!("D{i}")).collect();
        let mut table = ScheduleTable::new(departments);
        table.push_row(ScheduleRow::new(1, vec![dec!(1); 8]));

        // Week + 8 departments + Total = columns A..J
        let layout = ExcelRenderer::new().layout(&table);
        assert_eq!(layout.table.last_col, 9);
        assert_eq!(layout.chart_anchor, (1, 11));
    }

    #[test]
    fn cell_range_formula() {
        let range = CellRange::column(1, 1, 4);
        assert_eq!(
            range.to_formula("Manpower Schedule"),
            "'Manpower Schedule'!$B$2:$B$5"
        );
        assert_eq!(range.to_formula("Sheet1"), "Sheet1!$B$2:$B$5");
        assert_eq!(range.row_count(), 4);
        assert_eq!(range.col_count(), 1);
    }

    #[test]
    fn col_to_letter_works() {
        assert_eq!(ExcelRenderer::col_to_letter(0), "A");
        assert_eq!(ExcelRenderer::col_to_letter(7), "H");
        assert_eq!(ExcelRenderer::col_to_letter(25), "Z");
        assert_eq!(ExcelRenderer::col_to_letter(26), "AA");
        assert_eq!(ExcelRenderer::col_to_letter(52), "BA");
    }

    #[test]
    fn excel_produces_valid_output() {
        let bytes = ExcelRenderer::new().render(&create_test_table()).unwrap();
        // XLSX files start with PK (ZIP header)
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excel_empty_table_fails() {
        let table = ScheduleTable::new(vec!["A".into()]);
        let result = ExcelRenderer::new().render(&table);
        assert!(matches!(result, Err(RenderError::MalformedTable(_))));
    }

    #[test]
    fn excel_ragged_table_fails() {
        let mut table = create_test_table();
        table.rows[2].manpower.push(dec!(3));
        let result = ExcelRenderer::new().render(&table);
        assert!(matches!(result, Err(RenderError::MalformedTable(_))));
    }

    #[test]
    fn render_to_bytes_rejects_ragged_table() {
        let mut table = ScheduleTable::new(vec!["A".into()]);
        table.push_row(ScheduleRow::new(1, vec![dec!(1), dec!(99)]));
        let result = ExcelRenderer::new().render_to_bytes(&table);
        assert!(matches!(result, Err(RenderError::MalformedTable(_))));
    }

    #[test]
    fn render_to_bytes_rejects_empty_table() {
        let table = ScheduleTable::new(vec!["A".into()]);
        let result = ExcelRenderer::new().render_to_bytes(&table);
        assert!(matches!(result, Err(RenderError::MalformedTable(_))));
    }

    #[test]
    fn excel_rejects_invalid_sheet_name() {
        let renderer = ExcelRenderer::new().sheet_name("bad[name]");
        let result = renderer.render(&create_test_table());
        assert!(matches!(result, Err(RenderError::Format(_))));
    }
}
