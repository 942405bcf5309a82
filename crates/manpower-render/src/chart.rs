//! SVG line chart preview
//!
//! Draws one polyline per department plus a heavier line for `Total`, over
//! a week axis, with horizontal grid lines and a legend underneath.

use manpower_core::{RenderError, Renderer, ScheduleTable, TOTAL_COLUMN};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use svg::node::element::{Group, Line, Polyline, Rectangle, Text};
use svg::Document;

/// SVG line chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgChartRenderer {
    /// Width of the plot area in pixels
    pub chart_width: u32,
    /// Height of the plot area in pixels
    pub chart_height: u32,
    /// Padding around the whole drawing
    pub padding: u32,
    /// Space reserved left of the plot for value labels
    pub axis_width: u32,
    /// Chart title
    pub title: String,
    /// Category axis title
    pub x_axis_title: String,
    /// Value axis title
    pub y_axis_title: String,
    /// Series colors, cycled per department
    pub palette: Vec<String>,
    /// Color of the total line
    pub total_color: String,
    pub background_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            chart_width: 720,
            chart_height: 360,
            padding: 20,
            axis_width: 50,
            title: "Construction Manpower Schedule".into(),
            x_axis_title: "Week".into(),
            y_axis_title: "Manpower".into(),
            palette: vec![
                "#3498db".into(),
                "#e67e22".into(),
                "#27ae60".into(),
                "#9b59b6".into(),
                "#e74c3c".into(),
                "#16a085".into(),
            ],
            total_color: "#2c3e50".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

/// Number of horizontal grid intervals
const GRID_STEPS: u32 = 5;
const TITLE_HEIGHT: u32 = 30;
const X_LABEL_HEIGHT: u32 = 40;
const LEGEND_ROW_HEIGHT: u32 = 18;

impl SvgChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure plot size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = width;
        self.chart_height = height;
        self
    }

    /// Configure chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn plot_left(&self) -> f64 {
        f64::from(self.padding + self.axis_width)
    }

    fn plot_top(&self) -> f64 {
        f64::from(self.padding + TITLE_HEIGHT)
    }

    fn plot_bottom(&self) -> f64 {
        self.plot_top() + f64::from(self.chart_height)
    }

    /// Color for the series at `idx`
    fn series_color(&self, idx: usize) -> &str {
        if self.palette.is_empty() {
            return self.text_color.as_str();
        }
        self.palette[idx % self.palette.len()].as_str()
    }

    /// x coordinate of the week at `idx` out of `weeks`
    fn week_x(&self, idx: usize, weeks: usize) -> f64 {
        let width = f64::from(self.chart_width);
        if weeks <= 1 {
            return self.plot_left() + width / 2.0;
        }
        self.plot_left() + idx as f64 * width / (weeks - 1) as f64
    }

    fn value_y(&self, value: f64, max: f64) -> f64 {
        self.plot_bottom() - value / max * f64::from(self.chart_height)
    }

    /// Horizontal grid with value labels
    fn render_grid(&self, max: f64) -> Group {
        let mut group = Group::new().set("class", "grid");
        let right = self.plot_left() + f64::from(self.chart_width);

        for step in 0..=GRID_STEPS {
            let value = max * f64::from(step) / f64::from(GRID_STEPS);
            let y = self.value_y(value, max);

            group = group.add(
                Line::new()
                    .set("x1", self.plot_left())
                    .set("y1", y)
                    .set("x2", right)
                    .set("y2", y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 1),
            );
            group = group.add(
                Text::new(format!("{:.0}", value))
                    .set("x", self.plot_left() - 6.0)
                    .set("y", y + 4.0)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size.saturating_sub(1))
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "end"),
            );
        }

        group
    }

    /// Axis lines, week labels and axis titles
    fn render_axes(&self, table: &ScheduleTable) -> Group {
        let mut group = Group::new().set("class", "axes");
        let left = self.plot_left();
        let bottom = self.plot_bottom();
        let right = left + f64::from(self.chart_width);

        for (x1, y1, x2, y2) in [(left, self.plot_top(), left, bottom), (left, bottom, right, bottom)] {
            group = group.add(
                Line::new()
                    .set("x1", x1)
                    .set("y1", y1)
                    .set("x2", x2)
                    .set("y2", y2)
                    .set("stroke", self.text_color.as_str())
                    .set("stroke-width", 1),
            );
        }

        // Label every week up to ~26, then thin out
        let weeks = table.week_count();
        let interval = (weeks / 26 + 1).max(1);
        for (idx, row) in table.rows.iter().enumerate() {
            if idx % interval != 0 && idx + 1 != weeks {
                continue;
            }
            group = group.add(
                Text::new(row.week.to_string())
                    .set("x", self.week_x(idx, weeks))
                    .set("y", bottom + 16.0)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size.saturating_sub(1))
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle"),
            );
        }

        group = group.add(
            Text::new(self.x_axis_title.as_str())
                .set("x", left + f64::from(self.chart_width) / 2.0)
                .set("y", bottom + 34.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle"),
        );

        let y_mid = self.plot_top() + f64::from(self.chart_height) / 2.0;
        let y_title_x = f64::from(self.padding) + 10.0;
        group = group.add(
            Text::new(self.y_axis_title.as_str())
                .set("x", y_title_x)
                .set("y", y_mid)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 {} {})", y_title_x, y_mid)),
        );

        group
    }

    /// One polyline through a column
    fn render_series(&self, values: &[f64], max: f64, color: &str, width: u32) -> Polyline {
        let weeks = values.len();
        let points = values
            .iter()
            .enumerate()
            .map(|(idx, v)| format!("{:.2},{:.2}", self.week_x(idx, weeks), self.value_y(*v, max)))
            .collect::<Vec<_>>()
            .join(" ");

        Polyline::new()
            .set("points", points)
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", width)
    }

    /// Legend rows below the week axis
    fn render_legend(&self, names: &[(&str, &str)], y_offset: f64) -> Group {
        let mut group = Group::new().set("class", "legend");
        let x = self.plot_left();
        let box_size = 12.0;

        for (row, (name, color)) in names.iter().enumerate() {
            let y = y_offset + row as f64 * f64::from(LEGEND_ROW_HEIGHT);
            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y - box_size + 2.0)
                    .set("width", box_size)
                    .set("height", box_size)
                    .set("rx", 2)
                    .set("fill", *color),
            );
            group = group.add(
                Text::new(*name)
                    .set("x", x + box_size + 5.0)
                    .set("y", y)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size.saturating_sub(1))
                    .set("fill", self.text_color.as_str()),
            );
        }

        group
    }
}

impl Renderer for SvgChartRenderer {
    type Output = String;

    fn render(&self, table: &ScheduleTable) -> Result<String, RenderError> {
        table.check_well_formed()?;

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(table.departments.len() + 1);
        for idx in 0..table.departments.len() {
            columns.push(
                table
                    .rows
                    .iter()
                    .map(|row| to_plot(row.manpower[idx]))
                    .collect::<Result<_, _>>()?,
            );
        }
        columns.push(
            table
                .rows
                .iter()
                .map(|row| to_plot(row.total))
                .collect::<Result<_, _>>()?,
        );

        let max = columns
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max);
        let max = if max > 0.0 { max } else { 1.0 };

        let mut legend: Vec<(&str, &str)> = table
            .departments
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), self.series_color(idx)))
            .collect();
        legend.push((TOTAL_COLUMN, self.total_color.as_str()));

        let width = self.padding * 2 + self.axis_width + self.chart_width;
        let legend_top = self.plot_bottom() + f64::from(X_LABEL_HEIGHT) + 10.0;
        let height = legend_top as u32 + legend.len() as u32 * LEGEND_ROW_HEIGHT + self.padding;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.background_color.as_str()),
        );

        document = document.add(
            Text::new(self.title.as_str())
                .set("x", self.padding)
                .set("y", self.padding + 15)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size + 4)
                .set("font-weight", "bold")
                .set("fill", self.text_color.as_str()),
        );

        document = document.add(self.render_grid(max));
        document = document.add(self.render_axes(table));

        let mut lines = Group::new().set("class", "series");
        for (idx, column) in columns.iter().enumerate() {
            let is_total = idx == table.departments.len();
            let (color, stroke) = if is_total {
                (self.total_color.as_str(), 3)
            } else {
                (self.series_color(idx), 2)
            };
            lines = lines.add(self.render_series(column, max, color, stroke));
        }
        document = document.add(lines);

        document = document.add(self.render_legend(&legend, legend_top));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

fn to_plot(value: Decimal) -> Result<f64, RenderError> {
    value
        .to_f64()
        .ok_or_else(|| RenderError::InvalidData(format!("{value} cannot be plotted")))
}
