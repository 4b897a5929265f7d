use crate::models::HeatSample;
use chrono::{Datelike, Duration, NaiveDate};

pub const WEEK_COLUMNS: usize = 53;
pub const WEEKDAY_ROWS: usize = 7;
pub const CELL_GAP: f64 = 1.0;

const VALUE_OFFSET: f64 = 10.0;
const VALUE_SCALE: f64 = 60.0;
const LABEL_EVERY_WEEKS: usize = 4;
const MAX_WEEK_TICKS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub column: usize,
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub date: String,
    pub value: f64,
}

impl HeatCell {
    pub fn fill(&self) -> String {
        fill_color(self.value)
    }

    pub fn tooltip(&self) -> [String; 2] {
        tooltip_lines(&self.date, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatGrid {
    pub area: ChartArea,
    pub columns: usize,
    pub cells: Vec<HeatCell>,
    pub week_ticks: Vec<AxisTick>,
    pub weekday_ticks: Vec<AxisTick>,
}

/// Linear in `v` over the generator's value domain: 0 maps to ~0.167, 50 to 1.0.
pub fn opacity(v: f64) -> f64 {
    ((VALUE_OFFSET + v) / VALUE_SCALE).clamp(0.0, 1.0)
}

pub fn fill_color(v: f64) -> String {
    format!("rgba(0, 200, 0, {:.3})", opacity(v))
}

pub fn tooltip_lines(date: &str, v: f64) -> [String; 2] {
    [format!("date: {date}"), format!("value: {v:.2}")]
}

pub fn cell_size(area: &ChartArea) -> (f64, f64) {
    (
        area.width / WEEK_COLUMNS as f64 - CELL_GAP,
        area.height / WEEKDAY_ROWS as f64 - CELL_GAP,
    )
}

pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
}

fn weekday_row(y: &str) -> Option<usize> {
    match y.trim().parse::<usize>() {
        Ok(day @ 1..=7) => Some(day - 1),
        _ => None,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Maps samples onto the weekday x ISO-week grid. Samples with an unreadable
/// date or weekday are left out.
pub fn layout(samples: &[HeatSample], area: ChartArea) -> HeatGrid {
    let placed: Vec<(NaiveDate, usize, &HeatSample)> = samples
        .iter()
        .filter_map(|sample| {
            let week = week_start(parse_date(&sample.x)?)?;
            Some((week, weekday_row(&sample.y)?, sample))
        })
        .collect();

    let weekday_ticks = weekday_ticks(&area);
    let Some(first_week) = placed.iter().map(|(week, _, _)| *week).min() else {
        return HeatGrid {
            area,
            columns: WEEK_COLUMNS,
            cells: Vec::new(),
            week_ticks: Vec::new(),
            weekday_ticks,
        };
    };
    let last_week = placed
        .iter()
        .map(|(week, _, _)| *week)
        .max()
        .unwrap_or(first_week);

    let spanned = ((last_week - first_week).num_days() / 7) as usize + 1;
    let columns = spanned.max(1);
    let column_pitch = area.width / columns as f64;
    let row_pitch = area.height / WEEKDAY_ROWS as f64;
    let (width, height) = cell_size(&area);
    let width = width.min(column_pitch);

    let cells = placed
        .into_iter()
        .map(|(week, row, sample)| {
            let column = ((week - first_week).num_days() / 7) as usize;
            HeatCell {
                column,
                row,
                x: area.left + column as f64 * column_pitch + (column_pitch - width) / 2.0,
                y: area.top + row as f64 * row_pitch + (row_pitch - height) / 2.0,
                width,
                height,
                opacity: opacity(sample.v),
                date: sample.d.clone(),
                value: sample.v,
            }
        })
        .collect();

    let label_every = LABEL_EVERY_WEEKS.max(columns.div_ceil(MAX_WEEK_TICKS));
    let week_ticks = (0..columns)
        .step_by(label_every)
        .filter_map(|column| {
            let start = first_week.checked_add_signed(Duration::weeks(column as i64))?;
            Some(AxisTick {
                position: area.left + (column as f64 + 0.5) * column_pitch,
                label: start.format("%b %d").to_string(),
            })
        })
        .collect();

    HeatGrid {
        area,
        columns,
        cells,
        week_ticks,
        weekday_ticks,
    }
}

fn weekday_ticks(area: &ChartArea) -> Vec<AxisTick> {
    const NAMES: [&str; WEEKDAY_ROWS] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
    let row_pitch = area.height / WEEKDAY_ROWS as f64;
    NAMES
        .iter()
        .enumerate()
        .map(|(row, name)| AxisTick {
            position: area.top + (row as f64 + 0.5) * row_pitch,
            label: (*name).to_string(),
        })
        .collect()
}
