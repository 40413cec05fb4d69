use chrono::{Datelike, Duration, NaiveDate};

use crate::schedule::Schedule;
use crate::task::{Task, TaskState};

pub const DEFAULT_DAY_WIDTH: f64 = 40.0;
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 960.0;
pub const MIN_DAY_WIDTH: f64 = 10.0;
pub const MAX_DAY_WIDTH: f64 = 100.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

pub const ROW_HEIGHT: f64 = 30.0;
pub const HEADER_BAND_HEIGHT: f64 = 20.0;
/// Month band plus day band.
pub const HEADER_HEIGHT: f64 = HEADER_BAND_HEIGHT * 2.0;
pub const BAR_INSET: f64 = 5.0;
pub const HANDLE_WIDTH: f64 = 10.0;
pub const MILESTONE_HALF_SIZE: f64 = ROW_HEIGHT / 2.0 - 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBand {
    pub rect: Rect,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

/// Shape drawn in a task row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowShape {
    Bar(Rect),
    Diamond { center: Point, half_size: f64 },
}

/// One task row: its shape, label, hover text, and resize hit-regions
/// (dated tasks only).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub task_id: String,
    pub label: String,
    pub tooltip: String,
    pub shape: RowShape,
    pub start_handle: Option<Rect>,
    pub end_handle: Option<Rect>,
}

/// Horizontal date-to-pixel scale: linear over whole days, shifted by the
/// pan offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub origin: NaiveDate,
    pub pixels_per_day: f64,
    pub offset_x: f64,
}

impl TimeScale {
    pub fn x(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64 * self.pixels_per_day + self.offset_x
    }

    /// Inverse of `x`, rounded to the nearest whole day.
    pub fn date_at(&self, x: f64) -> NaiveDate {
        let days = ((x - self.offset_x) / self.pixels_per_day).round() as i64;
        self.origin + Duration::days(days)
    }
}

/// Adjustable view parameters: day width (wheel), zoom factor (pinch), and
/// horizontal pan. `width` is the drawing surface's current width, handed
/// in by the host. Vertical panning is not supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    pub day_width: f64,
    pub zoom: f64,
    pub pan_x: f64,
    pub width: f64,
}

impl Default for TimelineViewport {
    fn default() -> Self {
        Self {
            day_width: DEFAULT_DAY_WIDTH,
            zoom: 1.0,
            pan_x: 0.0,
            width: DEFAULT_VIEWPORT_WIDTH,
        }
    }
}

impl TimelineViewport {
    pub fn pixels_per_day(&self) -> f64 {
        self.day_width * self.zoom
    }

    /// Wheel gesture over the timeline: each tick nudges the day width.
    pub fn apply_wheel(&mut self, delta_y: f64) {
        self.day_width = (self.day_width - delta_y * 0.1).clamp(MIN_DAY_WIDTH, MAX_DAY_WIDTH);
    }

    /// Continuous zoom gesture, horizontal scale only.
    pub fn apply_zoom(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, delta_x: f64) {
        self.pan_x += delta_x;
    }
}

/// Everything the drawing surface needs, as positioned primitives in pixel
/// space. Recomputed in full from the current schedule after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub scale: TimeScale,
    pub months: Vec<HeaderBand>,
    pub days: Vec<HeaderBand>,
    pub grid_lines: Vec<GridLine>,
    pub non_working: Vec<Rect>,
    pub rows: Vec<TaskRow>,
    pub progress_line: Vec<Point>,
    /// Width of the dated content at the current scale.
    pub total_width: f64,
    /// Width the drawing surface should allocate: the content or the
    /// viewport, whichever is wider.
    pub chart_width: f64,
    pub total_height: f64,
}

impl TimelineLayout {
    pub fn compute(schedule: &Schedule, viewport: &TimelineViewport, today: NaiveDate) -> Self {
        let pixels_per_day = viewport.pixels_per_day();
        let Some((min_date, max_date)) = date_span(&schedule.tasks) else {
            return Self::empty(today, viewport);
        };

        let scale = TimeScale {
            origin: min_date,
            pixels_per_day,
            offset_x: viewport.pan_x,
        };
        let calendar = schedule.calendar();
        let row_count = schedule.tasks.len();
        let rows_height = row_count as f64 * ROW_HEIGHT;
        let total_days = (max_date - min_date).num_days();

        // Month header bands, first-of-month to first-of-next-month.
        let mut months = Vec::new();
        let mut month = month_floor(min_date);
        while month <= max_date {
            let next = next_month(month);
            months.push(HeaderBand {
                rect: Rect {
                    x: scale.x(month),
                    y: 0.0,
                    width: scale.x(next) - scale.x(month),
                    height: HEADER_BAND_HEIGHT,
                },
                label: month.format("%b %Y").to_string(),
            });
            month = next;
        }

        // Day header bands, grid lines, and non-working-day shading.
        let mut days = Vec::new();
        let mut grid_lines = Vec::new();
        let mut non_working = Vec::new();
        let mut date = min_date;
        while date <= max_date {
            let x = scale.x(date);
            days.push(HeaderBand {
                rect: Rect {
                    x,
                    y: HEADER_BAND_HEIGHT,
                    width: pixels_per_day,
                    height: HEADER_BAND_HEIGHT,
                },
                label: date.day().to_string(),
            });
            grid_lines.push(GridLine {
                x,
                y0: HEADER_HEIGHT,
                y1: HEADER_HEIGHT + rows_height,
            });
            if !calendar.is_working_day(date) {
                non_working.push(Rect {
                    x,
                    y: HEADER_HEIGHT,
                    width: pixels_per_day,
                    height: rows_height,
                });
            }
            date = date + Duration::days(1);
        }

        let mut rows = Vec::with_capacity(row_count);
        let mut progress_line = Vec::with_capacity(row_count);
        for (index, task) in schedule.tasks.iter().enumerate() {
            let row_y = HEADER_HEIGHT + index as f64 * ROW_HEIGHT;
            rows.push(task_row(task, &scale, row_y));
            progress_line.push(Point {
                x: progress_x(task, &scale, today),
                y: row_y + ROW_HEIGHT / 2.0,
            });
        }

        Self {
            min_date,
            max_date,
            scale,
            months,
            days,
            grid_lines,
            non_working,
            rows,
            progress_line,
            total_width: total_days as f64 * pixels_per_day,
            chart_width: (total_days as f64 * pixels_per_day).max(viewport.width),
            total_height: HEADER_HEIGHT + rows_height,
        }
    }

    fn empty(today: NaiveDate, viewport: &TimelineViewport) -> Self {
        Self {
            min_date: today,
            max_date: today,
            scale: TimeScale {
                origin: today,
                pixels_per_day: viewport.pixels_per_day(),
                offset_x: viewport.pan_x,
            },
            months: Vec::new(),
            days: Vec::new(),
            grid_lines: Vec::new(),
            non_working: Vec::new(),
            rows: Vec::new(),
            progress_line: Vec::new(),
            total_width: 0.0,
            chart_width: viewport.width,
            total_height: HEADER_HEIGHT,
        }
    }
}

/// Min and max over every task's relevant dates; `None` for an empty task
/// list.
fn date_span(tasks: &[Task]) -> Option<(NaiveDate, NaiveDate)> {
    let mut span: Option<(NaiveDate, NaiveDate)> = None;
    let mut visit = |date: NaiveDate| {
        span = Some(match span {
            None => (date, date),
            Some((min, max)) => (min.min(date), max.max(date)),
        });
    };
    for task in tasks {
        match &task.state {
            TaskState::New {
                scheduled_start_date,
                scheduled_end_date,
                ..
            } => {
                visit(*scheduled_start_date);
                visit(*scheduled_end_date);
            }
            TaskState::Active {
                scheduled_start_date,
                scheduled_end_date,
                actual_start_date,
                ..
            } => {
                visit(*scheduled_start_date);
                visit(*scheduled_end_date);
                visit(*actual_start_date);
            }
            TaskState::Done {
                scheduled_start_date,
                scheduled_end_date,
                actual_start_date,
                actual_end_date,
                ..
            } => {
                visit(*scheduled_start_date);
                visit(*scheduled_end_date);
                visit(*actual_start_date);
                visit(*actual_end_date);
            }
            TaskState::Milestone {
                scheduled_date,
                actual_date,
            } => {
                visit(*scheduled_date);
                if let Some(actual) = actual_date {
                    visit(*actual);
                }
            }
        }
    }
    span
}

fn task_row(task: &Task, scale: &TimeScale, row_y: f64) -> TaskRow {
    match task.scheduled_span() {
        Some((start, end)) => {
            let x = scale.x(start);
            let width = scale.x(end) - x;
            let bar = Rect {
                x,
                y: row_y + BAR_INSET,
                width,
                height: ROW_HEIGHT - BAR_INSET * 2.0,
            };
            let handle = |cx: f64| Rect {
                x: cx - HANDLE_WIDTH / 2.0,
                y: bar.y,
                width: HANDLE_WIDTH,
                height: bar.height,
            };
            TaskRow {
                task_id: task.task_id.clone(),
                label: task.task_name.clone(),
                tooltip: format!(
                    "{}\nstart: {}\nend: {}\nprogress: {}%",
                    task.task_name,
                    start,
                    end,
                    task.progress().unwrap_or(0)
                ),
                shape: RowShape::Bar(bar),
                start_handle: Some(handle(x)),
                end_handle: Some(handle(x + width)),
            }
        }
        None => {
            let TaskState::Milestone {
                scheduled_date,
                actual_date,
            } = &task.state
            else {
                unreachable!("dated tasks always have a scheduled span");
            };
            let mut tooltip = format!("{}\ndate: {}", task.task_name, scheduled_date);
            if let Some(actual) = actual_date {
                tooltip.push_str(&format!("\nactual: {actual}"));
            }
            TaskRow {
                task_id: task.task_id.clone(),
                label: task.task_name.clone(),
                tooltip,
                shape: RowShape::Diamond {
                    center: Point {
                        x: scale.x(*scheduled_date),
                        y: row_y + ROW_HEIGHT / 2.0,
                    },
                    half_size: MILESTONE_HALF_SIZE,
                },
                start_handle: None,
                end_handle: None,
            }
        }
    }
}

/// Status-dependent x position of the progress indicator for one task.
fn progress_x(task: &Task, scale: &TimeScale, today: NaiveDate) -> f64 {
    match &task.state {
        TaskState::New {
            scheduled_start_date,
            ..
        } => {
            if *scheduled_start_date <= today {
                scale.x(*scheduled_start_date)
            } else {
                scale.x(today)
            }
        }
        TaskState::Active {
            actual_start_date, ..
        } => scale.x(*actual_start_date),
        TaskState::Milestone { scheduled_date, .. } => {
            if *scheduled_date <= today {
                scale.x(*scheduled_date)
            } else {
                scale.x(today)
            }
        }
        TaskState::Done { .. } => scale.x(today),
    }
}

fn month_floor(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn next_month(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}
