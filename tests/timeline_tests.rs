use chrono::NaiveDate;
use gantt_tool::timeline::{
    HEADER_HEIGHT, MAX_DAY_WIDTH, MAX_ZOOM, MIN_DAY_WIDTH, MIN_ZOOM, ROW_HEIGHT, RowShape,
};
use gantt_tool::{Schedule, Section, Task, TaskState, TimelineLayout, TimelineViewport};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_schedule() -> Schedule {
    let mut schedule = Schedule::new();
    schedule.sections.push(Section::new("s1", "Section 1"));
    schedule
        .tasks
        .push(Task::new_task("t1", "s1", "Build", d(2025, 3, 3), d(2025, 3, 7), 5));
    schedule
        .tasks
        .push(Task::milestone("m1", "s1", "Ship", d(2025, 3, 10)));
    schedule
}

fn layout_at(today: NaiveDate) -> TimelineLayout {
    TimelineLayout::compute(&sample_schedule(), &TimelineViewport::default(), today)
}

#[test]
fn span_covers_all_task_dates() {
    let layout = layout_at(d(2025, 3, 5));
    assert_eq!(layout.min_date, d(2025, 3, 3));
    assert_eq!(layout.max_date, d(2025, 3, 10));
    assert_eq!(layout.total_width, 7.0 * 40.0);
    // Content is narrower than the surface, so the surface width wins.
    assert_eq!(layout.chart_width, 960.0);
}

#[test]
fn actual_dates_extend_the_span() {
    let mut schedule = sample_schedule();
    schedule.tasks[0].state = TaskState::Done {
        scheduled_start_date: d(2025, 3, 3),
        scheduled_end_date: d(2025, 3, 7),
        person_days: 5,
        actual_start_date: d(2025, 2, 28),
        actual_end_date: d(2025, 3, 12),
    };
    let layout = TimelineLayout::compute(&schedule, &TimelineViewport::default(), d(2025, 3, 5));
    assert_eq!(layout.min_date, d(2025, 2, 28));
    assert_eq!(layout.max_date, d(2025, 3, 12));
}

#[test]
fn one_day_band_and_grid_line_per_day() {
    let layout = layout_at(d(2025, 3, 5));
    assert_eq!(layout.days.len(), 8);
    assert_eq!(layout.grid_lines.len(), 8);
    assert_eq!(layout.days[0].label, "3");
    assert_eq!(layout.days[0].rect.x, 0.0);
    assert_eq!(layout.days[1].rect.x, 40.0);
    let grid = layout.grid_lines[0];
    assert_eq!(grid.y0, HEADER_HEIGHT);
    assert_eq!(grid.y1, HEADER_HEIGHT + 2.0 * ROW_HEIGHT);
}

#[test]
fn month_band_spans_the_calendar_month() {
    let layout = layout_at(d(2025, 3, 5));
    assert_eq!(layout.months.len(), 1);
    let month = &layout.months[0];
    assert_eq!(month.label, "Mar 2025");
    // The band starts at the first of the month, before the visible range.
    assert_eq!(month.rect.x, -2.0 * 40.0);
    assert_eq!(month.rect.width, 31.0 * 40.0);
}

#[test]
fn weekend_days_are_shaded() {
    let layout = layout_at(d(2025, 3, 5));
    // 2025-03-08 and 2025-03-09 fall on a weekend.
    let xs: Vec<f64> = layout.non_working.iter().map(|r| r.x).collect();
    assert_eq!(xs, vec![5.0 * 40.0, 6.0 * 40.0]);
}

#[test]
fn holidays_are_shaded_and_weekends_ignored_when_disabled() {
    let mut schedule = sample_schedule();
    schedule.skip_weekends = false;
    schedule.holidays.push(d(2025, 3, 4));
    let layout = TimelineLayout::compute(&schedule, &TimelineViewport::default(), d(2025, 3, 5));
    let xs: Vec<f64> = layout.non_working.iter().map(|r| r.x).collect();
    assert_eq!(xs, vec![40.0]);
}

#[test]
fn dated_task_renders_as_bar_with_handles() {
    let layout = layout_at(d(2025, 3, 5));
    let row = &layout.rows[0];
    let RowShape::Bar(bar) = row.shape else {
        panic!("expected a bar");
    };
    assert_eq!(bar.x, 0.0);
    assert_eq!(bar.width, 4.0 * 40.0);
    assert_eq!(bar.y, HEADER_HEIGHT + 5.0);
    assert_eq!(bar.height, ROW_HEIGHT - 10.0);
    assert!(row.start_handle.is_some());
    assert!(row.end_handle.is_some());
}

#[test]
fn milestone_renders_as_diamond_without_handles() {
    let layout = layout_at(d(2025, 3, 5));
    let row = &layout.rows[1];
    let RowShape::Diamond { center, half_size } = row.shape else {
        panic!("expected a diamond");
    };
    assert_eq!(center.x, 7.0 * 40.0);
    assert_eq!(center.y, HEADER_HEIGHT + ROW_HEIGHT + ROW_HEIGHT / 2.0);
    assert!(half_size > 0.0);
    assert!(row.start_handle.is_none());
    assert!(row.end_handle.is_none());
}

#[test]
fn tooltip_carries_name_dates_and_progress() {
    let layout = layout_at(d(2025, 3, 5));
    let tooltip = &layout.rows[0].tooltip;
    assert!(tooltip.contains("Build"));
    assert!(tooltip.contains("2025-03-03"));
    assert!(tooltip.contains("2025-03-07"));
    assert!(tooltip.contains("0%"));
}

#[test]
fn progress_line_has_one_point_per_row_at_row_center() {
    let layout = layout_at(d(2025, 3, 5));
    assert_eq!(layout.progress_line.len(), 2);
    assert_eq!(layout.progress_line[0].y, HEADER_HEIGHT + ROW_HEIGHT / 2.0);
    assert_eq!(
        layout.progress_line[1].y,
        HEADER_HEIGHT + ROW_HEIGHT + ROW_HEIGHT / 2.0
    );
}

#[test]
fn progress_for_started_new_task_sits_at_scheduled_start() {
    let layout = layout_at(d(2025, 3, 5));
    assert_eq!(layout.progress_line[0].x, 0.0);
}

#[test]
fn progress_for_future_work_sits_at_today() {
    let layout = layout_at(d(2025, 3, 5));
    // Milestone on 3/10 is still ahead; its point pins to today (3/5).
    assert_eq!(layout.progress_line[1].x, 2.0 * 40.0);
}

#[test]
fn progress_for_future_new_task_sits_at_today() {
    let layout = layout_at(d(2025, 3, 1));
    // Task starts 3/3; on 3/1 the point pins to today, before the origin.
    assert_eq!(layout.progress_line[0].x, -2.0 * 40.0);
}

#[test]
fn progress_for_active_task_sits_at_actual_start() {
    let mut schedule = sample_schedule();
    schedule.tasks[0].state = TaskState::Active {
        scheduled_start_date: d(2025, 3, 3),
        scheduled_end_date: d(2025, 3, 7),
        person_days: 5,
        actual_start_date: d(2025, 3, 4),
        progress: 30,
    };
    let layout = TimelineLayout::compute(&schedule, &TimelineViewport::default(), d(2025, 3, 6));
    assert_eq!(layout.progress_line[0].x, 40.0);
}

#[test]
fn progress_for_done_task_sits_at_today() {
    let mut schedule = sample_schedule();
    schedule.tasks[0].state = TaskState::Done {
        scheduled_start_date: d(2025, 3, 3),
        scheduled_end_date: d(2025, 3, 7),
        person_days: 5,
        actual_start_date: d(2025, 3, 3),
        actual_end_date: d(2025, 3, 7),
    };
    let layout = TimelineLayout::compute(&schedule, &TimelineViewport::default(), d(2025, 3, 6));
    assert_eq!(layout.progress_line[0].x, 3.0 * 40.0);
}

#[test]
fn zoom_rescales_without_touching_dates() {
    let schedule = sample_schedule();
    let mut viewport = TimelineViewport::default();
    viewport.apply_zoom(2.0);
    let layout = TimelineLayout::compute(&schedule, &viewport, d(2025, 3, 5));
    assert_eq!(layout.scale.pixels_per_day, 80.0);
    assert_eq!(layout.total_width, 7.0 * 80.0);
    assert_eq!(layout.min_date, d(2025, 3, 3));
    let RowShape::Bar(bar) = layout.rows[0].shape else {
        panic!("expected a bar");
    };
    assert_eq!(bar.width, 4.0 * 80.0);
}

#[test]
fn zoom_factor_is_clamped() {
    let mut viewport = TimelineViewport::default();
    viewport.apply_zoom(100.0);
    assert_eq!(viewport.zoom, MAX_ZOOM);
    viewport.apply_zoom(0.0001);
    assert_eq!(viewport.zoom, MIN_ZOOM);
}

#[test]
fn wheel_adjusts_day_width_within_bounds() {
    let mut viewport = TimelineViewport::default();
    viewport.apply_wheel(100.0);
    assert_eq!(viewport.day_width, 30.0);
    viewport.apply_wheel(1000.0);
    assert_eq!(viewport.day_width, MIN_DAY_WIDTH);
    viewport.apply_wheel(-10000.0);
    assert_eq!(viewport.day_width, MAX_DAY_WIDTH);
}

#[test]
fn pan_translates_horizontally_only() {
    let schedule = sample_schedule();
    let mut viewport = TimelineViewport::default();
    viewport.pan_by(-120.0);
    let layout = TimelineLayout::compute(&schedule, &viewport, d(2025, 3, 5));
    let RowShape::Bar(bar) = layout.rows[0].shape else {
        panic!("expected a bar");
    };
    assert_eq!(bar.x, -120.0);
    assert_eq!(bar.y, HEADER_HEIGHT + 5.0);
    assert_eq!(layout.days[0].rect.x, -120.0);
}

#[test]
fn empty_task_list_yields_empty_layout() {
    let mut schedule = sample_schedule();
    schedule.tasks.clear();
    let layout = TimelineLayout::compute(&schedule, &TimelineViewport::default(), d(2025, 3, 5));
    assert!(layout.rows.is_empty());
    assert!(layout.progress_line.is_empty());
    assert!(layout.days.is_empty());
    assert_eq!(layout.total_width, 0.0);
}

#[test]
fn scale_inverse_recovers_dates() {
    let layout = layout_at(d(2025, 3, 5));
    for offset in 0u32..7 {
        let date = d(2025, 3, 3 + offset);
        assert_eq!(layout.scale.date_at(layout.scale.x(date)), date);
    }
}
