use chrono::Duration;

use crate::store::Action;
use crate::task::Task;

/// Resolve a drag on a bar's left handle: the pixel delta becomes a whole
/// day offset on the scheduled start. Returns `None` (no change) when the
/// result would not stay strictly before the scheduled end, or for
/// milestones.
pub fn resolve_start_drag(task: &Task, delta_x: f64, day_width: f64) -> Option<Task> {
    let (start, end) = task.scheduled_span()?;
    let day_offset = (delta_x / day_width).round() as i64;
    let new_start = start + Duration::days(day_offset);
    if new_start < end {
        Some(task.with_scheduled_start(new_start))
    } else {
        None
    }
}

/// Resolve a drag on a bar's right handle: `offset_x` is the pointer's
/// distance from the bar's left edge, floored at one day of duration.
/// Person-days are left untouched until the edit is committed through the
/// coupled setters. `None` for milestones.
pub fn resolve_end_drag(task: &Task, offset_x: f64, day_width: f64) -> Option<Task> {
    let (start, _) = task.scheduled_span()?;
    let day_count = ((offset_x / day_width).round() as i64).max(1);
    Some(task.with_scheduled_end_raw(start + Duration::days(day_count)))
}

/// Commit a drag candidate as the single store action for the gesture.
pub fn commit_drag(task: Task) -> Action {
    Action::UpdateTask(task)
}
