use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

use crate::schedule::{Schedule, Section};
use crate::task::Task;

/// An intent against the schedule. Every mutation flows through here and
/// produces a complete new snapshot.
#[derive(Debug, Clone)]
pub enum Action {
    SetEditable(bool),
    SetSchedule(Schedule),
    AddSection(Section),
    UpdateSection(Section),
    RemoveSection(String),
    AddTask(Task),
    UpdateTask(Task),
    RemoveTask(String),
    ReorderTask { task_id: String, new_index: i64 },
    AddHoliday(NaiveDate),
    RemoveHoliday(NaiveDate),
    SetSkipWeekends(bool),
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::SetEditable(_) => "set_editable",
            Action::SetSchedule(_) => "set_schedule",
            Action::AddSection(_) => "add_section",
            Action::UpdateSection(_) => "update_section",
            Action::RemoveSection(_) => "remove_section",
            Action::AddTask(_) => "add_task",
            Action::UpdateTask(_) => "update_task",
            Action::RemoveTask(_) => "remove_task",
            Action::ReorderTask { .. } => "reorder_task",
            Action::AddHoliday(_) => "add_holiday",
            Action::RemoveHoliday(_) => "remove_holiday",
            Action::SetSkipWeekends(_) => "set_skip_weekends",
        }
    }
}

/// Collapse entries sharing a key: each key keeps its first position and
/// its last-written value.
fn merge_with_overwrite<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut merged: Vec<T> = Vec::with_capacity(items.len());
    let mut positions: HashMap<K, usize> = HashMap::with_capacity(items.len());
    for item in items {
        match positions.get(&key(&item)) {
            Some(&idx) => merged[idx] = item,
            None => {
                positions.insert(key(&item), merged.len());
                merged.push(item);
            }
        }
    }
    merged
}

/// Pure reducer: `(Schedule, Action) -> Schedule`. Unknown ids are no-ops;
/// reorder indices are clamped. `SetEditable` is handled by the store and
/// leaves the document untouched here.
pub fn reduce(schedule: &Schedule, action: Action) -> Schedule {
    match action {
        Action::SetEditable(_) => schedule.clone(),
        Action::SetSchedule(next) => next,
        Action::AddSection(section) => {
            let mut next = schedule.clone();
            next.sections.push(section);
            next
        }
        Action::UpdateSection(section) => {
            let mut next = schedule.clone();
            let sections: Vec<Section> = std::mem::take(&mut next.sections)
                .into_iter()
                .map(|s| {
                    if s.section_id == section.section_id {
                        section.clone()
                    } else {
                        s
                    }
                })
                .collect();
            next.sections = merge_with_overwrite(sections, |s: &Section| s.section_id.clone());
            next
        }
        Action::RemoveSection(section_id) => {
            // Tasks referencing the section are left in place.
            let mut next = schedule.clone();
            next.sections.retain(|s| s.section_id != section_id);
            next
        }
        Action::AddTask(task) => {
            let mut next = schedule.clone();
            next.tasks.push(task);
            next
        }
        Action::UpdateTask(task) => {
            let mut next = schedule.clone();
            let tasks: Vec<Task> = std::mem::take(&mut next.tasks)
                .into_iter()
                .map(|t| if t.task_id == task.task_id { task.clone() } else { t })
                .collect();
            next.tasks = merge_with_overwrite(tasks, |t: &Task| t.task_id.clone());
            next
        }
        Action::RemoveTask(task_id) => {
            let mut next = schedule.clone();
            next.tasks.retain(|t| t.task_id != task_id);
            next
        }
        Action::ReorderTask { task_id, new_index } => {
            let mut next = schedule.clone();
            let Some(position) = next.tasks.iter().position(|t| t.task_id == task_id) else {
                return next;
            };
            let task = next.tasks.remove(position);
            let index = new_index.clamp(0, next.tasks.len() as i64) as usize;
            next.tasks.insert(index, task);
            next
        }
        Action::AddHoliday(date) => {
            let mut next = schedule.clone();
            next.holidays.push(date);
            next
        }
        Action::RemoveHoliday(date) => {
            // NaiveDate equality is calendar-day equality, so this removes
            // every entry for the day.
            let mut next = schedule.clone();
            next.holidays.retain(|h| *h != date);
            next
        }
        Action::SetSkipWeekends(skip) => {
            let mut next = schedule.clone();
            next.skip_weekends = skip;
            next
        }
    }
}

/// Owner of the canonical schedule. Consumers read `schedule()` and hand
/// mutations back as actions through `dispatch`.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    schedule: Schedule,
    editable: bool,
}

impl ScheduleStore {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            editable: false,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("dispatching {}", action.label());
        if let Action::SetEditable(editable) = action {
            self.editable = editable;
            return;
        }
        self.schedule = reduce(&self.schedule, action);
    }
}
