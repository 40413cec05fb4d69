use crate::schedule::Schedule;
use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ScheduleValidationError {
    message: String,
}

impl ScheduleValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ScheduleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScheduleValidationError {}

pub fn validate_task(task: &Task) -> Result<(), ScheduleValidationError> {
    if let Some((start, end)) = task.scheduled_span() {
        if end < start {
            return Err(ScheduleValidationError::new(format!(
                "task {} has scheduled end {} before scheduled start {}",
                task.task_id, end, start
            )));
        }
    }

    if let Some(person_days) = task.person_days() {
        if person_days < 0 {
            return Err(ScheduleValidationError::new(format!(
                "task {} has negative person_days {}",
                task.task_id, person_days
            )));
        }
    }

    if let Some(progress) = task.progress() {
        if progress > 100 {
            return Err(ScheduleValidationError::new(format!(
                "task {} has progress {} outside 0..=100",
                task.task_id, progress
            )));
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), ScheduleValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.task_id.as_str()) {
            return Err(ScheduleValidationError::new(format!(
                "duplicate task id {}",
                task.task_id
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}

/// Validate the whole document shape. Dangling section references are
/// legal (section removal never cascades), so they are not checked here.
pub fn validate_schedule(schedule: &Schedule) -> Result<(), ScheduleValidationError> {
    let mut seen_sections = HashSet::with_capacity(schedule.sections.len());
    for section in &schedule.sections {
        if !seen_sections.insert(section.section_id.as_str()) {
            return Err(ScheduleValidationError::new(format!(
                "duplicate section id {}",
                section.section_id
            )));
        }
    }
    validate_task_collection(&schedule.tasks)
}
