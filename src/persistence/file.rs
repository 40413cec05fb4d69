use super::{PersistenceError, PersistenceResult};
use crate::schedule::{SCHEDULE_VERSION, Schedule, Section};
use crate::task::{Task, TaskState};
use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Save name for the current date: `schedule_<YYYY-MM-DD>.json`.
pub fn default_save_filename(today: NaiveDate) -> String {
    format!("schedule_{}.json", today.format("%Y-%m-%d"))
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    super::validate_schedule(schedule)?;
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    info!("saved schedule to {}", path.as_ref().display());
    Ok(())
}

/// Load a schedule document. Parse failures, a version other than `"1.0"`,
/// and shape violations are each a single error with no state touched.
pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(&path)?;
    let schedule: Schedule = serde_json::from_reader(file)?;
    if schedule.version != SCHEDULE_VERSION {
        warn!(
            "rejecting {}: version '{}'",
            path.as_ref().display(),
            schedule.version
        );
        return Err(PersistenceError::UnsupportedVersion(schedule.version));
    }
    super::validate_schedule(&schedule)?;
    info!("loaded schedule from {}", path.as_ref().display());
    Ok(schedule)
}

/// One CSV row: a task, or the single metadata row carrying the
/// non-tabular parts of the document as embedded JSON.
#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    task_id: String,
    section_id: String,
    task_name: String,
    status: String,
    scheduled_start_date: String,
    scheduled_end_date: String,
    person_days: String,
    actual_start_date: String,
    actual_end_date: String,
    assignee: String,
    progress: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    sections_json: String,
    #[serde(default)]
    holidays_json: String,
    #[serde(default)]
    skip_weekends: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let mut record = TaskCsvRecord::default();
        record.task_id = task.task_id.clone();
        record.section_id = task.section_id.clone();
        record.task_name = task.task_name.clone();
        record.status = task.status().to_string();
        record.assignee = task.assignee.clone();
        match &task.state {
            TaskState::New {
                scheduled_start_date,
                scheduled_end_date,
                person_days,
            } => {
                record.scheduled_start_date = format_date(*scheduled_start_date);
                record.scheduled_end_date = format_date(*scheduled_end_date);
                record.person_days = person_days.to_string();
            }
            TaskState::Active {
                scheduled_start_date,
                scheduled_end_date,
                person_days,
                actual_start_date,
                progress,
            } => {
                record.scheduled_start_date = format_date(*scheduled_start_date);
                record.scheduled_end_date = format_date(*scheduled_end_date);
                record.person_days = person_days.to_string();
                record.actual_start_date = format_date(*actual_start_date);
                record.progress = progress.to_string();
            }
            TaskState::Done {
                scheduled_start_date,
                scheduled_end_date,
                person_days,
                actual_start_date,
                actual_end_date,
            } => {
                record.scheduled_start_date = format_date(*scheduled_start_date);
                record.scheduled_end_date = format_date(*scheduled_end_date);
                record.person_days = person_days.to_string();
                record.actual_start_date = format_date(*actual_start_date);
                record.actual_end_date = format_date(*actual_end_date);
            }
            TaskState::Milestone {
                scheduled_date,
                actual_date,
            } => {
                record.scheduled_start_date = format_date(*scheduled_date);
                if let Some(actual) = actual_date {
                    record.actual_start_date = format_date(*actual);
                }
            }
        }
        record
    }
}

impl TaskCsvRecord {
    fn metadata_row(schedule: &Schedule) -> PersistenceResult<Self> {
        let mut record = TaskCsvRecord::default();
        record.task_name = "__metadata__".to_string();
        record.version = schedule.version.clone();
        record.sections_json = serde_json::to_string(&schedule.sections)?;
        record.holidays_json = serde_json::to_string(&schedule.holidays)?;
        record.skip_weekends = schedule.skip_weekends.to_string();
        Ok(record)
    }

    fn is_metadata_row(&self) -> bool {
        !self.version.trim().is_empty() || !self.sections_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<Task> {
        if self.is_metadata_row() {
            return Err(PersistenceError::InvalidData(
                "metadata row cannot be converted to task".into(),
            ));
        }
        let state = match self.status.as_str() {
            "new" => TaskState::New {
                scheduled_start_date: require_date(&self.scheduled_start_date, "scheduled start")?,
                scheduled_end_date: require_date(&self.scheduled_end_date, "scheduled end")?,
                person_days: parse_person_days(&self.person_days)?,
            },
            "active" => TaskState::Active {
                scheduled_start_date: require_date(&self.scheduled_start_date, "scheduled start")?,
                scheduled_end_date: require_date(&self.scheduled_end_date, "scheduled end")?,
                person_days: parse_person_days(&self.person_days)?,
                actual_start_date: require_date(&self.actual_start_date, "actual start")?,
                progress: parse_progress(&self.progress)?,
            },
            "done" => TaskState::Done {
                scheduled_start_date: require_date(&self.scheduled_start_date, "scheduled start")?,
                scheduled_end_date: require_date(&self.scheduled_end_date, "scheduled end")?,
                person_days: parse_person_days(&self.person_days)?,
                actual_start_date: require_date(&self.actual_start_date, "actual start")?,
                actual_end_date: require_date(&self.actual_end_date, "actual end")?,
            },
            "milestone" => TaskState::Milestone {
                scheduled_date: require_date(&self.scheduled_start_date, "scheduled date")?,
                actual_date: parse_date(&self.actual_start_date)?,
            },
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "unknown task status '{other}'"
                )));
            }
        };
        Ok(Task {
            task_id: self.task_id,
            section_id: self.section_id,
            task_name: self.task_name,
            assignee: self.assignee,
            state,
        })
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    super::validate_schedule(schedule)?;
    let file = File::create(&path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(schedule)?)?;
    for task in &schedule.tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    info!("saved schedule to {}", path.as_ref().display());
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(&path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut schedule = Schedule::new();
    let mut saw_metadata = false;
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if saw_metadata {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            saw_metadata = true;
            let version = record.version.trim();
            if !version.is_empty() && version != SCHEDULE_VERSION {
                return Err(PersistenceError::UnsupportedVersion(version.to_string()));
            }
            if !record.sections_json.trim().is_empty() {
                schedule.sections =
                    serde_json::from_str::<Vec<Section>>(&record.sections_json).map_err(|err| {
                        PersistenceError::InvalidData(format!("invalid sections json: {err}"))
                    })?;
            }
            if !record.holidays_json.trim().is_empty() {
                schedule.holidays = serde_json::from_str::<Vec<NaiveDate>>(&record.holidays_json)
                    .map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid holidays json: {err}"))
                })?;
            }
            if !record.skip_weekends.trim().is_empty() {
                schedule.skip_weekends = record
                    .skip_weekends
                    .trim()
                    .parse::<bool>()
                    .unwrap_or(schedule.skip_weekends);
            }
            continue;
        }
        schedule.tasks.push(record.into_task()?);
    }

    super::validate_schedule(&schedule)?;
    info!("loaded schedule from {}", path.as_ref().display());
    Ok(schedule)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn require_date(input: &str, field: &str) -> PersistenceResult<NaiveDate> {
    parse_date(input)?
        .ok_or_else(|| PersistenceError::InvalidData(format!("missing {field} date")))
}

fn parse_person_days(input: &str) -> PersistenceResult<i64> {
    if input.trim().is_empty() {
        return Ok(0);
    }
    input
        .trim()
        .parse::<i64>()
        .map_err(|e| PersistenceError::InvalidData(format!("invalid person_days '{input}': {e}")))
}

fn parse_progress(input: &str) -> PersistenceResult<u8> {
    if input.trim().is_empty() {
        return Ok(0);
    }
    input
        .trim()
        .parse::<u8>()
        .map_err(|e| PersistenceError::InvalidData(format!("invalid progress '{input}': {e}")))
}
