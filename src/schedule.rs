use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::WorkCalendar;
use crate::task::{Task, TaskState};

/// The only document version this build reads or writes.
pub const SCHEDULE_VERSION: &str = "1.0";

/// A named grouping of tasks and a report aggregation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_id: String,
    pub section_name: String,
}

impl Section {
    pub fn new(section_id: impl Into<String>, section_name: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            section_name: section_name.into(),
        }
    }

    /// A fresh section with a generated id and an empty name, as created
    /// by the "add section" affordance.
    pub fn generate() -> Self {
        Self::new(new_entity_id(), "")
    }
}

/// The schedule document. Section and task order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub version: String,
    pub sections: Vec<Section>,
    pub tasks: Vec<Task>,
    pub holidays: Vec<NaiveDate>,
    pub skip_weekends: bool,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-section totals for the section table.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRollup {
    pub task_count: usize,
    pub person_days: i64,
    /// Person-day-weighted completion percent; 0 when the section has no
    /// dated effort.
    pub progress_percent: f64,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            version: SCHEDULE_VERSION.to_string(),
            sections: Vec::new(),
            tasks: Vec::new(),
            holidays: Vec::new(),
            skip_weekends: true,
        }
    }

    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::from_schedule(self)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }

    pub fn section_name(&self, section_id: &str) -> Option<&str> {
        self.section(section_id).map(|s| s.section_name.as_str())
    }

    /// Task count, effort total, and weighted progress for one section.
    /// Milestones count toward `task_count` but carry no effort.
    pub fn section_rollup(&self, section_id: &str) -> SectionRollup {
        let mut task_count = 0;
        let mut total_days = 0i64;
        let mut completed_days = 0f64;
        for task in self.tasks.iter().filter(|t| t.section_id == section_id) {
            task_count += 1;
            if let (Some(person_days), Some(progress)) = (task.person_days(), task.progress()) {
                total_days += person_days;
                completed_days += person_days as f64 * f64::from(progress) / 100.0;
            }
        }
        let progress_percent = if total_days > 0 {
            completed_days / total_days as f64 * 100.0
        } else {
            0.0
        };
        SectionRollup {
            task_count,
            person_days: total_days,
            progress_percent,
        }
    }

    /// The bundled demo schedule: a small construction project dated
    /// relative to `today`.
    pub fn sample(today: NaiveDate) -> Self {
        let day = |offset: i64| today + Duration::days(offset);

        let mut active_survey = Task::new_task("t1", "prep", "Site survey", day(0), day(2), 3);
        active_survey.assignee = "Crew A".to_string();
        active_survey.state = TaskState::Active {
            scheduled_start_date: day(0),
            scheduled_end_date: day(2),
            person_days: 3,
            actual_start_date: day(0),
            progress: 40,
        };

        let mut excavation = Task::new_task("t2", "foundation", "Excavation", day(4), day(7), 4);
        excavation.assignee = "Crew B".to_string();
        let mut concrete = Task::new_task("t3", "foundation", "Concrete pour", day(8), day(10), 3);
        concrete.assignee = "Crew C".to_string();
        let mut framing = Task::new_task("t4", "structure", "Frame assembly", day(11), day(17), 7);
        framing.assignee = "Crew D".to_string();
        let mut interior =
            Task::new_task("t5", "finishing", "Interior finishing", day(19), day(25), 7);
        interior.assignee = "Crew E".to_string();

        Self {
            version: SCHEDULE_VERSION.to_string(),
            sections: vec![
                Section::new("prep", "Preparation"),
                Section::new("foundation", "Foundation"),
                Section::new("structure", "Structure"),
                Section::new("finishing", "Finishing"),
            ],
            tasks: vec![
                active_survey,
                Task::milestone("m-permit", "prep", "Permit approval", day(3)),
                excavation,
                concrete,
                framing,
                Task::milestone("m-roof", "structure", "Roof raised", day(18)),
                interior,
                Task::milestone("m-final", "finishing", "Final inspection", day(26)),
            ],
            holidays: Vec::new(),
            skip_weekends: true,
        }
    }
}

/// Generated id for new sections and tasks.
pub fn new_entity_id() -> String {
    Uuid::new_v4().simple().to_string()
}
