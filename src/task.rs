use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::WorkCalendar;

/// Lifecycle status a task can be asked to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    New,
    Active,
    Done,
    Milestone,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::Active => "active",
            TaskStatus::Done => "done",
            TaskStatus::Milestone => "milestone",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(TaskStatus::New),
            "active" => Ok(TaskStatus::Active),
            "done" => Ok(TaskStatus::Done),
            "milestone" => Ok(TaskStatus::Milestone),
            _ => Err(()),
        }
    }
}

/// Per-status scheduling fields. `new` and `done` do not carry a progress
/// value of their own; it is fixed at 0 and 100 respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskState {
    #[serde(rename_all = "camelCase")]
    New {
        scheduled_start_date: NaiveDate,
        scheduled_end_date: NaiveDate,
        person_days: i64,
    },
    #[serde(rename_all = "camelCase")]
    Active {
        scheduled_start_date: NaiveDate,
        scheduled_end_date: NaiveDate,
        person_days: i64,
        actual_start_date: NaiveDate,
        progress: u8,
    },
    #[serde(rename_all = "camelCase")]
    Done {
        scheduled_start_date: NaiveDate,
        scheduled_end_date: NaiveDate,
        person_days: i64,
        actual_start_date: NaiveDate,
        actual_end_date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    Milestone {
        scheduled_date: NaiveDate,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actual_date: Option<NaiveDate>,
    },
}

/// A unit of scheduled work: shared identity fields plus the status-tagged
/// scheduling state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: String,
    pub section_id: String,
    pub task_name: String,
    pub assignee: String,
    #[serde(flatten)]
    pub state: TaskState,
}

impl Task {
    pub fn new_task(
        task_id: impl Into<String>,
        section_id: impl Into<String>,
        task_name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        person_days: i64,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            section_id: section_id.into(),
            task_name: task_name.into(),
            assignee: String::new(),
            state: TaskState::New {
                scheduled_start_date: start,
                scheduled_end_date: end,
                person_days,
            },
        }
    }

    pub fn milestone(
        task_id: impl Into<String>,
        section_id: impl Into<String>,
        task_name: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            section_id: section_id.into(),
            task_name: task_name.into(),
            assignee: String::new(),
            state: TaskState::Milestone {
                scheduled_date: date,
                actual_date: None,
            },
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self.state {
            TaskState::New { .. } => TaskStatus::New,
            TaskState::Active { .. } => TaskStatus::Active,
            TaskState::Done { .. } => TaskStatus::Done,
            TaskState::Milestone { .. } => TaskStatus::Milestone,
        }
    }

    pub fn is_milestone(&self) -> bool {
        matches!(self.state, TaskState::Milestone { .. })
    }

    /// Scheduled `(start, end)` pair; `None` for milestones.
    pub fn scheduled_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self.state {
            TaskState::New {
                scheduled_start_date,
                scheduled_end_date,
                ..
            }
            | TaskState::Active {
                scheduled_start_date,
                scheduled_end_date,
                ..
            }
            | TaskState::Done {
                scheduled_start_date,
                scheduled_end_date,
                ..
            } => Some((scheduled_start_date, scheduled_end_date)),
            TaskState::Milestone { .. } => None,
        }
    }

    /// Planned effort; `None` for milestones.
    pub fn person_days(&self) -> Option<i64> {
        match self.state {
            TaskState::New { person_days, .. }
            | TaskState::Active { person_days, .. }
            | TaskState::Done { person_days, .. } => Some(person_days),
            TaskState::Milestone { .. } => None,
        }
    }

    /// Effective progress percent: fixed 0 for `new`, fixed 100 for `done`,
    /// stored value for `active`, `None` for milestones.
    pub fn progress(&self) -> Option<u8> {
        match self.state {
            TaskState::New { .. } => Some(0),
            TaskState::Active { progress, .. } => Some(progress),
            TaskState::Done { .. } => Some(100),
            TaskState::Milestone { .. } => None,
        }
    }

    /// Apply a user-selected target status. Undefined combinations return
    /// the task unchanged; the identity transitions are no-ops.
    pub fn transition_to(&self, target: TaskStatus) -> Task {
        let state = match (&self.state, target) {
            // -> active
            (
                TaskState::New {
                    scheduled_start_date,
                    scheduled_end_date,
                    person_days,
                },
                TaskStatus::Active,
            ) => TaskState::Active {
                scheduled_start_date: *scheduled_start_date,
                scheduled_end_date: *scheduled_end_date,
                person_days: *person_days,
                actual_start_date: *scheduled_start_date,
                progress: 0,
            },
            (
                TaskState::Done {
                    scheduled_start_date,
                    scheduled_end_date,
                    person_days,
                    ..
                },
                TaskStatus::Active,
            ) => TaskState::Active {
                scheduled_start_date: *scheduled_start_date,
                scheduled_end_date: *scheduled_end_date,
                person_days: *person_days,
                actual_start_date: *scheduled_start_date,
                progress: 100,
            },
            (
                TaskState::Milestone {
                    scheduled_date,
                    actual_date,
                },
                TaskStatus::Active,
            ) => TaskState::Active {
                scheduled_start_date: *scheduled_date,
                scheduled_end_date: *scheduled_date,
                person_days: 1,
                actual_start_date: actual_date.unwrap_or(*scheduled_date),
                progress: 0,
            },

            // -> done
            (
                TaskState::New {
                    scheduled_start_date,
                    scheduled_end_date,
                    person_days,
                },
                TaskStatus::Done,
            ) => TaskState::Done {
                scheduled_start_date: *scheduled_start_date,
                scheduled_end_date: *scheduled_end_date,
                person_days: *person_days,
                actual_start_date: *scheduled_start_date,
                actual_end_date: *scheduled_end_date,
            },
            (
                TaskState::Active {
                    scheduled_start_date,
                    scheduled_end_date,
                    person_days,
                    actual_start_date,
                    ..
                },
                TaskStatus::Done,
            ) => TaskState::Done {
                scheduled_start_date: *scheduled_start_date,
                scheduled_end_date: *scheduled_end_date,
                person_days: *person_days,
                actual_start_date: *actual_start_date,
                actual_end_date: *scheduled_end_date,
            },
            (
                TaskState::Milestone {
                    scheduled_date,
                    actual_date,
                },
                TaskStatus::Done,
            ) => TaskState::Done {
                scheduled_start_date: *scheduled_date,
                scheduled_end_date: *scheduled_date,
                person_days: 1,
                actual_start_date: actual_date.unwrap_or(*scheduled_date),
                actual_end_date: actual_date.unwrap_or(*scheduled_date),
            },

            // -> new (scheduling fields retained, progress reset)
            (
                TaskState::Active {
                    scheduled_start_date,
                    scheduled_end_date,
                    person_days,
                    ..
                },
                TaskStatus::New,
            )
            | (
                TaskState::Done {
                    scheduled_start_date,
                    scheduled_end_date,
                    person_days,
                    ..
                },
                TaskStatus::New,
            ) => TaskState::New {
                scheduled_start_date: *scheduled_start_date,
                scheduled_end_date: *scheduled_end_date,
                person_days: *person_days,
            },
            (TaskState::Milestone { scheduled_date, .. }, TaskStatus::New) => TaskState::New {
                scheduled_start_date: *scheduled_date,
                scheduled_end_date: *scheduled_date,
                person_days: 1,
            },

            // -> milestone (anchored at the scheduled start)
            (
                TaskState::New {
                    scheduled_start_date,
                    ..
                },
                TaskStatus::Milestone,
            )
            | (
                TaskState::Active {
                    scheduled_start_date,
                    ..
                },
                TaskStatus::Milestone,
            ) => TaskState::Milestone {
                scheduled_date: *scheduled_start_date,
                actual_date: None,
            },
            (
                TaskState::Done {
                    scheduled_start_date,
                    actual_end_date,
                    ..
                },
                TaskStatus::Milestone,
            ) => TaskState::Milestone {
                scheduled_date: *scheduled_start_date,
                actual_date: Some(*actual_end_date),
            },

            // identity and anything else: unchanged
            (state, _) => state.clone(),
        };

        Task {
            state,
            ..self.clone()
        }
    }

    /// Replace the scheduled start without touching duration or end date.
    /// No-op on milestones.
    pub fn with_scheduled_start(&self, start: NaiveDate) -> Task {
        let mut task = self.clone();
        match &mut task.state {
            TaskState::New {
                scheduled_start_date,
                ..
            }
            | TaskState::Active {
                scheduled_start_date,
                ..
            }
            | TaskState::Done {
                scheduled_start_date,
                ..
            } => *scheduled_start_date = start,
            TaskState::Milestone { .. } => {}
        }
        task
    }

    /// Replace the scheduled end without re-deriving effort. No-op on
    /// milestones. Used by drags, where person-days stay untouched until
    /// the edit is committed through the coupled setters.
    pub fn with_scheduled_end_raw(&self, end: NaiveDate) -> Task {
        let mut task = self.clone();
        match &mut task.state {
            TaskState::New {
                scheduled_end_date, ..
            }
            | TaskState::Active {
                scheduled_end_date, ..
            }
            | TaskState::Done {
                scheduled_end_date, ..
            } => *scheduled_end_date = end,
            TaskState::Milestone { .. } => {}
        }
        task
    }

    /// Set planned effort and re-derive the scheduled end date through the
    /// calendar. No-op on milestones and for `person_days < 1`.
    pub fn with_person_days(&self, person_days: i64, calendar: &WorkCalendar) -> Task {
        let Some((start, _)) = self.scheduled_span() else {
            return self.clone();
        };
        if person_days < 1 {
            return self.clone();
        }
        let end = calendar.end_date_for(start, person_days);
        let mut task = self.with_scheduled_end_raw(end);
        task.set_person_days(person_days);
        task
    }

    /// Set the scheduled end date and re-derive planned effort through the
    /// calendar. No-op on milestones.
    pub fn with_scheduled_end(&self, end: NaiveDate, calendar: &WorkCalendar) -> Task {
        let Some((start, _)) = self.scheduled_span() else {
            return self.clone();
        };
        let mut task = self.with_scheduled_end_raw(end);
        task.set_person_days(calendar.person_days_between(start, end));
        task
    }

    fn set_person_days(&mut self, value: i64) {
        match &mut self.state {
            TaskState::New { person_days, .. }
            | TaskState::Active { person_days, .. }
            | TaskState::Done { person_days, .. } => *person_days = value,
            TaskState::Milestone { .. } => {}
        }
    }
}
