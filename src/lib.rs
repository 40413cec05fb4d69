pub mod calendar;
pub mod interaction;
pub mod persistence;
pub mod schedule;
pub mod store;
pub mod task;
pub(crate) mod task_validation;
pub mod timeline;

pub use calendar::WorkCalendar;
pub use interaction::{commit_drag, resolve_end_drag, resolve_start_drag};
pub use persistence::{
    PersistenceError, default_save_filename, load_schedule_from_csv, load_schedule_from_json,
    save_schedule_to_csv, save_schedule_to_json, validate_schedule,
};
pub use schedule::{SCHEDULE_VERSION, Schedule, Section, SectionRollup, new_entity_id};
pub use store::{Action, ScheduleStore, reduce};
pub use task::{Task, TaskState, TaskStatus};
pub use timeline::{TimelineLayout, TimelineViewport};
