use chrono::NaiveDate;
use gantt_tool::{Task, TaskState, TaskStatus};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_task() -> Task {
    Task::new_task("t1", "s1", "Design", d(2025, 1, 1), d(2025, 1, 31), 23)
}

fn milestone() -> Task {
    Task::milestone("m1", "s1", "Review", d(2025, 3, 3))
}

#[test]
fn new_to_active_sets_actual_start_from_schedule() {
    let task = new_task().transition_to(TaskStatus::Active);
    assert_eq!(
        task.state,
        TaskState::Active {
            scheduled_start_date: d(2025, 1, 1),
            scheduled_end_date: d(2025, 1, 31),
            person_days: 23,
            actual_start_date: d(2025, 1, 1),
            progress: 0,
        }
    );
}

#[test]
fn new_to_done_fills_actual_dates_and_progress() {
    let task = new_task().transition_to(TaskStatus::Done);
    assert_eq!(
        task.state,
        TaskState::Done {
            scheduled_start_date: d(2025, 1, 1),
            scheduled_end_date: d(2025, 1, 31),
            person_days: 23,
            actual_start_date: d(2025, 1, 1),
            actual_end_date: d(2025, 1, 31),
        }
    );
    assert_eq!(task.progress(), Some(100));
}

#[test]
fn active_to_done_keeps_actual_start() {
    let mut task = new_task();
    task.state = TaskState::Active {
        scheduled_start_date: d(2025, 1, 1),
        scheduled_end_date: d(2025, 1, 31),
        person_days: 23,
        actual_start_date: d(2025, 1, 3),
        progress: 60,
    };
    let done = task.transition_to(TaskStatus::Done);
    assert_eq!(
        done.state,
        TaskState::Done {
            scheduled_start_date: d(2025, 1, 1),
            scheduled_end_date: d(2025, 1, 31),
            person_days: 23,
            actual_start_date: d(2025, 1, 3),
            actual_end_date: d(2025, 1, 31),
        }
    );
}

#[test]
fn done_to_active_rewinds_to_scheduled_start_at_full_progress() {
    let task = new_task()
        .transition_to(TaskStatus::Done)
        .transition_to(TaskStatus::Active);
    assert_eq!(
        task.state,
        TaskState::Active {
            scheduled_start_date: d(2025, 1, 1),
            scheduled_end_date: d(2025, 1, 31),
            person_days: 23,
            actual_start_date: d(2025, 1, 1),
            progress: 100,
        }
    );
}

#[test]
fn milestone_to_active_becomes_single_day_placeholder() {
    let task = milestone().transition_to(TaskStatus::Active);
    assert_eq!(
        task.state,
        TaskState::Active {
            scheduled_start_date: d(2025, 3, 3),
            scheduled_end_date: d(2025, 3, 3),
            person_days: 1,
            actual_start_date: d(2025, 3, 3),
            progress: 0,
        }
    );
}

#[test]
fn milestone_with_actual_date_activates_from_it() {
    let mut task = milestone();
    task.state = TaskState::Milestone {
        scheduled_date: d(2025, 3, 3),
        actual_date: Some(d(2025, 3, 5)),
    };
    let active = task.transition_to(TaskStatus::Active);
    let TaskState::Active {
        actual_start_date, ..
    } = active.state
    else {
        panic!("expected active state");
    };
    assert_eq!(actual_start_date, d(2025, 3, 5));
}

#[test]
fn milestone_to_done_fills_both_actual_dates() {
    let task = milestone().transition_to(TaskStatus::Done);
    assert_eq!(
        task.state,
        TaskState::Done {
            scheduled_start_date: d(2025, 3, 3),
            scheduled_end_date: d(2025, 3, 3),
            person_days: 1,
            actual_start_date: d(2025, 3, 3),
            actual_end_date: d(2025, 3, 3),
        }
    );
}

#[test]
fn milestone_to_new_keeps_single_day_schedule() {
    let task = milestone().transition_to(TaskStatus::New);
    assert_eq!(
        task.state,
        TaskState::New {
            scheduled_start_date: d(2025, 3, 3),
            scheduled_end_date: d(2025, 3, 3),
            person_days: 1,
        }
    );
}

#[test]
fn dated_task_to_milestone_anchors_at_scheduled_start() {
    let task = new_task().transition_to(TaskStatus::Milestone);
    assert_eq!(
        task.state,
        TaskState::Milestone {
            scheduled_date: d(2025, 1, 1),
            actual_date: None,
        }
    );
}

#[test]
fn done_task_to_milestone_carries_actual_end() {
    let task = new_task()
        .transition_to(TaskStatus::Done)
        .transition_to(TaskStatus::Milestone);
    assert_eq!(
        task.state,
        TaskState::Milestone {
            scheduled_date: d(2025, 1, 1),
            actual_date: Some(d(2025, 1, 31)),
        }
    );
}

#[test]
fn identity_transitions_are_no_ops() {
    let cases = [
        (new_task(), TaskStatus::New),
        (new_task().transition_to(TaskStatus::Active), TaskStatus::Active),
        (new_task().transition_to(TaskStatus::Done), TaskStatus::Done),
        (milestone(), TaskStatus::Milestone),
    ];
    for (task, status) in cases {
        assert_eq!(task.transition_to(status), task);
    }
}

#[test]
fn full_cycle_restores_progress_and_schedule() {
    let original = new_task();
    let cycled = original
        .transition_to(TaskStatus::Active)
        .transition_to(TaskStatus::Done)
        .transition_to(TaskStatus::New);
    assert_eq!(cycled.progress(), Some(0));
    assert_eq!(cycled.scheduled_span(), original.scheduled_span());
    assert_eq!(cycled.person_days(), original.person_days());
}

#[test]
fn identity_fields_survive_transitions() {
    let mut task = new_task();
    task.assignee = "Crew A".to_string();
    let done = task.transition_to(TaskStatus::Done);
    assert_eq!(done.task_id, task.task_id);
    assert_eq!(done.section_id, task.section_id);
    assert_eq!(done.task_name, task.task_name);
    assert_eq!(done.assignee, task.assignee);
}
