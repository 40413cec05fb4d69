use chrono::NaiveDate;
use gantt_tool::{
    Action, Schedule, ScheduleStore, Section, Task, TaskStatus, TimelineLayout, TimelineViewport,
    default_save_filename, load_schedule_from_csv, load_schedule_from_json, new_entity_id,
    save_schedule_to_csv, save_schedule_to_json,
    timeline::RowShape,
};
use std::io::{self, Write};
use std::str::FromStr;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the task table\n  sections                           Show sections with roll-up totals\n  holidays                           Show the holiday list\n  render                             Draw the timeline as text\n  edit <on|off>                      Toggle editing\n  task add <section_id> <name...>    Append a new task dated today\n  section add [name...]              Append a section (no name: blank)\n  rename <task_id> <name...>         Rename a task\n  assign <task_id> <name...>         Set a task's assignee\n  status <task_id> <new|active|done|milestone>\n                                     Apply a status transition\n  start <task_id> <YYYY-MM-DD>       Set scheduled start (end untouched)\n  end <task_id> <YYYY-MM-DD>         Set scheduled end, re-derive person-days\n  days <task_id> <n>                 Set person-days, re-derive end date\n  reorder <task_id> <index>          Move a task to a new row\n  remove task <task_id>              Remove a task\n  remove section <section_id>        Remove a section (tasks stay)\n  holiday add <YYYY-MM-DD>           Add a holiday\n  holiday remove <YYYY-MM-DD>        Remove a holiday\n  skipweekends <true|false>          Toggle weekend skipping\n  save <json|csv> [path]             Persist schedule to disk\n  load <json|csv> <path>             Load schedule from disk\n  quit|exit                          Exit"
    );
}

fn format_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn render_task_table(schedule: &Schedule) -> String {
    let headers = [
        "id", "section", "task", "status", "start", "end", "days", "actual start", "actual end",
        "assignee", "progress",
    ];
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(schedule.tasks.len());
    for task in &schedule.tasks {
        let section = schedule
            .section_name(&task.section_id)
            .unwrap_or("(unknown)")
            .to_string();
        let (start, end) = match task.scheduled_span() {
            Some((s, e)) => (Some(s), Some(e)),
            None => match &task.state {
                gantt_tool::TaskState::Milestone { scheduled_date, .. } => {
                    (Some(*scheduled_date), None)
                }
                _ => (None, None),
            },
        };
        let (actual_start, actual_end) = match &task.state {
            gantt_tool::TaskState::Active {
                actual_start_date, ..
            } => (Some(*actual_start_date), None),
            gantt_tool::TaskState::Done {
                actual_start_date,
                actual_end_date,
                ..
            } => (Some(*actual_start_date), Some(*actual_end_date)),
            gantt_tool::TaskState::Milestone { actual_date, .. } => (*actual_date, None),
            _ => (None, None),
        };
        rows.push(vec![
            task.task_id.clone(),
            section,
            task.task_name.clone(),
            task.status().to_string(),
            format_opt_date(start),
            format_opt_date(end),
            task.person_days().map(|d| d.to_string()).unwrap_or_default(),
            format_opt_date(actual_start),
            format_opt_date(actual_end),
            task.assignee.clone(),
            task.progress()
                .map(|p| format!("{p}%"))
                .unwrap_or_default(),
        ]);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push('|');
    for (i, header) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(header);
        out.push_str(&" ".repeat(widths[i] - header.len()));
        out.push_str(" |");
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push('|');
        for (i, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(widths[i] - cell.len()));
            out.push_str(" |");
        }
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn print_sections(schedule: &Schedule) {
    println!(
        "{:<32} {:>6} {:>6} {:>9}",
        "section", "tasks", "days", "progress"
    );
    for section in &schedule.sections {
        let rollup = schedule.section_rollup(&section.section_id);
        println!(
            "{:<32} {:>6} {:>6} {:>8.2}%",
            section.section_name,
            rollup.task_count,
            rollup.person_days,
            rollup.progress_percent
        );
    }
}

fn print_holidays(schedule: &Schedule) {
    println!("skip weekends: {}", schedule.skip_weekends);
    for holiday in &schedule.holidays {
        println!("{holiday}");
    }
}

/// Text rendering of the timeline layout: one column per day, one line per
/// task, with non-working days dotted and the progress point marked.
fn render_timeline(schedule: &Schedule, today: NaiveDate) -> String {
    let viewport = TimelineViewport::default();
    let layout = TimelineLayout::compute(schedule, &viewport, today);
    if layout.rows.is_empty() {
        return "(no tasks)".to_string();
    }
    let ppd = layout.scale.pixels_per_day;
    let cell = 3usize;
    let day_count = (layout.max_date - layout.min_date).num_days() as usize + 1;
    let label_width = layout
        .rows
        .iter()
        .map(|row| row.label.len())
        .max()
        .unwrap_or(0)
        .max(8);
    let col_of = |x: f64| -> usize { ((x / ppd).round().max(0.0) as usize).min(day_count - 1) };

    let mut out = String::new();

    // Month labels above the day row.
    let mut month_line = vec![b' '; day_count * cell];
    for band in &layout.months {
        let start = col_of(band.rect.x.max(0.0)) * cell;
        for (i, byte) in band.label.bytes().enumerate() {
            if start + i < month_line.len() {
                month_line[start + i] = byte;
            }
        }
    }
    out.push_str(&" ".repeat(label_width + 1));
    out.push_str(String::from_utf8_lossy(&month_line).trim_end());
    out.push('\n');

    out.push_str(&" ".repeat(label_width + 1));
    for band in &layout.days {
        out.push_str(&format!("{:>2} ", band.label));
    }
    out.push('\n');

    let shaded: Vec<usize> = layout.non_working.iter().map(|r| col_of(r.x)).collect();
    for (row, point) in layout.rows.iter().zip(&layout.progress_line) {
        let mut line: Vec<char> = Vec::with_capacity(day_count * cell);
        for day in 0..day_count {
            let fill = if shaded.contains(&day) { '.' } else { ' ' };
            line.extend([fill; 3]);
        }
        match &row.shape {
            RowShape::Bar(rect) => {
                let from = col_of(rect.x);
                let to = col_of(rect.x + rect.width);
                for day in from..=to {
                    for offset in 0..cell {
                        line[day * cell + offset] = '=';
                    }
                }
            }
            RowShape::Diamond { center, .. } => {
                line[col_of(center.x) * cell + 1] = '*';
            }
        }
        line[col_of(point.x) * cell] = '+';
        out.push_str(&format!("{:<label_width$} ", row.label));
        let rendered: String = line.into_iter().collect();
        out.push_str(rendered.trim_end());
        out.push('\n');
    }
    out
}

fn parse_cli_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn main() {
    env_logger::init();

    let today = chrono::Local::now().date_naive();
    let mut store = ScheduleStore::new(Schedule::sample(today));

    println!("Gantt Tool (CLI) - type 'help' for commands\n");
    println!("{}", render_task_table(store.schedule()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        // Read-only commands first; everything after the gate mutates.
        match cmd {
            "help" => {
                print_help();
                continue;
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_task_table(store.schedule()));
                continue;
            }
            "sections" => {
                print_sections(store.schedule());
                continue;
            }
            "holidays" => {
                print_holidays(store.schedule());
                continue;
            }
            "render" => {
                println!("{}", render_timeline(store.schedule(), today));
                continue;
            }
            "edit" => {
                match parts.next() {
                    Some("on") => {
                        store.dispatch(Action::SetEditable(true));
                        println!("Editing enabled.");
                    }
                    Some("off") => {
                        store.dispatch(Action::SetEditable(false));
                        println!("Editing disabled.");
                    }
                    _ => println!("Usage: edit <on|off>"),
                }
                continue;
            }
            "load" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some(format @ ("json" | "csv")), Some(path)) => {
                        let result = if format == "json" {
                            load_schedule_from_json(path)
                        } else {
                            load_schedule_from_csv(path)
                        };
                        match result {
                            Ok(schedule) => {
                                store.dispatch(Action::SetSchedule(schedule));
                                println!("Schedule loaded from {path}.");
                                println!("{}", render_task_table(store.schedule()));
                            }
                            Err(e) => println!("Load error: {e}"),
                        }
                    }
                    _ => println!("Usage: load <json|csv> <path>"),
                }
                continue;
            }
            "save" => {
                let format = parts.next();
                let path = parts.next().map(str::to_string);
                match format {
                    Some(format @ ("json" | "csv")) => {
                        let path = path.unwrap_or_else(|| default_save_filename(today));
                        let result = if format == "json" {
                            save_schedule_to_json(store.schedule(), &path)
                        } else {
                            save_schedule_to_csv(store.schedule(), &path)
                        };
                        match result {
                            Ok(()) => println!("Schedule saved to {path}."),
                            Err(e) => println!("Save error: {e}"),
                        }
                    }
                    _ => println!("Usage: save <json|csv> [path]"),
                }
                continue;
            }
            _ => {}
        }

        const MUTATING_COMMANDS: &[&str] = &[
            "task", "section", "rename", "assign", "status", "start", "end", "days", "reorder",
            "remove", "holiday", "skipweekends",
        ];
        if MUTATING_COMMANDS.contains(&cmd) && !store.editable() {
            println!("Editing is disabled. Run 'edit on' first.");
            continue;
        }

        match cmd {
            "task" => match parts.next() {
                Some("add") => {
                    let section_id = parts.next();
                    let name = parts.collect::<Vec<_>>().join(" ");
                    match section_id {
                        Some(section_id) if !name.is_empty() => {
                            let task = Task::new_task(
                                new_entity_id(),
                                section_id,
                                name,
                                today,
                                today,
                                0,
                            );
                            let id = task.task_id.clone();
                            store.dispatch(Action::AddTask(task));
                            println!("Added task {id}.");
                        }
                        _ => println!("Usage: task add <section_id> <name...>"),
                    }
                }
                _ => println!("Usage: task add <section_id> <name...>"),
            },
            "section" => match parts.next() {
                Some("add") => {
                    let name = parts.collect::<Vec<_>>().join(" ");
                    let section = if name.is_empty() {
                        Section::generate()
                    } else {
                        Section::new(new_entity_id(), name)
                    };
                    let id = section.section_id.clone();
                    store.dispatch(Action::AddSection(section));
                    println!("Added section {id}.");
                }
                _ => println!("Usage: section add <name...>"),
            },
            "rename" | "assign" => {
                let task_id = parts.next();
                let text = parts.collect::<Vec<_>>().join(" ");
                match task_id {
                    Some(task_id) => match store.schedule().task(task_id).cloned() {
                        Some(mut updated) => {
                            if cmd == "rename" {
                                updated.task_name = text;
                            } else {
                                updated.assignee = text;
                            }
                            store.dispatch(Action::UpdateTask(updated));
                            println!("{}", render_task_table(store.schedule()));
                        }
                        None => println!("Task {task_id} not found."),
                    },
                    None => println!("Usage: {cmd} <task_id> <text...>"),
                }
            }
            "status" => {
                let task_id = parts.next();
                let target = parts.next().and_then(|s| TaskStatus::from_str(s).ok());
                match (task_id, target) {
                    (Some(task_id), Some(target)) => match store.schedule().task(task_id).cloned()
                    {
                        Some(task) => {
                            let updated = task.transition_to(target);
                            store.dispatch(Action::UpdateTask(updated));
                            println!("{}", render_task_table(store.schedule()));
                        }
                        None => println!("Task {task_id} not found."),
                    },
                    _ => println!("Usage: status <task_id> <new|active|done|milestone>"),
                }
            }
            "start" | "end" => {
                let task_id = parts.next();
                let date = parts.next().and_then(parse_cli_date);
                match (task_id, date) {
                    (Some(task_id), Some(date)) => match store.schedule().task(task_id).cloned() {
                        Some(task) => {
                            let updated = if cmd == "start" {
                                task.with_scheduled_start(date)
                            } else {
                                task.with_scheduled_end(date, &store.schedule().calendar())
                            };
                            store.dispatch(Action::UpdateTask(updated));
                            println!("{}", render_task_table(store.schedule()));
                        }
                        None => println!("Task {task_id} not found."),
                    },
                    _ => println!("Usage: {cmd} <task_id> <YYYY-MM-DD>"),
                }
            }
            "days" => {
                let task_id = parts.next();
                let days = parts.next().and_then(|s| s.parse::<i64>().ok());
                match (task_id, days) {
                    (Some(task_id), Some(days)) if days >= 1 => {
                        match store.schedule().task(task_id).cloned() {
                            Some(task) => {
                                let updated =
                                    task.with_person_days(days, &store.schedule().calendar());
                                store.dispatch(Action::UpdateTask(updated));
                                println!("{}", render_task_table(store.schedule()));
                            }
                            None => println!("Task {task_id} not found."),
                        }
                    }
                    _ => println!("Usage: days <task_id> <n>"),
                }
            }
            "reorder" => {
                let task_id = parts.next();
                let index = parts.next().and_then(|s| s.parse::<i64>().ok());
                match (task_id, index) {
                    (Some(task_id), Some(new_index)) => {
                        store.dispatch(Action::ReorderTask {
                            task_id: task_id.to_string(),
                            new_index,
                        });
                        println!("{}", render_task_table(store.schedule()));
                    }
                    _ => println!("Usage: reorder <task_id> <index>"),
                }
            }
            "remove" => {
                let kind = parts.next();
                let id = parts.next();
                match (kind, id) {
                    (Some("task"), Some(id)) => {
                        store.dispatch(Action::RemoveTask(id.to_string()));
                        println!("Removed task {id}.");
                    }
                    (Some("section"), Some(id)) => {
                        store.dispatch(Action::RemoveSection(id.to_string()));
                        println!("Removed section {id}.");
                    }
                    _ => println!("Usage: remove <task|section> <id>"),
                }
            }
            "holiday" => {
                let op = parts.next();
                let date = parts.next().and_then(parse_cli_date);
                match (op, date) {
                    (Some("add"), Some(date)) => {
                        store.dispatch(Action::AddHoliday(date));
                        println!("Added holiday {date}.");
                    }
                    (Some("remove"), Some(date)) => {
                        store.dispatch(Action::RemoveHoliday(date));
                        println!("Removed holiday {date}.");
                    }
                    _ => println!("Usage: holiday <add|remove> <YYYY-MM-DD>"),
                }
            }
            "skipweekends" => match parts.next().and_then(|s| s.parse::<bool>().ok()) {
                Some(skip) => {
                    store.dispatch(Action::SetSkipWeekends(skip));
                    println!("skip weekends: {skip}");
                }
                None => println!("Usage: skipweekends <true|false>"),
            },
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }
}
