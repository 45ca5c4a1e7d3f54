use std::path::Path;

use crate::agenda::Agenda;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::clock::{Clock, SystemClock};
use crate::io::config_io;
use crate::io::recovery;
use crate::ops::{event_ops, inbox_ops, task_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    dispatch_with_clock(cli, &SystemClock)
}

/// Run a parsed command against the data directory it names, reading "now" from `clock`.
pub fn dispatch_with_clock(cli: Cli, clock: &dyn Clock) -> CmdResult {
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref().map(Path::new));
    log::debug!("data directory: {}", data_dir.display());
    let json = cli.json;

    if let Commands::Init(args) = &cli.command {
        let path = config_io::write_default_config(&data_dir, args.force)?;
        println!("Initialized {}", path.display());
        return Ok(());
    }

    let agenda = Agenda::open(&data_dir)?;
    match cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Calendar(cmd) => cmd_calendar(&agenda, cmd, clock, json),
        Commands::Tasks(cmd) => cmd_tasks(&agenda, cmd, json),
        Commands::Inbox(cmd) => cmd_inbox(&agenda, cmd, clock, json),
        Commands::Recovery(cmd) => cmd_recovery(&agenda, cmd, json),
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn cmd_calendar(agenda: &Agenda, cmd: CalendarCmd, clock: &dyn Clock, json: bool) -> CmdResult {
    let store = &agenda.events;
    match cmd {
        CalendarCmd::Add(args) => {
            let event =
                event_ops::add_event(store, &args.title, &args.date, &args.time, &args.description)?;
            println!("{}", format_scheduled(&event));
        }
        CalendarCmd::Say(args) => {
            let sentence = args.words.join(" ");
            let event = event_ops::schedule_from_text(
                store,
                &sentence,
                clock.now(),
                &agenda.schedule_defaults(),
            )?;
            println!("{}", format_scheduled(&event));
        }
        CalendarCmd::List => {
            let events = event_ops::list_events(store)?;
            if json {
                return print_json(&events);
            }
            print_lines(&format_event_listing(&events));
        }
        CalendarCmd::Next(args) => {
            let minutes = args
                .minutes
                .unwrap_or(agenda.config.calendar.reminder_minutes);
            let events = event_ops::list_events_next(store, clock.now(), minutes)?;
            if json {
                return print_json(&events);
            }
            if events.is_empty() {
                println!("No meetings in the next {} minutes.", minutes);
            } else {
                print_lines(&events.iter().map(format_event_line).collect::<Vec<_>>());
            }
        }
        CalendarCmd::Week => {
            let events = event_ops::list_events_week(store, clock.now())?;
            if json {
                return print_json(&events);
            }
            print_lines(&format_event_listing(&events));
        }
        CalendarCmd::Summary => {
            print!("{}", with_newline(event_ops::weekly_summary(store, clock.now())?));
        }
        CalendarCmd::Delete(args) => match event_ops::delete_event(store, args.id)? {
            Some(event) => println!("Meeting {} deleted: {}", event.id, event.title),
            None => println!("No meeting with ID {}.", args.id),
        },
        CalendarCmd::Clear => {
            let n = event_ops::clear_events(store)?;
            println!("All meetings cleared ({} removed).", n);
        }
    }
    Ok(())
}

fn with_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_tasks(agenda: &Agenda, cmd: TasksCmd, json: bool) -> CmdResult {
    let store = &agenda.tasks;
    match cmd {
        TasksCmd::Add(args) => {
            let task = task_ops::add_task(store, &args.text)?;
            println!("Added: {}", task.text);
        }
        TasksCmd::List(args) => {
            let tasks = task_ops::list_tasks(store, args.all)?;
            if json {
                return print_json(&tasks_to_json(&tasks));
            }
            let store_empty = if tasks.is_empty() && !args.all {
                task_ops::list_tasks(store, true)?.is_empty()
            } else {
                tasks.is_empty()
            };
            print_lines(&format_task_listing(&tasks, store_empty));
        }
        TasksCmd::Done(args) => {
            let task = task_ops::complete_task(store, args.number)?;
            println!("Marked complete: {}", task.text);
        }
        TasksCmd::Delete(args) => {
            let task = task_ops::delete_task(store, args.number)?;
            println!("Deleted: {}", task.text);
        }
        TasksCmd::Clear => {
            let n = task_ops::clear_tasks(store)?;
            println!("All tasks cleared ({} removed).", n);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

fn cmd_inbox(agenda: &Agenda, cmd: InboxCmd, clock: &dyn Clock, json: bool) -> CmdResult {
    let store = &agenda.inbox;
    match cmd {
        InboxCmd::Send(args) => {
            let email = inbox_ops::send_email(
                store,
                &args.to,
                &args.subject,
                &args.body,
                clock.now(),
                None,
            )?;
            println!("Email sent to {}.", email.to);
        }
        InboxCmd::Read(args) => {
            let limit = args.limit.unwrap_or(agenda.config.inbox.read_limit);
            let emails = inbox_ops::read_inbox(store, limit)?;
            if json {
                return print_json(&emails);
            }
            print_lines(&format_inbox(&emails));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(agenda: &Agenda, cmd: RecoveryCmd, json: bool) -> CmdResult {
    let dir = &agenda.data_dir;
    match cmd.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(dir).display());
        }
        Some(RecoveryAction::Prune(args)) => {
            let removed = recovery::prune_recovery(dir, None, args.all)?;
            println!("Pruned {} recovery entries.", removed);
        }
        None => {
            let entries = recovery::read_recovery_entries(dir, Some(cmd.limit.unwrap_or(10)), None);
            if json {
                let values: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
                return print_json(&values);
            }
            if entries.is_empty() {
                println!("Recovery log is empty.");
            }
            for entry in &entries {
                print!("{}", entry.to_display_markdown());
            }
        }
    }
    Ok(())
}
