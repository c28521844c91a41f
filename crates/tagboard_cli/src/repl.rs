//! Interactive loop with periodic flushing.
//!
//! Input lines arrive from a reader thread over a channel. Between lines the
//! loop sleeps until the next flush is due, so the schedule keeps firing
//! while the user is idle. A final flush runs when the loop ends.

use crate::cli::ReplLine;
use crate::commands::{App, Flow};
use clap::Parser;
use log::{debug, warn};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tagboard_core::{FlushSchedule, SlotRepository, DEFAULT_FLUSH_INTERVAL};

const PROMPT: &str = "> ";

pub fn run<R: SlotRepository>(
    app: &mut App<R>,
    input: impl BufRead + Send + 'static,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), String> {
    let lines = spawn_reader(input);
    let mut schedule = FlushSchedule::new(DEFAULT_FLUSH_INTERVAL, Instant::now());
    let timed = drive(app, &lines, &mut schedule, out, err)?;
    debug!("event=repl_exit module=cli status=ok timed_flushes={timed}");
    Ok(())
}

fn spawn_reader(input: impl BufRead + Send + 'static) -> Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in input.lines() {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Runs the loop until `quit` or end of input. Returns the number of timed flushes.
fn drive<R: SlotRepository>(
    app: &mut App<R>,
    lines: &Receiver<io::Result<String>>,
    schedule: &mut FlushSchedule,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<usize, String> {
    let mut timed_flushes = 0;
    prompt(out)?;

    loop {
        let wait = schedule.next_due().map_or(schedule.interval(), |due| {
            due.saturating_duration_since(Instant::now())
        });
        match lines.recv_timeout(wait) {
            Ok(line) => {
                let line = line.map_err(|e| format!("failed to read input: {e}"))?;
                if let Flow::Quit = handle_line(app, &line, out, err) {
                    break;
                }
                prompt(out)?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if schedule.poll(Instant::now()) {
            timed_flushes += 1;
            if let Err(message) = app.flush() {
                warn!("event=scheduled_flush module=cli status=error");
                let _ = writeln!(err, "error: {message}");
            }
        }
    }

    schedule.cancel();
    app.flush()?;
    Ok(timed_flushes)
}

fn prompt(out: &mut impl Write) -> Result<(), String> {
    write!(out, "{PROMPT}")
        .and_then(|()| out.flush())
        .map_err(|e| format!("output failed: {e}"))
}

fn handle_line<R: SlotRepository>(
    app: &mut App<R>,
    line: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Flow {
    let args = match split_line(line) {
        Ok(args) if args.is_empty() => return Flow::Continue,
        Ok(args) => args,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            return Flow::Continue;
        }
    };
    let command = match ReplLine::try_parse_from(args) {
        Ok(parsed) => parsed.command,
        Err(clap_err) => {
            let _ = write!(err, "{clap_err}");
            return Flow::Continue;
        }
    };
    match app.execute(&command, out) {
        Ok(flow) => flow,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            Flow::Continue
        }
    }
}

/// Splits on whitespace; double quotes group words into one argument.
fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            ch if ch.is_whitespace() && !quoted => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            ch => {
                current.push(ch);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::{drive, run, split_line};
    use crate::cli::Command;
    use crate::commands::App;
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};
    use tagboard_core::db::open_db_in_memory;
    use tagboard_core::{FlushSchedule, SlotName, SlotRepository, SqliteSlotRepository};

    #[test]
    fn split_line_groups_quoted_words() {
        assert_eq!(
            split_line("toggle raincoat \"waterproof nylon\" red\n").expect("line should split"),
            vec!["toggle", "raincoat", "waterproof nylon", "red"]
        );
        assert_eq!(split_line("add-item \"\"").expect("line should split"), vec!["add-item", ""]);
        assert!(split_line("   \n").expect("line should split").is_empty());
        assert!(split_line("add-item \"open").is_err());
    }

    #[test]
    fn loop_stops_at_quit_and_flushes() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let repo = SqliteSlotRepository::try_new(&conn).expect("slot tables should exist");
        let mut app = App::start(repo, &mut std::io::sink()).expect("app should start");
        let input = Cursor::new(
            "add-item umbrella\n\
             toggle umbrella \"waterproof nylon\"\n\
             add-tag colors RED\n\
             quit\n\
             add-item ignored\n",
        );
        let mut out = Vec::new();
        let mut err = Vec::new();

        run(&mut app, input, &mut out, &mut err).expect("repl should finish");

        let err = String::from_utf8(err).expect("output should be utf-8");
        assert!(err.contains("RED"));
        let stored = SqliteSlotRepository::try_new(&conn)
            .expect("slot tables should exist")
            .read_slot(SlotName::Items)
            .expect("slot read should succeed")
            .expect("slot should be written");
        assert!(stored.contains("umbrella"));
        assert!(stored.contains("waterproof nylon"));
        assert!(!stored.contains("ignored"));
    }

    #[test]
    fn bad_lines_do_not_end_the_loop() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let repo = SqliteSlotRepository::try_new(&conn).expect("slot tables should exist");
        let mut app = App::start(repo, &mut std::io::sink()).expect("app should start");
        let input = Cursor::new("frobnicate\nshow pear\nadd-item pear\n");
        let mut err = Vec::new();

        run(&mut app, input, &mut std::io::sink(), &mut err).expect("repl should finish");

        assert!(!err.is_empty());
        assert!(app.session().items().snapshot().contains_item("pear"));
    }

    #[test]
    fn schedule_flushes_while_input_is_idle() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let repo = SqliteSlotRepository::try_new(&conn).expect("slot tables should exist");
        let mut app = App::start(repo, &mut std::io::sink()).expect("session should load");
        app.execute(
            &Command::AddItem {
                name: "umbrella".to_string(),
            },
            &mut std::io::sink(),
        )
        .expect("new item should be accepted");

        let (sender, lines) = mpsc::channel();
        let quitter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(250));
            let _ = sender.send(Ok("quit".to_string()));
        });
        let mut schedule = FlushSchedule::new(Duration::from_millis(20), Instant::now());

        let timed = drive(
            &mut app,
            &lines,
            &mut schedule,
            &mut std::io::sink(),
            &mut std::io::sink(),
        )
        .expect("loop should end cleanly");
        quitter.join().expect("sender thread should finish");

        assert!(timed >= 1, "no flush fired while idle");
        assert!(schedule.is_cancelled());
        let stored = SqliteSlotRepository::try_new(&conn)
            .expect("slot tables should exist")
            .read_slot(SlotName::Items)
            .expect("slot read should succeed")
            .expect("slot should be written");
        assert!(stored.contains("umbrella"));
    }
}
