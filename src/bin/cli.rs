use chrono::{DateTime, Weekday};
use chrono_tz::Tz;
use std::io::{self, Write};
use timetable::{
    ClockTime, Interval, PersistenceResult, SqliteTimetableStore, Timetable, TimetableStore,
    WeekdaySet, load_timetable_from_csv, load_timetable_from_json, save_timetable_to_csv,
    save_timetable_to_json,
};
use tracing_subscriber::EnvFilter;

fn parse_days(s: &str) -> Result<WeekdaySet, String> {
    s.split(',')
        .map(|day| {
            day.trim()
                .parse::<Weekday>()
                .map_err(|_| format!("Invalid weekday '{}'", day.trim()))
        })
        .collect()
}

fn parse_instant(s: &str, zone: Tz) -> Result<DateTime<Tz>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&zone))
        .map_err(|_| format!("Invalid instant '{s}' (RFC 3339 expected)"))
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current timetable\n  add <label> <HH:MM> <HH:MM> [days] Append a clock interval (days like mon,tue)\n  range <label> <from> <to> [days]   Append a date interval (RFC 3339 bounds)\n  check <instant> [zone]             Check whether an RFC 3339 instant is contained\n  clear                              Remove every interval\n  save <json|csv|sqlite> <path>      Persist timetable to disk\n  load <json|csv|sqlite> <path>      Load timetable from disk\n  quit|exit                          Exit"
    );
}

fn save(timetable: &Timetable, format: &str, path: &str) -> PersistenceResult<()> {
    match format {
        "json" => save_timetable_to_json(timetable, path),
        "csv" => save_timetable_to_csv(timetable, path),
        _ => SqliteTimetableStore::new(path)?.save_timetable(timetable),
    }
}

fn load(format: &str, path: &str) -> PersistenceResult<Timetable> {
    match format {
        "json" => load_timetable_from_json(path),
        "csv" => load_timetable_from_csv(path),
        _ => Ok(SqliteTimetableStore::new(path)?
            .load_timetable()?
            .unwrap_or_default()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut timetable = Timetable::new();

    println!("Timetable (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{timetable}"),
            "clear" => {
                timetable = Timetable::new();
                println!("Timetable cleared.");
            }
            "add" => {
                let (Some(label), Some(start_s), Some(end_s)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: add <label> <HH:MM> <HH:MM> [days]");
                    continue;
                };
                let start = match start_s.parse::<ClockTime>() {
                    Ok(c) => c,
                    Err(e) => {
                        println!("Invalid start clock: {e}");
                        continue;
                    }
                };
                let end = match end_s.parse::<ClockTime>() {
                    Ok(c) => c,
                    Err(e) => {
                        println!("Invalid end clock: {e}");
                        continue;
                    }
                };
                let mut builder = Interval::builder().label(label).clock(start, end);
                if let Some(days_s) = parts.next() {
                    match parse_days(days_s) {
                        Ok(days) => builder = builder.weekday_set(days),
                        Err(e) => {
                            println!("{e}");
                            continue;
                        }
                    }
                }
                timetable.push(builder.build());
                println!("Interval added.\n{timetable}");
            }
            "range" => {
                let (Some(label), Some(from_s), Some(to_s)) =
                    (parts.next(), parts.next(), parts.next())
                else {
                    println!("Usage: range <label> <from> <to> [days]");
                    continue;
                };
                let (from, to) = match (parse_instant(from_s, Tz::UTC), parse_instant(to_s, Tz::UTC)) {
                    (Ok(from), Ok(to)) => (from, to),
                    (Err(e), _) | (_, Err(e)) => {
                        println!("{e}");
                        continue;
                    }
                };
                let mut builder = Interval::builder()
                    .label(label)
                    .start_date(from)
                    .end_date(to);
                if let Some(days_s) = parts.next() {
                    match parse_days(days_s) {
                        Ok(days) => builder = builder.weekday_set(days),
                        Err(e) => {
                            println!("{e}");
                            continue;
                        }
                    }
                }
                timetable.push(builder.build());
                println!("Interval added.\n{timetable}");
            }
            "check" => {
                let Some(at_s) = parts.next() else {
                    println!("Usage: check <instant> [zone]");
                    continue;
                };
                let zone = match parts.next().map(str::parse::<Tz>) {
                    None => Tz::UTC,
                    Some(Ok(zone)) => zone,
                    Some(Err(_)) => {
                        println!("Unknown timezone");
                        continue;
                    }
                };
                let at = match parse_instant(at_s, zone) {
                    Ok(at) => at,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match timetable.matching_interval(&at) {
                    Some((idx, interval)) => match interval.label() {
                        Some(label) => println!("{} is contained by #{idx} ({label}).", at.to_rfc3339()),
                        None => println!("{} is contained by #{idx}.", at.to_rfc3339()),
                    },
                    None => println!("{} is not contained.", at.to_rfc3339()),
                }
            }
            "save" | "load" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: {cmd} <json|csv|sqlite> <path>");
                    continue;
                };
                if !matches!(format, "json" | "csv" | "sqlite") {
                    println!("Unknown format '{format}' (expected json, csv or sqlite)");
                    continue;
                }
                if cmd == "save" {
                    match save(&timetable, format, path) {
                        Ok(()) => println!("Timetable saved to {path}."),
                        Err(e) => println!("Save error: {e}"),
                    }
                } else {
                    match load(format, path) {
                        Ok(loaded) => {
                            timetable = loaded;
                            println!("Timetable loaded from {path}.\n{timetable}");
                        }
                        Err(e) => println!("Load error: {e}"),
                    }
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
