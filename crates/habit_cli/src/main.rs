use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use habit_cli::cli::{
    BoardCommand, Cli, Command, HabitCommand, TaskCommand, collect_config_overrides,
};
use habit_cli::output;
use habit_core::api;
use habit_core::calendar;
use habit_core::config::{self, Config, Palette};
use habit_core::error::AppError;
use habit_core::operation::Operation;
use serde::Serialize;
use std::io::{self, BufRead, Read};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "HABIT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing(config: &Config) {
    let directive = std::env::var(LOG_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second init only happens in tests; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn load_base_config() -> Config {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: config ignored: {}", err);
    }
    loaded.config
}

fn effective_config(base: &Config, raw_overrides: &[String]) -> Result<Config, AppError> {
    let overrides = collect_config_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    Ok(config::merge_overrides(base, &overrides))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::invalid_input(format!("{field} is required"))),
    }
}

/// Where `apply -` takes its operation from.
enum OperationInput<'a> {
    /// One-shot runs read stdin to the end.
    ToEnd(&'a mut dyn Read),
    /// Interactive sessions already hold stdin; the next line is the operation.
    NextLine(&'a mut dyn BufRead),
}

impl OperationInput<'_> {
    fn read(&mut self) -> Result<String, AppError> {
        let mut buffer = String::new();
        match self {
            Self::ToEnd(reader) => reader.read_to_string(&mut buffer),
            Self::NextLine(reader) => reader.read_line(&mut buffer),
        }
        .map_err(|err| AppError::io(err.to_string()))?;
        Ok(buffer)
    }
}

fn read_operation(raw: &str, input: &mut OperationInput<'_>) -> Result<Operation, AppError> {
    let payload = if raw.trim() == "-" {
        input.read()?
    } else {
        raw.to_string()
    };

    if payload.trim().is_empty() {
        return Err(AppError::invalid_input("operation is required"));
    }

    serde_json::from_str(&payload)
        .map_err(|err| AppError::invalid_input(format!("invalid operation: {err}")))
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            match ch {
                'n' => current.push('\n'),
                '"' | '\\' => current.push(ch),
                other => {
                    current.push('\\');
                    current.push(other);
                }
            }
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_habit(command: HabitCommand, json: bool) -> Result<(), AppError> {
    match command {
        HabitCommand::Add { name, icon, color } => {
            let name = required_text(name, "name")?;
            let habit = api::add_habit(&name, icon.as_deref(), color.as_deref())?;
            if json {
                print_json(&habit)?;
            } else {
                println!("Added habit: {} ({})", habit.name, habit.id);
            }
        }
        HabitCommand::Done { id, date } => {
            let toggle = api::toggle_habit(&id, date.as_deref())?;
            if json {
                print_json(&serde_json::json!({
                    "habit": toggle.habit,
                    "date": toggle.date,
                    "completed": toggle.completed,
                }))?;
            } else if toggle.completed {
                println!("Checked in: {} on {}", toggle.habit.name, toggle.date);
            } else {
                println!("Unchecked: {} on {}", toggle.habit.name, toggle.date);
            }
        }
        HabitCommand::Delete { id } => {
            let habit = api::delete_habit(&id)?;
            if json {
                print_json(&habit)?;
            } else {
                println!("Deleted habit: {} ({})", habit.name, habit.id);
            }
        }
        HabitCommand::List => {
            let habits = api::list_habits()?;
            if json {
                print_json(&habits)?;
            } else {
                let today = calendar::format_date(calendar::today())?;
                println!("{}", output::habits_table(&habits, &today));
            }
        }
    }
    Ok(())
}

fn run_task(command: TaskCommand, json: bool) -> Result<(), AppError> {
    match command {
        TaskCommand::Add {
            title,
            due,
            category,
        } => {
            let title = required_text(title, "title")?;
            let task = api::add_task(&title, due.as_deref(), category)?;
            if json {
                print_json(&task)?;
            } else {
                println!(
                    "Added task: {} ({}) due {}",
                    task.title, task.id, task.due_date
                );
            }
        }
        TaskCommand::Toggle { id } => {
            let task = api::toggle_task(&id)?;
            if json {
                print_json(&task)?;
            } else if task.completed {
                println!("Completed task: {} ({})", task.title, task.id);
            } else {
                println!("Reopened task: {} ({})", task.title, task.id);
            }
        }
        TaskCommand::Delete { id } => {
            let task = api::delete_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        TaskCommand::Reschedule { id, date } => {
            let task = api::reschedule_task(&id, &date)?;
            if json {
                print_json(&task)?;
            } else {
                println!(
                    "Rescheduled task: {} ({}) to {}",
                    task.title, task.id, task.due_date
                );
            }
        }
        TaskCommand::List { date } => {
            let tasks = api::tasks_due_on(date.as_deref())?;
            if json {
                print_json(&tasks)?;
            } else {
                println!("{}", output::tasks_table(&tasks));
            }
        }
    }
    Ok(())
}

fn run_board(command: BoardCommand, json: bool, palette: &Palette) -> Result<(), AppError> {
    match command {
        BoardCommand::Add { titles, status } => {
            let created = api::add_workflow_tasks(&titles.join("\n"), status)?;
            if json {
                print_json(&created)?;
            } else {
                for task in &created {
                    println!("Added: {}", output::workflow_line(task));
                }
            }
        }
        BoardCommand::Move { id, status } => {
            let task = api::move_workflow_task(&id, status)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Moved: {}", output::workflow_line(&task));
            }
        }
        BoardCommand::Delete { id } => {
            let task = api::delete_workflow_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Deleted: {}", output::workflow_line(&task));
            }
        }
        BoardCommand::Show => {
            let board = api::board()?;
            if json {
                print_json(&board)?;
            } else {
                println!("{}", output::board_view(&board, palette));
            }
        }
    }
    Ok(())
}

fn run_command(
    cli: Cli,
    base: &Config,
    input: &mut OperationInput<'_>,
) -> Result<(), AppError> {
    let config = effective_config(base, &cli.config_override)?;
    let palette = config::palette_for_theme(config.theme.as_deref());
    let json = cli.json;
    tracing::debug!(
        theme = ?config.theme,
        consistency_target = config.consistency_target(),
        json,
        "running command"
    );

    match cli.command {
        Command::Habit { command } => run_habit(command, json)?,
        Command::Task { command } => run_task(command, json)?,
        Command::Board { command } => run_board(command, json, &palette)?,
        Command::Today { date } => {
            let progress = api::daily_progress(date.as_deref())?;
            if json {
                print_json(&progress)?;
            } else {
                println!("{}", output::today_view(&progress, &palette));
            }
        }
        Command::Stats => {
            let stats = api::user_stats(config.consistency_target())?;
            if json {
                print_json(&stats)?;
            } else {
                println!("{}", output::stats_view(&stats, &palette));
            }
        }
        Command::Analysis => {
            let distribution = api::weekly_distribution()?;
            let streaks = api::habit_streaks()?;
            if json {
                print_json(&serde_json::json!({
                    "distribution": distribution,
                    "streaks": streaks,
                }))?;
            } else {
                println!(
                    "{}",
                    output::analysis_view(&distribution, &streaks, &palette)
                );
            }
        }
        Command::Show => print_json(&api::load_document()?)?,
        Command::Apply { operation } => {
            let operation = read_operation(&operation, input)?;
            print_json(&api::apply_operation(operation)?)?;
        }
    }

    Ok(())
}

fn run_interactive(base: &Config) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("habit".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        let mut operation_input = OperationInput::NextLine(&mut stdin_lock);
        if let Err(err) = run_command(cli, base, &mut operation_input) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let base = load_base_config();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        init_tracing(&base);
        if let Err(err) = run_interactive(&base) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    match effective_config(&base, &cli.config_override) {
        Ok(config) => init_tracing(&config),
        Err(_) => init_tracing(&base),
    }

    let mut stdin = io::stdin().lock();
    if let Err(err) = run_command(cli, &base, &mut OperationInput::ToEnd(&mut stdin)) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
