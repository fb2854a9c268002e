use clap::{Parser, Subcommand};
use habit_core::config::ConfigOverrides;
use habit_core::model::{TaskCategory, WorkflowStatus};

#[derive(Parser, Debug)]
#[command(name = "habit", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add, complete and remove habits
    Habit {
        #[command(subcommand)]
        command: HabitCommand,
    },
    /// Add, complete and schedule dated tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Manage the workflow board
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
    /// Show habit progress and tasks due for a day
    ///
    /// Example: habit today
    /// Example: habit today --date 2025-12-24
    Today {
        #[arg(long)]
        date: Option<String>,
    },
    /// Show level, XP and consistency
    ///
    /// Example: habit stats
    Stats,
    /// Show the weekly distribution and habit streaks
    ///
    /// Example: habit analysis
    Analysis,
    /// Print the stored document
    ///
    /// Example: habit show
    Show,
    /// Apply one raw operation and print the updated document
    ///
    /// Example: habit apply '{"type":"toggleTask","id":"abc123xyz"}'
    /// Example: habit apply - < operation.json
    Apply {
        operation: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HabitCommand {
    /// Add a new habit
    ///
    /// Example: habit habit add "Read 10 pages" --icon book
    Add {
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Toggle a habit's completion for a day (default today)
    ///
    /// Example: habit habit done k3j9x0abc
    /// Example: habit habit done k3j9x0abc --date 2025-12-19
    Done {
        id: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a habit
    ///
    /// Example: habit habit delete k3j9x0abc
    Delete {
        id: String,
    },
    /// List habits
    ///
    /// Example: habit habit list
    List,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task (due today unless --due is given)
    ///
    /// Example: habit task add "Call the bank" --due 2025-12-24 --category task
    Add {
        title: Option<String>,
        #[arg(long = "due", value_name = "YYYY-MM-DD")]
        due: Option<String>,
        #[arg(long, default_value = "routine")]
        category: TaskCategory,
    },
    /// Flip a task between open and completed
    ///
    /// Example: habit task toggle p0q1r2s3t
    Toggle {
        id: String,
    },
    /// Delete a task
    ///
    /// Example: habit task delete p0q1r2s3t
    Delete {
        id: String,
    },
    /// Move a task to another day
    ///
    /// Example: habit task reschedule p0q1r2s3t 2025-12-27
    Reschedule {
        id: String,
        date: String,
    },
    /// List tasks due on a day (default today)
    ///
    /// Example: habit task list --date 2025-12-24
    List {
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Add one or more workflow tasks; each line or argument is a title
    ///
    /// Example: habit board add "Outline" "Draft" --status in-progress
    Add {
        titles: Vec<String>,
        #[arg(long, default_value = "not-started")]
        status: WorkflowStatus,
    },
    /// Move a workflow task to another column
    ///
    /// Example: habit board move w1x2y3z4a completed
    Move {
        id: String,
        status: WorkflowStatus,
    },
    /// Delete a workflow task
    ///
    /// Example: habit board delete w1x2y3z4a
    Delete {
        id: String,
    },
    /// Show the board
    ///
    /// Example: habit board show
    Show,
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    ConsistencyTarget,
    LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "consistency_target" | "target" => ConfigOverrideTarget::ConsistencyTarget,
        "log_level" | "log" => ConfigOverrideTarget::LogLevel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `KEY=VALUE` string into one set of overrides; later keys win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::ConsistencyTarget => {
                let target = parsed
                    .value
                    .parse::<u64>()
                    .ok()
                    .filter(|target| *target > 0)
                    .ok_or_else(|| "consistency_target must be a positive integer".to_string())?;
                overrides.consistency_target = Some(target);
            }
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BoardCommand, Cli, Command, ConfigOverrideTarget, collect_config_overrides,
        parse_config_override,
    };
    use clap::Parser;
    use habit_core::model::WorkflowStatus;

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Consistency-Target = 7 ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::ConsistencyTarget);
        assert_eq!(parsed.value, "7");
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("unknown.field=value").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("themenoir").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn collect_config_overrides_keeps_last_value() {
        let overrides = collect_config_overrides(&[
            "theme=light".to_string(),
            "theme=noir".to_string(),
            "log_level=debug".to_string(),
        ])
        .unwrap();

        assert_eq!(overrides.theme.as_deref(), Some("noir"));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(overrides.consistency_target, None);
    }

    #[test]
    fn collect_config_overrides_rejects_zero_target() {
        let err = collect_config_overrides(&["consistency_target=0".to_string()]).unwrap_err();
        assert!(err.contains("positive integer"));
    }

    #[test]
    fn board_add_parses_status_spellings() {
        let cli = Cli::try_parse_from(["habit", "board", "add", "a", "b", "--status", "in-progress"])
            .unwrap();

        match cli.command {
            Command::Board {
                command: BoardCommand::Add { titles, status },
            } => {
                assert_eq!(titles, vec!["a", "b"]);
                assert_eq!(status, WorkflowStatus::InProgress);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        let result = Cli::try_parse_from(["habit", "board", "move", "w1", "archived"]);
        assert!(result.is_err());
    }
}
