//! taskdex - Interactive Driver Entry Point
//!
//! Reads line-oriented commands from stdin and drives a [`TaskStore`].
//! This is the input boundary: id, priority, and date validation all
//! happen here; the store is never called with malformed values.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use taskdex::{Config, Priority, TaskId, TaskStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
commands:
  add <low|medium|high> <YYYY-MM-DD> <description...>
  update <id> <low|medium|high> <YYYY-MM-DD> <description...>
  remove <id>
  search <id>
  top                 complete the highest-priority task
  list                all tasks, ascending by id
  heap                diagnostic: heap snapshot + structure
  tree                diagnostic: id index + structure
  help
  quit";

/// A validated command, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Add {
        description: String,
        priority: Priority,
        due_date: NaiveDate,
    },
    Update {
        id: TaskId,
        description: String,
        priority: Priority,
        due_date: NaiveDate,
    },
    Remove { id: TaskId },
    Search { id: TaskId },
    Top,
    List,
    Heap,
    Tree,
    Help,
    Quit,
    Nothing,
}

impl Command {
    /// Parse and validate one input line. The error is a message for the
    /// user; the store never sees a rejected line.
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Ok(Command::Nothing);
        };
        match keyword {
            "add" => {
                let priority = parse_priority(words.next())?;
                let due_date = parse_date(words.next())?;
                let description = parse_description(words)?;
                Ok(Command::Add {
                    description,
                    priority,
                    due_date,
                })
            }
            "update" => {
                let id = parse_id(words.next())?;
                let priority = parse_priority(words.next())?;
                let due_date = parse_date(words.next())?;
                let description = parse_description(words)?;
                Ok(Command::Update {
                    id,
                    description,
                    priority,
                    due_date,
                })
            }
            "remove" => Ok(Command::Remove {
                id: parse_id(words.next())?,
            }),
            "search" => Ok(Command::Search {
                id: parse_id(words.next())?,
            }),
            "top" => Ok(Command::Top),
            "list" => Ok(Command::List),
            "heap" => Ok(Command::Heap),
            "tree" => Ok(Command::Tree),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command \"{other}\"; type `help`")),
        }
    }

    fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add { .. } | Command::Update { .. } | Command::Remove { .. } | Command::Top,
        )
    }
}

fn parse_id(token: Option<&str>) -> Result<TaskId, String> {
    let token = token.ok_or("missing id")?;
    token
        .parse::<u64>()
        .map(TaskId::from)
        .map_err(|_| format!("invalid id \"{token}\": expected an integer"))
}

fn parse_priority(token: Option<&str>) -> Result<Priority, String> {
    let token = token.ok_or("missing priority")?;
    token.parse::<Priority>().map_err(|err| err.to_string())
}

fn parse_date(token: Option<&str>) -> Result<NaiveDate, String> {
    let token = token.ok_or("missing due date")?;
    token
        .parse::<NaiveDate>()
        .map_err(|_| format!("invalid date \"{token}\": expected YYYY-MM-DD"))
}

fn parse_description<'a>(words: impl Iterator<Item = &'a str>) -> Result<String, String> {
    let description = words.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err("missing description".to_string());
    }
    Ok(description)
}

fn format_task(task: &taskdex::Task) -> String {
    format!(
        "#{} [{}] due {}: {}",
        task.id(),
        task.priority(),
        task.due_date(),
        task.description(),
    )
}

fn print_heap_views(store: &TaskStore) {
    let snapshot = store.heap_snapshot();
    if snapshot.is_empty() {
        println!("heap: (empty)");
        return;
    }
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("heap (array order):\n{json}"),
        Err(err) => println!("heap snapshot failed to serialize: {err}"),
    }
    println!("heap structure:\n{}", store.heap_render());
}

fn print_tree_views(store: &TaskStore) {
    let tasks = store.list_all();
    if tasks.is_empty() {
        println!("tree: (empty)");
        return;
    }
    println!("tree (in order):");
    for task in tasks {
        println!("  {}", format_task(task));
    }
    println!("tree structure:\n{}", store.tree_render());
}

fn run_command(store: &mut TaskStore, command: Command) {
    match command {
        Command::Add {
            description,
            priority,
            due_date,
        } => {
            let id = store.add(description, priority, due_date);
            println!("added task #{id}");
        }
        Command::Update {
            id,
            description,
            priority,
            due_date,
        } => match store.update(id, description, priority, due_date) {
            Ok(()) => println!("updated task #{id}"),
            Err(err) => println!("{err}"),
        },
        Command::Remove { id } => match store.remove(id) {
            Ok(task) => println!("removed {}", format_task(&task)),
            Err(err) => println!("{err}"),
        },
        Command::Search { id } => match store.search(id) {
            Ok(task) => println!("{}", format_task(task)),
            Err(err) => println!("{err}"),
        },
        Command::Top => match store.extract_top() {
            Ok(task) => println!("completed {}", format_task(&task)),
            Err(err) => println!("{err}"),
        },
        Command::List => {
            let tasks = store.list_all();
            if tasks.is_empty() {
                println!("no tasks stored");
            }
            for task in tasks {
                println!("{}", format_task(task));
            }
        }
        Command::Heap => print_heap_views(store),
        Command::Tree => print_tree_views(store),
        Command::Help => println!("{HELP}"),
        Command::Quit | Command::Nothing => {}
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "taskdex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("taskdex ready; type `help` for commands");

    let mut store = TaskStore::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                let mutated = command.is_mutating();
                run_command(&mut store, command);
                if mutated && config.debug_views {
                    print_heap_views(&store);
                    print_tree_views(&store);
                }
            }
            Err(message) => println!("{message}"),
        }
        print!("> ");
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let command = Command::parse("add high 2025-12-01 ship the release").unwrap();
        assert_eq!(
            command,
            Command::Add {
                description: "ship the release".to_string(),
                priority: Priority::High,
                due_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            },
        );
    }

    #[test]
    fn test_parse_update() {
        let command = Command::parse("update 4 low 2026-01-15 tidy the docs").unwrap();
        assert_eq!(
            command,
            Command::Update {
                id: TaskId::from(4),
                description: "tidy the docs".to_string(),
                priority: Priority::Low,
                due_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            },
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("remove seven").is_err());
        assert!(Command::parse("add urgent 2025-12-01 x").is_err());
        assert!(Command::parse("add high 12/01/2025 x").is_err());
        assert!(Command::parse("add high 2025-12-01").is_err());
        assert!(Command::parse("frobnicate").is_err());
    }

    #[test]
    fn test_parse_blank_and_simple() {
        assert_eq!(Command::parse("").unwrap(), Command::Nothing);
        assert_eq!(Command::parse("   ").unwrap(), Command::Nothing);
        assert_eq!(Command::parse("top").unwrap(), Command::Top);
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
        assert_eq!(
            Command::parse("search 12").unwrap(),
            Command::Search { id: TaskId::from(12) },
        );
    }
}
