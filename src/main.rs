/// Main entry point for the habit heatmap command line tool
///
/// This file sets up logging, parses command line arguments, opens the habit
/// store on a SQLite database and runs a single command against it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use habit_heatmap::{
    AppError, CalendarCell, CalendarGrid, ColorIntensity, Frequency, HabitDraft,
    HabitStore, IntensityBand, SqliteStorage, Target,
};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, AppError> {
    // Try various locations in order of preference
    let potential_paths = [
        dirs::home_dir().map(|mut p| {
            p.push(".habit_heatmap");
            p
        }),
        dirs::data_dir().map(|mut p| {
            p.push("habit_heatmap");
            p
        }),
        dirs::config_dir().map(|mut p| {
            p.push("habit_heatmap");
            p
        }),
        std::env::current_dir().ok().map(|mut p| {
            p.push(".habit_heatmap");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Test if we can write to this directory
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("habits.db"));
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("habit_heatmap");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("habits.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

fn parse_frequency(s: &str) -> Result<Frequency, String> {
    Frequency::parse(s).ok_or_else(|| format!("unknown frequency '{}' (daily, weekly, monthly)", s))
}

/// Command line arguments for the habit heatmap tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new habit
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_frequency)]
        frequency: Option<Frequency>,
        /// Display color, e.g. "#1976d2"
        #[arg(long)]
        color: Option<String>,
        /// Record a quantity with each completion
        #[arg(long, requires = "unit")]
        track_quantity: bool,
        #[arg(long)]
        unit: Option<String>,
        /// Goal value per frequency period
        #[arg(long)]
        target: Option<f64>,
    },
    /// List habits with their streaks
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Log a completion, or remove it if the day is already logged
    Log {
        habit_id: String,
        /// Day to toggle (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a habit and its history
    Delete { habit_id: String },
    /// Hide a habit from the active list
    Archive { habit_id: String },
    /// Show statistics for a habit
    Stats { habit_id: String },
    /// Print the year heatmap of a habit
    Calendar {
        habit_id: String,
        /// Year to show, defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
}

fn main() {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_heatmap={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let storage = SqliteStorage::new(&db_path)?;
    let mut store = HabitStore::open(storage)?;

    match args.command {
        Command::Add {
            name,
            description,
            frequency,
            color,
            track_quantity,
            unit,
            target,
        } => {
            let draft = HabitDraft {
                name,
                description,
                frequency,
                color,
                track_quantity,
                unit,
                target: target.map(|value| Target {
                    value,
                    period: frequency.unwrap_or_default(),
                }),
            };
            let habit_id = store.add_habit(draft)?;
            println!("Created habit {}", habit_id);
        }
        Command::List { all } => {
            println!("{}", store.status(all).message);
        }
        Command::Log {
            habit_id,
            date,
            quantity,
            notes,
        } => {
            let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());
            let outcome = store.toggle_completion(&habit_id, &date, quantity, notes.as_deref())?;
            println!("{:?} {}", outcome, date);
        }
        Command::Delete { habit_id } => {
            let habit = store.delete_habit(&habit_id)?;
            println!("Deleted habit '{}'", habit.name);
        }
        Command::Archive { habit_id } => {
            store.archive_habit(&habit_id)?;
            println!("Archived habit {}", habit_id);
        }
        Command::Stats { habit_id } => match store.get_stats(&habit_id) {
            Some(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
            None => {
                return Err(habit_heatmap::StoreError::NotFound { habit_id }.into());
            }
        },
        Command::Calendar { habit_id, year } => {
            let grid = match year {
                Some(year) => store.calendar(&habit_id, year)?,
                None => store.current_calendar(&habit_id)?,
            };
            print!("{}", render_grid(&grid));
        }
    }

    // Mutations still succeed when the snapshot could not be written
    if let Some(message) = store.last_error() {
        eprintln!("Warning: {}", message);
    }

    Ok(())
}

/// Text heatmap: one row per weekday, one column per week
fn render_grid(grid: &CalendarGrid) -> String {
    const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    const GUTTER: usize = 4;

    let mut header = vec![' '; GUTTER + grid.week_count() + 3];
    for label in &grid.month_labels {
        for (offset, ch) in label.month.chars().enumerate() {
            if let Some(slot) = header.get_mut(GUTTER + label.column + offset) {
                *slot = ch;
            }
        }
    }

    let mut out = format!("{}\n", grid.year);
    out.push_str(header.iter().collect::<String>().trim_end());
    out.push('\n');

    for (weekday, name) in WEEKDAYS.iter().enumerate() {
        out.push_str(&format!("{:<width$}", name, width = GUTTER));
        for week in 0..grid.week_count() {
            out.push(grid.at(week, weekday).map_or(' ', cell_glyph));
        }
        out.push('\n');
    }
    out
}

fn cell_glyph(cell: &CalendarCell) -> char {
    if !cell.in_current_year {
        return ' ';
    }
    match cell.intensity {
        Some(ColorIntensity::Fixed) | Some(ColorIntensity::Scaled(IntensityBand::Full)) => '#',
        Some(ColorIntensity::Scaled(IntensityBand::High)) => '%',
        Some(ColorIntensity::Scaled(IntensityBand::Medium)) => '+',
        Some(ColorIntensity::Scaled(IntensityBand::Low)) => ':',
        None if cell.is_future => ' ',
        None => '.',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use habit_heatmap::{Completion, Habit};

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "habit-heatmap",
            "--database",
            "/tmp/h.db",
            "log",
            "abc",
            "--date",
            "2024-01-02",
            "--quantity",
            "3",
        ])
        .unwrap();
        assert_eq!(args.database, Some(PathBuf::from("/tmp/h.db")));
        assert!(matches!(args.command, Command::Log { quantity: Some(q), .. } if q == 3.0));

        assert!(Args::try_parse_from(["habit-heatmap", "add", "Read", "--frequency", "hourly"]).is_err());
    }

    #[test]
    fn test_render_grid() {
        let mut habit = Habit::new(
            HabitDraft {
                name: "Walk".to_string(),
                ..HabitDraft::default()
            },
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let day = Completion::parse_date("2023-01-01").unwrap();
        habit
            .toggle_completion(day, None, None, Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap())
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let grid = CalendarGrid::build_at(&habit, 2023, now).unwrap();
        let text = render_grid(&grid);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[1].contains("Jan"));
        // 2023-01-01 is a Sunday: first column of the Sunday row
        assert!(lines[2].starts_with("Sun #"));
    }
}
