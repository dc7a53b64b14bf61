//! Event Tracker admin CLI
//!
//! Works directly on the local dataset store:
//! - Seed or reset the dataset
//! - List tables
//! - Print the popularity and timeline reports
//! - Export and import datasets

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use event_tracker::app::navigation;
use event_tracker::config::{generate_credentials_template, generate_default_config, Config};
use event_tracker::logging::init_logging;
use event_tracker::report::{popularity_report, shift_timeline};
use event_tracker::seed::load_sample_data;
use event_tracker::store::{Dataset, EventStore};
use event_tracker::table::{export_csv, load_grid, GridView, Table};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "event-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage the event tracking dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true, env = "EVENT_TRACKER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print a credentials template instead
        #[arg(long)]
        credentials: bool,
    },

    /// Load the demo dataset
    Seed {
        /// Replace existing rows
        #[arg(long)]
        reset: bool,
    },

    /// Delete every row of the dataset
    Reset,

    /// List the rows of a table
    List {
        /// station, food, order, staff or roster
        table: String,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Total quantity ordered per food
    Popularity {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Staff shifts in start order
    Timeline {
        /// Only this staff member
        #[arg(short, long)]
        staff: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export the dataset as JSON, or one table as CSV
    Export {
        /// Single table to export as CSV
        #[arg(short, long)]
        table: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a dataset JSON document
    Import {
        /// Path to the JSON file
        path: PathBuf,
    },

    /// Print the navigation shell
    App,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config printing must work before any config exists
    if let Commands::Config {
        output,
        credentials,
    } = &cli.command
    {
        let content = if *credentials {
            generate_credentials_template()
        } else {
            generate_default_config()
        };
        return write_output(output.as_ref(), &content);
    }

    let config = Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging);

    let store = EventStore::open(&config.store, config.event.window())
        .with_context(|| format!("Failed to open store {:?}", config.store.database))?;

    match cli.command {
        Commands::Config { .. } => {}

        Commands::Seed { reset } => {
            let summary = load_sample_data(&store, reset).await.map_err(|e| {
                if matches!(e, event_tracker::StoreError::NotEmpty) {
                    anyhow::anyhow!("{} (use --reset to replace it)", e)
                } else {
                    e.into()
                }
            })?;
            println!("{}", summary);
        }

        Commands::Reset => {
            store.reset().await?;
            println!("Dataset reset. {}", store.counts().await?);
        }

        Commands::List { table, format } => {
            let table: Table = table.parse()?;
            match format {
                OutputFormat::Table => print_grid(&load_grid(&store, table).await?),
                OutputFormat::Json => {
                    let grid = load_grid(&store, table).await?;
                    println!("{}", serde_json::to_string_pretty(&grid.rows)?);
                }
                OutputFormat::Csv => print!("{}", export_csv(&store, table).await?),
            }
        }

        Commands::Popularity { json } => {
            let rows = popularity_report(&store).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No orders yet");
            } else {
                println!("{:<24} {:>8}", "Food", "Quantity");
                println!("{}", "-".repeat(33));
                for row in rows {
                    println!("{:<24} {:>8}", row.food_name, row.quantity);
                }
            }
        }

        Commands::Timeline { staff, json } => {
            let timeline =
                shift_timeline(&store, staff.as_deref(), config.event.visible_hours()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                println!("{}", timeline.title);
                println!();
                println!(
                    "{:<8} {:<18} {:<18} {:<17} {:<17}",
                    "Staff", "Station", "Shift", "Start", "End"
                );
                println!("{}", "-".repeat(82));
                for item in &timeline.items {
                    println!(
                        "{:<8} {:<18} {:<18} {:<17} {:<17}",
                        item.group,
                        item.station,
                        item.content,
                        item.start.format("%Y-%m-%d %H:%M"),
                        item.end.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }

        Commands::Export { table, output } => {
            let content = match table {
                Some(name) => export_csv(&store, name.parse()?).await?,
                None => serde_json::to_string_pretty(&store.export_dataset().await?)?,
            };
            write_output(output.as_ref(), &content)?;
        }

        Commands::Import { path } => {
            if !path.exists() {
                bail!("File not found: {:?}", path);
            }
            let content = std::fs::read_to_string(&path)?;
            let dataset: Dataset = serde_json::from_str(&content)
                .with_context(|| format!("{:?} is not a dataset document", path))?;
            let counts = store.insert_dataset(&dataset).await?;
            println!("Imported. {}", counts);
        }

        Commands::App => {
            let nav = navigation(config.event.name.clone());
            println!("{}", nav.name);
            for group in &nav.groups {
                println!("  {}", group.name);
                for step in &group.steps {
                    let endpoints: Vec<String> =
                        step.widgets.iter().map(|w| w.endpoint()).collect();
                    println!("    {:<12} {}", step.name, endpoints.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            println!("Written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn print_grid(grid: &GridView) {
    if grid.rows.is_empty() {
        println!("No {} rows", grid.table);
        return;
    }

    let cells: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| grid.columns.iter().map(|c| cell(row.get(c.name))).collect())
        .collect();

    let widths: Vec<usize> = grid
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].len())
                .chain(std::iter::once(c.name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = grid
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c.name, w = w))
        .collect();
    println!("{}", header.join(" | "));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 3 * (widths.len() - 1)));

    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = w))
            .collect();
        println!("{}", line.join(" | "));
    }
    println!();
    println!("{} rows", grid.total);
}
