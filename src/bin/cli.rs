//! Event Tracker remote CLI
//!
//! Talks to a running `event-tracker-api`:
//! - Check status
//! - List tables
//! - Print reports
//! - Seed the dataset and record orders

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "event-tracker-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Remote client for the Event Tracker API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(
        long,
        default_value = "http://localhost:8080",
        global = true,
        env = "EVENT_TRACKER_API_URL"
    )]
    pub api_url: String,

    /// Public API key
    #[arg(long, global = true, env = "EVENT_TRACKER_PUBLIC_KEY", hide_env_values = true)]
    pub public_key: Option<String>,

    /// Private API key
    #[arg(long, global = true, env = "EVENT_TRACKER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server status
    Status,

    /// List the rows of a table
    List {
        /// station, food, order, staff or roster
        table: String,
    },

    /// Total quantity ordered per food
    Popularity,

    /// Staff shift timeline
    Timeline {
        /// Only this staff member
        #[arg(short, long)]
        staff: Option<String>,
    },

    /// Load the demo dataset
    Seed {
        /// Replace existing rows
        #[arg(long)]
        reset: bool,
    },

    /// Record one order
    Order {
        /// Food title
        food: String,
        /// Quantity bought
        quantity: u32,
        /// Time of the order: "HH:MM" on the event date, or "YYYY-MM-DDTHH:MM:SS"
        #[arg(short, long)]
        time: Option<String>,
        /// Customer age
        #[arg(long)]
        age: Option<u32>,
        /// Customer postcode
        #[arg(long)]
        postcode: Option<u32>,
    },
}

struct Client {
    http: reqwest::Client,
    base: String,
    public_key: String,
    private_key: String,
}

impl Client {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: cli.api_url.trim_end_matches('/').to_string(),
            public_key: cli.public_key.clone().unwrap_or_default(),
            private_key: cli.private_key.clone().unwrap_or_default(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/api/v1{}", self.base, path))
            .header("x-api-key", &self.public_key)
            .header("x-api-secret", &self.private_key)
    }

    /// Send and decode JSON, exiting with the server's error message on failure
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let response = builder.send().await.map_err(|e| {
            format!("Cannot connect to Event Tracker API at {}: {}", self.base, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(text);
            eprintln!("Request failed ({}): {}", status, message);
            std::process::exit(1);
        }

        Ok(response.json().await?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::from_cli(&cli);
    let json_output = cli.format == "json";

    match &cli.command {
        Commands::Status => {
            let response = client
                .http
                .get(format!("{}/health", client.base))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("Event Tracker v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));

                    if let Some(counts) = health.get("counts") {
                        println!();
                        println!("Dataset:");
                        for key in ["stations", "foods", "orders", "staff", "rosters"] {
                            println!("  {:<9} {}", key, counts[key].as_u64().unwrap_or(0));
                        }
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Event Tracker API at {}", client.base);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin event-tracker-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::List { table } => {
            let grid = client
                .send(client.request(reqwest::Method::GET, &format!("/tables/{}", table)))
                .await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&grid["rows"])?);
            } else {
                print_table(&grid);
            }
        }

        Commands::Popularity => {
            let rows = client
                .send(client.request(reqwest::Method::GET, "/reports/popularity"))
                .await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<24} {:>8}", "Food", "Quantity");
                println!("{}", "-".repeat(33));
                for row in rows.as_array().into_iter().flatten() {
                    println!(
                        "{:<24} {:>8}",
                        row["food_name"].as_str().unwrap_or("-"),
                        row["quantity"].as_u64().unwrap_or(0)
                    );
                }
            }
        }

        Commands::Timeline { staff } => {
            let mut request = client.request(reqwest::Method::GET, "/reports/timeline");
            if let Some(staff) = staff {
                request = request.query(&[("staff", staff)]);
            }
            let timeline = client.send(request).await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                println!("{}", timeline["title"].as_str().unwrap_or("Work shifts"));
                println!();
                for item in timeline["items"].as_array().into_iter().flatten() {
                    println!(
                        "{:<8} {:<18} {:<18} {} - {}",
                        item["group"].as_str().unwrap_or("-"),
                        item["station"].as_str().unwrap_or("-"),
                        item["content"].as_str().unwrap_or("-"),
                        item["start"].as_str().unwrap_or("-"),
                        item["end"].as_str().unwrap_or("-")
                    );
                }
            }
        }

        Commands::Seed { reset } => {
            let request = client
                .request(reqwest::Method::POST, "/seed")
                .query(&[("reset", reset)]);
            let result = client.send(request).await?;

            let counts = &result["counts"];
            println!(
                "Seeded {} stations, {} foods, {} staff, {} rosters, {} orders",
                counts["stations"],
                counts["foods"],
                counts["staff"],
                counts["rosters"],
                counts["orders"]
            );
        }

        Commands::Order {
            food,
            quantity,
            time,
            age,
            postcode,
        } => {
            let timestamp = match parse_order_time(time.as_deref())? {
                OrderTime::At(ts) => ts,
                OrderTime::OnEventDate(t) => event_date(&client).await?.and_time(t),
            };

            let body = serde_json::json!([{
                "food": food,
                "timestamp": timestamp,
                "quantity": quantity,
                "age": age,
                "postcode": postcode,
            }]);

            let result = client
                .send(client.request(reqwest::Method::POST, "/orders").json(&body))
                .await?;

            println!(
                "Recorded order #{}: {} x {} at {}",
                result["ids"][0],
                quantity,
                food,
                timestamp.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(())
}

/// Event date as reported by the server
async fn event_date(client: &Client) -> Result<chrono::NaiveDate, Box<dyn std::error::Error>> {
    let app = client
        .send(client.request(reqwest::Method::GET, "/app"))
        .await?;

    let date = app["event"]["date"]
        .as_str()
        .ok_or("Server did not report an event date")?;
    Ok(chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")?)
}

/// When an order happened, before the event date is known
#[derive(Debug, PartialEq)]
enum OrderTime {
    At(NaiveDateTime),
    OnEventDate(NaiveTime),
}

/// "now" (or nothing), "HH:MM", or a full "YYYY-MM-DDTHH:MM:SS" timestamp
fn parse_order_time(s: Option<&str>) -> Result<OrderTime, String> {
    let s = match s.map(str::trim) {
        None | Some("now") => {
            let now = chrono::Local::now().time();
            let minute = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now);
            return Ok(OrderTime::OnEventDate(minute));
        }
        Some(s) => s,
    };

    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(OrderTime::At(ts));
    }
    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Ok(OrderTime::OnEventDate(time));
    }
    Err(format!("Invalid time: {}. Use HH:MM or YYYY-MM-DDTHH:MM:SS", s))
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_table(grid: &Value) {
    let rows = match grid["rows"].as_array() {
        Some(r) if !r.is_empty() => r,
        _ => {
            println!("No rows");
            return;
        }
    };

    let columns: Vec<&str> = grid["columns"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|c| c["name"].as_str())
        .collect();

    for column in &columns {
        print!("{:<20}", column);
    }
    println!();
    println!("{}", "-".repeat(20 * columns.len()));

    for row in rows {
        for column in &columns {
            let value = match &row[*column] {
                Value::Null => "-".to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            print!("{:<20}", value);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_time() {
        assert_eq!(
            parse_order_time(Some("12:30")).unwrap(),
            OrderTime::OnEventDate(NaiveTime::from_hms_opt(12, 30, 0).unwrap())
        );

        let full = chrono::NaiveDate::from_ymd_opt(2017, 1, 2)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        assert_eq!(
            parse_order_time(Some("2017-01-02T09:15:00")).unwrap(),
            OrderTime::At(full)
        );

        assert!(parse_order_time(Some("half past nine")).is_err());
        assert!(parse_order_time(Some("25:00")).is_err());
    }

    #[test]
    fn test_parse_order_time_now() {
        for input in [None, Some("now")] {
            match parse_order_time(input).unwrap() {
                OrderTime::OnEventDate(t) => assert_eq!(t.second(), 0),
                other => panic!("expected a time on the event date, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3 * 3600 + 120), "3h 2m");
        assert_eq!(format_duration(2 * 86400 + 5 * 3600), "2d 5h");
    }
}
