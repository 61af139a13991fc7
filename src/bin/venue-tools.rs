//! Venue Tools CLI
//!
//! Parse and format show timestamps, and delete venues from a running site.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::Url;

use venue_tools::date::{parse_iso_string, parse_iso_string_lenient, to_rfc3339_millis};
use venue_tools::format::{format_datetime, DateFormat};
use venue_tools::logging;
use venue_tools::venue::{
    DeleteAction, DeleteConfig, DeleteEvent, HttpTransport, Location, Navigator, RedirectScheme,
    DEFAULT_RESOURCE_PATH,
};

/// Venue Tools - timestamp helpers and venue deletion for the Fyyur site
#[derive(Parser)]
#[command(name = "venue-tools")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Parse a timestamp into RFC 3339
    venue-tools parse-date 2021-03-15T10:30:00.500

    # Parse every line of a file, rolling over out-of-range fields
    venue-tools parse-date --lenient --file shows.txt

    # Show a start time the way the site displays it
    venue-tools format-date --format full \"2019-05-21 21:30:00.000\"

    # Delete venue 42 and print where the browser would go next
    venue-tools delete --id 42 --origin http://localhost:5000")]
struct Cli {
    /// Log filter (e.g. "debug", "venue_tools=trace"); RUST_LOG takes precedence
    #[arg(short, long, global = true, default_value = logging::DEFAULT_FILTER)]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse timestamps such as "2021-03-15T10:30:00.500" into UTC
    ParseDate {
        /// Timestamps to parse (7 numeric fields, any separators)
        inputs: Vec<String>,

        /// Also parse every non-empty line of this file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Roll out-of-range fields over instead of rejecting them
        #[arg(long)]
        lenient: bool,

        /// Print in a display format ("full" or "medium") instead of RFC 3339
        #[arg(long)]
        format: Option<DateFormat>,
    },

    /// Parse a timestamp and print it in a display format
    FormatDate {
        /// Timestamp to format
        input: String,

        /// Display format: "full" or "medium"
        #[arg(long, default_value_t = DateFormat::Medium)]
        format: DateFormat,
    },

    /// Delete a venue and print the page the browser is sent to
    Delete {
        /// Venue identifier
        #[arg(long)]
        id: Option<String>,

        /// Site origin
        #[arg(long, env = "VENUES_ORIGIN", default_value = "http://localhost:5000")]
        origin: String,

        /// Path prefix venues live under
        #[arg(long, default_value = DEFAULT_RESOURCE_PATH)]
        resource_path: String,

        /// Always redirect over http, whatever the origin scheme
        #[arg(long)]
        force_http: bool,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::setup_for_cli(&cli.verbosity);

    let result = match cli.command {
        Commands::ParseDate { inputs, file, lenient, format } => {
            cmd_parse_date(inputs, file, lenient, format)
        }
        Commands::FormatDate { input, format } => {
            cmd_format_date(&input, format)
        }
        Commands::Delete { id, origin, resource_path, force_http, timeout } => {
            cmd_delete(id, &origin, resource_path, force_http, timeout).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Prints the navigation target instead of moving a browser
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn replace(&mut self, url: &Url) {
        println!("{}", url);
    }
}

/// Parse timestamps from arguments and/or a file
fn cmd_parse_date(
    mut inputs: Vec<String>,
    file: Option<PathBuf>,
    lenient: bool,
    format: Option<DateFormat>,
) -> anyhow::Result<()> {
    if let Some(path) = file {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        inputs.extend(
            contents.lines().map(str::trim).filter(|line| !line.is_empty()).map(String::from),
        );
    }

    if inputs.is_empty() {
        bail!("no timestamps given");
    }

    let mut failures = 0;
    for input in &inputs {
        let parsed = if lenient { parse_iso_string_lenient(input) } else { parse_iso_string(input) };
        match parsed {
            Ok(timestamp) => match format {
                Some(format) => println!("{}", format_datetime(&timestamp, format)),
                None => println!("{}", to_rfc3339_millis(&timestamp)),
            },
            Err(e) => {
                eprintln!("{}: {}", input, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} timestamps could not be parsed", failures, inputs.len());
    }

    Ok(())
}

/// Parse one timestamp and print it in a display format
fn cmd_format_date(input: &str, format: DateFormat) -> anyhow::Result<()> {
    let timestamp = parse_iso_string(input)?;
    println!("{}", format_datetime(&timestamp, format));
    Ok(())
}

/// Delete a venue from the site at `origin`
async fn cmd_delete(
    id: Option<String>,
    origin: &str,
    resource_path: String,
    force_http: bool,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    let location = Location::parse(origin)?;
    let config = DeleteConfig {
        resource_path,
        redirect_scheme: if force_http { RedirectScheme::ForceHttp } else { RedirectScheme::MatchPage },
        timeout: timeout.map(Duration::from_secs),
    };
    let transport = HttpTransport::new(config.timeout)?;
    let action = DeleteAction::new(location, config, transport);

    // No --id behaves like a control with no data-id attribute
    let event = id.map(DeleteEvent::for_venue).unwrap_or_default();

    eprintln!("Deleting venue from {}...", action.location());
    action
        .handle(&event, &mut StdoutNavigator)
        .await
        .context("venue was not deleted")?;

    Ok(())
}
