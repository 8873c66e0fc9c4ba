use std::io::{self, BufRead};

use anyhow::Context;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use scanpost::api::{HttpTransport, SubmissionClient};
use scanpost::config::{Config, DEFAULT_TIMEZONE};
use scanpost::event_handlers::{Flow, Station, parse_line};
use scanpost::session::ScanSession;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CameraPermission {
    Granted,
    Denied,
}

#[derive(Parser, Debug)]
#[command(
    name = "scanpost",
    version,
    about = "Barcode scan station: reads scanner events from stdin and registers them remotely"
)]
struct Cli {
    #[arg(long, env = "SCANPOST_BASE_URL", help = "Base URL of the registration service")]
    base_url: String,
    #[arg(long, env = "SCANPOST_TIMEOUT_MS", help = "Request timeout in milliseconds (default: wait indefinitely)")]
    timeout_ms: Option<u64>,
    #[arg(
        long,
        env = "SCANPOST_TIMEZONE",
        default_value_t = DEFAULT_TIMEZONE,
        value_parser = parse_timezone,
        help = "IANA time zone used when showing scan times"
    )]
    timezone: Tz,
    #[arg(long, value_enum, default_value_t = CameraPermission::Granted)]
    camera_permission: CameraPermission,
    #[arg(short, long, help = "Log debug output")]
    verbose: bool,
}

fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "scanpost=debug" } else { "scanpost=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new(
        &cli.base_url,
        cli.timeout_ms,
        cli.timezone,
        cli.camera_permission == CameraPermission::Granted,
    )?;
    let transport = HttpTransport::new(&config.base_url, config.timeout)
        .context("failed to build HTTP client")?;

    let mut session = ScanSession::new();
    session.resolve_permission(config.camera_permission);
    let mut station = Station::new(session, SubmissionClient::new(transport), config.timezone);
    tracing::info!(base_url = %config.base_url, "scan station ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    station.show(&mut stdout)?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read input")?;
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "bad input line");
                println!("! {}", e);
                continue;
            }
        };
        if station.handle(input, chrono::Utc::now(), &mut stdout)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
