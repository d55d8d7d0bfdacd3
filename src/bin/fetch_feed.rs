use clap::Parser;
use dotenv::dotenv;
use re_feed::config::Config;
use re_feed::db;
use re_feed::sync::{FetchMode, SyncFeedJob};
use std::process::ExitCode;

/// Fetches the configured source once and stores the new entries.
#[derive(Parser, Debug)]
#[command(name = "fetch_feed")]
#[command(about = "Ingests new entries from the configured RSS or JSON source")]
struct Args {
    /// Source to read: `json` or `rss` (case-insensitive)
    mode: String,
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mode = match args.mode.parse::<FetchMode>() {
        Ok(mode) => mode,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{err}");

            return ExitCode::from(2);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Failed to load configuration: {}", err);

            return ExitCode::FAILURE;
        }
    };

    let mut connection = match db::establish_connection(&config.database_url) {
        Ok(connection) => connection,
        Err(err) => {
            log::error!("{}", err.msg);

            return ExitCode::FAILURE;
        }
    };

    match SyncFeedJob::new(mode, &config).execute(&mut connection) {
        Ok(count) => {
            println!("Inserted {count} entries");

            ExitCode::SUCCESS
        }
        Err(err) if !err.is_fatal() => {
            log::error!("{}", err);
            println!("Inserted 0 entries");

            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);

            ExitCode::FAILURE
        }
    }
}
