use dotenv::dotenv;
use re_feed::config::Config;
use re_feed::db;
use re_feed::sync::{FetchMode, SyncFeedJob};
use re_feed::web;
use std::process;

#[rocket::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Failed to load configuration: {}", err);
            process::exit(1);
        }
    };

    if config.fetch_on_start {
        let sync_config = config.clone();

        if let Err(err) = rocket::tokio::task::spawn_blocking(move || sync_on_start(&sync_config)).await {
            log::error!("Start-up ingestion panicked: {:?}", err);
        }
    }

    if let Err(err) = web::rocket(config).launch().await {
        log::error!("Server failed: {}", err);
        process::exit(1);
    }
}

fn sync_on_start(config: &Config) {
    let mode = match config.fetch_mode.parse::<FetchMode>() {
        Ok(mode) => mode,
        Err(err) => {
            log::error!("{}", err);
            return;
        }
    };

    match db::establish_connection(&config.database_url) {
        Ok(mut connection) => {
            SyncFeedJob::new(mode, config).sync_feed(&mut connection);
        }
        Err(err) => log::error!("{}", err.msg),
    }
}
