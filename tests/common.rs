#![allow(dead_code)]

use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;
use re_feed::config::Config;
use re_feed::db;
use re_feed::db::feed_entries::{self, NewFeedEntry};
use re_feed::models::FeedEntry;
use rocket::local::blocking::Client;
use tempfile::TempDir;

pub struct TestApp {
    pub client: Client,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    pub fn connection(&self) -> SqliteConnection {
        db::establish_connection(&self.config.database_url).unwrap()
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        database_url: dir.path().join("re-feed.db").to_string_lossy().to_string(),
        fetch_on_start: false,
        ..Config::default()
    }
}

pub fn test_app_with_config(update: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    update(&mut config);

    let client = Client::tracked(re_feed::web::rocket(config.clone())).expect("valid rocket instance");

    TestApp {
        client,
        config,
        _dir: dir,
    }
}

pub fn test_app() -> TestApp {
    test_app_with_config(|_| {})
}

pub fn insert_entry(connection: &mut SqliteConnection, source_id: &str) -> FeedEntry {
    let title = format!("Title {source_id}");
    let link = format!("http://example.com/{source_id}");
    let published_at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let new_entry = NewFeedEntry {
        source_id,
        title: &title,
        link: &link,
        published_at,
        description: "<p>Description</p>",
    };

    feed_entries::create(connection, &new_entry).unwrap();

    feed_entries::find_by_source_id(connection, source_id).unwrap().unwrap()
}
