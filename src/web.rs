use crate::config::Config;
use crate::db;
use crate::render::{EntryExtension, NoExtension};
use rocket::fairing::{self, AdHoc};
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_sync_db_pools::database;

pub mod entries;
pub mod feeds;
pub mod params;
pub mod views;

pub const DATABASE_NAME: &str = "re_feed";

#[database("re_feed")]
pub struct DbConn(diesel::SqliteConnection);

/// Contributes extra fields to the JSON feed.
pub struct FeedExtension(pub Box<dyn EntryExtension>);

/// Rocket's own configuration sources, with the pool for `DbConn` pointed at
/// `config.database_url`.
pub fn figment(config: &Config) -> Figment {
    rocket::Config::figment().merge((
            format!("databases.{DATABASE_NAME}.url"),
            config.database_url.as_str(),
        ))
}

pub fn rocket(config: Config) -> Rocket<Build> {
    rocket_with_extension(config, Box::new(NoExtension))
}

pub fn rocket_with_extension(config: Config, extension: Box<dyn EntryExtension>) -> Rocket<Build> {
    rocket::custom(figment(&config))
        .attach(DbConn::fairing())
        .attach(AdHoc::try_on_ignite("Database migrations", run_migrations))
        .manage(config)
        .manage(FeedExtension(extension))
        .mount(
            "/",
            routes![
                entries::index,
                entries::tag_entry,
                entries::delete_tag,
                entries::delete_tag_by_post,
                feeds::rss,
                feeds::atom,
                feeds::json,
            ],
        )
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let conn = match DbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            log::error!("Database pool `{}` is not configured", DATABASE_NAME);

            return Err(rocket);
        }
    };

    match conn.run(db::run_migrations).await {
        Ok(()) => Ok(rocket),
        Err(err) => {
            log::error!("{}", err.msg);

            Err(rocket)
        }
    }
}
