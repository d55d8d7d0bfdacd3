use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::connection::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod changes;
pub mod feed_entries;
pub mod tags;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
pub struct DbSetupError {
    pub msg: String,
}

#[cfg(test)]
pub fn establish_test_connection() -> SqliteConnection {
    let mut connection = SqliteConnection::establish(":memory:").unwrap();

    run_migrations(&mut connection).unwrap();

    connection
}

/// Stored timestamps are UTC-naive and whole seconds.
pub fn current_time() -> NaiveDateTime {
    Utc::now().round_subsecs(0).naive_utc()
}

pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, DbSetupError> {
    let mut connection = SqliteConnection::establish(database_url).map_err(|err| DbSetupError {
        msg: format!("Error connecting to {database_url}: {err}"),
    })?;

    run_migrations(&mut connection)?;

    Ok(connection)
}

pub fn run_migrations(connection: &mut SqliteConnection) -> Result<(), DbSetupError> {
    match connection.run_pending_migrations(MIGRATIONS) {
        Ok(versions) => {
            for version in versions {
                log::info!("Applied migration {}", version);
            }

            Ok(())
        }
        Err(err) => Err(DbSetupError {
            msg: format!("Failed to run migrations: {err}"),
        }),
    }
}
