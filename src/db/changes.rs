use crate::db;
use crate::models::Change;
use crate::schema::changes;
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;
use diesel::upsert::excluded;

/// Id of the single change record tracking tag mutations.
pub const TAG_CHANGES_ID: i32 = 1;

pub fn find(conn: &mut SqliteConnection, id: i32) -> Option<Change> {
    match changes::table
        .filter(changes::id.eq(id))
        .select(Change::as_select())
        .first(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn upsert(conn: &mut SqliteConnection, change: &Change) -> Result<usize, Error> {
    diesel::insert_into(changes::table)
        .values(change)
        .on_conflict(changes::id)
        .do_update()
        .set(changes::updated.eq(excluded(changes::updated)))
        .execute(conn)
}

/// Sets the record's timestamp to the current time, creating the record if needed.
///
/// Storage failures are logged and swallowed: the returned record then only
/// exists in memory and readers keep seeing the previous timestamp.
pub fn touch(conn: &mut SqliteConnection, id: i32) -> Change {
    let change = Change {
        id,
        updated: db::current_time(),
    };

    if let Err(error) = upsert(conn, &change) {
        log::error!("Failed to update change record {}: {:?}", id, error);
    }

    change
}

pub fn find_or_touch(conn: &mut SqliteConnection, id: i32) -> Change {
    match find(conn, id) {
        Some(change) => change,
        None => touch(conn, id),
    }
}
