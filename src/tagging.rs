use crate::db::{changes, feed_entries, tags};
use crate::models::{FeedEntryTag, Tag};
use diesel::connection::Connection;
use diesel::sqlite::SqliteConnection;
use thiserror::Error;

/// Failures of tag mutations. `Display` is the message shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaggingError {
    #[error("Entry not found!")]
    EntryNotFound,
    #[error("Tag not found!")]
    TagNotFound,
    #[error("Tag name can't be empty!")]
    EmptyTagName,
    #[error("Tag not associated with this entry!")]
    TagNotAssociated,
    #[error("Failed to update tags: {msg}")]
    Db { msg: String },
}

impl From<diesel::result::Error> for TaggingError {
    fn from(error: diesel::result::Error) -> Self {
        let msg = format!("{error:?}");

        TaggingError::Db { msg }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Attached {
    Created(FeedEntryTag),
    AlreadyPresent(FeedEntryTag),
}

/// Links the tag named `tag_name` (trimmed, lower-cased) to the entry,
/// creating the tag on first use. Attaching an existing link is a no-op
/// that still counts as a mutation.
pub fn attach_tag(
    conn: &mut SqliteConnection,
    entry_id: i32,
    tag_name: &str,
) -> Result<Attached, TaggingError> {
    let name = tags::normalize_name(tag_name);

    if name.is_empty() {
        return Err(TaggingError::EmptyTagName);
    }

    let attached = conn.transaction::<_, TaggingError, _>(|conn| {
        let entry = feed_entries::find(conn, entry_id)?.ok_or(TaggingError::EntryNotFound)?;
        let tag = tags::find_or_create(conn, &name)?;

        match tags::find_link(conn, entry.id, tag.id)? {
            Some(link) => Ok(Attached::AlreadyPresent(link)),
            None => Ok(Attached::Created(tags::create_link(conn, entry.id, tag.id)?)),
        }
    })?;

    log::info!("Attached tag {} to entry {}", name, entry_id);

    changes::touch(conn, changes::TAG_CHANGES_ID);

    Ok(attached)
}

/// Removes the link between the entry and the tag. The tag itself is kept.
pub fn detach_tag(
    conn: &mut SqliteConnection,
    entry_id: i32,
    tag_id: i32,
) -> Result<Tag, TaggingError> {
    let tag = conn.transaction::<_, TaggingError, _>(|conn| {
        let entry = feed_entries::find(conn, entry_id)?.ok_or(TaggingError::EntryNotFound)?;
        let tag = tags::find(conn, tag_id)?.ok_or(TaggingError::TagNotFound)?;

        if tags::find_link(conn, entry.id, tag.id)?.is_none() {
            return Err(TaggingError::TagNotAssociated);
        }

        tags::remove_link(conn, entry.id, tag.id)?;

        Ok(tag)
    })?;

    log::info!("Detached tag {} from entry {}", tag.name, entry_id);

    changes::touch(conn, changes::TAG_CHANGES_ID);

    Ok(tag)
}
