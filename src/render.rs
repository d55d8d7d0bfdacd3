use crate::db;
use crate::models::FeedEntryWithTags;
use chrono::NaiveDateTime;
use quick_xml::events::{BytesCData, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use typed_builder::TypedBuilder as Builder;

pub mod atom;
pub mod json;
pub mod rss;

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
    Json,
}

impl FeedFormat {
    /// Atom is served with the RSS media type, which existing subscribers expect.
    pub fn content_type(&self) -> &'static str {
        match self {
            FeedFormat::Rss | FeedFormat::Atom => RSS_CONTENT_TYPE,
            FeedFormat::Json => JSON_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedFormat::Rss => write!(f, "rss"),
            FeedFormat::Atom => write!(f, "atom"),
            FeedFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to render the feed: {msg}")]
pub struct RenderError {
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFeed {
    pub body: String,
    pub content_type: &'static str,
}

/// Contributes additional fields to every JSON feed object.
///
/// Fields named like the built-in ones (`title`, `link`, `description`, `tags`)
/// are ignored.
pub trait EntryExtension: Send + Sync {
    fn extra_fields(&self, entry: &FeedEntryWithTags) -> Map<String, Value>;
}

pub struct NoExtension;

impl EntryExtension for NoExtension {
    fn extra_fields(&self, _entry: &FeedEntryWithTags) -> Map<String, Value> {
        Map::new()
    }
}

/// Renders entries given in query order (newest identity first). Every format
/// presents them reversed, oldest first.
#[derive(Builder)]
pub struct FeedRenderer<'a> {
    entries: Vec<FeedEntryWithTags>,
    #[builder(setter(into), default)]
    title: String,
    #[builder(setter(into), default)]
    base_url: String,
    #[builder(default, setter(strip_option))]
    updated: Option<NaiveDateTime>,
    #[builder(default, setter(strip_option))]
    extension: Option<&'a dyn EntryExtension>,
}

impl FeedRenderer<'_> {
    pub fn render(&self, format: FeedFormat) -> Result<RenderedFeed, RenderError> {
        let body = match format {
            FeedFormat::Rss => rss::render(&self.title, &self.base_url, self.presentation_order())?,
            FeedFormat::Atom => atom::render(
                &self.title,
                &self.base_url,
                self.updated.unwrap_or_else(db::current_time),
                self.presentation_order(),
            )?,
            FeedFormat::Json => json::render(
                self.extension.unwrap_or(&NoExtension),
                self.presentation_order(),
            )?,
        };

        Ok(RenderedFeed {
            body,
            content_type: format.content_type(),
        })
    }

    fn presentation_order(&self) -> impl Iterator<Item = &FeedEntryWithTags> {
        self.entries.iter().rev()
    }
}

pub(crate) fn write_event<'a>(
    writer: &mut Writer<Vec<u8>>,
    event: impl Into<Event<'a>>,
) -> Result<(), RenderError> {
    writer.write_event(event).map_err(|err| RenderError {
        msg: format!("{err:?}"),
    })
}

/// Writes `text` as CDATA, split so that no section contains the `]]>` terminator.
pub(crate) fn write_cdata(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), RenderError> {
    for section in cdata_sections(text) {
        write_event(writer, Event::CData(BytesCData::new(section)))?;
    }

    Ok(())
}

fn cdata_sections(text: &str) -> Vec<String> {
    let mut sections = vec![];
    let mut rest = text;

    while let Some(position) = rest.find("]]>") {
        sections.push(format!("{}]]", &rest[..position]));
        rest = &rest[position + 2..];
    }

    sections.push(rest.to_string());
    sections
}

pub(crate) fn into_string(writer: Writer<Vec<u8>>) -> Result<String, RenderError> {
    String::from_utf8(writer.into_inner()).map_err(|err| RenderError {
        msg: format!("{err:?}"),
    })
}
