use super::SyncError;
use isahc::http::StatusCode;
use isahc::{HttpClient, Request};
use std::io;
use url::Url;

pub mod json;
pub mod rss;

/// A source item before normalization. `published_at` is the raw source value.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FetchedFeedItem {
    pub source_id: String,
    pub title: String,
    pub link: String,
    pub published_at: Option<String>,
    pub description: String,
}

/// Items are kept in the order the source returned them (newest first).
#[derive(Debug, Eq, PartialEq)]
pub struct FetchedFeed {
    pub items: Vec<FetchedFeedItem>,
}

pub trait ReadFeed {
    fn read(&self, client: &HttpClient) -> Result<FetchedFeed, SyncError> {
        let body = read_url(client, &self.url())?;

        self.read_from_bytes(&body)
    }

    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, SyncError>;

    fn url(&self) -> String;
}

pub fn validate_url(url: &str) -> Result<Url, SyncError> {
    if url.trim().is_empty() {
        return Err(SyncError::Config {
            msg: "Missing feed URL".to_string(),
        });
    }

    match Url::parse(url.trim()) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(parsed),
        Ok(parsed) => Err(SyncError::Config {
            msg: format!("Unsupported URL scheme `{}`", parsed.scheme()),
        }),
        Err(err) => Err(SyncError::Config {
            msg: format!("Missing or bad URL `{url}`: {err}"),
        }),
    }
}

pub fn read_url(client: &HttpClient, url: &str) -> Result<Vec<u8>, SyncError> {
    let url = validate_url(url)?;

    let request = match Request::get(url.as_str()).body(()) {
        Ok(request) => request,
        Err(err) => {
            return Err(SyncError::Config {
                msg: format!("Invalid URL: {err}"),
            })
        }
    };

    match client.send(request) {
        Ok(mut response) => {
            if response.status() != StatusCode::OK {
                return Err(SyncError::Fetch {
                    msg: format!("unexpected status {}", response.status().as_u16()),
                });
            }

            let mut writer: Vec<u8> = vec![];

            if let Err(err) = io::copy(response.body_mut(), &mut writer) {
                let msg = format!("{err:?}");

                return Err(SyncError::Fetch { msg });
            }

            Ok(writer)
        }
        Err(error) => {
            let msg = format!("{error:?}");

            Err(SyncError::Fetch { msg })
        }
    }
}
