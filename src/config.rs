use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};
use std::env;

const CONFIG_PATH_VAR: &str = "RE_FEED_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "ReFeed.toml";
const ENV_PREFIX: &str = "RE_FEED_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub rss_feed_url: String,
    pub json_feed_url: String,
    pub fetch_mode: String,
    pub rss_published_at_format: String,
    pub json_published_at_format: String,
    pub feed_title: String,
    pub logo: Option<String>,
    pub footer_logo: Option<String>,
    /// Public scheme and host, e.g. `https://feeds.example.com`, used for feed ids.
    pub base_url: Option<String>,
    pub request_timeout_in_seconds: u64,
    pub fetch_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "re-feed.db".to_string(),
            rss_feed_url: "".to_string(),
            json_feed_url: "".to_string(),
            fetch_mode: "json".to_string(),
            rss_published_at_format: "%a, %d %b %Y %H:%M:%S %z".to_string(),
            json_published_at_format: "%Y-%m-%d %H:%M:%S".to_string(),
            feed_title: "My Feed".to_string(),
            logo: None,
            footer_logo: None,
            base_url: None,
            request_timeout_in_seconds: 30,
            fetch_on_start: true,
        }
    }
}

impl Config {
    /// Defaults, then the optional TOML file, then `RE_FEED_*` variables.
    pub fn figment() -> Figment {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, rocket::figment::Error> {
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, rocket::figment::Error> {
        figment.extract()
    }
}
