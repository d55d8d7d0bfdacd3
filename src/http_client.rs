use crate::config::Config;
use isahc::config::RedirectPolicy;
use isahc::prelude::*;
use isahc::HttpClient;
use std::time::Duration;

const USER_AGENT: &str = "re_feed";

pub fn client(config: &Config) -> Result<HttpClient, isahc::Error> {
    HttpClient::builder()
        .redirect_policy(RedirectPolicy::Limit(10))
        .timeout(request_timeout_seconds(config))
        .default_header("User-Agent", USER_AGENT)
        .build()
}

fn request_timeout_seconds(config: &Config) -> Duration {
    Duration::from_secs(config.request_timeout_in_seconds)
}
