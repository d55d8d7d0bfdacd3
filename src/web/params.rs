use rocket::http::uri::fmt::Path;
use rocket::http::uri::Segments;
use crate::config::Config;
use rocket::request::{FromRequest, FromSegments, Outcome, Request};
use std::convert::Infallible;
use thiserror::Error;

/// Trailing path segments of a feed route: `[<tag>][/<limit>]`.
///
/// A single numeric segment is a limit, so a tag whose name is a number can
/// only be requested together with a limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedParams {
    pub tag: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedParamsError {
    #[error("`{0}` is not a valid limit")]
    BadLimit(String),
    #[error("too many path segments")]
    TooManySegments,
}

fn parse_limit(segment: &str) -> Result<i64, FeedParamsError> {
    segment
        .parse::<i64>()
        .map_err(|_| FeedParamsError::BadLimit(segment.to_string()))
}

impl FeedParams {
    pub fn from_parts(parts: &[&str]) -> Result<Self, FeedParamsError> {
        match parts {
            [] => Ok(FeedParams::default()),
            [single] => match single.parse::<i64>() {
                Ok(limit) => Ok(FeedParams {
                    tag: None,
                    limit: Some(limit),
                }),
                Err(_) => Ok(FeedParams {
                    tag: Some(single.to_string()),
                    limit: None,
                }),
            },
            [tag, limit] => Ok(FeedParams {
                tag: Some(tag.to_string()),
                limit: Some(parse_limit(limit)?),
            }),
            _ => Err(FeedParamsError::TooManySegments),
        }
    }
}

impl<'r> FromSegments<'r> for FeedParams {
    type Error = FeedParamsError;

    fn from_segments(segments: Segments<'r, Path>) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = segments.collect();

        FeedParams::from_parts(&parts)
    }
}

/// Absolute URL of the current request, used as the Atom feed id.
///
/// The configured `base_url` wins. Otherwise the scheme comes from
/// `X-Forwarded-Proto` (plain `http` without it) and the host from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(pub String);

const FORWARDED_PROTO_HEADER: &str = "X-Forwarded-Proto";

fn origin(request: &Request<'_>) -> String {
    let configured = request
        .rocket()
        .state::<Config>()
        .and_then(|config| config.base_url.as_deref())
        .map(|base_url| base_url.trim_end_matches('/').to_string());

    if let Some(base_url) = configured {
        return base_url;
    }

    let scheme = match request.headers().get_one(FORWARDED_PROTO_HEADER) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    let host = match request.host() {
        Some(host) => host.to_string(),
        None => "localhost".to_string(),
    };

    format!("{scheme}://{host}")
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BaseUrl {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(BaseUrl(format!("{}{}", origin(request), request.uri().path())))
    }
}
