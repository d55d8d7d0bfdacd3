use super::params::{BaseUrl, FeedParams};
use super::{DbConn, FeedExtension};
use crate::config::Config;
use crate::db::changes::{self, TAG_CHANGES_ID};
use crate::db::feed_entries;
use crate::models::{Change, FeedEntryWithTags};
use crate::render::{FeedFormat, FeedRenderer, RenderedFeed, RenderError};
use rocket::http::{ContentType, Status};
use rocket::State;

type FeedResponse = Result<(ContentType, String), Status>;

#[get("/get_feed_rss/<params..>")]
pub async fn rss(
    conn: DbConn,
    params: FeedParams,
    base_url: BaseUrl,
    config: &State<Config>,
) -> FeedResponse {
    let (entries, _) = load_entries(&conn, params, false).await?;

    let renderer = FeedRenderer::builder()
        .entries(entries)
        .title(config.feed_title.as_str())
        .base_url(base_url.0)
        .build();

    respond(renderer.render(FeedFormat::Rss))
}

#[get("/get_feed_atom/<params..>")]
pub async fn atom(
    conn: DbConn,
    params: FeedParams,
    base_url: BaseUrl,
    config: &State<Config>,
) -> FeedResponse {
    let (entries, change) = load_entries(&conn, params, true).await?;

    let renderer = FeedRenderer::builder()
        .entries(entries)
        .title(config.feed_title.as_str())
        .base_url(base_url.0)
        .updated(change.map(|change| change.updated).unwrap_or_else(crate::db::current_time))
        .build();

    respond(renderer.render(FeedFormat::Atom))
}

#[get("/get_feed_json/<params..>")]
pub async fn json(
    conn: DbConn,
    params: FeedParams,
    extension: &State<FeedExtension>,
) -> FeedResponse {
    let (entries, _) = load_entries(&conn, params, false).await?;

    let renderer = FeedRenderer::builder()
        .entries(entries)
        .extension(extension.0.as_ref())
        .build();

    respond(renderer.render(FeedFormat::Json))
}

/// Loads the requested entries. The Atom feed also needs the change record,
/// which is created on the first request if no tag was mutated yet.
async fn load_entries(
    conn: &DbConn,
    params: FeedParams,
    with_change: bool,
) -> Result<(Vec<FeedEntryWithTags>, Option<Change>), Status> {
    let result = conn
        .run(move |conn| {
            let change = if with_change {
                Some(changes::find_or_touch(conn, TAG_CHANGES_ID))
            } else {
                None
            };

            feed_entries::find_entries(conn, params.tag.as_deref(), params.limit)
                .map(|entries| (entries, change))
        })
        .await;

    result.map_err(|err| {
        log::error!("Failed to load feed entries: {:?}", err);

        Status::InternalServerError
    })
}

fn respond(rendered: Result<RenderedFeed, RenderError>) -> FeedResponse {
    match rendered {
        Ok(feed) => {
            let content_type =
                ContentType::parse_flexible(feed.content_type).unwrap_or(ContentType::XML);

            Ok((content_type, feed.body))
        }
        Err(err) => {
            log::error!("{}", err);

            Err(Status::InternalServerError)
        }
    }
}
