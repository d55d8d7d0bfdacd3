use super::views;
use super::DbConn;
use crate::config::Config;
use crate::db::feed_entries;
use crate::tagging::{self, TaggingError};
use rocket::form::Form;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::content::RawHtml;
use rocket::response::{self, Redirect, Responder};
use rocket::State;

#[derive(FromForm, Debug)]
pub struct TagForm {
    pub tags: String,
}

/// The error view, rendered with the status matching the failure.
#[derive(Debug)]
pub struct ErrorView {
    pub status: Status,
    pub message: String,
}

impl From<TaggingError> for ErrorView {
    fn from(error: TaggingError) -> Self {
        let status = match error {
            TaggingError::EntryNotFound
            | TaggingError::TagNotFound
            | TaggingError::TagNotAssociated => Status::NotFound,
            TaggingError::EmptyTagName => Status::UnprocessableEntity,
            TaggingError::Db { .. } => {
                log::error!("{}", error);

                Status::InternalServerError
            }
        };

        ErrorView {
            status,
            message: error.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorView {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        (self.status, RawHtml(views::render_error(&self.message))).respond_to(request)
    }
}

#[get("/")]
pub async fn index(conn: DbConn, config: &State<Config>) -> Result<RawHtml<String>, ErrorView> {
    let entries = conn
        .run(|conn| feed_entries::find_entries(conn, None, None))
        .await
        .map_err(|err| {
            log::error!("Failed to load entries: {:?}", err);

            ErrorView {
                status: Status::InternalServerError,
                message: "Failed to load entries!".to_string(),
            }
        })?;

    match views::render_index(config, &entries) {
        Ok(body) => Ok(RawHtml(body)),
        Err(err) => {
            log::error!("Failed to render index {:?}", err);

            Err(ErrorView {
                status: Status::InternalServerError,
                message: "Failed to render entries!".to_string(),
            })
        }
    }
}

#[post("/tag_entry/<entry_id>", data = "<form>")]
pub async fn tag_entry(
    conn: DbConn,
    entry_id: i32,
    form: Form<TagForm>,
) -> Result<Redirect, ErrorView> {
    let name = form.into_inner().tags;

    conn.run(move |conn| tagging::attach_tag(conn, entry_id, &name))
        .await?;

    Ok(Redirect::to("/"))
}

#[delete("/delete_tag/<entry_id>/<tag_id>")]
pub async fn delete_tag(conn: DbConn, entry_id: i32, tag_id: i32) -> Result<Redirect, ErrorView> {
    detach(conn, entry_id, tag_id).await
}

/// HTML forms can't send DELETE.
#[post("/delete_tag/<entry_id>/<tag_id>")]
pub async fn delete_tag_by_post(
    conn: DbConn,
    entry_id: i32,
    tag_id: i32,
) -> Result<Redirect, ErrorView> {
    detach(conn, entry_id, tag_id).await
}

async fn detach(conn: DbConn, entry_id: i32, tag_id: i32) -> Result<Redirect, ErrorView> {
    conn.run(move |conn| tagging::detach_tag(conn, entry_id, tag_id))
        .await?;

    Ok(Redirect::to("/"))
}
