use crate::config::Config;
use crate::models::FeedEntryWithTags;
use handlebars::Handlebars;
use serde_json::json;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");
const ERROR_TEMPLATE: &str = include_str!("../../templates/error.hbs");

pub fn render_index(
    config: &Config,
    entries: &[FeedEntryWithTags],
) -> Result<String, handlebars::RenderError> {
    let entries: Vec<_> = entries
        .iter()
        .map(|item| {
            json!({
                "id": item.entry.id,
                "title": item.entry.title,
                "link": item.entry.link,
                "published_at": item.entry.published_at.format("%Y-%m-%d %H:%M").to_string(),
                "tags": item.tags,
            })
        })
        .collect();

    let data = json!({
        "feed_title": config.feed_title,
        "logo": config.logo,
        "footer_logo": config.footer_logo,
        "entries": entries,
    });

    Handlebars::new().render_template(INDEX_TEMPLATE, &data)
}

/// Falls back to the bare message if the template can't be rendered.
pub fn render_error(message: &str) -> String {
    match Handlebars::new().render_template(ERROR_TEMPLATE, &json!({ "message": message })) {
        Ok(body) => body,
        Err(error) => {
            log::error!("Failed to render error view {:?}", error);

            message.to_string()
        }
    }
}
