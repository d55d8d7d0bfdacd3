use super::rss::write_text_element;
use super::{into_string, write_cdata, write_event, RenderError};
use crate::models::FeedEntryWithTags;
use chrono::NaiveDateTime;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Stored timestamps are UTC already, only the suffix is appended.
pub fn rfc_3339_date(date: &NaiveDateTime) -> String {
    format!("{}Z", date.format("%Y-%m-%dT%H:%M:%S"))
}

pub fn render<'a>(
    title: &str,
    base_url: &str,
    updated: NaiveDateTime,
    entries: impl Iterator<Item = &'a FeedEntryWithTags>,
) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_event(
        &mut writer,
        Event::Start(BytesStart::new("feed").with_attributes([("xmlns", ATOM_NAMESPACE)])),
    )?;

    write_text_element(&mut writer, "title", BytesText::new(title))?;
    write_text_element(&mut writer, "id", BytesText::new(base_url))?;
    write_text_element(
        &mut writer,
        "updated",
        BytesText::new(&rfc_3339_date(&updated)),
    )?;

    for item in entries {
        write_entry(&mut writer, item)?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("feed")))?;

    into_string(writer)
}

fn write_entry(writer: &mut Writer<Vec<u8>>, item: &FeedEntryWithTags) -> Result<(), RenderError> {
    let entry = &item.entry;

    write_event(writer, Event::Start(BytesStart::new("entry")))?;

    write_text_element(writer, "title", BytesText::from_escaped(entry.title.as_str()))?;
    write_text_element(writer, "id", BytesText::new(&entry.id.to_string()))?;
    write_event(
        writer,
        Event::Empty(BytesStart::new("link").with_attributes([
            ("href", entry.link.as_str()),
            ("rel", "alternate"),
            ("type", "text/html"),
        ])),
    )?;

    write_event(
        writer,
        Event::Start(BytesStart::new("content").with_attributes([("type", "html")])),
    )?;
    write_cdata(writer, &entry.description)?;
    write_event(writer, Event::End(BytesEnd::new("content")))?;

    for tag in &item.tags {
        write_event(
            writer,
            Event::Empty(BytesStart::new("category").with_attributes([("term", tag.name.as_str())])),
        )?;
    }

    write_event(writer, Event::End(BytesEnd::new("entry")))
}

#[cfg(test)]
mod tests {
    use crate::render::tests::entry;
    use chrono::NaiveDate;

    fn updated() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap()
    }

    #[test]
    fn it_formats_updated_with_z_suffix() {
        assert_eq!(super::rfc_3339_date(&updated()), "2024-03-04T05:06:07Z");
    }

    #[test]
    fn it_renders_feed_metadata() {
        let body = super::render(
            "My Feed",
            "http://localhost/get_feed_atom",
            updated(),
            std::iter::empty(),
        )
        .unwrap();

        assert!(body.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
        assert!(body.contains("<title>My Feed</title>"));
        assert!(body.contains("<id>http://localhost/get_feed_atom</id>"));
        assert!(body.contains("<updated>2024-03-04T05:06:07Z</updated>"));
        assert_eq!(body.matches("<entry>").count(), 0);
    }

    #[test]
    fn it_renders_entries() {
        let entries = vec![entry(7, &["news"])];

        let body = super::render("Feed", "http://localhost/", updated(), entries.iter()).unwrap();

        assert!(body.contains("<title>Entry 7</title>"));
        assert!(body.contains("<id>7</id>"));
        assert!(body.contains(
            "<link href=\"http://example.com/7\" rel=\"alternate\" type=\"text/html\"/>"
        ));
        assert!(body.contains("<content type=\"html\"><![CDATA[<p>Body 7</p>]]></content>"));
        assert!(body.contains("<category term=\"news\"/>"));
    }
}
