use super::{into_string, write_cdata, write_event, RenderError};
use crate::models::FeedEntryWithTags;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub fn render<'a>(
    title: &str,
    base_url: &str,
    entries: impl Iterator<Item = &'a FeedEntryWithTags>,
) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_event(
        &mut writer,
        Event::Start(BytesStart::new("rss").with_attributes([("version", "2.0")])),
    )?;
    write_event(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", BytesText::new(title))?;
    write_text_element(&mut writer, "link", BytesText::new(base_url))?;
    write_text_element(&mut writer, "description", BytesText::new(title))?;

    for item in entries {
        write_item(&mut writer, item)?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("rss")))?;

    into_string(writer)
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &FeedEntryWithTags) -> Result<(), RenderError> {
    let entry = &item.entry;

    write_event(writer, Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", BytesText::from_escaped(entry.title.as_str()))?;
    write_text_element(writer, "link", BytesText::new(&entry.link))?;
    write_event(writer, Event::Start(BytesStart::new("description")))?;
    write_cdata(writer, &entry.description)?;
    write_event(writer, Event::End(BytesEnd::new("description")))?;

    for tag in &item.tags {
        write_event(
            writer,
            Event::Empty(BytesStart::new("category").with_attributes([("term", tag.name.as_str())])),
        )?;
    }

    write_event(writer, Event::End(BytesEnd::new("item")))
}

pub(crate) fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: BytesText,
) -> Result<(), RenderError> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(text))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}
