table! {
    changes (id) {
        id -> Integer,
        updated -> Timestamp,
    }
}

table! {
    feed_entries (id) {
        id -> Integer,
        source_id -> Text,
        title -> Text,
        link -> Text,
        published_at -> Timestamp,
        description -> Text,
    }
}

table! {
    feed_entry_tags (id) {
        id -> Integer,
        feed_entry_id -> Integer,
        tag_id -> Integer,
    }
}

table! {
    tags (id) {
        id -> Integer,
        name -> Text,
    }
}

joinable!(feed_entry_tags -> feed_entries (feed_entry_id));
joinable!(feed_entry_tags -> tags (tag_id));

allow_tables_to_appear_in_same_query!(changes, feed_entries, feed_entry_tags, tags,);
