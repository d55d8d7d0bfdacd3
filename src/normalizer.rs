use encoding_rs::WINDOWS_1252;
use once_cell::sync::Lazy;
use regex::Regex;

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:amp|lt|gt|quot|apos|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});").unwrap()
});

/// Repairs mis-decoded text and escapes markup characters.
///
/// `normalize(normalize(s)) == normalize(s)` for every input.
pub fn normalize(text: &str) -> String {
    let fixed = fix_encoding(text);

    escape_markup(&fixed)
}

/// Undoes UTF-8 text that was decoded as windows-1252 or latin-1, repeatedly,
/// until the text stops changing.
pub fn fix_encoding(text: &str) -> String {
    let mut current = text.to_string();

    while let Some(repaired) = redecode(&current) {
        current = repaired;
    }

    current
}

fn redecode(text: &str) -> Option<String> {
    if text.is_ascii() {
        return None;
    }

    let (bytes, _, had_unmappable_chars) = WINDOWS_1252.encode(text);

    let bytes = if had_unmappable_chars {
        latin1_bytes(text)?
    } else {
        bytes.into_owned()
    };

    match String::from_utf8(bytes) {
        Ok(repaired) if repaired.chars().count() < text.chars().count() => Some(repaired),
        _ => None,
    }
}

fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|character| u8::try_from(u32::from(character)).ok())
        .collect()
}

/// Escapes `<`, `>`, `&`, and quotes. References XML understands (the five
/// predefined entities and numeric references) are kept, any other `&` is escaped.
pub fn escape_markup(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for (index, character) in text.char_indices() {
        match character {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            '&' if ENTITY.is_match(&text[index..]) => result.push('&'),
            '&' => result.push_str("&amp;"),
            _ => result.push(character),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    #[test]
    fn it_keeps_correct_text() {
        assert_eq!(super::normalize("Héllo"), "Héllo");
        assert_eq!(super::normalize("café crème brûlée"), "café crème brûlée");
        assert_eq!(super::normalize("Ünïcödé — “quotes”"), "Ünïcödé — “quotes”");
        assert_eq!(super::normalize("日本語"), "日本語");
    }

    #[test]
    fn it_repairs_windows_1252_mojibake() {
        assert_eq!(super::fix_encoding("HÃ©llo"), "Héllo");
        assert_eq!(super::fix_encoding("donâ€™t"), "don’t");
    }

    #[test]
    fn it_repairs_double_encoded_text() {
        assert_eq!(super::fix_encoding("HÃƒÂ©llo"), "Héllo");
    }

    #[test]
    fn it_escapes_markup() {
        assert_eq!(
            super::normalize("<b>Fish & Chips</b>"),
            "&lt;b&gt;Fish &amp; Chips&lt;/b&gt;"
        );
        assert_eq!(
            super::normalize(r#"say "hi" it's"#),
            "say &quot;hi&quot; it&#x27;s"
        );
    }

    #[test]
    fn it_keeps_existing_references() {
        assert_eq!(super::escape_markup("AT&amp;T &#169; &#xA9;"), "AT&amp;T &#169; &#xA9;");
        assert_eq!(super::escape_markup("a && b &; c"), "a &amp;&amp; b &amp;; c");
    }

    #[test]
    fn it_escapes_html_only_entities() {
        assert_eq!(super::normalize("Breaking&nbsp;news"), "Breaking&amp;nbsp;news");
        assert_eq!(
            super::escape_markup("caf&eacute; &mdash; &apos;ok&apos;"),
            "caf&amp;eacute; &amp;mdash; &apos;ok&apos;"
        );
    }

    #[test]
    fn it_is_idempotent() {
        let inputs = [
            "Héllo",
            "HÃ©llo <World>",
            "Tom & Jerry's \"show\"",
            "donâ€™t & won't",
            "&lt;already&gt; escaped &amp; fine",
            "Breaking&nbsp;news &mdash; &#8212;",
            "",
        ];

        for input in inputs {
            let once = super::normalize(input);
            let twice = super::normalize(&once);

            assert_eq!(once, twice, "input: {input}");
        }
    }
}
