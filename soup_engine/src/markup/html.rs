//! HTML escaping and the inverse used by the stripping round-trip

/// Escape text for an element body or a single-quoted attribute
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a literal text chunk; spaces become `&nbsp;` so whitespace survives display
pub fn escape_text_chunk(text: &str) -> String {
    escape(text).replace(' ', "&nbsp;")
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

/// Remove every tag, turn `<br>` into a newline and decode entities
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '<' => {
                let Some(close) = rest.find('>') else {
                    out.push_str(rest);
                    break;
                };
                if &rest[..=close] == "<br>" {
                    out.push('\n');
                }
                rest = &rest[close + 1..];
            }
            '&' => {
                let decoded = rest
                    .find(';')
                    .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
                match decoded {
                    Some((c, semi)) => {
                        out.push(c);
                        rest = &rest[semi + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href='x'>&\""), "&lt;a href=&#39;x&#39;&gt;&amp;&quot;");
        assert_eq!(escape_text_chunk(" a b "), "&nbsp;a&nbsp;b&nbsp;");
    }

    #[test]
    fn test_strip_markup() {
        let html = "<span class='list'>(a&nbsp;&lt;b&gt;)</span><br><span class='error' data-message='x &amp; y'></span><br>";
        assert_eq!(strip_markup(html), "(a <b>)\n\n");
    }

    #[test]
    fn test_strip_keeps_unknown_ampersand() {
        assert_eq!(strip_markup("a & b"), "a & b");
    }
}
