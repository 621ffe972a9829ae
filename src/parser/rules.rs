use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::text::decode_entities;

static CDATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// A named extraction rule: a pattern whose `value` group is the field.
pub struct FieldRule {
    name: &'static str,
    re: Regex,
}

impl FieldRule {
    /// Patterns are compile-time constants; a bad one is a programming error.
    pub fn new(name: &'static str, pattern: &str) -> Self {
        let re = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid pattern for rule {name}: {e}"));
        assert!(
            re.capture_names().flatten().any(|n| n == "value"),
            "rule {name} has no `value` group"
        );
        FieldRule { name, re }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First match, left to right.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.re
            .captures(text)
            .and_then(|c| c.name("value"))
            .map(|m| m.as_str())
    }

    /// Every non-overlapping match, in document order.
    pub fn capture_all<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = &'t str> + 'r
    where
        't: 'r,
    {
        self.re
            .captures_iter(text)
            .filter_map(|c| c.name("value").map(|m| m.as_str()))
    }
}

/// An XML element that may carry its text either as CDATA or as plain
/// (entity-escaped) text. CDATA wins when both forms are present.
pub struct ElementRule {
    cdata: FieldRule,
    plain: FieldRule,
}

impl ElementRule {
    pub fn new(name: &'static str, tag: &str) -> Self {
        let tag = regex::escape(tag);
        ElementRule {
            cdata: FieldRule::new(
                name,
                &format!(r"(?s)<{tag}>\s*<!\[CDATA\[(?P<value>.*?)\]\]>\s*</{tag}>"),
            ),
            plain: FieldRule::new(name, &format!(r"(?s)<{tag}>(?P<value>.*?)</{tag}>")),
        }
    }

    /// Element text with CDATA taken literally and plain text XML-unescaped.
    /// An element holding only CDATA wins over any plain one; CDATA mixed
    /// with plain text is unwrapped in place.
    pub fn extract<'t>(&self, body: &'t str) -> Option<Cow<'t, str>> {
        if let Some(raw) = self.cdata.capture(body) {
            return Some(Cow::Borrowed(raw));
        }
        let content = self.plain.capture(body)?;
        if !content.contains("<![CDATA[") {
            return Some(unescape_text(content));
        }

        let mut text = String::with_capacity(content.len());
        let mut last = 0;
        for caps in CDATA_RE.captures_iter(content) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            text.push_str(&unescape_text(&content[last..whole.start()]));
            text.push_str(inner.as_str());
            last = whole.end();
        }
        text.push_str(&unescape_text(&content[last..]));
        Some(Cow::Owned(text))
    }
}

/// XML-unescape plain element text. When quick-xml rejects an entity it
/// does not know (e.g. `&eacute;`), only the known ones are decoded and the
/// rest are kept as written.
fn unescape_text(raw: &str) -> Cow<'_, str> {
    match quick_xml::escape::unescape(raw) {
        Ok(text) => text,
        Err(_) => Cow::Owned(decode_entities(raw)),
    }
}
