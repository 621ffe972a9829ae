use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"&(?:#(?P<dec>0*(?:34|38|39|60|62))|#[xX](?P<hex>0*(?:22|26|27|3[cC]|3[eE]))|(?P<name>amp|lt|gt|quot|apos));",
    )
    .unwrap()
});
static TITLE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+),\s*(\d{4})$").unwrap());

/// Decode the handful of entities the site's markup uses (apostrophe,
/// ampersand, angle brackets, double quote), in named, decimal and hex
/// form. Anything else is left as-is.
///
/// Single pass, so `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures| match entity_char(caps) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn entity_char(caps: &Captures) -> Option<char> {
    if let Some(name) = caps.name("name") {
        return match name.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => None,
        };
    }
    let code = match (caps.name("dec"), caps.name("hex")) {
        (Some(dec), _) => dec.as_str().parse().ok()?,
        (_, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok()?,
        _ => return None,
    };
    char::from_u32(code)
}

/// Split `"Title, 1999"` into `("Title", Some("1999"))`.
///
/// Anchored at the end: only a trailing `, <4 digits>` counts, earlier commas
/// stay in the title.
pub fn split_title_year(full: &str) -> (String, Option<String>) {
    let full = full.trim();
    if let Some(caps) = TITLE_YEAR_RE.captures(full) {
        let title = caps[1].trim();
        if !title.is_empty() {
            return (title.to_string(), Some(caps[2].to_string()));
        }
    }
    (full.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_entities() {
        assert_eq!(
            decode_entities("Tom &amp; Jerry&#039;s &quot;Big&quot; &lt;Day&gt;"),
            "Tom & Jerry's \"Big\" <Day>"
        );
        assert_eq!(decode_entities("It&#39;s &apos;fine&apos;"), "It's 'fine'");
    }

    #[test]
    fn decodes_numeric_forms_of_every_known_char() {
        assert_eq!(
            decode_entities("A &#38; B &#60;x&#62; &#34;q&#34; &#039;"),
            "A & B <x> \"q\" '"
        );
        assert_eq!(
            decode_entities("&#x26; &#x3c;&#X3E; &#x22;&#x27; &#x3C;"),
            "& <> \"' <"
        );
    }

    #[test]
    fn other_numeric_entities_pass_through() {
        assert_eq!(decode_entities("Am&#233;lie &#x2019;"), "Am&#233;lie &#x2019;");
    }

    #[test]
    fn unknown_entities_pass_through() {
        assert_eq!(
            decode_entities("Am&eacute;lie &amp; Friends"),
            "Am&eacute;lie & Friends"
        );
    }

    #[test]
    fn decoding_is_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn splits_trailing_year() {
        assert_eq!(
            split_title_year("Pulp Fiction, 1994"),
            ("Pulp Fiction".to_string(), Some("1994".to_string()))
        );
    }

    #[test]
    fn keeps_inner_commas() {
        assert_eq!(
            split_title_year("Hello, My Name Is Doris, 2015"),
            ("Hello, My Name Is Doris".to_string(), Some("2015".to_string()))
        );
        assert_eq!(
            split_title_year("Crouching Tiger, Hidden Dragon"),
            ("Crouching Tiger, Hidden Dragon".to_string(), None)
        );
    }

    #[test]
    fn year_must_be_at_the_end() {
        assert_eq!(split_title_year("1917"), ("1917".to_string(), None));
        assert_eq!(
            split_title_year("Blade Runner, 2049 Cut"),
            ("Blade Runner, 2049 Cut".to_string(), None)
        );
        assert_eq!(split_title_year(", 1999"), (", 1999".to_string(), None));
    }
}
