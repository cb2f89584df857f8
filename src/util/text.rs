use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Entity replacements applied by [`strip_html_tags`], in application order.
///
/// `&amp;` comes after every entity that itself begins with `&`, so an escaped
/// entity such as `&amp;lt;` decodes once to `&lt;` and no further.
const ENTITIES: [(&str, &str); 8] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
    ("&nbsp;", " "),
    ("&copy;", "©"),
    ("&reg;", "®"),
];

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex"))
}

/// Converts an HTML fragment (such as an RSS `<description>`) into plain text.
///
/// Every `<...>` run is removed without regard to nesting, then a fixed set of
/// named entities is decoded. Other entity references are left untouched.
///
/// # Examples
///
/// ```
/// use gnews::util::strip_html_tags;
///
/// assert_eq!(strip_html_tags("<b>A &amp; B</b>"), "A & B");
/// assert_eq!(strip_html_tags("<i>x</i>"), "x");
/// assert_eq!(strip_html_tags("5 &euro;"), "5 &euro;");
/// ```
pub fn strip_html_tags(text: &str) -> String {
    let stripped = tag_pattern().replace_all(text, "");
    ENTITIES
        .iter()
        .fold(stripped.into_owned(), |acc, (entity, replacement)| {
            if acc.contains(entity) {
                acc.replace(entity, replacement)
            } else {
                acc
            }
        })
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0b}' | '\u{0c}' | '\u{0e}'..='\u{1f}' | '\u{7f}')
}

/// Removes terminal control characters and ANSI escape sequences.
///
/// Feed text is untrusted; this runs before anything is written to a terminal.
/// Tab, newline and carriage return are kept. CSI sequences (`ESC [` ... final
/// byte) and OSC sequences (`ESC ]` ... BEL or `ESC \`) are dropped whole.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '\u{1b}' || is_control(c)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\u{07}' {
                            break;
                        }
                        if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}
