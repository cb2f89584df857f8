//! Feed document parsing and projection into [`NewsResponse`].
//!
//! The document is first read into raw structs that keep every child element
//! as a `Vec`, because RSS does not forbid repeating any of them. The
//! projection then asks for exactly one value wherever the response needs a
//! single field, so a missing or duplicated element fails loudly instead of
//! being silently defaulted or truncated.
//!
//! Element text is kept exactly as the feed has it, surrounding whitespace
//! included. Only XML escapes and CDATA sections are resolved.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::fetcher::FetchError;
use super::types::{FeedMetadata, NewsItem, NewsResponse, DEFAULT_SOURCE};
use crate::util::strip_html_tags;

#[derive(Debug, Default)]
struct RawRss {
    channel: Vec<RawChannel>,
}

#[derive(Debug, Default)]
struct RawChannel {
    title: Vec<String>,
    generator: Vec<String>,
    language: Vec<String>,
    last_build_date: Vec<String>,
    item: Vec<RawItem>,
}

#[derive(Debug, Default)]
struct RawItem {
    title: Vec<String>,
    link: Vec<String>,
    pub_date: Vec<String>,
    description: Vec<String>,
    source: Vec<RawSource>,
}

#[derive(Debug)]
struct RawSource {
    url: Option<String>,
    name: String,
}

/// What an element is, judged by its full path from the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Channel,
    Item,
    Source,
    Text,
    Other,
}

fn node(path: &[String]) -> Node {
    let names: Vec<&str> = path.iter().map(String::as_str).collect();
    match names.as_slice() {
        ["rss", "channel"] => Node::Channel,
        ["rss", "channel", "item"] => Node::Item,
        ["rss", "channel", "item", "source"] => Node::Source,
        ["rss", "channel", "title" | "generator" | "language" | "lastBuildDate"] => Node::Text,
        ["rss", "channel", "item", "title" | "link" | "pubDate" | "description"] => Node::Text,
        _ => Node::Other,
    }
}

/// Builds a [`RawRss`] from reader events.
#[derive(Debug, Default)]
struct Collector {
    rss: RawRss,
    path: Vec<String>,
    text: Option<String>,
    source_url: Option<String>,
}

impl Collector {
    fn is_collecting(&self) -> bool {
        self.text.is_some()
    }

    fn open(&mut self, name: String, source_url: Option<String>) {
        self.path.push(name);
        match node(&self.path) {
            Node::Channel => self.rss.channel.push(RawChannel::default()),
            Node::Item => {
                if let Some(channel) = self.rss.channel.last_mut() {
                    channel.item.push(RawItem::default());
                }
            }
            Node::Source => {
                self.source_url = source_url;
                self.text = Some(String::new());
            }
            Node::Text => self.text = Some(String::new()),
            Node::Other => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        // Text of nested markup counts toward the enclosing field
        if let Some(buffer) = self.text.as_mut() {
            buffer.push_str(text);
        }
    }

    fn close(&mut self) {
        match node(&self.path) {
            Node::Text => {
                let value = self.text.take().unwrap_or_default();
                if let Some(slot) = self.text_slot() {
                    slot.push(value);
                }
            }
            Node::Source => {
                let source = RawSource {
                    url: self.source_url.take(),
                    name: self.text.take().unwrap_or_default(),
                };
                if let Some(item) = self.current_item() {
                    item.source.push(source);
                }
            }
            _ => {}
        }
        self.path.pop();
    }

    fn current_item(&mut self) -> Option<&mut RawItem> {
        self.rss.channel.last_mut()?.item.last_mut()
    }

    fn text_slot(&mut self) -> Option<&mut Vec<String>> {
        let channel = self.rss.channel.last_mut()?;
        match (self.path.len(), self.path.last()?.as_str()) {
            (3, "title") => Some(&mut channel.title),
            (3, "generator") => Some(&mut channel.generator),
            (3, "language") => Some(&mut channel.language),
            (3, "lastBuildDate") => Some(&mut channel.last_build_date),
            (4, field) => {
                let item = channel.item.last_mut()?;
                match field {
                    "title" => Some(&mut item.title),
                    "link" => Some(&mut item.link),
                    "pubDate" => Some(&mut item.pub_date),
                    "description" => Some(&mut item.description),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Returns the element name and, for `<source>`, its `url` attribute.
fn element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<(String, Option<String>), String> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    if name != "source" {
        return Ok((name, None));
    }

    let url = match e.try_get_attribute("url").map_err(|e| e.to_string())? {
        Some(attr) => Some(
            attr.decode_and_unescape_value(reader.decoder())
                .map_err(|e| e.to_string())?
                .into_owned(),
        ),
        None => None,
    };
    Ok((name, url))
}

/// Reads the document into its raw, repeat-tolerant shape.
///
/// quick-xml does not expand `<!ENTITY>` declarations, so only the five XML
/// builtins and character references are resolved in text.
fn read_document(xml: &str) -> Result<RawRss, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut collector = Collector::default();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let (name, url) = element(&e, &reader)?;
                collector.open(name, url);
            }
            Event::Empty(e) => {
                let (name, url) = element(&e, &reader)?;
                collector.open(name, url);
                collector.close();
            }
            Event::End(_) => collector.close(),
            Event::Text(e) if collector.is_collecting() => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                collector.push_text(&text);
            }
            Event::CData(e) if collector.is_collecting() => {
                collector.push_text(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = collector.path.last() {
        return Err(format!("unexpected end of document inside <{open}>"));
    }

    Ok(collector.rss)
}

/// Extracts the one value of a repeatable element that must appear exactly once.
fn single<T>(mut values: Vec<T>, element: &str) -> Result<T, String> {
    match values.len() {
        1 => Ok(values.swap_remove(0)),
        found => Err(format!(
            "expected exactly one <{element}> element, found {found}"
        )),
    }
}

/// Parses a feed body and projects it into a [`NewsResponse`].
///
/// Malformed XML, a missing `<channel>`, and missing or repeated required
/// children all produce [`FetchError::Parse`]. A channel without `<item>`
/// elements yields an empty item list.
pub fn parse_feed(xml: &str) -> Result<NewsResponse, FetchError> {
    let rss = read_document(xml).map_err(FetchError::parse)?;
    let channel = single(rss.channel, "channel").map_err(FetchError::parse)?;

    let items = channel
        .item
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            project_item(item).map_err(|reason| FetchError::parse(format!("item {index}: {reason}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = FeedMetadata {
        last_build_date: single(channel.last_build_date, "lastBuildDate").map_err(FetchError::parse)?,
        generator: single(channel.generator, "generator").map_err(FetchError::parse)?,
        title: single(channel.title, "title").map_err(FetchError::parse)?,
        language: single(channel.language, "language").map_err(FetchError::parse)?,
    };

    Ok(NewsResponse { items, metadata })
}

fn project_item(item: RawItem) -> Result<NewsItem, String> {
    // <source> is optional; the first one wins if a feed repeats it
    let (source, source_url) = match item.source.into_iter().next() {
        Some(RawSource { url, name }) if !name.is_empty() => (name, url),
        Some(RawSource { url, .. }) => (DEFAULT_SOURCE.to_string(), url),
        None => (DEFAULT_SOURCE.to_string(), None),
    };

    Ok(NewsItem {
        title: single(item.title, "title")?,
        link: single(item.link, "link")?,
        pub_date: single(item.pub_date, "pubDate")?,
        description: strip_html_tags(&single(item.description, "description")?),
        source,
        source_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item_xml(n: usize) -> String {
        format!(
            r##"<item>
      <title>Headline {n} - Example Times</title>
      <link>https://news.google.com/rss/articles/{n}?oc=5</link>
      <guid isPermaLink="false">{n}</guid>
      <pubDate>Mon, 0{n} Apr 2024 08:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/{n}"&gt;Headline {n}&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Example Times&lt;/font&gt;</description>
      <source url="https://example.com">Example Times</source>
    </item>"##
        )
    }

    fn feed_xml(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss xmlns:media="http://search.yahoo.com/mrss/" version="2.0">
  <channel>
    <generator>NFE/5.0</generator>
    <title>Top stories - Google News</title>
    <link>https://news.google.com/?hl=en-US&amp;gl=US&amp;ceid=US:en</link>
    <language>en-US</language>
    <webMaster>news-webmaster@google.com</webMaster>
    <copyright>2024 Google Inc.</copyright>
    <lastBuildDate>Mon, 01 Apr 2024 09:00:00 GMT</lastBuildDate>
    <image>
      <title>Google News</title>
      <url>https://lh3.googleusercontent.com/logo.png</url>
      <link>https://news.google.com/</link>
    </image>
    <description>Google News</description>
    {items}
  </channel>
</rss>"#
        )
    }

    #[test]
    fn test_parse_metadata() {
        let response = parse_feed(&feed_xml(&item_xml(1))).unwrap();
        assert_eq!(
            response.metadata,
            FeedMetadata {
                last_build_date: "Mon, 01 Apr 2024 09:00:00 GMT".into(),
                generator: "NFE/5.0".into(),
                title: "Top stories - Google News".into(),
                language: "en-US".into(),
            }
        );
    }

    #[test]
    fn test_parse_item_fields() {
        let response = parse_feed(&feed_xml(&item_xml(1))).unwrap();
        assert_eq!(
            response.items,
            vec![NewsItem {
                title: "Headline 1 - Example Times".into(),
                link: "https://news.google.com/rss/articles/1?oc=5".into(),
                pub_date: "Mon, 01 Apr 2024 08:00:00 GMT".into(),
                description: "Headline 1  Example Times".into(),
                source: "Example Times".into(),
                source_url: Some("https://example.com".into()),
            }]
        );
    }

    #[test]
    fn test_item_order_preserved() {
        let items: String = (1..=5).map(item_xml).collect();
        let response = parse_feed(&feed_xml(&items)).unwrap();
        let titles: Vec<_> = response.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Headline 1 - Example Times",
                "Headline 2 - Example Times",
                "Headline 3 - Example Times",
                "Headline 4 - Example Times",
                "Headline 5 - Example Times",
            ]
        );
    }

    #[test]
    fn test_channel_without_items_is_empty() {
        let response = parse_feed(&feed_xml("")).unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.metadata.generator, "NFE/5.0");
    }

    #[test]
    fn test_missing_source_uses_fallback() {
        let item = r#"<item><title>t</title><link>l</link><pubDate>d</pubDate><description>x</description></item>"#;
        let response = parse_feed(&feed_xml(item)).unwrap();
        assert_eq!(response.items[0].source, DEFAULT_SOURCE);
        assert_eq!(response.items[0].source_url, None);
    }

    #[test]
    fn test_empty_source_uses_fallback() {
        let item = r#"<item><title>t</title><link>l</link><pubDate>d</pubDate><description>x</description><source url="https://a.example"></source></item>"#;
        let response = parse_feed(&feed_xml(item)).unwrap();
        assert_eq!(response.items[0].source, "Google News");
        assert_eq!(
            response.items[0].source_url.as_deref(),
            Some("https://a.example")
        );
    }

    #[test]
    fn test_cdata_description_is_stripped() {
        let item = r#"<item><title>t</title><link>l</link><pubDate>d</pubDate><description><![CDATA[<p>Rust &amp; <b>Tokio</b></p>]]></description></item>"#;
        let response = parse_feed(&feed_xml(item)).unwrap();
        assert_eq!(response.items[0].description, "Rust & Tokio");
    }

    #[test]
    fn test_title_passed_through_unmodified() {
        let item = r#"<item><title>A &lt;b&gt; B</title><link>l</link><pubDate>d</pubDate><description>x</description></item>"#;
        let response = parse_feed(&feed_xml(item)).unwrap();
        // XML unescaping only; no tag stripping on titles
        assert_eq!(response.items[0].title, "A <b> B");
    }

    #[test]
    fn test_text_whitespace_preserved() {
        let item = "<item><title>  padded title  </title><link>\n  l\n</link><pubDate> d </pubDate><description>x</description></item>";
        let xml = format!(
            "<rss><channel><title>  T  </title><generator>g</generator><language>ja</language><lastBuildDate>d</lastBuildDate>{item}</channel></rss>"
        );
        let response = parse_feed(&xml).unwrap();
        assert_eq!(response.metadata.title, "  T  ");
        assert_eq!(response.items[0].title, "  padded title  ");
        assert_eq!(response.items[0].link, "\n  l\n");
        assert_eq!(response.items[0].pub_date, " d ");
    }

    #[test]
    fn test_source_name_whitespace_is_kept() {
        let item = r#"<item><title>t</title><link>l</link><pubDate>d</pubDate><description>x</description><source url="u"> NHK </source></item>"#;
        let response = parse_feed(&feed_xml(item)).unwrap();
        assert_eq!(response.items[0].source, " NHK ");
    }

    #[test]
    fn test_self_closing_source_uses_fallback() {
        let item = r#"<item><title>t</title><link>l</link><pubDate>d</pubDate><description>x</description><source url="https://b.example"/></item>"#;
        let response = parse_feed(&feed_xml(item)).unwrap();
        assert_eq!(response.items[0].source, DEFAULT_SOURCE);
        assert_eq!(
            response.items[0].source_url.as_deref(),
            Some("https://b.example")
        );
    }

    #[test]
    fn test_empty_element_is_empty_string() {
        let item = "<item><title/><link>l</link><pubDate>d</pubDate><description></description></item>";
        let response = parse_feed(&feed_xml(item)).unwrap();
        assert_eq!(response.items[0].title, "");
        assert_eq!(response.items[0].description, "");
    }

    #[test]
    fn test_image_title_not_mistaken_for_channel_title() {
        // feed_xml carries <image><title>Google News</title></image>
        let response = parse_feed(&feed_xml("")).unwrap();
        assert_eq!(response.metadata.title, "Top stories - Google News");
    }

    #[test]
    fn test_repeats_split_by_other_elements_are_counted() {
        let item = "<item><title>a</title><link>l</link><title>b</title><pubDate>d</pubDate><description>x</description></item>";
        let err = parse_feed(&feed_xml(item)).unwrap_err();
        assert!(err.to_string().contains("<title> element, found 2"), "{err}");
    }

    #[test]
    fn test_unclosed_document_is_parse_error() {
        let err = parse_feed("<rss><channel><title>t</title>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_invalid_xml_is_parse_error() {
        assert!(matches!(parse_feed("invalid xml"), Err(FetchError::Parse(_))));
        assert!(matches!(
            parse_feed("<rss><channel><title>x</channel></rss>"),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_channel_is_parse_error() {
        let err = parse_feed(r#"<rss version="2.0"></rss>"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse RSS feed: expected exactly one <channel> element, found 0"
        );
    }

    #[test]
    fn test_missing_metadata_field_is_parse_error() {
        let xml = r#"<rss><channel><title>t</title><language>ja</language><lastBuildDate>d</lastBuildDate></channel></rss>"#;
        let err = parse_feed(xml).unwrap_err();
        assert!(err.to_string().contains("<generator>"), "{err}");
    }

    #[test]
    fn test_missing_item_field_reports_index() {
        let items = format!(
            "{}<item><title>t</title><pubDate>d</pubDate><description>x</description></item>",
            item_xml(1)
        );
        let err = parse_feed(&feed_xml(&items)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse RSS feed: item 1: expected exactly one <link> element, found 0"
        );
    }

    #[test]
    fn test_duplicated_singleton_is_parse_error() {
        let item = r#"<item><title>a</title><title>b</title><link>l</link><pubDate>d</pubDate><description>x</description></item>"#;
        let err = parse_feed(&feed_xml(item)).unwrap_err();
        assert!(err.to_string().contains("found 2"), "{err}");
    }

    #[test]
    fn test_single_accessor() {
        assert_eq!(single(vec![7], "n"), Ok(7));
        assert!(single(Vec::<i32>::new(), "n").is_err());
        assert!(single(vec![1, 2], "n").is_err());
    }
}
