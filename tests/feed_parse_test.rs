use rss2dayone::feed::parse_feed;
use rss2dayone::post::parse_published_date;

mod common;

const LETTERBOXD_RSS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"
     xmlns:letterboxd="https://letterboxd.com"
     xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Letterboxd - someone</title>
    <link>https://letterboxd.com/someone/</link>
    <description>Letterboxd - someone</description>
    <item>
      <title>Film Name, 2000 - ★★★★</title>
      <link>https://letterboxd.com/someone/film/film-name/</link>
      <guid isPermaLink="false">letterboxd-review-1</guid>
      <pubDate>Sun, 30 Apr 2023 21:15:00 +1200</pubDate>
      <letterboxd:watchedDate>2023-04-30</letterboxd:watchedDate>
      <letterboxd:filmTitle>Film Name</letterboxd:filmTitle>
      <letterboxd:filmYear>2000</letterboxd:filmYear>
      <media:content url="https://img.test.invalid/poster.jpg?v=1" medium="image"/>
      <description><![CDATA[<p><img src="https://img.test.invalid/poster.jpg"/></p><p>Great.</p>]]></description>
    </item>
    <item>
      <title>Photo post</title>
      <link>https://blog.test.invalid/photo</link>
      <pubDate>Mon, 1 May 2023 09:00:00 +0000</pubDate>
      <enclosure url="https://blog.test.invalid/photo.png" length="1234" type="image/png"/>
      <description>A photo</description>
    </item>
    <item>
      <title>Orphan</title>
      <description>No guid and no link</description>
    </item>
  </channel>
</rss>"#;

const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <id>urn:example:feed</id>
  <updated>2023-05-02T10:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:example:entry-1</id>
    <link href="https://example.test.invalid/entry-1"/>
    <link rel="enclosure" href="https://example.test.invalid/pic.jpg" type="image/jpeg"/>
    <published>2023-05-02T09:30:00Z</published>
    <updated>2023-05-02T10:00:00Z</updated>
    <summary type="html">&lt;p&gt;Hello&lt;/p&gt;</summary>
  </entry>
</feed>"#;

#[test]
fn test_parse_rss_with_extensions() {
    common::init_tracing();

    let items = parse_feed(LETTERBOXD_RSS.as_bytes()).unwrap();
    assert_eq!(items.len(), 2);

    let review = &items[0];
    assert_eq!(review.guid, "letterboxd-review-1");
    assert_eq!(review.published, "Sun, 30 Apr 2023 21:15:00 +1200");
    assert!(review.description.contains("<img"));
    assert_eq!(review.extensions.get_first("letterboxd", "filmTitle"), Some("Film Name"));
    assert_eq!(review.extensions.get_first("letterboxd", "filmYear"), Some("2000"));
    assert_eq!(review.extensions.get_first("letterboxd", "watchedDate"), Some("2023-04-30"));

    let media = review.extensions.entries("media", "content");
    assert_eq!(media.len(), 1);
    assert_eq!(
        media[0].attrs.get("url").map(String::as_str),
        Some("https://img.test.invalid/poster.jpg?v=1")
    );

    // Falls back to the link when there is no guid.
    let photo = &items[1];
    assert_eq!(photo.guid, "https://blog.test.invalid/photo");
    assert_eq!(photo.enclosures, vec!["https://blog.test.invalid/photo.png"]);
    assert!(parse_published_date(&photo.published).is_some());
}

#[test]
fn test_parse_atom_fallback() {
    let items = parse_feed(ATOM.as_bytes()).unwrap();
    assert_eq!(items.len(), 1);

    let entry = &items[0];
    assert_eq!(entry.guid, "urn:example:entry-1");
    assert_eq!(entry.title, "Atom entry");
    assert!(entry.description.contains("Hello"));
    assert_eq!(entry.enclosures, vec!["https://example.test.invalid/pic.jpg"]);

    let published = parse_published_date(&entry.published).unwrap();
    assert_eq!(published.format("%Y-%m-%dT%H:%M:%S").to_string(), "2023-05-02T09:30:00");
}
