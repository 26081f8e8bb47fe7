use std::fmt;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

// The BBC wraps each playlist block ("A LIST", "B LIST", ...) in one of these
// boxes. This is a literal match against their markup and will silently yield
// nothing if the page layout changes.
static SECTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        ".component.component--box.component--box-flushbody-vertical.component--box--primary",
    )
    .unwrap()
});
static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

const LIST_HEADING_SUFFIX: &str = "LIST";
const ENTRY_SEPARATOR: &str = " - ";
const FEATURING: &str = "ft.";

/// An "artist - track" line lifted from a station playlist page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedTrack {
    pub artist: String,
    pub name: String,
}

impl fmt::Display for ScrapedTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.artist, ENTRY_SEPARATOR, self.name)
    }
}

/// Extract every track listed in the `*LIST` sections of a playlist page, in
/// document order.
///
/// Unexpected markup is not an error: sections without a heading, or whose
/// heading does not end in `LIST`, are skipped, and a page with no matching
/// sections yields an empty list.
pub fn scrape_tracks_from_playlist_page(html: &str) -> Vec<ScrapedTrack> {
    let document = Html::parse_document(html);
    let mut scraped_tracks = Vec::new();

    for section in document.select(&SECTION_SELECTOR) {
        let Some(heading) = section.select(&HEADING_SELECTOR).next() else {
            continue;
        };
        let heading = heading.text().collect::<String>();
        let heading = heading.trim();

        if !heading.ends_with(LIST_HEADING_SUFFIX) {
            log::debug!("Skipping section '{}'", heading);
            continue;
        }

        log::debug!("Scraping '*LIST' section '{}'", heading);
        scraped_tracks.extend(scrape_tracks_in_section(section));
    }

    log::debug!("Scraped {} tracks", scraped_tracks.len());

    scraped_tracks
}

fn scrape_tracks_in_section(section: ElementRef<'_>) -> Vec<ScrapedTrack> {
    section
        .select(&PARAGRAPH_SELECTOR)
        .flat_map(scrape_tracks_in_paragraph)
        .collect()
}

/// Every descendant text node of the paragraph is one entry, so entries split
/// by `<br>` or wrapped in `<a>`/`<strong>` are picked up individually.
fn scrape_tracks_in_paragraph(paragraph: ElementRef<'_>) -> Vec<ScrapedTrack> {
    paragraph
        .text()
        // One entry per text node, except whitespace-only nodes between tags,
        // which would only produce empty searches.
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            log::trace!("Scraping text node: {}", line);
            parse_entry_line(line)
        })
        .collect()
}

/// Split `"Artist - Track"` at the first separator, so a track name that
/// itself contains `" - "` is kept whole. A line without a separator yields
/// the whole line for both.
pub fn parse_entry_line(line: &str) -> ScrapedTrack {
    let (artist, name) = line.split_once(ENTRY_SEPARATOR).unwrap_or((line, line));

    ScrapedTrack {
        artist: primary_artist(artist),
        name: name.to_string(),
    }
}

/// The credited artist before any `ft.` or `&` collaborator. Not trimmed.
pub fn primary_artist(artist: &str) -> String {
    let artist = artist.replace('&', FEATURING);
    artist
        .split_once(FEATURING)
        .map_or(artist.as_str(), |(primary, _)| primary)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(heading: Option<&str>, body: &str) -> String {
        let heading = heading
            .map(|h| format!("<h2>{}</h2>", h))
            .unwrap_or_default();
        format!(
            r#"<div class="component component--box component--box-flushbody-vertical component--box--primary">{}<div class="component__body">{}</div></div>"#,
            heading, body
        )
    }

    fn page(sections: &[String]) -> String {
        format!(
            "<!DOCTYPE html><html><body><main>{}</main></body></html>",
            sections.join("")
        )
    }

    fn entries(tracks: &[ScrapedTrack]) -> Vec<(String, String)> {
        tracks
            .iter()
            .map(|t| (t.artist.clone(), t.name.clone()))
            .collect()
    }

    #[test]
    fn test_track_name_keeps_inner_separators() {
        let track = parse_entry_line("Glass Animals - Heat Waves - Radio Edit");

        assert_eq!(track.artist, "Glass Animals");
        assert_eq!(track.name, "Heat Waves - Radio Edit");
    }

    #[test]
    fn test_line_without_separator() {
        let track = parse_entry_line("Just A Title");

        assert_eq!(track.artist, "Just A Title");
        assert_eq!(track.name, "Just A Title");
    }

    #[test]
    fn test_primary_artist_ampersand() {
        assert_eq!(primary_artist("Drake & Rihanna"), "Drake ");
    }

    #[test]
    fn test_primary_artist_featuring() {
        assert_eq!(primary_artist("Calvin Harris ft. Dua Lipa"), "Calvin Harris ");
    }

    #[test]
    fn test_primary_artist_solo() {
        assert_eq!(primary_artist("Fontaines D.C."), "Fontaines D.C.");
    }

    #[test]
    fn test_compound_artist_before_first_separator() {
        let track = parse_entry_line("Becky Hill & Chase & Status - Disconnect");

        assert_eq!(track.artist, "Becky Hill ");
        assert_eq!(track.name, "Disconnect");
    }

    #[test]
    fn test_scrape_list_sections_in_document_order() {
        let html = page(&[
            section(
                Some("A LIST"),
                "<p>Artist One - Song One<br>Artist Two &amp; Friend - Song Two</p>\
                 <p>Artist Three - Song Three</p>",
            ),
            section(Some("B LIST "), "<p>Artist Four - Song Four</p>"),
        ]);

        let tracks = scrape_tracks_from_playlist_page(&html);

        assert_eq!(
            entries(&tracks),
            vec![
                ("Artist One".into(), "Song One".into()),
                ("Artist Two ".into(), "Song Two".into()),
                ("Artist Three".into(), "Song Three".into()),
                ("Artist Four".into(), "Song Four".into()),
            ]
        );
    }

    #[test]
    fn test_scrape_descends_into_nested_tags() {
        let html = page(&[section(
            Some("C LIST"),
            "<p><strong>Artist One - Song One</strong><br><a href=\"#\"><em>Artist Two - Song Two</em></a></p>",
        )]);

        let tracks = scrape_tracks_from_playlist_page(&html);

        assert_eq!(
            entries(&tracks),
            vec![
                ("Artist One".into(), "Song One".into()),
                ("Artist Two".into(), "Song Two".into()),
            ]
        );
    }

    #[test]
    fn test_scrape_skips_whitespace_only_text_nodes() {
        let html = page(&[section(
            Some("A LIST"),
            "<p>Artist One - Song One<br>\n  <br> <strong>Artist Two - Song Two</strong>\n</p>",
        )]);

        let tracks = scrape_tracks_from_playlist_page(&html);

        assert_eq!(
            entries(&tracks),
            vec![
                ("Artist One".into(), "Song One".into()),
                ("Artist Two".into(), "Song Two".into()),
            ]
        );
    }

    #[test]
    fn test_scrape_skips_other_sections() {
        let html = page(&[
            section(Some("About the playlist"), "<p>Not - A Track</p>"),
            section(None, "<p>No - Heading</p>"),
            section(Some("A list"), "<p>Lower - Case</p>"),
            section(Some("A LIST"), "<p>Real - Track</p>"),
        ]);

        let tracks = scrape_tracks_from_playlist_page(&html);

        assert_eq!(entries(&tracks), vec![("Real".into(), "Track".into())]);
    }

    #[test]
    fn test_scrape_ignores_boxes_without_the_section_classes() {
        let html = page(&[
            r#"<div class="component"><h2>A LIST</h2><p>Wrong - Box</p></div>"#.to_string(),
        ]);

        assert!(scrape_tracks_from_playlist_page(&html).is_empty());
    }

    #[test]
    fn test_scrape_empty_page() {
        assert!(scrape_tracks_from_playlist_page("").is_empty());
        assert!(scrape_tracks_from_playlist_page("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_scrape_keeps_duplicate_lines() {
        let html = page(&[
            section(Some("A LIST"), "<p>Artist - Song</p>"),
            section(Some("B LIST"), "<p>Artist - Song</p>"),
        ]);

        assert_eq!(scrape_tracks_from_playlist_page(&html).len(), 2);
    }
}
