use color_eyre::eyre::{Result, WrapErr};

use crate::models::Track;
use crate::ports::spotify::SpotifyClient;
use crate::ports::station_page::StationPageSource;
use crate::scrape::scrape_tracks_from_playlist_page;
use crate::services::resolve::{get_tracks_by_artist_and_track_name, select_best_candidate};
use crate::station::Station;

/// Scrape the station's playlist and resolve each entry to a Spotify track.
///
/// Page order is kept, and so are repeats. Entries with no match are logged
/// and skipped.
pub async fn build_source_tracks<C, P>(
    client: &C,
    pages: &P,
    station: Station,
) -> Result<Vec<Track>>
where
    C: SpotifyClient + ?Sized,
    P: StationPageSource + ?Sized,
{
    let html = pages
        .fetch_playlist_page(station)
        .await
        .wrap_err_with(|| format!("Failed to get the {} playlist", station))?;

    let scraped = scrape_tracks_from_playlist_page(&html);
    log::info!("Found {} tracks on the {} playlist", scraped.len(), station);

    let mut tracks = Vec::with_capacity(scraped.len());
    for entry in scraped {
        let candidates = get_tracks_by_artist_and_track_name(client, &entry.artist, &entry.name)
            .await
            .wrap_err_with(|| format!("Failed to search Spotify for {}", entry))?;

        match select_best_candidate(candidates) {
            Some(track) => {
                log::info!("Found {} on Spotify as {}", entry, track.uri);
                tracks.push(track);
            }
            None => log::warn!("Could not find {} on Spotify", entry),
        }
    }

    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{track, with_popularity};
    use crate::ports::spotify::MockSpotifyClient;
    use crate::ports::station_page::MockStationPageSource;

    fn playlist_page(entries: &[&str]) -> String {
        let lines = entries
            .iter()
            .map(|entry| format!("<p>{}</p>", entry))
            .collect::<String>();
        format!(
            r#"<html><body>
<div class="component component--box component--box-flushbody-vertical component--box--primary">
<h2>A LIST</h2>
{}
</div>
</body></html>"#,
            lines
        )
    }

    fn page_source(entries: &'static [&'static str]) -> MockStationPageSource {
        let mut pages = MockStationPageSource::new();
        pages
            .expect_fetch_playlist_page()
            .times(1)
            .returning(move |_| Ok(playlist_page(entries)));
        pages
    }

    #[tokio::test]
    async fn test_builds_tracks_in_page_order() {
        let pages = page_source(&["ABBA - SOS", "Queen - Bicycle Race"]);
        let mut client = MockSpotifyClient::new();
        client
            .expect_search_tracks()
            .withf(|artist, _| artist == "ABBA")
            .returning(|_, _| {
                Ok(vec![
                    with_popularity(track("sos-1", "SOS", &["ABBA"]), 30),
                    with_popularity(track("sos-2", "SOS - Live", &["ABBA"]), 70),
                ])
            });
        client
            .expect_search_tracks()
            .withf(|artist, _| artist == "Queen")
            .returning(|_, _| Ok(vec![track("race", "Bicycle Race", &["Queen"])]));

        let tracks = build_source_tracks(&client, &pages, Station::Radio2)
            .await
            .unwrap();

        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["sos-2", "race"]);
    }

    #[tokio::test]
    async fn test_skips_tracks_not_found() {
        let pages = page_source(&["Nobody - Nothing", "Queen - Bicycle Race"]);
        let mut client = MockSpotifyClient::new();
        client
            .expect_search_tracks()
            .withf(|artist, _| artist == "Nobody")
            .times(1)
            .returning(|_, _| Ok(vec![]));
        client
            .expect_search_tracks()
            .withf(|artist, _| artist == "Queen")
            .returning(|_, _| Ok(vec![track("race", "Bicycle Race", &["Queen"])]));

        let tracks = build_source_tracks(&client, &pages, Station::Radio2)
            .await
            .unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "race");
    }

    #[tokio::test]
    async fn test_keeps_repeated_entries() {
        let pages = page_source(&["ABBA - SOS", "ABBA - SOS"]);
        let mut client = MockSpotifyClient::new();
        client
            .expect_search_tracks()
            .times(2)
            .returning(|_, _| Ok(vec![track("sos", "SOS", &["ABBA"])]));

        let tracks = build_source_tracks(&client, &pages, Station::Radio2)
            .await
            .unwrap();

        assert_eq!(tracks.len(), 2);
    }

    #[tokio::test]
    async fn test_page_fetch_failure_is_an_error() {
        let mut pages = MockStationPageSource::new();
        pages
            .expect_fetch_playlist_page()
            .returning(|_| Err(color_eyre::eyre::eyre!("connection refused")));
        let client = MockSpotifyClient::new();

        let error = build_source_tracks(&client, &pages, Station::Radio1)
            .await
            .unwrap_err();

        assert!(error.to_string().contains("Failed to get the"));
    }
}
