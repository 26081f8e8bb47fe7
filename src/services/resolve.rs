use std::sync::LazyLock;

use color_eyre::eyre::Result;
use regex::Regex;

use crate::models::Track;
use crate::ports::spotify::SpotifyClient;
use crate::services::reconcile::distinct_tracks;

/// Anything Spotify's search is likely to trip over.
static SPECIAL_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_+\-. ]").unwrap());

fn has_whitespace_anomaly(string: &str) -> bool {
    let mut chars = string.chars().peekable();
    let mut previous_was_space = false;
    let mut first = true;

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            if first || previous_was_space || chars.peek().is_none() {
                return true;
            }
            previous_was_space = true;
        } else {
            previous_was_space = false;
        }
        first = false;
    }

    false
}

/// True when the string contains a special character or leading, trailing or
/// repeated whitespace.
pub fn needs_simplifying(string: &str) -> bool {
    SPECIAL_CHARACTERS.is_match(string) || has_whitespace_anomaly(string)
}

/// Drop special characters, then trim and collapse whitespace.
pub fn simplify_track_or_artist(string: &str) -> String {
    SPECIAL_CHARACTERS
        .replace_all(string, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Search Spotify for a scraped artist and track name.
///
/// When nothing matches and either string needs simplifying, the search is
/// repeated once with both strings simplified. Candidates are collapsed by
/// identity, first occurrence kept. An empty result means "not found".
pub async fn get_tracks_by_artist_and_track_name<C: SpotifyClient + ?Sized>(
    client: &C,
    artist: &str,
    track_name: &str,
) -> Result<Vec<Track>> {
    let mut tracks = client.search_tracks(artist, track_name).await?;

    if tracks.is_empty() && (needs_simplifying(artist) || needs_simplifying(track_name)) {
        let artist = simplify_track_or_artist(artist);
        let track_name = simplify_track_or_artist(track_name);
        log::debug!(
            "Could not find track, retrying as '{}' - '{}'",
            artist,
            track_name
        );
        tracks = client.search_tracks(&artist, &track_name).await?;
    }

    Ok(distinct_tracks(&tracks).into_iter().cloned().collect())
}

/// Highest popularity wins, ties broken by the higher id so repeated runs
/// over the same results pick the same track.
pub fn select_best_candidate(mut candidates: Vec<Track>) -> Option<Track> {
    candidates.sort_by(|a, b| {
        b.popularity
            .cmp(&a.popularity)
            .then_with(|| b.id.cmp(&a.id))
    });
    candidates.into_iter().next()
}
