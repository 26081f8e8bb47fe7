use std::collections::{HashMap, HashSet};

use crate::models::{Track, TrackIdentity};

/// First occurrence of each identity, in order.
pub fn distinct_tracks<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Vec<&'a Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.identity_key()))
        .collect()
}

/// Tracks from `source` to add to a playlist currently holding `destination`.
///
/// Without `remove_duplicates` this is every distinct source track, whether
/// or not the playlist already has it.
pub fn tracks_to_add(
    source: &[Track],
    destination: &[Track],
    remove_duplicates: bool,
) -> Vec<Track> {
    let existing: HashSet<TrackIdentity> = if remove_duplicates {
        destination.iter().map(Track::identity_key).collect()
    } else {
        HashSet::new()
    };

    distinct_tracks(source)
        .into_iter()
        .filter(|track| !existing.contains(&track.identity_key()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrunePlan {
    pub remove: Vec<Track>,
    pub add: Vec<Track>,
}

/// Make the playlist hold exactly the distinct source tracks.
///
/// A source track stays only when the playlist holds exactly one copy of it.
/// Everything else in the playlist is removed, which covers tracks no longer
/// in the source as well as every copy of a duplicated one. Removal is by URI,
/// so each URI appears in `remove` once. Whatever is missing afterwards is in
/// `add`.
pub fn prune_plan(source: &[Track], destination: &[Track]) -> PrunePlan {
    let mut counts: HashMap<TrackIdentity, usize> = HashMap::new();
    for track in destination {
        *counts.entry(track.identity_key()).or_default() += 1;
    }

    let stay: Vec<Track> = distinct_tracks(source)
        .into_iter()
        .filter(|track| counts.get(&track.identity_key()) == Some(&1))
        .cloned()
        .collect();
    let staying: HashSet<TrackIdentity> = stay.iter().map(Track::identity_key).collect();

    let mut removed_uris = HashSet::new();
    let remove = destination
        .iter()
        .filter(|track| !staying.contains(&track.identity_key()))
        .filter(|track| removed_uris.insert(track.uri.as_str()))
        .cloned()
        .collect();

    PrunePlan {
        remove,
        add: tracks_to_add(source, &stay, true),
    }
}
