use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub name: String,
    pub uri: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub name: String,
    pub artists: Vec<Artist>,
    pub uri: String,
    pub id: String,
}

/// A track as catalogued by Spotify.
///
/// The derived `PartialEq` compares every field. Whether two tracks are the
/// same recording is a different question, answered by [`Track::identity_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub album: Album,
    pub artists: Vec<Artist>,
    pub name: String,
    pub uri: String,
    pub id: String,
    pub popularity: u32,
}

/// `(name, sorted distinct artist names)`.
///
/// The same recording is often released on several albums (single, album,
/// compilation), each with its own track id, so the id cannot be used to tell
/// whether a playlist already holds a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackIdentity {
    pub name: String,
    pub artist_names: Vec<String>,
}

impl Track {
    pub fn identity_key(&self) -> TrackIdentity {
        identity_key(self)
    }
}

pub fn identity_key(track: &Track) -> TrackIdentity {
    let artist_names: BTreeSet<&str> = track
        .artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect();

    TrackIdentity {
        name: track.name.clone(),
        artist_names: artist_names.into_iter().map(str::to_string).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub tracks: Vec<Track>,
    pub collaborative: bool,
    pub public: bool,
    pub name: String,
    pub description: Option<String>,
    pub uri: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub display_name: Option<String>,
    pub id: String,
    pub uri: String,
}

/// Track builder shared by unit tests across the crate.
#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn artist(name: &str) -> Artist {
        let id = name.to_lowercase().replace(' ', "");
        Artist {
            name: name.to_string(),
            uri: format!("spotify:artist:{}", id),
            id,
        }
    }

    pub fn track(id: &str, name: &str, artists: &[&str]) -> Track {
        track_on_album(id, name, artists, "Album")
    }

    pub fn track_on_album(id: &str, name: &str, artists: &[&str], album: &str) -> Track {
        let artists: Vec<Artist> = artists.iter().map(|name| artist(name)).collect();
        Track {
            album: Album {
                name: album.to_string(),
                artists: artists.clone(),
                uri: format!("spotify:album:{}", album.to_lowercase()),
                id: album.to_lowercase(),
            },
            artists,
            name: name.to_string(),
            uri: format!("spotify:track:{}", id),
            id: id.to_string(),
            popularity: 0,
        }
    }

    pub fn with_popularity(mut track: Track, popularity: u32) -> Track {
        track.popularity = popularity;
        track
    }
}
