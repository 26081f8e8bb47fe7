use serde::{Deserialize, Serialize};

use crate::models::{Album, Artist, Playlist, Track, User};

/// Spotify OAuth token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Spotify user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    pub uri: String,
}

/// A page of a paginated Spotify collection
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPage<T> {
    // A newly created playlist comes back without items
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Spotify playlist from API
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub collaborative: bool,
    pub public: Option<bool>,
    pub uri: String,
    pub tracks: SpotifyPage<SpotifyPlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistItem {
    pub track: Option<SpotifyPlayable>,
}

/// Playlists can hold podcast episodes as well as tracks.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpotifyPlayable {
    Track(SpotifyTrack),
    #[serde(other)]
    Other,
}

/// Spotify track from API
///
/// Local files in a playlist have no id, so ids are optional throughout.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SpotifyArtist>,
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub popularity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub id: Option<String>,
    pub name: String,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub id: Option<String>,
    pub name: String,
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearchResponse {
    pub tracks: SpotifyPage<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddItemsBody<'a> {
    pub uris: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri<'a> {
    pub uri: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveItemsBody<'a> {
    pub tracks: Vec<TrackUri<'a>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangePlaylistDetailsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistBody<'a> {
    pub name: &'a str,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

impl From<SpotifyArtist> for Artist {
    fn from(artist: SpotifyArtist) -> Self {
        Artist {
            name: artist.name,
            uri: artist.uri.unwrap_or_default(),
            id: artist.id.unwrap_or_default(),
        }
    }
}

impl From<SpotifyAlbum> for Album {
    fn from(album: SpotifyAlbum) -> Self {
        Album {
            name: album.name,
            artists: album.artists.into_iter().map(Artist::from).collect(),
            uri: album.uri.unwrap_or_default(),
            id: album.id.unwrap_or_default(),
        }
    }
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Track {
            album: track.album.into(),
            artists: track.artists.into_iter().map(Artist::from).collect(),
            name: track.name,
            uri: track.uri,
            id: track.id.unwrap_or_default(),
            popularity: track.popularity,
        }
    }
}

impl From<SpotifyUser> for User {
    fn from(user: SpotifyUser) -> Self {
        User {
            display_name: user.display_name,
            id: user.id,
            uri: user.uri,
        }
    }
}

impl From<SpotifyPlaylist> for Playlist {
    fn from(playlist: SpotifyPlaylist) -> Self {
        let tracks = playlist
            .tracks
            .items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(SpotifyPlayable::Track(track)) => Some(Track::from(track)),
                _ => None,
            })
            .collect();

        Playlist {
            tracks,
            collaborative: playlist.collaborative,
            public: playlist.public.unwrap_or(false),
            name: playlist.name,
            description: playlist.description,
            uri: playlist.uri,
            id: playlist.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYLIST_JSON: &str = r#"{
        "id": "pl1",
        "name": "Radio 6 Playlist",
        "description": "Mirrored. Last updated: 01-02-2024 10:00:00 (GMT)",
        "collaborative": false,
        "public": true,
        "uri": "spotify:playlist:pl1",
        "tracks": {
            "items": [
                {
                    "track": {
                        "type": "track",
                        "id": "t1",
                        "name": "Heat Waves",
                        "uri": "spotify:track:t1",
                        "popularity": 80,
                        "artists": [{"id": "a1", "name": "Glass Animals", "uri": "spotify:artist:a1"}],
                        "album": {
                            "id": "al1",
                            "name": "Dreamland",
                            "uri": "spotify:album:al1",
                            "artists": [{"id": "a1", "name": "Glass Animals", "uri": "spotify:artist:a1"}]
                        }
                    }
                },
                {"track": null},
                {
                    "track": {
                        "type": "episode",
                        "id": "e1",
                        "name": "A Podcast",
                        "uri": "spotify:episode:e1"
                    }
                },
                {
                    "track": {
                        "type": "track",
                        "id": null,
                        "name": "Local File",
                        "uri": "spotify:local:::Local+File:180",
                        "artists": [{"id": null, "name": "Someone", "uri": null}],
                        "album": {"id": null, "name": "", "uri": null}
                    }
                }
            ],
            "next": "https://api.spotify.com/v1/playlists/pl1/tracks?offset=100&limit=100"
        }
    }"#;

    #[test]
    fn test_playlist_deserializes_and_skips_non_tracks() {
        let playlist: SpotifyPlaylist = serde_json::from_str(PLAYLIST_JSON).unwrap();
        assert!(playlist.tracks.next.is_some());

        let playlist = Playlist::from(playlist);

        assert_eq!(playlist.id, "pl1");
        assert!(playlist.public);
        assert_eq!(playlist.tracks.len(), 2);
        assert_eq!(playlist.tracks[0].name, "Heat Waves");
        assert_eq!(playlist.tracks[0].popularity, 80);
        assert_eq!(playlist.tracks[0].album.artists[0].name, "Glass Animals");
        assert_eq!(playlist.tracks[1].id, "");
        assert_eq!(playlist.tracks[1].popularity, 0);
    }

    #[test]
    fn test_created_playlist_without_items() {
        let playlist: SpotifyPlaylist = serde_json::from_str(
            r#"{
                "id": "new",
                "name": "Radio 1",
                "description": null,
                "collaborative": false,
                "public": false,
                "uri": "spotify:playlist:new",
                "tracks": {"href": "https://api.spotify.com/v1/playlists/new/tracks", "total": 0}
            }"#,
        )
        .unwrap();

        let playlist = Playlist::from(playlist);

        assert!(playlist.tracks.is_empty());
        assert!(!playlist.public);
        assert_eq!(playlist.description, None);
    }

    #[test]
    fn test_change_details_body_omits_unset_fields() {
        let body = ChangePlaylistDetailsBody {
            description: Some("Last updated: now"),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"description": "Last updated: now"})
        );
    }

    #[test]
    fn test_add_items_body_position() {
        let uris = vec!["spotify:track:t1".to_string()];
        let appended = AddItemsBody {
            uris: &uris,
            position: None,
        };
        let prepended = AddItemsBody {
            uris: &uris,
            position: Some(0),
        };

        assert_eq!(
            serde_json::to_value(&appended).unwrap(),
            serde_json::json!({"uris": ["spotify:track:t1"]})
        );
        assert_eq!(
            serde_json::to_value(&prepended).unwrap(),
            serde_json::json!({"uris": ["spotify:track:t1"], "position": 0})
        );
    }
}
