use color_eyre::eyre::Result;

use crate::models::{Playlist, Track, User};

/// Port trait wrapping the Spotify API capabilities used by the sync logic.
///
/// Implementations live in `services::spotify::client` (production) or test mocks.
/// Implementations own authentication and batching; callers hand over URIs
/// and text only.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpotifyClient: Send + Sync {
    /// Run an `artist:<artist> track:<track_name>` search. No match is an
    /// empty list, not an error.
    async fn search_tracks(&self, artist: &str, track_name: &str) -> Result<Vec<Track>>;

    /// The full playlist, with every page of tracks already fetched.
    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist>;

    /// Insert at `position`, or append when `None`.
    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
        position: Option<u32>,
    ) -> Result<()>;

    /// Spotify removes every occurrence of each URI.
    async fn remove_tracks(&self, playlist_id: &str, track_uris: &[String]) -> Result<()>;

    async fn set_description(&self, playlist_id: &str, description: &str) -> Result<()>;

    async fn current_user(&self) -> Result<User>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: Option<String>,
    ) -> Result<Playlist>;
}
