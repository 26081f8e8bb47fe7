use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::credentials::Credentials;
use crate::models::{Playlist, Track, User};
use crate::ports::spotify::SpotifyClient;
use crate::spotify_rs::auth::refresh_access_token;
use crate::spotify_rs::client::SpotifyApi;
use crate::spotify_rs::types::{ChangePlaylistDetailsBody, CreatePlaylistBody};

/// Refresh this long before Spotify says the token expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(300);

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// Production [`SpotifyClient`]: the Web API behind a refresh-token grant.
pub struct SpotifyHttpAdapter {
    client: Client,
    api: SpotifyApi,
    credentials: Credentials,
    timeout: Duration,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyHttpAdapter {
    pub fn new(credentials: Credentials, timeout: Duration, market: Option<String>) -> Self {
        let client = Client::new();
        Self {
            api: SpotifyApi::new(client.clone(), timeout, market),
            client,
            credentials,
            timeout,
            token: Mutex::new(None),
        }
    }

    /// The current access token, refreshed first if missing or about to expire.
    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;

        match token.as_ref() {
            Some(token) if token.is_fresh(Instant::now()) => return Ok(token.value.clone()),
            Some(_) => log::debug!("Access token out of date, getting a new one"),
            None => log::debug!("No access token, getting a new one"),
        }

        let requested_at = Instant::now();
        let response = refresh_access_token(
            &self.client,
            &self.credentials.client_id,
            &self.credentials.client_secret,
            &self.credentials.refresh_token,
            self.timeout,
        )
        .await
        .wrap_err("Failed to refresh Spotify access token")?;

        let value = response.access_token;
        *token = Some(AccessToken {
            value: value.clone(),
            expires_at: requested_at + Duration::from_secs(response.expires_in),
        });

        Ok(value)
    }
}

#[async_trait::async_trait]
impl SpotifyClient for SpotifyHttpAdapter {
    async fn search_tracks(&self, artist: &str, track_name: &str) -> Result<Vec<Track>> {
        let query = format!("artist:{} track:{}", artist, track_name);
        log::debug!("Searching for track. Query: {}", query);

        let token = self.access_token().await?;
        let tracks = self
            .api
            .search_tracks(&token, &query)
            .await
            .wrap_err_with(|| format!("Spotify search failed for '{}'", query))?;

        Ok(tracks.into_iter().map(Track::from).collect())
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let token = self.access_token().await?;
        let playlist = self.api.get_playlist(&token, playlist_id).await?;
        Ok(playlist.into())
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_uris: &[String],
        position: Option<u32>,
    ) -> Result<()> {
        let token = self.access_token().await?;
        self.api
            .add_items(&token, playlist_id, track_uris, position)
            .await
    }

    async fn remove_tracks(&self, playlist_id: &str, track_uris: &[String]) -> Result<()> {
        let token = self.access_token().await?;
        self.api.remove_items(&token, playlist_id, track_uris).await
    }

    async fn set_description(&self, playlist_id: &str, description: &str) -> Result<()> {
        let token = self.access_token().await?;
        let details = ChangePlaylistDetailsBody {
            description: Some(description),
            ..Default::default()
        };
        self.api
            .change_playlist_details(&token, playlist_id, &details)
            .await
    }

    async fn current_user(&self) -> Result<User> {
        let token = self.access_token().await?;
        let user = self.api.get_current_user(&token).await?;
        Ok(user.into())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: Option<String>,
    ) -> Result<Playlist> {
        let token = self.access_token().await?;
        let body = CreatePlaylistBody {
            name,
            public,
            description: description.as_deref(),
        };
        let playlist = self.api.create_playlist(&token, user_id, &body).await?;
        Ok(playlist.into())
    }
}
