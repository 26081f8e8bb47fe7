use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;

use crate::spotify_rs::types::{
    AddItemsBody, ChangePlaylistDetailsBody, CreatePlaylistBody, RemoveItemsBody, SpotifyPage,
    SpotifyPlaylist, SpotifyPlaylistItem, SpotifySearchResponse, SpotifyTrack, SpotifyUser,
    TrackUri,
};

const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Spotify caps add/remove requests at 100 items.
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

const SEARCH_LIMIT: u32 = 20;

/// Request bodies for adding `uris`. When inserting at a position, each
/// batch goes in after the previous one so the given order is kept.
fn add_item_batches(uris: &[String], position: Option<u32>) -> Vec<AddItemsBody<'_>> {
    uris.chunks(MAX_ITEMS_PER_REQUEST)
        .enumerate()
        .map(|(batch_index, batch)| AddItemsBody {
            uris: batch,
            position: position
                .map(|position| position + (batch_index * MAX_ITEMS_PER_REQUEST) as u32),
        })
        .collect()
}

fn remove_item_batches(uris: &[String]) -> Vec<RemoveItemsBody<'_>> {
    uris.chunks(MAX_ITEMS_PER_REQUEST)
        .map(|batch| RemoveItemsBody {
            tracks: batch.iter().map(|uri| TrackUri { uri }).collect(),
        })
        .collect()
}

/// Spotify Web API calls. Authentication is the caller's concern: every call
/// takes the access token to use.
pub struct SpotifyApi {
    client: reqwest::Client,
    timeout: Duration,
    market: Option<String>,
}

impl SpotifyApi {
    pub fn new(client: reqwest::Client, timeout: Duration, market: Option<String>) -> Self {
        Self {
            client,
            timeout,
            market,
        }
    }

    /// Search for tracks with a raw Spotify query string
    pub async fn search_tracks(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Vec<SpotifyTrack>> {
        let limit = SEARCH_LIMIT.to_string();
        let mut params = vec![("q", query), ("type", "track"), ("limit", limit.as_str())];
        if let Some(market) = &self.market {
            params.push(("market", market.as_str()));
        }

        let response: SpotifySearchResponse = self
            .client
            .get(format!("{}/search", SPOTIFY_API_URL))
            .query(&params)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .wrap_err("Failed to deserialize Spotify search response")?;

        Ok(response.tracks.items)
    }

    /// Get a playlist with every page of its tracks
    pub async fn get_playlist(
        &self,
        access_token: &str,
        playlist_id: &str,
    ) -> Result<SpotifyPlaylist> {
        let mut playlist: SpotifyPlaylist = self
            .client
            .get(format!("{}/playlists/{}", SPOTIFY_API_URL, playlist_id))
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .wrap_err_with(|| format!("Failed to deserialize playlist {}", playlist_id))?;

        let mut next_url = playlist.tracks.next.take();
        let mut pages = 1;

        while let Some(url) = next_url {
            pages += 1;
            log::debug!("Fetching page {} of playlist {}", pages, playlist_id);

            let page: SpotifyPage<SpotifyPlaylistItem> = self
                .client
                .get(&url)
                .bearer_auth(access_token)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
                .wrap_err_with(|| format!("Failed to deserialize playlist page {}", url))?;

            playlist.tracks.items.extend(page.items);
            next_url = page.next;
        }

        log::debug!(
            "Retrieved {} items from playlist {}",
            playlist.tracks.items.len(),
            playlist_id
        );

        Ok(playlist)
    }

    /// Add items in batches, see [`add_item_batches`]
    pub async fn add_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", SPOTIFY_API_URL, playlist_id);

        for body in add_item_batches(uris, position) {
            log::debug!(
                "Adding {} items to playlist {} (position: {:?})",
                body.uris.len(),
                playlist_id,
                body.position
            );

            self.client
                .post(&url)
                .json(&body)
                .bearer_auth(access_token)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()
                .wrap_err_with(|| format!("Failed to add items to playlist {}", playlist_id))?;
        }

        Ok(())
    }

    /// Remove every occurrence of each URI, in batches
    pub async fn remove_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", SPOTIFY_API_URL, playlist_id);

        for body in remove_item_batches(uris) {
            log::debug!(
                "Removing {} items from playlist {}",
                body.tracks.len(),
                playlist_id
            );

            self.client
                .delete(&url)
                .json(&body)
                .bearer_auth(access_token)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()
                .wrap_err_with(|| {
                    format!("Failed to remove items from playlist {}", playlist_id)
                })?;
        }

        Ok(())
    }

    pub async fn change_playlist_details(
        &self,
        access_token: &str,
        playlist_id: &str,
        details: &ChangePlaylistDetailsBody<'_>,
    ) -> Result<()> {
        self.client
            .put(format!("{}/playlists/{}", SPOTIFY_API_URL, playlist_id))
            .json(details)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()
            .wrap_err_with(|| format!("Failed to change details of playlist {}", playlist_id))?;

        Ok(())
    }

    /// Get the current user's profile
    pub async fn get_current_user(&self, access_token: &str) -> Result<SpotifyUser> {
        let user = self
            .client
            .get(format!("{}/me", SPOTIFY_API_URL))
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .wrap_err("Failed to deserialize Spotify user profile")?;

        Ok(user)
    }

    pub async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        body: &CreatePlaylistBody<'_>,
    ) -> Result<SpotifyPlaylist> {
        let playlist = self
            .client
            .post(format!("{}/users/{}/playlists", SPOTIFY_API_URL, user_id))
            .json(body)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .wrap_err("Failed to deserialize created playlist")?;

        Ok(playlist)
    }
}
