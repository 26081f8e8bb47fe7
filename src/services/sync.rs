use color_eyre::eyre::{Result, WrapErr};

use crate::models::{Playlist, Track};
use crate::ports::spotify::SpotifyClient;
use crate::ports::station_page::StationPageSource;
use crate::services::description::stamp_description_now;
use crate::services::playlist_builder::build_source_tracks;
use crate::services::reconcile::{prune_plan, tracks_to_add};
use crate::station::Station;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Don't add tracks the playlist already has
    pub remove_duplicates: bool,
    /// Make the playlist match the station exactly
    pub prune: bool,
    /// Insert new tracks at the top of the playlist
    pub prepend: bool,
    pub update_description: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub removed: usize,
    /// The new description, when it was stamped
    pub description: Option<String>,
}

fn track_uris(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|track| track.uri.clone()).collect()
}

/// Mirrors a station's playlist into a Spotify playlist.
pub struct PlaylistSyncService<C: SpotifyClient, P: StationPageSource> {
    client: C,
    pages: P,
}

impl<C: SpotifyClient, P: StationPageSource> PlaylistSyncService<C, P> {
    pub fn new(client: C, pages: P) -> Self {
        Self { client, pages }
    }

    /// Bring an existing playlist in line with the station.
    ///
    /// With `prune` every removal happens before any addition.
    pub async fn update_playlist(
        &self,
        station: Station,
        playlist_id: &str,
        options: UpdateOptions,
    ) -> Result<SyncSummary> {
        log::info!("Updating playlist {} from {}", playlist_id, station);

        let source = build_source_tracks(&self.client, &self.pages, station).await?;
        let playlist = self
            .client
            .get_playlist(playlist_id)
            .await
            .wrap_err_with(|| format!("Failed to get playlist {}", playlist_id))?;
        log::debug!(
            "Playlist '{}' has {} tracks",
            playlist.name,
            playlist.tracks.len()
        );

        let mut summary = SyncSummary::default();

        let to_add = if options.prune {
            let plan = prune_plan(&source, &playlist.tracks);
            summary.removed = plan.remove.len();
            self.remove_tracks(playlist_id, &plan.remove, options.dry_run)
                .await?;
            plan.add
        } else {
            tracks_to_add(&source, &playlist.tracks, options.remove_duplicates)
        };

        summary.added = to_add.len();
        let position = options.prepend.then_some(0);
        self.add_tracks(playlist_id, &to_add, position, options.dry_run)
            .await?;

        if options.update_description {
            let description = stamp_description_now(playlist.description.as_deref());
            if options.dry_run {
                log::info!("Would set description to '{}' (dry run)", description);
            } else {
                log::info!("Setting description to '{}'", description);
                self.client
                    .set_description(playlist_id, &description)
                    .await
                    .wrap_err("Failed to update playlist description")?;
            }
            summary.description = Some(description);
        }

        Ok(summary)
    }

    /// Create a new playlist holding every distinct track on the station.
    ///
    /// In a dry run nothing is created and the returned playlist has no id.
    pub async fn create_playlist(
        &self,
        station: Station,
        name: &str,
        private: bool,
        description: Option<String>,
        dry_run: bool,
    ) -> Result<Playlist> {
        let source = build_source_tracks(&self.client, &self.pages, station).await?;
        let to_add = tracks_to_add(&source, &[], false);

        let user = self
            .client
            .current_user()
            .await
            .wrap_err("Failed to get current Spotify user")?;

        if dry_run {
            log::info!(
                "Would create {} playlist '{}' for {} with {} tracks (dry run)",
                if private { "private" } else { "public" },
                name,
                user.id,
                to_add.len()
            );
            return Ok(Playlist {
                tracks: to_add,
                collaborative: false,
                public: !private,
                name: name.to_string(),
                description,
                uri: String::new(),
                id: String::new(),
            });
        }

        log::info!("Creating playlist '{}' for {}", name, user.id);
        let mut playlist = self
            .client
            .create_playlist(&user.id, name, !private, description)
            .await
            .wrap_err_with(|| format!("Failed to create playlist '{}'", name))?;

        self.add_tracks(&playlist.id, &to_add, None, false).await?;
        playlist.tracks = to_add;

        Ok(playlist)
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        position: Option<u32>,
        dry_run: bool,
    ) -> Result<()> {
        for track in tracks {
            log::debug!("Adding {} ({})", track.name, track.uri);
        }

        if tracks.is_empty() {
            log::info!("No tracks to add");
        } else if dry_run {
            log::info!("Would add {} tracks (dry run)", tracks.len());
        } else {
            log::info!("Adding {} tracks", tracks.len());
            self.client
                .add_tracks(playlist_id, &track_uris(tracks), position)
                .await
                .wrap_err_with(|| format!("Failed to add tracks to playlist {}", playlist_id))?;
        }

        Ok(())
    }

    async fn remove_tracks(
        &self,
        playlist_id: &str,
        tracks: &[Track],
        dry_run: bool,
    ) -> Result<()> {
        for track in tracks {
            log::debug!("Removing {} ({})", track.name, track.uri);
        }

        if tracks.is_empty() {
            log::info!("No tracks to remove");
        } else if dry_run {
            log::info!("Would remove {} tracks (dry run)", tracks.len());
        } else {
            log::info!("Removing {} tracks", tracks.len());
            self.client
                .remove_tracks(playlist_id, &track_uris(tracks))
                .await
                .wrap_err_with(|| {
                    format!("Failed to remove tracks from playlist {}", playlist_id)
                })?;
        }

        Ok(())
    }
}
