use color_eyre::eyre::Result;

use crate::station::Station;

/// Port trait for fetching a station's published playlist page.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StationPageSource: Send + Sync {
    async fn fetch_playlist_page(&self, station: Station) -> Result<String>;
}
