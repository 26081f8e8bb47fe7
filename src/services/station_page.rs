use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;

use crate::ports::station_page::StationPageSource;
use crate::station::Station;

pub struct BbcPageHttpAdapter {
    client: Client,
    timeout: Duration,
}

impl BbcPageHttpAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl StationPageSource for BbcPageHttpAdapter {
    async fn fetch_playlist_page(&self, station: Station) -> Result<String> {
        let url = station.playlist_url();
        log::info!("Scraping tracks from: {}", url);

        self.client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to fetch playlist page for {}", station))?
            .error_for_status()
            .wrap_err_with(|| format!("Playlist page for {} returned an error", station))?
            .text()
            .await
            .wrap_err_with(|| format!("Failed to read playlist page for {}", station))
    }
}
