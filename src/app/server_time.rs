//! Server clock synchronization against the time endpoint

use super::App;
use crate::clock::time_url_for;
use crate::constants::CLOCK_SYNC_TIMEOUT_SECS;
use crate::error::Result;
use crate::protocol::ServerTime;
use chrono::{DateTime, Utc};
use eframe::egui;
use std::time::Duration;
use tracing::{debug, warn};

/// Query the time endpoint. Returns (sent, received, server time).
async fn fetch_server_time(
    client: &reqwest::Client,
    url: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>, DateTime<Utc>)> {
    let sent = Utc::now();
    let response: ServerTime = client
        .get(url)
        .timeout(Duration::from_secs(CLOCK_SYNC_TIMEOUT_SECS))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let received = Utc::now();
    Ok((sent, received, response.instant()?))
}

impl App {
    pub(crate) fn time_url(&self) -> Result<String> {
        match &self.settings.time_url {
            Some(url) => Ok(url.clone()),
            None => time_url_for(&self.settings.server_url),
        }
    }

    /// Measure the clock offset in the background. Does nothing while a sync is running.
    pub(crate) fn sync_clock(&mut self, ctx: &egui::Context) {
        let url = match self.time_url() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "No time endpoint");
                self.clock.lock().unwrap().fail(e.to_string());
                return;
            }
        };

        {
            let mut clock = self.clock.lock().unwrap();
            if clock.syncing {
                return;
            }
            clock.syncing = true;
        }
        self.clock_synced_once = true;

        let clock = self.clock.clone();
        let client = self.http.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = fetch_server_time(&client, &url).await;
            let mut clock = clock.lock().unwrap();
            match result {
                Ok((sent, received, server)) => {
                    clock.record(sent, received, server);
                    debug!(
                        url = %url,
                        offset_ms = ?clock.offset_ms,
                        round_trip_ms = ?clock.round_trip_ms,
                        "Server clock synced"
                    );
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Server clock sync failed");
                    clock.fail(e.to_string());
                }
            }
            ctx.request_repaint();
        });
    }
}
