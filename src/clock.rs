//! Server clock estimate
//!
//! Round deadlines are given in server time. The offset between the server's
//! clock and ours is measured against the time endpoint, assuming symmetric
//! request latency.

use crate::error::{ClientError, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;

#[derive(Debug, Clone, Default)]
pub struct ServerClock {
    /// server - local, in milliseconds
    pub offset_ms: Option<i64>,
    pub round_trip_ms: Option<i64>,
    pub synced_at: Option<DateTime<Utc>>,
    pub syncing: bool,
    pub error: Option<String>,
}

impl ServerClock {
    /// Record a measurement taken between `sent` and `received`.
    pub fn record(&mut self, sent: DateTime<Utc>, received: DateTime<Utc>, server: DateTime<Utc>) {
        let round_trip = received - sent;
        let midpoint = sent + round_trip / 2;
        self.offset_ms = Some((server - midpoint).num_milliseconds());
        self.round_trip_ms = Some(round_trip.num_milliseconds());
        self.synced_at = Some(received);
        self.syncing = false;
        self.error = None;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.syncing = false;
        self.error = Some(error.into());
    }

    pub fn offset(&self) -> Duration {
        Duration::milliseconds(self.offset_ms.unwrap_or(0))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.server_time_at(Utc::now())
    }

    pub fn server_time_at(&self, local: DateTime<Utc>) -> DateTime<Utc> {
        local + self.offset()
    }

    /// Time left until `deadline` (server time) as seen at `local`, never negative.
    pub fn remaining_at(&self, deadline: DateTime<Utc>, local: DateTime<Utc>) -> Duration {
        (deadline - self.server_time_at(local)).max(Duration::zero())
    }

    pub fn remaining(&self, deadline: DateTime<Utc>) -> Duration {
        self.remaining_at(deadline, Utc::now())
    }
}

/// Time endpoint belonging to a game endpoint:
/// `wss://host/spe_ed` -> `https://host/spe_ed_time`.
pub fn time_url_for(server_url: &str) -> Result<String> {
    let invalid = || ClientError::InvalidUrl(server_url.to_string());
    let mut url = Url::parse(server_url).map_err(|_| invalid())?;
    let scheme = match url.scheme() {
        "wss" | "https" => "https",
        "ws" | "http" => "http",
        _ => return Err(invalid()),
    };
    url.set_scheme(scheme).map_err(|_| invalid())?;
    let path = format!("{}_time", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    Ok(url.to_string())
}

/// Websocket URL including the API key query parameter.
pub fn session_url(server_url: &str, key: &str) -> Result<String> {
    if key.trim().is_empty() {
        return Err(ClientError::MissingKey);
    }
    let url = Url::parse_with_params(server_url, &[("key", key.trim())])
        .map_err(|_| ClientError::InvalidUrl(server_url.to_string()))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url.to_string()),
        _ => Err(ClientError::InvalidUrl(server_url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_610_384_400_000 + ms).unwrap()
    }

    #[test]
    fn offset_uses_round_trip_midpoint() {
        let mut clock = ServerClock { syncing: true, ..Default::default() };
        // request took 200ms, server stamped 1s ahead of our midpoint
        clock.record(at(0), at(200), at(1_100));
        assert_eq!(clock.offset_ms, Some(1_000));
        assert_eq!(clock.round_trip_ms, Some(200));
        assert!(!clock.syncing);
        assert_eq!(clock.server_time_at(at(0)), at(1_000));
    }

    #[test]
    fn remaining_time_is_clamped() {
        let mut clock = ServerClock::default();
        clock.record(at(0), at(0), at(-500));
        assert_eq!(clock.remaining_at(at(5_000), at(0)), Duration::milliseconds(5_500));
        assert_eq!(clock.remaining_at(at(0), at(10_000)), Duration::zero());
    }

    #[test]
    fn failures_keep_previous_offset() {
        let mut clock = ServerClock::default();
        clock.record(at(0), at(0), at(42));
        clock.syncing = true;
        clock.fail("timeout");
        assert_eq!(clock.offset_ms, Some(42));
        assert_eq!(clock.error.as_deref(), Some("timeout"));
        assert!(!clock.syncing);
    }

    #[test]
    fn derives_time_endpoint() {
        assert_eq!(
            time_url_for("wss://msoll.de/spe_ed").unwrap(),
            "https://msoll.de/spe_ed_time"
        );
        assert_eq!(
            time_url_for("ws://localhost:10101/spe_ed?key=x").unwrap(),
            "http://localhost:10101/spe_ed_time"
        );
        assert!(time_url_for("ftp://example.org/spe_ed").is_err());
        assert!(time_url_for("not a url").is_err());
    }

    #[test]
    fn session_url_carries_key() {
        assert_eq!(
            session_url("wss://msoll.de/spe_ed", "a b").unwrap(),
            "wss://msoll.de/spe_ed?key=a+b"
        );
        assert!(matches!(session_url("wss://msoll.de/spe_ed", " "), Err(ClientError::MissingKey)));
        assert!(matches!(
            session_url("https://msoll.de/spe_ed", "k"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
