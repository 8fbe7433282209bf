use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;

use crate::config;
use crate::types::{Endpoint, Measurement};

/// Issues single timed GETs and turns each outcome into a [`Measurement`].
///
/// Nothing escapes [`Prober::measure`]: transport errors, non-2xx statuses
/// and body-read failures all land in the measurement record.
#[derive(Clone, Debug)]
pub struct Prober {
    client: Client,
}

impl Prober {
    pub fn new() -> reqwest::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(config::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }

    /// The shared HTTP client, also used for discovery calls so every request
    /// in a run carries the same header set.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// One GET against `url`, timed from just before send to after the body
    /// is fully read.
    pub async fn measure(&self, endpoint: Endpoint, url: &str, id: u32) -> Measurement {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let start = Instant::now();

        let mut status = 0u16;
        let mut size_b = 0u64;
        let mut success = false;
        let mut error_details = String::new();

        match self.client.get(url).send().await {
            Ok(resp) => {
                status = resp.status().as_u16();
                if resp.status().is_success() {
                    match resp.bytes().await {
                        Ok(body) => {
                            size_b = body.len() as u64;
                            success = true;
                        }
                        Err(e) => error_details = format!("NET: {e}"),
                    }
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    error_details = format!("HTTP {status}: {}", snippet(&body));
                }
            }
            Err(e) => error_details = format!("NET: {e}"),
        }

        Measurement {
            id,
            endpoint,
            timestamp,
            duration_ms: round2(start.elapsed().as_secs_f64() * 1_000.0),
            status,
            size_b,
            success,
            error_details,
        }
    }
}

/// First 50 chars of an error body, newlines flattened to spaces.
fn snippet(body: &str) -> String {
    body.chars()
        .take(50)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
