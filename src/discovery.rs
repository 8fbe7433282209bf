use reqwest::Client;
use serde::Deserialize;

use crate::error::RunError;
use crate::types::Target;

/// One Gamma event listing; only the fields discovery inspects.
#[derive(Clone, Debug, Deserialize)]
pub struct GammaEvent {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub markets: Vec<GammaMarket>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GammaMarket {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub question: String,
    #[serde(rename = "clobTokenIds")]
    pub clob_token_ids: Option<TokenIds>,
}

/// Gamma serves `clobTokenIds` either as a native array or as a string
/// holding a JSON-encoded array. The ambiguity is confined to this type;
/// everything downstream sees a plain `Vec<String>`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenIds {
    RawArray(Vec<String>),
    EncodedString(String),
}

impl TokenIds {
    /// `None` when the encoded form is not valid JSON; callers skip the
    /// listing in that case.
    pub fn normalize(&self) -> Option<Vec<String>> {
        match self {
            TokenIds::RawArray(ids) => Some(ids.clone()),
            TokenIds::EncodedString(raw) => serde_json::from_str(raw).ok(),
        }
    }
}

/// Probe the CLOB pricing endpoint for a token id; 200 means the id is live.
pub async fn probe_price(client: &Client, clob_url: &str, token_id: &str) -> Result<u16, RunError> {
    let url = price_url(clob_url, token_id);
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(RunError::ProbeRequest)?;
    Ok(resp.status().as_u16())
}

pub fn price_url(clob_url: &str, token_id: &str) -> String {
    format!("{clob_url}/price?token_id={token_id}&side=buy")
}

fn events_url(gamma_url: &str) -> String {
    format!("{gamma_url}/events?limit=10&closed=false&order=volume24hr&ascending=false")
}

/// Find a liquid, CLOB-accepted probe target.
///
/// Fetches the top open events by 24h volume and walks them in order: first
/// sub-market, first token id, one validation probe against the pricing
/// endpoint. The first id the CLOB answers with 200 wins. Listings with a
/// missing, empty or unparseable token-id field are skipped; exhausting all
/// ten candidates is fatal.
pub async fn find_valid_market(
    client: &Client,
    gamma_url: &str,
    clob_url: &str,
) -> Result<Target, RunError> {
    tracing::info!("discovery: fetching top active markets");
    let resp = client
        .get(events_url(gamma_url))
        .send()
        .await
        .map_err(RunError::ListingsRequest)?;
    if !resp.status().is_success() {
        return Err(RunError::ListingsStatus(resp.status().as_u16()));
    }
    let events: Vec<GammaEvent> = resp.json().await.map_err(|_| RunError::NoListings)?;
    if events.is_empty() {
        return Err(RunError::NoListings);
    }

    for event in &events {
        let Some(market) = event.markets.first() else {
            continue;
        };
        let Some(ids) = market.clob_token_ids.as_ref() else {
            continue;
        };
        let Some(ids) = ids.normalize() else {
            tracing::warn!(market = %market.slug, "unparseable clobTokenIds, skipping");
            continue;
        };
        // First outcome (usually "Yes") stands in for the whole market.
        let Some(token_id) = ids.first() else {
            continue;
        };

        tracing::info!(
            question = %market.question,
            id = %truncate(token_id, 15),
            "candidate"
        );

        let status = probe_price(client, clob_url, token_id).await?;
        if status == 200 {
            tracing::info!("target locked, validated on CLOB");
            return Ok(Target {
                token_id: token_id.clone(),
                slug: event.slug.clone(),
                question: market.question.clone(),
            });
        }
        tracing::info!(status, "probe failed, trying next listing");
    }

    Err(RunError::NoValidMarket)
}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
