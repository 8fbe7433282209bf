use thiserror::Error;

/// Fatal errors that abort a run before collection starts.
///
/// Everything here terminates the process with no output file. Per-request
/// failures during collection never surface as errors; they are recorded in
/// the measurement log instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("listings request failed: {0}")]
    ListingsRequest(#[source] reqwest::Error),
    #[error("listings API returned {0}")]
    ListingsStatus(u16),
    #[error("listings API returned no usable events")]
    NoListings,
    #[error("no market responded to a pricing probe")]
    NoValidMarket,
    #[error("manual token id {token_id} rejected by pricing API (status {status})")]
    OverrideRejected { token_id: String, status: u16 },
    #[error("pricing probe failed: {0}")]
    ProbeRequest(#[source] reqwest::Error),
}
