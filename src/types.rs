use serde::{Deserialize, Serialize};

/// The three CLOB endpoints every run measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    #[serde(rename = "CLOB Book")]
    Book,
    #[serde(rename = "CLOB Price")]
    Price,
    #[serde(rename = "CLOB Midpoint")]
    Midpoint,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Book, Endpoint::Price, Endpoint::Midpoint];

    /// Label used in the summary table and the output file's `type` fields.
    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Book => "CLOB Book",
            Endpoint::Price => "CLOB Price",
            Endpoint::Midpoint => "CLOB Midpoint",
        }
    }
}

/// One timed HTTP call. Created by the prober, never mutated afterwards.
///
/// Field names and value encodings match the result file consumed by the
/// downstream tooling: `success` is the string `"YES"`/`"NO"` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// 1-based iteration number.
    pub id: u32,
    #[serde(rename = "type")]
    pub endpoint: Endpoint,
    /// RFC 3339 UTC, millisecond precision.
    pub timestamp: String,
    pub duration_ms: f64,
    /// HTTP status, or 0 when the transport failed before a response arrived.
    pub status: u16,
    pub size_b: u64,
    #[serde(with = "yes_no")]
    pub success: bool,
    pub error_details: String,
}

/// The market a run probes, resolved once before collection starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub token_id: String,
    pub slug: String,
    pub question: String,
}

impl Target {
    pub fn manual(token_id: String) -> Self {
        Self {
            token_id,
            slug: "manual-override".into(),
            question: "Manual Token ID".into(),
        }
    }
}

/// Per-endpoint aggregate. FAIL carries no numeric fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointSummary {
    Ok {
        #[serde(rename = "type")]
        endpoint: Endpoint,
        samples: usize,
        #[serde(with = "two_decimals")]
        min: f64,
        #[serde(with = "two_decimals")]
        mean: f64,
        #[serde(with = "two_decimals")]
        p95: f64,
        status: SummaryStatus,
    },
    Fail {
        #[serde(rename = "type")]
        endpoint: Endpoint,
        status: SummaryStatus,
        error: String,
    },
}

impl EndpointSummary {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            EndpointSummary::Ok { endpoint, .. } => *endpoint,
            EndpointSummary::Fail { endpoint, .. } => *endpoint,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, EndpointSummary::Ok { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SummaryStatus {
    Ok,
    Fail,
}

/// `success` travels as `"YES"`/`"NO"` in the result file.
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *v { "YES" } else { "NO" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(String::deserialize(d)? == "YES")
    }
}

/// min/mean/p95 travel as 2-decimal strings (e.g. `"12.34"`) in the result file.
mod two_decimals {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{v:.2}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        String::deserialize(d)?
            .parse::<f64>()
            .map_err(serde::de::Error::custom)
    }
}
