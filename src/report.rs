use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EndpointSummary, Measurement, Target};

/// The durable artifact of a run. Field names are the contract consumed by
/// downstream tooling and must not change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub meta: Meta,
    pub summary: Vec<EndpointSummary>,
    pub detailed_log: Vec<Measurement>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meta {
    pub region: String,
    pub slug: String,
    #[serde(rename = "tokenId")]
    pub token_id: String,
    pub timestamp: String,
}

impl RunReport {
    pub fn new(region: &str, target: &Target, summary: Vec<EndpointSummary>, detailed_log: Vec<Measurement>) -> Self {
        Self {
            meta: Meta {
                region: region.to_string(),
                slug: target.slug.clone(),
                token_id: target.token_id.clone(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            summary,
            detailed_log,
        }
    }

    /// `latency_results_{region}_{unix_ms}.json` under `dir`, pretty-printed.
    pub fn write(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(format!(
            "latency_results_{}_{}.json",
            self.meta.region,
            Utc::now().timestamp_millis()
        ));
        let body = serde_json::to_string_pretty(self)?;
        fs::write(&path, body)?;
        Ok(path)
    }

    /// Console summary table. Observational only, not part of the contract.
    pub fn print_summary(&self) {
        println!(
            "{:<14} {:>8} {:>10} {:>10} {:>10}  {}",
            "endpoint", "samples", "min ms", "mean ms", "p95 ms", "status"
        );
        for s in &self.summary {
            match s {
                EndpointSummary::Ok {
                    endpoint,
                    samples,
                    min,
                    mean,
                    p95,
                    ..
                } => println!(
                    "{:<14} {:>8} {:>10.2} {:>10.2} {:>10.2}  OK",
                    endpoint.label(),
                    samples,
                    min,
                    mean,
                    p95
                ),
                EndpointSummary::Fail {
                    endpoint, error, ..
                } => println!(
                    "{:<14} {:>8} {:>10} {:>10} {:>10}  FAIL ({error})",
                    endpoint.label(),
                    "-",
                    "-",
                    "-",
                    "-"
                ),
            }
        }
    }
}
