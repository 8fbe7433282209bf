use std::io::Write;
use std::path::PathBuf;

use crate::config::ProbeConfig;
use crate::discovery;
use crate::error::RunError;
use crate::probe::Prober;
use crate::report::RunReport;
use crate::stats;
use crate::types::{Endpoint, Measurement, Target};

/// Linear run pipeline: resolve target, collect, summarize, persist.
///
/// Collection is deliberately sequential; overlapping the requests would
/// change what each duration measures.
pub struct Runner {
    cfg: ProbeConfig,
    prober: Prober,
}

impl Runner {
    pub fn new(cfg: ProbeConfig) -> reqwest::Result<Self> {
        Ok(Self {
            cfg,
            prober: Prober::new()?,
        })
    }

    /// Execute one full run and return the written report path.
    ///
    /// Errors here are all fatal-before-collection: once the target resolves,
    /// individual request failures only show up in the report.
    pub async fn run(&self) -> anyhow::Result<PathBuf> {
        tracing::info!(region = %self.cfg.region, "latency run starting");

        let target = self.resolve_target().await?;
        tracing::info!(slug = %target.slug, "probing target");

        let log = self.collect(&target).await;

        let summary = Endpoint::ALL
            .iter()
            .map(|&e| stats::summarize(e, &log))
            .collect();
        let report = RunReport::new(&self.cfg.region, &target, summary, log);

        report.print_summary();
        let path = report.write(&self.cfg.out_dir)?;
        tracing::info!(path = %path.display(), "results saved");
        Ok(path)
    }

    /// Manual override when configured (still validated against the CLOB),
    /// otherwise Gamma discovery.
    async fn resolve_target(&self) -> Result<Target, RunError> {
        let client = self.prober.client();
        match &self.cfg.token_id {
            Some(token_id) => {
                tracing::info!(%token_id, "using manual token id, skipping discovery");
                let status = discovery::probe_price(client, &self.cfg.clob_url, token_id).await?;
                if status != 200 {
                    return Err(RunError::OverrideRejected {
                        token_id: token_id.clone(),
                        status,
                    });
                }
                tracing::info!("target locked, validated manual id on CLOB");
                Ok(Target::manual(token_id.clone()))
            }
            None => {
                discovery::find_valid_market(client, &self.cfg.gamma_url, &self.cfg.clob_url).await
            }
        }
    }

    /// `iterations × 3` sequential measurements, book/price/midpoint order,
    /// with a cooperative pause between iterations.
    async fn collect(&self, target: &Target) -> Vec<Measurement> {
        let mut log = Vec::with_capacity(self.cfg.iterations as usize * 3);
        tracing::info!(iterations = self.cfg.iterations, "collection starting");

        for i in 1..=self.cfg.iterations {
            print!(".");
            let _ = std::io::stdout().flush();

            for endpoint in Endpoint::ALL {
                let url = self.endpoint_url(endpoint, &target.token_id);
                log.push(self.prober.measure(endpoint, &url, i).await);
            }

            tokio::time::sleep(self.cfg.delay()).await;
        }
        println!("\nDone.");
        log
    }

    fn endpoint_url(&self, endpoint: Endpoint, token_id: &str) -> String {
        let clob = &self.cfg.clob_url;
        match endpoint {
            Endpoint::Book => format!("{clob}/book?token_id={token_id}"),
            Endpoint::Price => discovery::price_url(clob, token_id),
            Endpoint::Midpoint => format!("{clob}/midpoint?token_id={token_id}"),
        }
    }
}
