use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::output::Reporter;
use crate::prober::{ProbeError, ProbeOutcome, Prober, ProberConfig};
use crate::utils;
use crate::walker::{self, WalkError};

#[derive(Clone, Debug)]
pub struct Options {
    pub url: String,
    pub timeout: Duration,
    pub verify_ssl: bool,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: Duration::from_secs(utils::DEFAULT_TIMEOUT_SECONDS),
            verify_ssl: false,
            user_agent: utils::DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no target URL provided")]
    NoTarget,

    #[error(transparent)]
    InvalidUrl(#[from] WalkError),

    #[error("invalid timeout, expected a positive duration")]
    InvalidTimeout,

    #[error(transparent)]
    Prober(#[from] ProbeError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeRecord {
    Outcome(ProbeOutcome),
    Failed { url: String, message: String },
}

impl ProbeRecord {
    pub fn url(&self) -> &str {
        match self {
            ProbeRecord::Outcome(o) => &o.url,
            ProbeRecord::Failed { url, .. } => url,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScanResult {
    pub target: String,
    pub records: Vec<ProbeRecord>,
    pub elapsed: Duration,
}

impl ScanResult {
    /// URLs that answered 200 with a listing, in probe order.
    pub fn findings(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter_map(|r| match r {
                ProbeRecord::Outcome(o) if o.is_finding() => Some(o.url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&ProbeRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r, ProbeRecord::Failed { .. }))
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    candidates: Vec<String>,
}

impl Runner {
    pub fn new(mut options: Options) -> Result<Self, RunnerError> {
        options.url = utils::trim_url(&options.url);
        if options.url.is_empty() {
            return Err(RunnerError::NoTarget);
        }
        if options.timeout.is_zero() {
            return Err(RunnerError::InvalidTimeout);
        }
        let candidates = walker::candidate_urls(&options.url)?;
        Ok(Self {
            options,
            candidates,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Ancestor URLs that will be probed after the target itself.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Probes the target, then each ancestor, one request at a time.
    /// A failed request is recorded and the walk moves on.
    pub async fn run(&self, reporter: &Reporter) -> Result<ScanResult, RunnerError> {
        let started_at = Instant::now();
        let prober = Prober::new(&ProberConfig {
            timeout: self.options.timeout,
            verify_ssl: self.options.verify_ssl,
            user_agent: self.options.user_agent.clone(),
            headers: self.options.headers.clone(),
        })?;
        tracing::debug!(
            target_url = %self.options.url,
            candidates = self.candidates.len(),
            "starting walk"
        );

        let urls = std::iter::once(&self.options.url).chain(self.candidates.iter());
        let mut records = Vec::with_capacity(self.candidates.len() + 1);
        for url in urls {
            records.push(probe_one(&prober, url, reporter).await);
        }

        Ok(ScanResult {
            target: self.options.url.clone(),
            records,
            elapsed: started_at.elapsed(),
        })
    }
}

async fn probe_one(prober: &Prober, url: &str, reporter: &Reporter) -> ProbeRecord {
    match prober.probe(url).await {
        Ok(outcome) => {
            tracing::debug!(%url, status = outcome.status, listing = outcome.is_listing, "probed");
            reporter.report_outcome(&outcome);
            ProbeRecord::Outcome(outcome)
        }
        Err(e) => {
            tracing::debug!(%url, error = %e, "probe failed");
            let message = e.to_string();
            reporter.report_failure(url, &message);
            ProbeRecord::Failed {
                url: url.to_string(),
                message,
            }
        }
    }
}
