use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use thiserror::Error;

use crate::detector;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("{source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct ProberConfig {
    pub timeout: Duration,
    pub verify_ssl: bool,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub url: String,
    pub status: u16,
    pub content_length: Option<String>,
    pub content_type: Option<String>,
    pub is_listing: bool,
}

impl ProbeOutcome {
    /// A 200 response that also looks like an index page.
    pub fn is_finding(&self) -> bool {
        self.status == 200 && self.is_listing
    }
}

/// Sends the GET requests. One client is shared by every probe so
/// connections to the target are reused across the walk.
#[derive(Clone, Debug)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new(config: &ProberConfig) -> Result<Self, ProbeError> {
        let headers = build_default_headers(&config.user_agent, &config.headers)?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(config.timeout)
            .danger_accept_invalid_hostnames(!config.verify_ssl)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ProbeError::HttpClientBuild { source: e })?;
        Ok(Self { client })
    }

    pub async fn probe(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let request_error = |source| ProbeError::Request {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().await.map_err(request_error)?;
        let status = resp.status().as_u16();
        let content_length = header_value(resp.headers(), CONTENT_LENGTH);
        let content_type = header_value(resp.headers(), CONTENT_TYPE);
        let body = resp.text().await.map_err(request_error)?;

        let matched = detector::matched_signature(&body);
        if let Some(m) = matched {
            tracing::debug!(%url, status, "listing matched on {m}");
        }
        Ok(ProbeOutcome {
            url: url.to_string(),
            status,
            content_length,
            content_type,
            is_listing: matched.is_some(),
        })
    }
}

pub(crate) fn build_default_headers(
    user_agent: &str,
    custom: &BTreeMap<String, String>,
) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::new();
    let ua = HeaderValue::from_str(user_agent).map_err(|e| ProbeError::InvalidHeader {
        name: "User-Agent".to_string(),
        message: e.to_string(),
    })?;
    headers.insert(reqwest::header::USER_AGENT, ua);
    for (k, v) in custom.iter() {
        let key = HeaderName::from_str(k).map_err(|e| ProbeError::InvalidHeader {
            name: k.clone(),
            message: e.to_string(),
        })?;
        let value = HeaderValue::from_str(v).map_err(|e| ProbeError::InvalidHeader {
            name: k.clone(),
            message: e.to_string(),
        })?;
        headers.insert(key, value);
    }
    Ok(headers)
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
