use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalkError {
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("URL has no host: {url}")]
    MissingHost { url: String },

    #[error("unsupported scheme '{scheme}' in {url}, expected http or https")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Heuristic used to decide whether the last path segment names a file
/// rather than a directory. Any dot counts, so `v1.2` is a "file" too.
pub fn looks_like_file(segment: &str) -> bool {
    segment.contains('.')
}

/// Ancestor URLs of `target`, nearest parent first and the site root last.
///
/// A candidate identical to the target (either as typed or once parsed) is
/// left out; nothing else is deduplicated.
pub fn candidate_urls(target: &str) -> Result<Vec<String>, WalkError> {
    let parsed = parse_target(target)?;
    let root = root_of(&parsed);
    let is_target = |candidate: &str| candidate == target || candidate == parsed.as_str();

    let trimmed = parsed.path().trim_matches('/');
    let segments: Vec<&str> = if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    };

    let start_index = match segments.last() {
        Some(last) if looks_like_file(last) => segments.len() - 1,
        _ => segments.len(),
    };

    let mut out = Vec::with_capacity(start_index + 1);
    for i in (1..=start_index).rev() {
        let mut candidate = root.clone();
        candidate.set_path(&format!("/{}/", segments[..i].join("/")));
        if !is_target(candidate.as_str()) {
            out.push(candidate.to_string());
        }
    }
    if !is_target(root.as_str()) {
        out.push(root.to_string());
    }
    Ok(out)
}

fn parse_target(target: &str) -> Result<Url, WalkError> {
    let parsed = Url::parse(target).map_err(|e| WalkError::InvalidUrl {
        url: target.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(WalkError::UnsupportedScheme {
            url: target.to_string(),
            scheme: parsed.scheme().to_string(),
        });
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(WalkError::MissingHost {
            url: target.to_string(),
        });
    }
    Ok(parsed)
}

// scheme://authority/ without query or fragment
fn root_of(parsed: &Url) -> Url {
    let mut root = parsed.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}
