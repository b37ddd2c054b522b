use std::collections::BTreeMap;

use crate::cli::args::CliArgs;

/// Checks the arguments that can be judged on their own and returns the
/// parsed `-H` headers. The timeout is checked after the config merge.
pub fn validate(args: &CliArgs) -> Result<BTreeMap<String, String>, String> {
    if args.url.trim().is_empty() {
        return Err("invalid --url, expected a non-empty URL".to_string());
    }
    match args.headers.as_deref() {
        Some(raw) => crate::utils::parse_custom_headers(raw)
            .map_err(|e| format!("invalid --headers '{raw}': {e}")),
        None => Ok(BTreeMap::new()),
    }
}
