use std::collections::BTreeMap;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;

use crate::cli::args::{self, CliArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, Reporter};
use crate::runner::{Options, Runner, ScanResult};
use crate::utils;

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RunConfig {
    url: String,
    timeout: u64,
    verify_ssl: bool,
    user_agent: String,
    headers: BTreeMap<String, String>,
    silent: bool,
    verbose: bool,
    no_color: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    let cli_headers = validation::validate(&args)?;

    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(utils::DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid --timeout, expected a positive number of seconds".to_string());
    }

    let mut headers = cfg.headers.unwrap_or_default();
    headers.extend(cli_headers);

    Ok(RunConfig {
        url: utils::trim_url(&args.url),
        timeout,
        verify_ssl: args.verify_ssl || cfg.verify_ssl.unwrap_or(false),
        user_agent: args
            .user_agent
            .or(cfg.user_agent)
            .unwrap_or_else(|| utils::DEFAULT_USER_AGENT.to_string()),
        headers,
        silent: args.silent || cfg.silent.unwrap_or(false),
        verbose: args.verbose || cfg.verbose.unwrap_or(false),
        no_color: args.no_color || cfg.no_color.unwrap_or(false),
    })
}

fn print_summary(result: &ScanResult) {
    let findings = result.findings();
    println!();
    if findings.is_empty() {
        println!(
            ":: Completed :: {} urls checked, no directory listing found :: {:.1}s ::",
            result.records.len(),
            result.elapsed.as_secs_f32()
        );
        return;
    }
    for url in findings.iter() {
        println!("{} {}", "[+]".bold().green(), url);
    }
    println!(
        ":: Completed :: {} urls checked, {} {} :: {:.1}s ::",
        result.records.len(),
        findings.len(),
        if findings.len() == 1 {
            "listing"
        } else {
            "listings"
        },
        result.elapsed.as_secs_f32()
    );
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let runner = Runner::new(Options {
        url: run.url.clone(),
        timeout: Duration::from_secs(run.timeout),
        verify_ssl: run.verify_ssl,
        user_agent: run.user_agent.clone(),
        headers: run.headers.clone(),
    })
    .map_err(|e| e.to_string())?;

    if run.verbose {
        format_kv_line("Target", &run.url);
        format_kv_line(
            "Walk",
            &format!("{} parent url(s) after the target", runner.candidates().len()),
        );
        format_kv_line(
            "HTTP",
            &format!(
                "timeout={}s verify-ssl={} user-agent={}",
                run.timeout,
                format_bool(run.verify_ssl),
                run.user_agent
            ),
        );
    }

    let result = {
        // dropped before the summary so the spinner line is cleared first
        let reporter = Reporter::new(run.verbose, run.headers.clone());
        runner.run(&reporter).await.map_err(|e| e.to_string())?
    };

    if !run.silent {
        print_summary(&result);
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let argv = args::normalize_legacy_flags(std::env::args());
    let args = match CliArgs::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => {
                let rendered = e.to_string();
                let message = rendered.trim_start_matches("error: ").trim_end();
                return Err(message.to_string());
            }
        },
    };

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path))?,
        None => ConfigFile::default(),
    };

    let run = build_run_config(args, cfg)?;

    if run.no_color {
        colored::control::set_override(false);
    }
    crate::logging::init_logging(run.no_color);
    if !run.silent {
        output::print_banner(run.no_color);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["dirchecker", "-u", " http://example.com/a/ "];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn defaults_match_documented_values() {
        let run = build_run_config(args(&[]), ConfigFile::default()).unwrap();
        assert_eq!(run.url, "http://example.com/a/");
        assert_eq!(run.timeout, 10);
        assert!(!run.verify_ssl);
        assert_eq!(run.user_agent, "dirChecker/1.3");
        assert!(run.headers.is_empty());
        assert!(!run.silent && !run.verbose && !run.no_color);
    }

    #[test]
    fn cli_overrides_config_file() {
        let cfg = ConfigFile {
            timeout: Some(30),
            user_agent: Some("from-config".to_string()),
            verify_ssl: Some(true),
            headers: Some(BTreeMap::from([
                ("A".to_string(), "cfg".to_string()),
                ("B".to_string(), "cfg".to_string()),
            ])),
            ..ConfigFile::default()
        };
        let run = build_run_config(args(&["--to", "2", "-H", "A:cli"]), cfg).unwrap();
        assert_eq!(run.timeout, 2);
        assert_eq!(run.user_agent, "from-config");
        assert!(run.verify_ssl);
        assert_eq!(run.headers.get("A").map(String::as_str), Some("cli"));
        assert_eq!(run.headers.get("B").map(String::as_str), Some("cfg"));
    }

    #[test]
    fn zero_timeout_from_config_is_rejected() {
        let cfg = ConfigFile {
            timeout: Some(0),
            ..ConfigFile::default()
        };
        assert!(build_run_config(args(&[]), cfg).is_err());
    }

    #[test]
    fn zero_timeout_from_cli_is_rejected() {
        let err = build_run_config(args(&["--to", "0"]), ConfigFile::default()).unwrap_err();
        assert!(err.contains("--timeout"));
    }

    #[test]
    fn malformed_headers_fail_before_any_request() {
        let err = build_run_config(args(&["-H", "oops"]), ConfigFile::default()).unwrap_err();
        assert!(err.contains("oops"));
    }
}
