use std::collections::BTreeMap;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rand::seq::SliceRandom;

use crate::prober::ProbeOutcome;
use crate::utils;

const SPINNER_MESSAGE: &str = "[>] Running...";

const SPINNER_STYLES: &[&[&str]] = &[
    &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
    &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"],
    &["-", "\\", "|", "/"],
    &["┤", "┘", "┴", "└", "├", "┌", "┬", "┐"],
    &["◜", "◠", "◝", "◞", "◡", "◟"],
    &["◐", "◓", "◑", "◒"],
    &["◴", "◷", "◶", "◵"],
    &["▖", "▘", "▝", "▗"],
    &["✶", "✸", "✹", "✺", "✹", "✷"],
    &[".  ", ".. ", "...", "   "],
    &["▁", "▃", "▄", "▅", "▆", "▇", "▆", "▅", "▄", "▃"],
    &["▉", "▊", "▋", "▌", "▍", "▎", "▏", "▎", "▍", "▌", "▋", "▊", "▉"],
];

/// Prints per-URL results. Holds the spinner so output can be interleaved
/// with it, and clears the spinner when dropped.
pub struct Reporter {
    verbose: bool,
    custom_headers: BTreeMap<String, String>,
    spinner: Option<ProgressBar>,
}

impl Reporter {
    /// The spinner only runs in non-verbose mode; verbose output is a
    /// continuous log and would fight with it.
    pub fn new(verbose: bool, custom_headers: BTreeMap<String, String>) -> Self {
        let spinner = (!verbose).then(|| start_spinner(ProgressDrawTarget::stderr()));
        Self {
            verbose,
            custom_headers,
            spinner,
        }
    }

    /// Non-verbose reporter drawing to a hidden target. Returns a second
    /// handle on the spinner so callers can observe it after the drop.
    #[cfg(test)]
    pub(crate) fn with_hidden_spinner(
        custom_headers: BTreeMap<String, String>,
    ) -> (Self, ProgressBar) {
        let pb = start_spinner(ProgressDrawTarget::hidden());
        let reporter = Self {
            verbose: false,
            custom_headers,
            spinner: Some(pb.clone()),
        };
        (reporter, pb)
    }

    /// Reporter that never prints; for library callers that only want the
    /// returned `ScanResult`.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            custom_headers: BTreeMap::new(),
            spinner: None,
        }
    }

    pub fn report_outcome(&self, outcome: &ProbeOutcome) {
        let rendered = render_outcome(outcome, self.verbose, &self.custom_headers);
        self.emit(&rendered);
    }

    pub fn report_failure(&self, url: &str, message: &str) {
        if self.verbose {
            self.emit(&render_failure(url, message));
        }
    }

    fn emit(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.spinner.as_ref() {
            Some(pb) => pb.suspend(|| println!("{text}")),
            None => println!("{text}"),
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

fn start_spinner(target: ProgressDrawTarget) -> ProgressBar {
    let ticks = SPINNER_STYLES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(SPINNER_STYLES[0]);
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(target);
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(ticks)
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(SPINNER_MESSAGE);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Text block for one response; empty when there is nothing to show.
pub fn render_outcome(
    outcome: &ProbeOutcome,
    verbose: bool,
    custom_headers: &BTreeMap<String, String>,
) -> String {
    if !verbose && !outcome.is_listing {
        return String::new();
    }
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("\n{} {}", "[Testing]:".bold().white(), outcome.url));
    if verbose {
        lines.push(format!("{} {}", "[Status Code]:".bold(), outcome.status));
        if !custom_headers.is_empty() {
            lines.push(format!(
                "{} {}",
                "[Headers]:".bold(),
                utils::format_headers(custom_headers)
            ));
        }
        lines.push(format!(
            "{} {}",
            "[Content-Length]:".bold(),
            outcome.content_length.as_deref().unwrap_or("Unknown")
        ));
        lines.push(format!(
            "{} {}",
            "[Content-Type]:".bold(),
            outcome.content_type.as_deref().unwrap_or("Unknown")
        ));
    }
    if outcome.is_listing {
        lines.push(format!(
            "{} {}",
            "[Directory Listing]:".bold(),
            "Yes".bold().green()
        ));
    } else {
        lines.push(format!("{} {}", "[Directory Listing]:".bold(), "No".red()));
    }
    lines.join("\n")
}

pub fn render_failure(url: &str, message: &str) -> String {
    format!("{} {}: {}", "Error accessing".bold().red(), url, message)
}

pub fn print_banner(no_color: bool) {
    const BANNER: &str = r#"
     _ _       ___ _               _
  __| (_)_ __ / __\ |__   ___  ___| | _____ _ __
 / _` | | '__/ /  | '_ \ / _ \/ __| |/ / _ \ '__|
| (_| | | | / /___| | | |  __/ (__|   <  __/ |
 \__,_|_|_| \____/|_| |_|\___|\___|_|\_\___|_|
"#;
    let tagline = format!(
        "            v{} - why checking manually?\n",
        env!("CARGO_PKG_VERSION")
    );
    if no_color {
        print!("{BANNER}");
    } else {
        use std::io::Write;
        let mut out = rainbowcoat::stdout();
        if write!(out, "{BANNER}").is_err() {
            print!("{BANNER}");
        }
    }
    println!("{tagline}");
}
