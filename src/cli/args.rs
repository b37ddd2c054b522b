use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dirchecker",
    version,
    about = "Check a URL and its parent directories for directory listings",
    long_about = "dirchecker requests the given URL and every parent path up to the site root, and reports the ones that look like a server-generated directory listing.\n\nExamples:\n  dirchecker -u https://target.tld/assets/js/app.js\n  dirchecker -u https://target.tld/files/ -to 5 -vs -v\n  dirchecker -u https://target.tld/a/b/ -H 'Cookie:session=1,X-Api-Key:abc'"
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        required = true,
        help_heading = "Input",
        help = "URL to check."
    )]
    pub url: String,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to a YAML config file."
    )]
    pub config: Option<String>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds [default: 10]."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "vs",
        visible_alias = "verify-ssl",
        action = ArgAction::SetTrue,
        help_heading = "HTTP",
        help = "Verify SSL certificates."
    )]
    pub verify_ssl: bool,

    #[arg(
        long = "ua",
        visible_alias = "user-agent",
        value_name = "AGENT",
        help_heading = "HTTP",
        help = "Custom User-Agent [default: dirChecker/1.3]."
    )]
    pub user_agent: Option<String>,

    #[arg(
        short = 'H',
        long = "headers",
        value_name = "HEADERS",
        help_heading = "HTTP",
        help = "Custom headers, formatted as 'Header1:Value1,Header2:Value2'."
    )]
    pub headers: Option<String>,

    #[arg(
        short = 'S',
        long = "silent",
        action = ArgAction::SetTrue,
        help_heading = "Output",
        help = "Suppress the banner and the completion summary."
    )]
    pub silent: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::SetTrue,
        help_heading = "Output",
        help = "Print status, headers and verdict for every request."
    )]
    pub verbose: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        action = ArgAction::SetTrue,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}

// single-dash spellings accepted for compatibility with older invocations
const LEGACY_FLAGS: [(&str, &str); 3] = [("-to", "--to"), ("-vs", "--vs"), ("-ua", "--ua")];

/// Rewrites `-to`, `-vs` and `-ua` (optionally with `=value`) to their long
/// forms; clap only accepts single-character short flags.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for arg in args {
        if passthrough || arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let rewritten = LEGACY_FLAGS.iter().find_map(|(legacy, long)| {
            if arg == *legacy {
                Some((*long).to_string())
            } else {
                arg.strip_prefix(legacy)
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(|value| format!("{long}={value}"))
            }
        });
        out.push(rewritten.unwrap_or(arg));
    }
    out
}
