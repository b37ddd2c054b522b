use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = dirchecker::app::run_cli() {
        eprintln!("{} {}", "error:".bold().red(), e);
        exit(1);
    }
}
