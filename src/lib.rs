pub mod app;
pub mod cli;
pub mod config;
pub mod detector;
pub mod logging;
pub mod output;
pub mod prober;
pub mod runner;
pub mod utils;
pub mod walker;

#[cfg(test)]
mod tests;
