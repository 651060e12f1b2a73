pub mod distance;
pub mod error;
pub mod graph;
pub mod pairwise;
pub mod pipeline;
pub mod ranking;
pub mod report;

pub use error::{HomeBiasError, Result};

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{}",
        r#"
  _                          _     _
 | |__   ___  _ __ ___   ___| |__ (_) __ _ ___
 | '_ \ / _ \| '_ ` _ \ / _ \ '_ \| |/ _` / __|
 | | | | (_) | | | | | |  __/ |_) | | (_| \__ \
 |_| |_|\___/|_| |_| |_|\___|_.__/|_|\__,_|___/
"#
        .bright_cyan()
    );
    println!(
        "  {} {}\n",
        "pairwise web-ranking distance".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
