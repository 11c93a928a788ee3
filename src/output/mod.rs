mod chart;
mod progress;
mod styling;
mod table;

pub use chart::write_build_times_chart;
pub use progress::FetchProgress;
use styling::{dim, magenta_bold};
pub use table::print_build_times;

/// Prints the `jobstats` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("⏱ jobstats"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Jenkins build times per node")
    );
}
