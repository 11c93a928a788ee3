use std::fmt::Write;

use crate::report::BuildTimes;

const MEAN_HEADER: &str = "Mean build time";
const COUNT_HEADER: &str = "Number of builds";

/// Prints mean build time and build count per node to stdout.
///
/// Columns are tab-separated; the node column is as wide as the longest node
/// name so the numbers line up.
pub fn print_build_times(build_times: &BuildTimes) {
    print!("{}", render_build_times(build_times));
}

pub fn render_build_times(build_times: &BuildTimes) -> String {
    let node_width = build_times
        .keys()
        .map(|node| node.chars().count())
        .max()
        .unwrap_or(0);
    let mean_width = MEAN_HEADER.len();
    let count_width = COUNT_HEADER.len();

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<node_width$}\t{MEAN_HEADER:<mean_width$}\t{COUNT_HEADER:<count_width$}",
        "Node"
    );

    // BTreeMap keys are already in alphabetical order.
    for (node, series) in build_times {
        let _ = writeln!(
            output,
            "{node:<node_width$}\t{:>mean_width$.2}\t{:>count_width$}",
            series.mean(),
            series.len()
        );
    }

    output
}
