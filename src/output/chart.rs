use anyhow::Result;
use chrono::{DateTime, Utc};
use std::io::Write;

use crate::report::{BuildTimes, NodeSeries, SeriesFilter};

/// Line colors, assigned to nodes in alphabetical order and reused cyclically.
pub const PALETTE: [&str; 10] = [
    "red",
    "cyan",
    "blue",
    "lightblue",
    "purple",
    "brown",
    "lime",
    "magenta",
    "orange",
    "olivedrab",
];

const WIDTH: f64 = 1600.0;
const HEIGHT: f64 = 800.0;
const MARGIN: f64 = 70.0;
/// The plot keeps 80% of the width; the legend sits in the rest.
const PLOT_SHARE: f64 = 0.8;
const TICKS: usize = 5;

/// Writes build times as a standalone SVG line chart, one line per node.
///
/// Each series is passed through `filter` first. Nodes whose filtered series
/// is empty still get a legend entry.
pub fn write_build_times_chart(
    build_times: &BuildTimes,
    filter: &SeriesFilter,
    output: &mut dyn Write,
) -> Result<()> {
    let filtered: Vec<(&str, NodeSeries)> = build_times
        .iter()
        .map(|(node, series)| (node.as_str(), filter.apply(series)))
        .collect();

    let plot_left = MARGIN;
    let plot_top = MARGIN / 2.0;
    let plot_width = WIDTH * PLOT_SHARE - MARGIN * 1.5;
    let plot_height = HEIGHT - MARGIN * 1.5;
    let axes = Axes::fit(filtered.iter().map(|(_, s)| s), plot_left, plot_top, plot_width, plot_height);

    writeln!(
        output,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(output, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        output,
        r#"  <rect x="{plot_left}" y="{plot_top}" width="{plot_width}" height="{plot_height}" fill="none" stroke="black"/>"#
    )?;

    if let Some(axes) = &axes {
        write_ticks(axes, output)?;
    }

    for (i, (node, series)) in filtered.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        if let Some(axes) = &axes {
            write_line(axes, node, series, color, output)?;
        }
        write_legend_entry(i, node, color, output)?;
    }

    writeln!(output, "</svg>")?;
    Ok(())
}

/// Maps time and minutes onto the plot rectangle.
struct Axes {
    start_ms: f64,
    span_ms: f64,
    max_minutes: f64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Axes {
    fn fit<'a>(
        series: impl Iterator<Item = &'a NodeSeries>,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Option<Self> {
        let mut start: Option<DateTime<Utc>> = None;
        let mut end: Option<DateTime<Utc>> = None;
        let mut max_minutes: f64 = 0.0;

        for s in series {
            let Some((first, last)) = s.time_range() else {
                continue;
            };
            start = Some(start.map_or(first, |t| t.min(first)));
            end = Some(end.map_or(last, |t| t.max(last)));
            for (_, v) in s.points() {
                max_minutes = max_minutes.max(*v);
            }
        }

        let (start, end) = (start?, end?);

        #[allow(clippy::cast_precision_loss)]
        let (start_ms, span_ms) = (
            start.timestamp_millis() as f64,
            ((end - start).num_milliseconds() as f64).max(1.0),
        );

        Some(Self {
            start_ms,
            span_ms,
            max_minutes: if max_minutes > 0.0 { max_minutes * 1.05 } else { 1.0 },
            left,
            top,
            width,
            height,
        })
    }

    fn x(&self, ts: DateTime<Utc>) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let offset = ts.timestamp_millis() as f64 - self.start_ms;
        self.left + offset / self.span_ms * self.width
    }

    fn y(&self, minutes: f64) -> f64 {
        self.top + self.height - minutes / self.max_minutes * self.height
    }
}

fn write_ticks(axes: &Axes, output: &mut dyn Write) -> Result<()> {
    let bottom = axes.top + axes.height;

    for i in 0..=TICKS {
        #[allow(clippy::cast_precision_loss)]
        let fraction = i as f64 / TICKS as f64;

        #[allow(clippy::cast_possible_truncation)]
        let tick_ms = (axes.start_ms + fraction * axes.span_ms) as i64;
        let label = DateTime::from_timestamp_millis(tick_ms)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let x = axes.left + fraction * axes.width;
        writeln!(
            output,
            r#"  <text x="{x:.1}" y="{:.1}" text-anchor="middle">{label}</text>"#,
            bottom + 18.0
        )?;

        let minutes = fraction * axes.max_minutes;
        let y = axes.y(minutes);
        writeln!(
            output,
            r#"  <text x="{:.1}" y="{y:.1}" text-anchor="end">{minutes:.1}</text>"#,
            axes.left - 6.0
        )?;
    }

    Ok(())
}

fn write_line(
    axes: &Axes,
    node: &str,
    series: &NodeSeries,
    color: &str,
    output: &mut dyn Write,
) -> Result<()> {
    if series.is_empty() {
        return Ok(());
    }

    let points = series
        .points()
        .iter()
        .map(|(ts, v)| format!("{:.1},{:.1}", axes.x(*ts), axes.y(*v)))
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(
        output,
        r#"  <polyline fill="none" stroke="{color}" stroke-width="2" points="{points}"><title>{}</title></polyline>"#,
        escape_xml(node)
    )?;
    Ok(())
}

fn write_legend_entry(index: usize, node: &str, color: &str, output: &mut dyn Write) -> Result<()> {
    let x = WIDTH * PLOT_SHARE;

    #[allow(clippy::cast_precision_loss)]
    let y = HEIGHT / 2.0 - (PALETTE.len() as f64 * 10.0) + index as f64 * 20.0;

    writeln!(
        output,
        r#"  <line x1="{x}" y1="{y}" x2="{:.1}" y2="{y}" stroke="{color}" stroke-width="2"/>"#,
        x + 24.0
    )?;
    writeln!(
        output,
        r#"  <text x="{:.1}" y="{:.1}">{}</text>"#,
        x + 30.0,
        y + 4.0,
        escape_xml(node)
    )?;
    Ok(())
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i64, f64)]) -> NodeSeries {
        NodeSeries::from_points(
            points
                .iter()
                .map(|(minute, v)| (DateTime::from_timestamp(minute * 60, 0).unwrap(), *v))
                .collect(),
        )
    }

    fn render(build_times: &BuildTimes, filter: &SeriesFilter) -> String {
        let mut output = Vec::new();
        write_build_times_chart(build_times, filter, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_chart_structure() {
        let times: BuildTimes = [
            ("All".to_string(), series(&[(0, 1.0), (10, 3.0)])),
            ("nodeA".to_string(), series(&[(0, 1.0), (10, 3.0)])),
        ]
        .into_iter()
        .collect();

        let svg = render(&times, &SeriesFilter::Identity);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">nodeA</text>"));
    }

    #[test]
    fn test_chart_colors_follow_alphabetical_order_and_cycle() {
        let times: BuildTimes = (0..11)
            .map(|i| (format!("node{i:02}"), series(&[(0, 1.0), (1, 2.0)])))
            .collect();

        let svg = render(&times, &SeriesFilter::Identity);
        let strokes: Vec<&str> = svg
            .lines()
            .filter(|l| l.contains("<polyline"))
            .map(|l| {
                let start = l.find("stroke=\"").unwrap() + 8;
                let end = start + l[start..].find('"').unwrap();
                &l[start..end]
            })
            .collect();

        assert_eq!(strokes[0], "red");
        assert_eq!(strokes[1], "cyan");
        assert_eq!(strokes[9], "olivedrab");
        assert_eq!(strokes[10], "red");
    }

    #[test]
    fn test_chart_legend_outside_plot_area() {
        let times: BuildTimes = [("All".to_string(), series(&[(0, 1.0)]))]
            .into_iter()
            .collect();

        let svg = render(&times, &SeriesFilter::Identity);

        assert!(svg.contains(&format!("<line x1=\"{}\"", WIDTH * PLOT_SHARE)));
    }

    #[test]
    fn test_chart_escapes_node_names() {
        let times: BuildTimes = [("a<b>&c".to_string(), series(&[(0, 1.0)]))]
            .into_iter()
            .collect();

        let svg = render(&times, &SeriesFilter::Identity);

        assert!(svg.contains("a&lt;b&gt;&amp;c"));
        assert!(!svg.contains("a<b>"));
    }

    #[test]
    fn test_chart_without_points_still_renders() {
        let times: BuildTimes = [("All".to_string(), NodeSeries::default())]
            .into_iter()
            .collect();

        let svg = render(&times, &SeriesFilter::Pad);

        assert!(!svg.contains("<polyline"));
        assert!(svg.contains(">All</text>"));
    }
}
