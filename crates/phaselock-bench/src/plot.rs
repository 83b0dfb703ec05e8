//! SVG rendering of a run: per-trial error trace and error-rate histograms.

use std::fmt::Write as _;

use crate::runner::TrialTable;
use crate::stats::Summary;

/// Trials drawn in the trace panel.
pub const TRACE_TRIALS: usize = 40;

/// Histogram bins per condition.
pub const HISTOGRAM_BINS: usize = 15;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 400.0;
const PANEL_W: f64 = 400.0;
const PANEL_H: f64 = 290.0;
const TOP: f64 = 50.0;
const LEFT_PANEL_X: f64 = 70.0;
const RIGHT_PANEL_X: f64 = 570.0;

const BASELINE_COLOR: &str = "#d62728";
const STABILIZED_COLOR: &str = "#1f77b4";

/// Density histogram of `values` over `[lo, hi]`.
///
/// Bin heights integrate to one over the range. Values outside the range are
/// ignored; the top edge is inclusive.
pub fn histogram(values: &[f64], bins: usize, lo: f64, hi: f64) -> Vec<f64> {
    let mut counts = vec![0usize; bins];
    if bins == 0 || hi <= lo {
        return vec![0.0; bins];
    }
    let width = (hi - lo) / bins as f64;
    let mut total = 0usize;
    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let bin = (((v - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
        total += 1;
    }
    if total == 0 {
        return vec![0.0; bins];
    }
    counts
        .into_iter()
        .map(|c| c as f64 / (total as f64 * width))
        .collect()
}

/// Render the two-panel figure as a standalone SVG document.
pub fn render_svg(table: &TrialTable, summary: &Summary) -> String {
    let baseline = table.baseline_rates();
    let stabilized = table.stabilized_rates();

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    let title = match summary.improvement_pct {
        Some(pct) => format!("{pct:+.1}%"),
        None => "no data".to_string(),
    };
    trace_panel(&mut svg, &baseline, &stabilized, &title);
    histogram_panel(&mut svg, &baseline, &stabilized);

    svg.push_str("</svg>\n");
    svg
}

fn frame(svg: &mut String, x0: f64, title: &str, x_label: &str, y_label: &str) {
    let _ = writeln!(
        svg,
        r##"<rect x="{x0}" y="{TOP}" width="{PANEL_W}" height="{PANEL_H}" fill="none" stroke="#333"/>"##
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="14">{}</text>"#,
        x0 + PANEL_W / 2.0,
        TOP - 15.0,
        escape(title)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">{x_label}</text>"#,
        x0 + PANEL_W / 2.0,
        TOP + PANEL_H + 35.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90 {x} {y})">{y_label}</text>"#,
        x = x0 - 45.0,
        y = TOP + PANEL_H / 2.0
    );
}

fn axis_labels(svg: &mut String, x0: f64, x_range: (f64, f64), y_range: (f64, f64)) {
    let bottom = TOP + PANEL_H;
    let _ = writeln!(
        svg,
        r#"<text x="{x0}" y="{}" text-anchor="middle">{}</text>"#,
        bottom + 16.0,
        tick(x_range.0)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
        x0 + PANEL_W,
        bottom + 16.0,
        tick(x_range.1)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
        x0 - 6.0,
        bottom,
        tick(y_range.0)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
        x0 - 6.0,
        TOP + 10.0,
        tick(y_range.1)
    );
}

fn legend(svg: &mut String, x0: f64) {
    for (i, (label, color)) in [("Baseline", BASELINE_COLOR), ("Stabilized", STABILIZED_COLOR)]
        .iter()
        .enumerate()
    {
        let y = TOP + 15.0 + 16.0 * i as f64;
        let x = x0 + PANEL_W - 100.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{x}" y="{}" width="12" height="8" fill="{color}" fill-opacity="0.7"/>"#,
            y - 8.0
        );
        let _ = writeln!(svg, r#"<text x="{}" y="{y}">{label}</text>"#, x + 18.0);
    }
}

fn trace_panel(svg: &mut String, baseline: &[f64], stabilized: &[f64], title: &str) {
    let x0 = LEFT_PANEL_X;
    frame(svg, x0, title, "Trial", "Error");

    let n = baseline.len().min(TRACE_TRIALS);
    if n == 0 {
        no_data(svg, x0);
        return;
    }

    let y_max = baseline[..n]
        .iter()
        .chain(&stabilized[..n])
        .fold(0.0_f64, |m, &v| m.max(v))
        .max(1e-3)
        * 1.1;
    let span = n.saturating_sub(1).max(1) as f64;
    let px = |i: usize| x0 + i as f64 / span * PANEL_W;
    let py = |v: f64| TOP + PANEL_H - v / y_max * PANEL_H;

    for (rates, color) in [(baseline, BASELINE_COLOR), (stabilized, STABILIZED_COLOR)] {
        let points: Vec<String> = rates[..n]
            .iter()
            .enumerate()
            .map(|(i, &v)| format!("{:.2},{:.2}", px(i), py(v)))
            .collect();
        let _ = writeln!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-opacity="0.7" stroke-width="1.5"/>"#,
            points.join(" ")
        );
    }

    axis_labels(svg, x0, (0.0, (n - 1) as f64), (0.0, y_max));
    legend(svg, x0);
}

fn histogram_panel(svg: &mut String, baseline: &[f64], stabilized: &[f64]) {
    let x0 = RIGHT_PANEL_X;
    frame(svg, x0, "Error distribution", "Error", "Density");

    let all = || baseline.iter().chain(stabilized);
    if baseline.is_empty() {
        no_data(svg, x0);
        return;
    }

    let mut lo = all().fold(f64::INFINITY, |m, &v| m.min(v));
    let mut hi = all().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if hi - lo < 1e-9 {
        lo -= 0.005;
        hi += 0.005;
    }

    let densities = [
        (histogram(baseline, HISTOGRAM_BINS, lo, hi), BASELINE_COLOR),
        (histogram(stabilized, HISTOGRAM_BINS, lo, hi), STABILIZED_COLOR),
    ];
    let d_max = densities
        .iter()
        .flat_map(|(d, _)| d.iter().copied())
        .fold(0.0_f64, f64::max)
        .max(1e-9)
        * 1.1;

    let bin_w = PANEL_W / HISTOGRAM_BINS as f64;
    for (density, color) in &densities {
        for (i, &d) in density.iter().enumerate() {
            if d == 0.0 {
                continue;
            }
            let h = d / d_max * PANEL_H;
            let _ = writeln!(
                svg,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}" fill-opacity="0.6"/>"#,
                x0 + i as f64 * bin_w,
                TOP + PANEL_H - h,
                bin_w,
                h
            );
        }
    }

    axis_labels(svg, x0, (lo, hi), (0.0, d_max));
    legend(svg, x0);
}

fn no_data(svg: &mut String, x0: f64) {
    let _ = writeln!(
        svg,
        r##"<text x="{}" y="{}" text-anchor="middle" fill="#888">no data</text>"##,
        x0 + PANEL_W / 2.0,
        TOP + PANEL_H / 2.0
    );
}

fn tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e6 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{Measurement, TrialRecord};
    use crate::seed::TrialSeeds;

    fn table(rates: &[(f64, f64)]) -> TrialTable {
        let m = |rate| Measurement {
            circuit_fingerprint: 1,
            shots: 10,
            hits: 0,
            error_rate: rate,
        };
        TrialTable {
            seed: 0,
            requested: rates.len(),
            records: rates
                .iter()
                .enumerate()
                .map(|(index, &(b, s))| TrialRecord {
                    index,
                    seed: TrialSeeds::derive(0, index),
                    expected_outcome: "0".into(),
                    circuit_fingerprint: 1,
                    angles: vec![],
                    baseline: m(b),
                    stabilized: m(s),
                })
                .collect(),
            failures: vec![],
        }
    }

    #[test]
    fn test_histogram_density_integrates_to_one() {
        let values = [0.1, 0.2, 0.2, 0.3, 0.5, 0.5];
        let density = histogram(&values, 4, 0.1, 0.5);
        let width = 0.1;
        let area: f64 = density.iter().map(|d| d * width).sum();
        assert!((area - 1.0).abs() < 1e-9);
        // Top edge goes into the last bin.
        assert!(density[3] > 0.0);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        assert_eq!(histogram(&[0.2], 3, 0.2, 0.2), vec![0.0; 3]);
        assert_eq!(histogram(&[], 3, 0.0, 1.0), vec![0.0; 3]);
    }

    #[test]
    fn test_render_svg() {
        let rates: Vec<(f64, f64)> = (0..60)
            .map(|i| (0.2 + 0.001 * f64::from(i), 0.15 + 0.001 * f64::from(i)))
            .collect();
        let t = table(&rates);
        let summary = Summary::from_table(&t, 15.0);
        let svg = render_svg(&t, &summary);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        // Only the first trials are traced.
        let points = svg
            .lines()
            .find(|l| l.starts_with("<polyline"))
            .unwrap()
            .split("points=\"")
            .nth(1)
            .unwrap()
            .split('"')
            .next()
            .unwrap()
            .split(' ')
            .count();
        assert_eq!(points, TRACE_TRIALS);
        assert!(svg.contains("+"));
    }

    #[test]
    fn test_render_svg_without_data() {
        let t = table(&[]);
        let summary = Summary::from_table(&t, 15.0);
        let svg = render_svg(&t, &summary);
        assert_eq!(svg.matches("no data").count(), 3);
        assert!(!svg.contains("<polyline"));
    }
}
