//! Contribution charts: a donut chart rendered to SVG, and ranked text bars
//! for terminals.

use crate::contribution::{ContributionBreakdown, ContributionShare};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

/// Title shown above the donut chart.
pub const CHART_TITLE: &str = "Percentage Contribution of Features to Prediction";

/// Inner radius as a fraction of the outer radius.
pub const HOLE_RATIO: f64 = 0.4;

const PALETTE: [&str; 10] = [
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

const WIDTH: f64 = 520.0;
const HEIGHT: f64 = 360.0;
const CX: f64 = 180.0;
const CY: f64 = 200.0;
const RADIUS: f64 = 130.0;

/// One ring segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: String,
    pub percentage: f64,
    pub color: &'static str,
}

/// Donut chart of ranked contribution shares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub title: String,
    pub hole: f64,
    pub slices: Vec<DonutSlice>,
}

impl DonutChart {
    /// Chart for ranked shares, in rank order.
    pub fn from_shares(shares: &[ContributionShare]) -> Self {
        let slices = shares
            .iter()
            .enumerate()
            .map(|(i, share)| DonutSlice {
                label: share.label(),
                percentage: share.percentage,
                color: PALETTE[i % PALETTE.len()],
            })
            .collect();
        Self {
            title: CHART_TITLE.to_string(),
            hole: HOLE_RATIO,
            slices,
        }
    }

    /// `None` when the breakdown is undetermined; there is nothing to draw.
    pub fn from_breakdown(breakdown: &ContributionBreakdown) -> Option<Self> {
        match breakdown {
            ContributionBreakdown::Ranked(shares) if !shares.is_empty() => {
                Some(Self::from_shares(shares))
            }
            _ => None,
        }
    }

    /// Standalone SVG document. Zero-width slices are kept in the legend only.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">"
        );
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"32\" text-anchor=\"middle\" font-size=\"16\">{}</text>",
            WIDTH / 2.0,
            escape(&self.title)
        );

        let inner = RADIUS * self.hole;
        let total: f64 = self.slices.iter().map(|s| s.percentage).sum();
        let mut start = 0.0;
        for slice in &self.slices {
            if slice.percentage <= 0.0 || total <= 0.0 {
                continue;
            }
            let fraction = slice.percentage / total;
            let path = if fraction >= 1.0 - 1e-9 {
                ring_path(RADIUS, inner)
            } else {
                sector_path(start, start + fraction, RADIUS, inner)
            };
            let _ = write!(
                svg,
                "<path d=\"{path}\" fill=\"{}\" fill-rule=\"evenodd\" stroke=\"#ffffff\" stroke-width=\"1\"><title>{}</title></path>",
                slice.color,
                escape(&slice.label)
            );
            start += fraction;
        }

        for (i, slice) in self.slices.iter().enumerate() {
            let y = 90.0 + i as f64 * 24.0;
            let _ = write!(
                svg,
                "<rect x=\"340\" y=\"{:.1}\" width=\"14\" height=\"14\" fill=\"{}\"/><text x=\"362\" y=\"{:.1}\" font-size=\"13\">{}</text>",
                y - 11.0,
                slice.color,
                y,
                escape(&slice.label)
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Ranked horizontal bars, one line per share, e.g.
/// `BMI  ############------------------  60.0%`.
pub fn text_bars(shares: &[ContributionShare], width: usize) -> Vec<String> {
    let name_width = shares.iter().map(|s| s.feature.len()).max().unwrap_or(0);
    shares
        .iter()
        .map(|share| {
            let filled = ((share.percentage / 100.0) * width as f64).round() as usize;
            let filled = filled.min(width);
            format!(
                "{:<name_width$}  {}{}  {:>5.1}%",
                share.feature,
                "#".repeat(filled),
                "-".repeat(width - filled),
                share.percentage
            )
        })
        .collect()
}

fn point(fraction: f64, radius: f64) -> (f64, f64) {
    // Start at twelve o'clock, run clockwise.
    let angle = fraction * TAU - FRAC_PI_2;
    (CX + radius * angle.cos(), CY + radius * angle.sin())
}

fn sector_path(from: f64, to: f64, outer: f64, inner: f64) -> String {
    let large = if to - from > 0.5 { 1 } else { 0 };
    let (x0, y0) = point(from, outer);
    let (x1, y1) = point(to, outer);
    let (x2, y2) = point(to, inner);
    let (x3, y3) = point(from, inner);
    format!(
        "M {x0:.3} {y0:.3} A {outer:.3} {outer:.3} 0 {large} 1 {x1:.3} {y1:.3} \
         L {x2:.3} {y2:.3} A {inner:.3} {inner:.3} 0 {large} 0 {x3:.3} {y3:.3} Z"
    )
}

fn ring_path(outer: f64, inner: f64) -> String {
    let circle = |r: f64| {
        format!(
            "M {:.3} {CY:.3} A {r:.3} {r:.3} 0 1 1 {:.3} {CY:.3} A {r:.3} {r:.3} 0 1 1 {:.3} {CY:.3} Z",
            CX - r,
            CX + r,
            CX - r
        )
    };
    format!("{} {}", circle(outer), circle(inner))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribution::normalize;

    const NAMES: [&str; 5] = ["FBS", "BMI", "Age", "wc", "Hc"];

    fn scenario() -> ContributionBreakdown {
        normalize(&[2.0, -6.0, 0.0, 1.0, 1.0], &NAMES).unwrap()
    }

    #[test]
    fn chart_follows_rank_order() {
        let chart = DonutChart::from_breakdown(&scenario()).unwrap();
        assert_eq!(chart.title, CHART_TITLE);
        assert_eq!(chart.hole, 0.4);
        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["BMI (60.0%)", "FBS (20.0%)", "wc (10.0%)", "Hc (10.0%)", "Age (0.0%)"]
        );
    }

    #[test]
    fn undetermined_breakdown_has_no_chart() {
        assert!(DonutChart::from_breakdown(&ContributionBreakdown::Undetermined).is_none());
    }

    #[test]
    fn svg_draws_only_non_zero_slices() {
        let svg = DonutChart::from_breakdown(&scenario()).unwrap().to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(CHART_TITLE));
        assert_eq!(svg.matches("<path").count(), 4);
        // Legend lists every feature, including the zero share.
        assert!(svg.contains(">Age (0.0%)</text>"));
    }

    #[test]
    fn single_full_share_draws_a_ring() {
        let breakdown = normalize(&[0.0, 0.0, 3.0, 0.0, 0.0], &NAMES).unwrap();
        let svg = DonutChart::from_breakdown(&breakdown).unwrap().to_svg();
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains("A 130.000 130.000 0 1 1"));
        assert!(svg.contains("A 52.000 52.000 0 1 1"));
    }

    #[test]
    fn labels_are_escaped() {
        let breakdown = normalize(&[1.0], &["<b>&"]).unwrap();
        let svg = DonutChart::from_breakdown(&breakdown).unwrap().to_svg();
        assert!(svg.contains("&lt;b&gt;&amp; (100.0%)"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn text_bars_scale_with_share() {
        let lines = text_bars(scenario().shares(), 20);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], format!("BMI  {}{}   60.0%", "#".repeat(12), "-".repeat(8)));
        assert_eq!(lines[4], format!("Age  {}    0.0%", "-".repeat(20)));
    }
}
