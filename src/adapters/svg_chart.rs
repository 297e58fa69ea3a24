//! Standalone SVG chart rendering.
//!
//! Every chart uses the same canvas: a fixed width/height with a padded plot
//! area. Empty inputs render a placeholder message instead of an empty axis.

use crate::domain::correlation::CorrelationMatrix;
use crate::domain::distribution::{Bin, BoxStats};
use crate::domain::series::SeriesPoint;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;

const NORMAL_COLOR: &str = "#1f77b4";
const OUTLIER_COLOR: &str = "#d62728";
const DENSITY_COLOR: &str = "#ff7f0e";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn open(title: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">
<rect width="100%" height="100%" fill="white"/>
<text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-family="sans-serif" font-size="16">{title}</text>
"#,
        w = WIDTH,
        h = HEIGHT,
        cx = WIDTH / 2.0,
        ty = PADDING / 2.0,
        title = escape(title)
    )
}

fn axes(x_label: &str, y_label: &str) -> String {
    let bottom = HEIGHT - PADDING;
    let right = WIDTH - PADDING;
    format!(
        r#"<line x1="{p:.1}" y1="{p:.1}" x2="{p:.1}" y2="{b:.1}" stroke="black"/>
<line x1="{p:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>
<text x="{cx:.1}" y="{xl:.1}" text-anchor="middle" font-family="sans-serif" font-size="12">{x}</text>
<text x="14" y="{cy:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" transform="rotate(-90 14 {cy:.1})">{y}</text>
"#,
        p = PADDING,
        b = bottom,
        r = right,
        cx = WIDTH / 2.0,
        xl = HEIGHT - PADDING / 4.0,
        cy = HEIGHT / 2.0,
        x = escape(x_label),
        y = escape(y_label)
    )
}

fn placeholder(title: &str, message: &str) -> String {
    format!(
        "{}<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"14\">{}</text>\n</svg>\n",
        open(title),
        WIDTH / 2.0,
        HEIGHT / 2.0,
        escape(message)
    )
}

/// Maps data coordinates into the padded plot area.
struct Scale {
    x_min: f64,
    x_span: f64,
    y_min: f64,
    y_span: f64,
}

impl Scale {
    fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        let span = |lo: f64, hi: f64| if hi > lo { hi - lo } else { 1.0 };
        Self {
            x_min,
            x_span: span(x_min, x_max),
            y_min,
            y_span: span(y_min, y_max),
        }
    }

    fn x(&self, v: f64) -> f64 {
        PADDING + (v - self.x_min) / self.x_span * (WIDTH - 2.0 * PADDING)
    }

    fn y(&self, v: f64) -> f64 {
        HEIGHT - PADDING - (v - self.y_min) / self.y_span * (HEIGHT - 2.0 * PADDING)
    }
}

fn bounds<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> (f64, f64) {
    values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Scatter of (x, y) points, normal points in blue and outliers in red.
pub fn scatter_svg(
    title: &str,
    x_label: &str,
    y_label: &str,
    normal: &[(f64, f64)],
    outliers: &[(f64, f64)],
) -> String {
    if normal.is_empty() && outliers.is_empty() {
        return placeholder(title, "No data available.");
    }
    let all = || normal.iter().chain(outliers);
    let (x_min, x_max) = bounds(all().map(|p| &p.0));
    let (y_min, y_max) = bounds(all().map(|p| &p.1));
    let scale = Scale::new(x_min, x_max, y_min, y_max);

    let mut svg = open(title);
    svg.push_str(&axes(x_label, y_label));
    for (points, color) in [(normal, NORMAL_COLOR), (outliers, OUTLIER_COLOR)] {
        for &(x, y) in points {
            svg.push_str(&format!(
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\"/>\n",
                scale.x(x),
                scale.y(y),
                color
            ));
        }
    }
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">normal ({})</text>\n\
         <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"11\" fill=\"{}\">outlier ({})</text>\n",
        WIDTH - PADDING - 90.0,
        PADDING + 12.0,
        NORMAL_COLOR,
        normal.len(),
        WIDTH - PADDING - 90.0,
        PADDING + 26.0,
        OUTLIER_COLOR,
        outliers.len()
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Histogram bars with an optional density curve rescaled to counts.
pub fn histogram_svg(title: &str, x_label: &str, bins: &[Bin], density: &[(f64, f64)]) -> String {
    if bins.is_empty() {
        return placeholder(title, "No data available.");
    }
    let total: usize = bins.iter().map(|b| b.count).sum();
    let bin_width = bins[0].upper - bins[0].lower;
    // density * n * width puts the curve on the count axis
    let to_count = total as f64 * bin_width;
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let max_density = density.iter().map(|p| p.1 * to_count).fold(0.0, f64::max);
    let scale = Scale::new(
        bins[0].lower,
        bins[bins.len() - 1].upper,
        0.0,
        max_count.max(max_density),
    );

    let mut svg = open(title);
    svg.push_str(&axes(x_label, "count"));
    for bin in bins {
        let x = scale.x(bin.lower);
        let y = scale.y(bin.count as f64);
        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.7\" stroke=\"white\"/>\n",
            x,
            y,
            (scale.x(bin.upper) - x).max(0.0),
            (scale.y(0.0) - y).max(0.0),
            NORMAL_COLOR
        ));
    }
    if !density.is_empty() {
        let points: Vec<String> = density
            .iter()
            .map(|&(x, d)| format!("{:.1},{:.1}", scale.x(x), scale.y(d * to_count)))
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            points.join(" "),
            DENSITY_COLOR
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Horizontal box plot with whiskers and fliers.
pub fn box_plot_svg(title: &str, x_label: &str, stats: Option<&BoxStats>) -> String {
    let Some(stats) = stats else {
        return placeholder(title, "No data available.");
    };
    let (lo, hi) = bounds(
        [stats.lower_whisker, stats.upper_whisker]
            .iter()
            .chain(stats.fliers.iter()),
    );
    let scale = Scale::new(lo, hi, 0.0, 1.0);
    let mid = HEIGHT / 2.0;
    let half = 40.0;

    let mut svg = open(title);
    svg.push_str(&axes(x_label, ""));
    svg.push_str(&format!(
        "<line x1=\"{:.1}\" y1=\"{mid:.1}\" x2=\"{:.1}\" y2=\"{mid:.1}\" stroke=\"black\"/>\n\
         <line x1=\"{:.1}\" y1=\"{mid:.1}\" x2=\"{:.1}\" y2=\"{mid:.1}\" stroke=\"black\"/>\n\
         <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.5\" stroke=\"black\"/>\n\
         <line x1=\"{med:.1}\" y1=\"{:.1}\" x2=\"{med:.1}\" y2=\"{:.1}\" stroke=\"black\" stroke-width=\"2\"/>\n",
        scale.x(stats.lower_whisker),
        scale.x(stats.q1),
        scale.x(stats.q3),
        scale.x(stats.upper_whisker),
        scale.x(stats.q1),
        mid - half,
        (scale.x(stats.q3) - scale.x(stats.q1)).max(1.0),
        2.0 * half,
        NORMAL_COLOR,
        mid - half,
        mid + half,
        mid = mid,
        med = scale.x(stats.median),
    ));
    for &f in &stats.fliers {
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"none\" stroke=\"{}\"/>\n",
            scale.x(f),
            mid,
            OUTLIER_COLOR
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Diverging red/blue colour for a coefficient in [-1, 1]; grey when undefined.
fn heat_color(value: Option<f64>) -> String {
    match value {
        None => "#cccccc".to_string(),
        Some(v) => {
            let v = v.clamp(-1.0, 1.0);
            let fade = |t: f64| (255.0 * (1.0 - t)).round() as u8;
            if v >= 0.0 {
                format!("#ff{:02x}{:02x}", fade(v), fade(v))
            } else {
                format!("#{:02x}{:02x}ff", fade(-v), fade(-v))
            }
        }
    }
}

/// Annotated correlation heatmap.
pub fn heatmap_svg(title: &str, matrix: &CorrelationMatrix) -> String {
    let n = matrix.columns.len();
    if n == 0 {
        return placeholder(title, "No numeric columns.");
    }
    let label_space = 110.0;
    let size = (HEIGHT - PADDING - label_space).min(WIDTH - PADDING - label_space);
    let cell = size / n as f64;

    let mut svg = open(title);
    for (i, name) in matrix.columns.iter().enumerate() {
        let offset = label_space + (i as f64 + 0.5) * cell;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n",
            label_space - 6.0,
            PADDING + (i as f64 + 0.5) * cell + 4.0,
            escape(name)
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n",
            offset,
            PADDING + size + 16.0,
            escape(name)
        ));
    }
    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col);
            let x = label_space + col as f64 * cell;
            let y = PADDING + row as f64 * cell;
            let label = value.map_or_else(|| "NA".to_string(), |v| format!("{:.2}", v));
            svg.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" stroke=\"white\"/>\n\
                 <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n",
                x,
                y,
                cell,
                cell,
                heat_color(value),
                x + cell / 2.0,
                y + cell / 2.0 + 4.0,
                label
            ));
        }
    }
    svg.push_str("</svg>\n");
    svg
}

/// Daily line chart. Missing days break the line into separate segments.
pub fn line_svg(title: &str, y_label: &str, series: &[SeriesPoint]) -> String {
    let present: Vec<f64> = series.iter().filter_map(|p| p.value).collect();
    if present.is_empty() {
        return placeholder(title, "No observations in range.");
    }
    let (y_min, y_max) = bounds(present.iter());
    let scale = Scale::new(0.0, (series.len().max(2) - 1) as f64, y_min, y_max);

    let mut segments: Vec<Vec<String>> = vec![Vec::new()];
    for (i, point) in series.iter().enumerate() {
        match point.value {
            Some(v) => {
                if let Some(current) = segments.last_mut() {
                    current.push(format!("{:.1},{:.1}", scale.x(i as f64), scale.y(v)));
                }
            }
            None => {
                if segments.last().is_some_and(|s| !s.is_empty()) {
                    segments.push(Vec::new());
                }
            }
        }
    }

    let mut svg = open(title);
    svg.push_str(&axes("date", y_label));
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"10\">{}</text>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"10\">{}</text>\n",
            PADDING,
            HEIGHT - PADDING + 14.0,
            first.date,
            WIDTH - PADDING,
            HEIGHT - PADDING + 14.0,
            last.date
        ));
    }
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        if segment.len() == 1 {
            let (cx, cy) = segment[0].split_once(',').unwrap_or(("0", "0"));
            svg.push_str(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"2.5\" fill=\"{}\"/>\n",
                cx, cy, NORMAL_COLOR
            ));
        } else {
            svg.push_str(&format!(
                "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
                segment.join(" "),
                NORMAL_COLOR
            ));
        }
    }
    svg.push_str("</svg>\n");
    svg
}
