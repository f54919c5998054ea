//! Bar-style text chart.

use crate::{escape_html, format_weight};

/// Number of distinct bar heights.
pub const BAR_LEVELS: usize = 8;

const RANGE_EPSILON: f64 = 1e-9;

/// Renders one line per point, bar length normalized to `1..=BAR_LEVELS`
/// between the series minimum and maximum. A series with no spread collapses
/// to a single "stable at" line. Output is wrapped in `<pre>` for alignment.
pub fn bar_chart(points: &[(String, f64)], unit: &str) -> String {
    let Some((min, max)) = bounds(points) else {
        return String::new();
    };

    let range = max - min;
    if range <= RANGE_EPSILON {
        return format!("Stable at {} {unit}", format_weight(min));
    }

    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let lines: Vec<String> = points
        .iter()
        .map(|(label, value)| {
            let level = bar_level(*value, min, range);
            format!(
                "{label:<label_width$} {bars}{pad} {value} {unit}",
                label = escape_html(label),
                bars = "█".repeat(level),
                pad = " ".repeat(BAR_LEVELS - level),
                value = format_weight(*value),
            )
        })
        .collect();

    format!("<pre>{}</pre>", lines.join("\n"))
}

fn bar_level(value: f64, min: f64, range: f64) -> usize {
    let scaled = ((value - min) / range * (BAR_LEVELS - 1) as f64).round() as usize;
    1 + scaled.min(BAR_LEVELS - 1)
}

fn bounds(points: &[(String, f64)]) -> Option<(f64, f64)> {
    let mut values = points.iter().map(|(_, value)| *value);
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<(String, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("#{}", i + 1), *v))
            .collect()
    }

    #[test]
    fn empty_series_renders_nothing() {
        assert_eq!(bar_chart(&[], "kg"), "");
    }

    #[test]
    fn flat_series_is_a_single_stable_line() {
        assert_eq!(bar_chart(&series(&[80.0, 80.0, 80.0]), "kg"), "Stable at 80 kg");
        assert_eq!(bar_chart(&series(&[72.5]), "kg"), "Stable at 72.5 kg");
    }

    #[test]
    fn extremes_map_to_lowest_and_highest_levels() {
        let chart = bar_chart(&series(&[60.0, 70.0, 65.0]), "kg");
        assert!(chart.starts_with("<pre>") && chart.ends_with("</pre>"));

        let lines: Vec<&str> = chart
            .trim_start_matches("<pre>")
            .trim_end_matches("</pre>")
            .lines()
            .collect();
        assert_eq!(lines.len(), 3);

        let bar_len = |line: &str| line.chars().filter(|c| *c == '█').count();
        assert_eq!(bar_len(lines[0]), 1);
        assert_eq!(bar_len(lines[1]), BAR_LEVELS);
        assert!(bar_len(lines[2]) > 1 && bar_len(lines[2]) < BAR_LEVELS);
        assert!(lines[1].ends_with("70 kg"));
    }

    #[test]
    fn labels_are_escaped() {
        let chart = bar_chart(&[("<a>".to_owned(), 1.0), ("b".to_owned(), 2.0)], "kg");
        assert!(chart.contains("&lt;a&gt;"));
    }
}
