//! ASCII bar charts for per-day duration series
//!
//! Input series are ordered newest first (index 0 is today). Columns are
//! drawn the other way round, oldest on the left, so the axis and its
//! labels sit right after today's column:
//!
//! ```text
//!             *        | 12.5 s
//!             *       *|
//!             **  *   *| 6.25 s
//!             *********| 0 s
//!             ---------
//! ```

use crate::error::{BuildTimerError, Result};

/// Rows in a rendered chart, not counting the axis line
pub const DEFAULT_CHART_HEIGHT: usize = 11;

const ROW_INDENT: &str = "            ";

/// Renders a fixed-height bar chart of millisecond values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRenderer {
    height: usize,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart with a custom row count (at least one row)
    pub fn with_height(height: usize) -> Self {
        Self {
            height: height.max(1),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Draw `series` (newest first) as `height` rows plus a dashed axis line
    pub fn render(&self, series: &[(String, u64)]) -> Result<String> {
        let values: Vec<u64> = series.iter().map(|(_, value)| *value).collect();
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Err(BuildTimerError::NoData);
        };

        let columns: Vec<usize> = values
            .iter()
            .rev()
            .map(|value| self.column_height(*value, max))
            .collect();

        let line_len = ROW_INDENT.len() + columns.len() + 16;
        let mut out = String::with_capacity((self.height + 1) * line_len);
        for row in (0..self.height).rev() {
            out.push_str(ROW_INDENT);
            out.extend(
                columns
                    .iter()
                    .map(|column| if row <= *column { '*' } else { ' ' }),
            );
            out.push_str("| ");
            if row == 0 {
                out.push_str(&format_seconds(min as f64));
            }
            if row == self.height / 2 {
                out.push_str(&format_seconds((min as f64 + max as f64) / 2.0));
            }
            if row == self.height - 1 {
                out.push_str(&format_seconds(max as f64));
            }
            out.push('\n');
        }
        out.push_str(ROW_INDENT);
        out.push_str(&"-".repeat(columns.len()));
        out.push('\n');
        Ok(out)
    }

    /// Highest filled row index for a value; row 0 is always filled
    fn column_height(&self, value: u64, max: u64) -> usize {
        if max == 0 {
            return 0;
        }
        (u128::from(value) * self.height as u128 / u128::from(max)) as usize
    }
}

/// Milliseconds rendered as an axis label in seconds
fn format_seconds(ms: f64) -> String {
    format!("{} s", ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[u64]) -> Vec<(String, u64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("{}.1.2024", i + 1), *v))
            .collect()
    }

    fn cell(line: &str, column: usize) -> char {
        line.as_bytes()[ROW_INDENT.len() + column] as char
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let err = ChartRenderer::new().render(&[]).unwrap_err();
        assert!(matches!(err, BuildTimerError::NoData));
    }

    #[test]
    fn test_row_count() {
        let chart = ChartRenderer::new().render(&series(&[1, 2, 3])).unwrap();
        assert_eq!(chart.lines().count(), DEFAULT_CHART_HEIGHT + 1);
    }

    #[test]
    fn test_axis_line_has_one_dash_per_column() {
        let chart = ChartRenderer::new().render(&series(&[0; 120])).unwrap();
        let axis = chart.lines().last().unwrap();
        assert_eq!(axis, format!("{}{}", ROW_INDENT, "-".repeat(120)));
    }

    #[test]
    fn test_newest_value_is_rightmost_column() {
        // index 0 (today) is tall, index 2 (oldest) is empty
        let chart = ChartRenderer::new().render(&series(&[1000, 0, 0])).unwrap();
        let top = chart.lines().next().unwrap();
        assert_eq!(cell(top, 0), ' ');
        assert_eq!(cell(top, 2), '*');
        assert!(top[ROW_INDENT.len()..].starts_with("  *| "));
    }

    #[test]
    fn test_max_value_fills_every_row() {
        let chart = ChartRenderer::new().render(&series(&[1000, 500])).unwrap();
        let rows: Vec<&str> = chart.lines().take(DEFAULT_CHART_HEIGHT).collect();
        // column 0 is the oldest point (500), column 1 today (1000)
        assert!(rows.iter().all(|row| cell(row, 1) == '*'));
        let filled = rows.iter().filter(|row| cell(row, 0) == '*').count();
        // 500 * 11 / 1000 = 5 -> rows 0..=5
        assert_eq!(filled, 6);
    }

    #[test]
    fn test_all_zero_fills_bottom_row_only() {
        let chart = ChartRenderer::new().render(&series(&[0, 0])).unwrap();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(&lines[DEFAULT_CHART_HEIGHT - 1][..ROW_INDENT.len() + 3], "            **|");
        assert_eq!(cell(lines[0], 0), ' ');
    }

    #[test]
    fn test_labels() {
        let chart = ChartRenderer::new().render(&series(&[1500, 500])).unwrap();
        let lines: Vec<&str> = chart.lines().collect();
        assert!(lines[0].ends_with("| 1.5 s"));
        assert!(lines[DEFAULT_CHART_HEIGHT - 1 - DEFAULT_CHART_HEIGHT / 2].ends_with("| 1 s"));
        assert!(lines[DEFAULT_CHART_HEIGHT - 1].ends_with("| 0.5 s"));
        assert!(lines[1].ends_with("| "));
    }

    #[test]
    fn test_single_row_chart_stacks_labels() {
        let chart = ChartRenderer::with_height(1).render(&series(&[0, 2000])).unwrap();
        let first = chart.lines().next().unwrap();
        assert!(first.ends_with("| 0 s1 s2 s"));
    }

    #[test]
    fn test_height_is_at_least_one() {
        assert_eq!(ChartRenderer::with_height(0).height(), 1);
    }
}
