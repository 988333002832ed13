//! Chart styling.

/// Colours, fonts and sizes applied to every chart in a run.
///
/// A theme is a plain value created by the graphing stage; nothing is global.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTheme {
    /// Series colours, cycled when a chart has more series than colours.
    pub palette: Vec<&'static str>,
    pub background: &'static str,
    pub axis_color: &'static str,
    pub grid_color: &'static str,
    pub text_color: &'static str,
    pub font_family: &'static str,
    pub title_size: f32,
    pub label_size: f32,
    pub tick_size: f32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        // Evenly spaced hues at fixed lightness and saturation.
        Self {
            palette: vec![
                "#f77189", "#ce9032", "#97a431", "#32b166", "#36ada4", "#39a7d0", "#a48cf4",
                "#f561dd",
            ],
            background: "#ffffff",
            axis_color: "#333333",
            grid_color: "#e5e5e5",
            text_color: "#222222",
            font_family: "DejaVu Sans, Arial, Helvetica, sans-serif",
            title_size: 14.0 * 1.39,
            label_size: 10.0 * 1.39,
            tick_size: 10.0 * 1.25,
        }
    }
}

impl ChartTheme {
    /// Colour for the series at `index`.
    #[must_use]
    pub fn color(&self, index: usize) -> &'static str {
        if self.palette.is_empty() {
            return self.axis_color;
        }
        self.palette[index % self.palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles() {
        let theme = ChartTheme::default();
        let n = theme.palette.len();
        assert_eq!(theme.color(0), theme.color(n));
        assert_ne!(theme.color(0), theme.color(1));
    }
}
