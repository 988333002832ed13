//! SVG chart layouts: stacked bars, grouped lines and single-series bars.

use gpa_model::Figure;

use crate::format::format_thousands;
use crate::svg::{Anchor, SvgCanvas, TextStyle};
use crate::theme::ChartTheme;

/// Title and axis captions of a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Legend heading; charts with a single series have no legend.
    pub legend_title: Option<&'a str>,
}

/// One named series of values aligned with the chart categories.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

const TITLE_BAND: f32 = 60.0;
const OUTER_PAD: f32 = 24.0;
/// Approximate advance of one glyph, as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.6;

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH
}

fn longest(labels: impl IntoIterator<Item = impl AsRef<str>>, size: f32) -> f32 {
    labels
        .into_iter()
        .map(|label| text_width(label.as_ref(), size))
        .fold(0.0, f32::max)
}

/// Plot area inside the canvas.
#[derive(Debug, Clone, Copy)]
struct Layout {
    width: f32,
    height: f32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Layout {
    fn new(size: (f32, f32), left: f32, right_margin: f32, bottom_margin: f32) -> Self {
        let (width, height) = size;
        Self {
            width,
            height,
            left,
            top: TITLE_BAND,
            right: (width - right_margin).max(left + 1.0),
            bottom: (height - bottom_margin).max(TITLE_BAND + 1.0),
        }
    }

    fn plot_width(&self) -> f32 {
        self.right - self.left
    }

    fn plot_height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Linear value axis starting at zero with evenly spaced round ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueScale {
    max: f64,
    step: f64,
}

impl ValueScale {
    fn for_max(max: f64) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        let raw = max / 5.0;
        let magnitude = 10f64.powf(raw.log10().floor());
        let nice = match raw / magnitude {
            f if f <= 1.0 => 1.0,
            f if f <= 2.0 => 2.0,
            f if f <= 5.0 => 5.0,
            _ => 10.0,
        };
        let step = nice * magnitude;
        Self {
            max: (max / step).ceil() * step,
            step,
        }
    }

    fn ticks(&self) -> Vec<f64> {
        let count = (self.max / self.step).round() as usize;
        (0..=count).map(|idx| idx as f64 * self.step).collect()
    }

    fn fraction(&self, value: f64) -> f32 {
        (value / self.max).clamp(0.0, 1.0) as f32
    }
}

fn text_style(theme: &ChartTheme, size: f32, anchor: Anchor) -> TextStyle<'_> {
    TextStyle {
        size,
        anchor,
        bold: false,
        rotate: None,
        fill: theme.text_color,
        family: theme.font_family,
    }
}

fn draw_title(canvas: &mut SvgCanvas, layout: &Layout, title: &str, theme: &ChartTheme) {
    let style = TextStyle {
        bold: true,
        ..text_style(theme, theme.title_size, Anchor::Middle)
    };
    canvas.text(layout.width / 2.0, TITLE_BAND / 2.0 + 6.0, title, style);
}

fn draw_axis_captions(
    canvas: &mut SvgCanvas,
    layout: &Layout,
    labels: &ChartLabels<'_>,
    theme: &ChartTheme,
) {
    let style = text_style(theme, theme.label_size, Anchor::Middle);
    canvas.text(
        layout.left + layout.plot_width() / 2.0,
        layout.height - OUTER_PAD / 2.0,
        labels.x_label,
        style,
    );
    let x = OUTER_PAD;
    let y = layout.top + layout.plot_height() / 2.0;
    canvas.text(
        x,
        y,
        labels.y_label,
        TextStyle {
            rotate: Some(-90.0),
            ..style
        },
    );
}

fn draw_frame(canvas: &mut SvgCanvas, layout: &Layout, theme: &ChartTheme) {
    let (l, t, r, b) = (layout.left, layout.top, layout.right, layout.bottom);
    canvas.line((l, b), (r, b), theme.axis_color, 1.0);
    canvas.line((l, t), (l, b), theme.axis_color, 1.0);
}

/// Value axis on the left, gridlines across the plot.
fn draw_vertical_scale(
    canvas: &mut SvgCanvas,
    layout: &Layout,
    scale: &ValueScale,
    theme: &ChartTheme,
) {
    let style = text_style(theme, theme.tick_size, Anchor::End);
    for tick in scale.ticks() {
        let y = layout.bottom - scale.fraction(tick) * layout.plot_height();
        canvas.line((layout.left, y), (layout.right, y), theme.grid_color, 1.0);
        canvas.text(layout.left - 6.0, y + theme.tick_size / 3.0, &format_thousands(tick), style);
    }
}

/// Value axis along the bottom, gridlines down the plot.
fn draw_horizontal_scale(
    canvas: &mut SvgCanvas,
    layout: &Layout,
    scale: &ValueScale,
    theme: &ChartTheme,
) {
    let style = text_style(theme, theme.tick_size, Anchor::Middle);
    for tick in scale.ticks() {
        let x = layout.left + scale.fraction(tick) * layout.plot_width();
        canvas.line((x, layout.top), (x, layout.bottom), theme.grid_color, 1.0);
        canvas.text(x, layout.bottom + theme.tick_size + 4.0, &format_thousands(tick), style);
    }
}

/// Category labels under the plot, rotated 45 degrees.
fn draw_category_ticks(
    canvas: &mut SvgCanvas,
    layout: &Layout,
    centers: &[f32],
    categories: &[String],
    theme: &ChartTheme,
) {
    for (x, label) in centers.iter().zip(categories) {
        let y = layout.bottom + theme.tick_size + 2.0;
        canvas.line((*x, layout.bottom), (*x, layout.bottom + 4.0), theme.axis_color, 1.0);
        canvas.text(
            *x,
            y,
            label,
            TextStyle {
                rotate: Some(-45.0),
                ..text_style(theme, theme.tick_size, Anchor::End)
            },
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum LegendMarker {
    Swatch,
    Line,
}

fn legend_width(title: Option<&str>, series: &[ChartSeries], theme: &ChartTheme) -> f32 {
    match title {
        Some(title) => {
            let names = longest(series.iter().map(|s| s.name.as_str()), theme.label_size);
            names.max(text_width(title, theme.label_size)) + 60.0
        }
        None => OUTER_PAD,
    }
}

fn draw_legend(
    canvas: &mut SvgCanvas,
    layout: &Layout,
    title: &str,
    series: &[ChartSeries],
    marker: LegendMarker,
    theme: &ChartTheme,
) {
    let x = layout.right + 20.0;
    let mut y = layout.top + theme.label_size;
    canvas.text(
        x,
        y,
        title,
        TextStyle {
            bold: true,
            ..text_style(theme, theme.label_size, Anchor::Start)
        },
    );
    for (idx, entry) in series.iter().enumerate() {
        y += theme.label_size * 1.6;
        let color = theme.color(idx);
        match marker {
            LegendMarker::Swatch => canvas.rect(
                x,
                y - theme.label_size * 0.8,
                16.0,
                theme.label_size * 0.8,
                color,
            ),
            LegendMarker::Line => {
                let mid = y - theme.label_size * 0.35;
                canvas.line((x, mid), (x + 16.0, mid), color, 2.0);
                canvas.circle((x + 8.0, mid), 3.5, color);
            }
        }
        canvas.text(
            x + 24.0,
            y,
            &entry.name,
            text_style(theme, theme.label_size, Anchor::Start),
        );
    }
}

/// Centres of `count` equal bands spanning `start..start + span`.
fn band_centers(start: f32, span: f32, count: usize) -> Vec<f32> {
    let band = span / count.max(1) as f32;
    (0..count).map(|idx| start + band * (idx as f32 + 0.5)).collect()
}

fn category_layout(
    size: (f32, f32),
    categories: &[String],
    legend: f32,
    theme: &ChartTheme,
) -> Layout {
    // 45 degree labels drop by their width times sin(45).
    let rotated = longest(categories, theme.tick_size) * std::f32::consts::FRAC_1_SQRT_2;
    let bottom =
        (rotated + theme.tick_size + theme.label_size + OUTER_PAD + 12.0).min(size.1 * 0.45);
    Layout::new(size, 90.0, legend, bottom)
}

/// Bars per category with each series stacked on the previous one.
pub(crate) fn stacked_bar_chart(
    labels: &ChartLabels<'_>,
    categories: &[String],
    series: &[ChartSeries],
    size: (f32, f32),
    theme: &ChartTheme,
) -> Figure {
    let totals: Vec<f64> = (0..categories.len())
        .map(|idx| {
            series
                .iter()
                .filter_map(|s| s.values.get(idx))
                .map(|v| v.max(0.0))
                .sum()
        })
        .collect();
    let scale = ValueScale::for_max(totals.iter().copied().fold(0.0, f64::max));
    let legend = legend_width(labels.legend_title, series, theme);
    let layout = category_layout(size, categories, legend, theme);

    let mut canvas = SvgCanvas::new(size.0, size.1, theme.background);
    draw_title(&mut canvas, &layout, labels.title, theme);
    draw_vertical_scale(&mut canvas, &layout, &scale, theme);

    let centers = band_centers(layout.left, layout.plot_width(), categories.len());
    let bar_width = layout.plot_width() / categories.len().max(1) as f32 * 0.5;
    for (idx, center) in centers.iter().enumerate() {
        let mut stacked = 0.0;
        for (series_idx, entry) in series.iter().enumerate() {
            let value = entry.values.get(idx).copied().unwrap_or(0.0).max(0.0);
            let base = layout.bottom - scale.fraction(stacked) * layout.plot_height();
            stacked += value;
            let top = layout.bottom - scale.fraction(stacked) * layout.plot_height();
            canvas.rect(
                center - bar_width / 2.0,
                top,
                bar_width,
                base - top,
                theme.color(series_idx),
            );
        }
    }

    draw_frame(&mut canvas, &layout, theme);
    draw_category_ticks(&mut canvas, &layout, &centers, categories, theme);
    draw_axis_captions(&mut canvas, &layout, labels, theme);
    if let Some(title) = labels.legend_title {
        draw_legend(&mut canvas, &layout, title, series, LegendMarker::Swatch, theme);
    }
    canvas.finish(labels.title)
}

/// One line with point markers per series across the categories.
pub(crate) fn line_chart(
    labels: &ChartLabels<'_>,
    categories: &[String],
    series: &[ChartSeries],
    size: (f32, f32),
    theme: &ChartTheme,
) -> Figure {
    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max);
    let scale = ValueScale::for_max(max);
    let legend = legend_width(labels.legend_title, series, theme);
    let layout = category_layout(size, categories, legend, theme);

    let mut canvas = SvgCanvas::new(size.0, size.1, theme.background);
    draw_title(&mut canvas, &layout, labels.title, theme);
    draw_vertical_scale(&mut canvas, &layout, &scale, theme);

    let centers = band_centers(layout.left, layout.plot_width(), categories.len());
    for (series_idx, entry) in series.iter().enumerate() {
        let color = theme.color(series_idx);
        let points: Vec<(f32, f32)> = centers
            .iter()
            .zip(&entry.values)
            .map(|(x, value)| (*x, layout.bottom - scale.fraction(*value) * layout.plot_height()))
            .collect();
        canvas.polyline(&points, color, 2.0);
        for point in &points {
            canvas.circle(*point, 4.0, color);
        }
    }

    draw_frame(&mut canvas, &layout, theme);
    draw_category_ticks(&mut canvas, &layout, &centers, categories, theme);
    draw_axis_captions(&mut canvas, &layout, labels, theme);
    if let Some(title) = labels.legend_title {
        draw_legend(&mut canvas, &layout, title, series, LegendMarker::Line, theme);
    }
    canvas.finish(labels.title)
}

/// One upright bar per category.
pub(crate) fn vertical_bar_chart(
    labels: &ChartLabels<'_>,
    categories: &[String],
    values: &[f64],
    size: (f32, f32),
    theme: &ChartTheme,
) -> Figure {
    let scale = ValueScale::for_max(values.iter().copied().fold(0.0, f64::max));
    let layout = category_layout(size, categories, OUTER_PAD, theme);

    let mut canvas = SvgCanvas::new(size.0, size.1, theme.background);
    draw_title(&mut canvas, &layout, labels.title, theme);
    draw_vertical_scale(&mut canvas, &layout, &scale, theme);

    let centers = band_centers(layout.left, layout.plot_width(), categories.len());
    let bar_width = layout.plot_width() / categories.len().max(1) as f32 * 0.8;
    for (idx, (center, value)) in centers.iter().zip(values).enumerate() {
        let height = scale.fraction(*value) * layout.plot_height();
        canvas.rect(
            center - bar_width / 2.0,
            layout.bottom - height,
            bar_width,
            height,
            theme.color(idx),
        );
    }

    draw_frame(&mut canvas, &layout, theme);
    draw_category_ticks(&mut canvas, &layout, &centers, categories, theme);
    draw_axis_captions(&mut canvas, &layout, labels, theme);
    canvas.finish(labels.title)
}

/// One horizontal bar per label, first label at the top.
pub(crate) fn horizontal_bar_chart(
    labels: &ChartLabels<'_>,
    categories: &[String],
    values: &[f64],
    size: (f32, f32),
    theme: &ChartTheme,
) -> Figure {
    let scale = ValueScale::for_max(values.iter().copied().fold(0.0, f64::max));
    let left = (longest(categories, theme.tick_size) + theme.label_size + OUTER_PAD + 16.0)
        .min(size.0 * 0.4);
    let bottom = theme.tick_size + theme.label_size + OUTER_PAD + 16.0;
    let layout = Layout::new(size, left, OUTER_PAD, bottom);

    let mut canvas = SvgCanvas::new(size.0, size.1, theme.background);
    draw_title(&mut canvas, &layout, labels.title, theme);
    draw_horizontal_scale(&mut canvas, &layout, &scale, theme);

    let centers = band_centers(layout.top, layout.plot_height(), categories.len());
    let bar_height = layout.plot_height() / categories.len().max(1) as f32 * 0.8;
    let tick_style = text_style(theme, theme.tick_size, Anchor::End);
    for (idx, ((center, value), label)) in centers.iter().zip(values).zip(categories).enumerate() {
        let width = scale.fraction(*value) * layout.plot_width();
        canvas.rect(layout.left, center - bar_height / 2.0, width, bar_height, theme.color(idx));
        canvas.text(layout.left - 6.0, center + theme.tick_size / 3.0, label, tick_style);
    }

    draw_frame(&mut canvas, &layout, theme);
    draw_axis_captions(&mut canvas, &layout, labels, theme);
    canvas.finish(labels.title)
}
