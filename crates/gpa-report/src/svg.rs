//! Minimal SVG document writer.

use gpa_model::Figure;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextStyle<'a> {
    pub size: f32,
    pub anchor: Anchor,
    pub bold: bool,
    /// Rotation in degrees around the text origin.
    pub rotate: Option<f32>,
    pub fill: &'a str,
    pub family: &'a str,
}

/// Accumulates SVG elements on a fixed-size canvas.
pub(crate) struct SvgCanvas {
    width: f32,
    height: f32,
    body: String,
}

impl SvgCanvas {
    pub(crate) fn new(width: f32, height: f32, background: &str) -> Self {
        let mut canvas = Self {
            width,
            height,
            body: String::new(),
        };
        canvas.rect(0.0, 0.0, width, height, background);
        canvas
    }

    pub(crate) fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &str) {
        self.body.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{fill}"/>"#,
            width.max(0.0),
            height.max(0.0)
        ));
        self.body.push('\n');
    }

    pub(crate) fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &str, width: f32) {
        self.body.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{stroke}" stroke-width="{width}"/>"#,
            from.0, from.1, to.0, to.1
        ));
        self.body.push('\n');
    }

    pub(crate) fn polyline(&mut self, points: &[(f32, f32)], stroke: &str, width: f32) {
        if points.len() < 2 {
            return;
        }
        let coords: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect();
        self.body.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{width}"/>"#,
            coords.join(" ")
        ));
        self.body.push('\n');
    }

    pub(crate) fn circle(&mut self, center: (f32, f32), radius: f32, fill: &str) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}" fill="{fill}"/>"#,
            center.0, center.1
        ));
        self.body.push('\n');
    }

    pub(crate) fn text(&mut self, x: f32, y: f32, content: &str, style: TextStyle<'_>) {
        let weight = if style.bold { "bold" } else { "normal" };
        let transform = style
            .rotate
            .map(|deg| format!(r#" transform="rotate({deg} {x:.2} {y:.2})""#))
            .unwrap_or_default();
        self.body.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{}" font-size="{:.1}" font-weight="{weight}" text-anchor="{}" fill="{}"{transform}>{}</text>"#,
            escape(style.family),
            style.size,
            style.anchor.as_str(),
            style.fill,
            escape(content)
        ));
        self.body.push('\n');
    }

    /// Completes the document.
    pub(crate) fn finish(self, title: &str) -> Figure {
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n<title>{}</title>\n{}</svg>\n",
            escape(title),
            self.body,
            w = self.width,
            h = self.height,
        );
        Figure {
            title: title.to_string(),
            svg,
            width: self.width,
            height: self.height,
        }
    }
}

/// Escapes XML special characters.
pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("A & E <urgent>"), "A &amp; E &lt;urgent&gt;");
    }

    #[test]
    fn test_finish_wraps_body() {
        let mut canvas = SvgCanvas::new(200.0, 100.0, "#ffffff");
        canvas.line((0.0, 0.0), (10.0, 10.0), "#000000", 1.0);
        let figure = canvas.finish("Demo & Test");

        assert!(figure.svg.starts_with("<svg xmlns"));
        assert!(figure.svg.contains("<title>Demo &amp; Test</title>"));
        assert!(figure.svg.contains("<line x1=\"0.00\""));
        assert_eq!(figure.title, "Demo & Test");
        assert_eq!((figure.width, figure.height), (200.0, 100.0));
    }
}
