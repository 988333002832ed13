//! Writing figures to disk as SVG or rasterised PNG.

use std::path::Path;

use gpa_model::{CropMode, Figure, FigureFormat};
use image::{ImageBuffer, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use tracing::debug;

use crate::error::{ReportError, Result};

/// SVG user units per inch in generated figures.
const UNITS_PER_INCH: f32 = 100.0;

/// Saves figures in the configured format and resolution.
///
/// Holds the font database so system fonts are loaded once per run.
pub struct FigureRenderer {
    options: Options<'static>,
    format: FigureFormat,
    dpi: u32,
    crop: CropMode,
}

impl FigureRenderer {
    pub fn new(format: FigureFormat, dpi: u32, crop: CropMode) -> Self {
        let mut options = Options::default();
        if format == FigureFormat::Png {
            options.fontdb_mut().load_system_fonts();
        }
        Self {
            options,
            format,
            dpi,
            crop,
        }
    }

    pub fn format(&self) -> FigureFormat {
        self.format
    }

    /// Rasterises `figure` at the configured DPI.
    pub fn rasterize(&self, name: &str, figure: &Figure) -> Result<RgbaImage> {
        let tree = Tree::from_data(figure.svg.as_bytes(), &self.options).map_err(|e| {
            ReportError::Svg {
                figure: name.to_string(),
                message: e.to_string(),
            }
        })?;

        let scale = self.dpi as f32 / UNITS_PER_INCH;
        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        let raster_error = |message: &str| ReportError::Raster {
            figure: name.to_string(),
            message: message.to_string(),
        };

        let mut pixmap =
            Pixmap::new(width, height).ok_or_else(|| raster_error("failed to create pixmap"))?;
        resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let image: RgbaImage = ImageBuffer::from_raw(width, height, pixmap.take())
            .ok_or_else(|| raster_error("failed to create image buffer"))?;
        Ok(match self.crop {
            CropMode::Tight => tight_crop(image, self.dpi / 10),
            CropMode::Standard => image,
        })
    }

    /// Writes `figure` to `path` in the configured format.
    pub fn save(&self, name: &str, figure: &Figure, path: &Path) -> Result<()> {
        match self.format {
            FigureFormat::Svg => {
                std::fs::write(path, &figure.svg).map_err(|source| ReportError::FileWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
            FigureFormat::Png => {
                let image = self.rasterize(name, figure)?;
                debug!(
                    figure = name,
                    width = image.width(),
                    height = image.height(),
                    "Rasterised figure"
                );
                image.save(path).map_err(|source| ReportError::ImageWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

/// Trims border pixels matching the top-left corner colour, keeping `pad`
/// pixels around the drawn content.
fn tight_crop(image: RgbaImage, pad: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image;
    }
    let background = *image.get_pixel(0, 0);

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let Some((x0, y0, x1, y1)) = bounds else {
        return image;
    };

    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = (x1 + pad + 1).min(width);
    let bottom = (y1 + pad + 1).min(height);
    image::imageops::crop_imm(&image, left, top, right - left, bottom - top).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100">
<rect x="0" y="0" width="200" height="100" fill="#ffffff"/>
<rect x="50" y="25" width="20" height="20" fill="#000000"/>
</svg>
"##;

    fn figure() -> Figure {
        Figure {
            title: "square".to_string(),
            svg: SQUARE.to_string(),
            width: 200.0,
            height: 100.0,
        }
    }

    #[test]
    fn test_rasterize_scales_with_dpi() {
        let renderer = FigureRenderer::new(FigureFormat::Png, 200, CropMode::Standard);
        let image = renderer.rasterize("square", &figure()).unwrap();
        assert_eq!(image.dimensions(), (400, 200));
    }

    #[test]
    fn test_tight_crop_keeps_padding() {
        let renderer = FigureRenderer::new(FigureFormat::Png, 100, CropMode::Tight);
        let image = renderer.rasterize("square", &figure()).unwrap();
        assert_eq!(image.dimensions(), (40, 40));
        assert_eq!(*image.get_pixel(20, 20), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_invalid_svg() {
        let renderer = FigureRenderer::new(FigureFormat::Png, 100, CropMode::Tight);
        let broken = Figure {
            svg: "<svg".to_string(),
            ..figure()
        };
        assert!(matches!(
            renderer.rasterize("broken", &broken),
            Err(ReportError::Svg { .. })
        ));
    }

    #[test]
    fn test_save_svg_writes_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("square.svg");
        let renderer = FigureRenderer::new(FigureFormat::Svg, 300, CropMode::Tight);
        renderer.save("square", &figure(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SQUARE);
    }
}
