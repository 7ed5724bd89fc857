use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::catalog::{Catalog, Rgb};
use crate::design::{FrameDesign, MatSelection};
use crate::error::Result;
use crate::layout::{compute_layout_at_scale, RectPx, SizePx};

pub const DEFAULT_FRAME_COLOR: Rgb = [139, 69, 19];
pub const DEFAULT_MAT_COLOR: Rgb = [255, 255, 255];
pub const PLACEHOLDER_COLOR: Rgb = [200, 200, 200];
/// Shadowed gap around a floated canvas.
pub const FLOAT_GAP_COLOR: Rgb = [28, 28, 28];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub frame: Rgb,
    pub mat: Rgb,
    pub accent: Rgb,
}

impl Palette {
    pub fn for_design(design: &FrameDesign, catalog: &dyn Catalog) -> Result<Self> {
        let frame = match &design.frame_style {
            Some(id) => catalog.require_frame_style(id)?.color,
            None => DEFAULT_FRAME_COLOR,
        };
        let (mat, accent) = match &design.mat {
            _ if design.is_canvas() => (FLOAT_GAP_COLOR, FLOAT_GAP_COLOR),
            MatSelection::None => (DEFAULT_MAT_COLOR, DEFAULT_MAT_COLOR),
            MatSelection::Single { color } => {
                let color = catalog.require_mat_color(color)?.color;
                (color, color)
            }
            MatSelection::Double { color, accent, .. } => (
                catalog.require_mat_color(color)?.color,
                catalog.require_mat_color(accent)?.color,
            ),
        };
        Ok(Self { frame, mat, accent })
    }
}

/// Renders the design at `pixels_per_inch`. The artwork, if given, is
/// scaled to cover the opening and center-cropped.
pub fn render_preview(
    design: &FrameDesign,
    catalog: &dyn Catalog,
    pixels_per_inch: f64,
    artwork: Option<&DynamicImage>,
) -> Result<RgbaImage> {
    let request = design.layout_request(catalog, SizePx::ZERO, 0.0)?;
    let layout = compute_layout_at_scale(&request, pixels_per_inch)?;
    let palette = Palette::for_design(design, catalog)?;
    let rects = layout.rects();

    let mut image = RgbaImage::from_pixel(
        to_px(layout.outer_px.w),
        to_px(layout.outer_px.h),
        rgba(palette.frame),
    );
    fill(&mut image, rects.mat, palette.mat);
    fill(&mut image, rects.reveal, palette.accent);

    match artwork {
        Some(artwork) => draw_cover(&mut image, rects.opening, artwork),
        None => fill(&mut image, rects.opening, PLACEHOLDER_COLOR),
    }

    log::debug!(
        "Rendered {}x{} preview at {} ppi",
        image.width(),
        image.height(),
        pixels_per_inch
    );
    Ok(image)
}

pub fn save_preview_png(
    path: &Path,
    design: &FrameDesign,
    catalog: &dyn Catalog,
    pixels_per_inch: f64,
    artwork: Option<&DynamicImage>,
) -> Result<()> {
    let image = render_preview(design, catalog, pixels_per_inch, artwork)?;
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("Saved preview to {}", path.display());
    Ok(())
}

fn to_px(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

fn rgba([r, g, b]: Rgb) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Pixel bounds of `rect` snapped to the grid: `(x, y, width, height)`.
fn snap(rect: RectPx) -> (u32, u32, u32, u32) {
    let x0 = to_px(rect.x);
    let y0 = to_px(rect.y);
    let x1 = to_px(rect.right()).max(x0);
    let y1 = to_px(rect.bottom()).max(y0);
    (x0, y0, x1 - x0, y1 - y0)
}

fn fill(image: &mut RgbaImage, rect: RectPx, color: Rgb) {
    let (x, y, w, h) = snap(rect);
    if w == 0 || h == 0 {
        return;
    }
    let patch = RgbaImage::from_pixel(w, h, rgba(color));
    imageops::replace(image, &patch, x as i64, y as i64);
}

fn draw_cover(image: &mut RgbaImage, rect: RectPx, artwork: &DynamicImage) {
    let (x, y, w, h) = snap(rect);
    if w == 0 || h == 0 || artwork.width() == 0 || artwork.height() == 0 {
        return;
    }
    let patch = artwork.resize_to_fill(w, h, FilterType::Triangle).to_rgba8();
    imageops::replace(image, &patch, x as i64, y as i64);
}
