//! Preview layout engine.
//!
//! Fits a framed and matted artwork into an on-screen box. All physical
//! inputs are in inches, all outputs in pixels. The whole assembly (artwork,
//! mat bands, reveal, frame face) is scaled by one factor so the preview keeps
//! the true physical proportions of the finished frame.
//!
//! ```
//! use frame_designer::layout::{compute_preview_layout, LayoutRequest, MatBorders, SizePx};
//!
//! let request = LayoutRequest::new(16.0, 20.0, SizePx::new(600.0, 500.0))
//!     .with_mat(MatBorders::uniform(2.5))
//!     .with_frame_face(1.25)
//!     .with_padding(12.0);
//! let layout = compute_preview_layout(&request).unwrap();
//! assert!((layout.outer_px.h - 476.0).abs() < 1e-9);
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Axis, FrameError, Result};

/// Mat border widths in inches, one per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatBorders {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl MatBorders {
    pub const NONE: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn uniform(width: f64) -> Self {
        Self {
            top: width,
            right: width,
            bottom: width,
            left: width,
        }
    }

    /// Equal top/left/right with a heavier bottom, e.g. for nameplate clearance.
    pub fn bottom_weighted(sides: f64, bottom: f64) -> Self {
        Self {
            bottom,
            ..Self::uniform(sides)
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_none(&self) -> bool {
        self.horizontal() == 0.0 && self.vertical() == 0.0
    }

    pub(crate) fn sanitized(self) -> Self {
        Self {
            top: non_negative(self.top, "mat top"),
            right: non_negative(self.right, "mat right"),
            bottom: non_negative(self.bottom, "mat bottom"),
            left: non_negative(self.left, "mat left"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SizePx {
    pub w: f64,
    pub h: f64,
}

impl SizePx {
    pub const ZERO: Self = Self { w: 0.0, h: 0.0 };

    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointPx {
    pub x: f64,
    pub y: f64,
}

impl PointPx {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// Axis-aligned rectangle in pixels, `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectPx {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectPx {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> PointPx {
        PointPx {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    /// Shrink by a different amount on each side. Never goes below zero size.
    pub fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }

    pub fn shrink(&self, amount: f64) -> Self {
        self.inset(amount, amount, amount, amount)
    }

    /// True if `other` lies inside `self`, allowing `eps` of slack.
    pub fn contains_rect(&self, other: &RectPx, eps: f64) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }
}

/// Everything needed to lay out one framed preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRequest {
    /// Visible artwork size in inches.
    pub artwork_width: f64,
    pub artwork_height: f64,
    pub mat: MatBorders,
    /// Accent band around the opening for double mats, inches.
    pub mat_reveal: f64,
    /// Visible moulding face, inches.
    pub frame_face: f64,
    /// Float gap around a floated canvas, inches. Only widens the glass area.
    pub float_gap: f64,
    pub container: SizePx,
    pub padding_px: f64,
}

impl LayoutRequest {
    pub fn new(artwork_width: f64, artwork_height: f64, container: SizePx) -> Self {
        Self {
            artwork_width,
            artwork_height,
            mat: MatBorders::NONE,
            mat_reveal: 0.0,
            frame_face: 0.0,
            float_gap: 0.0,
            container,
            padding_px: 0.0,
        }
    }

    /// Canvas floater shape: one uniform border, no reveal, and a float gap.
    pub fn canvas(
        artwork_width: f64,
        artwork_height: f64,
        border: f64,
        frame_face: f64,
        float_gap: f64,
        container: SizePx,
    ) -> Self {
        Self::new(artwork_width, artwork_height, container)
            .with_mat(MatBorders::uniform(border))
            .with_frame_face(frame_face)
            .with_float_gap(float_gap)
    }

    pub fn with_mat(mut self, mat: MatBorders) -> Self {
        self.mat = mat;
        self
    }

    pub fn with_reveal(mut self, reveal: f64) -> Self {
        self.mat_reveal = reveal;
        self
    }

    pub fn with_frame_face(mut self, face: f64) -> Self {
        self.frame_face = face;
        self
    }

    pub fn with_float_gap(mut self, gap: f64) -> Self {
        self.float_gap = gap;
        self
    }

    pub fn with_padding(mut self, padding_px: f64) -> Self {
        self.padding_px = padding_px;
        self
    }

    pub fn outer_width_in(&self) -> f64 {
        self.artwork_width + self.mat.horizontal() + 2.0 * self.mat_reveal + 2.0 * self.frame_face
    }

    pub fn outer_height_in(&self) -> f64 {
        self.artwork_height + self.mat.vertical() + 2.0 * self.mat_reveal + 2.0 * self.frame_face
    }

    /// Rejects bad artwork sizes and clamps every other measurement to >= 0.
    fn sanitized(&self) -> Result<Self> {
        check_artwork(Axis::Width, self.artwork_width)?;
        check_artwork(Axis::Height, self.artwork_height)?;
        Ok(Self {
            artwork_width: self.artwork_width,
            artwork_height: self.artwork_height,
            mat: self.mat.sanitized(),
            mat_reveal: non_negative(self.mat_reveal, "mat reveal"),
            frame_face: non_negative(self.frame_face, "frame face"),
            float_gap: non_negative(self.float_gap, "float gap"),
            container: SizePx::new(
                non_negative(self.container.w, "container width"),
                non_negative(self.container.h, "container height"),
            ),
            padding_px: non_negative(self.padding_px, "padding"),
        })
    }
}

/// Non-fatal conditions noticed while laying out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutWarning {
    /// The padded container has no room on at least one axis. Happens while
    /// a container is still unmeasured.
    DegenerateContainer { available: SizePx },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutResult {
    pub scale: f64,
    pub outer_px: SizePx,
    pub frame_face_px: f64,
    pub mat_top_px: f64,
    pub mat_right_px: f64,
    pub mat_bottom_px: f64,
    pub mat_left_px: f64,
    pub mat_reveal_px: f64,
    pub opening_px: SizePx,
    pub glass_px: SizePx,
    /// Top-left corner of the outer box.
    pub origin_px: PointPx,
    pub warning: Option<LayoutWarning>,
}

/// The nested boxes of a layout in absolute pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRects {
    pub outer: RectPx,
    /// Inside the frame face, covered by the top mat.
    pub mat: RectPx,
    /// Inside the mat bands, covered by the accent mat.
    pub reveal: RectPx,
    pub opening: RectPx,
    pub glass: RectPx,
}

impl LayoutResult {
    pub fn rects(&self) -> LayoutRects {
        let outer = RectPx::new(
            self.origin_px.x,
            self.origin_px.y,
            self.outer_px.w,
            self.outer_px.h,
        );
        let mat = outer.shrink(self.frame_face_px);
        let reveal = mat.inset(
            self.mat_top_px,
            self.mat_right_px,
            self.mat_bottom_px,
            self.mat_left_px,
        );
        let opening = reveal.shrink(self.mat_reveal_px);
        let gap_x = (self.glass_px.w - self.opening_px.w) / 2.0;
        let gap_y = (self.glass_px.h - self.opening_px.h) / 2.0;
        let glass = RectPx::new(
            opening.x - gap_x,
            opening.y - gap_y,
            self.glass_px.w,
            self.glass_px.h,
        );
        LayoutRects {
            outer,
            mat,
            reveal,
            opening,
            glass,
        }
    }

    /// Same proportions at `factor` times the resolution.
    pub fn rescaled(&self, factor: f64) -> Self {
        let size = |s: SizePx| SizePx::new(s.w * factor, s.h * factor);
        Self {
            scale: self.scale * factor,
            outer_px: size(self.outer_px),
            frame_face_px: self.frame_face_px * factor,
            mat_top_px: self.mat_top_px * factor,
            mat_right_px: self.mat_right_px * factor,
            mat_bottom_px: self.mat_bottom_px * factor,
            mat_left_px: self.mat_left_px * factor,
            mat_reveal_px: self.mat_reveal_px * factor,
            opening_px: size(self.opening_px),
            glass_px: size(self.glass_px),
            origin_px: PointPx {
                x: self.origin_px.x * factor,
                y: self.origin_px.y * factor,
            },
            warning: self.warning,
        }
    }
}

/// Contain-fit the framed artwork into the padded container.
///
/// Fails only when the artwork width or height is not a positive finite
/// number. A container with no usable room yields an all-zero layout tagged
/// with [`LayoutWarning::DegenerateContainer`].
pub fn compute_preview_layout(request: &LayoutRequest) -> Result<LayoutResult> {
    let request = request.sanitized()?;
    let padding = request.padding_px;
    let available = SizePx::new(
        (request.container.w - 2.0 * padding).max(0.0),
        (request.container.h - 2.0 * padding).max(0.0),
    );

    let scale_w = available.w / request.outer_width_in();
    let scale_h = available.h / request.outer_height_in();
    let scale = scale_w.min(scale_h);
    let mut layout = layout_with_scale(&request, scale);
    layout.origin_px = PointPx {
        x: padding + (available.w - layout.outer_px.w).max(0.0) / 2.0,
        y: padding + (available.h - layout.outer_px.h).max(0.0) / 2.0,
    };

    if available.w == 0.0 || available.h == 0.0 {
        warn!(
            "Degenerate preview container {}x{} px with {} px padding",
            request.container.w, request.container.h, padding
        );
        layout.warning = Some(LayoutWarning::DegenerateContainer { available });
    }

    Ok(layout)
}

/// Lay out at a fixed pixels-per-inch with the outer box at the origin.
///
/// Used for exports that need the preview proportions at print resolution.
pub fn compute_layout_at_scale(
    request: &LayoutRequest,
    pixels_per_inch: f64,
) -> Result<LayoutResult> {
    let request = request.sanitized()?;
    Ok(layout_with_scale(
        &request,
        non_negative(pixels_per_inch, "pixels per inch"),
    ))
}

fn layout_with_scale(request: &LayoutRequest, scale: f64) -> LayoutResult {
    let opening_px = SizePx::new(request.artwork_width * scale, request.artwork_height * scale);
    let frame_face_px = request.frame_face * scale;
    let mat_reveal_px = request.mat_reveal * scale;
    let mat_top_px = request.mat.top * scale;
    let mat_right_px = request.mat.right * scale;
    let mat_bottom_px = request.mat.bottom * scale;
    let mat_left_px = request.mat.left * scale;

    let outer_px = SizePx::new(
        opening_px.w + mat_left_px + mat_right_px + 2.0 * (mat_reveal_px + frame_face_px),
        opening_px.h + mat_top_px + mat_bottom_px + 2.0 * (mat_reveal_px + frame_face_px),
    );

    let gap_px = request.float_gap * scale;
    let glass_px = SizePx::new(opening_px.w + 2.0 * gap_px, opening_px.h + 2.0 * gap_px);

    LayoutResult {
        scale,
        outer_px,
        frame_face_px,
        mat_top_px,
        mat_right_px,
        mat_bottom_px,
        mat_left_px,
        mat_reveal_px,
        opening_px,
        glass_px,
        origin_px: PointPx::ZERO,
        warning: None,
    }
}

fn check_artwork(axis: Axis, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FrameError::InvalidDimension { axis, value })
    }
}

pub(crate) fn non_negative(value: f64, what: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        debug!("Clamping {} of {} to 0", what, value);
        0.0
    }
}
