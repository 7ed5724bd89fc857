use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, FrameStyle};
use crate::error::{Axis, FrameError, Result};
use crate::layout::{non_negative, LayoutRequest, MatBorders, SizePx};

/// Narrowest float gap a canvas floater is built with, inches.
pub const MIN_FLOAT_GAP: f64 = 1.0 / 16.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatSelection {
    #[default]
    None,
    Single {
        color: String,
    },
    Double {
        color: String,
        accent: String,
        reveal: f64,
    },
}

impl MatSelection {
    pub fn reveal(&self) -> f64 {
        match self {
            MatSelection::Double { reveal, .. } => reveal.max(0.0),
            _ => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDesign {
    pub artwork_width: f64,
    pub artwork_height: f64,
    pub frame_style: Option<String>,
    #[serde(default)]
    pub mat: MatSelection,
    #[serde(default)]
    pub mat_borders: MatBorders,
    pub glazing: Option<String>,
    #[serde(default)]
    pub include_print: bool,
    /// Gap between a floated canvas and its frame, inches. A positive gap
    /// turns the design into a canvas floater, which has no mat.
    #[serde(default)]
    pub float_gap: f64,
}

impl Default for FrameDesign {
    fn default() -> Self {
        Self {
            artwork_width: 8.0,
            artwork_height: 10.0,
            frame_style: None,
            mat: MatSelection::None,
            mat_borders: MatBorders::uniform(2.0),
            glazing: None,
            include_print: false,
            float_gap: 0.0,
        }
    }
}

impl FrameDesign {
    pub fn is_canvas(&self) -> bool {
        self.effective_float_gap() > 0.0
    }

    pub fn float_as_canvas(&mut self, gap: f64) {
        self.float_gap = non_negative(gap, "float gap").max(MIN_FLOAT_GAP);
    }

    pub fn frame_as_picture(&mut self) {
        self.float_gap = 0.0;
    }

    pub fn effective_float_gap(&self) -> f64 {
        non_negative(self.float_gap, "float gap")
    }

    // Negative or NaN borders count as zero, same as in the layout.
    pub fn effective_mat_borders(&self) -> MatBorders {
        match self.mat {
            _ if self.is_canvas() => MatBorders::NONE,
            MatSelection::None => MatBorders::NONE,
            _ => self.mat_borders.sanitized(),
        }
    }

    pub fn effective_reveal(&self) -> f64 {
        if self.is_canvas() {
            0.0
        } else {
            self.mat.reveal()
        }
    }

    /// Size of the area inside the frame rabbet, inches.
    pub fn glass_size(&self) -> (f64, f64) {
        if self.is_canvas() {
            let gap = self.effective_float_gap();
            return (
                self.artwork_width + 2.0 * gap,
                self.artwork_height + 2.0 * gap,
            );
        }
        let mat = self.effective_mat_borders();
        let reveal = self.effective_reveal();
        (
            self.artwork_width + mat.horizontal() + 2.0 * reveal,
            self.artwork_height + mat.vertical() + 2.0 * reveal,
        )
    }

    pub fn check_artwork(&self) -> Result<()> {
        for (axis, value) in [
            (Axis::Width, self.artwork_width),
            (Axis::Height, self.artwork_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FrameError::InvalidDimension { axis, value });
            }
        }
        Ok(())
    }

    fn frame_face(&self, catalog: &dyn Catalog) -> Result<f64> {
        match &self.frame_style {
            Some(id) => Ok(catalog.require_frame_style(id)?.face_width),
            None => Ok(0.0),
        }
    }

    /// A canvas reserves the float gap as a uniform border, so the glass
    /// area covers the canvas plus the gap.
    pub fn layout_request(
        &self,
        catalog: &dyn Catalog,
        container: SizePx,
        padding_px: f64,
    ) -> Result<LayoutRequest> {
        let frame_face = self.frame_face(catalog)?;
        let request = if self.is_canvas() {
            let gap = self.effective_float_gap();
            LayoutRequest::canvas(
                self.artwork_width,
                self.artwork_height,
                gap,
                frame_face,
                gap,
                container,
            )
        } else {
            LayoutRequest::new(self.artwork_width, self.artwork_height, container)
                .with_mat(self.effective_mat_borders())
                .with_reveal(self.effective_reveal())
                .with_frame_face(frame_face)
        };
        Ok(request.with_padding(padding_px))
    }

    /// Moulding pieces needed for this design, or `None` without a frame.
    pub fn cut_list(&self, catalog: &dyn Catalog) -> Result<Option<CutList>> {
        let Some(id) = &self.frame_style else {
            return Ok(None);
        };
        Ok(Some(self.cut_list_for(catalog.require_frame_style(id)?)))
    }

    pub fn cut_list_for(&self, style: &FrameStyle) -> CutList {
        let (glass_w, glass_h) = self.glass_size();
        // Glass edge to outer frame edge.
        let overhang = (style.face_width - style.rabbet).max(0.0);
        let piece = |glass: f64| {
            let outer = (glass + 2.0 * overhang).max(0.0);
            CutPiece {
                outer_length: outer,
                inner_length: (outer - 2.0 * style.face_width).max(0.0),
            }
        };
        CutList {
            horizontal: piece(glass_w),
            vertical: piece(glass_h),
        }
    }
}

/// One mitred moulding piece, lengths in inches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutPiece {
    /// Long edge, measured on the outside of the mitres.
    pub outer_length: f64,
    /// Short edge, on the sight side.
    pub inner_length: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CutList {
    pub horizontal: CutPiece,
    pub vertical: CutPiece,
}

impl CutList {
    pub fn total_length(&self) -> f64 {
        2.0 * (self.horizontal.outer_length + self.vertical.outer_length)
    }
}
