use egui::{Color32, Context, Pos2, Rect, Shape, Stroke, Vec2};
use std::future::Future;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::catalog::{Catalog, Rgb, StaticCatalog};
use crate::config::DesignerConfig;
use crate::design::{CutPiece, FrameDesign, MatSelection};
use crate::export::{Palette, PLACEHOLDER_COLOR};
use crate::layout::{compute_preview_layout, LayoutResult, MatBorders, RectPx, SizePx};
use crate::length::{parse_dimension, validate_artwork_size, Length, LengthUnit};
use crate::pricing;

struct Artwork {
    texture: egui::TextureHandle,
    image: image::DynamicImage,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Designer {
    PictureFrame,
    CanvasFloater,
}

pub struct FrameDesignerApp {
    img_channel: (Sender<Vec<u8>>, Receiver<Vec<u8>>),
    catalog: StaticCatalog,
    config: DesignerConfig,
    design: FrameDesign,
    designer: Designer,
    unit: LengthUnit,
    artwork: Option<Artwork>,
    status: Option<String>,
}

impl FrameDesignerApp {
    /// Called once before the first frame.
    pub fn new(
        _: &eframe::CreationContext<'_>,
        catalog: StaticCatalog,
        config: DesignerConfig,
    ) -> Self {
        let design = FrameDesign {
            frame_style: catalog.frame_styles().first().map(|f| f.id.clone()),
            mat: catalog
                .mat_colors()
                .first()
                .map(|m| MatSelection::Single {
                    color: m.id.clone(),
                })
                .unwrap_or_default(),
            glazing: catalog.glazings().first().map(|g| g.id.clone()),
            ..Default::default()
        };

        let app = Self {
            img_channel: channel(),
            catalog,
            config,
            design,
            designer: Designer::PictureFrame,
            unit: LengthUnit::InchesFractional,
            artwork: None,
            status: None,
        };
        let sender = app.img_channel.0.clone();

        // Load the sample image
        #[cfg(not(target_arch = "wasm32"))]
        {
            let sample_path = std::path::Path::new("assets/sample.jpg");
            if let Ok(image_data) = std::fs::read(sample_path) {
                let _ = sender.send(image_data);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let request = ehttp::Request::get("assets/sample.jpg");
                if let Ok(response) = ehttp::fetch_async(request).await {
                    let _ = sender.send(response.bytes);
                }
            });
        }

        app
    }

    fn receive_artwork(&mut self, ctx: &Context) {
        let Ok(image_data) = self.img_channel.1.try_recv() else {
            return;
        };
        let image = match image::load_from_memory(&image_data) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not decode artwork: {}", e);
                self.status = Some(format!("Could not read image: {}", e));
                return;
            }
        };

        let size = [image.width() as _, image.height() as _];
        let image_buffer = image.to_rgba8();
        let pixels = image_buffer.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        let texture = ctx.load_texture("artwork", color_image, egui::TextureOptions::default());

        // Keep the width, follow the image's aspect ratio to the nearest 1/8".
        if image.width() > 0 && image.height() > 0 {
            let aspect = image.width() as f64 / image.height() as f64;
            let height = (self.design.artwork_width / aspect * 8.0).round() / 8.0;
            if height > 0.0 {
                self.design.artwork_height = height;
            }
        }
        log::info!("Loaded {}x{} artwork", image.width(), image.height());
        self.artwork = Some(Artwork { texture, image });
        self.status = None;
    }

    fn open_artwork_dialog(&self, ui: &egui::Ui) {
        let sender = self.img_channel.0.clone();
        let task = rfd::AsyncFileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "gif", "bmp"])
            .pick_file();
        let ctx = ui.ctx().clone();
        execute(async move {
            let file = task.await;
            if let Some(file) = file {
                let image_data = file.read().await;
                let _ = sender.send(image_data);
                ctx.request_repaint();
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("frame-preview.png")
            .save_file()
        else {
            return;
        };
        let artwork = self.artwork.as_ref().map(|a| &a.image);
        let result = crate::export::save_preview_png(
            &path,
            &self.design,
            &self.catalog,
            self.config.export_ppi,
            artwork,
        );
        self.status = Some(match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {}", e);
                format!("Export failed: {}", e)
            }
        });
    }

    fn configuration_ui(&mut self, ui: &mut egui::Ui) {
        let unit = self.unit;
        let design = &mut self.design;
        let catalog = &self.catalog;

        ui.horizontal(|ui| {
            ui.radio_value(&mut self.designer, Designer::PictureFrame, "Picture frame");
            ui.radio_value(&mut self.designer, Designer::CanvasFloater, "Canvas floater");
        });
        match self.designer {
            Designer::PictureFrame => design.frame_as_picture(),
            Designer::CanvasFloater => design.float_as_canvas(self.config.canvas_float_gap),
        }

        egui::Grid::new("frame_dimensions")
            .num_columns(5)
            .spacing([2.0, 4.0])
            .min_col_width(0.0)
            .show(ui, |ui| {
                ui.label("Units");
                ui.menu_button(unit.to_string(), |ui| {
                    for option in LengthUnit::ALL {
                        if ui.selectable_label(unit == option, option.to_string()).clicked() {
                            self.unit = option;
                            ui.close_menu();
                        }
                    }
                });
                ui.end_row();

                ui.label("Artwork size");
                InchesDragValue::new(&mut design.artwork_width, unit).ui(ui);
                ui.label("x");
                InchesDragValue::new(&mut design.artwork_height, unit).ui(ui);
                standard_size_menu_button(ui, &mut *design);
                ui.end_row();

                ui.label("Frame");
                egui::ComboBox::from_id_source("frame_style")
                    .selected_text(
                        design
                            .frame_style
                            .as_deref()
                            .and_then(|id| catalog.frame_style(id))
                            .map_or("None", |f| f.name.as_str()),
                    )
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut design.frame_style, None, "None");
                        for style in catalog.frame_styles() {
                            ui.selectable_value(
                                &mut design.frame_style,
                                Some(style.id.clone()),
                                &style.name,
                            );
                        }
                    });
                ui.end_row();

                ui.label("Glazing");
                egui::ComboBox::from_id_source("glazing")
                    .selected_text(
                        design
                            .glazing
                            .as_deref()
                            .and_then(|id| catalog.glazing(id))
                            .map_or("None", |g| g.name.as_str()),
                    )
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut design.glazing, None, "None");
                        for glazing in catalog.glazings() {
                            ui.selectable_value(
                                &mut design.glazing,
                                Some(glazing.id.clone()),
                                &glazing.name,
                            );
                        }
                    });
                ui.end_row();

                ui.label("Print artwork");
                ui.checkbox(&mut design.include_print, "");
                ui.end_row();
            });

        if self.designer == Designer::PictureFrame {
            ui.separator();
            mat_ui(ui, design, catalog, unit);
        }
    }

    fn preview_ui(&mut self, ui: &mut egui::Ui) {
        if let Err(issue) = validate_artwork_size(
            self.design.artwork_width,
            self.design.artwork_height,
            &self.config.size_limits,
        ) {
            ui.colored_label(Color32::YELLOW, issue.to_string());
            return;
        }

        let available = ui.available_size();
        let (rect, _) = ui.allocate_exact_size(available, egui::Sense::hover());
        let container = SizePx::new(rect.width() as f64, rect.height() as f64);

        let layout = self
            .design
            .layout_request(&self.catalog, container, self.config.preview_padding_px)
            .and_then(|request| compute_preview_layout(&request));
        let palette = Palette::for_design(&self.design, &self.catalog);

        match (layout, palette) {
            (Ok(layout), Ok(palette)) if layout.warning.is_none() => {
                render_framed_preview(
                    ui.painter(),
                    rect.min,
                    &layout,
                    &palette,
                    self.artwork.as_ref(),
                );
            }
            (Ok(_), Ok(_)) => {}
            (Err(e), _) | (_, Err(e)) => {
                ui.label(format!("Error computing preview: {}", e));
            }
        }
    }

    fn price_ui(&self, ui: &mut egui::Ui) {
        match pricing::quote(&self.design, &self.catalog, &self.config.pricing) {
            Ok(quote) => {
                egui::Grid::new("price").num_columns(2).striped(true).show(ui, |ui| {
                    for (label, amount) in quote.line_items() {
                        if amount == pricing::Money::ZERO {
                            continue;
                        }
                        ui.label(label);
                        ui.label(amount.to_string());
                        ui.end_row();
                    }
                    ui.strong("Total");
                    ui.strong(quote.total().to_string());
                    ui.end_row();
                });
            }
            Err(e) => {
                ui.colored_label(Color32::RED, format!("Cannot price this design: {}", e));
            }
        }
    }

    fn cut_list_ui(&self, ui: &mut egui::Ui) {
        let Some(style) = self
            .design
            .frame_style
            .as_deref()
            .and_then(|id| self.catalog.frame_style(id))
        else {
            ui.label("No frame selected.");
            return;
        };
        let cut = self.design.cut_list_for(style);
        let pix_per_inch = 8.0;
        ui.label("Horizontal side (x2)");
        render_frame_side_quad(ui, &cut.horizontal, style.face_width, pix_per_inch, self.unit);
        ui.label("Vertical side (x2)");
        render_frame_side_quad(ui, &cut.vertical, style.face_width, pix_per_inch, self.unit);
        ui.label(format!(
            "Total moulding: {}",
            Length::inches(cut.total_length()).convert(self.unit)
        ));
    }
}

impl eframe::App for FrameDesignerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Process image data when it comes in
        self.receive_artwork(ctx);

        egui::SidePanel::left("configuration")
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("📂 Open image file").clicked() {
                            self.open_artwork_dialog(ui);
                        }
                        #[cfg(not(target_arch = "wasm32"))]
                        {
                            if ui.button("💾 Export PNG").clicked() {
                                self.export_png();
                            }
                        }
                    });
                    if let Some(status) = &self.status {
                        ui.label(status.as_str());
                    }

                    ui.heading("Configuration");
                    self.configuration_ui(ui);

                    ui.heading("Price");
                    self.price_ui(ui);

                    ui.heading("Cut List");
                    self.cut_list_ui(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Preview");
            self.preview_ui(ui);
        });
    }
}

fn mat_ui(ui: &mut egui::Ui, design: &mut FrameDesign, catalog: &StaticCatalog, unit: LengthUnit) {
    let first_mat = catalog.mat_colors().first().map(|m| m.id.clone());
    let mut kind = match design.mat {
        MatSelection::None => 0,
        MatSelection::Single { .. } => 1,
        MatSelection::Double { .. } => 2,
    };
    ui.horizontal(|ui| {
        ui.label("Mat");
        ui.radio_value(&mut kind, 0, "None");
        ui.radio_value(&mut kind, 1, "Single");
        ui.radio_value(&mut kind, 2, "Double");
    });

    // Carry the chosen colors across a change of mat kind.
    let (color, accent, reveal) = match &design.mat {
        MatSelection::None => (first_mat.clone(), first_mat.clone(), 0.25),
        MatSelection::Single { color } => (Some(color.clone()), first_mat.clone(), 0.25),
        MatSelection::Double {
            color,
            accent,
            reveal,
        } => (Some(color.clone()), Some(accent.clone()), *reveal),
    };
    design.mat = match (kind, color, accent) {
        (1, Some(color), _) => MatSelection::Single { color },
        (2, Some(color), Some(accent)) => MatSelection::Double {
            color,
            accent,
            reveal,
        },
        _ => MatSelection::None,
    };

    if matches!(design.mat, MatSelection::None) {
        return;
    }

    egui::Grid::new("mat_dimensions")
        .num_columns(4)
        .spacing([2.0, 4.0])
        .show(ui, |ui| {
            match &mut design.mat {
                MatSelection::Single { color } => {
                    ui.label("Color");
                    mat_color_combo(ui, "mat_color", color, catalog);
                    ui.end_row();
                }
                MatSelection::Double {
                    color,
                    accent,
                    reveal,
                } => {
                    ui.label("Top color");
                    mat_color_combo(ui, "mat_color", color, catalog);
                    ui.end_row();
                    ui.label("Accent color");
                    mat_color_combo(ui, "mat_accent", accent, catalog);
                    ui.end_row();
                    ui.label("Reveal");
                    InchesDragValue::new(reveal, unit).speed(0.05).ui(ui);
                    ui.end_row();
                }
                MatSelection::None => {}
            }

            let borders = &mut design.mat_borders;
            ui.label("Top");
            InchesDragValue::new(&mut borders.top, unit).ui(ui);
            ui.label("Bottom");
            InchesDragValue::new(&mut borders.bottom, unit).ui(ui);
            ui.end_row();
            ui.label("Left");
            InchesDragValue::new(&mut borders.left, unit).ui(ui);
            ui.label("Right");
            InchesDragValue::new(&mut borders.right, unit).ui(ui);
            ui.end_row();
        });

    ui.horizontal(|ui| {
        if ui.button("Even borders").clicked() {
            design.mat_borders = MatBorders::uniform(design.mat_borders.top);
        }
        if ui.button("Weight bottom").clicked() {
            let sides = design.mat_borders.top;
            design.mat_borders = MatBorders::bottom_weighted(sides, sides + 0.5);
        }
    });
}

fn mat_color_combo(ui: &mut egui::Ui, id: &str, selected: &mut String, catalog: &StaticCatalog) {
    egui::ComboBox::from_id_source(id)
        .selected_text(
            catalog
                .mat_color(selected)
                .map_or(selected.as_str(), |m| m.name.as_str())
                .to_owned(),
        )
        .show_ui(ui, |ui| {
            for mat in catalog.mat_colors() {
                ui.selectable_value(selected, mat.id.clone(), &mat.name);
            }
        });
}

/// Drag value over a length stored in inches, shown in the chosen unit.
pub struct InchesDragValue<'a> {
    inches: &'a mut f64,
    unit: LengthUnit,
    speed_inches: f64,
}

impl<'a> InchesDragValue<'a> {
    pub fn new(inches: &'a mut f64, unit: LengthUnit) -> Self {
        Self {
            inches,
            unit,
            speed_inches: 0.125,
        }
    }

    pub fn speed(mut self, speed_inches: f64) -> Self {
        self.speed_inches = speed_inches;
        self
    }

    pub fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let unit = self.unit;
        let mut display_value = Length::from_inches(*self.inches, unit).value;
        let speed = Length::from_inches(self.speed_inches, unit).value;

        let response = ui.add(
            egui::DragValue::new(&mut display_value)
                .speed(speed)
                .custom_formatter(|value, _| Length::new(value, unit).format_value())
                .custom_parser(|s| parse_dimension(s).ok()),
        );

        if response.changed() {
            *self.inches = Length::new(display_value.max(0.0), unit).to_inches();
        }
        response
    }
}

fn to_rect(origin: Pos2, rect: RectPx) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(rect.x as f32, rect.y as f32),
        Vec2::new(rect.w as f32, rect.h as f32),
    )
}

fn to_color([r, g, b]: Rgb) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn render_framed_preview(
    painter: &egui::Painter,
    origin: Pos2,
    layout: &LayoutResult,
    palette: &Palette,
    artwork: Option<&Artwork>,
) {
    let rects = layout.rects();
    let outer = to_rect(origin, rects.outer);
    let mat = to_rect(origin, rects.mat);
    let reveal = to_rect(origin, rects.reveal);
    let opening = to_rect(origin, rects.opening);
    let glass = to_rect(origin, rects.glass);

    render_rect_with_hole(painter, outer, mat, to_color(palette.frame));
    painter.rect_filled(glass, 0.0, to_color(palette.mat));

    match artwork {
        Some(artwork) => {
            let size = artwork.texture.size_vec2();
            painter.image(
                artwork.texture.id(),
                opening,
                cover_uv(size, opening.size()),
                Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(opening, 0.0, to_color(PLACEHOLDER_COLOR));
        }
    }

    // Mat bands are painted over the artwork edges, as a real mat would.
    render_rect_with_hole(painter, mat, reveal, to_color(palette.mat));
    render_rect_with_hole(painter, reveal, opening, to_color(palette.accent));
}

/// Texture coordinates that fill `target` without distortion, cropping the
/// overflowing axis evenly.
fn cover_uv(texture: Vec2, target: Vec2) -> Rect {
    if texture.x <= 0.0 || texture.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    }
    let texture_aspect = texture.x / texture.y;
    let target_aspect = target.x / target.y;
    if texture_aspect > target_aspect {
        let span = target_aspect / texture_aspect;
        Rect::from_min_max(Pos2::new((1.0 - span) / 2.0, 0.0), Pos2::new((1.0 + span) / 2.0, 1.0))
    } else {
        let span = texture_aspect / target_aspect;
        Rect::from_min_max(Pos2::new(0.0, (1.0 - span) / 2.0), Pos2::new(1.0, (1.0 + span) / 2.0))
    }
}

/// Paints the band between `outer_rect` and `hole_rect`. The hole does not
/// need to be centred.
fn render_rect_with_hole(
    painter: &egui::Painter,
    outer_rect: Rect,
    hole_rect: Rect,
    color: Color32,
) {
    // Top rectangle
    painter.rect_filled(
        Rect::from_min_max(outer_rect.min, Pos2::new(outer_rect.right(), hole_rect.top())),
        0.0,
        color,
    );

    // Bottom rectangle
    painter.rect_filled(
        Rect::from_min_max(Pos2::new(outer_rect.left(), hole_rect.bottom()), outer_rect.max),
        0.0,
        color,
    );

    // Left rectangle
    painter.rect_filled(
        Rect::from_min_max(
            Pos2::new(outer_rect.left(), hole_rect.top()),
            hole_rect.left_bottom(),
        ),
        0.0,
        color,
    );

    // Right rectangle
    painter.rect_filled(
        Rect::from_min_max(
            hole_rect.right_top(),
            Pos2::new(outer_rect.right(), hole_rect.bottom()),
        ),
        0.0,
        color,
    );
}

fn render_frame_side_quad(
    ui: &mut egui::Ui,
    piece: &CutPiece,
    face_width: f64,
    pix_per_inch: f32,
    unit: LengthUnit,
) -> egui::Response {
    let frame_width_px = face_width as f32 * pix_per_inch;
    let frame_length_px = piece.outer_length as f32 * pix_per_inch;

    // Calculate the size of the area we need
    let padding = 20.0;
    let padding_vec = Vec2::new(padding, padding);
    let widget_size = Vec2::new(
        frame_length_px + 2.0 * padding,
        frame_width_px + 2.0 * padding,
    );
    let (rect, response) = ui.allocate_exact_size(widget_size, egui::Sense::hover());
    let origin = rect.left_top() + padding_vec;

    // Trapezoid with mitred ends
    let points = [
        origin + Vec2::new(0.0, 0.0),
        origin + Vec2::new(frame_length_px, 0.0),
        origin + Vec2::new(frame_length_px - frame_width_px, frame_width_px),
        origin + Vec2::new(frame_width_px, frame_width_px),
        origin + Vec2::new(0.0, 0.0),
    ];

    ui.painter().add(Shape::line(
        points.to_vec(),
        Stroke::new(1.0, Color32::GRAY),
    ));

    let text_style = egui::TextStyle::Small;
    let font_id = ui.style().text_styles[&text_style].clone();
    let label = |inches: f64| Length::inches(inches).convert(unit).to_string();

    // Long side
    render_dimension_line(
        ui,
        points[0],
        points[1],
        padding / 2.0,
        &label(piece.outer_length),
        &font_id,
    );

    // Short side
    render_dimension_line(
        ui,
        points[3],
        points[2],
        -padding / 2.0,
        &label(piece.inner_length),
        &font_id,
    );

    response
}

fn render_dimension_line(
    ui: &mut egui::Ui,
    start: Pos2,
    end: Pos2,
    offset: f32,
    label: &str,
    font_id: &egui::FontId,
) {
    let color = ui.visuals().text_color();
    let direction = (end - start).normalized();
    let normal = direction.rot90();
    let line_start = start + normal * offset;
    let line_end = end + normal * offset;

    // Extension lines
    ui.painter()
        .line_segment([start, line_start], Stroke::new(1.0, Color32::DARK_GRAY));
    ui.painter()
        .line_segment([end, line_end], Stroke::new(1.0, Color32::DARK_GRAY));

    ui.painter()
        .line_segment([line_start, line_end], Stroke::new(1.0, color));

    // Arrow caps
    let arrow_size = 3.0;
    let arrow1 = (direction + normal).normalized() * arrow_size;
    let arrow2 = (direction - normal).normalized() * arrow_size;
    for (tip, cap) in [
        (line_start, arrow1),
        (line_start, arrow2),
        (line_end, -arrow1),
        (line_end, -arrow2),
    ] {
        ui.painter()
            .line_segment([tip, tip + cap], Stroke::new(1.0, color));
    }

    let galley = ui
        .painter()
        .layout_no_wrap(label.to_string(), font_id.clone(), color);
    let clearance = normal.dot(galley.rect.size()).abs() / 2.0 + offset.abs() / 2.0;
    let label_pos = (line_start + line_end.to_vec2()) / 2.0 + offset.signum() * clearance * normal
        - galley.rect.size() / 2.0;
    ui.painter().galley(label_pos, galley, color);
}

fn standard_size_menu_button(ui: &mut egui::Ui, design: &mut FrameDesign) {
    ui.menu_button("📏", |ui| {
        for (label, width, height) in [
            ("4x6\"", 4.0, 6.0),
            ("5x7\"", 5.0, 7.0),
            ("8x10\"", 8.0, 10.0),
            ("11x14\"", 11.0, 14.0),
            ("16x20\"", 16.0, 20.0),
            ("18x24\"", 18.0, 24.0),
            ("24x36\"", 24.0, 36.0),
        ] {
            if ui.button(label).clicked() {
                design.artwork_width = width;
                design.artwork_height = height;
                ui.close_menu();
            }
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn execute<F: Future<Output = ()> + Send + 'static>(f: F) {
    std::thread::spawn(move || futures::executor::block_on(f));
}

#[cfg(target_arch = "wasm32")]
fn execute<F: Future<Output = ()> + 'static>(f: F) {
    wasm_bindgen_futures::spawn_local(f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_uv_crops_wide_texture() {
        let uv = cover_uv(Vec2::new(200.0, 100.0), Vec2::new(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 1e-6);
        assert!((uv.max.x - 0.75).abs() < 1e-6);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn cover_uv_crops_tall_texture() {
        let uv = cover_uv(Vec2::new(100.0, 400.0), Vec2::new(100.0, 100.0));
        assert_eq!(uv.min.x, 0.0);
        assert!((uv.min.y - 0.375).abs() < 1e-6);
        assert!((uv.max.y - 0.625).abs() < 1e-6);
    }
}
