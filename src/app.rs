use crate::config::{AnalysisConfig, DEFAULT_IMAGE_PATH};
use crate::loader;
use crate::marker::MarkerStyle;
use crate::state::AppState;
use crate::ui::UiState;
use clipboard::ClipboardContext;
use clipboard::ClipboardProvider;
use egui::{Color32, Context, Stroke, TextureHandle, Ui};
use egui_extras::{Column, TableBuilder};
use std::path::Path;

pub struct FoamAnalyzerApp {
    state: AppState,
    texture: Option<TextureHandle>,
    marker_style: MarkerStyle,
    ui_state: UiState,
    clipboard: Option<ClipboardContext>,
}

// Main implementation of the analyzer window
impl FoamAnalyzerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        cc.egui_ctx.set_style(style);

        let clipboard = match ClipboardProvider::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("clipboard unavailable: {}", err);
                None
            }
        };

        let mut state = AppState::new(AnalysisConfig::default());
        state.preload(Path::new(DEFAULT_IMAGE_PATH));

        Self {
            state,
            texture: None,
            marker_style: MarkerStyle::default(),
            ui_state: UiState::default(),
            clipboard,
        }
    }

    pub fn copy_to_clipboard(&mut self, text: String) -> bool {
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_contents(text).is_ok()
        } else {
            false
        }
    }

    fn load_image_from_dialog(&mut self) {
        match loader::pick_image_path() {
            Some(path) => {
                self.state.load_image(&path);
            }
            None => log::debug!("open dialog cancelled"),
        }
    }

    // Upload the grayscale image as a texture after each successful load
    fn sync_texture(&mut self, ctx: &Context) {
        if !self.state.take_image_dirty() {
            return;
        }
        if let Some(image) = self.state.image() {
            let rgba = image::DynamicImage::ImageLuma8(image.clone()).to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    // Handle mouse interactions with the canvas
    fn handle_canvas_interactions(&mut self, ui: &mut Ui, response: egui::Response) {
        let view_rect = response.rect;
        let alt_held = ui.input(|i| i.modifiers.alt);

        if response.dragged_by(egui::PointerButton::Middle)
            || (response.dragged_by(egui::PointerButton::Primary) && alt_held)
        {
            self.state.canvas_mut().pan(response.drag_delta());
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.scroll_delta.y);
            if scroll_delta != 0.0 {
                let zoom_factor = if scroll_delta > 0.0 { 1.1 } else { 1.0 / 1.1 };
                if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                    self.state.canvas_mut().zoom_at(zoom_factor, pos, view_rect);
                }
            }
        }

        self.ui_state.hover_position = None;
        self.ui_state.hover_intensity = None;
        if let (Some(mouse_pos), Some(image)) = (response.hover_pos(), self.state.image()) {
            let canvas_pos = self.state.canvas().screen_to_canvas_pos(mouse_pos, view_rect);
            if canvas_pos.x >= 0.0
                && canvas_pos.y >= 0.0
                && (canvas_pos.x as u32) < image.width()
                && (canvas_pos.y as u32) < image.height()
            {
                let pixel = image.get_pixel(canvas_pos.x as u32, canvas_pos.y as u32);
                self.ui_state.hover_position = Some(canvas_pos);
                self.ui_state.hover_intensity = Some(pixel[0]);
            }
        }

        if response.clicked() && !alt_held {
            if let Some(pos) = response.interact_pointer_pos() {
                self.state.handle_canvas_click(pos, view_rect);
            }
        }
    }

    // Draw the image layer, then the marker overlay
    fn draw_canvas(&mut self, ui: &mut Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let view_rect = response.rect;

        if self.state.canvas().fit_pending() {
            self.state.canvas_mut().fit_to(view_rect);
        }

        let bg_color = if self.ui_state.dark_mode {
            Color32::from_rgb(20, 20, 20)
        } else {
            Color32::from_rgb(240, 240, 240)
        };
        painter.rect_filled(view_rect, 0.0, bg_color);

        let canvas = self.state.canvas();
        match (&self.texture, self.state.has_image()) {
            (Some(texture), true) => {
                let image_rect = canvas.get_screen_rect(view_rect);
                painter.image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
                let border_color = if self.ui_state.dark_mode {
                    Color32::from_rgb(150, 150, 150)
                } else {
                    Color32::from_rgb(100, 100, 100)
                };
                painter.rect_stroke(image_rect, 0.0, Stroke::new(1.0, border_color));
            }
            _ => {
                painter.text(
                    view_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No image loaded",
                    egui::FontId::proportional(18.0),
                    Color32::GRAY,
                );
            }
        }

        if let Some(report) = self.state.last_report() {
            for region in &report.regions {
                let screen_pos = canvas.canvas_to_screen_pos(region.centroid.to_pos2(), view_rect);
                painter.circle_stroke(screen_pos, 3.0, Stroke::new(1.0, Color32::from_rgb(0, 200, 200)));
            }
        }

        for marker in self.state.overlay().markers() {
            let screen_pos = canvas.canvas_to_screen_pos(*marker, view_rect);
            self.marker_style.paint(&painter, screen_pos);
        }

        if self.ui_state.show_crosshair {
            if let Some(mouse_pos) = response.hover_pos() {
                let crosshair_color = Color32::from_rgb(255, 0, 0);
                let crosshair_size = 10.0;

                painter.line_segment(
                    [
                        egui::pos2(mouse_pos.x - crosshair_size, mouse_pos.y),
                        egui::pos2(mouse_pos.x + crosshair_size, mouse_pos.y),
                    ],
                    Stroke::new(1.0, crosshair_color),
                );
                painter.line_segment(
                    [
                        egui::pos2(mouse_pos.x, mouse_pos.y - crosshair_size),
                        egui::pos2(mouse_pos.x, mouse_pos.y + crosshair_size),
                    ],
                    Stroke::new(1.0, crosshair_color),
                );
            }
        }

        response
    }

    fn points_table(&self, ui: &mut Ui) {
        let points = self.state.points();
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto())
            .column(Column::remainder())
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("x");
                });
                header.col(|ui| {
                    ui.strong("y");
                });
            })
            .body(|mut body| {
                for (i, point) in points.iter().enumerate() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(format!("{}", i + 1));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", point.x));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", point.y));
                        });
                    });
                }
            });
    }
}

// Implement the main update loop for the app
impl eframe::App for FoamAnalyzerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut style = (*ctx.style()).clone();
        if self.ui_state.dark_mode {
            style.visuals = egui::Visuals::dark();
        } else {
            style.visuals = egui::Visuals::light();
        }
        ctx.set_style(style);

        self.sync_texture(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Foam Structure Analyzer");
                ui.separator();
                if ui.button("Fit View").clicked() {
                    self.state.canvas_mut().request_fit();
                }
                ui.separator();
                ui.label("Zoom:");
                let zoom_percentage = (self.state.canvas().get_zoom() * 100.0) as i32;
                ui.label(format!("{}%", zoom_percentage));
                if self.state.has_image() {
                    let (width, height) = self.state.canvas().get_size();
                    ui.separator();
                    ui.label(format!("{} x {} px", width, height));
                }
                if let (Some(pos), Some(value)) =
                    (self.ui_state.hover_position, self.ui_state.hover_intensity)
                {
                    ui.separator();
                    ui.label(format!("({:.1}, {:.1}) = {}", pos.x, pos.y, value));
                }
            });
        });

        egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Load Image").clicked() {
                    self.load_image_from_dialog();
                }
                if ui.button("Calculate Distances").clicked() {
                    self.state.calculate_distances().ok();
                }
                if ui.button("Clear Points").clicked() {
                    self.state.clear_points();
                }
                if ui.button("Analyze Structure").clicked() {
                    self.state.analyze_structure();
                }
            });
            ui.label(self.state.status());
        });

        egui::SidePanel::right("settings_panel")
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Analysis");
                    ui.separator();

                    let config = self.state.config_mut();
                    ui.horizontal(|ui| {
                        ui.label("Threshold:");
                        ui.add(egui::Slider::new(&mut config.threshold_value, 0..=255));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Min Contour Area:");
                        ui.add(
                            egui::DragValue::new(&mut config.min_contour_area)
                                .speed(1.0)
                                .clamp_range(0.0..=1_000_000.0),
                        );
                    });

                    if let Some(report) = self.state.last_report() {
                        ui.label(format!("Cells: {}", report.cell_count()));
                        if let Some(mean) = report.mean_area() {
                            ui.label(format!("Mean area: {:.1} px", mean));
                        }
                        ui.label(format!("Below minimum: {}", report.discarded));
                        ui.label(format!("Foreground: {:.1}%", report.foreground_fraction * 100.0));
                    }

                    ui.separator();
                    ui.heading("Points");
                    egui::ScrollArea::vertical()
                        .id_source("points_scroll")
                        .max_height(200.0)
                        .show(ui, |ui| {
                            self.points_table(ui);
                        });

                    ui.separator();
                    ui.heading("Distances");

                    if !self.state.last_distances().is_empty() {
                        if ui.button("Copy Distances").clicked() {
                            let text = self.state.distances_text();
                            let copied = self.copy_to_clipboard(text);
                            self.state.report_copy(copied);
                        }
                    }

                    egui::ScrollArea::vertical()
                        .id_source("distances_scroll")
                        .max_height(200.0)
                        .show(ui, |ui| {
                            for pair in self.state.last_distances() {
                                ui.label(format!(
                                    "{}-{}: {:.3}",
                                    pair.first + 1,
                                    pair.second + 1,
                                    pair.distance
                                ));
                            }
                        });

                    ui.separator();

                    ui.collapsing("Appearance", |ui| {
                        ui.checkbox(&mut self.ui_state.dark_mode, "Dark Mode");
                        ui.checkbox(&mut self.ui_state.show_crosshair, "Crosshair");
                        ui.horizontal(|ui| {
                            ui.label("Marker Size:");
                            ui.add(
                                egui::DragValue::new(&mut self.marker_style.radius)
                                    .speed(0.5)
                                    .clamp_range(2.0..=30.0),
                            );
                        });
                    });

                    ui.collapsing("Help", |ui| {
                        ui.label("• Click on the image to place a point");
                        ui.label("• 'Calculate Distances' measures every pair of points in pixels");
                        ui.label("• 'Analyze Structure' counts bright cells above the threshold");
                        ui.label("• Middle-click or Alt+drag to pan");
                        ui.label("• Scroll to zoom in/out");
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.draw_canvas(ui);
            self.handle_canvas_interactions(ui, response);
        });
    }
}
