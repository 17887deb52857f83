use egui::{Pos2, Rect, Vec2};

const MIN_ZOOM: f32 = 0.01;
const MAX_ZOOM: f32 = 50.0;

/// The image-sized drawing surface and its zoom/pan transform.
///
/// Canvas coordinates are image pixel coordinates: (0, 0) is the top-left
/// corner of the image and the extent is the image's width and height.
pub struct Canvas {
    width: f32,
    height: f32,
    offset: Vec2,
    zoom: f32,
    fit_pending: bool,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
            zoom: 1.0,
            fit_pending: false,
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn get_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn zoom_at(&mut self, factor: f32, pos: Pos2, view_rect: Rect) {
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Keep the canvas point under the cursor fixed.
        let anchor = view_rect.center() + self.offset;
        let mouse_offset = pos - anchor;
        self.offset -= mouse_offset * (self.zoom / old_zoom - 1.0);
    }

    /// Defers an auto-range until the view size is known.
    pub fn request_fit(&mut self) {
        self.fit_pending = true;
    }

    pub fn fit_pending(&self) -> bool {
        self.fit_pending
    }

    /// Centers the canvas in `view_rect` and scales it so all of it is visible.
    pub fn fit_to(&mut self, view_rect: Rect) {
        self.fit_pending = false;
        self.offset = Vec2::ZERO;
        if self.width <= 0.0 || self.height <= 0.0 {
            self.zoom = 1.0;
            return;
        }
        let scale_x = view_rect.width() / self.width;
        let scale_y = view_rect.height() / self.height;
        self.zoom = scale_x.min(scale_y).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn get_zoom(&self) -> f32 {
        self.zoom
    }

    pub fn get_screen_rect(&self, view_rect: Rect) -> Rect {
        let center = view_rect.center() + self.offset;
        let size = Vec2::new(self.width, self.height) * self.zoom;
        Rect::from_center_size(center, size)
    }

    pub fn screen_to_canvas_pos(&self, screen_pos: Pos2, view_rect: Rect) -> Pos2 {
        let screen_rect = self.get_screen_rect(view_rect);
        let normalized_pos = (screen_pos - screen_rect.min) / self.zoom;
        Pos2::new(normalized_pos.x, normalized_pos.y)
    }

    pub fn canvas_to_screen_pos(&self, canvas_pos: Pos2, view_rect: Rect) -> Pos2 {
        let screen_rect = self.get_screen_rect(view_rect);
        screen_rect.min + canvas_pos.to_vec2() * self.zoom
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
