use crate::points::Point;
use egui::{Color32, Painter, Pos2, Stroke};

/// Appearance of a point marker: filled circle with an outline.
#[derive(Debug, Clone, Copy)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill: Color32,
    pub outline: Color32,
    pub outline_width: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 5.0,
            fill: Color32::RED,
            outline: Color32::WHITE,
            outline_width: 1.5,
        }
    }
}

impl MarkerStyle {
    pub fn paint(&self, painter: &Painter, screen_pos: Pos2) {
        painter.circle(
            screen_pos,
            self.radius,
            self.fill,
            Stroke::new(self.outline_width, self.outline),
        );
    }
}

/// Marker layer drawn above the image. It is rebuilt as a whole from the
/// point sequence; `redraws` counts how many times that happened.
#[derive(Debug, Default)]
pub struct Overlay {
    markers: Vec<Pos2>,
    redraws: u64,
}

impl Overlay {
    pub fn render(&mut self, points: &[Point]) {
        self.markers.clear();
        self.markers.extend(points.iter().map(|p| p.to_pos2()));
        self.redraws += 1;
    }

    /// Marker positions in canvas coordinates.
    pub fn markers(&self) -> &[Pos2] {
        &self.markers
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}
