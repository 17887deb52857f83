use crate::analysis::{self, StructureReport};
use crate::canvas::Canvas;
use crate::config::AnalysisConfig;
use crate::loader;
use crate::marker::Overlay;
use crate::points::{InsufficientPoints, PairDistance, Point, PointStore};
use egui::{Pos2, Rect};
use image::GrayImage;
use std::path::Path;

/// Everything the window shows, mutated only through the handler methods
/// below. Independent of egui's context so it can be driven from tests.
pub struct AppState {
    image: Option<GrayImage>,
    image_dirty: bool,
    canvas: Canvas,
    points: PointStore,
    overlay: Overlay,
    config: AnalysisConfig,
    status: String,
    last_distances: Vec<PairDistance>,
    last_report: Option<StructureReport>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            image: None,
            image_dirty: false,
            canvas: Canvas::default(),
            points: PointStore::new(),
            overlay: Overlay::default(),
            config,
            status: "Status: Ready".to_string(),
            last_distances: Vec::new(),
            last_report: None,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn image(&self) -> Option<&GrayImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AnalysisConfig {
        &mut self.config
    }

    /// Result of the last distance calculation, with the point indices it
    /// was computed for. Points added later do not change it.
    pub fn last_distances(&self) -> &[PairDistance] {
        &self.last_distances
    }

    pub fn last_report(&self) -> Option<&StructureReport> {
        self.last_report.as_ref()
    }

    /// Returns true once after each successful load, so the caller can
    /// upload a fresh texture.
    pub fn take_image_dirty(&mut self) -> bool {
        std::mem::take(&mut self.image_dirty)
    }

    /// Replaces the current image. On failure the previous image, if any,
    /// stays displayed and only the status line changes.
    pub fn load_image(&mut self, path: &Path) -> bool {
        match loader::load(path) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                log::info!("loaded {} ({}x{})", path.display(), width, height);
                self.render_image(image);
                self.status = "Status: Image Loaded".to_string();
                true
            }
            Err(err) => {
                log::warn!("could not load {}: {}", path.display(), err);
                self.status = format!("Status: Failed to load image: {}", err);
                false
            }
        }
    }

    /// Startup convenience load; a missing or broken file leaves the
    /// window in its ready state.
    pub fn preload(&mut self, path: &Path) {
        if !self.load_image(path) {
            self.status = "Status: Ready".to_string();
        }
    }

    fn render_image(&mut self, image: GrayImage) {
        let (width, height) = image.dimensions();
        self.canvas.set_size(width as f32, height as f32);
        self.canvas.request_fit();
        self.image = Some(image);
        self.image_dirty = true;
        self.last_report = None;
    }

    /// Maps a click on the view into image coordinates and records it.
    /// Clicks are ignored while no image is loaded.
    pub fn handle_canvas_click(&mut self, screen_pos: Pos2, view_rect: Rect) -> Option<Point> {
        if self.image.is_none() {
            return None;
        }
        let canvas_pos = self.canvas.screen_to_canvas_pos(screen_pos, view_rect);
        let point = Point::from(canvas_pos);
        self.add_point(point);
        Some(point)
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
        log::debug!("point {} at ({}, {})", self.points.len(), point.x, point.y);
        self.status = format!("Status: Point added at {:.2}, {:.2}", point.x, point.y);
        self.overlay.render(self.points.as_slice());
    }

    pub fn calculate_distances(&mut self) -> Result<Vec<f64>, InsufficientPoints> {
        let pairs = match self.points.distances() {
            Ok(pairs) => pairs,
            Err(err) => {
                log::debug!("distance calculation skipped: {}", err);
                self.status = "Status: At least two points required".to_string();
                return Err(err);
            }
        };

        log::info!(
            "calculated {} distances between {} points",
            pairs.len(),
            self.points.len()
        );
        let distances: Vec<f64> = pairs.iter().map(|p| p.distance).collect();
        self.status = format!("Status: Distances Calculated: {:?}", distances);
        self.last_distances = pairs;
        self.overlay.render(self.points.as_slice());
        Ok(distances)
    }

    pub fn clear_points(&mut self) {
        if !self.points.is_empty() {
            log::debug!("clearing {} points", self.points.len());
        }
        self.points.clear();
        self.last_distances.clear();
        self.status = "Status: Points cleared".to_string();
        self.overlay.render(self.points.as_slice());
    }

    pub fn analyze_structure(&mut self) -> Option<&StructureReport> {
        let Some(image) = self.image.as_ref() else {
            self.status = "Status: No image loaded".to_string();
            return None;
        };

        let report = analysis::analyze(image, &self.config);
        self.status = match report.mean_area() {
            Some(mean) => format!(
                "Status: {} cells found (mean area {:.1} px, {} below minimum area)",
                report.cell_count(),
                mean,
                report.discarded
            ),
            None => format!(
                "Status: No cells found ({} below minimum area)",
                report.discarded
            ),
        };
        self.last_report = Some(report);
        self.last_report.as_ref()
    }

    /// Last distances as text, one `first-second<TAB>distance` line per
    /// pair with 1-based point numbers, for the clipboard.
    pub fn distances_text(&self) -> String {
        self.last_distances
            .iter()
            .map(|p| format!("{}-{}\t{}", p.first + 1, p.second + 1, p.distance))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn report_copy(&mut self, copied: bool) {
        if copied {
            self.status = "Status: Distances copied".to_string();
        } else {
            log::warn!("copying distances to the clipboard failed");
            self.status = "Status: Could not copy distances".to_string();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::path::PathBuf;

    fn write_image(dir: &tempfile::TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        GrayImage::from_pixel(width, height, Luma([90])).save(&path).unwrap();
        path
    }

    fn view() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 30.0), egui::vec2(1000.0, 700.0))
    }

    #[test]
    fn starts_ready_and_empty() {
        let state = AppState::default();
        assert_eq!(state.status(), "Status: Ready");
        assert!(!state.has_image());
        assert!(state.points().is_empty());
    }

    #[test]
    fn canvas_extent_matches_loaded_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(&dir, "a.png", 321, 123);
        let mut state = AppState::default();

        assert!(state.load_image(&path));
        assert_eq!(state.status(), "Status: Image Loaded");
        assert_eq!(state.canvas().get_size(), (321.0, 123.0));
        assert_eq!(state.image().unwrap().dimensions(), (321, 123));
        assert!(state.canvas().fit_pending());
        assert!(state.take_image_dirty());
        assert!(!state.take_image_dirty());
    }

    #[test]
    fn failed_load_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(&dir, "a.png", 50, 40);
        let mut state = AppState::default();
        state.load_image(&path);

        assert!(!state.load_image(&dir.path().join("missing.png")));
        assert!(state.status().starts_with("Status: Failed to load image"));
        assert_eq!(state.image().unwrap().dimensions(), (50, 40));
        assert_eq!(state.canvas().get_size(), (50.0, 40.0));
    }

    #[test]
    fn preload_failure_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.preload(&dir.path().join("1.jpg"));
        assert_eq!(state.status(), "Status: Ready");
        assert!(!state.has_image());
    }

    #[test]
    fn failed_load_without_previous_image_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        assert!(!state.load_image(&dir.path().join("missing.png")));
        assert!(!state.has_image());
    }

    #[test]
    fn click_appends_mapped_point_and_redraws_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(&dir, "a.png", 400, 300);
        let mut state = AppState::default();
        state.load_image(&path);
        state.canvas_mut().fit_to(view());
        state.add_point(Point::new(10.0, 20.0));

        let target = egui::pos2(120.5, 80.25);
        let screen = state.canvas().canvas_to_screen_pos(target, view());
        let redraws = state.overlay().redraws();

        let point = state.handle_canvas_click(screen, view()).unwrap();
        assert!((point.x - 120.5).abs() < 1e-3);
        assert!((point.y - 80.25).abs() < 1e-3);
        assert_eq!(state.points().len(), 2);
        assert_eq!(state.points()[1], point);
        assert_eq!(state.overlay().redraws(), redraws + 1);
        assert_eq!(state.overlay().markers().len(), 2);
        assert!(state.status().starts_with("Status: Point added at"));
    }

    #[test]
    fn point_status_shows_coordinates() {
        let mut state = AppState::default();
        state.add_point(Point::new(120.5, 80.25));
        assert_eq!(state.status(), "Status: Point added at 120.50, 80.25");
    }

    #[test]
    fn point_status_hides_float_widening() {
        let mut state = AppState::default();
        let point = Point::from(egui::pos2(37.3, 12.1));
        state.add_point(point);
        assert_eq!(state.status(), "Status: Point added at 37.30, 12.10");
        assert_eq!(state.points()[0], point);
    }

    #[test]
    fn clicks_without_image_are_ignored() {
        let mut state = AppState::default();
        assert!(state.handle_canvas_click(egui::pos2(5.0, 5.0), view()).is_none());
        assert!(state.points().is_empty());
        assert_eq!(state.overlay().redraws(), 0);
    }

    #[test]
    fn distances_need_two_points() {
        let mut state = AppState::default();
        state.add_point(Point::new(0.0, 0.0));
        let redraws = state.overlay().redraws();

        assert_eq!(
            state.calculate_distances(),
            Err(InsufficientPoints { found: 1 })
        );
        assert_eq!(state.status(), "Status: At least two points required");
        assert!(state.last_distances().is_empty());
        assert_eq!(state.overlay().redraws(), redraws);
    }

    #[test]
    fn distances_update_status_and_overlay() {
        let mut state = AppState::default();
        state.add_point(Point::new(0.0, 0.0));
        state.add_point(Point::new(3.0, 4.0));
        let redraws = state.overlay().redraws();

        assert_eq!(state.calculate_distances(), Ok(vec![5.0]));
        assert_eq!(state.status(), "Status: Distances Calculated: [5.0]");
        assert_eq!(
            state.last_distances(),
            &[PairDistance {
                first: 0,
                second: 1,
                distance: 5.0
            }]
        );
        assert_eq!(state.overlay().redraws(), redraws + 1);
        assert_eq!(state.distances_text(), "1-2\t5");
    }

    #[test]
    fn later_points_do_not_relabel_previous_distances() {
        let mut state = AppState::default();
        state.add_point(Point::new(0.0, 0.0));
        state.add_point(Point::new(3.0, 4.0));
        state.add_point(Point::new(6.0, 8.0));
        state.calculate_distances().unwrap();
        let before = state.last_distances().to_vec();

        state.add_point(Point::new(100.0, 100.0));

        assert_eq!(state.points().len(), 4);
        assert_eq!(state.last_distances(), before.as_slice());
        let pairs: Vec<(usize, usize)> = state
            .last_distances()
            .iter()
            .map(|p| (p.first, p.second))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(state.distances_text(), "1-2\t5\n1-3\t10\n2-3\t5");
    }

    #[test]
    fn copy_outcome_is_reported() {
        let mut state = AppState::default();
        state.report_copy(false);
        assert_eq!(state.status(), "Status: Could not copy distances");
        state.report_copy(true);
        assert_eq!(state.status(), "Status: Distances copied");
    }

    #[test]
    fn loading_new_image_keeps_points() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_image(&dir, "a.png", 40, 40);
        let second = write_image(&dir, "b.png", 80, 20);
        let mut state = AppState::default();
        state.load_image(&first);
        state.add_point(Point::new(1.0, 1.0));

        state.load_image(&second);
        assert_eq!(state.points(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn clear_points_empties_store_and_redraws() {
        let mut state = AppState::default();
        state.add_point(Point::new(0.0, 0.0));
        state.add_point(Point::new(1.0, 1.0));
        state.calculate_distances().unwrap();
        let redraws = state.overlay().redraws();

        state.clear_points();
        assert!(state.points().is_empty());
        assert!(state.last_distances().is_empty());
        assert!(state.overlay().markers().is_empty());
        assert_eq!(state.overlay().redraws(), redraws + 1);
    }

    #[test]
    fn analysis_requires_image() {
        let mut state = AppState::default();
        assert!(state.analyze_structure().is_none());
        assert_eq!(state.status(), "Status: No image loaded");
    }

    #[test]
    fn analysis_uses_configured_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(&dir, "a.png", 30, 30);
        let mut state = AppState::default();
        state.load_image(&path);

        // Uniform 90 is below the default threshold.
        assert_eq!(state.analyze_structure().unwrap().cell_count(), 0);

        state.config_mut().threshold_value = 50;
        assert_eq!(state.config().threshold_value, 50);
        let report = state.analyze_structure().unwrap();
        assert_eq!(report.cell_count(), 1);
        assert_eq!(report.regions[0].area, 900);
    }
}
