/// Image tried once at startup, relative to the working directory.
pub const DEFAULT_IMAGE_PATH: &str = "1.jpg";

/// Parameters of the foam structure analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Pixels strictly brighter than this are foreground.
    pub threshold_value: u8,
    /// Regions with fewer pixels than this are ignored.
    pub min_contour_area: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold_value: 127,
            min_contour_area: 100.0,
        }
    }
}
