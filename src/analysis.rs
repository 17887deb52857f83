//! Foam cell segmentation: threshold the image, then label connected
//! bright regions and keep the ones large enough to count as cells.

use crate::config::AnalysisConfig;
use crate::points::Point;
use image::{GrayImage, Luma};
use imageproc::contrast::threshold;
use imageproc::region_labelling::{connected_components, Connectivity};

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub area: u64,
    pub centroid: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureReport {
    /// Regions at or above the area cutoff, in label order.
    pub regions: Vec<Region>,
    /// Regions dropped for being smaller than the cutoff.
    pub discarded: usize,
    /// Fraction of pixels above the threshold.
    pub foreground_fraction: f64,
}

impl StructureReport {
    pub fn cell_count(&self) -> usize {
        self.regions.len()
    }

    pub fn mean_area(&self) -> Option<f64> {
        if self.regions.is_empty() {
            return None;
        }
        let total: u64 = self.regions.iter().map(|r| r.area).sum();
        Some(total as f64 / self.regions.len() as f64)
    }
}

pub fn analyze(image: &GrayImage, config: &AnalysisConfig) -> StructureReport {
    let binary = threshold(image, config.threshold_value);
    let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));

    // Per label: pixel count and coordinate sums. Label 0 is background.
    let mut stats: Vec<(u64, f64, f64)> = Vec::new();
    let mut foreground = 0u64;
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel[0] as usize;
        if label == 0 {
            continue;
        }
        foreground += 1;
        if stats.len() < label {
            stats.resize(label, (0, 0.0, 0.0));
        }
        let entry = &mut stats[label - 1];
        entry.0 += 1;
        // Pixel centers
        entry.1 += x as f64 + 0.5;
        entry.2 += y as f64 + 0.5;
    }

    let mut report = StructureReport::default();
    for &(area, sum_x, sum_y) in &stats {
        if area == 0 {
            continue;
        }
        if (area as f64) < config.min_contour_area {
            report.discarded += 1;
            continue;
        }
        report.regions.push(Region {
            area,
            centroid: Point::new(sum_x / area as f64, sum_y / area as f64),
        });
    }

    let total = image.width() as u64 * image.height() as u64;
    if total > 0 {
        report.foreground_fraction = foreground as f64 / total as f64;
    }

    log::debug!(
        "structure analysis: {} cells kept, {} discarded (threshold {}, min area {})",
        report.regions.len(),
        report.discarded,
        config.threshold_value,
        config.min_contour_area
    );
    report
}
