// Slide measurement is the host's job. The engine pulls sizes through this trait
// whenever it needs fresh geometry.

use std::collections::HashMap;
use std::hash::Hash;

use crate::types::SlideSize;

/// Source of slide and container measurements.
pub trait GeometryProvider<H> {
    /// Outer width/height of one slide.
    fn measure(&self, handle: &H) -> SlideSize;

    /// Width of the slider container, if known.
    fn container_width(&self) -> Option<f64> {
        None
    }
}

/// Geometry pushed in by the host ahead of time, keyed by slide handle.
#[derive(Debug, Clone)]
pub struct MeasuredGeometry<H> {
    sizes: HashMap<H, SlideSize>,
    container_width: Option<f64>,
}

impl<H: Eq + Hash> MeasuredGeometry<H> {
    pub fn new() -> Self {
        MeasuredGeometry {
            sizes: HashMap::new(),
            container_width: None,
        }
    }

    pub fn set_size(&mut self, handle: H, size: SlideSize) {
        self.sizes.insert(handle, size);
    }

    pub fn forget(&mut self, handle: &H) {
        self.sizes.remove(handle);
    }

    pub fn set_container_width(&mut self, width: Option<f64>) {
        self.container_width = width;
    }
}

impl<H: Eq + Hash> Default for MeasuredGeometry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Eq + Hash> GeometryProvider<H> for MeasuredGeometry<H> {
    /// Unmeasured slides report zero size.
    fn measure(&self, handle: &H) -> SlideSize {
        self.sizes.get(handle).copied().unwrap_or_default()
    }

    fn container_width(&self) -> Option<f64> {
        self.container_width
    }
}
