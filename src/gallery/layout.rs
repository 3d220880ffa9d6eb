//! Cell sizing per presentation mode and device size class

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear poster gallery or two-dimensional grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Gallery,
    Grid,
}

impl PresentationMode {
    pub fn toggled(self) -> Self {
        match self {
            PresentationMode::Gallery => PresentationMode::Grid,
            PresentationMode::Grid => PresentationMode::Gallery,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationMode::Gallery => write!(f, "gallery"),
            PresentationMode::Grid => write!(f, "grid"),
        }
    }
}

/// Device screen-size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    #[default]
    Normal,
    #[serde(rename = "xlarge")]
    ExtraLarge,
}

/// Cell dimensions in density-independent units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSize {
    pub width_dp: u32,
    pub height_dp: u32,
}

impl CellSize {
    pub const fn new(width_dp: u32, height_dp: u32) -> Self {
        Self {
            width_dp,
            height_dp,
        }
    }

    /// Pixel size at a display density (1.0 = 160 dpi)
    pub fn to_pixels(&self, density: f32) -> (u32, u32) {
        let scale = |dp: u32| (dp as f32 * density).round().max(0.0) as u32;
        (scale(self.width_dp), scale(self.height_dp))
    }
}

impl fmt::Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}dp", self.width_dp, self.height_dp)
    }
}

/// `{mode, size class} → cell size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTable {
    pub gallery_normal: CellSize,
    pub gallery_xlarge: CellSize,
    pub grid_normal: CellSize,
    pub grid_xlarge: CellSize,
}

impl LayoutTable {
    /// Movie posters: the linear gallery ignores the size class
    pub const MOVIES: LayoutTable = LayoutTable {
        gallery_normal: CellSize::new(130, 200),
        gallery_xlarge: CellSize::new(130, 200),
        grid_normal: CellSize::new(120, 180),
        grid_xlarge: CellSize::new(150, 220),
    };

    pub const SEASONS: LayoutTable = LayoutTable {
        gallery_normal: CellSize::new(120, 180),
        gallery_xlarge: CellSize::new(120, 180),
        grid_normal: CellSize::new(120, 180),
        grid_xlarge: CellSize::new(120, 180),
    };

    pub fn size(&self, mode: PresentationMode, size_class: SizeClass) -> CellSize {
        match (mode, size_class) {
            (PresentationMode::Gallery, SizeClass::Normal) => self.gallery_normal,
            (PresentationMode::Gallery, SizeClass::ExtraLarge) => self.gallery_xlarge,
            (PresentationMode::Grid, SizeClass::Normal) => self.grid_normal,
            (PresentationMode::Grid, SizeClass::ExtraLarge) => self.grid_xlarge,
        }
    }
}
