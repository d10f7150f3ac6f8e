//! demslope: slope and aspect rasters from Digital Elevation Models
//!
//! Computes per-cell slope and aspect in degrees with the 3x3 weighted
//! finite-difference convention used by common GIS tools. Raster files are read
//! and written through GDAL; the numeric core works on in-memory `ndarray` grids.

pub mod types;
pub mod io;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{
    AspectRaster, CellSpacing, ElevationGrid, GeoTransform, GradientField, ProjectionHint,
    SlopeError, SlopeRaster, SlopeResult,
};

pub use crate::core::{
    compute_slope_aspect, pixel_size, SlopeAspectCalculator, SlopeAspectParams,
    SlopeAspectSummary,
};

pub use io::{process_dem_file, DemRaster, DemReader, GeoTiffWriter, ProcessingOutput};
