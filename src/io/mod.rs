//! Raster I/O via GDAL

pub mod dem;
pub mod geotiff;

pub use dem::{DemRaster, DemReader};
pub use geotiff::GeoTiffWriter;

use crate::core::{SlopeAspectCalculator, SlopeAspectParams, SlopeAspectSummary};
use crate::types::{GeoTransform, ProjectionHint, SlopeResult};
use std::path::Path;

/// What a file run produced, minus the rasters themselves
#[derive(Debug, Clone)]
pub struct ProcessingOutput {
    pub shape: (usize, usize),
    pub geo_transform: GeoTransform,
    pub projection: ProjectionHint,
    pub summary: SlopeAspectSummary,
}

/// Read a DEM, compute slope and aspect, write both as GeoTIFFs
pub fn process_dem_file<P, S, A>(
    input: P,
    slope_path: S,
    aspect_path: A,
    params: SlopeAspectParams,
    writer: &GeoTiffWriter,
) -> SlopeResult<ProcessingOutput>
where
    P: AsRef<Path>,
    S: AsRef<Path>,
    A: AsRef<Path>,
{
    let dem = DemReader::read_dem(input)?;

    let calculator = SlopeAspectCalculator::new(params);
    let (slope, aspect) = calculator.compute(&dem.elevation, &dem.geo_transform, &dem.projection)?;

    writer.write_raster(slope_path, &slope, &dem.geo_transform, &dem.projection)?;
    writer.write_raster(aspect_path, &aspect, &dem.geo_transform, &dem.projection)?;

    let summary = SlopeAspectSummary::from_slope(&slope);
    log::info!(
        "Slope range {:.2}° - {:.2}° (mean {:.2}°), {} missing pixels ({:.2}%)",
        summary.min_slope,
        summary.max_slope,
        summary.mean_slope,
        summary.missing_cells,
        summary.missing_fraction() * 100.0
    );
    if summary.valid_cells == 0 {
        log::warn!("No valid slope values: every neighbourhood touches missing data");
    }

    Ok(ProcessingOutput {
        shape: dem.dim(),
        geo_transform: dem.geo_transform,
        projection: dem.projection,
        summary,
    })
}
