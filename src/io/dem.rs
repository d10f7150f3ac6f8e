use crate::types::{ElevationGrid, GeoTransform, ProjectionHint, SlopeError, SlopeResult};
use gdal::Dataset;
use ndarray::Array2;
use std::path::Path;

/// Elevation grid together with the georeferencing it was read with
#[derive(Debug, Clone)]
pub struct DemRaster {
    pub elevation: ElevationGrid,
    pub geo_transform: GeoTransform,
    pub projection: ProjectionHint,
    /// NoData value declared by the source band, before NaN substitution
    pub no_data_value: Option<f64>,
}

impl DemRaster {
    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.elevation.dim()
    }
}

/// Digital Elevation Model reader
pub struct DemReader;

impl DemReader {
    /// Read band 1 of a DEM as f64, declared NoData replaced by NaN
    pub fn read_dem<P: AsRef<Path>>(dem_path: P) -> SlopeResult<DemRaster> {
        let dem_path = dem_path.as_ref();
        log::info!("Reading DEM from: {}", dem_path.display());

        if !dem_path.exists() {
            return Err(SlopeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("DEM file not found: {}", dem_path.display()),
            )));
        }

        // Open DEM file with GDAL
        let dataset = Dataset::open(dem_path)?;

        // Get spatial information
        let geo_transform = GeoTransform::from_gdal(dataset.geo_transform()?);
        let projection = ProjectionHint::new(dataset.projection());
        let (width, height) = dataset.raster_size();

        log::debug!("DEM size: {}x{}", width, height);
        log::debug!("DEM geotransform: {:?}", geo_transform);

        if !geo_transform.has_valid_pixel_size() {
            return Err(SlopeError::InvalidFormat(format!(
                "DEM geotransform has degenerate pixel size ({}, {})",
                geo_transform.pixel_width, geo_transform.pixel_height
            )));
        }

        if projection.is_empty() {
            log::warn!("DEM has no projection; units are inferred from pixel size only");
        }

        // Read elevation data from first band
        let rasterband = dataset.rasterband(1)?;
        let no_data_value = rasterband.no_data_value();
        let band_data = rasterband.read_as::<f64>((0, 0), (width, height), (width, height), None)?;

        // Convert to ndarray
        let mut elevation = Array2::from_shape_vec((height, width), band_data.data)
            .map_err(|e| SlopeError::Processing(format!("Failed to reshape DEM data: {}", e)))?;

        let replaced = Self::mask_no_data(&mut elevation, no_data_value);
        if replaced > 0 {
            log::info!(
                "Marked {} NoData pixels as missing ({:.2}%)",
                replaced,
                (replaced as f64 / (height * width) as f64) * 100.0
            );
        }

        Ok(DemRaster {
            elevation,
            geo_transform,
            projection,
            no_data_value,
        })
    }

    /// Replace samples equal to the declared NoData value with NaN.
    /// Returns the number of samples replaced.
    pub fn mask_no_data(dem: &mut Array2<f64>, no_data_value: Option<f64>) -> usize {
        let no_data = match no_data_value {
            Some(v) if !v.is_nan() => v,
            _ => return 0,
        };

        let mut replaced = 0;
        dem.mapv_inplace(|v| {
            if v == no_data {
                replaced += 1;
                f64::NAN
            } else {
                v
            }
        });
        replaced
    }
}
