use crate::types::{GeoTransform, ProjectionHint, SlopeResult};
use gdal::raster::{Buffer, RasterCreationOption};
use gdal::DriverManager;
use ndarray::Array2;
use std::path::Path;

/// Single-band Float64 GeoTIFF writer. Missing cells are NaN and NaN is
/// declared as the band NoData value.
#[derive(Debug, Clone, Default)]
pub struct GeoTiffWriter {
    compression: Option<String>,
}

impl GeoTiffWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// GTiff COMPRESS creation option, e.g. "DEFLATE" or "LZW"
    pub fn with_compression(mut self, compression: impl Into<String>) -> Self {
        self.compression = Some(compression.into());
        self
    }

    /// Write `grid` with the georeferencing of the source DEM
    pub fn write_raster<P: AsRef<Path>>(
        &self,
        output_path: P,
        grid: &Array2<f64>,
        geo_transform: &GeoTransform,
        projection: &ProjectionHint,
    ) -> SlopeResult<()> {
        log::info!("Saving raster as GeoTIFF: {}", output_path.as_ref().display());

        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let (height, width) = grid.dim();

        let options: Vec<RasterCreationOption> = self
            .compression
            .as_deref()
            .map(|value| RasterCreationOption { key: "COMPRESS", value })
            .into_iter()
            .collect();

        let mut dataset = driver.create_with_band_type_with_options::<f64, _>(
            output_path.as_ref(),
            width as isize,
            height as isize,
            1,
            &options,
        )?;

        dataset.set_geo_transform(&geo_transform.to_gdal())?;
        if !projection.is_empty() {
            dataset.set_projection(projection.as_str())?;
        }

        let mut rasterband = dataset.rasterband(1)?;
        let flat_data: Vec<f64> = grid.iter().cloned().collect();
        let buffer = Buffer::new((width, height), flat_data);
        rasterband.write((0, 0), (width, height), &buffer)?;
        rasterband.set_no_data_value(Some(f64::NAN))?;

        log::debug!("Wrote {}x{} Float64 band", width, height);
        Ok(())
    }
}
