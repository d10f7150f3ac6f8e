//! Python bindings

use crate::core::{SlopeAspectCalculator, SlopeAspectParams};
use crate::io::{process_dem_file, GeoTiffWriter};
use crate::types::{GeoTransform, ProjectionHint};
use numpy::{PyReadonlyArray2, ToPyArray};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Convert PyReadonlyArray2 to ndarray Array2
fn numpy_to_array2<T>(arr: PyReadonlyArray2<T>) -> ndarray::Array2<T>
where
    T: Copy + numpy::Element,
{
    arr.as_array().to_owned()
}

/// Convert Array2<T> to numpy array
fn array2_to_numpy<T>(py: Python, arr: &ndarray::Array2<T>) -> PyResult<PyObject>
where
    T: numpy::Element + Copy,
{
    let numpy_array = arr.to_pyarray(py);
    Ok(numpy_array.into())
}

fn parse_geo_transform(values: Vec<f64>) -> PyResult<GeoTransform> {
    let gt: [f64; 6] = values.try_into().map_err(|v: Vec<f64>| {
        PyValueError::new_err(format!("geo_transform needs 6 values, got {}", v.len()))
    })?;
    Ok(GeoTransform::from_gdal(gt))
}

/// Slope and aspect in degrees for a 2D float64 elevation array
#[pyfunction]
#[pyo3(signature = (elevation, geo_transform, projection = String::new()))]
fn slope_aspect(
    py: Python,
    elevation: PyReadonlyArray2<f64>,
    geo_transform: Vec<f64>,
    projection: String,
) -> PyResult<(PyObject, PyObject)> {
    let gt = parse_geo_transform(geo_transform)?;
    let dem = numpy_to_array2(elevation);

    let (slope, aspect) = SlopeAspectCalculator::standard()
        .compute(&dem, &gt, &ProjectionHint::new(projection))
        .map_err(|e| PyRuntimeError::new_err(format!("{}", e)))?;

    Ok((array2_to_numpy(py, &slope)?, array2_to_numpy(py, &aspect)?))
}

/// Cell spacing (xsize, ysize) in meters
#[pyfunction]
fn pixel_size(geo_transform: Vec<f64>) -> PyResult<(f64, f64)> {
    let gt = parse_geo_transform(geo_transform)?;
    let spacing = crate::core::pixel_size(&gt, &ProjectionHint::default());
    Ok((spacing.xsize, spacing.ysize))
}

/// Read a DEM file and write slope and aspect GeoTIFFs
#[pyfunction]
#[pyo3(signature = (input, slope_path, aspect_path, compression = None))]
fn process_dem(
    input: String,
    slope_path: String,
    aspect_path: String,
    compression: Option<String>,
) -> PyResult<(usize, usize)> {
    let writer = match compression {
        Some(c) => GeoTiffWriter::new().with_compression(c),
        None => GeoTiffWriter::new(),
    };

    let output = process_dem_file(
        &input,
        &slope_path,
        &aspect_path,
        SlopeAspectParams::default(),
        &writer,
    )
    .map_err(|e| PyRuntimeError::new_err(format!("{}", e)))?;

    Ok(output.shape)
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(slope_aspect, m)?)?;
    m.add_function(wrap_pyfunction!(pixel_size, m)?)?;
    m.add_function(wrap_pyfunction!(process_dem, m)?)?;
    Ok(())
}
