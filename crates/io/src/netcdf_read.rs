//! Low-level NetCDF extraction helpers.

use std::path::Path;

use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Dimension names of a variable, in storage order.
pub(crate) fn dimension_names(var: &netcdf::Variable<'_>) -> Vec<String> {
    var.dimensions().iter().map(|d| d.name()).collect()
}

/// Shape of a variable, in storage order.
pub(crate) fn shape(var: &netcdf::Variable<'_>) -> Vec<usize> {
    var.dimensions().iter().map(|d| d.len()).collect()
}

/// A 1-D variable named after its only dimension.
pub(crate) fn is_coordinate(var: &netcdf::Variable<'_>) -> bool {
    let dims = var.dimensions();
    dims.len() == 1 && dims[0].name() == var.name()
}

/// Read a string attribute, `None` if absent or not textual.
pub(crate) fn attribute_string(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        AttributeValue::Strs(v) => v.into_iter().next(),
        _ => None,
    }
}

/// Read a numeric attribute as `f64`, `None` if absent or not numeric.
/// For array attributes the first element is returned.
pub(crate) fn attribute_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    let value = var.attribute_value(name)?.ok()?;
    attribute_values_f64(&value).into_iter().next()
}

/// Every numeric element of an attribute value.
fn attribute_values_f64(value: &AttributeValue) -> Vec<f64> {
    match value {
        AttributeValue::Double(v) => vec![*v],
        AttributeValue::Doubles(v) => v.clone(),
        AttributeValue::Float(v) => vec![f64::from(*v)],
        AttributeValue::Floats(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Int(v) => vec![f64::from(*v)],
        AttributeValue::Ints(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Short(v) => vec![f64::from(*v)],
        AttributeValue::Shorts(v) => v.iter().map(|&x| f64::from(x)).collect(),
        AttributeValue::Schar(v) => vec![f64::from(*v)],
        AttributeValue::Uchar(v) => vec![f64::from(*v)],
        AttributeValue::Ushort(v) => vec![f64::from(*v)],
        AttributeValue::Uint(v) => vec![f64::from(*v)],
        AttributeValue::Longlong(v) => vec![*v as f64],
        AttributeValue::Ulonglong(v) => vec![*v as f64],
        _ => Vec::new(),
    }
}

/// Render an attribute value for display.
pub(crate) fn render_attribute(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => s.clone(),
        AttributeValue::Strs(v) => v.join(", "),
        other => {
            let numbers = attribute_values_f64(other);
            if numbers.is_empty() {
                format!("{other:?}")
            } else {
                numbers
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
    }
}

/// Read all values of a variable as `f64` in storage order.
///
/// With `mask_and_scale`, values equal to `_FillValue` or any
/// `missing_value` become NaN, and `scale_factor` / `add_offset` are
/// applied to the rest.
pub(crate) fn read_values(
    var: &netcdf::Variable<'_>,
    mask_and_scale: bool,
) -> Result<Vec<f64>, IoError> {
    let mut data = var.get_values::<f64, _>(..)?;
    if !mask_and_scale {
        return Ok(data);
    }

    let mut missing: Vec<f64> = Vec::new();
    for name in ["_FillValue", "missing_value"] {
        if let Some(Ok(value)) = var.attribute_value(name) {
            missing.extend(attribute_values_f64(&value));
        }
    }
    let scale = attribute_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = attribute_f64(var, "add_offset").unwrap_or(0.0);

    for x in &mut data {
        if missing.iter().any(|m| *m == *x || (m.is_nan() && x.is_nan())) {
            *x = f64::NAN;
        } else {
            *x = *x * scale + offset;
        }
    }
    Ok(data)
}
