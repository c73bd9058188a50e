//! Structural summary of a NetCDF file.

use std::fmt;
use std::path::Path;

use crate::error::IoError;
use crate::netcdf_read;

/// One variable of a file: dimensions, shape and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSummary {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    /// Attribute name and rendered value, in file order.
    pub attributes: Vec<(String, String)>,
}

/// Dimensions, variables and global attributes of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub dimensions: Vec<(String, usize)>,
    pub variables: Vec<VariableSummary>,
    pub attributes: Vec<(String, String)>,
}

impl FileSummary {
    /// Look up a variable summary by name.
    pub fn variable(&self, name: &str) -> Option<&VariableSummary> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// List the structure of the NetCDF file at `path` without reading data.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist and
/// [`IoError::Netcdf`] if the file cannot be opened.
pub fn inspect(path: &Path) -> Result<FileSummary, IoError> {
    let file = netcdf_read::open_file(path)?;

    let dimensions = file.dimensions().map(|d| (d.name(), d.len())).collect();

    let variables = file
        .variables()
        .map(|var| VariableSummary {
            name: var.name(),
            dims: netcdf_read::dimension_names(&var),
            shape: netcdf_read::shape(&var),
            attributes: var
                .attributes()
                .map(|a| (a.name().to_string(), render(a.value())))
                .collect(),
        })
        .collect();

    let attributes = file
        .attributes()
        .map(|a| (a.name().to_string(), render(a.value())))
        .collect();

    Ok(FileSummary {
        dimensions,
        variables,
        attributes,
    })
}

fn render(value: Result<netcdf::AttributeValue, netcdf::Error>) -> String {
    match value {
        Ok(v) => netcdf_read::render_attribute(&v),
        Err(e) => format!("<unreadable: {e}>"),
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dimensions:")?;
        for (name, len) in &self.dimensions {
            writeln!(f, "  {name} = {len}")?;
        }
        writeln!(f, "variables:")?;
        for var in &self.variables {
            writeln!(f, "  {}({}) shape {:?}", var.name, var.dims.join(", "), var.shape)?;
            for (key, value) in &var.attributes {
                writeln!(f, "    {key}: {value}")?;
            }
        }
        if !self.attributes.is_empty() {
            writeln!(f, "global attributes:")?;
            for (key, value) in &self.attributes {
                writeln!(f, "  {key}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_everything() {
        let summary = FileSummary {
            dimensions: vec![("time".into(), 3)],
            variables: vec![VariableSummary {
                name: "tx".into(),
                dims: vec!["time".into()],
                shape: vec![3],
                attributes: vec![("units".into(), "K".into())],
            }],
            attributes: vec![("title".into(), "TXx".into())],
        };
        let text = summary.to_string();
        assert!(text.contains("time = 3"));
        assert!(text.contains("tx(time) shape [3]"));
        assert!(text.contains("units: K"));
        assert!(text.contains("title: TXx"));
        assert!(summary.variable("tx").is_some());
        assert!(summary.variable("pr").is_none());
    }
}
