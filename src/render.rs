//! Output rendering

use std::io::Write;

use serde::Serialize;

use crate::aggregator::ResultSet;
use crate::config::OutputFormat;
use crate::{Error, Result};

/// Serialize a result set, always ending with a newline
///
/// Serializer output is never trimmed: a YAML keep block (`|+`) carries its
/// trailing newlines as part of the value.
pub fn render(result: &ResultSet, format: OutputFormat) -> Result<String> {
    let mut out = match format {
        OutputFormat::Json => to_json(result)?,
        OutputFormat::Yaml => serde_yaml::to_string(result)
            .map_err(|e| Error::Render(format!("yaml: {}", e)))?,
    };

    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Write rendered output, reporting a closed pipe instead of panicking
pub fn write_output<W: Write>(mut out: W, rendered: &str) -> Result<()> {
    out.write_all(rendered.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| Error::Render(format!("failed to write output: {}", e)))
}

/// Pretty JSON with four-space indentation
fn to_json(result: &ResultSet) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    result
        .serialize(&mut serializer)
        .map_err(|e| Error::Render(format!("json: {}", e)))?;
    String::from_utf8(buf).map_err(|e| Error::Render(format!("json: {}", e)))
}
