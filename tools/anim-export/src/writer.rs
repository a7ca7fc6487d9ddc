//! Document persistence

use anim_shared::Document;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::WriteError;
use crate::options::ExportOptions;

/// Encode `document` into `writer` using the configured formatting
pub fn write_json<W: Write>(
    writer: W,
    document: &Document,
    options: &ExportOptions,
) -> Result<(), WriteError> {
    if options.pretty {
        let indent = vec![b' '; options.indent];
        let mut serializer =
            Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
        document.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(writer, document)?;
    }
    Ok(())
}

/// Encode `document` to a string
pub fn to_json_string(document: &Document, options: &ExportOptions) -> Result<String, WriteError> {
    let mut buffer = Vec::new();
    write_json(&mut buffer, document, options)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write `document` to `path`, replacing any existing file
pub fn write_document(
    document: &Document,
    path: &Path,
    options: &ExportOptions,
) -> Result<(), WriteError> {
    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, document, options)?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
