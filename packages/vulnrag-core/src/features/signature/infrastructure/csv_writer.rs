//! Signature CSV output

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::features::signature::domain::{Signature, SIGNATURE_COLUMNS};
use crate::shared::utils::csv;

/// Write a header row followed by one row per signature
pub fn write_csv<W: Write>(mut writer: W, signatures: &[Signature]) -> io::Result<()> {
    writeln!(writer, "{}", SIGNATURE_COLUMNS.join(","))?;
    for signature in signatures {
        writeln!(writer, "{}", csv::row(signature.values()))?;
    }
    writer.flush()
}

/// Write signatures to `path`, creating parent directories
pub fn write_csv_file(path: &Path, signatures: &[Signature]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(BufWriter::new(File::create(path)?), signatures)?;
    info!(path = %path.display(), rows = signatures.len(), "wrote signature CSV");
    Ok(())
}
