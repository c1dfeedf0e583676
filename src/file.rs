//! Path-level wrappers around the in-memory codec.
//!
//! Output goes to a temporary file next to the destination and is renamed
//! into place only once fully written, so a failed run never leaves a
//! truncated container behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::container::{self, Separator};
use crate::error::{HuffmanError, Result};
use crate::stats::{CompressionReport, entropy_from_freq};
use crate::tree::count_frequencies;

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(HuffmanError::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}

fn temp_beside(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(NamedTempFile::new_in(dir)?)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!("Persisted {}", path.display());
    Ok(())
}

pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    separator: &Separator,
) -> Result<CompressionReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    ensure_exists(input)?;

    info!("Reading text file: {}", input.display());
    let text = fs::read_to_string(input)?;

    let tmp = temp_beside(output)?;
    let writer = container::write_container(&text, separator, BufWriter::new(tmp))?;
    let tmp = writer.into_inner().map_err(|e| e.into_error())?;
    persist(tmp, output)?;

    let freq = count_frequencies(&text);
    Ok(CompressionReport {
        plain_bytes: text.len() as u64,
        packed_bytes: fs::metadata(output)?.len(),
        distinct_symbols: freq.len(),
        entropy: entropy_from_freq(&freq),
    })
}

pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    separator: &Separator,
) -> Result<CompressionReport> {
    let (input, output) = (input.as_ref(), output.as_ref());
    ensure_exists(input)?;

    info!("Reading encoded file: {}", input.display());
    let file = File::open(input)?;
    let packed_bytes = file.metadata()?.len();
    let text = container::read_container(BufReader::new(file), separator)?;

    let mut tmp = temp_beside(output)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    persist(tmp, output)?;

    let freq = count_frequencies(&text);
    Ok(CompressionReport {
        plain_bytes: text.len() as u64,
        packed_bytes,
        distinct_symbols: freq.len(),
        entropy: entropy_from_freq(&freq),
    })
}
