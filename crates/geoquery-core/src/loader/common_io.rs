// crates/geoquery-core/src/loader/common_io.rs
use crate::error::{GeoError, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl CompressionMode {
    /// Gzip when the `compact` feature is on.
    pub fn preferred() -> Self {
        #[cfg(feature = "compact")]
        {
            CompressionMode::Gzip
        }
        #[cfg(not(feature = "compact"))]
        {
            CompressionMode::None
        }
    }
}

/// Opens a file, buffers it, and transparently gunzips it when the content
/// starts with the gzip magic bytes.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    let mut reader = BufReader::new(file);
    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if !gzipped {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(GeoError::InvalidData(format!(
            "{} is gzip-compressed but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

/// `cities.json` -> `cities.json.<suffix>`, next to the source.
pub fn get_cache_path(source: &Path, suffix: &str) -> PathBuf {
    let mut name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    source.with_file_name(name)
}

/// A cache is fresh when it exists and is not older than its source.
pub fn is_cache_fresh(source: &Path, cache: &Path) -> bool {
    let cache_time = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(source_time) => source_time <= cache_time,
        // cache without a source is still usable
        Err(_) => true,
    }
}

/// Writes any serializable value to disk with bincode.
///
/// Returns only once the gzip trailer (if any) and the buffered tail have
/// reached the file, so an `Ok` snapshot is always complete.
pub fn write_generic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    compression: CompressionMode,
) -> Result<()> {
    let file = File::create(path)?;
    let writer = encode_into(BufWriter::new(file), value, compression)?;
    writer.into_inner().map_err(|e| e.into_error())?;
    Ok(())
}

/// Bincode-encodes `value` into `writer`, finishing the gzip stream when
/// compressing, and hands the writer back.
pub fn encode_into<W: Write, T: Serialize + ?Sized>(
    mut writer: W,
    value: &T,
    compression: CompressionMode,
) -> Result<W> {
    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode::serialize_into(&mut encoder, value)?;
                Ok(encoder.finish()?)
            }
            #[cfg(not(feature = "compact"))]
            {
                Err(GeoError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ))
            }
        }
        CompressionMode::None => {
            bincode::serialize_into(&mut writer, value)?;
            Ok(writer)
        }
    }
}
