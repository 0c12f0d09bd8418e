//! Binary persistence: a fixed header followed by a `bincode`-encoded node stream (§6
//! "Persistence format").

use std::io::Write;

use flann_distances::{Distance, Metric, Number};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{FlannError, Result};
use crate::index::{Index, Variant};

const MAGIC: [u8; 11] = *b"FLANN_INDEX";
const FORMAT_VERSION_MAJOR: u16 = 1;
const FORMAT_VERSION_MINOR: u16 = 0;

/// The fixed-size portion of a persisted index, written before the node stream.
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    magic: [u8; 11],
    version_major: u16,
    version_minor: u16,
    element_type: String,
    algorithm: String,
    rows: usize,
    cols: usize,
    seed: u64,
}

/// Writes `index` to `path`: a `bincode`-encoded [`Header`] followed by the `bincode` encoding of
/// its variant (already in pre-order, since the arena's node `Vec` is pre-order by construction,
/// §4.1).
///
/// # Errors
///
/// Returns [`FlannError::IoFailure`] if `path` cannot be created or written, or
/// [`FlannError::Codec`] if encoding fails.
pub fn save_index<T>(index: &Index<'_, T>, path: &std::path::Path) -> Result<()>
where
    T: Number,
    Distance: Metric<T>,
{
    let header = Header {
        magic: MAGIC,
        version_major: FORMAT_VERSION_MAJOR,
        version_minor: FORMAT_VERSION_MINOR,
        element_type: std::any::type_name::<T>().to_string(),
        algorithm: index.algorithm_tag().to_string(),
        rows: index.rows(),
        cols: index.cols(),
        seed: index.seed(),
    };

    let mut file = std::fs::File::create(path)?;
    bincode::serialize_into(&mut file, &header)?;
    bincode::serialize_into(&mut file, index.distance())?;
    bincode::serialize_into(&mut file, index.variant())?;
    file.flush()?;
    Ok(())
}

/// Loads an index previously written by [`save_index`], pairing it with `dataset` (§6
/// `load_index`).
///
/// # Errors
///
/// Returns [`FlannError::CorruptHeader`] if the magic doesn't match, the element type doesn't
/// match `T`, or the major version differs; a minor-version mismatch is only logged. Returns
/// [`FlannError::DimensionMismatch`] if `dataset.cols()` doesn't match the header, and
/// [`FlannError::IoFailure`]/[`FlannError::Codec`] for read/decode failures.
pub fn load_index<'a, T>(path: &std::path::Path, dataset: Dataset<'a, T>) -> Result<Index<'a, T>>
where
    T: Number,
    Distance: Metric<T>,
{
    let mut file = std::fs::File::open(path)?;
    let header: Header = bincode::deserialize_from(&mut file)?;

    if header.magic != MAGIC {
        return Err(FlannError::CorruptHeader {
            reason: "magic bytes do not match \"FLANN_INDEX\"".to_string(),
        });
    }
    if header.version_major != FORMAT_VERSION_MAJOR {
        return Err(FlannError::CorruptHeader {
            reason: format!("incompatible major version {} (expected {FORMAT_VERSION_MAJOR})", header.version_major),
        });
    }
    if header.version_minor != FORMAT_VERSION_MINOR {
        mt_logger::mt_log!(
            mt_logger::Level::Warn,
            "loading index written with minor version {} (running {})",
            header.version_minor,
            FORMAT_VERSION_MINOR
        );
    }
    let expected_type = std::any::type_name::<T>();
    if header.element_type != expected_type {
        return Err(FlannError::CorruptHeader {
            reason: format!("element type mismatch: header has {}, loading as {expected_type}", header.element_type),
        });
    }
    if header.cols != dataset.cols() {
        return Err(FlannError::DimensionMismatch {
            expected: header.cols,
            found: dataset.cols(),
        });
    }

    let distance: Distance = bincode::deserialize_from(&mut file)?;
    let variant: Variant = bincode::deserialize_from(&mut file)?;

    Ok(Index::from_variant(dataset, distance, variant, header.seed))
}
