use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::parse_blocks;
use crate::{Block, Error};

/// Read and decode every block of one input file.
pub fn read_hex_file(path: &Path) -> Result<Vec<Block>, Error> {
    let content = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_blocks(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `data` to a temporary file beside `path` and move it into place.
///
/// On any failure the destination is left untouched.
pub fn write_atomically(path: &Path, data: &[u8]) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(data).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
