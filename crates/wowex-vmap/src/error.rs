//! Error types for geometry files and the spatial resource manager

use thiserror::Error;

/// Errors raised while reading geometry files or loading tiles
#[derive(Error, Debug)]
pub enum VmapError {
    /// File was written by an incompatible extractor
    #[error("unsupported {kind} version {found} (expected {expected})")]
    UnsupportedVersion {
        /// File kind (`vmtree`, `vmtile`, `vmo`)
        kind: &'static str,
        /// Version found in the file
        found: u32,
        /// Version this crate reads
        expected: u32,
    },

    /// Tree lists geometry for a tile whose file is missing
    #[error("tile {x},{y} of map {map_id} is listed but has no tile file")]
    MissingTile {
        /// Map id
        map_id: u32,
        /// Tile column
        x: u32,
        /// Tile row
        y: u32,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `BinRW` parsing error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Type alias for geometry results
pub type Result<T> = std::result::Result<T, VmapError>;
