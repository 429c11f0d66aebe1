//! On-disk collision geometry formats
//!
//! Three little-endian file kinds are produced by the geometry extractor and
//! consumed by the spatial resource manager:
//!
//! | File | Magic | Contents |
//! |------|-------|----------|
//! | `{map:04}.vmtree` | `VMTR` | tiled flag and the tiles that carry geometry |
//! | `{map:04}_{x:02}_{y:02}.vmtile` | `VMTL` | model spawns placed on one tile |
//! | `*.vmo` | `VMOD` | one world model: groups, vertices, triangles |
//!
//! Every file starts with its magic and a `u32` version, currently
//! [`VMAP_VERSION`].

mod model;
mod tile;
mod tree;

pub use model::{ModelGroup, WorldModel};
pub use tile::{ModelSpawn, TileFile};
pub use tree::MapTreeFile;

use crate::error::{Result, VmapError};
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Version written into and expected from every geometry file
pub const VMAP_VERSION: u32 = 1;

/// Tile grid edge length
pub const TILES_PER_MAP: u32 = 64;

/// Parse and build support shared by the geometry files
pub trait VmapFormat: Sized + for<'a> BinRead<Args<'a> = ()> + for<'a> BinWrite<Args<'a> = ()> {
    /// Short file kind used in errors
    const KIND: &'static str;

    /// Version stored in this value
    fn version(&self) -> u32;

    /// Parse from bytes, rejecting foreign versions
    fn parse(data: &[u8]) -> Result<Self> {
        let parsed = Self::read_le(&mut Cursor::new(data))?;
        if parsed.version() != VMAP_VERSION {
            return Err(VmapError::UnsupportedVersion {
                kind: Self::KIND,
                found: parsed.version(),
                expected: VMAP_VERSION,
            });
        }
        Ok(parsed)
    }

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_le(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Read and parse a file
    fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Build and write a file
    fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.build()?)?;
        Ok(())
    }
}

/// Name of the tree file for a map
pub fn tree_file_name(map_id: u32) -> String {
    format!("{map_id:04}.vmtree")
}

/// Name of the tile file for a map tile
pub fn tile_file_name(map_id: u32, tile: TileCoord) -> String {
    format!("{map_id:04}_{:02}_{:02}.vmtile", tile.x, tile.y)
}

/// Point or direction in model space
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq)]
#[brw(little)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Create a vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned bounding box
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq)]
#[brw(little)]
pub struct BoundingBox {
    /// Lower corner
    pub min: Vec3,
    /// Upper corner
    pub max: Vec3,
}

impl BoundingBox {
    /// Smallest box containing every point, `None` for no points
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            bounds.min = Vec3::new(bounds.min.x.min(p.x), bounds.min.y.min(p.y), bounds.min.z.min(p.z));
            bounds.max = Vec3::new(bounds.max.x.max(p.x), bounds.max.y.max(p.y), bounds.max.z.max(p.z));
        }
        Some(bounds)
    }

    /// Smallest box containing both boxes
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Whether a point lies inside or on the box
    pub fn contains(&self, p: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// Tile coordinates on the 64x64 map grid
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[brw(little)]
pub struct TileCoord {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl TileCoord {
    /// Slot holding the geometry of non-tiled maps
    pub const GLOBAL: Self = Self {
        x: TILES_PER_MAP,
        y: TILES_PER_MAP,
    };

    /// Create tile coordinates
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

pub(crate) fn read_magic<R: Read + Seek>(reader: &mut R, expected: [u8; 4]) -> BinResult<()> {
    let pos = reader.stream_position()?;
    let magic = <[u8; 4]>::read_le(reader)?;
    if magic != expected {
        return Err(binrw::Error::BadMagic {
            pos,
            found: Box::new(magic),
        });
    }
    Ok(())
}

/// Bytes left between the reader position and the end of the stream
fn remaining<R: Read + Seek>(reader: &mut R) -> BinResult<u64> {
    let pos = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(pos))?;
    Ok(end.saturating_sub(pos))
}

/// Element count of a list whose entries take at least `min_size` bytes each
///
/// Counts the remaining stream cannot hold are rejected before anything is
/// allocated for them.
pub(crate) fn read_count<R: Read + Seek>(reader: &mut R, min_size: u64) -> BinResult<usize> {
    let pos = reader.stream_position()?;
    let count = u32::read_le(reader)?;
    let available = remaining(reader)?;
    if u64::from(count) * min_size > available {
        return Err(binrw::Error::AssertFail {
            pos,
            message: format!(
                "count {count} of {min_size}-byte entries exceeds the {available} bytes left"
            ),
        });
    }
    Ok(count as usize)
}

pub(crate) fn write_count<W: Write + Seek>(writer: &mut W, len: usize) -> BinResult<()> {
    let pos = writer.stream_position()?;
    let count = u32::try_from(len).map_err(|e| binrw::Error::Custom {
        pos,
        err: Box::new(e),
    })?;
    count.write_le(writer)
}

/// Length-prefixed name, kept byte for byte (including a trailing NUL)
pub(crate) fn read_name<R: Read + Seek>(reader: &mut R) -> BinResult<String> {
    let len = read_count(reader, 1)?;
    let pos = reader.stream_position()?;
    let mut bytes = Vec::with_capacity(len);
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(binrw::Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    String::from_utf8(bytes).map_err(|e| binrw::Error::Custom {
        pos,
        err: Box::new(e),
    })
}

pub(crate) fn write_name<W: Write + Seek>(writer: &mut W, name: &str) -> BinResult<()> {
    write_count(writer, name.len())?;
    writer.write_all(name.as_bytes())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(tree_file_name(1), "0001.vmtree");
        assert_eq!(tile_file_name(530, TileCoord::new(3, 45)), "0530_03_45.vmtile");
        assert_eq!(tile_file_name(33, TileCoord::GLOBAL), "0033_64_64.vmtile");
    }

    #[test]
    fn bounds_from_points() {
        let bounds = BoundingBox::from_points(&[
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.5),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(bounds.max, Vec3::new(1.0, 4.0, 3.0));
        assert!(bounds.contains(Vec3::new(0.0, 0.0, 1.0)));
        assert!(!bounds.contains(Vec3::new(0.0, 5.0, 1.0)));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn merge_covers_both() {
        let a = BoundingBox {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        let b = BoundingBox {
            min: Vec3::new(-1.0, 0.5, 0.5),
            max: Vec3::new(0.5, 2.0, 0.5),
        };
        let m = a.merge(&b);
        assert_eq!(m.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(m.max, Vec3::new(1.0, 2.0, 1.0));
    }
}
