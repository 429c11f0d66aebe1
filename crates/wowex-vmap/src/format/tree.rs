//! `.vmtree` map tree file

use crate::format::{TileCoord, VMAP_VERSION, VmapFormat, read_count, read_magic, write_count};
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

const MAGIC: [u8; 4] = *b"VMTR";

/// Per-map tree: whether the map is tiled and which tiles carry geometry
///
/// Layout: magic, version, `u8` tiled flag, `u32` tile count, then
/// `(x, y)` pairs. Non-tiled maps list [`TileCoord::GLOBAL`] when they
/// have geometry at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTreeFile {
    /// Format version
    pub version: u32,
    /// Whether geometry is split across the tile grid
    pub tiled: bool,
    /// Tiles with a `.vmtile` file
    pub tiles: Vec<TileCoord>,
}

impl MapTreeFile {
    /// Tree for a tiled map
    pub fn tiled(tiles: Vec<TileCoord>) -> Self {
        Self {
            version: VMAP_VERSION,
            tiled: true,
            tiles,
        }
    }

    /// Tree for a map with one global tile
    pub fn global(has_geometry: bool) -> Self {
        Self {
            version: VMAP_VERSION,
            tiled: false,
            tiles: if has_geometry {
                vec![TileCoord::GLOBAL]
            } else {
                Vec::new()
            },
        }
    }
}

impl VmapFormat for MapTreeFile {
    const KIND: &'static str = "vmtree";

    fn version(&self) -> u32 {
        self.version
    }
}

impl BinRead for MapTreeFile {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        read_magic(reader, MAGIC)?;
        let version = u32::read_le(reader)?;
        let tiled = u8::read_le(reader)? != 0;
        let count = read_count(reader, 8)?;
        let mut tiles = Vec::with_capacity(count);
        for _ in 0..count {
            tiles.push(TileCoord::read_le(reader)?);
        }
        Ok(Self {
            version,
            tiled,
            tiles,
        })
    }
}

impl BinWrite for MapTreeFile {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        MAGIC.write_le(writer)?;
        self.version.write_le(writer)?;
        u8::from(self.tiled).write_le(writer)?;
        write_count(writer, self.tiles.len())?;
        for tile in &self.tiles {
            tile.write_le(writer)?;
        }
        Ok(())
    }
}
