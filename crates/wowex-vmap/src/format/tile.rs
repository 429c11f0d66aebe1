//! `.vmtile` tile spawn list

use crate::format::{
    VMAP_VERSION, Vec3, VmapFormat, read_count, read_magic, read_name, write_count, write_name,
};
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

const MAGIC: [u8; 4] = *b"VMTL";

/// Spawn with an empty name
const SPAWN_MIN_SIZE: u64 = 40;

/// One model instance placed on a tile
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpawn {
    /// Unique placement id
    pub id: u32,
    /// Placement flags, carried through unchanged
    pub flags: u32,
    /// World position
    pub position: Vec3,
    /// Euler rotation in degrees
    pub rotation: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Model file name, as written by the extractor
    pub name: String,
}

impl ModelSpawn {
    /// Model file name without the NUL terminator
    pub fn model_name(&self) -> &str {
        self.name.strip_suffix('\0').unwrap_or(&self.name)
    }
}

impl BinRead for ModelSpawn {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        Ok(Self {
            id: u32::read_le(reader)?,
            flags: u32::read_le(reader)?,
            position: Vec3::read_le(reader)?,
            rotation: Vec3::read_le(reader)?,
            scale: f32::read_le(reader)?,
            name: read_name(reader)?,
        })
    }
}

impl BinWrite for ModelSpawn {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.id.write_le(writer)?;
        self.flags.write_le(writer)?;
        self.position.write_le(writer)?;
        self.rotation.write_le(writer)?;
        self.scale.write_le(writer)?;
        write_name(writer, &self.name)
    }
}

/// Spawns placed on one tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileFile {
    /// Format version
    pub version: u32,
    /// Model placements
    pub spawns: Vec<ModelSpawn>,
}

impl TileFile {
    /// Tile file for the current version
    pub fn new(spawns: Vec<ModelSpawn>) -> Self {
        Self {
            version: VMAP_VERSION,
            spawns,
        }
    }
}

impl VmapFormat for TileFile {
    const KIND: &'static str = "vmtile";

    fn version(&self) -> u32 {
        self.version
    }
}

impl BinRead for TileFile {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        read_magic(reader, MAGIC)?;
        let version = u32::read_le(reader)?;
        let count = read_count(reader, SPAWN_MIN_SIZE)?;
        let mut spawns = Vec::with_capacity(count);
        for _ in 0..count {
            spawns.push(ModelSpawn::read_le(reader)?);
        }
        Ok(Self { version, spawns })
    }
}

impl BinWrite for TileFile {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        MAGIC.write_le(writer)?;
        self.version.write_le(writer)?;
        write_count(writer, self.spawns.len())?;
        for spawn in &self.spawns {
            spawn.write_le(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::VmapError;
    use pretty_assertions::assert_eq;

    fn spawn(id: u32, name: &str) -> ModelSpawn {
        ModelSpawn {
            id,
            flags: 0,
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, 90.0, 0.0),
            scale: 1.0,
            name: name.to_string(),
        }
    }

    #[test]
    fn tile_round_trip() {
        let tile = TileFile::new(vec![spawn(1, "Stormwind.wmo.vmo\0"), spawn(2, "Tree.m2.vmo")]);
        let bytes = tile.build().unwrap();
        assert_eq!(&bytes[..4], b"VMTL");
        assert_eq!(TileFile::parse(&bytes).unwrap(), tile);
    }

    #[test]
    fn model_name_drops_terminator() {
        assert_eq!(spawn(1, "Bridge.wmo.vmo\0").model_name(), "Bridge.wmo.vmo");
        assert_eq!(spawn(1, "Bridge.wmo.vmo").model_name(), "Bridge.wmo.vmo");
    }

    #[test]
    fn non_utf8_name_is_rejected() {
        let mut bytes = TileFile::new(vec![spawn(1, "ab")]).build().unwrap();
        let len = bytes.len();
        bytes[len - 1] = 0xFF;
        assert!(TileFile::parse(&bytes).is_err());
    }

    #[test]
    fn oversized_name_length_fails_without_allocating() {
        let mut bytes = TileFile::new(vec![spawn(1, "")]).build().unwrap();
        let len_at = bytes.len() - 4;
        bytes[len_at..].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        bytes.extend_from_slice(b"Stormwind.wmo.vmo\0");

        let err = TileFile::parse(&bytes).unwrap_err();
        assert!(matches!(err, VmapError::BinRw(binrw::Error::AssertFail { .. })));
    }

    #[test]
    fn spawn_count_beyond_file_is_rejected() {
        let mut bytes = TileFile::new(Vec::new()).build().unwrap();
        let len_at = bytes.len() - 4;
        bytes[len_at..].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(TileFile::parse(&bytes).is_err());
    }

    #[test]
    fn spawn_flags_survive_round_trip() {
        let mut placed = spawn(3, "Lamppost.m2.vmo");
        placed.flags = 0x5;
        let tile = TileFile::new(vec![placed]);
        let parsed = TileFile::parse(&tile.build().unwrap()).unwrap();
        assert_eq!(parsed.spawns[0].flags, 0x5);
    }
}
