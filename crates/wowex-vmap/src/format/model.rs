//! `.vmo` world model

use crate::format::{
    BoundingBox, VMAP_VERSION, Vec3, VmapFormat, read_count, read_magic, write_count,
};
use binrw::{BinRead, BinResult, BinWrite};
use std::io::{Read, Seek, Write};

const MAGIC: [u8; 4] = *b"VMOD";

/// Bounds, flags, group id and both list counts
const GROUP_MIN_SIZE: u64 = 40;

/// One group of a world model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    /// Group bounds
    pub bounds: BoundingBox,
    /// Group flags from the source model
    pub flags: u32,
    /// Group id used for area lookups
    pub group_wmo_id: u32,
    /// Collision vertices
    pub vertices: Vec<Vec3>,
    /// Triangles as vertex indices
    pub triangles: Vec<[u32; 3]>,
}

impl ModelGroup {
    /// Group whose bounds are derived from its vertices
    pub fn new(flags: u32, group_wmo_id: u32, vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            bounds: BoundingBox::from_points(&vertices).unwrap_or_default(),
            flags,
            group_wmo_id,
            vertices,
            triangles,
        }
    }

    /// Whether every triangle index refers to an existing vertex
    pub fn indices_valid(&self) -> bool {
        let n = self.vertices.len();
        self.triangles
            .iter()
            .all(|tri| tri.iter().all(|&i| (i as usize) < n))
    }
}

impl BinRead for ModelGroup {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let bounds = BoundingBox::read_le(reader)?;
        let flags = u32::read_le(reader)?;
        let group_wmo_id = u32::read_le(reader)?;

        let vertex_count = read_count(reader, 12)?;
        let mut vertices = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            vertices.push(Vec3::read_le(reader)?);
        }

        let triangle_count = read_count(reader, 12)?;
        let mut triangles = Vec::with_capacity(triangle_count);
        for _ in 0..triangle_count {
            triangles.push(<[u32; 3]>::read_le(reader)?);
        }

        Ok(Self {
            bounds,
            flags,
            group_wmo_id,
            vertices,
            triangles,
        })
    }
}

impl BinWrite for ModelGroup {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.bounds.write_le(writer)?;
        self.flags.write_le(writer)?;
        self.group_wmo_id.write_le(writer)?;
        write_count(writer, self.vertices.len())?;
        for v in &self.vertices {
            v.write_le(writer)?;
        }
        write_count(writer, self.triangles.len())?;
        for tri in &self.triangles {
            tri.write_le(writer)?;
        }
        Ok(())
    }
}

/// Collision geometry of one world model
#[derive(Debug, Clone, PartialEq)]
pub struct WorldModel {
    /// Format version
    pub version: u32,
    /// Id of the root model
    pub root_wmo_id: u32,
    /// Model groups
    pub groups: Vec<ModelGroup>,
}

impl WorldModel {
    /// World model for the current version
    pub fn new(root_wmo_id: u32, groups: Vec<ModelGroup>) -> Self {
        Self {
            version: VMAP_VERSION,
            root_wmo_id,
            groups,
        }
    }

    /// Bounds of all groups
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.groups
            .iter()
            .map(|g| g.bounds)
            .reduce(|a, b| a.merge(&b))
    }

    /// Total vertices across groups
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(|g| g.vertices.len()).sum()
    }

    /// Total triangles across groups
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangles.len()).sum()
    }
}

impl VmapFormat for WorldModel {
    const KIND: &'static str = "vmo";

    fn version(&self) -> u32 {
        self.version
    }
}

impl BinRead for WorldModel {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        read_magic(reader, MAGIC)?;
        let version = u32::read_le(reader)?;
        let root_wmo_id = u32::read_le(reader)?;
        let count = read_count(reader, GROUP_MIN_SIZE)?;
        let mut groups = Vec::with_capacity(count);
        for _ in 0..count {
            let pos = reader.stream_position()?;
            let group = ModelGroup::read_le(reader)?;
            if !group.indices_valid() {
                return Err(binrw::Error::AssertFail {
                    pos,
                    message: "triangle index outside vertex list".to_string(),
                });
            }
            groups.push(group);
        }
        Ok(Self {
            version,
            root_wmo_id,
            groups,
        })
    }
}

impl BinWrite for WorldModel {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        MAGIC.write_le(writer)?;
        self.version.write_le(writer)?;
        self.root_wmo_id.write_le(writer)?;
        write_count(writer, self.groups.len())?;
        for group in &self.groups {
            group.write_le(writer)?;
        }
        Ok(())
    }
}
