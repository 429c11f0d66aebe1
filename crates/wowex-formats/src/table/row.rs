//! Typed views over decoded records

use crate::table::decoder::decode_table;
use crate::table::error::Result;
use crate::table::schema::{FieldDef, TableSchema};
use crate::table::value::TableRecord;
use std::collections::BTreeMap;

/// A table whose records convert into a concrete Rust type
pub trait TableRow: Sized {
    /// Layout of one record
    fn schema() -> TableSchema;

    /// Convert a decoded record
    fn from_record(record: &TableRecord) -> Result<Self>;
}

/// Decode a payload straight into typed rows keyed by id
pub fn decode_rows<T: TableRow>(payload: &[u8]) -> Result<BTreeMap<u32, T>> {
    let table = decode_table(payload, &T::schema())?;
    table
        .records
        .iter()
        .map(|(&id, record)| Ok((id, T::from_record(record)?)))
        .collect()
}

/// Row of the map table, reduced to what the map relation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRow {
    /// Map id
    pub id: u32,
    /// Directory name under `World/Maps`
    pub directory: String,
    /// Instance type (0 = continent)
    pub instance_type: u32,
    /// Map flags
    pub flags: u32,
    /// Parent map id, -1 for top-level maps
    pub parent_map_id: i32,
}

impl MapRow {
    /// Parent map, if this map has one
    pub fn parent(&self) -> Option<u32> {
        u32::try_from(self.parent_map_id).ok()
    }
}

impl TableRow for MapRow {
    fn schema() -> TableSchema {
        TableSchema::new(
            "Map",
            vec![
                FieldDef::uint("ID", 32),
                FieldDef::string("Directory"),
                FieldDef::uint("InstanceType", 32),
                FieldDef::uint("Flags", 32),
                FieldDef::int("ParentMapID", 32),
            ],
        )
    }

    fn from_record(record: &TableRecord) -> Result<Self> {
        Ok(Self {
            id: record.id,
            directory: record.string(1)?.to_string(),
            instance_type: record.uint(2)? as u32,
            flags: record.uint(3)? as u32,
            parent_map_id: record.int(4)? as i32,
        })
    }
}
