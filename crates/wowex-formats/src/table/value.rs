//! Decoded field values and records

use crate::table::error::{Result, TableError};
use crate::table::schema::TableSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// Value of one decoded field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Unsigned integer
    UInt(u64),
    /// Signed integer
    Int(i64),
    /// Single-precision float
    Float(f32),
    /// Resolved string
    String(String),
    /// Inline array
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Integer value as unsigned, if it is an integer
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::UInt(v) => Some(v),
            Self::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Integer value as signed, if it is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Float value
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Array elements
    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// One decoded row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRecord {
    /// Record identifier
    pub id: u32,
    /// Field values in schema order
    pub values: Vec<FieldValue>,
}

impl TableRecord {
    /// Value at a field index
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    /// Unsigned integer at `index`
    pub fn uint(&self, index: usize) -> Result<u64> {
        self.get(index)
            .and_then(FieldValue::as_u64)
            .ok_or(TableError::TypeMismatch {
                index,
                expected: "an unsigned integer",
            })
    }

    /// Signed integer at `index`
    pub fn int(&self, index: usize) -> Result<i64> {
        self.get(index)
            .and_then(FieldValue::as_i64)
            .ok_or(TableError::TypeMismatch {
                index,
                expected: "a signed integer",
            })
    }

    /// Float at `index`
    pub fn float(&self, index: usize) -> Result<f32> {
        self.get(index)
            .and_then(FieldValue::as_f32)
            .ok_or(TableError::TypeMismatch {
                index,
                expected: "a float",
            })
    }

    /// String at `index`
    pub fn string(&self, index: usize) -> Result<&str> {
        self.get(index)
            .and_then(FieldValue::as_str)
            .ok_or(TableError::TypeMismatch {
                index,
                expected: "a string",
            })
    }
}

/// Result of decoding one payload: records keyed by id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedTable {
    /// Schema used for decoding
    #[serde(skip)]
    pub schema: TableSchema,
    /// Records keyed by id
    pub records: BTreeMap<u32, TableRecord>,
}

impl DecodedTable {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record by id
    pub fn get(&self, id: u32) -> Option<&TableRecord> {
        self.records.get(&id)
    }

    /// Named field of a record
    pub fn value(&self, id: u32, field: &str) -> Option<&FieldValue> {
        let index = self.schema.field_index(field)?;
        self.get(id)?.get(index)
    }

    /// Records in id order
    pub fn iter(&self) -> impl Iterator<Item = &TableRecord> {
        self.records.values()
    }
}
