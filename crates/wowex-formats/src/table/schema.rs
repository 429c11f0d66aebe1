//! Record layouts driving the decoder

use crate::bits::MAX_FIELD_BITS;
use crate::table::error::{Result, TableError};
use serde::{Deserialize, Serialize};

/// How the raw bits of a field are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Unsigned integer
    UInt,
    /// Signed integer, sign-extended from the declared width
    Int,
    /// IEEE-754 single (must be 32 bits wide)
    Float,
    /// Byte offset into the string block
    String,
}

/// One column (or inline array of columns) in a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Width of one element in bits
    pub bits: u32,
    /// Interpretation of the bits
    pub kind: FieldKind,
    /// Number of inline elements, 1 for a scalar
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

impl FieldDef {
    /// Scalar field
    pub fn new(name: impl Into<String>, bits: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            bits,
            kind,
            count: 1,
        }
    }

    /// Unsigned integer field
    pub fn uint(name: impl Into<String>, bits: u32) -> Self {
        Self::new(name, bits, FieldKind::UInt)
    }

    /// Signed integer field
    pub fn int(name: impl Into<String>, bits: u32) -> Self {
        Self::new(name, bits, FieldKind::Int)
    }

    /// 32-bit float field
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, 32, FieldKind::Float)
    }

    /// 32-bit string reference field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, 32, FieldKind::String)
    }

    /// Turn the field into an inline array of `count` elements
    #[must_use]
    pub fn array(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Bits occupied by the whole field
    pub fn total_bits(&self) -> u64 {
        u64::from(self.bits) * u64::from(self.count)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Err(TableError::InvalidSchema(format!("{}: {reason}", self.name)));

        if self.count == 0 {
            return invalid("array count must be at least 1");
        }
        if self.bits == 0 || self.bits > MAX_FIELD_BITS {
            return invalid("width must be 1..=64 bits");
        }
        match self.kind {
            FieldKind::Float if self.bits != 32 => invalid("floats must be 32 bits"),
            FieldKind::String if self.bits > 32 => invalid("string offsets are at most 32 bits"),
            _ => Ok(()),
        }
    }
}

/// Ordered field list of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name, used in diagnostics
    pub name: String,
    /// Fields in storage order
    pub fields: Vec<FieldDef>,
    /// Index of the field holding the record id
    #[serde(default)]
    pub id_field: usize,
}

impl TableSchema {
    /// Schema whose first field is the record id
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
            id_field: 0,
        }
    }

    /// Use another field as the record id
    #[must_use]
    pub const fn with_id_field(mut self, index: usize) -> Self {
        self.id_field = index;
        self
    }

    /// Total bits one record needs
    pub fn record_bits(&self) -> u64 {
        self.fields.iter().map(FieldDef::total_bits).sum()
    }

    /// Number of columns, counting every inline array element
    pub fn column_count(&self) -> u32 {
        self.fields.iter().map(|f| f.count).sum()
    }

    /// Index of a field by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Check widths, kinds and the id field
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(TableError::InvalidSchema(format!("{}: no fields", self.name)));
        }
        for field in &self.fields {
            field.validate()?;
        }

        let Some(id) = self.fields.get(self.id_field) else {
            return Err(TableError::InvalidSchema(format!(
                "{}: id field index {} out of range",
                self.name, self.id_field
            )));
        };
        if !matches!(id.kind, FieldKind::UInt | FieldKind::Int) || id.count != 1 || id.bits > 32 {
            return Err(TableError::InvalidSchema(format!(
                "{}: id field {} must be a scalar integer of at most 32 bits",
                self.name, id.name
            )));
        }
        Ok(())
    }
}
