//! Schema-driven record decoding

use crate::bits::BitCursor;
use crate::table::error::{Result, TableError};
use crate::table::header::TableHeader;
use crate::table::schema::{FieldDef, FieldKind, TableSchema};
use crate::table::value::{DecodedTable, FieldValue, TableRecord};
use binrw::BinRead;
use binrw::io::Cursor;
use std::collections::BTreeMap;
use tracing::debug;

/// Decode a `WDBC` payload into records keyed by id
///
/// Every record slot is walked field by field with a [`BitCursor`] confined
/// to that slot, so a schema that reads too far fails instead of spilling
/// into the next record.
///
/// # Errors
///
/// Fails without returning partial results when the header disagrees with
/// the payload length or the schema, when a field overruns its record, when
/// a string reference is out of range, or when an id repeats.
pub fn decode_table(payload: &[u8], schema: &TableSchema) -> Result<DecodedTable> {
    schema.validate()?;

    if payload.len() < TableHeader::SIZE {
        return Err(TableError::Truncated(payload.len()));
    }
    let header = TableHeader::read(&mut Cursor::new(payload))?;

    let actual = payload.len() as u64;
    if header.expected_len() != actual {
        return Err(TableError::LengthMismatch {
            expected: header.expected_len(),
            actual,
        });
    }
    if schema.column_count() != header.field_count {
        return Err(TableError::FieldCountMismatch {
            schema: schema.column_count(),
            header: header.field_count,
        });
    }
    let record_bits = u64::from(header.record_size) * 8;
    if schema.record_bits() > record_bits {
        return Err(TableError::SchemaExceedsRecord {
            schema_bits: schema.record_bits(),
            record_bits,
        });
    }

    // Lengths were checked against the payload above, so these fit in usize.
    let record_size = header.record_size as usize;
    let strings = &payload[header.string_block_offset() as usize..];

    let mut records = BTreeMap::new();
    for slot in 0..header.record_count as usize {
        let start = header.records_offset() + slot * record_size;
        let mut cursor = BitCursor::new(&payload[..start + record_size], start);
        let record = decode_record(&mut cursor, schema, strings)?;
        let id = record.id;
        if records.insert(id, record).is_some() {
            return Err(TableError::DuplicateId(id));
        }
    }

    debug!(
        "Decoded table {}: {} records, {} bytes of strings",
        schema.name,
        records.len(),
        strings.len()
    );

    Ok(DecodedTable {
        schema: schema.clone(),
        records,
    })
}

fn decode_record(cursor: &mut BitCursor<'_>, schema: &TableSchema, strings: &[u8]) -> Result<TableRecord> {
    let mut values = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let value = if field.count == 1 {
            decode_value(cursor, field, strings)?
        } else {
            let mut elements = Vec::with_capacity(field.count as usize);
            for _ in 0..field.count {
                elements.push(decode_value(cursor, field, strings)?);
            }
            FieldValue::Array(elements)
        };
        values.push(value);
    }

    // validate() guarantees a scalar integer id of at most 32 bits
    let id = match &values[schema.id_field] {
        FieldValue::UInt(v) => *v as u32,
        FieldValue::Int(v) => *v as u32,
        _ => {
            return Err(TableError::InvalidSchema(format!(
                "{}: id field is not an integer",
                schema.name
            )));
        }
    };

    Ok(TableRecord { id, values })
}

fn decode_value(cursor: &mut BitCursor<'_>, field: &FieldDef, strings: &[u8]) -> Result<FieldValue> {
    let raw = cursor.read_raw(field.bits)?;
    Ok(match field.kind {
        FieldKind::UInt => FieldValue::UInt(raw.as_u64()),
        FieldKind::Int => FieldValue::Int(raw.as_i64()),
        FieldKind::Float => FieldValue::Float(raw.as_f32()),
        FieldKind::String => FieldValue::String(resolve_string(strings, raw.as_u32())?),
    })
}

/// Read the NUL-terminated string starting at `offset`
fn resolve_string(strings: &[u8], offset: u32) -> Result<String> {
    let start = offset as usize;
    let Some(tail) = strings.get(start..).filter(|tail| !tail.is_empty()) else {
        return Err(TableError::StringOutOfBounds {
            offset,
            size: strings.len(),
        });
    };
    let Some(len) = tail.iter().position(|&b| b == 0) else {
        return Err(TableError::UnterminatedString(offset));
    };
    Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
}
