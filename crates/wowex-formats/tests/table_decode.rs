//! Table decoding against synthetic bit-packed payloads

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use common::{BitWriter, StringBlock, wdbc};
use pretty_assertions::assert_eq;
use wowex_formats::table::{
    FieldDef, FieldValue, MapRow, TableError, TableSchema, decode_rows, decode_table,
};

const RECORD_SIZE: u32 = 14;

fn packed_schema() -> TableSchema {
    TableSchema::new(
        "CreatureSample",
        vec![
            FieldDef::uint("ID", 17),
            FieldDef::int("LevelDelta", 7),
            FieldDef::float("Scale"),
            FieldDef::uint("Coords", 10).array(3),
            FieldDef::new("Name", 20, wowex_formats::FieldKind::String),
        ],
    )
}

fn packed_payload(count: u32) -> (Vec<u8>, Vec<(u32, i64, f32, [u64; 3], String)>) {
    let mut strings = StringBlock::new();
    let mut records = Vec::new();
    let mut expected = Vec::new();

    for n in 0..count {
        let id = 100_000 + n * 3;
        let delta = i64::from(n as i32 % 5) - 2;
        let scale = 0.5 + n as f32;
        let coords = [u64::from(n), u64::from(n) * 2 + 1, 1023 - u64::from(n)];
        let name = format!("creature_{n}");

        let mut writer = BitWriter::default();
        writer.push(u64::from(id), 17);
        writer.push(delta as u64 & 0x7f, 7);
        writer.push(u64::from(scale.to_bits()), 32);
        for c in coords {
            writer.push(c, 10);
        }
        writer.push(u64::from(strings.add(&name)), 20);
        records.push(writer.finish(RECORD_SIZE as usize));

        expected.push((id, delta, scale, coords, name));
    }

    (wdbc(7, RECORD_SIZE, &records, strings.bytes()), expected)
}

#[test]
fn decodes_declared_record_count_with_unique_ids() {
    let (payload, expected) = packed_payload(25);
    let table = decode_table(&payload, &packed_schema()).unwrap();

    assert_eq!(table.len(), 25);
    for (id, delta, scale, coords, name) in expected {
        let record = table.get(id).unwrap_or_else(|| panic!("missing record {id}"));
        assert_eq!(record.id, id);
        assert_eq!(record.values[1], FieldValue::Int(delta));
        assert_eq!(record.values[2], FieldValue::Float(scale));
        assert_eq!(
            record.values[3],
            FieldValue::Array(coords.iter().map(|&c| FieldValue::UInt(c)).collect())
        );
        assert_eq!(table.value(id, "Name").and_then(FieldValue::as_str), Some(name.as_str()));
    }
}

#[test]
fn empty_table_decodes_to_empty_mapping() {
    let payload = wdbc(7, RECORD_SIZE, &[], b"\0");
    let table = decode_table(&payload, &packed_schema()).unwrap();
    assert!(table.is_empty());
}

#[test]
fn schema_wider_than_record_is_rejected() {
    let (payload, _) = packed_payload(2);
    let mut schema = packed_schema();
    schema.fields.push(FieldDef::uint("Extra", 8));
    // One more column in the schema than in the header
    assert!(matches!(
        decode_table(&payload, &schema),
        Err(TableError::FieldCountMismatch { schema: 8, header: 7 })
    ));

    // Matching column count but too many bits for a 14-byte record
    let mut schema = packed_schema();
    schema.fields[4].bits = 32;
    schema.fields[1].bits = 7 + 64 - 32;
    assert!(matches!(
        decode_table(&payload, &schema),
        Err(TableError::SchemaExceedsRecord { .. })
    ));
}

#[test]
fn truncated_record_region_is_rejected() {
    let (mut payload, _) = packed_payload(3);
    // Claim one more record than is present
    payload[4..8].copy_from_slice(&4u32.to_le_bytes());
    assert!(matches!(
        decode_table(&payload, &packed_schema()),
        Err(TableError::LengthMismatch { .. })
    ));
}

#[test]
fn bad_string_reference_is_rejected() {
    let mut writer = BitWriter::default();
    writer.push(1, 17);
    writer.push(0, 7);
    writer.push(0, 32);
    writer.push(0, 30);
    writer.push(500, 20);
    let payload = wdbc(7, RECORD_SIZE, &[writer.finish(RECORD_SIZE as usize)], b"\0");
    assert!(matches!(
        decode_table(&payload, &packed_schema()),
        Err(TableError::StringOutOfBounds { offset: 500, .. })
    ));
}

#[test]
fn map_rows_convert_to_typed_values() {
    let mut strings = StringBlock::new();
    let rows = [
        (0u32, "Azeroth", 0u32, 0u32, -1i32),
        (1, "Kalimdor", 0, 0, -1),
        (571, "Northrend", 0, 0, -1),
        (4000, "AzerothScenario", 1, 2, 0),
    ];

    let records: Vec<Vec<u8>> = rows
        .iter()
        .map(|&(id, dir, instance_type, flags, parent)| {
            let mut writer = BitWriter::default();
            writer.push(u64::from(id), 32);
            writer.push(u64::from(strings.add(dir)), 32);
            writer.push(u64::from(instance_type), 32);
            writer.push(u64::from(flags), 32);
            writer.push(u64::from(parent as u32), 32);
            writer.finish(20)
        })
        .collect();
    let payload = wdbc(5, 20, &records, strings.bytes());

    let maps = decode_rows::<MapRow>(&payload).unwrap();
    assert_eq!(maps.len(), 4);
    assert_eq!(maps[&571].directory, "Northrend");
    assert_eq!(maps[&0].parent(), None);
    assert_eq!(maps[&4000].parent(), Some(0));
    assert_eq!(maps[&4000].instance_type, 1);
}
