//! Root file parsing across the on-disk layouts

#![allow(clippy::expect_used, clippy::unwrap_used)]

use wowex_formats::root::{ContentFlags, LocaleFlags, RootError, RootIndex};
use wowex_hash::{ContentKey, hash_path};

fn key(byte: u8) -> ContentKey {
    ContentKey::from_bytes([byte; 16])
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Legacy block: header, deltas, interleaved (ckey, hash)
fn legacy_block(out: &mut Vec<u8>, locale: LocaleFlags, flags: u32, files: &[(i32, u8, &str)]) {
    push_u32(out, files.len() as u32);
    push_u32(out, flags);
    push_u32(out, locale.bits());
    for &(delta, _, _) in files {
        out.extend_from_slice(&delta.to_le_bytes());
    }
    for &(_, k, path) in files {
        out.extend_from_slice(key(k).as_bytes());
        out.extend_from_slice(&hash_path(path).to_le_bytes());
    }
}

#[test]
fn legacy_layout_resolves_per_locale() {
    let mut data = Vec::new();
    legacy_block(
        &mut data,
        LocaleFlags::ENUS | LocaleFlags::ENGB,
        0,
        &[(100, 1, "DBFilesClient/Map.dbc"), (0, 2, "DBFilesClient/Spell.dbc")],
    );
    legacy_block(&mut data, LocaleFlags::KOKR, 0, &[(100, 3, "DBFilesClient/Map.dbc")]);

    let index = RootIndex::parse(&data).unwrap();
    assert_eq!(index.len(), 3);

    let english = index.lookup("DBFilesClient\\Map.dbc", LocaleFlags::ENUS).unwrap();
    assert_eq!(english.content_key, key(1));
    assert_eq!(english.file_data_id, 100);

    let spell = index.lookup("dbfilesclient/spell.dbc", LocaleFlags::ENGB).unwrap();
    assert_eq!(spell.file_data_id, 101);

    let korean = index.lookup("DBFilesClient/Map.dbc", LocaleFlags::KOKR).unwrap();
    assert_eq!(korean.content_key, key(3));

    let err = index.lookup("DBFilesClient/Map.dbc", LocaleFlags::FRFR).unwrap_err();
    assert!(matches!(err, RootError::NotForLocale { .. }));
}

#[test]
fn manifest_layout_with_unnamed_block() {
    let mut data = b"TSFM".to_vec();
    push_u32(&mut data, 3); // total files
    push_u32(&mut data, 1); // named files

    // Named block
    push_u32(&mut data, 1);
    push_u32(&mut data, ContentFlags::INSTALL as u32);
    push_u32(&mut data, LocaleFlags::ALL.bits());
    data.extend_from_slice(&5i32.to_le_bytes());
    data.extend_from_slice(key(9).as_bytes());
    data.extend_from_slice(&hash_path("Fonts/ARIALN.TTF").to_le_bytes());

    // Unnamed block: two FileDataIDs, no name hashes
    push_u32(&mut data, 2);
    push_u32(&mut data, ContentFlags::NO_NAME_HASH as u32);
    push_u32(&mut data, LocaleFlags::DEDE.bits());
    data.extend_from_slice(&1000i32.to_le_bytes());
    data.extend_from_slice(&4i32.to_le_bytes());
    data.extend_from_slice(key(7).as_bytes());
    data.extend_from_slice(key(8).as_bytes());

    let index = RootIndex::parse(&data).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.named_count(), 1);

    let font = index.lookup("fonts\\arialn.ttf", LocaleFlags::ZHTW).unwrap();
    assert_eq!(font.file_data_id, 5);
    assert!(font.content.has(ContentFlags::INSTALL));

    let second = index.lookup_file_data_id(1005, LocaleFlags::DEDE).unwrap();
    assert_eq!(second.content_key, key(8));
    assert_eq!(second.name_hash, None);
}

#[test]
fn truncated_block_is_rejected() {
    let mut data = Vec::new();
    legacy_block(&mut data, LocaleFlags::ENUS, 0, &[(1, 1, "a"), (0, 2, "b")]);
    data.truncate(data.len() - 10);
    assert!(matches!(
        RootIndex::parse(&data),
        Err(RootError::TruncatedBlock { records: 2, .. })
    ));
}

#[test]
fn negative_first_id_is_rejected() {
    let mut data = Vec::new();
    legacy_block(&mut data, LocaleFlags::ENUS, 0, &[(-5, 1, "a")]);
    assert!(matches!(
        RootIndex::parse(&data),
        Err(RootError::InvalidDelta { previous: -1, delta: -5 })
    ));
}

#[test]
fn empty_file_yields_empty_index() {
    let index = RootIndex::parse(&[]).unwrap();
    assert!(index.is_empty());
}

/// Extended manifest header: size, version, total, named, padding
fn extended_header(magic: &[u8; 4], version: u32, total: u32, named: u32) -> Vec<u8> {
    let mut out = magic.to_vec();
    for word in [24, version, total, named, 0] {
        if magic == b"MFST" {
            out.extend_from_slice(&word.to_be_bytes());
        } else {
            push_u32(&mut out, word);
        }
    }
    out
}

/// Separated-array block with the 17 or 18 byte header of extended roots
fn extended_block(
    out: &mut Vec<u8>,
    version: u32,
    locale: LocaleFlags,
    flags: u64,
    files: &[(i32, u8, Option<&str>)],
) {
    push_u32(out, files.len() as u32);
    push_u32(out, locale.bits());
    push_u32(out, flags as u32);
    if version >= 4 {
        out.push((flags >> 32) as u8);
    }
    push_u32(out, 0);
    out.push(0);
    for &(delta, _, _) in files {
        out.extend_from_slice(&delta.to_le_bytes());
    }
    for &(_, k, _) in files {
        out.extend_from_slice(key(k).as_bytes());
    }
    for &(_, _, path) in files {
        if let Some(path) = path {
            out.extend_from_slice(&hash_path(path).to_le_bytes());
        }
    }
}

#[test]
fn extended_v3_root_resolves_path() {
    let mut data = extended_header(b"TSFM", 3, 1, 1);
    extended_block(&mut data, 3, LocaleFlags::ENUS, 0, &[(1349, 4, Some("DBFilesClient/Map.dbc"))]);

    let index = RootIndex::parse(&data).unwrap();
    assert_eq!(index.len(), 1);
    let map = index.lookup("DBFilesClient\\Map.dbc", LocaleFlags::ENUS).unwrap();
    assert_eq!(map.file_data_id, 1349);
    assert_eq!(map.content_key, key(4));
}

#[test]
fn extended_v4_root_keeps_wide_flags_and_unnamed_blocks() {
    let mut data = extended_header(b"TSFM", 4, 3, 1);
    extended_block(
        &mut data,
        4,
        LocaleFlags::ENUS | LocaleFlags::DEDE,
        0x02_0000_0004,
        &[(10, 1, Some("Interface/Icons/Spell_Fire.blp"))],
    );
    extended_block(
        &mut data,
        4,
        LocaleFlags::ALL,
        ContentFlags::NO_NAME_HASH,
        &[(500, 2, None), (0, 3, None)],
    );

    let index = RootIndex::parse(&data).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.named_count(), 1);

    let icon = index.lookup("interface/icons/spell_fire.blp", LocaleFlags::DEDE).unwrap();
    assert_eq!(icon.file_data_id, 10);
    assert_eq!(icon.content.0, 0x02_0000_0004);
    assert!(icon.content.has(ContentFlags::INSTALL));

    let unnamed = index.lookup_file_data_id(501, LocaleFlags::KOKR).unwrap();
    assert_eq!(unnamed.content_key, key(3));
    assert_eq!(unnamed.name_hash, None);
}

#[test]
fn big_endian_manifest_header_is_read() {
    let mut data = extended_header(b"MFST", 4, 1, 1);
    extended_block(&mut data, 4, LocaleFlags::FRFR, 0, &[(77, 5, Some("World/Maps/Azeroth/Azeroth.wdt"))]);

    let index = RootIndex::parse(&data).unwrap();
    let wdt = index.lookup("World/Maps/Azeroth/Azeroth.wdt", LocaleFlags::FRFR).unwrap();
    assert_eq!(wdt.file_data_id, 77);
    assert_eq!(wdt.content_key, key(5));
}
