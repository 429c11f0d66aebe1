//! Root file parsing
//!
//! Four layouts are understood:
//!
//! - **Legacy** (WoW 6.0 - 8.1): no header, a sequence of blocks. Each block
//!   is `num_records, content_flags, locale_flags`, then all FileDataID
//!   deltas, then interleaved `(content_key, name_hash)` pairs.
//! - **Manifest** (8.2+): `TSFM` or `MFST` magic, then
//!   `total_files, named_files`. Blocks keep the legacy 12-byte header but
//!   store separated arrays: deltas, content keys, and name hashes unless
//!   the block opts out via [`ContentFlags::NO_NAME_HASH`].
//! - **Extended manifest, version 1-3**: magic, then
//!   `header_size, version, total_files, named_files`, padded to
//!   `header_size`. Block headers grow to 17 bytes:
//!   `num_records, locale_flags, content_flags, unk, unk_u8`.
//! - **Extended manifest, version 4+**: as above with an 18-byte block
//!   header whose content flags are 40 bits wide (`u32` low, `u8` high).
//!
//! `TSFM` headers are little-endian, `MFST` headers big-endian. Block data
//! is little-endian in every layout.
//!
//! FileDataIDs are delta encoded: the first id is its delta, every following
//! id is `previous + 1 + delta`.

use crate::root::entry::RootEntry;
use crate::root::error::{Result, RootError};
use crate::root::flags::{ContentFlags, LocaleFlags};
use crate::root::index::{RootIndex, RootIndexBuilder};
use binrw::io::{Cursor, Read, Seek, SeekFrom};
use binrw::{BinRead, BinResult, Endian};
use tracing::debug;
use wowex_hash::ContentKey;

/// Smallest extended header: magic, size, version, total, named
const EXTENDED_HEADER_MIN: u32 = 20;

/// Block layout selected by the file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootLayout {
    /// Headerless, interleaved records
    Legacy,
    /// `total, named` header, 12-byte block headers
    Manifest,
    /// Extended header version 1 to 3, 17-byte block headers
    ExtendedV3,
    /// Extended header version 4+, 18-byte block headers
    ExtendedV4,
}

impl RootLayout {
    /// Size of one block header in bytes
    pub const fn block_header_size(self) -> u64 {
        match self {
            Self::Legacy | Self::Manifest => 12,
            Self::ExtendedV3 => 17,
            Self::ExtendedV4 => 18,
        }
    }
}

/// Header preceding every root block, normalized across layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Number of records in the block
    pub num_records: u32,
    /// Content flags shared by all records
    pub content_flags: ContentFlags,
    /// Locale flags shared by all records
    pub locale_flags: LocaleFlags,
}

impl BinRead for BlockHeader {
    type Args<'a> = RootLayout;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        layout: Self::Args<'_>,
    ) -> BinResult<Self> {
        let num_records = u32::read_le(reader)?;
        match layout {
            RootLayout::Legacy | RootLayout::Manifest => {
                let content_flags = u32::read_le(reader)?;
                let locale_flags = LocaleFlags::read_le(reader)?;
                Ok(Self {
                    num_records,
                    content_flags: ContentFlags::new(u64::from(content_flags)),
                    locale_flags,
                })
            }
            RootLayout::ExtendedV3 => {
                let locale_flags = LocaleFlags::read_le(reader)?;
                let content_flags = u32::read_le(reader)?;
                let _unk = u32::read_le(reader)?;
                let _unk_u8 = u8::read_le(reader)?;
                Ok(Self {
                    num_records,
                    content_flags: ContentFlags::new(u64::from(content_flags)),
                    locale_flags,
                })
            }
            RootLayout::ExtendedV4 => {
                let locale_flags = LocaleFlags::read_le(reader)?;
                let low = u64::from(u32::read_le(reader)?);
                let high = u64::from(u8::read_le(reader)?);
                let _unk = u32::read_le(reader)?;
                let _unk_u8 = u8::read_le(reader)?;
                Ok(Self {
                    num_records,
                    content_flags: ContentFlags::new(low | (high << 32)),
                    locale_flags,
                })
            }
        }
    }
}

/// Header of the manifest layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestHeader {
    /// Magic bytes (`TSFM` or `MFST`)
    pub magic: [u8; 4],
    /// Header size for extended headers, 12 for the short header
    pub header_size: u32,
    /// Header version, 0 for the short header
    pub version: u32,
    /// Total number of files
    pub total_files: u32,
    /// Number of files carrying a name hash
    pub named_files: u32,
}

impl ManifestHeader {
    /// Little-endian header magic
    pub const TSFM: [u8; 4] = *b"TSFM";
    /// Big-endian header magic
    pub const MFST: [u8; 4] = *b"MFST";

    /// Whether `data` starts with a manifest magic
    pub fn is_manifest(data: &[u8]) -> bool {
        data.starts_with(&Self::TSFM) || data.starts_with(&Self::MFST)
    }

    /// Blocks may omit name hashes only when some files are unnamed
    pub const fn allows_unnamed(&self) -> bool {
        self.total_files != self.named_files
    }

    /// Block layout implied by the header
    pub const fn layout(&self) -> RootLayout {
        match self.version {
            0 => RootLayout::Manifest,
            1..=3 => RootLayout::ExtendedV3,
            _ => RootLayout::ExtendedV4,
        }
    }
}

impl BinRead for ManifestHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let start = reader.stream_position()?;
        let magic = <[u8; 4]>::read_le(reader)?;
        let endian = match magic {
            Self::TSFM => Endian::Little,
            Self::MFST => Endian::Big,
            _ => {
                return Err(binrw::Error::BadMagic {
                    pos: start,
                    found: Box::new(magic),
                });
            }
        };

        let first = u32::read_options(reader, endian, ())?;
        let second = u32::read_options(reader, endian, ())?;

        // A small size word followed by a smaller version word marks the
        // extended header; otherwise the words are the file counts.
        let extended = (EXTENDED_HEADER_MIN..100).contains(&first)
            && (1..10).contains(&second)
            && second < first;
        if !extended {
            return Ok(Self {
                magic,
                header_size: 12,
                version: 0,
                total_files: first,
                named_files: second,
            });
        }

        let total_files = u32::read_options(reader, endian, ())?;
        let named_files = u32::read_options(reader, endian, ())?;
        reader.seek(SeekFrom::Start(start + u64::from(first)))?;
        Ok(Self {
            magic,
            header_size: first,
            version: second,
            total_files,
            named_files,
        })
    }
}

impl RootIndex {
    /// Parse a root file in any supported layout
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(data);
        let manifest = if ManifestHeader::is_manifest(data) {
            Some(ManifestHeader::read_le(&mut reader)?)
        } else {
            None
        };
        let layout = manifest.map_or(RootLayout::Legacy, |m| m.layout());
        let data_len = data.len() as u64;
        if reader.position() > data_len {
            return Err(RootError::TruncatedBlock {
                offset: 0,
                records: 0,
                needed: reader.position(),
                available: data_len,
            });
        }

        let mut builder = RootIndex::builder();
        let mut blocks = 0usize;

        while reader.position() < data_len {
            let offset = reader.position();
            let header = BlockHeader::read_le_args(&mut reader, layout)?;

            let with_names = match manifest {
                None => true,
                Some(m) => {
                    !(m.allows_unnamed() && header.content_flags.has(ContentFlags::NO_NAME_HASH))
                }
            };
            let record_len: u64 = 4 + 16 + if with_names { 8 } else { 0 };
            let needed = u64::from(header.num_records) * record_len;
            let available = data_len - reader.position();
            if needed > available {
                return Err(RootError::TruncatedBlock {
                    offset,
                    records: header.num_records,
                    needed,
                    available,
                });
            }

            let count = header.num_records as usize;
            let ids = read_file_data_ids(&mut reader, count)?;
            builder.reserve(count);

            if layout == RootLayout::Legacy {
                read_interleaved(&mut reader, &mut builder, &ids, header)?;
            } else {
                read_separated(&mut reader, &mut builder, &ids, header, with_names)?;
            }
            blocks += 1;
        }

        let index = builder.build();
        debug!(
            "Parsed root file: {} blocks, {} entries, {} named ({:?})",
            blocks,
            index.len(),
            index.named_count(),
            layout
        );
        Ok(index)
    }
}

fn read_file_data_ids(reader: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<u32>> {
    let mut ids = Vec::with_capacity(count);
    let mut previous: i64 = -1;
    for _ in 0..count {
        let delta = i32::read_le(reader)?;
        let id = previous + 1 + i64::from(delta);
        let id = u32::try_from(id).map_err(|_| RootError::InvalidDelta { previous, delta })?;
        ids.push(id);
        previous = i64::from(id);
    }
    Ok(ids)
}

fn read_interleaved(
    reader: &mut Cursor<&[u8]>,
    builder: &mut RootIndexBuilder,
    ids: &[u32],
    header: BlockHeader,
) -> Result<()> {
    for &file_data_id in ids {
        let content_key = ContentKey::read_le(reader)?;
        let name_hash = u64::read_le(reader)?;
        builder.push(RootEntry {
            file_data_id,
            content_key,
            name_hash: Some(name_hash),
            locale: header.locale_flags,
            content: header.content_flags,
        });
    }
    Ok(())
}

fn read_separated(
    reader: &mut Cursor<&[u8]>,
    builder: &mut RootIndexBuilder,
    ids: &[u32],
    header: BlockHeader,
    with_names: bool,
) -> Result<()> {
    let mut keys = Vec::with_capacity(ids.len());
    for _ in ids {
        keys.push(ContentKey::read_le(reader)?);
    }

    let mut hashes = Vec::with_capacity(ids.len());
    if with_names {
        for _ in ids {
            hashes.push(Some(u64::read_le(reader)?));
        }
    } else {
        hashes.resize(ids.len(), None);
    }

    for ((&file_data_id, content_key), name_hash) in ids.iter().zip(keys).zip(hashes) {
        builder.push(RootEntry {
            file_data_id,
            content_key,
            name_hash,
            locale: header.locale_flags,
            content: header.content_flags,
        });
    }
    Ok(())
}
