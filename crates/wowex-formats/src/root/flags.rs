//! Locale and content flags attached to root blocks

use binrw::{BinRead, BinWrite};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Set of locales a root entry applies to
///
/// Each locale is one bit; entries shared between regions carry the union.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct LocaleFlags(pub u32);

impl LocaleFlags {
    /// No locale
    pub const NONE: Self = Self(0);
    /// Every locale
    pub const ALL: Self = Self(0xFFFF_FFFF);
    /// English (United States)
    pub const ENUS: Self = Self(0x0000_0002);
    /// Korean
    pub const KOKR: Self = Self(0x0000_0004);
    /// French (France)
    pub const FRFR: Self = Self(0x0000_0010);
    /// German (Germany)
    pub const DEDE: Self = Self(0x0000_0020);
    /// Chinese (Simplified)
    pub const ZHCN: Self = Self(0x0000_0040);
    /// Spanish (Spain)
    pub const ESES: Self = Self(0x0000_0080);
    /// Chinese (Traditional)
    pub const ZHTW: Self = Self(0x0000_0100);
    /// English (Great Britain)
    pub const ENGB: Self = Self(0x0000_0200);
    /// English (China), legacy regional flag
    pub const ENCN: Self = Self(0x0000_0400);
    /// English (Taiwan), legacy regional flag
    pub const ENTW: Self = Self(0x0000_0800);
    /// Spanish (Mexico)
    pub const ESMX: Self = Self(0x0000_1000);
    /// Russian
    pub const RURU: Self = Self(0x0000_2000);
    /// Portuguese (Brazil)
    pub const PTBR: Self = Self(0x0000_4000);
    /// Italian
    pub const ITIT: Self = Self(0x0000_8000);
    /// Portuguese (Portugal)
    pub const PTPT: Self = Self(0x0001_0000);

    /// Create flags from a raw mask
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw mask
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when no bit is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when at least one locale is shared with `other`
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// True when every locale in `other` is also in `self`
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl fmt::Display for LocaleFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for LocaleFlags {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl BitAnd for LocaleFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for LocaleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LocaleFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Block-level content flags
///
/// Stored as `u64`: the newest block header carries 40 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ContentFlags(pub u64);

impl ContentFlags {
    /// Part of the base install
    pub const INSTALL: u64 = 0x0000_0004;
    /// Loaded on Windows clients
    pub const LOAD_ON_WINDOWS: u64 = 0x0000_0008;
    /// Loaded on macOS clients
    pub const LOAD_ON_MAC: u64 = 0x0000_0010;
    /// Low-violence variant
    pub const LOW_VIOLENCE: u64 = 0x0000_0080;
    /// Never loaded by the client
    pub const DONT_LOAD: u64 = 0x0000_0100;
    /// Content is encrypted
    pub const ENCRYPTED: u64 = 0x0800_0000;
    /// Block carries no name hashes (manifest layouts only)
    pub const NO_NAME_HASH: u64 = 0x1000_0000;
    /// Bundled content
    pub const BUNDLE: u64 = 0x4000_0000;
    /// Stored without compression
    pub const NO_COMPRESSION: u64 = 0x8000_0000;

    /// Create flags from a raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Check whether `flag` is set
    pub const fn has(self, flag: u64) -> bool {
        (self.0 & flag) != 0
    }
}

impl fmt::Display for ContentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
