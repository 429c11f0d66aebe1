//! Client locale identifiers and their archive locale masks

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wowex_formats::LocaleFlags;

/// Client locale, numbered the way the client numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// English (US)
    #[default]
    #[serde(rename = "enUS")]
    EnUs = 0,
    /// Korean
    #[serde(rename = "koKR")]
    KoKr = 1,
    /// French
    #[serde(rename = "frFR")]
    FrFr = 2,
    /// German
    #[serde(rename = "deDE")]
    DeDe = 3,
    /// Chinese (simplified)
    #[serde(rename = "zhCN")]
    ZhCn = 4,
    /// Chinese (traditional)
    #[serde(rename = "zhTW")]
    ZhTw = 5,
    /// Spanish (Spain)
    #[serde(rename = "esES")]
    EsEs = 6,
    /// Spanish (Mexico)
    #[serde(rename = "esMX")]
    EsMx = 7,
    /// Russian
    #[serde(rename = "ruRU")]
    RuRu = 8,
    /// Portuguese (Brazil)
    #[serde(rename = "ptBR")]
    PtBr = 10,
    /// Italian
    #[serde(rename = "itIT")]
    ItIt = 11,
}

impl Locale {
    /// Every locale in id order
    pub const ALL: [Self; 11] = [
        Self::EnUs,
        Self::KoKr,
        Self::FrFr,
        Self::DeDe,
        Self::ZhCn,
        Self::ZhTw,
        Self::EsEs,
        Self::EsMx,
        Self::RuRu,
        Self::PtBr,
        Self::ItIt,
    ];

    /// Dense locale id
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Locale for a dense id
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.id() == id)
    }

    /// Four-letter locale name
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnUs => "enUS",
            Self::KoKr => "koKR",
            Self::FrFr => "frFR",
            Self::DeDe => "deDE",
            Self::ZhCn => "zhCN",
            Self::ZhTw => "zhTW",
            Self::EsEs => "esES",
            Self::EsMx => "esMX",
            Self::RuRu => "ruRU",
            Self::PtBr => "ptBR",
            Self::ItIt => "itIT",
        }
    }

    /// Archive locale mask selecting this locale's files
    ///
    /// Some locales also accept the files of a sibling region.
    pub fn flags(self) -> LocaleFlags {
        match self {
            Self::EnUs => LocaleFlags::ENUS | LocaleFlags::ENGB,
            Self::KoKr => LocaleFlags::KOKR,
            Self::FrFr => LocaleFlags::FRFR,
            Self::DeDe => LocaleFlags::DEDE,
            Self::ZhCn => LocaleFlags::ZHCN | LocaleFlags::ENCN,
            Self::ZhTw => LocaleFlags::ZHTW | LocaleFlags::ENTW,
            Self::EsEs => LocaleFlags::ESES,
            Self::EsMx => LocaleFlags::ESMX,
            Self::RuRu => LocaleFlags::RURU,
            Self::PtBr => LocaleFlags::PTBR | LocaleFlags::PTPT,
            Self::ItIt => LocaleFlags::ITIT,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Locale {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| StorageError::UnknownLocale(s.to_string()))
    }
}
