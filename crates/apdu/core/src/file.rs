//! Card file identifiers and the registry of well-known files

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::utils;

/// Two byte file identifier of an MF, DF or EF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId([u8; 2]);

/// Master file (3F00)
pub const MASTER_FILE: FileId = FileId::new([0x3F, 0x00]);

/// EF.ATR (2F01)
pub const ATR_FILE: FileId = FileId::new([0x2F, 0x01]);

/// A file every ISO/IEC 7816-4 card is expected to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownFile {
    /// File identifier
    pub id: FileId,
    /// Human readable name
    pub name: &'static str,
    /// Operator facing aliases, matched exactly
    pub synonyms: &'static [&'static str],
}

/// Registry of well-known files, in display order
pub const WELL_KNOWN_FILES: &[WellKnownFile] = &[
    WellKnownFile {
        id: MASTER_FILE,
        name: "master file",
        synonyms: &["MF", "mf", "master-file"],
    },
    WellKnownFile {
        id: ATR_FILE,
        name: "answer to reset",
        synonyms: &["ATR", "atr", "ef-atr"],
    },
];

static SYNONYMS: LazyLock<HashMap<&'static str, &'static WellKnownFile>> = LazyLock::new(|| {
    WELL_KNOWN_FILES
        .iter()
        .flat_map(|file| file.synonyms.iter().map(move |synonym| (*synonym, file)))
        .collect()
});

impl FileId {
    /// Create a file identifier from its two bytes
    pub const fn new(id: [u8; 2]) -> Self {
        Self(id)
    }

    /// The identifier bytes
    pub const fn bytes(&self) -> [u8; 2] {
        self.0
    }

    /// Parse an identifier written as four hex digits
    pub fn from_hex(input: &str) -> Result<Self> {
        let bytes = utils::parse_hex_string(input)
            .map_err(|_| Error::InvalidFileId(input.to_string()))?;
        let id: [u8; 2] = bytes
            .try_into()
            .map_err(|_| Error::InvalidFileId(input.to_string()))?;
        Ok(Self(id))
    }

    /// Look a well-known file up by one of its synonyms
    pub fn by_synonym(synonym: &str) -> Option<Self> {
        well_known_by_synonym(synonym).map(|file| file.id)
    }
}

/// Look a well-known file up by one of its synonyms
///
/// The lookup is exact; `Mf` does not match `MF`.
pub fn well_known_by_synonym(synonym: &str) -> Option<&'static WellKnownFile> {
    SYNONYMS.get(synonym).copied()
}

/// All synonyms known to the registry, in registry order
pub fn synonyms() -> impl Iterator<Item = &'static str> {
    WELL_KNOWN_FILES
        .iter()
        .flat_map(|file| file.synonyms.iter().copied())
}

impl FromStr for FileId {
    type Err = Error;

    /// Resolve a synonym first, then fall back to four hex digits
    fn from_str(s: &str) -> Result<Self> {
        Self::by_synonym(s).map_or_else(|| Self::from_hex(s), Ok)
    }
}

impl From<[u8; 2]> for FileId {
    fn from(id: [u8; 2]) -> Self {
        Self(id)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&utils::to_hex_string(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonym_lookup_is_exact() {
        assert_eq!(FileId::by_synonym("MF"), Some(MASTER_FILE));
        assert_eq!(FileId::by_synonym("mf"), Some(MASTER_FILE));
        assert_eq!(FileId::by_synonym("master-file"), Some(MASTER_FILE));
        assert_eq!(FileId::by_synonym("Mf"), None);
        assert_eq!(FileId::by_synonym(" MF"), None);
        assert_eq!(FileId::by_synonym("ATR"), Some(ATR_FILE));
    }

    #[test]
    fn test_well_known_entry() {
        let file = well_known_by_synonym("MF").unwrap();
        assert_eq!(file.name, "master file");
        assert_eq!(file.id.bytes(), [0x3F, 0x00]);
    }

    #[test]
    fn test_parse_file_argument() {
        assert_eq!("MF".parse::<FileId>().unwrap(), MASTER_FILE);
        assert_eq!("2f00".parse::<FileId>().unwrap(), FileId::new([0x2F, 0x00]));
        assert!("3F".parse::<FileId>().unwrap_err().is_validation());
        assert!("3F0000".parse::<FileId>().is_err());
        assert!("xyz".parse::<FileId>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(MASTER_FILE.to_string(), "3F00");
        assert_eq!(FileId::from([0x00, 0x0a]).to_string(), "000A");
    }

    #[test]
    fn test_synonyms_listing() {
        let all: Vec<_> = synonyms().collect();
        assert_eq!(all.first(), Some(&"MF"));
        assert!(all.contains(&"ef-atr"));
        assert_eq!(all.len(), 6);
    }
}
