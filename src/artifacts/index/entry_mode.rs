//! Entry modes shared by trees and the index
//!
//! Trees write the mode as ASCII octal (`100644`, `40000`); the index stores it
//! as `type << 12 | permissions` in a single big-endian word.

use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Symlink => "120000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Directory => 0o40000,
        }
    }

    /// Object-type bits (the top nibble of the mode word)
    pub fn type_bits(&self) -> u32 {
        self.as_u32() >> 12
    }

    pub fn permission_bits(&self) -> u32 {
        self.as_u32() & 0o777
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::Directory => ObjectType::Tree,
            _ => ObjectType::Blob,
        }
    }

    pub fn from_octal_str(mode: &str) -> Result<Self> {
        let value = u32::from_str_radix(mode, 8)
            .map_err(|_| Error::corrupt(format!("invalid entry mode '{mode}'")))?;
        Self::try_from(value)
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = Error;

    fn try_from(mode: u32) -> Result<Self> {
        match mode {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::Symlink),
            0o40000 => Ok(EntryMode::Directory),
            _ => Err(Error::corrupt(format!("invalid entry mode {mode:o}"))),
        }
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntryMode::File(FileMode::Regular), 0b1000, 0o644)]
    #[case(EntryMode::File(FileMode::Executable), 0b1000, 0o755)]
    #[case(EntryMode::Symlink, 0b1010, 0)]
    #[case(EntryMode::Directory, 0b0100, 0)]
    fn splits_into_type_and_permission_bits(
        #[case] mode: EntryMode,
        #[case] type_bits: u32,
        #[case] permission_bits: u32,
    ) {
        assert_eq!(mode.type_bits(), type_bits);
        assert_eq!(mode.permission_bits(), permission_bits);
        assert_eq!((type_bits << 12) | permission_bits, mode.as_u32());
        assert_eq!(EntryMode::from_octal_str(mode.as_str()).unwrap(), mode);
    }

    #[test]
    fn unknown_modes_are_corrupt_not_panics() {
        assert!(matches!(EntryMode::try_from(0o100600), Err(Error::Corrupt(_))));
        assert!(EntryMode::from_octal_str("9x").is_err());
    }
}
