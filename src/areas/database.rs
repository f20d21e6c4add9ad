//! Content-addressed object store
//!
//! Objects live zlib-compressed under `objects/<2 hex>/<38 hex>`, named by the
//! SHA-1 of their framed encoding. Nothing is cached; every call reads disk.

use crate::artifacts::core::fs::{self, PathKind};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
}

// TODO: implement packfiles for better performance and storage efficiency
impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database { path: path.into() }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Digest `object` would be stored under, without touching disk
    pub fn hash(&self, object: &Object) -> Result<ObjectId> {
        object.object_id()
    }

    /// Persist `object` and return its digest
    ///
    /// Writing an object that is already stored is a no-op. A stored file whose
    /// content differs from the encoding means the store is corrupt.
    pub fn write(&self, object: &Object) -> Result<ObjectId> {
        let encoded = object.encode()?;
        let oid = ObjectId::from_bytes(&encoded);
        let object_path = self.path.join(oid.to_path());

        match fs::path_kind(&object_path)? {
            PathKind::Directory => return Err(Error::IsDirectory(object_path)),
            PathKind::File => {
                let stored = self.read_raw(&object_path)?;
                if stored != encoded {
                    return Err(Error::corrupt(format!(
                        "stored object {oid} does not match its content"
                    )));
                }
                tracing::trace!(oid = %oid, "object already stored");
            }
            PathKind::Missing => {
                fs::atomic_write(&object_path, &Self::compress(&encoded)?)?;
                tracing::debug!(oid = %oid, kind = %object.object_type(), "stored object");
            }
        }

        Ok(oid)
    }

    pub fn read(&self, oid: &ObjectId) -> Result<Object> {
        let object_path = self.path.join(oid.to_path());

        match fs::path_kind(&object_path)? {
            PathKind::Missing => Err(Error::NotFound(format!("object {oid}"))),
            PathKind::Directory => Err(Error::IsDirectory(object_path)),
            PathKind::File => {
                let content = self.read_raw(&object_path)?;
                Object::decode(&content)
            }
        }
    }

    /// Read an object that must be of kind `expected`
    pub fn read_typed(&self, oid: &ObjectId, expected: ObjectType) -> Result<Object> {
        let object = self.read(oid)?;
        let actual = object.object_type();

        if actual != expected {
            return Err(Error::WrongType {
                oid: oid.clone(),
                expected,
                actual,
            });
        }

        Ok(object)
    }

    pub fn exists(&self, oid: &ObjectId) -> Result<bool> {
        Ok(fs::path_kind(&self.path.join(oid.to_path()))? == PathKind::File)
    }

    pub fn object_type(&self, oid: &ObjectId) -> Result<ObjectType> {
        Ok(self.read(oid)?.object_type())
    }

    fn read_raw(&self, object_path: &Path) -> Result<Bytes> {
        let compressed = std::fs::read(object_path).map_err(|e| Error::io(object_path, e))?;

        Self::decompress(&compressed)
            .map_err(|e| Error::corrupt(format!("{}: {e}", object_path.display())))
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .map_err(|e| Error::corrupt(format!("unable to compress object content: {e}")))?;

        encoder
            .finish()
            .map_err(|e| Error::corrupt(format!("unable to compress object content: {e}")))
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    /// Find all objects whose OID starts with the given prefix.
    ///
    /// Prefixes of two or more characters only scan their fan-out directory;
    /// shorter ones scan all 256.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidName(format!(
                "object id prefix is not hexadecimal: {prefix}"
            )));
        }
        let prefix = prefix.to_ascii_lowercase();
        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        let mut matches = Vec::new();
        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            if fs::path_kind(&dir_path)? != PathKind::Directory {
                continue;
            }

            let entries = std::fs::read_dir(&dir_path).map_err(|e| Error::io(&dir_path, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| Error::io(&dir_path, e))?;
                let full_oid = format!("{dir_name}{}", entry.file_name().to_string_lossy());

                // temp files and strays never parse as ids
                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(&full_oid)
                {
                    matches.push(oid);
                }
            }
        }
        matches.sort();

        Ok(matches)
    }
}
