use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

/// Parse `body` as an object of `object_type`, rejecting malformed input
pub fn object_from_body(object_type: ObjectType, body: Vec<u8>) -> anyhow::Result<Object> {
    let object = match object_type {
        ObjectType::Blob => Object::Blob(Blob::new(body.into())),
        ObjectType::Tree => Object::Tree(Tree::deserialize(body.as_slice())?),
        ObjectType::Commit => Object::Commit(Commit::deserialize(body.as_slice())?),
        ObjectType::Tag => Object::Tag(Tag::deserialize(body.as_slice())?),
    };

    Ok(object)
}

/// Print the digest of `file` as an object of `object_type`
///
/// Without a repository the object can only be hashed, not written.
pub fn hash_object(
    repository: Option<&Repository>,
    file: &Path,
    object_type: ObjectType,
    write: bool,
    writer: &mut impl Write,
) -> anyhow::Result<()> {
    let body = std::fs::read(file).with_context(|| format!("unable to read {}", file.display()))?;
    let object = object_from_body(object_type, body)?;

    let oid = match (write, repository) {
        (true, Some(repository)) => repository.write_object(&object)?,
        (true, None) => anyhow::bail!("not a repository: cannot write {}", file.display()),
        (false, _) => object.object_id()?,
    };

    writeln!(writer, "{oid}")?;

    Ok(())
}
