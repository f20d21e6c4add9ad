use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

/// What `cat-file` prints about the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// Raw body, after walking to the given kind
    Body(ObjectType),
    Type,
    Size,
    Pretty,
}

impl Repository {
    pub fn cat_file(
        &self,
        name: &str,
        mode: CatFileMode,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        let expected = match mode {
            CatFileMode::Body(object_type) => Some(object_type),
            _ => None,
        };
        let oid = self.resolve_object_name(name, expected)?.oid;
        let object = self.read_object(&oid, expected)?;

        match mode {
            CatFileMode::Body(_) => writer.write_all(&object.body()?)?,
            CatFileMode::Type => writeln!(writer, "{}", object.object_type())?,
            CatFileMode::Size => writeln!(writer, "{}", object.body()?.len())?,
            CatFileMode::Pretty => {
                let display = object.display()?;
                write!(writer, "{display}")?;
                if !display.is_empty() && !display.ends_with('\n') {
                    writeln!(writer)?;
                }
            }
        }

        Ok(())
    }
}
