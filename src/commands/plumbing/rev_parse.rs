use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    pub fn rev_parse(
        &self,
        name: &str,
        object_type: Option<ObjectType>,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        let resolved = self.resolve_object_name(name, object_type)?;
        writeln!(writer, "{}", resolved.oid)?;

        Ok(())
    }
}
