use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    /// List the tree `name` resolves to (commits and tags are followed)
    pub fn ls_tree(&self, name: &str, recursive: bool, writer: &mut impl Write) -> anyhow::Result<()> {
        let oid = self.resolve_object_name(name, Some(ObjectType::Tree))?.oid;

        self.print_tree(&oid, "", recursive, writer)
    }

    fn print_tree(
        &self,
        oid: &ObjectId,
        prefix: &str,
        recursive: bool,
        writer: &mut impl Write,
    ) -> anyhow::Result<()> {
        for entry in self.read_tree(oid)?.into_entries() {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if recursive && entry.mode.is_tree() {
                self.print_tree(&entry.oid, &path, recursive, writer)?;
            } else {
                writeln!(
                    writer,
                    "{:0>6} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.mode.object_type(),
                    entry.oid,
                    path
                )?;
            }
        }

        Ok(())
    }
}
