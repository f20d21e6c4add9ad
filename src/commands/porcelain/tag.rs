use crate::areas::repository::{Repository, TagAnnotation};
use crate::artifacts::objects::commit::Author;
use crate::artifacts::refs::TAGS_PREFIX;
use std::io::Write;

impl Repository {
    /// Print every tag name, sorted
    pub fn list_tags(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        for name in self.get_all_refs()?.keys() {
            if let Some(tag) = name.strip_prefix(TAGS_PREFIX) {
                writeln!(writer, "{tag}")?;
            }
        }

        Ok(())
    }

    /// Tag `target` as `name`; annotated tags take the tagger from the environment
    pub fn tag(
        &self,
        name: &str,
        target: &str,
        annotate: bool,
        message: Option<String>,
    ) -> anyhow::Result<()> {
        let annotation = if annotate || message.is_some() {
            Some(TagAnnotation {
                tagger: Author::load_from_env()?,
                message: message.map(|m| format!("{}\n", m.trim())),
            })
        } else {
            None
        };

        let oid = self.create_tag(name, target, annotation)?;
        tracing::info!(tag = name, oid = %oid, "created tag");

        Ok(())
    }
}
