use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusReport;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    /// Print the working tree status, either long-form or as `XY path` lines
    pub fn print_status(&self, short: bool, writer: &mut impl Write) -> anyhow::Result<()> {
        let report = self.status()?;

        if short {
            print_short(&report, writer)
        } else {
            self.print_long(&report, writer)
        }
    }

    fn print_long(&self, report: &StatusReport, writer: &mut impl Write) -> anyhow::Result<()> {
        let branch = self.get_active_branch()?;
        if branch.detached {
            writeln!(writer, "HEAD detached")?;
        } else {
            writeln!(writer, "On branch {}", branch.name)?;
        }

        if report.is_clean() {
            writeln!(writer, "nothing to commit, working tree clean")?;
            return Ok(());
        }

        if !report.staged.is_empty() {
            writeln!(writer, "\nChanges to be committed:")?;
            for (path, change) in &report.staged {
                writeln!(writer, "{}{}", change, path.green())?;
            }
        }

        if !report.unstaged.is_empty() {
            writeln!(writer, "\nChanges not staged for commit:")?;
            for (path, change) in &report.unstaged {
                writeln!(writer, "{}{}", change, path.red())?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(writer, "\nUntracked files:")?;
            for path in &report.untracked {
                writeln!(writer, "{:>8}{}", "", path.red())?;
            }
        }

        Ok(())
    }
}

fn print_short(report: &StatusReport, writer: &mut impl Write) -> anyhow::Result<()> {
    let mut changes = BTreeMap::<&str, (&str, &str)>::new();

    for (path, change) in &report.staged {
        changes.entry(path.as_str()).or_insert((" ", " ")).0 = change.short_label();
    }
    for (path, change) in &report.unstaged {
        changes.entry(path.as_str()).or_insert((" ", " ")).1 = change.short_label();
    }

    for (path, (staged, unstaged)) in changes {
        writeln!(writer, "{staged}{unstaged} {path}")?;
    }
    for path in &report.untracked {
        writeln!(writer, "?? {path}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
    use pretty_assertions::assert_eq;

    #[test]
    fn short_format_merges_both_columns() {
        let report = StatusReport {
            staged: vec![
                ("a.txt".to_string(), IndexChangeType::Added),
                ("b.txt".to_string(), IndexChangeType::Modified),
            ],
            unstaged: vec![
                ("a.txt".to_string(), WorkspaceChangeType::Modified),
                ("c.txt".to_string(), WorkspaceChangeType::Deleted),
            ],
            untracked: vec!["d.txt".to_string()],
        };

        let mut output = Vec::new();
        print_short(&report, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "AM a.txt\nM  b.txt\n D c.txt\n?? d.txt\n"
        );
    }
}
