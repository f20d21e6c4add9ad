//! Ordered key/value headers shared by commits and tags
//!
//! The encoding is order-sensitive text, so headers keep insertion order and
//! re-serialise exactly as read:
//!
//! ```text
//! key SP value LF        (one per header)
//! SP continuation LF     (multi-line values, e.g. signatures)
//! LF                     (blank separator before the message)
//! ```

use crate::artifacts::core::codec;
use crate::errors::{Error, Result};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Replace the first header named `key`, or append it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First of `keys` not present, if any
    pub fn first_missing<'k>(&self, keys: &[&'k str]) -> Option<&'k str> {
        keys.iter().copied().find(|key| self.get(key).is_none())
    }

    /// Write all headers followed by the blank separator line
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for (key, value) in &self.0 {
            out.extend_from_slice(key.as_bytes());
            out.push(b' ');
            out.extend_from_slice(value.replace('\n', "\n ").as_bytes());
            out.push(b'\n');
        }
        out.push(b'\n');
    }

    /// Read headers up to and including the blank separator line
    pub fn parse(reader: &mut impl BufRead) -> Result<Self> {
        let mut headers = Headers::default();

        loop {
            let line = codec::read_until(reader, b'\n', "header line")?
                .ok_or_else(|| Error::corrupt("headers are not terminated by a blank line"))?;
            if line.is_empty() {
                return Ok(headers);
            }

            let line = codec::utf8(line, "header line")?;
            if let Some(continuation) = line.strip_prefix(' ') {
                let (_, value) = headers
                    .0
                    .last_mut()
                    .ok_or_else(|| Error::corrupt("continuation line without a header"))?;
                value.push('\n');
                value.push_str(continuation);
                continue;
            }

            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| Error::corrupt(format!("malformed header line '{line}'")))?;
            headers.push(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn preserves_insertion_order() {
        let mut headers = Headers::default();
        headers.push("zeta", "1");
        headers.push("alpha", "2");

        let mut out = Vec::new();
        headers.write_to(&mut out);

        assert_eq!(out, b"zeta 1\nalpha 2\n\n".to_vec());
    }

    #[test]
    fn multi_line_values_survive_a_round_trip() {
        let mut headers = Headers::default();
        headers.push("gpgsig", "-----BEGIN-----\nabc\n-----END-----");
        headers.push("tree", "x");

        let mut out = Vec::new();
        headers.write_to(&mut out);
        let parsed = Headers::parse(&mut Cursor::new(out)).unwrap();

        assert_eq!(parsed, headers);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut headers = Headers::default();
        headers.push("a", "1");
        headers.push("b", "2");
        headers.set("a", "3");

        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn missing_separator_is_corrupt() {
        let result = Headers::parse(&mut Cursor::new(b"tree abc\n".to_vec()));

        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn reports_first_missing_key() {
        let mut headers = Headers::default();
        headers.push("tree", "x");

        assert_eq!(headers.first_missing(&["tree", "parent"]), Some("parent"));
        assert_eq!(headers.first_missing(&["tree"]), None);
    }
}
