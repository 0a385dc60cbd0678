//! Suite document format
//!
//! A suite document is a TOML file holding many named snapshots:
//!
//! ```text
//! # Generated by snapfile. DO NOT EDIT.
//! [snapshots]
//! "caseA" = '''
//! hello
//! world'''
//! ```
//!
//! Entries are written in ascending name order so re-writing the same
//! content produces identical bytes. Values are written as literal
//! multi-line strings. A value that a literal string cannot hold (it
//! contains `'''` or control characters) falls back to an escaped basic
//! multi-line string, so every value reads back exactly as written.

use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};

use serde::Deserialize;

/// First line of every suite document
pub const HEADER: &str = "# Generated by snapfile. DO NOT EDIT.";

/// Table holding the snapshots
const SECTION: &str = "[snapshots]";

/// Decoded contents of a suite file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuiteDocument {
    #[serde(default)]
    snapshots: BTreeMap<String, String>,
}

impl SuiteDocument {
    /// Parse suite document text
    pub fn decode(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Look up a snapshot by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.snapshots.get(name).map(String::as_str)
    }

    /// Snapshot names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        self.snapshots.insert(name, value);
    }

    /// Write the document to `out`, buffered and flushed once at the end
    pub(crate) fn encode<W: Write>(&self, out: W) -> io::Result<()> {
        let mut w = BufWriter::new(out);

        writeln!(w, "{}", HEADER)?;
        writeln!(w, "{}", SECTION)?;

        for (name, value) in &self.snapshots {
            writeln!(w, "{} = {}", quote_key(name), multiline(value))?;
        }

        w.flush()
    }
}

/// Quote a name as a TOML basic string
fn quote_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => push_escaped(&mut out, c),
        }
    }
    out.push('"');
    out
}

/// Wrap a value in a multi-line string block
fn multiline(value: &str) -> String {
    if fits_literal(value) {
        return format!("'''\n{}'''", value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    out.push_str("\"\"\"\n");
    for c in value.chars() {
        match c {
            '\n' | '\t' => out.push(c),
            _ => push_escaped(&mut out, c),
        }
    }
    out.push_str("\"\"\"");
    out
}

/// Whether `value` can be written verbatim inside `'''` delimiters
fn fits_literal(value: &str) -> bool {
    let plain = |c: char| c == '\n' || c == '\t' || !c.is_control();
    !value.contains("'''") && value.chars().all(plain)
}

/// Push `c` with basic-string escaping for quotes, backslashes and controls
fn push_escaped(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_string(doc: &SuiteDocument) -> String {
        let mut buf = Vec::new();
        doc.encode(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn document(entries: &[(&str, &str)]) -> SuiteDocument {
        let mut doc = SuiteDocument::default();
        for (name, value) in entries {
            doc.insert(name.to_string(), value.to_string());
        }
        doc
    }

    #[test]
    fn test_encode_layout() {
        let doc = document(&[("caseB", "x"), ("caseA", "hello\nworld")]);

        let expected = format!(
            "{}\n[snapshots]\n\"caseA\" = '''\nhello\nworld'''\n\"caseB\" = '''\nx'''\n",
            HEADER
        );
        assert_eq!(encode_to_string(&doc), expected);
    }

    #[test]
    fn test_encode_empty_document() {
        let doc = SuiteDocument::default();
        assert_eq!(encode_to_string(&doc), format!("{}\n[snapshots]\n", HEADER));
    }

    #[test]
    fn test_keys_sorted_bytewise() {
        let doc = document(&[("b", "1"), ("B", "2"), ("a", "3"), ("a b", "4")]);
        let names: Vec<_> = doc.names().collect();
        assert_eq!(names, vec!["B", "a", "a b", "b"]);
    }

    #[test]
    fn test_decode_missing_section_is_empty() {
        let doc = SuiteDocument::decode("# nothing here\n").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_decode_malformed() {
        assert!(SuiteDocument::decode("[snapshots]\n\"a\" = '''\nunterminated").is_err());
        assert!(SuiteDocument::decode("not toml at all = = =").is_err());
    }

    #[test]
    fn test_literal_value_keeps_quotes_and_backslashes() {
        let value = "say \"hi\" \\ it's fine\n\ttabbed";
        let doc = document(&[("k", value)]);
        let text = encode_to_string(&doc);

        assert!(text.contains("'''\nsay \"hi\" \\ it's fine"));
        assert_eq!(SuiteDocument::decode(&text).unwrap().get("k"), Some(value));
    }

    #[test]
    fn test_value_ending_in_quote() {
        let doc = document(&[("k", "it is 'quoted'")]);
        let text = encode_to_string(&doc);

        assert_eq!(
            SuiteDocument::decode(&text).unwrap().get("k"),
            Some("it is 'quoted'")
        );
    }

    #[test]
    fn test_value_with_delimiter_falls_back_to_basic_string() {
        let value = "before ''' after \"\"\" end\\";
        let doc = document(&[("k", value)]);
        let text = encode_to_string(&doc);

        assert!(text.contains("\"k\" = \"\"\"\n"));
        assert_eq!(SuiteDocument::decode(&text).unwrap().get("k"), Some(value));
    }

    #[test]
    fn test_value_with_control_characters() {
        let value = "line one\r\nline two\u{0}\u{1b}[0m";
        let doc = document(&[("k", value)]);
        let text = encode_to_string(&doc);

        assert!(text.contains("\\r"));
        assert!(text.contains("\\u001B"));
        assert_eq!(SuiteDocument::decode(&text).unwrap().get("k"), Some(value));
    }

    #[test]
    fn test_leading_newline_preserved() {
        let doc = document(&[("k", "\nstarts blank")]);
        let text = encode_to_string(&doc);

        assert_eq!(
            SuiteDocument::decode(&text).unwrap().get("k"),
            Some("\nstarts blank")
        );
    }

    #[test]
    fn test_key_escaping() {
        let name = "Test/\"quoted\"\\path\nnext";
        let doc = document(&[(name, "v")]);
        let text = encode_to_string(&doc);

        assert!(text.contains("\"Test/\\\"quoted\\\"\\\\path\\nnext\" = "));
        assert_eq!(SuiteDocument::decode(&text).unwrap().get(name), Some("v"));
    }

    #[test]
    fn test_empty_value() {
        let doc = document(&[("k", "")]);
        let text = encode_to_string(&doc);

        assert!(text.contains("\"k\" = '''\n'''"));
        assert_eq!(SuiteDocument::decode(&text).unwrap().get("k"), Some(""));
    }
}
