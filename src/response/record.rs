// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic CGMiner response decoding.
//!
//! A CGMiner reply looks like
//!
//! ```text
//! STATUS=S,When=1700000000,Code=7,Msg=3 Pool(s),Description=cgminer 4.11.1|POOL=0,URL=stratum+tcp://pool:3333,Status=Alive|POOL=1,URL=...|
//! ```
//!
//! The first segment is the `STATUS` section. Every further segment is a
//! section of comma separated `key=value` fields, introduced either by a
//! bare label (`SUMMARY,Elapsed=...`) or by a `POOL=<n>` marker.

use indexmap::IndexMap;
use serde::Serialize;

use super::Scalar;

/// Section name of the command outcome.
pub const STATUS_SECTION: &str = "STATUS";

/// Section marker used by the `pools` reply.
pub const POOL_SECTION: &str = "POOL";

/// Insertion-ordered fields of one section.
pub type Fields = IndexMap<String, Scalar>;

/// Pools keyed `p1`, `p2`, ... in the order the miner listed them.
pub type Pools = IndexMap<String, Fields>;

/// A named section, possibly repeated within one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Section {
    /// The section appeared once.
    Single(Fields),
    /// The section appeared several times, in order of appearance.
    Multiple(Vec<Fields>),
}

impl Section {
    /// Returns the first occurrence.
    #[must_use]
    pub fn first(&self) -> Option<&Fields> {
        match self {
            Self::Single(fields) => Some(fields),
            Self::Multiple(list) => list.first(),
        }
    }

    /// Iterates over every occurrence in order.
    pub fn iter(&self) -> impl Iterator<Item = &Fields> {
        let slice = match self {
            Self::Single(fields) => std::slice::from_ref(fields),
            Self::Multiple(list) => list.as_slice(),
        };
        slice.iter()
    }

    /// Returns the number of occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(list) => list.len(),
        }
    }

    /// Returns true if there is no occurrence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the section, returning every occurrence in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Fields> {
        match self {
            Self::Single(fields) => vec![fields],
            Self::Multiple(list) => list,
        }
    }

    fn push(&mut self, fields: Fields) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multiple(vec![first, fields]);
            }
            Self::Multiple(list) => list.push(fields),
        }
    }
}

/// A decoded CGMiner response: section name to section.
///
/// # Examples
///
/// ```
/// use avalon_lib::response::{decode, Scalar};
///
/// let record = decode("STATUS=S,Msg=Summary|SUMMARY,Elapsed=120,MHS av=1234.5");
/// assert_eq!(record.status_code(), Some("S"));
///
/// let summary = record.get("SUMMARY").and_then(|s| s.first()).unwrap();
/// assert_eq!(summary["Elapsed"], Scalar::Int(120));
/// assert_eq!(summary["MHS av"], Scalar::Float(1234.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    sections: IndexMap<String, Section>,
    #[serde(skip)]
    message: Option<String>,
}

impl Record {
    /// Returns the named section.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Returns the first occurrence of the named section.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&Fields> {
        self.get(name).and_then(Section::first)
    }

    /// Returns the `STATUS` section (its first occurrence if repeated).
    #[must_use]
    pub fn status(&self) -> Option<&Fields> {
        self.first(STATUS_SECTION)
    }

    /// Returns the `STATUS` code, e.g. `"S"` for success.
    #[must_use]
    pub fn status_code(&self) -> Option<&str> {
        self.status()
            .and_then(|fields| fields.get("STATUS"))
            .and_then(Scalar::as_str)
    }

    /// Returns the `STATUS` message exactly as the miner sent it.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if no section was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns the number of distinct section names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Iterates over sections in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    /// Consumes the record, returning the named section.
    #[must_use]
    pub fn take(mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(name)
    }

    /// Consumes the record, renumbering its `POOL` sections.
    ///
    /// # Examples
    ///
    /// ```
    /// use avalon_lib::response::decode;
    ///
    /// let pools = decode("STATUS=S|POOL=0,URL=a|POOL=1,URL=b").into_pools();
    /// assert_eq!(pools.keys().collect::<Vec<_>>(), ["p1", "p2"]);
    /// ```
    #[must_use]
    pub fn into_pools(self) -> Pools {
        self.take(POOL_SECTION)
            .map(Section::into_vec)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, pool)| (format!("p{}", i + 1), pool))
            .collect()
    }

    fn insert(&mut self, name: String, fields: Fields) {
        match self.sections.get_mut(&name) {
            Some(existing) => existing.push(fields),
            None => {
                self.sections.insert(name, Section::Single(fields));
            }
        }
    }
}

/// Decodes a generic CGMiner response.
///
/// Returns an empty [`Record`] if the text has no `|` delimiter. Malformed
/// tokens are skipped instead of failing the whole response.
#[must_use]
pub fn decode(text: &str) -> Record {
    let mut record = Record::default();
    if !text.contains('|') {
        return record;
    }

    let mut segments = text.split('|');

    let status = segments.next().unwrap_or_default().trim();
    if !status.is_empty() {
        let mut fields = Fields::new();
        parse_fields(status.split(','), &mut fields);
        record.insert(STATUS_SECTION.to_string(), fields);
        record.message = raw_field(status, "Msg").map(str::to_string);
    }

    for segment in segments.map(str::trim).filter(|s| !s.is_empty()) {
        let (name, fields) = parse_section(segment);
        if let Some(name) = name {
            record.insert(name, fields);
        }
    }

    record
}

fn parse_section(segment: &str) -> (Option<String>, Fields) {
    let mut tokens = segment.split(',').peekable();
    let mut fields = Fields::new();
    let mut name = None;

    let first = tokens.peek().copied().unwrap_or_default().trim();
    match first.split_once('=') {
        Some((POOL_SECTION, id)) => {
            name = Some(POOL_SECTION.to_string());
            fields.insert(POOL_SECTION.to_string(), Scalar::from(id.trim()));
            tokens.next();
        }
        // A leading field without a label stays in the field list.
        Some(_) => {}
        None => {
            if !first.is_empty() {
                name = Some(first.to_string());
            }
            tokens.next();
        }
    }

    parse_fields(tokens, &mut fields);

    let name = name.or_else(|| fields.keys().next().cloned());
    (name, fields)
}

/// Last raw value of `key` in a segment, as `parse_fields` would keep it.
fn raw_field<'a>(segment: &'a str, key: &str) -> Option<&'a str> {
    segment
        .split(',')
        .filter_map(|token| token.trim().split_once('='))
        .filter(|(k, _)| k.trim() == key)
        .map(|(_, value)| value.trim())
        .last()
}

fn parse_fields<'a>(tokens: impl Iterator<Item = &'a str>, fields: &mut Fields) {
    for token in tokens {
        let Some((key, value)) = token.trim().split_once('=') else {
            continue;
        };
        fields.insert(key.trim().to_string(), Scalar::infer(value.trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, Scalar)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn status_and_repeated_pools() {
        let record = decode("A=1,B=2|POOL=x,C=3|POOL=y,D=4");

        assert_eq!(
            record.get("STATUS"),
            Some(&Section::Single(fields(&[
                ("A", Scalar::Int(1)),
                ("B", Scalar::Int(2)),
            ])))
        );
        assert_eq!(
            record.get("POOL"),
            Some(&Section::Multiple(vec![
                fields(&[("POOL", Scalar::from("x")), ("C", Scalar::Int(3))]),
                fields(&[("POOL", Scalar::from("y")), ("D", Scalar::Int(4))]),
            ]))
        );
    }

    #[test]
    fn third_occurrence_appends() {
        let record = decode("STATUS=S|POOL=0,A=1|POOL=1,A=2|POOL=2,A=3");
        let pools = record.get("POOL").unwrap();

        assert_eq!(pools.len(), 3);
        let ids: Vec<_> = pools.iter().map(|p| p["POOL"].to_string()).collect();
        assert_eq!(ids, ["0", "1", "2"]);
    }

    #[test]
    fn pool_marker_value_is_kept_as_string() {
        let record = decode("STATUS=S|POOL=0,URL=stratum+tcp://pool:3333");
        let pool = record.first("POOL").unwrap();
        assert_eq!(pool["POOL"], Scalar::from("0"));
        assert_eq!(pool["URL"], Scalar::from("stratum+tcp://pool:3333"));
    }

    #[test]
    fn labelled_section() {
        let record = decode(
            "STATUS=S,When=1700000000,Code=11,Msg=Summary|SUMMARY,Elapsed=3600,MHS av=6000000.12,Accepted=42",
        );

        assert_eq!(record.status_code(), Some("S"));
        assert_eq!(record.message(), Some("Summary"));

        let summary = record.first("SUMMARY").unwrap();
        assert_eq!(summary["Elapsed"], Scalar::Int(3600));
        assert_eq!(summary["MHS av"], Scalar::Float(6_000_000.12));
        assert_eq!(summary["Accepted"], Scalar::Int(42));
    }

    #[test]
    fn unlabelled_section_named_after_first_field() {
        let record = decode("STATUS=S|STATS=0,ID=AVA100,Elapsed=10");
        let stats = record.first("STATS").unwrap();
        assert_eq!(stats["STATS"], Scalar::Int(0));
        assert_eq!(stats["ID"], Scalar::from("AVA100"));
    }

    #[test]
    fn label_without_fields_is_kept() {
        let record = decode("STATUS=S|VERSION");
        assert_eq!(record.get("VERSION"), Some(&Section::Single(Fields::new())));
    }

    #[test]
    fn tokens_without_equals_are_skipped() {
        let record = decode("STATUS=S,garbage,Msg=ok|DEVS,noise,Temp=40.5");
        assert_eq!(record.status().unwrap().len(), 2);

        let devs = record.first("DEVS").unwrap();
        assert_eq!(devs.len(), 1);
        assert_eq!(devs["Temp"], Scalar::Float(40.5));
    }

    #[test]
    fn whitespace_is_trimmed_around_keys_and_values() {
        let record = decode(" STATUS = S , Msg = hi | SUMMARY , Elapsed = 5 ");
        assert_eq!(record.status_code(), Some("S"));
        assert_eq!(record.first("SUMMARY").unwrap()["Elapsed"], Scalar::Int(5));
    }

    #[test]
    fn value_may_contain_equals() {
        let record = decode("STATUS=S|POOL=0,URL=stratum+tcp://host:3333?a=b");
        assert_eq!(
            record.first("POOL").unwrap()["URL"],
            Scalar::from("stratum+tcp://host:3333?a=b")
        );
    }

    #[test]
    fn no_delimiter_yields_empty_record() {
        assert!(decode("").is_empty());
        assert!(decode("STATUS=S,Msg=no pipe").is_empty());
    }

    #[test]
    fn empty_segments_are_ignored() {
        let record = decode("STATUS=S||SUMMARY,A=1|");
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn empty_status_segment_is_not_stored() {
        let record = decode("|SUMMARY,A=1");
        assert!(record.status().is_none());
        assert!(record.get("SUMMARY").is_some());
    }

    #[test]
    fn repeated_status_uses_first_occurrence() {
        let record = decode("STATUS=S,Msg=first|STATUS=E,Msg=second");
        assert!(matches!(record.get("STATUS"), Some(Section::Multiple(_))));
        assert_eq!(record.status_code(), Some("S"));
        assert_eq!(record.message(), Some("first"));
    }

    #[test]
    fn decoding_is_idempotent() {
        let text = "STATUS=S,Msg=3 Pool(s)|POOL=0,Priority=0|POOL=1,Priority=1|POOL=2,Priority=2";
        assert_eq!(decode(text), decode(text));
    }

    #[test]
    fn sections_keep_order_of_appearance() {
        let record = decode("STATUS=S|B,x=1|A,y=2|C,z=3");
        let names: Vec<_> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["STATUS", "B", "A", "C"]);
    }

    #[test]
    fn serializes_as_plain_maps() {
        let record = decode("STATUS=S,Code=7|POOL=0,Diff=1.5|POOL=1,Diff=2");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "STATUS": {"STATUS": "S", "Code": 7},
                "POOL": [{"POOL": "0", "Diff": 1.5}, {"POOL": "1", "Diff": 2}]
            })
        );
    }

    #[test]
    fn pools_are_renumbered_from_one() {
        let pools = decode("STATUS=S|POOL=0,URL=a,Status=Alive|POOL=1,URL=b|POOL=2,URL=c")
            .into_pools();
        assert_eq!(pools.len(), 3);
        assert_eq!(pools["p1"]["URL"], Scalar::from("a"));
        assert_eq!(pools["p1"]["POOL"], Scalar::from("0"));
        assert_eq!(pools["p3"]["URL"], Scalar::from("c"));
    }

    #[test]
    fn single_pool_is_p1() {
        let pools = decode("STATUS=S|POOL=0,URL=a").into_pools();
        assert_eq!(pools.keys().collect::<Vec<_>>(), ["p1"]);
    }

    #[test]
    fn no_pool_section_gives_no_pools() {
        assert!(decode("STATUS=S,Msg=ok|").into_pools().is_empty());
        assert!(decode("").into_pools().is_empty());
    }

    #[test]
    fn message_keeps_raw_text() {
        let record = decode("STATUS=S,Code=7,Msg=5.0|");
        assert_eq!(record.message(), Some("5.0"));
        assert_eq!(record.first("STATUS").unwrap()["Msg"], Scalar::Float(5.0));

        assert_eq!(decode("STATUS=E,Msg= 007 |").message(), Some("007"));
        assert_eq!(decode("STATUS=S,Code=7|").message(), None);
        assert_eq!(decode("no delimiter Msg=x").message(), None);
    }
}
