//
// pgpmac database seeding tools
// Copyright (C) 2013 Keith Brister
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

//! Parsed document model and the line scanner that builds it.

use std::mem;

use indexmap::IndexMap;

use crate::error::LookupError;

/// Name of the implicit section holding pairs that appear before the
/// first bracketed header. Always lowercase, under either case policy.
pub const DEFAULT_SECTION: &str = "default";

/// How section and option names are normalized for storage and lookup.
///
/// The MD2 hardware files are matched case insensitively, so [`Fold`]
/// is the default. [`Preserve`] exists for files whose producers are
/// known to be consistent about case.
///
/// [`Fold`]: CasePolicy::Fold
/// [`Preserve`]: CasePolicy::Preserve
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    /// Lowercase section names and option keys, both when storing and on
    /// every lookup. Option values are never folded.
    #[default]
    Fold,
    /// Store and match names exactly as written.
    Preserve,
}

impl CasePolicy {
    fn apply(self, name: &str) -> String {
        match self {
            CasePolicy::Fold => name.to_lowercase(),
            CasePolicy::Preserve => name.to_owned(),
        }
    }
}

type OptionMap = IndexMap<String, String>;

/// Immutable result of parsing one INI source.
///
/// Built in a single pass by [`parse_str`](Self::parse_str) or
/// [`IniFile::parse`](crate::IniFile::parse); read-only afterwards.
#[derive(Debug, Clone)]
pub struct IniDocument {
    policy: CasePolicy,
    sections: IndexMap<String, OptionMap>,
}

impl IniDocument {
    /// Parses `text` under `policy`.
    ///
    /// Never fails: lines that are neither comments, section headers nor
    /// well-formed `key = value` pairs are dropped. In particular a line
    /// with more than one `=` is dropped whole; downstream files rely on
    /// such lines being ignored rather than erroring.
    pub fn parse_str(text: &str, policy: CasePolicy) -> Self {
        let mut sections: IndexMap<String, OptionMap> = IndexMap::new();
        let mut current_name = DEFAULT_SECTION.to_owned();
        let mut current = OptionMap::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            // Section header: `[` in the first column with a `]` closing a
            // non-empty name. Anything after the `]` is ignored. A second
            // header with the same name replaces the earlier section.
            let header = line
                .strip_prefix('[')
                .and_then(|rest| rest.find(']').filter(|&end| end > 0).map(|end| &rest[..end]));
            if let Some(name) = header {
                let committed = mem::replace(&mut current_name, policy.apply(name));
                sections.insert(committed, mem::take(&mut current));
                continue;
            }

            // Key-value candidate. An inline comment is cut off first;
            // the remainder must contain exactly one `=` and it must not
            // be the first character.
            let body = match line.find(';') {
                Some(i) => line[..i].trim_end(),
                None => line,
            };
            if let Some((key, value)) = body.split_once('=') {
                if key.is_empty() || value.contains('=') {
                    continue;
                }
                current.insert(policy.apply(key.trim()), value.trim().to_owned());
            }
        }

        // The in-progress section is committed even when empty, so the
        // `default` section is always present.
        sections.insert(current_name, current);

        Self { policy, sections }
    }

    /// Case policy this document was parsed under.
    pub fn policy(&self) -> CasePolicy {
        self.policy
    }

    /// All section names except the implicit [`DEFAULT_SECTION`].
    ///
    /// The order is an implementation detail; callers must not rely on it.
    pub fn sections(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.keys().map(String::as_str).filter(|name| *name != DEFAULT_SECTION)
    }

    /// Option names present in `section`.
    pub fn options<'a>(
        &'a self,
        section: &str,
    ) -> Result<impl Iterator<Item = &'a str> + 'a, LookupError> {
        self.sections
            .get(&self.policy.apply(section))
            .map(|options| options.keys().map(String::as_str))
            .ok_or_else(|| LookupError::UnknownSection(section.to_owned()))
    }

    /// Whether `section` is in the document.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&self.policy.apply(section))
    }

    /// Whether `option` is in `section`. False, not an error, when the
    /// section itself is absent.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.sections
            .get(&self.policy.apply(section))
            .is_some_and(|options| options.contains_key(&self.policy.apply(option)))
    }

    /// The stored value of `option` in `section`.
    pub fn get(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        let options = self
            .sections
            .get(&self.policy.apply(section))
            .ok_or_else(|| LookupError::UnknownSection(section.to_owned()))?;
        options.get(&self.policy.apply(option)).map(String::as_str).ok_or_else(|| {
            LookupError::UnknownOption { section: section.to_owned(), option: option.to_owned() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> IniDocument {
        IniDocument::parse_str(text, CasePolicy::Fold)
    }

    #[test]
    fn headerless_input_lands_in_default_section() {
        let doc = parse("a = 1\nb = 2\n");

        assert_eq!(doc.sections().count(), 0);
        assert!(doc.has_section(DEFAULT_SECTION));
        assert_eq!(doc.get(DEFAULT_SECTION, "a"), Ok("1"));
        assert_eq!(doc.get(DEFAULT_SECTION, "b"), Ok("2"));
    }

    #[test]
    fn empty_input_still_has_default_section() {
        let doc = parse("");

        assert!(doc.has_section(DEFAULT_SECTION));
        assert_eq!(doc.options(DEFAULT_SECTION).unwrap().count(), 0);
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let doc = parse("[m]\nspeed = 10\nspeed = 20\n");

        assert_eq!(doc.get("m", "speed"), Ok("20"));
        assert_eq!(doc.options("m").unwrap().count(), 1);
    }

    #[test]
    fn duplicate_section_header_replaces_earlier_section() {
        let doc = parse("[m]\na = 1\n[other]\nx = 9\n[m]\nb = 2\n");

        assert!(!doc.has_option("m", "a"));
        assert_eq!(doc.get("m", "b"), Ok("2"));
        assert_eq!(doc.get("other", "x"), Ok("9"));
    }

    #[test]
    fn blank_and_whitespace_lines_are_ignored() {
        let doc = parse("\n   \n\t\n[m]\n\n  k = v  \n   \n");

        assert_eq!(doc.get("m", "k"), Ok("v"));
    }

    #[test]
    fn full_line_comment_is_dropped_even_with_equals() {
        let doc = parse("[m]\n; speed = 99\n   ; also = dropped\nk = v\n");

        assert!(!doc.has_option("m", "speed"));
        assert!(!doc.has_option("m", "also"));
        assert_eq!(doc.options("m").unwrap().count(), 1);
    }

    #[test]
    fn inline_comment_is_stripped_from_value() {
        let doc = parse("[m]\nkey=value;trailing = junk\n");

        assert_eq!(doc.get("m", "key"), Ok("value"));
    }

    #[test]
    fn two_equal_signs_drop_the_line() {
        let doc = parse("[m]\na=b=c\nk = v\n");

        assert!(!doc.has_option("m", "a"));
        assert_eq!(doc.get("m", "k"), Ok("v"));
    }

    #[test]
    fn equals_in_inline_comment_does_not_count() {
        // The comment is cut before the single-`=` rule is applied.
        let doc = parse("[m]\nhome = #1$ ; M401=1 then B1R\n");

        assert_eq!(doc.get("m", "home"), Ok("#1$"));
    }

    #[test]
    fn leading_equals_drops_the_line() {
        let doc = parse("[m]\n= nothing\n");

        assert_eq!(doc.options("m").unwrap().count(), 0);
    }

    #[test]
    fn line_without_equals_is_dropped() {
        let doc = parse("[m]\njust some words\nk = v\n");

        assert_eq!(doc.options("m").unwrap().count(), 1);
    }

    #[test]
    fn empty_value_is_kept() {
        let doc = parse("[m]\nk =\n");

        assert_eq!(doc.get("m", "k"), Ok(""));
    }

    #[test]
    fn malformed_headers_do_not_open_sections() {
        // `[]` has no name and `[x` never closes; neither parses as a
        // key-value pair either, so both vanish.
        let doc = parse("[]\n[x\nk = v\n");

        assert_eq!(doc.sections().count(), 0);
        assert_eq!(doc.get(DEFAULT_SECTION, "k"), Ok("v"));
    }

    #[test]
    fn header_trailing_text_is_ignored() {
        let doc = parse("[Section] ; zoom table\nk = v\n");

        assert_eq!(doc.get("section", "k"), Ok("v"));
    }

    #[test]
    fn dotted_section_names_are_opaque() {
        let doc = parse("[PHIAxisXYZTable.PHIXMotor]\nMotorNumber = 2\n");

        assert!(doc.has_section("phiaxisxyztable.phixmotor"));
        assert!(!doc.has_section("phiaxisxyztable"));
    }

    #[test]
    fn fold_policy_matches_any_case() {
        let doc = parse("[Section]\nKEY = v\n");

        assert_eq!(doc.get("section", "key"), Ok("v"));
        assert!(doc.has_option("SECTION", "Key"));
        assert_eq!(doc.sections().collect::<Vec<_>>(), ["section"]);
    }

    #[test]
    fn fold_policy_leaves_values_alone() {
        let doc = parse("[m]\naxis = X\nmoveMode = freeRotation\n");

        assert_eq!(doc.get("m", "AXIS"), Ok("X"));
        assert_eq!(doc.get("m", "movemode"), Ok("freeRotation"));
    }

    #[test]
    fn preserve_policy_matches_exactly() {
        let doc = IniDocument::parse_str("[Section]\nKey = v\n", CasePolicy::Preserve);

        assert!(doc.has_section("Section"));
        assert!(!doc.has_section("section"));
        assert!(doc.has_option("Section", "Key"));
        assert!(!doc.has_option("Section", "key"));
        assert_eq!(doc.get("Section", "Key"), Ok("v"));
    }

    #[test]
    fn centring_table_reference_values() {
        let doc = parse("[CentringXYTable]\nPhiReference = 228.5\n");

        assert!(doc.has_section("centringxytable"));
        assert_eq!(doc.get("centringxytable", "phireference"), Ok("228.5"));
    }

    #[test]
    fn lookup_failures_are_typed() {
        let doc = parse("[m]\nk = v\n");

        assert_eq!(doc.get("nope", "k"), Err(LookupError::UnknownSection("nope".to_owned())));
        assert_eq!(
            doc.get("m", "missing"),
            Err(LookupError::UnknownOption {
                section: "m".to_owned(),
                option: "missing".to_owned()
            })
        );
        assert!(doc.options("nope").is_err());
        assert!(!doc.has_option("nope", "k"));
    }

    #[test]
    fn values_keep_internal_whitespace() {
        let doc = parse("[m]\nname = Front Light Intensity\n");

        assert_eq!(doc.get("m", "name"), Ok("Front Light Intensity"));
    }
}
