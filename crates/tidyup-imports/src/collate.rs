//! Locale-style string collation.
//!
//! A compact approximation of the root collation order, compared in three
//! levels:
//! - primary: whitespace and punctuation before digits, digits before
//!   letters; accented Latin letters weigh the same as their base letter
//! - secondary: unaccented before accented
//! - tertiary: case
//!
//! Other non-ASCII characters sort after the Latin letters by their
//! lowercase code point.
//!
//! Options mirror the usual collator knobs (sensitivity, numeric, case-first,
//! ignore-punctuation). Locale tags are validated but every supported tag
//! resolves to the root order.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Primary weights for ASCII, lowest first. Uppercase letters share the
/// weight of their lowercase form.
const ASCII_ORDER: &str = "\t\n\u{b}\u{c}\r _-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$0123456789abcdefghijklmnopqrstuvwxyz";

const DIGIT_WEIGHT: u32 = 38;
const NON_ASCII_BASE: u32 = 0x100;

/// Accented Latin letters by base letter. A letter's position in its group,
/// plus one, is its secondary weight.
const LATIN_ACCENTS: &[(char, &str)] = &[
    ('a', "áàăâǎåäãȧąāả"),
    ('c', "ćĉčċç"),
    ('d', "ďđ"),
    ('e', "éèĕêěëẽėȩęēẻ"),
    ('g', "ğĝǧġģ"),
    ('h', "ĥħ"),
    ('i', "íìĭîǐïĩįīỉı"),
    ('j', "ĵ"),
    ('k', "ķ"),
    ('l', "ĺľļłŀ"),
    ('n', "ńňñņ"),
    ('o', "óòŏôǒöőõøōỏ"),
    ('r', "ŕřŗ"),
    ('s', "śŝšşș"),
    ('t', "ťţțŧ"),
    ('u', "úùŭûǔůüűũųūủ"),
    ('w', "ŵẅ"),
    ('y', "ýỳŷÿỹ"),
    ('z', "źžż"),
];

static LOCALE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z]{4})?(-([A-Za-z]{2}|[0-9]{3}))?(-[A-Za-z0-9]{5,8})*(-u(-[A-Za-z0-9]{2,8})+)?$")
        .expect("locale tag pattern compiles")
});

/// Whether `tag` looks like a BCP 47 language tag.
pub fn is_valid_locale(tag: &str) -> bool {
    LOCALE_TAG.is_match(tag)
}

/// Which differences are significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Base letters only.
    Base,
    /// Base letters and accents.
    Accent,
    /// Base letters and case.
    Case,
    /// Everything.
    #[default]
    Variant,
}

/// Which case sorts first when strings differ only by case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseFirst {
    Upper,
    #[default]
    Lower,
    /// Locale default, lowercase first.
    #[serde(rename = "false")]
    False,
}

/// Options shared by everything that sorts by a string key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationOptions {
    pub locales: Vec<String>,
    pub sensitivity: Sensitivity,
    pub ignore_punctuation: bool,
    pub numeric: bool,
    pub case_first: CaseFirst,
    /// Partition keys into punctuation-led, lowercase-led and uppercase-led
    /// groups before comparing.
    pub case_groups: bool,
}

impl Default for CollationOptions {
    fn default() -> Self {
        CollationOptions {
            locales: vec!["en-US".to_string()],
            sensitivity: Sensitivity::Variant,
            ignore_punctuation: false,
            numeric: true,
            case_first: CaseFirst::Lower,
            case_groups: false,
        }
    }
}

impl CollationOptions {
    pub fn collator(&self) -> Collator {
        Collator {
            sensitivity: self.sensitivity,
            ignore_punctuation: self.ignore_punctuation,
            numeric: self.numeric,
            upper_first: self.case_first == CaseFirst::Upper,
        }
    }
}

// ============================================================================
// Collator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collator {
    sensitivity: Sensitivity,
    ignore_punctuation: bool,
    numeric: bool,
    upper_first: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element<'a> {
    Char { primary: u32, accent: u8, upper: bool },
    /// A run of ASCII digits with leading zeros stripped.
    Number(&'a str),
}

impl Element<'_> {
    fn primary_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Element::Char { primary: a, .. }, Element::Char { primary: b, .. }) => a.cmp(b),
            (Element::Number(a), Element::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Element::Number(_), Element::Char { primary, .. }) => {
                DIGIT_WEIGHT.cmp(primary).then(Ordering::Less)
            }
            (Element::Char { primary, .. }, Element::Number(_)) => {
                primary.cmp(&DIGIT_WEIGHT).then(Ordering::Greater)
            }
        }
    }

    fn accent(&self) -> u8 {
        match self {
            Element::Char { accent, .. } => *accent,
            Element::Number(_) => 0,
        }
    }

    fn upper(&self) -> bool {
        matches!(self, Element::Char { upper: true, .. })
    }
}

fn is_variable(ch: char) -> bool {
    !ch.is_alphanumeric()
}

/// Split an accented Latin letter into its base letter and accent weight.
fn fold_accent(ch: char) -> Option<(char, u8)> {
    LATIN_ACCENTS.iter().find_map(|(base, marked)| {
        marked
            .chars()
            .position(|c| c == ch)
            .map(|i| (*base, i as u8 + 1))
    })
}

fn weights(ch: char) -> (u32, u8, bool) {
    let lower = ch.to_lowercase().next().unwrap_or(ch);
    let upper = lower != ch;
    let (base, accent) = fold_accent(lower).unwrap_or((lower, 0));
    let primary = if base.is_ascii() {
        ASCII_ORDER
            .find(base)
            .map(|i| i as u32)
            .unwrap_or(NON_ASCII_BASE - 1)
    } else {
        NON_ASCII_BASE + base as u32
    };
    (primary, accent, upper)
}

impl Collator {
    fn elements<'a>(&self, s: &'a str) -> Vec<Element<'a>> {
        let mut out = Vec::with_capacity(s.len());
        let mut chars = s.char_indices().peekable();
        while let Some((i, ch)) = chars.next() {
            if self.numeric && ch.is_ascii_digit() {
                let mut end = i + 1;
                while let Some(&(j, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    end = j + 1;
                    chars.next();
                }
                let digits = s[i..end].trim_start_matches('0');
                out.push(Element::Number(if digits.is_empty() { "0" } else { digits }));
                continue;
            }
            if self.ignore_punctuation && is_variable(ch) {
                continue;
            }
            let (primary, accent, upper) = weights(ch);
            out.push(Element::Char {
                primary,
                accent,
                upper,
            });
        }
        out
    }

    /// Compare two strings.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let left = self.elements(a);
        let right = self.elements(b);

        for (x, y) in left.iter().zip(&right) {
            let ord = x.primary_cmp(y);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        let ord = left.len().cmp(&right.len());
        if ord != Ordering::Equal {
            return ord;
        }

        if matches!(self.sensitivity, Sensitivity::Accent | Sensitivity::Variant) {
            for (x, y) in left.iter().zip(&right) {
                let ord = x.accent().cmp(&y.accent());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }

        if matches!(self.sensitivity, Sensitivity::Base | Sensitivity::Accent) {
            return Ordering::Equal;
        }
        for (x, y) in left.iter().zip(&right) {
            match (x.upper(), y.upper()) {
                (false, true) if self.upper_first => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                (true, false) if self.upper_first => return Ordering::Less,
                (true, false) => return Ordering::Greater,
                _ => {}
            }
        }
        Ordering::Equal
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(items: &[&str], options: &CollationOptions) -> Vec<String> {
        let collator = options.collator();
        let mut out: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        out.sort_by(|a, b| collator.compare(a, b));
        out
    }

    mod ordering {
        use super::*;

        #[test]
        fn case_ties_break_lower_first() {
            let options = CollationOptions::default();
            assert_eq!(sorted(&["Ab", "ba", "Ba", "ab"], &options), ["ab", "Ab", "ba", "Ba"]);
        }

        #[test]
        fn case_first_upper() {
            let options = CollationOptions {
                case_first: CaseFirst::Upper,
                ..CollationOptions::default()
            };
            assert_eq!(sorted(&["ab", "Ab", "ba", "Ba"], &options), ["Ab", "ab", "Ba", "ba"]);
        }

        #[test]
        fn numeric_runs() {
            let options = CollationOptions::default();
            assert_eq!(sorted(&["a10", "a2", "a1"], &options), ["a1", "a2", "a10"]);
            let options = CollationOptions {
                numeric: false,
                ..CollationOptions::default()
            };
            assert_eq!(sorted(&["a2", "a10"], &options), ["a10", "a2"]);
        }

        #[test]
        fn punctuation_before_digits_before_letters() {
            let options = CollationOptions::default();
            assert_eq!(
                sorted(&["b", "1x", "@scope/a", "./a", "a"], &options),
                ["./a", "@scope/a", "1x", "a", "b"]
            );
        }

        #[test]
        fn prefix_sorts_first() {
            let collator = CollationOptions::default().collator();
            assert_eq!(collator.compare("foo", "foo/bar"), Ordering::Less);
            assert_eq!(collator.compare("", "a"), Ordering::Less);
        }

        #[test]
        fn accented_letters_sort_with_their_base() {
            let options = CollationOptions::default();
            assert_eq!(
                sorted(&["zod", "étoile", "f", "e", "Éclair", "eclair"], &options),
                ["e", "eclair", "Éclair", "étoile", "f", "zod"]
            );
            let collator = options.collator();
            assert_eq!(collator.compare("é", "É"), Ordering::Less);
            assert_eq!(collator.compare("e", "é"), Ordering::Less);
        }

        #[test]
        fn other_scripts_after_latin() {
            let collator = CollationOptions::default().collator();
            assert_eq!(collator.compare("z", "ж"), Ordering::Less);
            assert_eq!(collator.compare("ž", "ж"), Ordering::Less);
        }
    }

    mod sensitivity {
        use super::*;

        #[test]
        fn base_ignores_case() {
            let options = CollationOptions {
                sensitivity: Sensitivity::Base,
                ..CollationOptions::default()
            };
            assert_eq!(options.collator().compare("a", "A"), Ordering::Equal);
            assert_eq!(options.collator().compare("resume", "résumé"), Ordering::Equal);
        }

        #[test]
        fn accent_ignores_case_only() {
            let options = CollationOptions {
                sensitivity: Sensitivity::Accent,
                ..CollationOptions::default()
            };
            let collator = options.collator();
            assert_eq!(collator.compare("e", "E"), Ordering::Equal);
            assert_eq!(collator.compare("e", "é"), Ordering::Less);
        }

        #[test]
        fn case_ignores_accents_only() {
            let options = CollationOptions {
                sensitivity: Sensitivity::Case,
                ..CollationOptions::default()
            };
            let collator = options.collator();
            assert_eq!(collator.compare("e", "é"), Ordering::Equal);
            assert_eq!(collator.compare("e", "E"), Ordering::Less);
        }

        #[test]
        fn ignore_punctuation() {
            let options = CollationOptions {
                ignore_punctuation: true,
                ..CollationOptions::default()
            };
            assert_eq!(options.collator().compare("a-b", "ab"), Ordering::Equal);
            assert_eq!(options.collator().compare("_c", "b"), Ordering::Greater);
        }
    }

    #[test]
    fn digit_weight_matches_table() {
        assert_eq!(ASCII_ORDER.find('0'), Some(DIGIT_WEIGHT as usize));
    }

    #[test]
    fn locale_tags() {
        assert!(is_valid_locale("en"));
        assert!(is_valid_locale("en-US"));
        assert!(is_valid_locale("zh-Hant-TW"));
        assert!(is_valid_locale("de-u-co-phonebk"));
        assert!(!is_valid_locale("english please"));
        assert!(!is_valid_locale(""));
    }
}
