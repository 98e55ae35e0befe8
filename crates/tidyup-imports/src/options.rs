//! Rule options and their validation.
//!
//! Options arrive as JSON values (the shape a host passes to a lint rule) and
//! are checked by strict deserialization before any analysis runs: unknown
//! fields, unknown enum values, malformed globs and malformed locale tags are
//! all rejected with [`LintError::InvalidOptions`].

use globset::{GlobBuilder, GlobMatcher};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ast::Declaration;
use crate::classify::{classify, ModuleClass, DEFAULT_INTERNAL_PREFIXES};
use crate::collate::{is_valid_locale, CaseFirst, CollationOptions, Sensitivity};
use crate::error::LintError;
use crate::rules::{GROUP_IMPORTS, SORT_IMPORTS};

fn parse<T: DeserializeOwned>(rule: &str, value: &Value) -> Result<T, LintError> {
    T::deserialize(value).map_err(|e| LintError::invalid_options(rule, e.to_string()))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// ============================================================================
// Group options
// ============================================================================

/// Which declarations a slot admits by their type-only flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Type-only and value declarations.
    #[default]
    Include,
    /// Value declarations only.
    Exclude,
    /// Type-only declarations only.
    Only,
}

impl TypeFilter {
    pub fn admits(&self, type_only: bool) -> bool {
        match self {
            TypeFilter::Include => true,
            TypeFilter::Exclude => !type_only,
            TypeFilter::Only => type_only,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawGroupOptions {
    Slots(Vec<RawSlot>),
    Object(RawGroupObject),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawGroupObject {
    #[serde(default)]
    groups: Vec<RawSlot>,
    internal_prefixes: Option<Vec<String>>,
    #[serde(default)]
    exports: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Merged(Vec<RawMatcher>),
    Single(RawMatcher),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMatcher {
    Prefix(String),
    Path(RawPath),
    Pattern(RawPattern),
    Class(RawClass),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPath {
    path: String,
    #[serde(default)]
    types: TypeFilter,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPattern {
    pattern: String,
    #[serde(default)]
    types: TypeFilter,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClass {
    class: ModuleClass,
    #[serde(default)]
    types: TypeFilter,
}

/// One way of matching a declaration to a group slot.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Module path starts with this string, for any declaration.
    Prefix(String),
    /// Module path starts with `path`.
    Path { path: String, types: TypeFilter },
    /// Module path matches a glob.
    Pattern {
        pattern: String,
        glob: GlobMatcher,
        types: TypeFilter,
    },
    /// Module path is of this class.
    Class { class: ModuleClass, types: TypeFilter },
}

impl Matcher {
    fn compile(raw: RawMatcher) -> Result<Self, LintError> {
        Ok(match raw {
            RawMatcher::Prefix(prefix) => Matcher::Prefix(prefix),
            RawMatcher::Path(RawPath { path, types }) => Matcher::Path { path, types },
            RawMatcher::Pattern(RawPattern { pattern, types }) => {
                let glob = GlobBuilder::new(&pattern)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| {
                        LintError::invalid_options(GROUP_IMPORTS, format!("bad pattern `{pattern}`: {e}"))
                    })?
                    .compile_matcher();
                Matcher::Pattern {
                    pattern,
                    glob,
                    types,
                }
            }
            RawMatcher::Class(RawClass { class, types }) => Matcher::Class { class, types },
        })
    }

    /// Explicit path match. Class matchers never match here.
    fn matches_path(&self, path: &str, type_only: bool) -> bool {
        match self {
            Matcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
            Matcher::Path { path: prefix, types } => {
                path.starts_with(prefix.as_str()) && types.admits(type_only)
            }
            Matcher::Pattern { glob, types, .. } => glob.is_match(path) && types.admits(type_only),
            Matcher::Class { .. } => false,
        }
    }

    fn matches_class(&self, class: ModuleClass, type_only: bool) -> bool {
        match self {
            Matcher::Class {
                class: expected,
                types,
            } => *expected == class && types.admits(type_only),
            _ => false,
        }
    }
}

/// One configured group: a single matcher, or several merged into one slot.
#[derive(Debug, Clone)]
pub struct GroupSlot {
    pub matchers: Vec<Matcher>,
    merged: bool,
}

impl GroupSlot {
    fn single(matcher: Matcher) -> Self {
        GroupSlot {
            matchers: vec![matcher],
            merged: false,
        }
    }

    /// Label used in messages: the uppercase class for class slots,
    /// `custom` otherwise.
    pub fn label(&self) -> String {
        match self.matchers.as_slice() {
            [Matcher::Class { class, .. }] if !self.merged => class.label().to_string(),
            _ => "custom".to_string(),
        }
    }
}

/// Validated `group-imports` options.
#[derive(Debug, Clone)]
pub struct GroupOptions {
    pub groups: Vec<GroupSlot>,
    pub internal_prefixes: Vec<String>,
    /// Also group re-exports.
    pub exports: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        GroupOptions {
            groups: default_groups(),
            internal_prefixes: DEFAULT_INTERNAL_PREFIXES.iter().map(|p| p.to_string()).collect(),
            exports: false,
        }
    }
}

fn default_groups() -> Vec<GroupSlot> {
    ModuleClass::DEFAULT_ORDER
        .iter()
        .map(|&class| {
            GroupSlot::single(Matcher::Class {
                class,
                types: TypeFilter::Include,
            })
        })
        .collect()
}

fn compile_slots(raw: Vec<RawSlot>) -> Result<Vec<GroupSlot>, LintError> {
    raw.into_iter()
        .map(|slot| match slot {
            RawSlot::Single(matcher) => Matcher::compile(matcher).map(GroupSlot::single),
            RawSlot::Merged(matchers) => Ok(GroupSlot {
                matchers: matchers
                    .into_iter()
                    .map(Matcher::compile)
                    .collect::<Result<_, _>>()?,
                merged: true,
            }),
        })
        .collect()
}

impl GroupOptions {
    /// Validate and compile options. `null` and `[]` select the defaults.
    pub fn from_value(value: &Value) -> Result<Self, LintError> {
        if is_empty(value) {
            return Ok(GroupOptions::default());
        }
        let defaults = GroupOptions::default();
        match parse::<RawGroupOptions>(GROUP_IMPORTS, value)? {
            RawGroupOptions::Slots(slots) => Ok(GroupOptions {
                groups: compile_slots(slots)?,
                ..defaults
            }),
            RawGroupOptions::Object(object) => Ok(GroupOptions {
                groups: if object.groups.is_empty() {
                    defaults.groups
                } else {
                    compile_slots(object.groups)?
                },
                internal_prefixes: object
                    .internal_prefixes
                    .unwrap_or(defaults.internal_prefixes),
                exports: object.exports,
            }),
        }
    }

    /// Index of the slot a declaration belongs to. Declarations matching no
    /// slot, and declarations without a literal source, go to the implicit
    /// catch-all slot at `groups.len()`.
    pub fn group_index(&self, decl: &Declaration) -> usize {
        let catch_all = self.groups.len();
        let Some(path) = decl.source_path() else {
            return catch_all;
        };
        let type_only = decl.type_only;

        let explicit = self
            .groups
            .iter()
            .position(|slot| slot.matchers.iter().any(|m| m.matches_path(path, type_only)));
        if let Some(index) = explicit {
            return index;
        }

        let class = classify(path, &self.internal_prefixes);
        self.groups
            .iter()
            .position(|slot| slot.matchers.iter().any(|m| m.matches_class(class, type_only)))
            .unwrap_or(catch_all)
    }

    /// Slot labels joined for messages.
    pub fn labels(&self) -> String {
        self.groups
            .iter()
            .map(GroupSlot::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Sort options
// ============================================================================

/// Which name a specifier is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKey {
    /// The name in the source module.
    #[default]
    Source,
    /// The local or exported alias.
    Rename,
}

/// Where type-only declarations go within a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypesInGroup {
    #[default]
    Ignore,
    Top,
    Bottom,
    /// Directly above value declarations of the same source.
    AboveValue,
    /// Directly below value declarations of the same source.
    BelowValue,
}

/// Where inline type specifiers go within a declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineTypes {
    #[default]
    Ignore,
    Start,
    #[serde(alias = "End")]
    End,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Locales {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawSortOptions {
    locales: Option<Locales>,
    sensitivity: Option<Sensitivity>,
    ignore_punctuation: Option<bool>,
    numeric: Option<bool>,
    case_first: Option<CaseFirst>,
    case_groups: Option<bool>,
    specifier: Option<SpecifierKey>,
    sort_exports: Option<bool>,
    types_in_group: Option<TypesInGroup>,
    inline_types: Option<InlineTypes>,
}

/// Validated `sort-imports` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    pub collation: CollationOptions,
    pub specifier: SpecifierKey,
    pub sort_exports: bool,
    pub types_in_group: TypesInGroup,
    pub inline_types: InlineTypes,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            collation: CollationOptions::default(),
            specifier: SpecifierKey::Source,
            sort_exports: true,
            types_in_group: TypesInGroup::Ignore,
            inline_types: InlineTypes::Ignore,
        }
    }
}

impl SortOptions {
    /// Validate options. `null` and `[]` select the defaults; a one-element
    /// array is unwrapped.
    pub fn from_value(value: &Value) -> Result<Self, LintError> {
        let raw: RawSortOptions = match value {
            v if is_empty(v) => RawSortOptions::default(),
            Value::Array(items) if items.len() == 1 => parse(SORT_IMPORTS, &items[0])?,
            other => parse(SORT_IMPORTS, other)?,
        };

        let defaults = SortOptions::default();
        let locales = match raw.locales {
            None => defaults.collation.locales.clone(),
            Some(Locales::One(tag)) => vec![tag],
            Some(Locales::Many(tags)) => tags,
        };
        if let Some(bad) = locales.iter().find(|tag| !is_valid_locale(tag)) {
            return Err(LintError::invalid_options(
                SORT_IMPORTS,
                format!("invalid locale tag `{bad}`"),
            ));
        }

        let base = defaults.collation;
        Ok(SortOptions {
            collation: CollationOptions {
                locales,
                sensitivity: raw.sensitivity.unwrap_or(base.sensitivity),
                ignore_punctuation: raw.ignore_punctuation.unwrap_or(base.ignore_punctuation),
                numeric: raw.numeric.unwrap_or(base.numeric),
                case_first: raw.case_first.unwrap_or(base.case_first),
                case_groups: raw.case_groups.unwrap_or(base.case_groups),
            },
            specifier: raw.specifier.unwrap_or(defaults.specifier),
            sort_exports: raw.sort_exports.unwrap_or(defaults.sort_exports),
            types_in_group: raw.types_in_group.unwrap_or(defaults.types_in_group),
            inline_types: raw.inline_types.unwrap_or(defaults.inline_types),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
