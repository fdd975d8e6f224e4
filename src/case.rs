//! Camel-case to kebab/snake conversion.
//!
//! Breakpoint names are declared in camel case (`extraSmall`) but appear in
//! file names and CSS variables in kebab case (`extra-small`). Conversion
//! runs two boundary rules in order:
//!
//! 1. acronym boundary: `([A-Z]+)([A-Z][a-z]|[0-9])`, e.g. `HTMLParser` → `HTML-Parser`
//! 2. word boundary: `([a-z0-9])([A-Z])`, e.g. `extraSmall` → `extra-Small`
//!
//! and lowercases the result. Conversion never fails: if a pattern cannot be
//! compiled the input is only lowercased.

use regex::Regex;
use std::sync::LazyLock;

static ACRONYM_BOUNDARY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new("([A-Z]+)([A-Z][a-z]|[0-9])").ok());

static WORD_BOUNDARY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").ok());

/// Word delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// `extra-small`
    Kebab,
    /// `extra_small`
    Snake,
}

impl CaseStyle {
    pub fn delimiter(self) -> char {
        match self {
            CaseStyle::Kebab => '-',
            CaseStyle::Snake => '_',
        }
    }
}

/// Convert a camel-case identifier to the given style.
///
/// ```
/// # use responsive_images::case::{change_case, CaseStyle};
/// assert_eq!(change_case("extraSmall", CaseStyle::Kebab), "extra-small");
/// assert_eq!(change_case("extraSmall", CaseStyle::Snake), "extra_small");
/// ```
pub fn change_case(identifier: &str, style: CaseStyle) -> String {
    match (ACRONYM_BOUNDARY.as_ref(), WORD_BOUNDARY.as_ref()) {
        (Some(acronym), Some(word)) => {
            // Braced group refs: `$1_` would otherwise parse as a group named "1_".
            let template = format!("${{1}}{}${{2}}", style.delimiter());
            let split = acronym.replace_all(identifier, template.as_str());
            word.replace_all(&split, template.as_str()).to_lowercase()
        }
        _ => identifier.to_lowercase(),
    }
}
