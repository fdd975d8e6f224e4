//! Breakpoint buckets for responsive variants.
//!
//! The buckets follow "natural" CSS breakpoints. Each class is defined by its
//! upper bound (the longer edge a variant is resized to) and a minimum width
//! (the viewport width from which the variant is served):
//!
//! ```text
//! extraSmall     0 ..  600
//! small        600 ..  900
//! normal       900 .. 1200
//! large       1200 .. 1800
//! ```
//!
//! There is no extra-large class: variants are defined by an upper bound,
//! which an open-ended class does not have.

use crate::case::{CaseStyle, change_case};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeClass {
    ExtraSmall,
    Small,
    Normal,
    Large,
}

impl SizeClass {
    /// All classes, ordered by upper bound.
    pub const ALL: [SizeClass; 4] = [
        SizeClass::ExtraSmall,
        SizeClass::Small,
        SizeClass::Normal,
        SizeClass::Large,
    ];

    /// Camel-case name, as used in config files.
    pub fn name(self) -> &'static str {
        match self {
            SizeClass::ExtraSmall => "extraSmall",
            SizeClass::Small => "small",
            SizeClass::Normal => "normal",
            SizeClass::Large => "large",
        }
    }

    pub fn min_width(self) -> u32 {
        match self {
            SizeClass::ExtraSmall => 0,
            SizeClass::Small => 600,
            SizeClass::Normal => 900,
            SizeClass::Large => 1200,
        }
    }

    pub fn upper_bound(self) -> u32 {
        match self {
            SizeClass::ExtraSmall => 600,
            SizeClass::Small => 900,
            SizeClass::Normal => 1200,
            SizeClass::Large => 1800,
        }
    }

    /// Suffix appended to generated file names, e.g. `extra-small`.
    pub fn file_suffix(self) -> String {
        change_case(self.name(), CaseStyle::Kebab)
    }

    /// Tightest class whose upper bound fits the longer of the two dimensions.
    ///
    /// Dimensions beyond the largest bound fall back to
    /// [`SizeClass::ExtraSmall`], not to [`SizeClass::Large`].
    pub fn classify(dimensions: (u32, u32)) -> SizeClass {
        let longer = dimensions.0.max(dimensions.1);
        Self::ALL
            .iter()
            .copied()
            .filter(|class| longer <= class.upper_bound())
            .min_by_key(|class| class.upper_bound())
            .unwrap_or(SizeClass::ExtraSmall)
    }

    /// Classify a single bound, used as both width and height.
    pub fn from_upper_bound(bound: u32) -> SizeClass {
        Self::classify((bound, bound))
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
