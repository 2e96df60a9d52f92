//! Harness configuration.
//!
//! By default only the type groups and presentation letters the reference
//! engine is known to agree on are enabled, failures are collected rather
//! than aborting, and subjects are waited on without a bound.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Run configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Test the `bool` type group.
    pub include_bool: bool,
    /// Test the `char` and `unsigned char` type groups.
    pub include_char: bool,
    /// Test `std::int8_t` and `std::uint8_t`.
    pub include_8bit: bool,
    /// Prepend the basic forms (`{}`, `{0}`, ...) to the float specifiers.
    pub float_basic_formats: bool,
    /// Stop the run at the first failing case.
    pub abort_on_first_failure: bool,
    /// Send reference-rejected cases to the subject and expect a non-zero
    /// exit instead of skipping them.
    pub dispatch_rejected: bool,
    /// Include the precision axis in float specifiers.
    pub float_precision_axis: bool,
    /// Presentation letters to compose.
    pub presentation: Presentation,
    /// Bounded wait per subject process, in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            include_bool: false,
            include_char: false,
            include_8bit: false,
            float_basic_formats: false,
            abort_on_first_failure: false,
            dispatch_rejected: false,
            float_precision_axis: true,
            presentation: Presentation::Restricted,
            timeout_ms: None,
        }
    }
}

impl HarnessConfig {
    /// Parse a configuration from JSON; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|source| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Which table of presentation-type letters the composer draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// Letters the reference engine supports for each kind.
    #[default]
    Restricted,
    /// Every letter the subject understands.
    Full,
}

/// Presentation-type letters per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationTypes {
    pub char_types: &'static [&'static str],
    /// Integer letters other than `d`.
    pub nondec_types: &'static [&'static str],
    pub int_types: &'static [&'static str],
    pub float_types: &'static [&'static str],
    pub str_types: &'static [&'static str],
}

const RESTRICTED: PresentationTypes = PresentationTypes {
    char_types: &[],
    nondec_types: &["b", "o", "x"],
    int_types: &["b", "o", "x", "d"],
    // General float presentation stays out: the subject keeps trailing zeros.
    float_types: &["e", "E", "f", "F", "%"],
    str_types: &["s"],
};

const FULL: PresentationTypes = PresentationTypes {
    char_types: &["c"],
    nondec_types: &["b", "B", "o", "O", "x", "X"],
    int_types: &["b", "B", "d", "o", "O", "x", "X"],
    float_types: &["e", "E", "f", "F", "g", "G", "%", "a", "A"],
    str_types: &["s", "S"],
};

impl Presentation {
    #[must_use]
    pub const fn types(self) -> &'static PresentationTypes {
        match self {
            Self::Restricted => &RESTRICTED,
            Self::Full => &FULL,
        }
    }
}
