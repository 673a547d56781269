//! Board configuration.

/// Limits applied to UI-local edits and assignment notes.
///
/// # Examples
///
/// ```
/// use esg_taskboard::board::services::BoardConfig;
///
/// let config = BoardConfig::default();
/// assert!(!config.allow_empty_title);
///
/// let lenient = BoardConfig::lenient();
/// assert!(lenient.allow_empty_title);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Maximum task title length in characters.
    pub max_title_length: usize,
    /// Maximum task description length in characters.
    pub max_description_length: usize,
    /// Maximum assignment notes length in characters.
    pub max_notes_length: usize,
    /// Whether an edit may clear the task title.
    pub allow_empty_title: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_title_length: 500,
            max_description_length: 10_000,
            max_notes_length: 2_000,
            allow_empty_title: false,
        }
    }
}

impl BoardConfig {
    /// Creates a lenient configuration that allows empty titles.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            allow_empty_title: true,
            ..Default::default()
        }
    }

    /// Creates a strict configuration with reduced limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_title_length: 120,
            max_description_length: 2_000,
            max_notes_length: 500,
            allow_empty_title: false,
        }
    }
}
