use thiserror::Error;

// ---------------------------------------------------------------------------
// Library error type
// ---------------------------------------------------------------------------

/// Everything that can go wrong while building a chart or bootstrapping a page.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    /// A dataset carried a year key that is not an integer, or a value that
    /// is not a finite number.
    #[error("invalid dataset '{label}': {reason}")]
    InvalidDataset { label: String, reason: String },

    /// None of the datasets carries a single year.
    #[error("no dataset contains any year")]
    NoYears,

    /// Padding a short axis would step outside the representable year range.
    #[error("year {0} is too close to the lower bound of the year range")]
    YearOutOfRange(i32),

    /// The years span more than [`MAX_YEAR_SPAN`](crate::data::normalize::MAX_YEAR_SPAN)
    /// labels; densifying them would allocate one point per year.
    #[error("years {min}–{max} span too many labels to densify")]
    YearSpanTooLarge { min: i32, max: i32 },

    /// The element that should host the canvas does not exist.
    #[error("container element '{0}' not found")]
    MissingContainer(String),

    /// The location fragment names an element that does not exist.
    #[error("fragment target '#{0}' not found")]
    MissingFragmentTarget(String),

    /// The rendering collaborator rejected the configuration.
    #[error("render failed: {0}")]
    Render(String),
}

impl ChartError {
    pub(crate) fn invalid(label: &str, reason: impl Into<String>) -> Self {
        ChartError::InvalidDataset {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}
