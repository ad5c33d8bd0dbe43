//! Argument pipe micro-syntax: `main || piped1 || piped2`.

use std::collections::VecDeque;

/// Separator between the main arguments and piped segments.
pub const PIPE_SEPARATOR: &str = "||";

/// Invocation arguments split into the main segment and piped segments.
///
/// Piped segments are consumed left to right, first by parallel expansion
/// and then by command-style return items.
///
/// # Examples
///
/// ```
/// use taskchain::session::domain::InvocationArguments;
///
/// let arguments = InvocationArguments::parse(" fix the parser || tests ||docs ");
/// assert_eq!(arguments.main(), "fix the parser");
/// assert_eq!(arguments.piped(), ["tests", "docs"]);
/// assert!(arguments.is_piped());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationArguments {
    main: String,
    piped: Vec<String>,
}

impl InvocationArguments {
    /// Splits raw arguments on `||`, trimming every segment.
    ///
    /// Blank piped segments are discarded.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.split(PIPE_SEPARATOR).map(str::trim);
        let main = segments.next().unwrap_or_default().to_owned();
        let piped = segments
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Self { main, piped }
    }

    /// Returns the main segment.
    #[must_use]
    pub fn main(&self) -> &str {
        &self.main
    }

    /// Returns the piped segments in order.
    #[must_use]
    pub fn piped(&self) -> &[String] {
        &self.piped
    }

    /// Returns `true` when at least one piped segment was supplied.
    #[must_use]
    pub fn is_piped(&self) -> bool {
        !self.piped.is_empty()
    }

    /// Consumes the arguments, returning the main segment and the pipe
    /// queue.
    #[must_use]
    pub fn into_parts(self) -> (String, VecDeque<String>) {
        (self.main, self.piped.into())
    }
}
