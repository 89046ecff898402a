//! # Error Types
//!
//! Every failure the compiler can report. A tablature file is short and meant
//! to be fixed by hand, so there is no recovery: the first error aborts the
//! whole compile and no output is produced.
//!
//! Line numbers are 1-based and refer to the source file as written
//! (blank lines and comments included).
//!
//! ## Usage
//! ```rust
//! use gaspar::{parse, TabError};
//!
//! match parse("P-1\nS-\n1-]") {
//!     Err(TabError::UnmatchedSlur { line, course }) => {
//!         assert_eq!((line, course), (3, 1));
//!     }
//!     other => panic!("unexpected: {:?}", other.map(|_| ())),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// A directive whose argument is missing, non-numeric or out of range.
    ///
    /// # Example
    /// ```
    /// # use gaspar::TabError;
    /// let err = TabError::MalformedDirective {
    ///     line: 4,
    ///     directive: "SLOTS".to_string(),
    ///     message: "expected a number, found 'many'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Malformed SLOTS directive at line 4: expected a number, found 'many'");
    /// ```
    #[error("Malformed {directive} directive at line {line}: {message}")]
    MalformedDirective {
        line: usize,
        directive: String,
        message: String,
    },

    /// A note token that is not `<course>-<fret>`.
    #[error("Malformed note '{token}' at line {line}")]
    MalformedNote { line: usize, token: String },

    /// A course number outside `1..=courses` for the stave being written.
    #[error("Course {course} at line {line} is out of range (stave has {courses} courses)")]
    CourseOutOfRange {
        line: usize,
        course: usize,
        courses: usize,
    },

    /// A slur close marker (`]`) with no open marker (`[`) before it.
    #[error("Slur closed on course {course} at line {line} without a matching open")]
    UnmatchedSlur { line: usize, course: usize },

    /// Page content (a stave, title or composer) before the first `P-` line.
    #[error("'{directive}' at line {line} needs a page; start one with P-<n>")]
    NoPage { line: usize, directive: String },

    /// Stave content (notes, barlines, annotations) before an `S-` line on the current page.
    #[error("'{directive}' at line {line} needs a stave; start one with S-")]
    NoStave { line: usize, directive: String },

    /// Margins leave no horizontal room for a stave.
    #[error("Stave on page {page} has non-positive length {length}; check the page width and margins")]
    DegenerateStave { page: u32, length: f64 },

    #[error("Cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialise document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
