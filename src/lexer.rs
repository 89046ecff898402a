//! # Lexer
//!
//! Classifies each source line into one [`LineToken`]. Lines are trimmed and
//! matched against an ordered rule table and the first rule that matches
//! wins. Matching is case-sensitive. A line no rule matches becomes
//! [`LineToken::Ignored`].
//!
//! The lexer does not validate arguments. `SLOTS many` is a
//! `Setting(Slots, "many")` token and the parser reports the bad number.

use crate::config::{Flag, Setting};
use crate::glyph::{BarlineKind, Duration};
use log::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum LineToken {
    /// `P-<n>`: the text after `P-`.
    Page(String),
    Stave,
    /// `T-...`: the text after `T-`.
    TimeSignature(String),
    /// Any barline except the barberpole, with the text after the dash as label.
    Barline(BarlineKind, String),
    /// `BP-` or `BP-<c1>-<c2>`: the text after `BP-`.
    Barberpole(String),
    /// A line of note tokens, optionally led by a duration.
    Notes {
        duration: Option<(Duration, bool)>,
        notes: String,
    },
    Strum(String),
    Alfabeto(String),
    Section,
    Title(String),
    Composer(String),
    /// An empty line.
    Space,
    Setting(Setting, String),
    Courses(String),
    Flag(Flag),
    FretMap(String),
    Comment,
    Ignored,
}

/// A token with the 1-based source line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedToken {
    pub token: LineToken,
    pub line: usize,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// The line starts with this text.
    Prefix(&'static str),
    /// The line is empty after trimming.
    Empty,
    /// The line starts with an ASCII digit.
    LeadingDigit,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Page,
    Stave,
    TimeSignature,
    Barline(BarlineKind),
    Barberpole,
    Duration(Duration, bool),
    Strum,
    Alfabeto,
    Section,
    Title,
    Composer,
    Space,
    Notes,
    Setting(Setting),
    Courses,
    Flag(Flag),
    FretMap,
    Comment,
}

const RULES: &[(Pattern, Rule)] = &[
    (Pattern::Prefix("P-"), Rule::Page),
    (Pattern::Prefix("S-"), Rule::Stave),
    (Pattern::Prefix("T-"), Rule::TimeSignature),
    (Pattern::Prefix("SB-"), Rule::Barline(BarlineKind::Short)),
    (Pattern::Prefix("TB-"), Rule::Barline(BarlineKind::Triple)),
    (Pattern::Prefix("DB-"), Rule::Barline(BarlineKind::Double)),
    (Pattern::Prefix("LSB-"), Rule::Barline(BarlineKind::LongShort)),
    (Pattern::Prefix("B-"), Rule::Barline(BarlineKind::Single)),
    (Pattern::Prefix("BP-"), Rule::Barberpole),
    (Pattern::Prefix("EB-"), Rule::Barline(BarlineKind::End)),
    (Pattern::Prefix("W "), Rule::Duration(Duration::Breve, false)),
    (Pattern::Prefix("M "), Rule::Duration(Duration::Minim, false)),
    (Pattern::Prefix("M. "), Rule::Duration(Duration::Minim, true)),
    (Pattern::Prefix("C "), Rule::Duration(Duration::Crotchet, false)),
    (Pattern::Prefix("C. "), Rule::Duration(Duration::Crotchet, true)),
    (Pattern::Prefix("Q "), Rule::Duration(Duration::Quaver, false)),
    (Pattern::Prefix("Q. "), Rule::Duration(Duration::Quaver, true)),
    (Pattern::Prefix("SQ "), Rule::Duration(Duration::Semiquaver, false)),
    (Pattern::Prefix("SQ. "), Rule::Duration(Duration::Semiquaver, true)),
    (Pattern::Prefix("R-"), Rule::Strum),
    (Pattern::Prefix("AB-"), Rule::Alfabeto),
    (Pattern::Prefix("SECTION"), Rule::Section),
    (Pattern::Prefix("TITLE "), Rule::Title),
    (Pattern::Prefix("COMPOSER "), Rule::Composer),
    (Pattern::Empty, Rule::Space),
    (Pattern::LeadingDigit, Rule::Notes),
    (Pattern::Prefix("PAGEWIDTH "), Rule::Setting(Setting::PageWidth)),
    (Pattern::Prefix("PAGEHEIGHT "), Rule::Setting(Setting::PageHeight)),
    (Pattern::Prefix("TOPMARGIN "), Rule::Setting(Setting::TopMargin)),
    (Pattern::Prefix("BOTTOMMARGIN "), Rule::Setting(Setting::BottomMargin)),
    (Pattern::Prefix("LEFTMARGIN "), Rule::Setting(Setting::LeftMargin)),
    (Pattern::Prefix("RIGHTMARGIN "), Rule::Setting(Setting::RightMargin)),
    (Pattern::Prefix("STAVESEPARATION "), Rule::Setting(Setting::StaveSeparation)),
    (Pattern::Prefix("SLOTS "), Rule::Setting(Setting::Slots)),
    (Pattern::Prefix("COURSES "), Rule::Courses),
    (Pattern::Prefix("NUMBEROFCOURSES "), Rule::Setting(Setting::NumberOfCourses)),
    (Pattern::Prefix("SHOWCOURSES"), Rule::Flag(Flag::ShowCourses)),
    (Pattern::Prefix("COURSESPACING "), Rule::Setting(Setting::CourseSpacing)),
    (Pattern::Prefix("JUSTIFIED"), Rule::Flag(Flag::Justified)),
    (Pattern::Prefix("BARLINESPACING "), Rule::Setting(Setting::BarlineSpacing)),
    (Pattern::Prefix("BARBERPOLESPACING "), Rule::Setting(Setting::BarberpoleSpacing)),
    (Pattern::Prefix("BARLINESIZE "), Rule::Setting(Setting::BarlineSize)),
    (Pattern::Prefix("BARLINEFACE "), Rule::Setting(Setting::BarlineFace)),
    (Pattern::Prefix("TITLEFACE "), Rule::Setting(Setting::TitleFace)),
    (Pattern::Prefix("TITLESIZE "), Rule::Setting(Setting::TitleSize)),
    (Pattern::Prefix("TITLEYPOSITION "), Rule::Setting(Setting::TitleYPosition)),
    (Pattern::Prefix("COMPOSERFACE "), Rule::Setting(Setting::ComposerFace)),
    (Pattern::Prefix("COMPOSERSIZE "), Rule::Setting(Setting::ComposerSize)),
    (Pattern::Prefix("COMPOSERYPOSITION "), Rule::Setting(Setting::ComposerYPosition)),
    (Pattern::Prefix("FRETFACE "), Rule::Setting(Setting::FretFace)),
    (Pattern::Prefix("FRETSIZE "), Rule::Setting(Setting::FretSize)),
    (Pattern::Prefix("COURSEFACE "), Rule::Setting(Setting::CourseFace)),
    (Pattern::Prefix("COURSESIZE "), Rule::Setting(Setting::CourseSize)),
    (Pattern::Prefix("FRETMAP "), Rule::FretMap),
    (Pattern::Prefix("FRETMAPPINGOFF"), Rule::Flag(Flag::FretMappingOff)),
    (Pattern::Prefix("FRENCH"), Rule::Flag(Flag::French)),
    (Pattern::Prefix(";"), Rule::Comment),
];

impl Pattern {
    /// The rest of the line after the match, if it matches.
    fn strip<'a>(self, line: &'a str) -> Option<&'a str> {
        match self {
            Pattern::Prefix(prefix) => line.strip_prefix(prefix),
            Pattern::Empty => line.is_empty().then_some(line),
            Pattern::LeadingDigit => line
                .starts_with(|c: char| c.is_ascii_digit())
                .then_some(line),
        }
    }
}

impl Rule {
    fn token(self, rest: &str) -> LineToken {
        let rest = rest.trim();
        match self {
            Rule::Page => LineToken::Page(rest.to_string()),
            Rule::Stave => LineToken::Stave,
            Rule::TimeSignature => LineToken::TimeSignature(rest.to_string()),
            Rule::Barline(kind) => LineToken::Barline(kind, rest.to_string()),
            Rule::Barberpole => LineToken::Barberpole(rest.to_string()),
            Rule::Duration(duration, dotted) => LineToken::Notes {
                duration: Some((duration, dotted)),
                notes: rest.to_string(),
            },
            Rule::Notes => LineToken::Notes {
                duration: None,
                notes: rest.to_string(),
            },
            Rule::Strum => LineToken::Strum(rest.to_string()),
            Rule::Alfabeto => LineToken::Alfabeto(rest.to_string()),
            Rule::Section => LineToken::Section,
            Rule::Title => LineToken::Title(rest.to_string()),
            Rule::Composer => LineToken::Composer(rest.to_string()),
            Rule::Space => LineToken::Space,
            Rule::Setting(setting) => LineToken::Setting(setting, rest.to_string()),
            Rule::Courses => LineToken::Courses(rest.to_string()),
            Rule::Flag(flag) => LineToken::Flag(flag),
            Rule::FretMap => LineToken::FretMap(rest.to_string()),
            Rule::Comment => LineToken::Comment,
        }
    }
}

/// Classify a single source line.
pub fn classify(line: &str) -> LineToken {
    let line = line.trim();
    RULES
        .iter()
        .find_map(|(pattern, rule)| pattern.strip(line).map(|rest| rule.token(rest)))
        .unwrap_or_else(|| {
            trace!("ignoring line '{}'", line);
            LineToken::Ignored
        })
}

/// Classify every line of `source`, numbering lines from 1.
pub fn tokenize(source: &str) -> Vec<LocatedToken> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    source
        .lines()
        .enumerate()
        .map(|(index, line)| LocatedToken {
            token: classify(line),
            line: index + 1,
        })
        .collect()
}
