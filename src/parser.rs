//! # Parser Module
//!
//! Turns the classified lines from the lexer into a [`Document`].
//!
//! ## How it works
//! The parser owns a fresh [`LayoutConfig`] and walks the source one line at
//! a time:
//! - directive lines (`SLOTS 24`, `FRENCH`, `COURSES ...`) change the config
//! - `P-<n>` starts a page and `S-` adds a stave to it
//! - every other line places glyphs on the current stave (the last stave of
//!   the last page) at its cursor, then advances the cursor
//!
//! Glyph coordinates are fixed when the glyph is placed. When the input is
//! exhausted, staves are justified if `JUSTIFIED` appeared anywhere.
//!
//! ## Note tokens
//! A note line holds whitespace-separated `<course>-<fret>` tokens. The fret
//! is printed as written (after remapping) unless it is one of:
//! - `{` / `}`: semicircle over / under the fret position
//! - `[` / `]`: open / close a slur on this stave
//!
//! ## Example
//! ```rust
//! use gaspar::parse;
//!
//! let doc = parse("P-1\nS-\n1-0 2-0").unwrap();
//! let stave = &doc.pages()[0].staves()[0];
//! assert_eq!(stave.glyphs().len(), 2);
//! assert_eq!(stave.cursor(), 1);
//! ```

use crate::config::LayoutConfig;
use crate::error::TabError;
use crate::glyph::{Glyph, Meter};
use crate::lexer::{tokenize, LineToken, LocatedToken};
use crate::page::{Document, Page};
use crate::stave::Stave;
use log::{debug, warn};

const TIME_SIGNATURE_SLOTS: usize = 3;

pub struct Parser {
    config: LayoutConfig,
    document: Document,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::new(),
            document: Document::new(),
        }
    }

    pub fn parse_line(&mut self, located: &LocatedToken) -> Result<(), TabError> {
        let line = located.line;
        debug!("line {}: {:?}", line, located.token);

        match &located.token {
            LineToken::Page(number) => self.parse_page(line, number),
            LineToken::Stave => self.parse_stave(line),
            LineToken::TimeSignature(text) => self.parse_time_signature(line, text),
            LineToken::Barline(kind, label) => {
                let label = (!label.is_empty()).then(|| label.clone());
                let config = &self.config;
                let stave = current_stave(&mut self.document, line, "barline")?;
                stave.place(Glyph::barline(*kind, stave.cursor(), label), config);
                if kind.advances() {
                    stave.advance(1);
                }
                Ok(())
            }
            LineToken::Barberpole(range) => self.parse_barberpole(line, range),
            LineToken::Notes { duration, notes } => {
                let config = &self.config;
                let stave = current_stave(&mut self.document, line, "note")?;
                if let Some((duration, dotted)) = duration {
                    stave.place(Glyph::tick(stave.cursor(), *duration, *dotted), config);
                }
                for token in notes.split_whitespace() {
                    place_note(stave, config, line, token)?;
                }
                stave.advance(1);
                Ok(())
            }
            LineToken::Strum(pattern) => {
                let config = &self.config;
                let stave = current_stave(&mut self.document, line, "R-")?;
                let slot = stave.cursor().saturating_sub(1);
                stave.place(Glyph::strum(slot, pattern), config);
                Ok(())
            }
            LineToken::Alfabeto(chord) => {
                let config = &self.config;
                let stave = current_stave(&mut self.document, line, "AB-")?;
                stave.place(Glyph::alfabeto(stave.cursor(), chord), config);
                Ok(())
            }
            LineToken::Section => {
                let config = &self.config;
                let stave = current_stave(&mut self.document, line, "SECTION")?;
                let slot = stave.cursor().saturating_sub(1);
                stave.place(Glyph::section(slot), config);
                Ok(())
            }
            LineToken::Title(text) => {
                let page = current_page(&mut self.document, line, "TITLE")?;
                page.set_title(text, &self.config);
                Ok(())
            }
            LineToken::Composer(text) => {
                let page = current_page(&mut self.document, line, "COMPOSER")?;
                page.set_composer(text, &self.config);
                Ok(())
            }
            LineToken::Space => {
                if let Some(stave) = self
                    .document
                    .current_page_mut()
                    .and_then(Page::current_stave_mut)
                {
                    stave.advance(1);
                }
                Ok(())
            }
            LineToken::Setting(setting, value) => self
                .config
                .set(*setting, value)
                .map_err(|message| malformed(line, setting.keyword(), message)),
            LineToken::Courses(courses) => self
                .config
                .set_courses(courses)
                .map_err(|message| malformed(line, "COURSES", message)),
            LineToken::Flag(flag) => {
                self.config.set_flag(*flag);
                Ok(())
            }
            LineToken::FretMap(pairs) => self
                .config
                .set_fret_map(pairs)
                .map_err(|message| malformed(line, "FRETMAP", message)),
            LineToken::Comment | LineToken::Ignored => Ok(()),
        }
    }

    /// Finish the document, justifying staves if requested.
    pub fn finish(mut self) -> Document {
        for (page, stave, start) in self.document.unclosed_slurs() {
            warn!(
                "page {}, stave {}: slur opened at slot {} on course {} was never closed",
                page, stave, start.slot, start.course
            );
        }
        if self.config.justified {
            self.document.justify();
        }
        self.document
    }

    fn parse_page(&mut self, line: usize, text: &str) -> Result<(), TabError> {
        let word = text.split_whitespace().next().unwrap_or("");
        let number = word.parse::<u32>().map_err(|_| {
            malformed(line, "P-", format!("expected a page number, found '{}'", word))
        })?;
        let first = self.document.is_empty();
        self.document
            .push_page(Page::new(number, first, &self.config));
        Ok(())
    }

    fn parse_stave(&mut self, line: usize) -> Result<(), TabError> {
        // The first stave of the piece is the first stave on the first page
        let only_page = self.document.pages().len() == 1;
        let page = current_page(&mut self.document, line, "S-")?;
        let first = only_page && page.staves().is_empty();
        page.append(Stave::new(&self.config, first))
    }

    fn parse_time_signature(&mut self, line: usize, text: &str) -> Result<(), TabError> {
        let meter = parse_meter(text)
            .ok_or_else(|| malformed(line, "T-", format!("unrecognised time signature '{}'", text)))?;
        let config = &self.config;
        let stave = current_stave(&mut self.document, line, "T-")?;
        stave.place(Glyph::time_signature(stave.cursor(), meter), config);
        stave.advance(TIME_SIGNATURE_SLOTS);
        Ok(())
    }

    fn parse_barberpole(&mut self, line: usize, text: &str) -> Result<(), TabError> {
        let config = &self.config;
        let stave = current_stave(&mut self.document, line, "BP-")?;
        let range = if text.is_empty() {
            None
        } else {
            let (first, last) = text
                .split_once('-')
                .and_then(|(a, b)| Some((a.parse::<usize>().ok()?, b.parse::<usize>().ok()?)))
                .ok_or_else(|| {
                    malformed(line, "BP-", format!("expected <course>-<course>, found '{}'", text))
                })?;
            for course in [first, last] {
                check_course(stave, line, course)?;
            }
            Some((first, last))
        };
        stave.place(Glyph::barberpole(stave.cursor(), range), config);
        Ok(())
    }
}

fn malformed(line: usize, directive: &str, message: impl Into<String>) -> TabError {
    TabError::MalformedDirective {
        line,
        directive: directive.to_string(),
        message: message.into(),
    }
}

fn current_page<'a>(
    document: &'a mut Document,
    line: usize,
    directive: &str,
) -> Result<&'a mut Page, TabError> {
    document.current_page_mut().ok_or_else(|| TabError::NoPage {
        line,
        directive: directive.to_string(),
    })
}

fn current_stave<'a>(
    document: &'a mut Document,
    line: usize,
    directive: &str,
) -> Result<&'a mut Stave, TabError> {
    current_page(document, line, directive)?
        .current_stave_mut()
        .ok_or_else(|| TabError::NoStave {
            line,
            directive: directive.to_string(),
        })
}

fn check_course(stave: &Stave, line: usize, course: usize) -> Result<(), TabError> {
    if stave.has_course(course) {
        Ok(())
    } else {
        Err(TabError::CourseOutOfRange {
            line,
            course,
            courses: stave.courses(),
        })
    }
}

/// `C`, `C|`, `<a>` or `<a>-<b>`.
fn parse_meter(text: &str) -> Option<Meter> {
    match text {
        "C" => return Some(Meter::Common),
        "C|" => return Some(Meter::SplitCommon),
        _ => {}
    }
    let parts: Vec<&str> = text.split('-').collect();
    match parts.as_slice() {
        [single] if !single.is_empty() => Some(Meter::Single(single.to_string())),
        [top, bottom] if !top.is_empty() && !bottom.is_empty() => {
            Some(Meter::Double(top.to_string(), bottom.to_string()))
        }
        _ => None,
    }
}

fn place_note(
    stave: &mut Stave,
    config: &LayoutConfig,
    line: usize,
    token: &str,
) -> Result<(), TabError> {
    let bad_note = || TabError::MalformedNote {
        line,
        token: token.to_string(),
    };
    let (course, fret) = token.split_once('-').ok_or_else(bad_note)?;
    let course = course.parse::<usize>().map_err(|_| bad_note())?;
    if fret.is_empty() {
        return Err(bad_note());
    }
    check_course(stave, line, course)?;

    let slot = stave.cursor();
    match fret {
        "{" => stave.place(Glyph::over_semicircle(slot, course), config),
        "}" => stave.place(Glyph::under_semicircle(slot, course), config),
        "[" => stave.open_slur(course),
        "]" => stave.close_slur(line, course, config)?,
        _ => stave.place(Glyph::note(slot, course, fret), config),
    }
    Ok(())
}

/// Parse a complete `.sanz` source into a document.
pub fn parse(source: &str) -> Result<Document, TabError> {
    let mut parser = Parser::new();
    for token in tokenize(source) {
        parser.parse_line(&token)?;
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Orientation;
    use crate::glyph::{BarlineKind, Duration, SlurAnchor};
    use pretty_assertions::assert_eq;

    fn only_stave(doc: &Document) -> &Stave {
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.pages()[0].staves().len(), 1);
        &doc.pages()[0].staves()[0]
    }

    fn notes_of(stave: &Stave) -> Vec<(usize, usize, String)> {
        stave
            .glyphs()
            .iter()
            .filter_map(|g| match g {
                Glyph::Note(n) => Some((n.slot, n.course, n.text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_chord() {
        let doc = parse("P-1\nS-\n1-0 2-0").unwrap();
        let stave = only_stave(&doc);
        assert_eq!(
            notes_of(stave),
            vec![(0, 1, "0".to_string()), (0, 2, "0".to_string())]
        );
        assert_eq!(stave.glyphs().len(), 2);
        assert_eq!(stave.cursor(), 1);
    }

    #[test]
    fn test_duration_places_tick_then_notes() {
        let doc = parse("P-1\nS-\nQ. 1-3\n1-5").unwrap();
        let stave = only_stave(&doc);
        match &stave.glyphs()[0] {
            Glyph::Tick(tick) => {
                assert_eq!(tick.slot, 0);
                assert_eq!(tick.duration, Duration::Quaver);
                assert!(tick.dotted);
            }
            other => panic!("expected tick, got {:?}", other),
        }
        assert_eq!(
            notes_of(stave),
            vec![(0, 1, "3".to_string()), (1, 1, "5".to_string())]
        );
        assert_eq!(stave.cursor(), 2);
    }

    #[test]
    fn test_slur_spans_anchors() {
        let source = "P-1\nS-\n\n\n3-[\n\n\n1-]";
        let doc = parse(source).unwrap();
        let stave = only_stave(&doc);
        let slurs: Vec<_> = stave
            .glyphs()
            .iter()
            .filter_map(|g| match g {
                Glyph::Slur(s) => Some((s.start, s.end)),
                _ => None,
            })
            .collect();
        assert_eq!(
            slurs,
            vec![(
                SlurAnchor { slot: 2, course: 3 },
                SlurAnchor { slot: 5, course: 1 }
            )]
        );
        assert_eq!(stave.pending_slur(), None);
    }

    #[test]
    fn test_unclosed_slurs_are_reported() {
        let _ = env_logger::builder().is_test(true).try_init();
        // Left open when the next stave starts, and again at end of input
        let doc = parse("P-1\nS-\n1-0\n3-[\nS-\nP-2\nS-\n\n2-[").unwrap();
        assert_eq!(
            doc.unclosed_slurs(),
            vec![
                (1, 1, SlurAnchor { slot: 1, course: 3 }),
                (2, 1, SlurAnchor { slot: 1, course: 2 }),
            ]
        );
        assert!(parse("P-1\nS-\n3-[\n1-]").unwrap().unclosed_slurs().is_empty());
    }

    #[test]
    fn test_unmatched_slur_close() {
        let err = parse("P-1\nS-\n1-0\n2-]").unwrap_err();
        assert!(matches!(err, TabError::UnmatchedSlur { line: 4, course: 2 }));
    }

    #[test]
    fn test_semicircles() {
        let doc = parse("P-1\nS-\n2-{ 3-}").unwrap();
        let stave = only_stave(&doc);
        assert!(matches!(stave.glyphs()[0], Glyph::OverSemicircle(_)));
        assert!(matches!(stave.glyphs()[1], Glyph::UnderSemicircle(_)));
    }

    #[test]
    fn test_fret_map_applied_at_placement() {
        let doc = parse("P-1\nS-\n1-10\nFRETMAPPINGOFF\n1-10").unwrap();
        let stave = only_stave(&doc);
        assert_eq!(
            notes_of(stave),
            vec![(0, 1, "X".to_string()), (1, 1, "10".to_string())]
        );
    }

    #[test]
    fn test_barline_advances() {
        let doc = parse("P-1\nS-\nB-1\nSB-\nDB-\nTB-\nLSB-\nEB-").unwrap();
        let stave = only_stave(&doc);
        let bars: Vec<(BarlineKind, usize, Option<String>)> = stave
            .glyphs()
            .iter()
            .filter_map(|g| match g {
                Glyph::Barline(b) => Some((b.kind, b.slot, b.label.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            bars,
            vec![
                (BarlineKind::Single, 0, Some("1".to_string())),
                (BarlineKind::Short, 1, None),
                (BarlineKind::Double, 1, None),
                (BarlineKind::Triple, 2, None),
                (BarlineKind::LongShort, 2, None),
                (BarlineKind::End, 2, None),
            ]
        );
        assert_eq!(stave.cursor(), 2);
    }

    #[test]
    fn test_time_signature_advances_three_slots() {
        let doc = parse("P-1\nS-\nT-3-4\n1-0").unwrap();
        let stave = only_stave(&doc);
        match &stave.glyphs()[0] {
            Glyph::TimeSignature(ts) => {
                assert_eq!(ts.meter, Meter::Double("3".into(), "4".into()));
                assert_eq!(ts.slot, 0);
            }
            other => panic!("expected time signature, got {:?}", other),
        }
        assert_eq!(notes_of(stave), vec![(3, 1, "0".to_string())]);
    }

    #[test]
    fn test_meters() {
        assert_eq!(parse_meter("3"), Some(Meter::Single("3".into())));
        assert_eq!(parse_meter("6-8"), Some(Meter::Double("6".into(), "8".into())));
        assert_eq!(parse_meter("C"), Some(Meter::Common));
        assert_eq!(parse_meter("C|"), Some(Meter::SplitCommon));
        assert_eq!(parse_meter(""), None);
        assert_eq!(parse_meter("3-"), None);
        assert_eq!(parse_meter("1-2-3"), None);
    }

    #[test]
    fn test_strum_and_section_attach_to_previous_slot() {
        let doc = parse("P-1\nS-\n1-0\n2-0\nR-UD\nSECTION\nAB-A").unwrap();
        let stave = only_stave(&doc);
        let slots: Vec<usize> = stave.glyphs().iter().map(Glyph::slot).collect();
        assert_eq!(slots, vec![0, 1, 1, 1, 2]);
    }

    #[test]
    fn test_strum_at_start_of_stave_stays_on_slot_zero() {
        let doc = parse("P-1\nS-\nR-U").unwrap();
        assert_eq!(only_stave(&doc).glyphs()[0].slot(), 0);
    }

    #[test]
    fn test_barberpole_range_checked() {
        let doc = parse("P-1\nS-\nBP-\nBP-2-4").unwrap();
        let stave = only_stave(&doc);
        assert_eq!(stave.glyphs().len(), 2);
        assert_eq!(stave.cursor(), 0);

        let err = parse("P-1\nS-\nBP-2-9").unwrap_err();
        assert!(matches!(err, TabError::CourseOutOfRange { line: 3, course: 9, courses: 5 }));

        let err = parse("P-1\nS-\nBP-two").unwrap_err();
        assert!(matches!(err, TabError::MalformedDirective { line: 3, .. }));
    }

    #[test]
    fn test_first_page_and_first_stave() {
        let doc = parse("P-3\nS-\nS-\nP-4\nS-").unwrap();
        let pages = doc.pages();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_first());
        assert!(!pages[1].is_first());
        assert_eq!(pages[0].number(), 3);
        assert!(pages[0].staves()[0].is_first());
        assert!(!pages[0].staves()[1].is_first());
        assert!(!pages[1].staves()[0].is_first());
    }

    #[test]
    fn test_settings_only_affect_later_staves() {
        let doc = parse("P-1\nS-\nSLOTS 20\nCOURSES E4 B3-B3 G3-G3 D4-D4 A3-A3 D3-D3\nS-").unwrap();
        let staves = doc.pages()[0].staves();
        assert_eq!((staves[0].slots(), staves[0].courses()), (30, 5));
        assert_eq!((staves[1].slots(), staves[1].courses()), (20, 6));
    }

    #[test]
    fn test_french_orientation() {
        let doc = parse("FRENCH\nP-1\nS-\n1-a").unwrap();
        let stave = only_stave(&doc);
        assert_eq!(stave.orientation(), Orientation::French);
        match &stave.glyphs()[0] {
            Glyph::Note(note) => assert_eq!(note.y, stave.y() + 40.0 - 3.0),
            other => panic!("expected note, got {:?}", other),
        }
    }

    #[test]
    fn test_justified_applies_to_all_staves() {
        let mut source = String::from("P-1\nS-\n");
        for _ in 0..25 {
            source.push_str("1-0\n");
        }
        source.push_str("JUSTIFIED\n");
        let doc = parse(&source).unwrap();
        assert_eq!(only_stave(&doc).padding(), Some(6.0 * (451.0 / 30.0) / 24.0));
    }

    #[test]
    fn test_empty_line_before_stave_is_ignored() {
        let doc = parse("\n\nP-1\n\nS-\n1-0").unwrap();
        assert_eq!(notes_of(only_stave(&doc)), vec![(0, 1, "0".to_string())]);
    }

    #[test]
    fn test_content_needs_page_and_stave() {
        let err = parse("S-").unwrap_err();
        assert!(matches!(err, TabError::NoPage { line: 1, .. }));

        let err = parse("TITLE Folias").unwrap_err();
        assert!(matches!(err, TabError::NoPage { line: 1, .. }));

        let err = parse("P-1\n1-0").unwrap_err();
        assert!(matches!(err, TabError::NoStave { line: 2, .. }));
    }

    #[test]
    fn test_malformed_notes() {
        assert!(matches!(
            parse("P-1\nS-\n1-0 x-2").unwrap_err(),
            TabError::MalformedNote { line: 3, ref token } if token == "x-2"
        ));
        assert!(matches!(
            parse("P-1\nS-\nC 12").unwrap_err(),
            TabError::MalformedNote { line: 3, .. }
        ));
        assert!(matches!(
            parse("P-1\nS-\n1-").unwrap_err(),
            TabError::MalformedNote { line: 3, .. }
        ));
        assert!(matches!(
            parse("P-1\nS-\n6-0").unwrap_err(),
            TabError::CourseOutOfRange { line: 3, course: 6, courses: 5 }
        ));
        assert!(matches!(
            parse("P-1\nS-\n0-0").unwrap_err(),
            TabError::CourseOutOfRange { course: 0, .. }
        ));
    }

    #[test]
    fn test_malformed_directives() {
        let err = parse("SLOTS many").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed SLOTS directive at line 1: expected a whole number, found 'many'"
        );
        assert!(matches!(
            parse("P-one").unwrap_err(),
            TabError::MalformedDirective { ref directive, .. } if directive == "P-"
        ));
        assert!(matches!(
            parse("P-1\nS-\nT-").unwrap_err(),
            TabError::MalformedDirective { ref directive, .. } if directive == "T-"
        ));
        assert!(matches!(
            parse("FRETMAP 10").unwrap_err(),
            TabError::MalformedDirective { ref directive, .. } if directive == "FRETMAP"
        ));
    }

    #[test]
    fn test_title_and_composer() {
        let doc = parse("P-1\nTITLE Folias\nCOMPOSER Gaspar Sanz").unwrap();
        let page = &doc.pages()[0];
        assert_eq!(page.title().unwrap().text, "Folias");
        assert_eq!(page.composer().unwrap().text, "Gaspar Sanz");
    }

    #[test]
    fn test_page_geometry_fixed_when_page_starts() {
        let doc = parse("P-1\nTOPMARGIN 100\nPAGEHEIGHT 500\nLEFTMARGIN 10\nS-").unwrap();
        let stave = only_stave(&doc);
        assert_eq!(stave.y(), 642.0);
        assert_eq!(stave.x(), 72.0);
        assert_eq!(stave.length(), 451.0);

        // The next page picks the new geometry up
        let doc = parse("P-1\nTOPMARGIN 100\nPAGEHEIGHT 500\nP-2\nS-").unwrap();
        assert_eq!(doc.pages()[1].staves()[0].y(), 400.0);
    }

    #[test]
    fn test_byte_order_mark_ignored() {
        let doc = parse("\u{feff}P-1\nS-\n1-0").unwrap();
        assert_eq!(only_stave(&doc).cursor(), 1);
    }

    #[test]
    fn test_unknown_lines_ignored() {
        let doc = parse("P-1\nS-\nHELLO\n; comment\n1-0").unwrap();
        assert_eq!(only_stave(&doc).cursor(), 1);
    }
}
