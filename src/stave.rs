//! # Stave
//!
//! One line-system of tablature: a horizontal line per course and a grid of
//! equally spaced slots along its length. The parser writes into a stave by
//! placing glyphs at the current slot (the cursor) and advancing it.
//!
//! ## Coordinates
//! - `slot_x(s) = x + s × length / slots`
//! - `slot_y(c) = y + (line(c) − 1) × course_spacing`, where `line` maps a
//!   course to its line counted from the bottom of the stave
//!
//! Everything a stave needs from the config (course count, spacing, slot
//! count, orientation, course labels) is copied in when it is created.

use crate::config::{LayoutConfig, Orientation, LINE_WIDTH};
use crate::draw::{Canvas, TextAlign};
use crate::error::TabError;
use crate::glyph::{Glyph, SlurAnchor};
use log::{debug, warn};
use serde::Serialize;

/// Stringing printed to the left of the first stave of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseLabels {
    pub courses: Vec<Vec<String>>,
    pub face: String,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stave {
    x: f64,
    y: f64,
    length: f64,
    slots: usize,
    courses: usize,
    course_spacing: f64,
    orientation: Orientation,
    first: bool,
    labels: Option<CourseLabels>,
    cursor: usize,
    glyphs: Vec<Glyph>,
    #[serde(skip)]
    pending_slur: Option<SlurAnchor>,
    padding: Option<f64>,
}

impl Stave {
    /// Create an unpositioned stave. `first` marks the first stave of the
    /// document, which carries the course labels when they are switched on.
    pub fn new(config: &LayoutConfig, first: bool) -> Self {
        let labels = (first && config.show_courses).then(|| CourseLabels {
            courses: config.courses.clone(),
            face: config.course_face.clone(),
            size: config.course_size,
        });

        Self {
            x: 0.0,
            y: 0.0,
            length: config.stave_length(),
            slots: config.slots,
            courses: config.number_of_courses,
            course_spacing: config.course_spacing,
            orientation: config.orientation,
            first,
            labels,
            cursor: 0,
            glyphs: Vec::new(),
            pending_slur: None,
            padding: None,
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64, length: f64) {
        self.x = x;
        self.y = y;
        self.length = length;
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn courses(&self) -> usize {
        self.courses
    }

    pub fn course_spacing(&self) -> f64 {
        self.course_spacing
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_first(&self) -> bool {
        self.first
    }

    pub fn labels(&self) -> Option<&CourseLabels> {
        self.labels.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn pending_slur(&self) -> Option<SlurAnchor> {
        self.pending_slur
    }

    /// Padding per slot applied by [`Stave::justify`], if it was applied.
    pub fn padding(&self) -> Option<f64> {
        self.padding
    }

    /// Distance from the bottom line to the top line.
    pub fn height(&self) -> f64 {
        self.courses.saturating_sub(1) as f64 * self.course_spacing
    }

    pub fn slot_width(&self) -> f64 {
        self.length / self.slots as f64
    }

    pub fn slot_x(&self, slot: usize) -> f64 {
        self.x + slot as f64 * self.slot_width()
    }

    /// Offset of a course's line above the bottom line.
    pub fn course_offset(&self, course: usize) -> f64 {
        let line = self.orientation.line_position(course, self.courses);
        line.saturating_sub(1) as f64 * self.course_spacing
    }

    pub fn slot_y(&self, course: usize) -> f64 {
        self.y + self.course_offset(course)
    }

    pub fn has_course(&self, course: usize) -> bool {
        (1..=self.courses).contains(&course)
    }

    pub fn advance(&mut self, slots: usize) {
        let before = self.cursor;
        self.cursor += slots;
        if before <= self.slots && self.cursor > self.slots {
            warn!(
                "stave overfilled: cursor at slot {} of {}",
                self.cursor, self.slots
            );
        }
    }

    /// Resolve the glyph's coordinates on this stave and keep it.
    pub fn place(&mut self, mut glyph: Glyph, config: &LayoutConfig) {
        glyph.place(self, config);
        debug!("placed {:?} at slot {}", glyph, glyph.slot());
        self.glyphs.push(glyph);
    }

    /// Mark the start of a slur at the cursor. A second open replaces the first.
    pub fn open_slur(&mut self, course: usize) {
        if let Some(previous) = self.pending_slur {
            warn!(
                "slur opened at slot {} on course {} was never closed",
                previous.slot, previous.course
            );
        }
        self.pending_slur = Some(SlurAnchor {
            slot: self.cursor,
            course,
        });
    }

    /// Close the pending slur at the cursor and place it.
    pub fn close_slur(
        &mut self,
        line: usize,
        course: usize,
        config: &LayoutConfig,
    ) -> Result<(), TabError> {
        let start = self
            .pending_slur
            .take()
            .ok_or(TabError::UnmatchedSlur { line, course })?;
        let end = SlurAnchor {
            slot: self.cursor,
            course,
        };
        self.place(Glyph::slur(start, end), config);
        Ok(())
    }

    /// Spread the glyphs across the full stave length when the stave is more
    /// than three quarters full. Has no effect the second time.
    pub fn justify(&mut self) {
        if self.padding.is_some() || self.cursor <= 1 {
            return;
        }
        let spare = self.slots as f64 - self.cursor as f64 + 1.0;
        if spare >= self.slots as f64 / 4.0 {
            return;
        }

        let padding = spare * self.slot_width() / (self.cursor - 1) as f64;
        debug!("justifying stave: {} spare slots, padding {}", spare, padding);
        for glyph in &mut self.glyphs {
            glyph.pad(padding);
        }
        self.padding = Some(padding);
    }

    pub fn render(&self, canvas: &mut Canvas) {
        if let Some(labels) = &self.labels {
            for (index, strings) in labels.courses.iter().enumerate() {
                let y = self.y - 0.3 * labels.size + self.course_offset(index + 1);
                for (string, pitch) in strings.iter().enumerate() {
                    let x = self.x - (4.0 - 2.0 * string as f64) * labels.size;
                    canvas.text(pitch, x, y, labels.size, &labels.face, TextAlign::Left);
                }
            }
        }

        for course in 1..=self.courses {
            canvas.horizontal_line(self.x, self.slot_y(course), self.length, LINE_WIDTH);
        }

        for glyph in &self.glyphs {
            glyph.render(canvas);
        }
    }
}
