//! # Glyphs
//!
//! Everything that can be written onto a stave. A glyph is created from its
//! musical meaning (slot, course, fret text, duration ...), then placed on a
//! stave: placement resolves absolute page coordinates and copies the style
//! values it needs out of the config. After that the glyph no longer looks at
//! the config, so later directives cannot move or restyle it.
//!
//! ```text
//! Glyph
//!   ├── Note              fret text on a course line
//!   ├── Tick              rhythm sign above the stave
//!   ├── Barline           single, double, short, long+short, triple, end
//!   ├── Barberpole        decorated thick barline over a course range
//!   ├── TimeSignature     single, fraction, common time, split common time
//!   ├── OverSemicircle    short slur above a fret
//!   ├── UnderSemicircle   short slur below a fret
//!   ├── Slur              curve between two (slot, course) anchors
//!   ├── Section           section sign
//!   ├── Alfabeto          chord letter
//!   └── Strum             rasgueado up/down strokes
//! ```

use crate::config::{LayoutConfig, Orientation, LINE_WIDTH};
use crate::draw::{Canvas, TextAlign};
use crate::stave::Stave;
use serde::Serialize;

const TICK_HEIGHT: f64 = 14.0;
const TAIL_END_OFFSET: f64 = 4.0;
const TAIL_SPACING: f64 = 3.0;
const TICK_DOT_RADIUS: f64 = 1.0;
const TICK_DOT_OFFSET: f64 = 3.0;
const SECTION_SIGN: &str = "§";
const METER_FACE: &str = "Times-Roman";

/// Rhythm value written at the start of a line (`W`, `M`, `C`, `Q`, `SQ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Duration {
    Breve,
    Minim,
    #[default]
    Crotchet,
    Quaver,
    Semiquaver,
}

impl Duration {
    fn tails(self) -> usize {
        match self {
            Duration::Breve | Duration::Minim | Duration::Crotchet => 0,
            Duration::Quaver => 1,
            Duration::Semiquaver => 2,
        }
    }

    fn has_stem(self) -> bool {
        self != Duration::Breve
    }

    fn hollow(self) -> bool {
        matches!(self, Duration::Breve | Duration::Minim)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarlineKind {
    #[default]
    Single,
    Double,
    Short,
    LongShort,
    Triple,
    End,
}

impl BarlineKind {
    /// Single and double barlines take a slot of their own; the others sit
    /// on the grid next to the notes around them.
    pub fn advances(self) -> bool {
        matches!(self, BarlineKind::Single | BarlineKind::Double)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Meter {
    /// One figure, e.g. `3`.
    Single(String),
    /// A fraction, e.g. `3` over `4`.
    Double(String, String),
    #[default]
    Common,
    SplitCommon,
}

/// One end of a slur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlurAnchor {
    pub slot: usize,
    pub course: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Note {
    pub slot: usize,
    pub course: usize,
    /// Fret as written in the source.
    pub fret: String,
    /// Fret as printed, after remapping.
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub face: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tick {
    pub slot: usize,
    pub duration: Duration,
    pub dotted: bool,
    pub x: f64,
    pub y: f64,
    pub body_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Barline {
    pub kind: BarlineKind,
    pub slot: usize,
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub short_y: f64,
    pub short_height: f64,
    pub spacing: f64,
    pub label_size: f64,
    pub label_face: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Barberpole {
    pub slot: usize,
    /// Course range as written; `None` spans the whole stave.
    pub range: Option<(usize, usize)>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub stave_height: f64,
    pub course_spacing: f64,
    /// Offsets above the bottom line of the lowest and highest course in the range.
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeSignature {
    pub slot: usize,
    pub meter: Meter,
    pub x: f64,
    pub y: f64,
    /// Baseline of the upper figure of a fraction.
    pub top_y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Semicircle {
    pub slot: usize,
    pub course: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Slur {
    pub start: SlurAnchor,
    pub end: SlurAnchor,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub x3: f64,
    pub y3: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Section {
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Alfabeto {
    pub slot: usize,
    pub chord: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub face: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Strum {
    pub slot: usize,
    /// `U` and `D` strokes; other characters leave a gap.
    pub pattern: String,
    pub x: f64,
    pub y: f64,
    pub stroke_spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "glyph", rename_all = "snake_case")]
pub enum Glyph {
    Note(Note),
    Tick(Tick),
    Barline(Barline),
    Barberpole(Barberpole),
    TimeSignature(TimeSignature),
    OverSemicircle(Semicircle),
    UnderSemicircle(Semicircle),
    Slur(Slur),
    Section(Section),
    Alfabeto(Alfabeto),
    Strum(Strum),
}

impl Glyph {
    pub fn note(slot: usize, course: usize, fret: &str) -> Self {
        Glyph::Note(Note {
            slot,
            course,
            fret: fret.to_string(),
            ..Default::default()
        })
    }

    pub fn tick(slot: usize, duration: Duration, dotted: bool) -> Self {
        Glyph::Tick(Tick {
            slot,
            duration,
            dotted,
            ..Default::default()
        })
    }

    pub fn barline(kind: BarlineKind, slot: usize, label: Option<String>) -> Self {
        Glyph::Barline(Barline {
            kind,
            slot,
            label,
            ..Default::default()
        })
    }

    pub fn barberpole(slot: usize, range: Option<(usize, usize)>) -> Self {
        Glyph::Barberpole(Barberpole {
            slot,
            range,
            ..Default::default()
        })
    }

    pub fn time_signature(slot: usize, meter: Meter) -> Self {
        Glyph::TimeSignature(TimeSignature {
            slot,
            meter,
            ..Default::default()
        })
    }

    pub fn over_semicircle(slot: usize, course: usize) -> Self {
        Glyph::OverSemicircle(Semicircle {
            slot,
            course,
            ..Default::default()
        })
    }

    pub fn under_semicircle(slot: usize, course: usize) -> Self {
        Glyph::UnderSemicircle(Semicircle {
            slot,
            course,
            ..Default::default()
        })
    }

    pub fn slur(start: SlurAnchor, end: SlurAnchor) -> Self {
        Glyph::Slur(Slur {
            start,
            end,
            ..Default::default()
        })
    }

    pub fn section(slot: usize) -> Self {
        Glyph::Section(Section {
            slot,
            ..Default::default()
        })
    }

    pub fn alfabeto(slot: usize, chord: &str) -> Self {
        Glyph::Alfabeto(Alfabeto {
            slot,
            chord: chord.to_string(),
            ..Default::default()
        })
    }

    pub fn strum(slot: usize, pattern: &str) -> Self {
        Glyph::Strum(Strum {
            slot,
            pattern: pattern.to_string(),
            ..Default::default()
        })
    }

    /// Slot the glyph is anchored to. Slurs report their end slot.
    pub fn slot(&self) -> usize {
        match self {
            Glyph::Note(g) => g.slot,
            Glyph::Tick(g) => g.slot,
            Glyph::Barline(g) => g.slot,
            Glyph::Barberpole(g) => g.slot,
            Glyph::TimeSignature(g) => g.slot,
            Glyph::OverSemicircle(g) | Glyph::UnderSemicircle(g) => g.slot,
            Glyph::Slur(g) => g.end.slot,
            Glyph::Section(g) => g.slot,
            Glyph::Alfabeto(g) => g.slot,
            Glyph::Strum(g) => g.slot,
        }
    }

    /// Resolve absolute coordinates on `stave`.
    pub fn place(&mut self, stave: &Stave, config: &LayoutConfig) {
        let height = stave.height();
        let spacing = stave.course_spacing();

        match self {
            Glyph::Note(g) => {
                g.size = config.fret_size;
                g.face = config.fret_face.clone();
                g.text = config.fret_text(&g.fret);
                g.x = stave.slot_x(g.slot);
                g.y = stave.slot_y(g.course) - (g.size / 3.0).floor();
            }
            Glyph::Tick(g) => {
                g.body_radius = config.tick_body_radius;
                g.x = stave.slot_x(g.slot) + 2.0 * g.body_radius;
                g.y = stave.y() + height + spacing;
            }
            Glyph::Barline(g) => {
                g.spacing = config.barline_spacing;
                g.label_size = config.barline_size;
                g.label_face = config.barline_face.clone();
                g.x = match g.kind {
                    BarlineKind::End => stave.slot_x(stave.slots()),
                    _ => stave.slot_x(g.slot),
                };
                g.y = stave.y();
                g.height = height;
                g.short_y = stave.y() + spacing;
                g.short_height = stave.courses().saturating_sub(3) as f64 * spacing;
            }
            Glyph::Barberpole(g) => {
                let (first, last) = g.range.unwrap_or((1, stave.courses()));
                let lower = stave.course_offset(first);
                let upper = stave.course_offset(last);
                g.lower = lower.min(upper);
                g.upper = lower.max(upper);
                g.x = stave.slot_x(g.slot);
                g.y = stave.y();
                g.width = config.barberpole_spacing;
                g.stave_height = height;
                g.course_spacing = spacing;
            }
            Glyph::TimeSignature(g) => {
                g.size = height / 2.0;
                g.x = stave.slot_x(g.slot);
                match g.meter {
                    Meter::Double(..) => {
                        g.y = stave.y() + g.size / 5.0;
                        g.top_y = stave.y() + height / 2.0 + g.size / 5.0;
                    }
                    _ => {
                        g.y = stave.y() + height / 2.0 - g.size / 3.0;
                        g.top_y = g.y;
                    }
                }
            }
            Glyph::OverSemicircle(g) => {
                g.radius = config.semicircle_radius();
                g.x = stave.slot_x(g.slot) + g.radius / 2.0;
                g.y = stave.slot_y(g.course) + spacing * 0.8 - g.radius;
            }
            Glyph::UnderSemicircle(g) => {
                g.radius = config.semicircle_radius();
                g.x = stave.slot_x(g.slot) + g.radius / 2.0;
                g.y = stave.slot_y(g.course) - (spacing * 0.8 - g.radius);
            }
            Glyph::Slur(g) => {
                g.x1 = stave.slot_x(g.start.slot);
                g.y1 = stave.slot_y(g.start.course) + spacing * 0.75;
                g.x3 = stave.slot_x(g.end.slot);
                g.y3 = stave.slot_y(g.end.course) + spacing * 0.75;
                g.x2 = (g.x1 + g.x3) / 2.0;
                match stave.orientation() {
                    // Bow above the stave line
                    Orientation::Italian => {
                        g.y2 = g.y1.max(g.y3) + 2.0 * spacing;
                    }
                    // Anchor under the fret and bow downwards
                    Orientation::French => {
                        g.y1 -= 1.5 * spacing;
                        g.y3 -= 1.5 * spacing;
                        g.y2 = g.y1.min(g.y3) - 2.0 * spacing;
                    }
                }
            }
            Glyph::Section(g) => {
                g.size = config.section_symbol_size;
                g.x = stave.slot_x(g.slot);
                g.y = stave.y() + height * 1.5;
            }
            Glyph::Alfabeto(g) => {
                g.size = config.alfabeto_size();
                g.face = config.alfabeto_face.clone();
                g.x = stave.slot_x(g.slot);
                g.y = stave.y() + height / 2.0 - g.size / 3.0;
            }
            Glyph::Strum(g) => {
                g.stroke_spacing = config.fret_size / 2.0;
                g.x = stave.slot_x(g.slot);
                g.y = stave.y();
            }
        }
    }

    /// Shift right by `padding` per slot of the glyph's position.
    pub fn pad(&mut self, padding: f64) {
        match self {
            Glyph::Note(g) => g.x += g.slot as f64 * padding,
            Glyph::Tick(g) => g.x += g.slot as f64 * padding,
            // The end barline is pinned to the right edge
            Glyph::Barline(g) if g.kind == BarlineKind::End => {}
            Glyph::Barline(g) => g.x += g.slot as f64 * padding,
            Glyph::Barberpole(g) => g.x += g.slot as f64 * padding,
            Glyph::TimeSignature(g) => g.x += g.slot as f64 * padding,
            Glyph::OverSemicircle(g) | Glyph::UnderSemicircle(g) => {
                g.x += g.slot as f64 * padding
            }
            Glyph::Slur(g) => {
                g.x1 += g.start.slot as f64 * padding;
                g.x3 += g.end.slot as f64 * padding;
                g.x2 = (g.x1 + g.x3) / 2.0;
            }
            Glyph::Section(g) => g.x += g.slot as f64 * padding,
            Glyph::Alfabeto(g) => g.x += g.slot as f64 * padding,
            Glyph::Strum(g) => g.x += g.slot as f64 * padding,
        }
    }

    pub fn render(&self, canvas: &mut Canvas) {
        match self {
            Glyph::Note(g) => {
                canvas.text(&g.text, g.x, g.y, g.size, &g.face, TextAlign::Left);
            }
            Glyph::Tick(g) => render_tick(g, canvas),
            Glyph::Barline(g) => render_barline(g, canvas),
            Glyph::Barberpole(g) => render_barberpole(g, canvas),
            Glyph::TimeSignature(g) => render_time_signature(g, canvas),
            Glyph::OverSemicircle(g) => canvas.over_semicircle(g.x, g.y, g.radius),
            Glyph::UnderSemicircle(g) => canvas.under_semicircle(g.x, g.y, g.radius),
            Glyph::Slur(g) => canvas.curve(g.x1, g.y1, g.x2, g.y2, g.x3, g.y3),
            Glyph::Section(g) => {
                canvas.text(SECTION_SIGN, g.x, g.y, g.size, METER_FACE, TextAlign::Left);
            }
            Glyph::Alfabeto(g) => {
                canvas.text(&g.chord, g.x, g.y, g.size, &g.face, TextAlign::Left);
            }
            Glyph::Strum(g) => render_strum(g, canvas),
        }
    }
}

fn render_tick(tick: &Tick, canvas: &mut Canvas) {
    let (x, y) = (tick.x, tick.y);
    if tick.duration.has_stem() {
        canvas.vertical_line(x, y, TICK_HEIGHT, LINE_WIDTH);
    }
    for n in 0..tick.duration.tails() {
        let top = y + TICK_HEIGHT - n as f64 * TAIL_SPACING;
        canvas.line(x, top, x + TAIL_END_OFFSET, top - TAIL_END_OFFSET, LINE_WIDTH);
    }
    canvas.circle(
        x - tick.body_radius,
        y,
        tick.body_radius,
        !tick.duration.hollow(),
    );
    if tick.dotted {
        canvas.circle(x + TICK_DOT_OFFSET, y, TICK_DOT_RADIUS, true);
    }
}

fn render_barline(bar: &Barline, canvas: &mut Canvas) {
    let (x, y, h) = (bar.x, bar.y, bar.height);
    let sp = bar.spacing;
    match bar.kind {
        BarlineKind::Single => {
            canvas.vertical_line(x, y, h, LINE_WIDTH);
        }
        BarlineKind::Double => {
            canvas.vertical_line(x - sp, y, h, LINE_WIDTH);
            canvas.vertical_line(x, y, h, LINE_WIDTH);
        }
        BarlineKind::Short => {
            canvas.vertical_line(x - sp, bar.short_y, bar.short_height, LINE_WIDTH);
            canvas.vertical_line(x, bar.short_y, bar.short_height, LINE_WIDTH);
        }
        BarlineKind::LongShort => {
            canvas.vertical_line(x - sp, y, h, LINE_WIDTH);
            canvas.vertical_line(x, bar.short_y, bar.short_height, LINE_WIDTH);
        }
        BarlineKind::Triple => {
            canvas.vertical_line(x, y, h, LINE_WIDTH);
            canvas.vertical_line(x + sp, bar.short_y, bar.short_height, LINE_WIDTH);
            canvas.vertical_line(x - sp, bar.short_y, bar.short_height, LINE_WIDTH);
        }
        BarlineKind::End => {
            canvas.vertical_line(x - sp, y, h, LINE_WIDTH);
            canvas.vertical_line(x, y, h, 2.0);
        }
    }

    if let Some(label) = &bar.label {
        canvas.colour(0.0, 0.0, 1.0);
        canvas.text(
            label,
            x - bar.label_size / 2.0,
            y + h + bar.label_size / 2.0,
            bar.label_size,
            &bar.label_face,
            TextAlign::Left,
        );
        canvas.black();
    }
}

fn render_barberpole(pole: &Barberpole, canvas: &mut Canvas) {
    let (x, y, w) = (pole.x, pole.y, pole.width);
    let flare = pole.course_spacing * 0.75;
    let radius = w / 2.5;

    // Triangles flare out from the ends of the range to just past the stave
    canvas.triangle(
        x,
        y + pole.upper,
        w,
        pole.stave_height - pole.upper + flare,
        LINE_WIDTH,
    );
    canvas.triangle(x, y + pole.lower, w, -pole.lower - flare, LINE_WIDTH);
    canvas.circle(x + w / 2.0, y - flare - radius, radius, false);
    canvas.circle(
        x + w / 2.0,
        y + pole.stave_height + flare + radius,
        radius,
        false,
    );

    let mut offset = pole.lower;
    while offset < pole.upper - f64::EPSILON {
        canvas.crossed_rectangle(x, y + offset, w, pole.course_spacing, LINE_WIDTH);
        offset += pole.course_spacing;
    }
}

fn render_time_signature(ts: &TimeSignature, canvas: &mut Canvas) {
    let size = ts.size;
    match &ts.meter {
        Meter::Single(figure) => {
            canvas.text(figure, ts.x, ts.y, size, METER_FACE, TextAlign::Left);
        }
        Meter::Double(top, bottom) => {
            canvas.text(top, ts.x, ts.top_y, size, METER_FACE, TextAlign::Left);
            canvas.text(bottom, ts.x, ts.y, size, METER_FACE, TextAlign::Left);
        }
        Meter::Common => {
            canvas.text("C", ts.x, ts.y, size, METER_FACE, TextAlign::Left);
        }
        Meter::SplitCommon => {
            canvas.text("C", ts.x, ts.y, size, METER_FACE, TextAlign::Left);
            canvas.vertical_line(
                ts.x + size / 3.0,
                ts.y - size / 4.0,
                size + size / 4.0,
                1.0,
            );
        }
    }
}

fn render_strum(strum: &Strum, canvas: &mut Canvas) {
    let stroke = strum.stroke_spacing * 1.5;
    let mut offset = strum.stroke_spacing;
    canvas.colour(1.0, 0.0, 0.0);
    for c in strum.pattern.chars() {
        offset += strum.stroke_spacing;
        match c {
            'U' => canvas.vertical_line(strum.x + offset, strum.y, stroke, 1.0),
            'D' => canvas.vertical_line(strum.x + offset, strum.y, -stroke, 1.0),
            _ => {}
        }
    }
    canvas.black();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use pretty_assertions::assert_eq;

    fn stave() -> Stave {
        // x = 72, y = 600, length 450, 30 slots → 15pt per slot
        let mut stave = Stave::new(&LayoutConfig::default(), true);
        stave.set_position(72.0, 600.0, 450.0);
        stave
    }

    fn placed(mut glyph: Glyph, stave: &Stave) -> Glyph {
        glyph.place(stave, &LayoutConfig::default());
        glyph
    }

    fn rendered(glyph: &Glyph) -> Vec<DrawCommand> {
        let mut canvas = Canvas::new();
        glyph.render(&mut canvas);
        canvas.into_commands()
    }

    #[test]
    fn test_note_placement_and_remap() {
        let stave = stave();
        let Glyph::Note(note) = placed(Glyph::note(2, 3, "10T"), &stave) else {
            panic!("expected note");
        };
        assert_eq!(note.x, 102.0);
        // Course 3 line is 20pt above the bottom line, text dropped by floor(10/3)
        assert_eq!(note.y, 617.0);
        assert_eq!(note.text, "XT");
        assert_eq!(note.fret, "10T");
    }

    #[test]
    fn test_tick_tails_follow_duration() {
        let stave = stave();
        let count_lines = |duration| {
            rendered(&placed(Glyph::tick(0, duration, false), &stave))
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { .. }))
                .count()
        };
        assert_eq!(count_lines(Duration::Breve), 0);
        assert_eq!(count_lines(Duration::Minim), 1);
        assert_eq!(count_lines(Duration::Crotchet), 1);
        assert_eq!(count_lines(Duration::Quaver), 2);
        assert_eq!(count_lines(Duration::Semiquaver), 3);
    }

    #[test]
    fn test_tick_body_and_dot() {
        let stave = stave();
        let commands = rendered(&placed(Glyph::tick(1, Duration::Minim, true), &stave));
        let arcs: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arc { filled, radius, .. } => Some((*filled, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(arcs, vec![(false, 2.5), (true, 1.0)]);
    }

    #[test]
    fn test_tick_sits_above_stave() {
        let stave = stave();
        let Glyph::Tick(tick) = placed(Glyph::tick(0, Duration::Crotchet, false), &stave) else {
            panic!("expected tick");
        };
        assert_eq!(tick.x, 77.0);
        assert_eq!(tick.y, 650.0);
    }

    #[test]
    fn test_end_barline_pinned_to_right_edge() {
        let stave = stave();
        let mut glyph = placed(Glyph::barline(BarlineKind::End, 4, None), &stave);
        glyph.pad(3.0);
        let Glyph::Barline(bar) = glyph else {
            panic!("expected barline");
        };
        assert_eq!(bar.x, 522.0);
    }

    #[test]
    fn test_barline_label_is_coloured() {
        let stave = stave();
        let commands = rendered(&placed(
            Glyph::barline(BarlineKind::Single, 3, Some("12".to_string())),
            &stave,
        ));
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[1], DrawCommand::Colour { r: 0.0, g: 0.0, b: 1.0 });
        assert!(matches!(&commands[2], DrawCommand::Text { text, .. } if text == "12"));
    }

    #[test]
    fn test_short_barline_spans_inner_courses() {
        let stave = stave();
        let Glyph::Barline(bar) = placed(Glyph::barline(BarlineKind::Short, 0, None), &stave) else {
            panic!("expected barline");
        };
        assert_eq!(bar.short_y, 610.0);
        assert_eq!(bar.short_height, 20.0);
    }

    #[test]
    fn test_barberpole_range_boxes() {
        let stave = stave();
        let full = rendered(&placed(Glyph::barberpole(0, None), &stave));
        let partial = rendered(&placed(Glyph::barberpole(0, Some((2, 4))), &stave));
        // 2 triangles × 3 lines + 2 circles + boxes × 6 lines
        assert_eq!(full.len(), 6 + 2 + 4 * 6);
        assert_eq!(partial.len(), 6 + 2 + 2 * 6);
    }

    #[test]
    fn test_barberpole_range_follows_orientation() {
        let mut config = LayoutConfig::default();
        config.orientation = Orientation::French;
        let mut stave = Stave::new(&config, true);
        stave.set_position(72.0, 600.0, 450.0);
        let mut glyph = Glyph::barberpole(0, Some((1, 2)));
        glyph.place(&stave, &config);
        let Glyph::Barberpole(pole) = glyph else {
            panic!("expected barberpole");
        };
        assert_eq!((pole.lower, pole.upper), (30.0, 40.0));
    }

    #[test]
    fn test_italian_slur_bows_upwards() {
        let stave = stave();
        let slur = Glyph::slur(
            SlurAnchor { slot: 2, course: 3 },
            SlurAnchor { slot: 5, course: 1 },
        );
        let Glyph::Slur(s) = placed(slur, &stave) else {
            panic!("expected slur");
        };
        assert_eq!((s.x1, s.y1), (102.0, 627.5));
        assert_eq!((s.x3, s.y3), (147.0, 607.5));
        assert_eq!(s.x2, 124.5);
        assert_eq!(s.y2, 647.5);
    }

    #[test]
    fn test_french_slur_bows_downwards() {
        let mut config = LayoutConfig::default();
        config.orientation = Orientation::French;
        let mut stave = Stave::new(&config, true);
        stave.set_position(72.0, 600.0, 450.0);
        let mut glyph = Glyph::slur(
            SlurAnchor { slot: 0, course: 1 },
            SlurAnchor { slot: 2, course: 1 },
        );
        glyph.place(&stave, &config);
        let Glyph::Slur(s) = glyph else {
            panic!("expected slur");
        };
        // Course 1 is the top line (y 640) in French tablature
        assert_eq!(s.y1, 640.0 + 7.5 - 15.0);
        assert!(s.y2 < s.y1);
    }

    #[test]
    fn test_pad_moves_slur_ends_independently() {
        let stave = stave();
        let mut glyph = placed(
            Glyph::slur(
                SlurAnchor { slot: 2, course: 1 },
                SlurAnchor { slot: 4, course: 1 },
            ),
            &stave,
        );
        glyph.pad(1.0);
        let Glyph::Slur(s) = glyph else {
            panic!("expected slur");
        };
        assert_eq!(s.x1, 104.0);
        assert_eq!(s.x3, 136.0);
        assert_eq!(s.x2, 120.0);
    }

    #[test]
    fn test_semicircles_straddle_the_fret() {
        let stave = stave();
        let Glyph::OverSemicircle(over) = placed(Glyph::over_semicircle(1, 2), &stave) else {
            panic!("expected over semicircle");
        };
        let Glyph::UnderSemicircle(under) = placed(Glyph::under_semicircle(1, 2), &stave) else {
            panic!("expected under semicircle");
        };
        assert_eq!(over.x, 89.5);
        assert_eq!(over.y, 610.0 + 8.0 - 5.0);
        assert_eq!(under.y, 610.0 - 3.0);
    }

    #[test]
    fn test_strum_draws_up_and_down_strokes() {
        let stave = stave();
        let commands = rendered(&placed(Glyph::strum(0, "UDxU"), &stave));
        let heights: Vec<f64> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { y1, y2, .. } => Some(y2 - y1),
                _ => None,
            })
            .collect();
        assert_eq!(heights, vec![7.5, -7.5, 7.5]);
        assert_eq!(commands.first(), Some(&DrawCommand::Colour { r: 1.0, g: 0.0, b: 0.0 }));
        assert_eq!(commands.last(), Some(&DrawCommand::Colour { r: 0.0, g: 0.0, b: 0.0 }));
    }

    #[test]
    fn test_time_signature_fraction() {
        let stave = stave();
        let glyph = placed(
            Glyph::time_signature(0, Meter::Double("3".into(), "4".into())),
            &stave,
        );
        let commands = rendered(&glyph);
        assert_eq!(commands.len(), 2);
        let Glyph::TimeSignature(ts) = glyph else {
            panic!("expected time signature");
        };
        assert_eq!(ts.size, 20.0);
        assert_eq!(ts.y, 604.0);
        assert_eq!(ts.top_y, 624.0);
    }

    #[test]
    fn test_split_common_time_has_stroke() {
        let stave = stave();
        let commands = rendered(&placed(Glyph::time_signature(0, Meter::SplitCommon), &stave));
        assert!(matches!(commands[1], DrawCommand::Line { width, .. } if width == 1.0));
    }

    #[test]
    fn test_section_and_alfabeto() {
        let stave = stave();
        let Glyph::Section(section) = placed(Glyph::section(3), &stave) else {
            panic!("expected section");
        };
        assert_eq!((section.x, section.y), (117.0, 660.0));

        let Glyph::Alfabeto(ab) = placed(Glyph::alfabeto(3, "A"), &stave) else {
            panic!("expected alfabeto");
        };
        assert_eq!(ab.size, 40.0);
        assert_eq!(ab.face, "Times-Roman");
    }

    #[test]
    fn test_barline_advance_rule() {
        assert!(BarlineKind::Single.advances());
        assert!(BarlineKind::Double.advances());
        assert!(!BarlineKind::Short.advances());
        assert!(!BarlineKind::End.advances());
    }
}
