//! Drawing primitives: the command stream glyphs render into.
//!
//! Coordinates are in PostScript points with the origin at the bottom-left
//! corner of the page and y growing upwards. A renderer only has to know
//! these few commands; the PostScript sink in `postscript.rs` is one such
//! renderer.

use crate::config::LINE_WIDTH;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// `x` is where the text starts.
    Left,
    /// `x` is the centre of the text.
    Centre,
    /// `x` is where the text ends.
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    /// Circular arc from `start` to `end` degrees, counter-clockwise unless `clockwise`.
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start: f64,
        end: f64,
        clockwise: bool,
        filled: bool,
        width: f64,
    },
    /// Cubic Bézier from (x1, y1) through control points (x1, y1) and (x2, y2) to (x3, y3).
    Curve {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        face: String,
        align: TextAlign,
    },
    /// Colour for everything drawn after it, components in `0.0..=1.0`.
    Colour { r: f64, g: f64, b: f64 },
    PageBreak,
}

/// Accumulates draw commands for one document.
#[derive(Debug, Default)]
pub struct Canvas {
    pub commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2, width });
    }

    /// A vertical line from `y` to `y + height`. Negative heights draw downwards.
    pub fn vertical_line(&mut self, x: f64, y: f64, height: f64, width: f64) {
        self.line(x, y, x, y + height, width);
    }

    pub fn horizontal_line(&mut self, x: f64, y: f64, length: f64, width: f64) {
        self.line(x, y, x + length, y, width);
    }

    pub fn circle(&mut self, x: f64, y: f64, radius: f64, filled: bool) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start: 0.0,
            end: 360.0,
            clockwise: false,
            filled,
            width: LINE_WIDTH,
        });
    }

    /// Upper half of a circle centred on (x, y).
    pub fn over_semicircle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start: 0.0,
            end: 180.0,
            clockwise: false,
            filled: false,
            width: 1.0,
        });
    }

    /// Lower half of a circle centred on (x, y).
    pub fn under_semicircle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start: 0.0,
            end: 180.0,
            clockwise: true,
            filled: false,
            width: 1.0,
        });
    }

    pub fn curve(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.commands.push(DrawCommand::Curve {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            width: LINE_WIDTH,
        });
    }

    pub fn text(&mut self, text: &str, x: f64, y: f64, size: f64, face: &str, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size,
            face: face.to_string(),
            align,
        });
    }

    pub fn colour(&mut self, r: f64, g: f64, b: f64) {
        self.commands.push(DrawCommand::Colour { r, g, b });
    }

    pub fn black(&mut self) {
        self.colour(0.0, 0.0, 0.0);
    }

    pub fn page_break(&mut self) {
        self.commands.push(DrawCommand::PageBreak);
    }

    /// Outline of a `width` × `height` rectangle with its lower-left corner at (x, y).
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64) {
        self.vertical_line(x, y, height, line_width);
        self.vertical_line(x + width, y, height, line_width);
        self.horizontal_line(x, y, width, line_width);
        self.horizontal_line(x, y + height, width, line_width);
    }

    /// A rectangle with both diagonals drawn.
    pub fn crossed_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64) {
        self.rectangle(x, y, width, height, line_width);
        self.line(x, y, x + width, y + height, line_width);
        self.line(x, y + height, x + width, y, line_width);
    }

    /// Isosceles triangle on a horizontal base at `y`; negative heights point down.
    pub fn triangle(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64) {
        let apex_x = x + width / 2.0;
        let apex_y = y + height;
        self.horizontal_line(x, y, width, line_width);
        self.line(x, y, apex_x, apex_y, line_width);
        self.line(x + width, y, apex_x, apex_y, line_width);
    }
}
