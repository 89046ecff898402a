//! PostScript output.
//!
//! Text is drawn with ISO Latin-1 re-encoded copies of the fonts, so the
//! accented letters of Spanish and Italian titles print correctly. The
//! prolog defines one such copy for every face the document uses.

use crate::draw::{DrawCommand, TextAlign};
use std::collections::BTreeSet;

const DEFAULT_FACE: &str = "Times-Roman";
const LATIN1_SUFFIX: &str = "-ISOLatin1";

pub fn to_postscript(commands: &[DrawCommand]) -> String {
    let mut ps = String::new();
    ps.push_str("%!PS-Adobe-3.0\n");

    let mut faces = BTreeSet::new();
    faces.insert(DEFAULT_FACE);
    for command in commands {
        if let DrawCommand::Text { face, .. } = command {
            faces.insert(base_face(face));
        }
    }
    for face in faces {
        ps.push_str(&map_font(face));
    }

    for command in commands {
        ps.push_str(&command_to_ps(command));
        ps.push('\n');
    }
    ps.push_str("showpage\n");
    ps
}

fn base_face(face: &str) -> &str {
    face.strip_suffix(LATIN1_SUFFIX).unwrap_or(face)
}

/// Define `/<face>-ISOLatin1` as a copy of `face` with Latin-1 encoding.
fn map_font(face: &str) -> String {
    format!(
        "/{face} findfont dup length dict begin {{ 1 index /FID ne {{def}} {{pop pop}} ifelse }} forall\n\
         /Encoding ISOLatin1Encoding def currentdict end\n\
         /{face}{suffix} exch definefont pop\n",
        face = face,
        suffix = LATIN1_SUFFIX
    )
}

fn command_to_ps(command: &DrawCommand) -> String {
    match command {
        DrawCommand::Line { x1, y1, x2, y2, width } => format!(
            "newpath {} {} moveto {} {} lineto {} setlinewidth stroke",
            num(*x1),
            num(*y1),
            num(*x2),
            num(*y2),
            num(*width)
        ),
        DrawCommand::Arc {
            x,
            y,
            radius,
            start,
            end,
            clockwise,
            filled,
            width,
        } => {
            let arc = if *clockwise { "arcn" } else { "arc" };
            let paint = if *filled {
                "fill".to_string()
            } else {
                format!("{} setlinewidth stroke", num(*width))
            };
            format!(
                "newpath {} {} {} {} {} {} {}",
                num(*x),
                num(*y),
                num(*radius),
                num(*start),
                num(*end),
                arc,
                paint
            )
        }
        DrawCommand::Curve {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            width,
        } => format!(
            "newpath {x1} {y1} moveto {x1} {y1} {x2} {y2} {x3} {y3} curveto {w} setlinewidth stroke",
            x1 = num(*x1),
            y1 = num(*y1),
            x2 = num(*x2),
            y2 = num(*y2),
            x3 = num(*x3),
            y3 = num(*y3),
            w = num(*width)
        ),
        DrawCommand::Text {
            text,
            x,
            y,
            size,
            face,
            align,
        } => {
            let font = format!(
                "/{}{} findfont {} scalefont setfont",
                base_face(face),
                LATIN1_SUFFIX,
                num(*size)
            );
            let text = escape_ps(text);
            match align {
                TextAlign::Left => format!(
                    "{} newpath {} {} moveto ({}) show",
                    font,
                    num(*x),
                    num(*y),
                    text
                ),
                TextAlign::Centre => format!(
                    "{} {} {} moveto ({}) dup stringwidth pop 2 div neg 0 rmoveto show",
                    font,
                    num(*x),
                    num(*y),
                    text
                ),
                TextAlign::Right => format!(
                    "{} {} ({}) stringwidth pop sub {} moveto ({}) show",
                    font,
                    num(*x),
                    text,
                    num(*y),
                    text
                ),
            }
        }
        DrawCommand::Colour { r, g, b } => {
            format!("{} {} {} setrgbcolor", num(*r), num(*g), num(*b))
        }
        DrawCommand::PageBreak => "showpage".to_string(),
    }
}

/// Up to three decimals, without trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

/// Escape text for a PostScript string literal.
///
/// Parentheses are escaped and Latin-1 characters outside ASCII become octal
/// escapes. A backslash followed by three octal digits is an escape written
/// in the source (`\361` for ñ) and passes through untouched. Every other
/// backslash is doubled. Characters outside Latin-1 cannot be shown by the
/// re-encoded fonts and print as `?`.
pub fn escape_ps(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' if is_octal_escape(&chars[i + 1..]) => out.push(c),
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_ascii() => out.push(c),
            c if (c as u32) <= 0xFF => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

fn is_octal_escape(rest: &[char]) -> bool {
    rest.len() >= 3 && rest[..3].iter().all(|c| ('0'..='7').contains(c))
}
