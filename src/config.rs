//! # Layout Configuration
//!
//! `LayoutConfig` holds every style and geometry setting a document can change
//! with a directive line (`SLOTS 24`, `FRENCH`, `FRETMAP 10-X`, ...).
//!
//! A fresh config is built for each compile and owned by the parser. Pages,
//! staves and glyphs copy what they need out of it when they are created, so
//! a directive only affects what comes after it in the file.

use serde::Serialize;
use std::collections::BTreeMap;

pub const A4_WIDTH: f64 = 595.0;
pub const A4_HEIGHT: f64 = 842.0;

/// Default stroke width for stave lines, barlines and ornaments.
pub const LINE_WIDTH: f64 = 0.5;

/// Which end of the stave course 1 is drawn on.
///
/// Italian/Spanish tablature puts course 1 on the bottom line; French puts
/// it on the top line. PostScript y grows upwards, so Italian course 1 has
/// the smallest y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    #[default]
    Italian,
    French,
}

impl Orientation {
    /// Map a 1-based course number to its 1-based line position counted from
    /// the bottom of the stave.
    pub fn line_position(self, course: usize, courses: usize) -> usize {
        match self {
            Orientation::Italian => course,
            Orientation::French => (courses + 1).saturating_sub(course),
        }
    }
}

/// Fret remapping table, e.g. `10 -> X` for tablatures that write ten as a cross.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FretMap {
    entries: BTreeMap<String, String>,
}

impl FretMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remap a fret token.
    ///
    /// The leading digits are looked up and the adornment suffix is kept as
    /// written, so with `10 -> X` the token `10:.` becomes `X:.`. Tokens that
    /// do not start with a digit are looked up whole. Anything not in the
    /// table passes through unchanged.
    pub fn remap(&self, fret: &str) -> String {
        let split = fret
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(fret.len());
        if split == 0 {
            return self.lookup(fret).to_string();
        }
        let (number, suffix) = fret.split_at(split);
        format!("{}{}", self.lookup(number), suffix)
    }

    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Numeric and font-face settings that take a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    PageWidth,
    PageHeight,
    TopMargin,
    BottomMargin,
    LeftMargin,
    RightMargin,
    StaveSeparation,
    Slots,
    NumberOfCourses,
    CourseSpacing,
    BarlineSpacing,
    BarberpoleSpacing,
    TitleSize,
    TitleYPosition,
    ComposerSize,
    ComposerYPosition,
    FretSize,
    CourseSize,
    BarlineSize,
    TitleFace,
    ComposerFace,
    FretFace,
    CourseFace,
    BarlineFace,
}

impl Setting {
    /// The directive keyword as written in a `.sanz` file.
    pub fn keyword(self) -> &'static str {
        match self {
            Setting::PageWidth => "PAGEWIDTH",
            Setting::PageHeight => "PAGEHEIGHT",
            Setting::TopMargin => "TOPMARGIN",
            Setting::BottomMargin => "BOTTOMMARGIN",
            Setting::LeftMargin => "LEFTMARGIN",
            Setting::RightMargin => "RIGHTMARGIN",
            Setting::StaveSeparation => "STAVESEPARATION",
            Setting::Slots => "SLOTS",
            Setting::NumberOfCourses => "NUMBEROFCOURSES",
            Setting::CourseSpacing => "COURSESPACING",
            Setting::BarlineSpacing => "BARLINESPACING",
            Setting::BarberpoleSpacing => "BARBERPOLESPACING",
            Setting::TitleSize => "TITLESIZE",
            Setting::TitleYPosition => "TITLEYPOSITION",
            Setting::ComposerSize => "COMPOSERSIZE",
            Setting::ComposerYPosition => "COMPOSERYPOSITION",
            Setting::FretSize => "FRETSIZE",
            Setting::CourseSize => "COURSESIZE",
            Setting::BarlineSize => "BARLINESIZE",
            Setting::TitleFace => "TITLEFACE",
            Setting::ComposerFace => "COMPOSERFACE",
            Setting::FretFace => "FRETFACE",
            Setting::CourseFace => "COURSEFACE",
            Setting::BarlineFace => "BARLINEFACE",
        }
    }

    pub const ALL: [Setting; 24] = [
        Setting::PageWidth,
        Setting::PageHeight,
        Setting::TopMargin,
        Setting::BottomMargin,
        Setting::LeftMargin,
        Setting::RightMargin,
        Setting::StaveSeparation,
        Setting::Slots,
        Setting::NumberOfCourses,
        Setting::CourseSpacing,
        Setting::BarlineSpacing,
        Setting::BarberpoleSpacing,
        Setting::TitleSize,
        Setting::TitleYPosition,
        Setting::ComposerSize,
        Setting::ComposerYPosition,
        Setting::FretSize,
        Setting::CourseSize,
        Setting::BarlineSize,
        Setting::TitleFace,
        Setting::ComposerFace,
        Setting::FretFace,
        Setting::CourseFace,
        Setting::BarlineFace,
    ];
}

/// Boolean switches. Each one can only be turned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    ShowCourses,
    Justified,
    FretMappingOff,
    French,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    // Page
    pub page_width: f64,
    pub page_height: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub left_margin: f64,
    pub right_margin: f64,

    // Stave
    pub stave_separation: f64,
    pub number_of_courses: usize,
    pub course_spacing: f64,
    pub slots: usize,
    /// Pitches per course, course 1 first. Each course has one or two strings.
    pub courses: Vec<Vec<String>>,
    pub course_face: String,
    pub course_size: f64,
    pub show_courses: bool,
    pub justified: bool,

    // Barlines
    pub barline_spacing: f64,
    pub barberpole_spacing: f64,
    pub barline_face: String,
    pub barline_size: f64,

    // Rhythm
    pub tick_body_radius: f64,

    // Text
    pub title_face: String,
    pub title_size: f64,
    pub title_y_position: Option<f64>,
    pub composer_face: String,
    pub composer_size: f64,
    pub composer_y_position: Option<f64>,
    pub fret_face: String,
    pub fret_size: f64,
    pub section_symbol_size: f64,
    pub alfabeto_face: String,
    pub alfabeto_size: Option<f64>,

    // Frets
    pub fret_map: FretMap,
    pub map_frets: bool,
    pub orientation: Orientation,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let mut fret_map = FretMap::new();
        fret_map.insert("10", "X");

        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            top_margin: 200.0,
            bottom_margin: 72.0,
            left_margin: 72.0,
            right_margin: 72.0,

            stave_separation: 48.0,
            number_of_courses: 5,
            course_spacing: 10.0,
            slots: 30,
            courses: ["E4", "B3-B3", "G3-G3", "D4-D4", "A4-A4"]
                .iter()
                .map(|c| c.split('-').map(str::to_string).collect())
                .collect(),
            course_face: "ArialMT".to_string(),
            course_size: 8.0,
            show_courses: false,
            justified: false,

            barline_spacing: 4.0,
            barberpole_spacing: 8.0,
            barline_face: "ArialMT".to_string(),
            barline_size: 8.0,

            tick_body_radius: 2.5,

            title_face: "Zapfino".to_string(),
            title_size: 24.0,
            title_y_position: None,
            composer_face: "Times-Roman".to_string(),
            composer_size: 12.0,
            composer_y_position: None,
            fret_face: "ArialMT".to_string(),
            fret_size: 10.0,
            section_symbol_size: 18.0,
            alfabeto_face: "Times-Roman".to_string(),
            alfabeto_size: None,

            fret_map,
            map_frets: true,
            orientation: Orientation::Italian,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width available to a stave between the left and right margins.
    pub fn stave_length(&self) -> f64 {
        self.page_width - self.left_margin - self.right_margin
    }

    pub fn title_y(&self) -> f64 {
        self.title_y_position.unwrap_or(self.page_height - 100.0)
    }

    pub fn composer_y(&self) -> f64 {
        self.composer_y_position.unwrap_or(self.title_y() - 20.0)
    }

    /// Alfabeto letters fill most of the stave height unless sized explicitly.
    pub fn alfabeto_size(&self) -> f64 {
        self.alfabeto_size
            .unwrap_or(0.8 * self.course_spacing * self.number_of_courses as f64)
    }

    pub fn semicircle_radius(&self) -> f64 {
        self.fret_size / 2.0
    }

    /// Fret text as it will be printed.
    pub fn fret_text(&self, fret: &str) -> String {
        if self.map_frets {
            self.fret_map.remap(fret)
        } else {
            fret.to_string()
        }
    }

    /// Apply a single-valued setting. Returns a human-readable reason on failure.
    pub fn set(&mut self, setting: Setting, value: &str) -> Result<(), String> {
        let value = value.trim();
        match setting {
            Setting::PageWidth => self.page_width = parse_length(value)?,
            Setting::PageHeight => self.page_height = parse_length(value)?,
            Setting::TopMargin => self.top_margin = parse_length(value)?,
            Setting::BottomMargin => self.bottom_margin = parse_length(value)?,
            Setting::LeftMargin => self.left_margin = parse_length(value)?,
            Setting::RightMargin => self.right_margin = parse_length(value)?,
            Setting::StaveSeparation => self.stave_separation = parse_length(value)?,
            Setting::Slots => self.slots = parse_count(value)?,
            Setting::NumberOfCourses => self.number_of_courses = parse_count(value)?,
            Setting::CourseSpacing => self.course_spacing = parse_length(value)?,
            Setting::BarlineSpacing => self.barline_spacing = parse_length(value)?,
            Setting::BarberpoleSpacing => self.barberpole_spacing = parse_length(value)?,
            Setting::TitleSize => self.title_size = parse_length(value)?,
            Setting::TitleYPosition => self.title_y_position = Some(parse_length(value)?),
            Setting::ComposerSize => self.composer_size = parse_length(value)?,
            Setting::ComposerYPosition => self.composer_y_position = Some(parse_length(value)?),
            Setting::FretSize => self.fret_size = parse_length(value)?,
            Setting::CourseSize => self.course_size = parse_length(value)?,
            Setting::BarlineSize => self.barline_size = parse_length(value)?,
            Setting::TitleFace => self.title_face = parse_face(value)?,
            Setting::ComposerFace => self.composer_face = parse_face(value)?,
            Setting::FretFace => self.fret_face = parse_face(value)?,
            Setting::CourseFace => self.course_face = parse_face(value)?,
            Setting::BarlineFace => self.barline_face = parse_face(value)?,
        }
        Ok(())
    }

    pub fn set_flag(&mut self, flag: Flag) {
        match flag {
            Flag::ShowCourses => self.show_courses = true,
            Flag::Justified => self.justified = true,
            Flag::FretMappingOff => self.map_frets = false,
            Flag::French => self.orientation = Orientation::French,
        }
    }

    /// Replace the course list from `E4 B3-B3 G3-G3 ...`. The course count follows the list.
    pub fn set_courses(&mut self, list: &str) -> Result<(), String> {
        let mut courses = Vec::new();
        for group in list.split_whitespace() {
            let strings: Vec<String> = group.split('-').map(str::to_string).collect();
            if strings.iter().any(String::is_empty) {
                return Err(format!("empty pitch in course '{}'", group));
            }
            if strings.len() > 2 {
                return Err(format!(
                    "course '{}' has {} strings; a course has one or two",
                    group,
                    strings.len()
                ));
            }
            courses.push(strings);
        }
        if courses.is_empty() {
            return Err("no courses listed".to_string());
        }
        self.number_of_courses = courses.len();
        self.courses = courses;
        Ok(())
    }

    /// Replace the fret map from `10-X 11-Y ...`. An empty list leaves the map alone.
    pub fn set_fret_map(&mut self, list: &str) -> Result<(), String> {
        let mut pairs = list.split_whitespace().peekable();
        if pairs.peek().is_none() {
            return Ok(());
        }
        let mut map = FretMap::new();
        for pair in pairs {
            match pair.split_once('-') {
                Some((from, to)) if !from.is_empty() && !to.is_empty() => map.insert(from, to),
                _ => return Err(format!("expected <fret>-<glyph>, found '{}'", pair)),
            }
        }
        self.fret_map = map;
        Ok(())
    }
}

fn parse_length(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(v) => Err(format!("expected a non-negative number, found {}", v)),
        Err(_) => Err(format!("expected a number, found '{}'", value)),
    }
}

fn parse_count(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(v) => Ok(v),
        Err(_) => Err(format!("expected a whole number, found '{}'", value)),
    }
}

fn parse_face(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("expected a font name".to_string())
    } else {
        Ok(value.to_string())
    }
}
