//! # Pages and Documents
//!
//! A `Page` stacks staves from the top margin downwards and carries an
//! optional title and composer. A `Document` is the ordered list of pages a
//! source file produces; rendering it walks every page once and returns the
//! complete draw command stream.

use crate::config::LayoutConfig;
use crate::draw::{Canvas, DrawCommand, TextAlign};
use crate::error::TabError;
use crate::glyph::SlurAnchor;
use crate::stave::Stave;
use log::{debug, warn};
use serde::Serialize;

/// Title or composer line, with the style in force when it was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub text: String,
    pub face: String,
    pub size: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    number: u32,
    first: bool,
    width: f64,
    height: f64,
    top_margin: f64,
    left_margin: f64,
    right_margin: f64,
    stave_separation: f64,
    title: Option<Heading>,
    composer: Option<Heading>,
    staves: Vec<Stave>,
}

impl Page {
    pub fn new(number: u32, first: bool, config: &LayoutConfig) -> Self {
        Self {
            number,
            first,
            width: config.page_width,
            height: config.page_height,
            top_margin: config.top_margin,
            left_margin: config.left_margin,
            right_margin: config.right_margin,
            stave_separation: config.stave_separation,
            title: None,
            composer: None,
            staves: Vec::new(),
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Whether this is the first page of its document. Page numbers may
    /// start anywhere, so this is tracked separately.
    pub fn is_first(&self) -> bool {
        self.first
    }

    pub fn staves(&self) -> &[Stave] {
        &self.staves
    }

    pub fn current_stave_mut(&mut self) -> Option<&mut Stave> {
        self.staves.last_mut()
    }

    pub fn title(&self) -> Option<&Heading> {
        self.title.as_ref()
    }

    pub fn composer(&self) -> Option<&Heading> {
        self.composer.as_ref()
    }

    pub fn set_title(&mut self, text: &str, config: &LayoutConfig) {
        self.title = Some(Heading {
            text: text.to_string(),
            face: config.title_face.clone(),
            size: config.title_size,
            y: config.title_y(),
        });
    }

    pub fn set_composer(&mut self, text: &str, config: &LayoutConfig) {
        self.composer = Some(Heading {
            text: text.to_string(),
            face: config.composer_face.clone(),
            size: config.composer_size,
            y: config.composer_y(),
        });
    }

    /// How many staves of the given height fit below the top margin.
    pub fn max_staves(&self, stave_height: f64) -> usize {
        ((self.height - self.top_margin) / (stave_height + self.stave_separation)).floor() as usize
    }

    /// Position `stave` below the staves already on the page and add it.
    pub fn append(&mut self, mut stave: Stave) -> Result<(), TabError> {
        let length = self.width - self.left_margin - self.right_margin;
        if length <= 0.0 {
            return Err(TabError::DegenerateStave {
                page: self.number,
                length,
            });
        }

        let index = self.staves.len();
        if index >= self.max_staves(stave.height()) {
            warn!(
                "page {} holds {} staves; stave {} runs past the bottom of the page",
                self.number,
                self.max_staves(stave.height()),
                index + 1
            );
        }

        let x = self.left_margin;
        let y = self.height
            - self.top_margin
            - index as f64 * (stave.height() + self.stave_separation);
        stave.set_position(x, y, length);
        debug!("page {}: stave {} at ({}, {})", self.number, index + 1, x, y);
        self.staves.push(stave);
        Ok(())
    }

    pub fn justify(&mut self) {
        for stave in &mut self.staves {
            stave.justify();
        }
    }

    pub fn render(&self, canvas: &mut Canvas) {
        if !self.first {
            canvas.page_break();
        }
        if let Some(title) = &self.title {
            canvas.text(
                &title.text,
                self.width / 2.0,
                title.y,
                title.size,
                &title.face,
                TextAlign::Centre,
            );
        }
        if let Some(composer) = &self.composer {
            canvas.text(
                &composer.text,
                self.width - self.left_margin,
                composer.y,
                composer.size,
                &composer.face,
                TextAlign::Right,
            );
        }
        for stave in &self.staves {
            stave.render(canvas);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Slurs left open on any stave, as (page number, stave index, start).
    pub fn unclosed_slurs(&self) -> Vec<(u32, usize, SlurAnchor)> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.staves()
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, stave)| {
                        stave.pending_slur().map(|start| (page.number(), index + 1, start))
                    })
            })
            .collect()
    }

    pub fn justify(&mut self) {
        for page in &mut self.pages {
            page.justify();
        }
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        let mut canvas = Canvas::new();
        for page in &self.pages {
            page.render(&mut canvas);
        }
        canvas.into_commands()
    }
}
