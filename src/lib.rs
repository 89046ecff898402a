pub mod config;
pub mod draw;
pub mod error;
pub mod glyph;
pub mod lexer;
pub mod page;
pub mod parser;
pub mod postscript;
pub mod stave;

pub use config::{LayoutConfig, Orientation};
pub use draw::{Canvas, DrawCommand, TextAlign};
pub use error::*;
pub use glyph::Glyph;
pub use page::{Document, Page};
pub use parser::parse;
pub use postscript::to_postscript;
pub use stave::Stave;

use std::fs;
use std::path::Path;

/// Compile `.sanz` source to a PostScript program.
/// This is the main entry point for the library.
pub fn compile(source: &str) -> Result<String, TabError> {
    let document = parse(source)?;
    Ok(to_postscript(&render_document(&document)))
}

/// Read and compile a `.sanz` file.
pub fn compile_file(path: impl AsRef<Path>) -> Result<String, TabError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| TabError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile(&source)
}

/// Walk the document once and collect its drawing commands.
pub fn render_document(document: &Document) -> Vec<DrawCommand> {
    document.render()
}

/// The coordinate-resolved document as YAML, for tools that post-process
/// the glyph stream instead of the PostScript.
pub fn document_to_yaml(document: &Document) -> Result<String, TabError> {
    Ok(serde_yaml::to_string(document)?)
}
