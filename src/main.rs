use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gaspar <input.sanz> [output.ps]");
        eprintln!("       gaspar --yaml <input.sanz> [output.yaml]");
        process::exit(1);
    }

    let mut yaml = false;
    let mut input_path = &args[1];
    let mut output_path: Option<&String> = args.get(2);

    // Parse flags
    if args[1] == "--yaml" {
        yaml = true;
        if args.len() < 3 {
            eprintln!("Usage: gaspar --yaml <input.sanz> [output.yaml]");
            process::exit(1);
        }
        input_path = &args[2];
        output_path = args.get(3);
    }

    let input = Path::new(input_path);
    if !input.is_file() {
        eprintln!("No such file: {}", input.display());
        process::exit(1);
    }

    let source = match fs::read_to_string(input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input.display(), e);
            process::exit(1);
        }
    };

    // Compile
    let result = gaspar::parse(&source).and_then(|document| {
        if yaml {
            gaspar::document_to_yaml(&document)
        } else {
            Ok(gaspar::to_postscript(&gaspar::render_document(&document)))
        }
    });

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(1);
        }
    };

    // Output next to the input unless a path is given
    let extension = if yaml { "yaml" } else { "ps" };
    let output_path = output_path
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension(extension));

    if let Err(e) = fs::write(&output_path, &output) {
        eprintln!("Error writing to '{}': {}", output_path.display(), e);
        process::exit(1);
    }
    eprintln!("Wrote {}", output_path.display());
}
