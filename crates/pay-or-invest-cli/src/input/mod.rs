use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Load a JSON request from `--input <file>` when given, otherwise from piped
/// stdin. Returns `None` when neither is available so the caller can fall
/// back to individual flags.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let (source, contents) = match path {
        Some(path) => {
            let canonical = resolve_path(path)?;
            let contents = fs::read_to_string(&canonical)
                .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
            (canonical.display().to_string(), contents)
        }
        None => match read_stdin()? {
            Some(contents) => ("stdin".to_string(), contents),
            None => return Ok(None),
        },
    };

    let value: T = serde_json::from_str(contents.trim())
        .map_err(|e| format!("Failed to parse '{}': {}", source, e))?;
    Ok(Some(value))
}

/// Piped stdin contents, or `None` for an interactive terminal or empty pipe.
fn read_stdin() -> Result<Option<String>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
