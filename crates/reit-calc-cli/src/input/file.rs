use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

/// Deserialise a JSON input file (investment, hotel or project parameters).
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let location = locate(path)?;
    tracing::debug!(path = %location.display(), "reading input file");
    let contents = fs::read_to_string(&location)
        .map_err(|e| format!("Cannot read input '{}': {}", location.display(), e))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Invalid input JSON in '{}': {}", location.display(), e).into())
}

/// Relative paths resolve against the working directory; the target must be a regular file.
fn locate(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidate = PathBuf::from(path);
    let location = if candidate.is_absolute() {
        candidate
    } else {
        std::env::current_dir()?.join(candidate)
    };

    match location.metadata() {
        Ok(meta) if meta.is_file() => Ok(location),
        Ok(_) => Err(format!("Input path is not a file: {}", location.display()).into()),
        Err(_) => Err(format!("Input file not found: {}", location.display()).into()),
    }
}
