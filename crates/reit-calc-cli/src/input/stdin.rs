use serde_json::Value;
use std::io::{self, Read};

/// JSON piped on stdin, if any. An interactive terminal or blank input yields `None`.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    if piped.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(piped.trim())
        .map(Some)
        .map_err(|e| format!("Invalid JSON on stdin: {e}").into())
}
