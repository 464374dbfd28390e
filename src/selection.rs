//! Interactive choice of a cached forecast document.
//!
//! Input and output are injected so the prompt loop can be driven from tests.

use crate::utils::FORECAST_EXTENSION;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Failed to list forecast directory '{0}'")]
    ReadDir(PathBuf, #[source] io::Error),

    #[error("Failed to interact with the terminal")]
    Terminal(#[from] io::Error),
}

/// Cached documents in `dir`, sorted by file name (and therefore by date).
pub fn list_forecasts(dir: &Path) -> Result<Vec<PathBuf>, SelectionError> {
    let entries = fs::read_dir(dir).map_err(|e| SelectionError::ReadDir(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| SelectionError::ReadDir(dir.to_path_buf(), e))?
            .path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(FORECAST_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Lists the cached documents in `dir`, prompts for a 1-based number and returns
/// the chosen path.
///
/// Invalid input (non-numeric or out of range) is reported and the prompt repeats.
/// Returns `Ok(None)` when there is nothing to choose from or when `input` reaches
/// end of file before a valid choice.
pub fn select_forecast<R: BufRead, W: Write>(
    dir: &Path,
    input: R,
    mut output: W,
) -> Result<Option<PathBuf>, SelectionError> {
    let files = list_forecasts(dir)?;
    if files.is_empty() {
        writeln!(output, "No JSON forecast files found.")?;
        return Ok(None);
    }

    writeln!(output, "Available forecast files:")?;
    for (i, file) in files.iter().enumerate() {
        let name = file.file_name().unwrap_or(file.as_os_str());
        writeln!(output, "{}. {}", i + 1, name.to_string_lossy())?;
    }

    Ok(prompt_choice(files.len(), input, output)?.map(|idx| files[idx].clone()))
}

/// Prompts until a number in `1..=count` is entered; returns its 0-based index.
fn prompt_choice<R: BufRead, W: Write>(
    count: usize,
    mut input: R,
    mut output: W,
) -> Result<Option<usize>, SelectionError> {
    let mut line = String::new();
    loop {
        write!(output, "Choose a file number: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=count).contains(&choice) => return Ok(Some(choice - 1)),
            _ => writeln!(output, "Invalid choice. Please enter a valid file number.")?,
        }
    }
}
