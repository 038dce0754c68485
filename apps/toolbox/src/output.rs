use lazy_static::lazy_static;
use regex::Regex;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const OUTPUT_FILE_PREFIX: &str = "out-";

lazy_static! {
    // anchored at the start only, `out-00001.md.bak` still counts
    static ref OUTPUT_FILE_PATTERN: Regex =
        Regex::new(r"^out-(\d{5})\.md").expect("output file pattern is valid");
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Could not create output directory '{}': {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Could not read output directory '{}': {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("Could not save response to '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub fn output_file_name(number: u32) -> String {
    format!("{}{:05}.md", OUTPUT_FILE_PREFIX, number)
}

/// Sequence number of an existing output file name, if it is one.
pub fn parse_output_number(file_name: &str) -> Option<u32> {
    OUTPUT_FILE_PATTERN
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Highest existing number plus one, `0` for a directory without output files.
///
/// Scans the directory once without locking, concurrent runs may pick the same number.
/// Past `out-99999.md` the result is `100000`, and the six-digit file it names is not
/// matched by later scans, so every following run rewrites `out-100000.md`.
pub fn next_output_number(dir: impl AsRef<Path>) -> Result<u32, OutputError> {
    let dir = dir.as_ref();
    let read_dir_error = |source| OutputError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut max_num = None;
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let Some(num) = entry.file_name().to_str().and_then(parse_output_number) else {
            continue;
        };
        max_num = max_num.max(Some(num));
    }

    Ok(max_num.map_or(0, |n| n + 1))
}

pub fn render_output(file_path: impl AsRef<Path>, query: &str, response: &str) -> String {
    let file_path = file_path.as_ref();
    let name = file_path
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    format!("# Analysis of: `{name}`\n\n**Query:**\n> {query}\n\n---\n\n{response}")
}

/// Writes the response as the next `out-XXXXX.md` in `dir`, creating `dir` when missing.
#[tracing::instrument(err(Debug), skip_all, fields(dir = %dir.as_ref().display()))]
pub fn save_response(
    dir: impl AsRef<Path>,
    file_path: impl AsRef<Path>,
    query: &str,
    response: &str,
) -> Result<PathBuf, OutputError> {
    let dir = dir.as_ref();

    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let next_num = next_output_number(dir)?;
    let output_path = dir.join(output_file_name(next_num));
    tracing::debug!("writing response to {:?}", output_path);

    std::fs::write(&output_path, render_output(file_path, query, response)).map_err(|source| {
        OutputError::Write {
            path: output_path.clone(),
            source,
        }
    })?;

    Ok(output_path)
}
