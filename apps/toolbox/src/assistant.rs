use crate::{output, prompt};
use llm::Completion;
use std::{
    ffi::OsString,
    io::Write,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const USAGE: &str = "usage: code-assistant [-h] file query

A command-line code assistant using Ollama.

positional arguments:
  file        The path to the code file to analyze.
  query       The question you have about the code.

options:
  -h, --help  show this help message and exit

Example: code-assistant my_script.py 'What does the main function do?'";

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantArgs {
    pub file: PathBuf,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(AssistantArgs),
    Help,
}

#[derive(Error, Debug, PartialEq)]
pub enum UsageError {
    #[error("the following arguments are required: {0}")]
    Missing(&'static str),

    #[error("unrecognized arguments: {0}")]
    Unrecognized(String),

    #[error("argument query: not valid UTF-8: {0}")]
    InvalidQuery(String),
}

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Arguments without the program name. The file path is kept as raw OS bytes.
pub fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Command, UsageError> {
    let mut positional = vec![];
    for arg in args {
        if arg == "-h" || arg == "--help" {
            return Ok(Command::Help);
        }
        positional.push(arg);
    }

    let mut positional = positional.into_iter();
    let file = positional.next().ok_or(UsageError::Missing("file, query"))?;
    let query = positional.next().ok_or(UsageError::Missing("query"))?;
    let rest = positional.collect::<Vec<_>>();
    if !rest.is_empty() {
        let rest = rest
            .iter()
            .map(|v| v.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        return Err(UsageError::Unrecognized(rest));
    }

    let query = query
        .into_string()
        .map_err(|v| UsageError::InvalidQuery(v.to_string_lossy().to_string()))?;

    Ok(Command::Run(AssistantArgs {
        file: PathBuf::from(file),
        query,
    }))
}

/// `2` for usage errors, `1` for everything else, unreadable input included.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<UsageError>().is_some() {
        EXIT_USAGE
    } else {
        EXIT_FAILURE
    }
}

pub fn connection_error_message(err: &llm::LLMError) -> String {
    format!("An error occurred while connecting to Ollama: {}", err)
}

#[derive(Debug)]
pub struct RunOutcome {
    pub response: String,
    pub saved: Result<PathBuf, output::OutputError>,
}

/// Fails only when the input file cannot be read, before the model is contacted.
/// A failed save is reported on `err` and left in the outcome.
pub async fn run(
    args: &AssistantArgs,
    completion: &dyn Completion,
    output_dir: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<RunOutcome> {
    writeln!(
        out,
        "Analyzing '{}' with query: '{}'...",
        args.file.display(),
        args.query
    )?;
    writeln!(out, "Please wait for the response from Ollama...")?;

    let prompt = prompt::generate_prompt(&args.file, &args.query)?;

    let response = match completion.get_completion(&prompt).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("completion failed: {:?}", e);
            connection_error_message(&e)
        }
    };

    writeln!(out, "\n--- ASSISTANT RESPONSE ---")?;
    writeln!(out, "{}", response)?;
    writeln!(out, "--------------------------\n")?;

    let saved = output::save_response(output_dir, &args.file, &args.query, &response);
    match &saved {
        Ok(path) => writeln!(out, "Response saved to '{}'", path.display())?,
        Err(e) => writeln!(err, "Error: {}", e)?,
    }

    Ok(RunOutcome { response, saved })
}
