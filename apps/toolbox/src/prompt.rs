use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable code assistant. \
Your task is to analyze the provided code and answer the user's question. \
Be concise and clear in your explanation, and provide code examples if they are relevant to the user's query.";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("The file '{}' was not found.", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read the file '{}'.", .0.display())]
    Read(PathBuf, #[source] io::Error),
}

/// Persona, then the fenced file contents, then the question.
pub fn build_prompt(file_path: &str, code: &str, query: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\n\
         --- CODE FILE: {file_path} ---\n\
         ```\n{code}\n```\n\n\
         --- USER QUESTION ---\n\
         {query}"
    )
}

pub fn generate_prompt(file_path: impl AsRef<Path>, query: &str) -> Result<String, PromptError> {
    let file_path = file_path.as_ref();
    let code = std::fs::read_to_string(file_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PromptError::NotFound(file_path.to_path_buf()),
        _ => PromptError::Read(file_path.to_path_buf(), e),
    })?;

    Ok(build_prompt(&file_path.display().to_string(), &code, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_layout_is_exact() {
        let prompt = build_prompt("src/main.rs", "fn main() {}", "What does main do?");
        let expected = format!(
            "{}\n\n--- CODE FILE: src/main.rs ---\n```\nfn main() {{}}\n```\n\n--- USER QUESTION ---\nWhat does main do?",
            SYSTEM_PROMPT
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn prompt_is_deterministic_and_keeps_content_verbatim() {
        let code = "line one\n\ttabbed {braces} ```fence```\n";
        let a = build_prompt("a.py", code, "why?");
        let b = build_prompt("a.py", code, "why?");
        assert_eq!(a, b);
        assert!(a.contains(&format!("```\n{}\n```", code)));
        assert!(a.ends_with("--- USER QUESTION ---\nwhy?"));
        assert!(a.starts_with("You are a helpful and knowledgeable code assistant. Your task"));
    }

    #[test]
    fn generate_prompt_reads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.py");
        std::fs::write(&path, "print('hi')").unwrap();

        let prompt = generate_prompt(&path, "explain").unwrap();
        assert_eq!(
            prompt,
            build_prompt(&path.display().to_string(), "print('hi')", "explain")
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.rs");

        let err = generate_prompt(&path, "q").unwrap_err();
        assert!(matches!(err, PromptError::NotFound(ref p) if p == &path));
        assert_eq!(
            err.to_string(),
            format!("The file '{}' was not found.", path.display())
        );
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = generate_prompt(&path, "q").unwrap_err();
        assert!(matches!(err, PromptError::Read(..)));
    }
}
