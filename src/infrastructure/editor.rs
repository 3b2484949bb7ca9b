//! External editor integration for long-form text

use crate::error::{DiaryError, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Session for editing text in an external editor
pub struct EditorSession {
    command: String,
}

impl EditorSession {
    /// Create a new editor session with the given command
    pub fn new(editor_command: String) -> Self {
        EditorSession {
            command: editor_command,
        }
    }

    /// Write `initial` to `scratch`, open it in the editor, wait for the editor
    /// to exit, and return the edited text.
    pub fn edit_text(&self, scratch: &Path, initial: &str) -> Result<String> {
        fs::write(scratch, initial)?;
        let edited = self
            .run(scratch)
            .and_then(|_| fs::read_to_string(scratch).map_err(DiaryError::from));
        let _ = fs::remove_file(scratch);
        edited
    }

    fn run(&self, file_path: &Path) -> Result<()> {
        let (program, mut args) = self.parse_command();
        args.push(file_path.to_string_lossy().to_string());

        // On Windows, use cmd /c to ensure .bat and .cmd files are found
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&program);
            cmd
        } else {
            Command::new(&program)
        };

        let status = cmd.args(&args).status().map_err(|e| {
            DiaryError::Editor(format!("Failed to launch editor '{}': {}", program, e))
        })?;

        if !status.success() {
            return Err(DiaryError::Editor(format!(
                "Editor '{}' exited with {}",
                program, status
            )));
        }
        Ok(())
    }

    /// Parse command into program and arguments
    fn parse_command(&self) -> (String, Vec<String>) {
        let mut parts = self.command.split_whitespace().map(str::to_string);

        match parts.next() {
            Some(program) => (program, parts.collect()),
            None if cfg!(windows) => ("notepad".to_string(), vec![]),
            None => ("nano".to_string(), vec![]),
        }
    }
}
