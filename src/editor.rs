//! External editor used to edit a draft entry as a JSON file.
//!
//! The [`Editor`] trait is the seam between the edit command and the process it
//! spawns, so tests can substitute an editor that rewrites the file in place.

use crate::errors::{AppError, AppResult, EditorError};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Opens a file for the user to edit and returns once editing is finished.
///
/// # Examples
///
/// ```
/// use daybook::editor::Editor;
/// use daybook::errors::AppResult;
/// use std::path::Path;
///
/// struct Untouched;
///
/// impl Editor for Untouched {
///     fn edit(&self, _path: &Path) -> AppResult<()> {
///         Ok(())
///     }
/// }
///
/// Untouched.edit(Path::new("2024-03-10.json")).unwrap();
/// ```
pub trait Editor {
    /// Blocks until the user has finished editing `path`.
    ///
    /// # Errors
    ///
    /// Implementations return `AppError::Editor` when the edit could not be
    /// completed. The caller must not save the file in that case.
    fn edit(&self, path: &Path) -> AppResult<()>;
}

/// Launches the configured editor command with the file path as its only argument.
#[derive(Debug, Clone)]
pub struct SystemEditor {
    /// Editor binary, already validated by the configuration layer.
    pub editor_cmd: String,
}

impl SystemEditor {
    pub fn new(editor_cmd: impl Into<String>) -> Self {
        SystemEditor {
            editor_cmd: editor_cmd.into(),
        }
    }
}

impl Editor for SystemEditor {
    fn edit(&self, path: &Path) -> AppResult<()> {
        debug!("Launching editor: {} {:?}", self.editor_cmd, path);

        let command = self.editor_cmd.clone();
        let status = Command::new(&self.editor_cmd)
            .arg(path)
            .status()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => EditorError::CommandNotFound { command, source },
                ErrorKind::PermissionDenied => EditorError::PermissionDenied { command, source },
                _ => EditorError::ExecutionFailed { command, source },
            })?;

        if !status.success() {
            return Err(AppError::Editor(EditorError::NonZeroExit {
                command: self.editor_cmd.clone(),
                status_code: status.code().unwrap_or(-1),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_editor_is_command_not_found() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("draft.json");
        fs::write(&file, "{}").unwrap();

        let editor = SystemEditor::new("daybook-no-such-editor-binary");
        match editor.edit(&file) {
            Err(AppError::Editor(EditorError::CommandNotFound { command, .. })) => {
                assert_eq!(command, "daybook-no-such-editor-binary");
            }
            other => panic!("Expected CommandNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_exit_status() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("draft.json");
        fs::write(&file, "{}").unwrap();

        assert!(SystemEditor::new("true").edit(&file).is_ok());

        match SystemEditor::new("false").edit(&file) {
            Err(AppError::Editor(EditorError::NonZeroExit { status_code, .. })) => {
                assert_eq!(status_code, 1);
            }
            other => panic!("Expected NonZeroExit, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_editor_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let script = dir.path().join("not-executable");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o600)).unwrap();
        let file = dir.path().join("draft.json");
        fs::write(&file, "{}").unwrap();

        let editor = SystemEditor::new(script.to_string_lossy().to_string());
        assert!(matches!(
            editor.edit(&file),
            Err(AppError::Editor(EditorError::PermissionDenied { .. }))
        ));
    }
}
