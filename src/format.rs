//! Post-formatting of generated files.
//!
//! The formatter is optional: a missing program or a failing run is logged at
//! debug level and otherwise ignored.
//!
//! ```ignore
//! format_file(&["rustfmt".into(), "--edition".into(), "2021".into()], path);
//! ```

use crate::debug;
use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::{Command, Output},
};

/// Command builder for the formatter process.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    /// Create from a command array (e.g., `["rustfmt", "--edition", "2021"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args = iter.map(|s| s.as_ref().to_owned()).collect();
        Self { program, args }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Resolve the program on `PATH` and run it to completion.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();
        let program =
            which::which(&self.program).with_context(|| format!("`{name}` not found on PATH"))?;

        let output = Command::new(program)
            .args(&self.args)
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("Command `{name}` failed with {}\n{}", output.status, stderr.trim());
        }
        Ok(output)
    }
}

/// Run `command` with `path` appended. Errors are logged and swallowed.
pub fn format_file(command: &[String], path: &Path) {
    if command.is_empty() {
        return;
    }
    match Cmd::from_slice(command).arg(path).run() {
        Ok(_) => debug!("format"; "formatted {}", path.display()),
        Err(e) => debug!("format"; "skipped {}: {:#}", path.display(), e),
    }
}
