//! Platform module - Turns tool commands into host invocations
//!
//! On hosts without the disk-imaging tools every imaging and emulator
//! command is handed to the compatibility subsystem as a single shell
//! string. Each argument is quoted on the way in, so paths and flags reach
//! the subsystem's shell exactly as they were built here.

use std::fmt;
use std::path::{Path, PathBuf};

use super::config::HostPlatform;

/// What kind of tool a command runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    /// Native compiler toolchain (never wrapped)
    Compiler,
    /// dd, mkfs.vfat, mtools
    DiskImaging,
    Emulator,
}

/// A single external process invocation, before platform adaptation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    pub kind: ToolKind,
    pub argv: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new<I, S>(kind: ToolKind, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            argv: argv.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn wrapped_on(&self, host: HostPlatform) -> bool {
        host == HostPlatform::CompatibilityRequired && self.kind != ToolKind::Compiler
    }
}

/// Exactly what gets executed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// Produce the invocation for `command` on `host`.
///
/// `compat_prefix` must not be empty; settings validation guarantees it.
pub fn prepare(command: &ToolCommand, host: HostPlatform, compat_prefix: &[String]) -> Invocation {
    if command.wrapped_on(host) {
        let mut args: Vec<String> = compat_prefix[1..].to_vec();
        args.push(join_quoted(&command.argv));
        Invocation {
            program: compat_prefix[0].clone(),
            args,
            cwd: command.cwd.clone(),
        }
    } else {
        let (program, args) = command
            .argv
            .split_first()
            .map(|(p, a)| (p.clone(), a.to_vec()))
            .unwrap_or_default();
        Invocation {
            program,
            args,
            cwd: command.cwd.clone(),
        }
    }
}

/// Flatten an argument vector into one POSIX shell command string
pub fn join_quoted(argv: &[String]) -> String {
    argv.iter()
        .map(|a| shell_quote(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote one argument for a POSIX shell; safe words pass through unchanged
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
