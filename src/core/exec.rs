//! Exec module - The process-execution boundary
//!
//! Every external command goes through [`run_tool`]: it applies the
//! platform adapter, hands the result to an [`Executor`] and turns a
//! non-zero exit into [`PipelineError::ToolInvocation`].

use anyhow::Result;
use colored::*;
use std::process::Command;
use xshell::Shell;

use super::config::BuildConfiguration;
use super::error::PipelineError;
use super::platform::{self, Invocation, ToolCommand};
use super::settings::Settings;
use super::utils::Reporter;

/// Exit status of a finished process
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitOutcome {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub const SUCCESS: ExitOutcome = ExitOutcome { code: Some(0) };

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs invocations synchronously
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome>;
}

/// Runs invocations as child processes with inherited stdio
pub struct SystemExecutor {
    sh: Shell,
}

impl SystemExecutor {
    pub fn new() -> Result<Self> {
        Ok(Self { sh: Shell::new()? })
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        let _dir = invocation.cwd.as_ref().map(|dir| self.sh.push_dir(dir));

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(self.sh.current_dir())
            .status()
            .map_err(|e| PipelineError::unavailable(invocation.to_string(), e.to_string()))?;

        Ok(ExitOutcome {
            code: status.code(),
        })
    }
}

/// Prints invocations instead of running them
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
        match &invocation.cwd {
            Some(dir) => println!(
                "     {} {} {}",
                "$".bright_black(),
                format!("(cd {})", dir.display()).bright_black(),
                invocation.to_string().bright_cyan()
            ),
            None => println!(
                "     {} {}",
                "$".bright_black(),
                invocation.to_string().bright_cyan()
            ),
        }
        Ok(ExitOutcome::SUCCESS)
    }
}

/// Adapt `command` to the host, execute it and fail on a non-zero exit
pub fn run_tool(
    exec: &mut dyn Executor,
    config: &BuildConfiguration,
    settings: &Settings,
    out: &Reporter,
    command: &ToolCommand,
) -> Result<()> {
    let invocation = platform::prepare(command, config.host, &settings.host.compat_prefix);
    out.info(&invocation.to_string());

    let outcome = exec.execute(&invocation)?;
    if !outcome.success() {
        return Err(PipelineError::ToolInvocation {
            command: invocation.to_string(),
            code: outcome.code,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
pub mod testing {
    //! Recording executor with scripted failures

    use super::*;

    #[derive(Default)]
    pub struct RecordingExecutor {
        pub invocations: Vec<Invocation>,
        /// Invocations whose program, arguments or directory contain this text exit with 1
        pub fail_on: Option<String>,
    }

    impl RecordingExecutor {
        pub fn failing_on(needle: &str) -> Self {
            Self {
                invocations: Vec::new(),
                fail_on: Some(needle.to_string()),
            }
        }

        /// First word of the logical command, unwrapping the compat string
        pub fn programs(&self) -> Vec<String> {
            self.invocations
                .iter()
                .map(|inv| match inv.program.as_str() {
                    "wsl" => inv
                        .args
                        .last()
                        .and_then(|s| s.split_whitespace().next())
                        .unwrap_or_default()
                        .to_string(),
                    _ => inv.program.clone(),
                })
                .collect()
        }

        pub fn lines(&self) -> Vec<String> {
            self.invocations.iter().map(|i| i.to_string()).collect()
        }
    }

    impl Executor for RecordingExecutor {
        fn execute(&mut self, invocation: &Invocation) -> Result<ExitOutcome> {
            self.invocations.push(invocation.clone());
            let failed = self.fail_on.as_deref().is_some_and(|needle| {
                invocation.program.contains(needle)
                    || invocation.args.iter().any(|a| a.contains(needle))
                    || invocation
                        .cwd
                        .as_ref()
                        .is_some_and(|d| d.to_string_lossy().contains(needle))
            });
            Ok(ExitOutcome {
                code: Some(if failed { 1 } else { 0 }),
            })
        }
    }
}
