//! Builder module - Project root discovery and the two compilation jobs

use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use super::config::BuildConfiguration;
use super::exec::{self, Executor};
use super::platform::{ToolCommand, ToolKind};
use super::settings::{JobSettings, SETTINGS_FILE, Settings};
use super::utils::Reporter;

/// Get the project root directory
pub fn project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    let start = std::env::current_dir().context("Failed to get current directory")?;
    let mut current = start.clone();

    loop {
        if current.join(SETTINGS_FILE).exists() {
            return Ok(current);
        }

        let cargo_toml = current.join("Cargo.toml");
        if cargo_toml.exists() {
            // Check if this is the workspace root by looking for [workspace]
            if let Ok(content) = std::fs::read_to_string(&cargo_toml) {
                if content.contains("[workspace]") {
                    return Ok(current);
                }
            }
        }

        // Try parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    Ok(start)
}

/// Cargo command line for one job
pub fn cargo_command(
    root: &Path,
    job: &JobSettings,
    config: &BuildConfiguration,
    verbose: bool,
) -> ToolCommand {
    let mut args = vec!["cargo".to_string(), "build".to_string()];

    if !config.mode.is_debug() {
        args.push("--release".into());
    }

    if config.mode.is_debug() && !job.debug_features.is_empty() {
        args.push(format!("--features={}", job.debug_features.join(",")));
    }

    if verbose {
        args.push("-vv".into());
    }

    ToolCommand::new(ToolKind::Compiler, args).current_dir(root.join(&job.dir))
}

/// Build a single job
pub fn build_job(
    exec: &mut dyn Executor,
    root: &Path,
    name: &str,
    job: &JobSettings,
    config: &BuildConfiguration,
    settings: &Settings,
    out: &Reporter,
) -> Result<()> {
    out.step(&format!(
        "{} {} (target: {})",
        name.bright_cyan(),
        job.dir.bright_black(),
        job.target.bright_black()
    ));

    let command = cargo_command(root, job, config, out.verbose);
    exec::run_tool(exec, config, settings, out, &command)
        .with_context(|| format!("Failed to build {}", name))
}

/// Compile the bootloader, then the kernel; the first failure stops both
pub fn build_all(
    exec: &mut dyn Executor,
    root: &Path,
    config: &BuildConfiguration,
    settings: &Settings,
    out: &Reporter,
) -> Result<()> {
    build_job(exec, root, "bootloader", &settings.bootloader, config, settings, out)?;
    out.success("Bootloader compilado");

    build_job(exec, root, "kernel", &settings.kernel, config, settings, out)?;
    out.success("Kernel compilado");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{HostPlatform, Mode};
    use crate::core::error::PipelineError;
    use crate::core::exec::testing::RecordingExecutor;

    fn config(mode: Mode) -> BuildConfiguration {
        BuildConfiguration {
            host: HostPlatform::Native,
            mode,
        }
    }

    #[test]
    fn test_release_jobs_have_no_debug_flags() {
        let settings = Settings::default();
        let root = Path::new("/proj");

        let boot = cargo_command(root, &settings.bootloader, &config(Mode::Release), false);
        assert_eq!(boot.argv, vec!["cargo", "build", "--release"]);
        assert_eq!(boot.cwd, Some(PathBuf::from("/proj/bootloader")));

        let kernel = cargo_command(root, &settings.kernel, &config(Mode::Release), false);
        assert_eq!(kernel.argv, vec!["cargo", "build", "--release"]);
        assert_eq!(kernel.cwd, Some(PathBuf::from("/proj/kernel")));
    }

    #[test]
    fn test_debug_mode_propagates_to_both_jobs() {
        let settings = Settings::default();
        let root = Path::new("/proj");

        let boot = cargo_command(root, &settings.bootloader, &config(Mode::Debug), false);
        assert_eq!(boot.argv, vec!["cargo", "build", "--features=wait_for_gdb"]);

        let kernel = cargo_command(root, &settings.kernel, &config(Mode::Debug), false);
        assert_eq!(kernel.argv, vec!["cargo", "build"]);
    }

    #[test]
    fn test_verbose_passes_vv() {
        let settings = Settings::default();
        let cmd = cargo_command(Path::new("."), &settings.kernel, &config(Mode::Release), true);
        assert_eq!(cmd.argv.last().unwrap(), "-vv");
    }

    #[test]
    fn test_build_all_runs_bootloader_then_kernel() {
        let mut exec = RecordingExecutor::default();
        build_all(
            &mut exec,
            Path::new("/proj"),
            &config(Mode::Release),
            &Settings::default(),
            &Reporter::silent(),
        )
        .unwrap();

        let dirs: Vec<_> = exec.invocations.iter().map(|i| i.cwd.clone().unwrap()).collect();
        assert_eq!(
            dirs,
            vec![PathBuf::from("/proj/bootloader"), PathBuf::from("/proj/kernel")]
        );
    }

    #[test]
    fn test_bootloader_failure_skips_kernel() {
        let mut exec = RecordingExecutor::failing_on("bootloader");
        let err = build_all(
            &mut exec,
            Path::new("/proj"),
            &config(Mode::Release),
            &Settings::default(),
            &Reporter::silent(),
        )
        .unwrap_err();

        assert_eq!(exec.invocations.len(), 1);
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ToolInvocation { .. })
        ));
    }

    #[test]
    fn test_explicit_root_wins() {
        let root = project_root(Some(Path::new("/somewhere"))).unwrap();
        assert_eq!(root, PathBuf::from("/somewhere"));
    }
}
