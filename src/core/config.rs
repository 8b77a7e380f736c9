//! Configuration module - Build configuration, task selection and constants

use anyhow::Result;
use std::fmt;

use super::error::PipelineError;

/// Fixed paths inside the disk image
pub mod image_paths {
    /// EFI boot directory
    pub const EFI: &str = "EFI";

    /// Fallback boot directory read by UEFI firmware
    pub const EFI_BOOT: &str = "EFI/BOOT";

    /// Bootloader location expected by the firmware
    pub const BOOTLOADER_EFI: &str = "EFI/BOOT/BOOTX64.EFI";

    /// Kernel location expected by the bootloader
    pub const KERNEL: &str = "kernel.elf";
}

/// Host OS names that lack the disk-imaging tools
pub const COMPAT_REQUIRED_OS: &[&str] = &["windows"];

/// Build mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    Debug,
    #[default]
    Release,
}

impl Mode {
    /// Cargo profile directory name
    pub fn profile(&self) -> &'static str {
        match self {
            Mode::Debug => "debug",
            Mode::Release => "release",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Mode::Debug)
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "debug" => Some(Mode::Debug),
            "release" => Some(Mode::Release),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile())
    }
}

/// How external imaging/emulator commands reach the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPlatform {
    /// Tools are available directly
    Native,
    /// Tools must be proxied through the compatibility subsystem
    CompatibilityRequired,
}

impl HostPlatform {
    /// Classify a host OS name such as `std::env::consts::OS`
    pub fn detect(os: &str) -> Self {
        let os = os.to_lowercase();
        if COMPAT_REQUIRED_OS.contains(&os.as_str()) {
            HostPlatform::CompatibilityRequired
        } else {
            HostPlatform::Native
        }
    }

    /// Parse the `host.platform` settings override
    pub fn from_setting(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "native" => Ok(HostPlatform::Native),
            "compat" | "compatibility" => Ok(HostPlatform::CompatibilityRequired),
            other => Err(PipelineError::configuration(format!(
                "host.platform desconhecida: '{}' (use 'native' ou 'compat')",
                other
            ))
            .into()),
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Native => f.write_str("native"),
            HostPlatform::CompatibilityRequired => f.write_str("compat"),
        }
    }
}

/// Top-level pipeline action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    Build,
    Run,
    Install,
}

impl Task {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "build" => Some(Task::Build),
            "run" => Some(Task::Run),
            "install" => Some(Task::Install),
            _ => None,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Build => f.write_str("build"),
            Task::Run => f.write_str("run"),
            Task::Install => f.write_str("install"),
        }
    }
}

/// Resolved once per invocation and never mutated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub host: HostPlatform,
    pub mode: Mode,
}

/// Resolve the task and build configuration from the positional tokens.
///
/// The first token names the task (`build` when absent). Remaining tokens
/// must be `debug` or `release`; the last one wins. Anything else is a
/// configuration error, so nothing runs on a typo.
pub fn resolve(tokens: &[String], host: HostPlatform) -> Result<(Task, BuildConfiguration)> {
    let (task, rest) = match tokens.split_first() {
        None => (Task::Build, tokens),
        Some((first, rest)) => {
            let task = Task::from_token(first).ok_or_else(|| {
                PipelineError::configuration(format!(
                    "task desconhecida: '{}' (use build, run ou install)",
                    first
                ))
            })?;
            (task, rest)
        }
    };

    let mut mode = Mode::default();
    for token in rest {
        mode = Mode::from_token(token).ok_or_else(|| {
            PipelineError::configuration(format!(
                "token desconhecido: '{}' (use debug ou release)",
                token
            ))
        })?;
    }

    Ok((task, BuildConfiguration { host, mode }))
}
