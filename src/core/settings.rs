//! Settings module - Project layout read from `bootforge.toml`
//!
//! Every field has a default, so a project without the file builds the
//! classic layout: `bootloader/` and `kernel/` sharing one `target/`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::config::{BuildConfiguration, HostPlatform, Mode};
use super::error::PipelineError;

/// Settings file looked up at the project root
pub const SETTINGS_FILE: &str = "bootforge.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Shared cargo target directory, relative to the project root
    pub target_dir: String,
    pub image: ImageSettings,
    pub bootloader: JobSettings,
    pub kernel: JobSettings,
    pub emulator: EmulatorSettings,
    pub install: InstallSettings,
    pub host: HostSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSettings {
    pub name: String,
    pub size_mib: u32,
}

/// One compilation job
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSettings {
    /// Project directory the job runs in
    pub dir: String,
    /// Target triple (or custom target spec name) of the output directory
    pub target: String,
    /// File name of the produced binary
    pub binary: String,
    /// Cargo features enabled only in debug mode
    #[serde(default)]
    pub debug_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmulatorSettings {
    pub binary: String,
    pub firmware: String,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSettings {
    /// Mount point of the removable volume's boot partition
    pub volume: Option<PathBuf>,
    /// Also assemble the disk image before installing
    pub assemble_image: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostSettings {
    /// Force `native` or `compat` instead of detecting the host OS
    pub platform: Option<String>,
    /// Invocation that runs one shell command string in the compatibility subsystem
    pub compat_prefix: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_dir: "target".into(),
            image: ImageSettings::default(),
            bootloader: JobSettings::bootloader(),
            kernel: JobSettings::kernel(),
            emulator: EmulatorSettings::default(),
            install: InstallSettings::default(),
            host: HostSettings::default(),
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            name: "disk.fat".into(),
            size_mib: 100,
        }
    }
}

impl JobSettings {
    fn bootloader() -> Self {
        Self {
            dir: "bootloader".into(),
            target: "x86_64-unknown-uefi".into(),
            binary: "bootloader.efi".into(),
            debug_features: vec!["wait_for_gdb".into()],
        }
    }

    fn kernel() -> Self {
        Self {
            dir: "kernel".into(),
            target: "target".into(),
            binary: "kernel".into(),
            debug_features: Vec::new(),
        }
    }
}

impl Default for EmulatorSettings {
    fn default() -> Self {
        Self {
            binary: "qemu-system-x86_64".into(),
            firmware: "bios.bin".into(),
            devices: vec!["qemu-xhci".into(), "usb-kbd".into()],
        }
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            platform: None,
            compat_prefix: vec!["wsl".into(), "--exec".into(), "sh".into(), "-c".into()],
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)
            .map_err(|e| PipelineError::configuration(format!("{}: {}", SETTINGS_FILE, e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `path`, or `<root>/bootforge.toml` when it exists, or the defaults
    pub fn load(root: &Path, path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = root.join(SETTINGS_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.image.size_mib == 0 {
            return Err(PipelineError::configuration("image.size_mib deve ser maior que zero").into());
        }
        if self.host.compat_prefix.is_empty() {
            return Err(PipelineError::configuration("host.compat_prefix não pode ser vazio").into());
        }
        Ok(())
    }

    /// Host platform, honoring the `host.platform` override
    pub fn host_platform(&self, os: &str) -> Result<HostPlatform> {
        match &self.host.platform {
            Some(value) => HostPlatform::from_setting(value),
            None => Ok(HostPlatform::detect(os)),
        }
    }

    /// Root-relative path of a job's output for the given mode
    pub fn artifact_path(&self, job: &JobSettings, mode: Mode) -> String {
        format!(
            "{}/{}/{}/{}",
            self.target_dir,
            job.target,
            mode.profile(),
            job.binary
        )
    }

    /// Root-relative path of the bootloader EFI executable
    pub fn bootloader_artifact(&self, config: &BuildConfiguration) -> String {
        self.artifact_path(&self.bootloader, config.mode)
    }

    /// Root-relative path of the kernel ELF binary
    pub fn kernel_artifact(&self, config: &BuildConfiguration) -> String {
        self.artifact_path(&self.kernel, config.mode)
    }
}
