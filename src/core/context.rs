//! Context module - Everything resolved once per invocation

use std::path::PathBuf;

use super::config::BuildConfiguration;
use super::settings::Settings;
use super::utils::Reporter;

/// Immutable state handed to every task
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub config: BuildConfiguration,
    pub settings: Settings,
    pub out: Reporter,
    /// Commands are printed, not executed; artifacts are not checked on disk
    pub dry_run: bool,
}

impl Context {
    /// Absolute path of a root-relative path
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn bootloader_artifact(&self) -> String {
        self.settings.bootloader_artifact(&self.config)
    }

    pub fn kernel_artifact(&self) -> String {
        self.settings.kernel_artifact(&self.config)
    }
}
