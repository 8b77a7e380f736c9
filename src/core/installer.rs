//! Installer module - Copies the artifacts onto a mounted boot volume

use anyhow::Result;
use std::path::{Path, PathBuf};
use xshell::Shell;

use super::config::image_paths;
use super::context::Context;
use super::error::PipelineError;

/// Source → destination pairs for the given volume
pub fn copy_plan(ctx: &Context, volume: &Path) -> Vec<(PathBuf, PathBuf)> {
    vec![
        (
            ctx.path(&ctx.bootloader_artifact()),
            volume.join(image_paths::BOOTLOADER_EFI),
        ),
        (
            ctx.path(&ctx.kernel_artifact()),
            volume.join(image_paths::KERNEL),
        ),
    ]
}

/// Copy both artifacts to the configured volume; no retry, no auto-mount
pub fn install(sh: &Shell, ctx: &Context) -> Result<()> {
    let volume = ctx.settings.install.volume.as_deref().ok_or_else(|| {
        PipelineError::unavailable("install.volume", "nenhum volume configurado em bootforge.toml")
    })?;

    if !volume.is_dir() {
        return Err(PipelineError::unavailable(
            volume.display().to_string(),
            "volume não montado ou não é um diretório",
        )
        .into());
    }

    for (src, dest) in copy_plan(ctx, volume) {
        if ctx.dry_run {
            ctx.out.step(&format!("{} → {}", src.display(), dest.display()));
            continue;
        }
        copy(sh, &src, &dest)?;
        ctx.out.info(&format!("{} → {}", src.display(), dest.display()));
    }

    Ok(())
}

fn copy(sh: &Shell, src: &Path, dest: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(
            PipelineError::unavailable(src.display().to_string(), "artefato não encontrado").into(),
        );
    }

    let unavailable =
        |e: xshell::Error| PipelineError::unavailable(dest.display().to_string(), e.to_string());

    if let Some(parent) = dest.parent() {
        sh.create_dir(parent).map_err(unavailable)?;
    }
    sh.copy_file(src, dest).map_err(unavailable)?;
    Ok(())
}
