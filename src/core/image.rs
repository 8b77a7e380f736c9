//! Image module - Assembles the bootable FAT disk image
//!
//! Six commands, always in this order, each fatal on failure:
//! allocate, format, `EFI`, `EFI/BOOT`, copy bootloader, copy kernel.
//! Nothing is rolled back; a failed run may leave a partial image behind.

use anyhow::Result;
use indicatif::ProgressBar;

use super::config::image_paths;
use super::context::Context;
use super::error::PipelineError;
use super::exec::{self, Executor};
use super::platform::{ToolCommand, ToolKind};

/// The ordered assembly commands, labeled for progress output
pub fn assembly_steps(ctx: &Context) -> Vec<(&'static str, ToolCommand)> {
    let image = ctx.settings.image.name.as_str();
    let bootloader = ctx.bootloader_artifact();
    let kernel = ctx.kernel_artifact();

    let imaging = |argv: Vec<String>| {
        ToolCommand::new(ToolKind::DiskImaging, argv).current_dir(&ctx.root)
    };

    vec![
        (
            "Alocando imagem",
            imaging(vec![
                "dd".into(),
                "if=/dev/zero".into(),
                format!("of={}", image),
                "bs=1M".into(),
                format!("count={}", ctx.settings.image.size_mib),
            ]),
        ),
        (
            "Formatando FAT",
            imaging(vec!["mkfs.vfat".into(), image.into()]),
        ),
        (
            "Criando EFI",
            imaging(mmd(image, image_paths::EFI)),
        ),
        (
            "Criando EFI/BOOT",
            imaging(mmd(image, image_paths::EFI_BOOT)),
        ),
        (
            "Copiando bootloader",
            imaging(mcopy(image, &bootloader, image_paths::BOOTLOADER_EFI)),
        ),
        (
            "Copiando kernel",
            imaging(mcopy(image, &kernel, image_paths::KERNEL)),
        ),
    ]
}

fn mmd(image: &str, dir: &str) -> Vec<String> {
    vec!["mmd".into(), "-i".into(), image.into(), format!("::{}", dir)]
}

fn mcopy(image: &str, src: &str, dest: &str) -> Vec<String> {
    vec![
        "mcopy".into(),
        "-i".into(),
        image.into(),
        src.into(),
        format!("::{}", dest),
    ]
}

/// Fail before touching the image if an artifact is missing
pub fn verify_artifacts(ctx: &Context) -> Result<()> {
    for artifact in [ctx.bootloader_artifact(), ctx.kernel_artifact()] {
        let path = ctx.path(&artifact);
        if !path.is_file() {
            return Err(PipelineError::unavailable(
                path.display().to_string(),
                "artefato não encontrado; a compilação produziu outro caminho?",
            )
            .into());
        }
    }
    Ok(())
}

/// Dry-run lines are printed per step, so no bar is drawn under them
fn progress_bar(ctx: &Context, steps: u64) -> ProgressBar {
    if ctx.dry_run {
        ProgressBar::hidden()
    } else {
        ctx.out.progress(steps)
    }
}

/// Build `disk.fat` from the compiled artifacts
pub fn assemble(exec: &mut dyn Executor, ctx: &Context) -> Result<()> {
    if !ctx.dry_run {
        verify_artifacts(ctx)?;
    }

    let steps = assembly_steps(ctx);
    let bar = progress_bar(ctx, steps.len() as u64);

    for (label, command) in &steps {
        bar.set_message(*label);
        ctx.out.info(label);
        if let Err(err) = exec::run_tool(exec, &ctx.config, &ctx.settings, &ctx.out, command) {
            bar.abandon();
            return Err(err);
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{HostPlatform, Mode};
    use crate::core::context::testing::context;
    use crate::core::exec::testing::RecordingExecutor;
    use crate::core::utils::Reporter;

    #[test]
    fn test_assembly_commands_in_order() {
        let ctx = context("/proj", HostPlatform::Native, Mode::Release);
        let mut exec = RecordingExecutor::default();
        assemble(&mut exec, &ctx).unwrap();

        assert_eq!(
            exec.lines(),
            vec![
                "dd if=/dev/zero of=disk.fat bs=1M count=100",
                "mkfs.vfat disk.fat",
                "mmd -i disk.fat ::EFI",
                "mmd -i disk.fat ::EFI/BOOT",
                "mcopy -i disk.fat target/x86_64-unknown-uefi/release/bootloader.efi ::EFI/BOOT/BOOTX64.EFI",
                "mcopy -i disk.fat target/target/release/kernel ::kernel.elf",
            ]
        );
        assert!(exec
            .invocations
            .iter()
            .all(|i| i.cwd.as_deref() == Some(std::path::Path::new("/proj"))));
    }

    #[test]
    fn test_dry_run_hides_progress_bar() {
        let mut ctx = context("/proj", HostPlatform::Native, Mode::Release);
        ctx.out = Reporter::new(false, false);
        ctx.dry_run = true;
        assert!(progress_bar(&ctx, 6).is_hidden());
    }

    #[test]
    fn test_debug_image_uses_debug_artifacts() {
        let ctx = context("/proj", HostPlatform::Native, Mode::Debug);
        let lines: Vec<String> = assembly_steps(&ctx)
            .into_iter()
            .map(|(_, c)| c.argv.join(" "))
            .collect();
        assert!(lines[4].contains("target/x86_64-unknown-uefi/debug/bootloader.efi"));
        assert!(lines[5].contains("target/target/debug/kernel"));
    }

    #[test]
    fn test_failed_step_aborts_the_rest() {
        let ctx = context("/proj", HostPlatform::Native, Mode::Release);
        let mut exec = RecordingExecutor::failing_on("::EFI/BOOT");
        let err = assemble(&mut exec, &ctx).unwrap_err();

        assert_eq!(exec.invocations.len(), 4);
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::ToolInvocation {
                command: "mmd -i disk.fat ::EFI/BOOT".into(),
                code: Some(1),
            })
        );
    }

    #[test]
    fn test_compat_host_wraps_every_step() {
        let ctx = context("/proj", HostPlatform::CompatibilityRequired, Mode::Release);
        let mut exec = RecordingExecutor::default();
        assemble(&mut exec, &ctx).unwrap();

        assert_eq!(exec.invocations.len(), 6);
        for inv in &exec.invocations {
            assert_eq!(inv.program, "wsl");
            assert_eq!(inv.args.len(), 4);
        }
        assert_eq!(
            exec.programs(),
            vec!["dd", "mkfs.vfat", "mmd", "mmd", "mcopy", "mcopy"]
        );
    }

    #[test]
    fn test_missing_artifact_issues_no_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path(), HostPlatform::Native, Mode::Release);
        ctx.dry_run = false;

        let mut exec = RecordingExecutor::default();
        let err = assemble(&mut exec, &ctx).unwrap_err();
        assert!(exec.invocations.is_empty());
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ResourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_present_artifacts_pass_verification() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path(), HostPlatform::Native, Mode::Release);
        ctx.dry_run = false;
        for artifact in [ctx.bootloader_artifact(), ctx.kernel_artifact()] {
            let path = ctx.path(&artifact);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"\x7fELF").unwrap();
        }

        let mut exec = RecordingExecutor::default();
        assemble(&mut exec, &ctx).unwrap();
        assert_eq!(exec.invocations.len(), 6);
    }

    #[test]
    fn test_assembly_is_repeatable() {
        let ctx = context("/proj", HostPlatform::Native, Mode::Release);
        let mut first = RecordingExecutor::default();
        let mut second = RecordingExecutor::default();
        assemble(&mut first, &ctx).unwrap();
        assemble(&mut second, &ctx).unwrap();
        assert_eq!(first.invocations, second.invocations);
    }
}
