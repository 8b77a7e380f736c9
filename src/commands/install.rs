//! Comando install - Grava os artefatos no volume de boot

use anyhow::Result;
use colored::*;
use xshell::Shell;

use crate::core::context::Context;
use crate::core::exec::Executor;
use crate::core::installer;

use super::build;

pub fn run(exec: &mut dyn Executor, sh: &Shell, ctx: &Context) -> Result<()> {
    ctx.out.heading("💾 Instalando no volume...");
    ctx.out.field("Perfil", ctx.config.mode.profile());

    build::compile(exec, ctx)?;
    if ctx.settings.install.assemble_image {
        build::assemble(exec, ctx)?;
    }

    installer::install(sh, ctx)?;

    if !ctx.out.quiet {
        println!("{}", "✓ Instalação concluída!".bright_green().bold());
    }
    Ok(())
}
