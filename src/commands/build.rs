//! Comando build - Compila bootloader e kernel e monta a imagem

use anyhow::Result;
use colored::*;

use crate::core::context::Context;
use crate::core::exec::Executor;
use crate::core::{builder, image};

pub fn run(exec: &mut dyn Executor, ctx: &Context) -> Result<()> {
    ctx.out.heading("🔨 Forjando a imagem...");
    ctx.out.field("Perfil", ctx.config.mode.profile());
    ctx.out.field("Host", &ctx.config.host.to_string());

    compile(exec, ctx)?;
    assemble(exec, ctx)?;

    if !ctx.out.quiet {
        println!("{}", "✓ Build concluído!".bright_green().bold());
    }
    Ok(())
}

/// Both compilation jobs; nothing else may start until they succeed
pub fn compile(exec: &mut dyn Executor, ctx: &Context) -> Result<()> {
    ctx.out.step("Compilando...");
    builder::build_all(exec, &ctx.root, &ctx.config, &ctx.settings, &ctx.out)
}

pub fn assemble(exec: &mut dyn Executor, ctx: &Context) -> Result<()> {
    ctx.out.step(&format!("Montando {}...", ctx.settings.image.name));
    image::assemble(exec, ctx)?;
    ctx.out.success(&format!(
        "Imagem pronta: {}",
        ctx.path(&ctx.settings.image.name).display().to_string().bright_cyan()
    ));
    Ok(())
}
