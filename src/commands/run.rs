//! Comando run - Compila, monta e executa no QEMU

use anyhow::Result;

use crate::core::context::Context;
use crate::core::emulator;
use crate::core::exec::Executor;

use super::build;

pub fn run(exec: &mut dyn Executor, ctx: &Context) -> Result<()> {
    build::run(exec, ctx)?;

    ctx.out.heading("🚀 Executando no QEMU...");
    if ctx.config.mode.is_debug() {
        ctx.out.field("GDB", &gdb_field());
    }

    emulator::launch(exec, ctx)
}

/// Plain text; `Reporter::field` applies the colour
fn gdb_field() -> String {
    format!("habilitado ({})", emulator::GDB_ENDPOINT)
}
