//! Emulator module - QEMU command line for the assembled image

use anyhow::Result;

use super::context::Context;
use super::exec::{self, Executor};
use super::platform::{ToolCommand, ToolKind};

/// GDB stub flag
pub const GDB_STUB: &str = "-s";

/// Where `-s` listens
pub const GDB_ENDPOINT: &str = "tcp::1234";

/// Emulator command line for the current image and mode
pub fn command(ctx: &Context) -> ToolCommand {
    let emu = &ctx.settings.emulator;
    let mut argv = vec![
        emu.binary.clone(),
        "-bios".to_string(),
        emu.firmware.clone(),
        ctx.settings.image.name.clone(),
    ];

    for device in &emu.devices {
        argv.push("-device".into());
        argv.push(device.clone());
    }

    if ctx.config.mode.is_debug() {
        argv.push(GDB_STUB.into());
    }

    ToolCommand::new(ToolKind::Emulator, argv).current_dir(&ctx.root)
}

/// Boot the image; blocks until the emulator exits
pub fn launch(exec: &mut dyn Executor, ctx: &Context) -> Result<()> {
    exec::run_tool(exec, &ctx.config, &ctx.settings, &ctx.out, &command(ctx))
}
