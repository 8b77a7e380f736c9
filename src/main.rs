//! Bootforge - Build System do bootloader + kernel
//!
//! Compila o bootloader UEFI e o kernel, monta `disk.fat` e executa no
//! QEMU ou grava no volume de boot.
//!
//! # Uso
//! ```bash
//! bootforge                 # build release
//! bootforge run debug       # build debug + QEMU com GDB stub
//! bootforge install         # build + cópia para install.volume
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use xshell::Shell;

mod commands;
mod core;

use crate::core::context::Context;
use crate::core::error::PipelineError;
use crate::core::exec::{DryRunExecutor, Executor, SystemExecutor};
use crate::core::settings::Settings;
use crate::core::utils::Reporter;
use crate::core::{builder, config};

#[derive(Parser)]
#[command(name = "bootforge")]
#[command(about = "🔥 Bootforge - compila, monta disk.fat e executa", long_about = None)]
#[command(version)]
struct Cli {
    /// Task (build, run, install) seguida de debug/release
    tokens: Vec<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Raiz do projeto (padrão: procura bootforge.toml ou workspace)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Arquivo de configuração (padrão: <raiz>/bootforge.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mostra os comandos sem executá-los
    #[arg(long, global = true)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let out = Reporter::new(cli.verbose, cli.quiet);

    match execute(&cli, &out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.error(&format!("{:#}", err));
            let code = err
                .downcast_ref::<PipelineError>()
                .map(PipelineError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn execute(cli: &Cli, out: &Reporter) -> Result<()> {
    let root = builder::project_root(cli.root.as_deref())?;
    let settings = Settings::load(&root, cli.config.as_deref())?;
    let host = settings.host_platform(std::env::consts::OS)?;
    let (task, config) = config::resolve(&cli.tokens, host)?;

    out.banner();
    out.info(&format!("Raiz: {}", root.display()));
    out.info(&format!("Task: {}", task));
    if cli.dry_run {
        out.warning("Modo dry-run: os comandos serão apenas exibidos");
    }

    let ctx = Context {
        root,
        config,
        settings,
        out: *out,
        dry_run: cli.dry_run,
    };

    let sh = Shell::new()?;
    let mut exec: Box<dyn Executor> = if cli.dry_run {
        Box::new(DryRunExecutor)
    } else {
        Box::new(SystemExecutor::new()?)
    };

    commands::dispatch(task, exec.as_mut(), &sh, &ctx)
}
