//! Módulo de comandos do Bootforge

use anyhow::Result;
use xshell::Shell;

use crate::core::config::Task;
use crate::core::context::Context;
use crate::core::exec::Executor;

pub mod build;
pub mod install;
pub mod run;

/// Run the selected task to completion or to its first failure
pub fn dispatch(task: Task, exec: &mut dyn Executor, sh: &Shell, ctx: &Context) -> Result<()> {
    match task {
        Task::Build => build::run(exec, ctx),
        Task::Run => run::run(exec, ctx),
        Task::Install => install::run(exec, sh, ctx),
    }
}
