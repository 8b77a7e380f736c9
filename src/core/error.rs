//! Error module - Typed pipeline failures
//!
//! Components raise these through `anyhow`; `main` downcasts them to pick
//! the process exit status.

use std::fmt;

/// Failures that stop the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// An external command exited non-zero (or was killed by a signal)
    ToolInvocation { command: String, code: Option<i32> },

    /// Unrecognized task or mode token
    Configuration { message: String },

    /// Missing artifact, unwritable volume, unreadable settings
    ResourceUnavailable { resource: String, reason: String },
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unavailable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Process exit status that reports this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            // Exit codes outside 1..=255 collapse to 1
            Self::ToolInvocation { code, .. } => match code {
                Some(c) if (1..=255).contains(c) => *c as u8,
                _ => 1,
            },
            Self::Configuration { .. } => 2,
            Self::ResourceUnavailable { .. } => 1,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolInvocation {
                command,
                code: Some(code),
            } => write!(f, "comando falhou com status {}: {}", code, command),
            Self::ToolInvocation {
                command,
                code: None,
            } => write!(f, "comando terminado por sinal: {}", command),
            Self::Configuration { message } => write!(f, "configuração inválida: {}", message),
            Self::ResourceUnavailable { resource, reason } => {
                write!(f, "recurso indisponível ({}): {}", resource, reason)
            }
        }
    }
}

impl std::error::Error for PipelineError {}
