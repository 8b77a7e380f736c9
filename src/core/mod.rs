//! Módulo core - Lógica central do Bootforge

pub mod builder;
pub mod config;
pub mod context;
pub mod emulator;
pub mod error;
pub mod exec;
pub mod image;
pub mod installer;
pub mod platform;
pub mod settings;
pub mod utils;
