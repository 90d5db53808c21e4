//! CLI Commands

pub mod commands;
