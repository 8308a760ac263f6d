//! CLI command handlers

pub mod commands;

pub use commands::{fields, render_table, search, translate, translate_with};
