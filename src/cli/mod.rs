//! CLI command handlers

pub mod commands;

pub use commands::{
    add, export, import, init, label, mark, meta, remove, show, stats, template, MetaUpdate,
};
