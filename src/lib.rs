pub mod commands;
pub mod config;
pub mod hoist;
pub mod pipeline;
