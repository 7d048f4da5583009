//! `taskz`: a terminal front end for the Taskz task manager.
//!
//! The binary parses a [`cli::Cli`], loads an [`config::AppConfig`], restores
//! the persisted session and runs the command through [`app::App`].

pub mod app;
pub mod cli;
pub mod config;
pub mod navigation;
pub mod render;
