// ABOUTME: Library crate for lazycontext exposing public API for testing and external use

#![allow(missing_docs)]

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod git;
pub mod models;
