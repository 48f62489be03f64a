//! Command handlers

pub mod backup;
pub mod book;
pub mod config;
pub mod tag;
