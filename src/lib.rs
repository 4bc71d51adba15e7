//! NeuroMatch: personality-first matching demo, driven from the terminal.

pub mod account;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod matches;
pub mod navigation;
pub mod processing;
pub mod profile;
pub mod questionnaire;
pub mod scheduler;
pub mod store;
