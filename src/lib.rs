pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod selector;
