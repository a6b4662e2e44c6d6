pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod key;
pub mod models;
pub mod nonempty;
pub mod output;
pub mod repository;
pub mod source;
pub mod state;
pub mod timeline;
pub mod unstable;
