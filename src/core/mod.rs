//! Document state, persistence, theme and export side effects

pub mod config;
pub mod document;
pub mod export;
pub mod notification;
pub mod storage;
pub mod theme;
pub mod workspace;
