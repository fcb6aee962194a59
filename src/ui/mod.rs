//! UI components for Cerberus

pub mod editor;
pub mod layout;
pub mod preview;
pub mod toast;
