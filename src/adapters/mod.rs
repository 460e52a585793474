//! Translations from [`RenderedOutput`](crate::RenderedOutput) to concrete
//! presentation toolkits.
//!
//! The descriptors carry everything a toolkit needs; adapters only map them.
//! Terminal cells cannot change font size, so both terminal adapters express
//! heavy weights as bold and drop sizes.

pub mod ansi;
pub mod ratatui;
