//! Clients for external content providers.

pub mod quran;

pub use quran::{QuranClient, QuranError};
