//! Scraping collaborator for ketto.
//!
//! This crate provides the HTTP fetch pipeline, race card and pedigree page
//! extraction, and a [`ketto_core::PedigreeSource`] built from them.

pub mod extract;
pub mod fetch;
pub mod source;

pub use extract::{EntrantLink, extract_entrants, extract_pedigree};
pub use fetch::{FetchClient, FetchConfig, FetchedPage};
pub use source::{NetkeibaSource, SourceUrls};
