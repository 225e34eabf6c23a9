//! HTML extraction for race card and pedigree pages.
//!
//! Extraction never fails: a page that does not have the expected shape
//! yields no entrants or an empty pedigree.

pub mod entrants;
pub mod pedigree;

pub use entrants::{EntrantLink, extract_entrants};
pub use pedigree::extract_pedigree;
