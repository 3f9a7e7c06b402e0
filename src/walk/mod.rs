//! Ancestry walking and batch boundary discovery

mod walker;

pub use walker::{Ancestry, AncestryWalker};
