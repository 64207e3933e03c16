//! Reference-sequence trip splitter.
//!
//! Some transit feeds publish a round trip (out to a terminus and back) as a
//! single trip with a single direction. This crate matches each trip against
//! hand-authored reference stop sequences for both directions of its route,
//! splits trips that cover both into one trip per direction, and orders every
//! derived trip's stops consistently with the reference.

pub mod domain;
pub mod feed;
pub mod headsign;
pub mod process;
pub mod reference;
pub mod split;
