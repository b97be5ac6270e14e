#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation over normalized accidents.
//!
//! [`tally`] holds the mergeable counting primitive, [`summaries`] builds
//! the four per-run summaries and the severity distribution from it, and
//! [`spatial`] bins valid coordinate pairs for heatmap rendering.

pub mod spatial;
pub mod summaries;
pub mod tally;
