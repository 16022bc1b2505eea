//! Shared foundational types used across the rowfit legalizer.
//!
//! This crate provides the fatal [`InternalError`] type with its
//! [`LegalResult`] alias, and the integer [`Interval`] helpers used to build
//! blockage lists, region spans, and row segments.

#![warn(missing_docs)]

pub mod interval;
pub mod result;

pub use interval::{complement, merge_intervals, Interval, SiteGrid};
pub use result::{InternalError, LegalResult};
