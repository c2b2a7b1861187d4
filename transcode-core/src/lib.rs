//! # Transcode Core
//!
//! Core types shared by the Transcode picture-structure tooling.
//!
//! This crate provides:
//! - Error handling types
//! - An exact [`Rational`] type for frame rates, frame durations and rate ratios

pub mod error;
pub mod rational;

pub use error::{Error, Result};
pub use rational::Rational;
