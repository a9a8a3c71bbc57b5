//! Scoring harness for star-rating prediction prompts.
//!
//! A [`Predictor`] turns review text into raw model output; the
//! [`Evaluator`] drives a labelled dataset through it and counts how many
//! outputs decode as JSON and how many name the right rating.

pub mod aggregate;
pub mod compare;
pub mod dataset;
pub mod error;
pub mod parser;
pub mod strategy;

pub use aggregate::*;
pub use compare::*;
pub use dataset::*;
pub use error::*;
pub use parser::*;
pub use strategy::*;
