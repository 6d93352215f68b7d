//! Stage orchestration: topic in, narrated video out.
//!
//! A [`Pipeline`] wires the model drivers, job store, media store and
//! external toolchain together and exposes one method per stage:
//!
//! 1. [`Pipeline::refine`] turns a raw topic into a detailed prompt
//! 2. [`Pipeline::script`] writes a timed scene/speech script
//! 3. [`Pipeline::audio`] synthesizes and publishes the narration
//! 4. [`Pipeline::video`] generates animation code, renders, muxes and
//!    publishes the finished video
//!
//! [`Pipeline::run_all`] chains all four. Stages are also individually
//! re-invokable; the job record's state machine decides what is allowed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod layout;
mod pipeline;
pub mod prompts;

pub use layout::MediaLayout;
pub use pipeline::{AudioOutcome, Pipeline, PipelineBuilder};
