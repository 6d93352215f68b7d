//! Code sanitizing, subprocess execution and artifact resolution.
//!
//! This crate owns everything between "the model returned animation code"
//! and "a final video file exists on disk":
//!
//! - [`Sanitizer`] rewrites untrusted generated code down to the safe
//!   capability subset
//! - [`process`] runs external programs with captured output and optional
//!   timeouts
//! - [`resolve`] locates renderer outputs in their nested directory trees
//! - [`Renderer`] and [`Muxer`] wrap the two external toolchain invocations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mux;
pub mod process;
mod render;
pub mod resolve;
mod sanitize;

pub use mux::Muxer;
pub use process::{CommandSpec, ProcessOutput};
pub use render::Renderer;
pub use sanitize::{Sanitizer, strip_markdown_fences};
