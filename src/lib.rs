//! Mediagraph builds the media-conversion part of node-based diffusion workflows.
//!
//! Generators produce and consume media in two representations: raw pixels/waveforms and the
//! latent form a model samples in. This crate tracks which form every graph output is in with a
//! [`MediaHandle`] and emits the conversion nodes between them, without emitting redundant work.
//!
//! # Pipeline overview
//!
//! 1. **Seed**: wrap a loader output in a [`MediaHandle`] with its [`MediaKind`].
//! 2. **Coerce**: [`MediaConverter::as_sampling_latent`], [`MediaConverter::as_latent_image`] or
//!    [`MediaConverter::as_raw_image`] turn it into the form the next node wants.
//! 3. **Save**: [`MediaConverter::save`] finalizes it as a generated output.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Append-only**: the engine never edits or removes nodes it did not just create.
//! - **No round trips**: decode after encode (and the reverse) with the same VAE node collapses.
//! - **Misuse is an error**: invalid requests fail with [`FlowError::Misuse`] before any node of
//!   the failing step is emitted.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod graph;
mod media;

pub mod config;

pub use config::GenConfig;
pub use config::families::{CompatClass, ModelFamilies};
pub use config::features::FeatureSet;
pub use config::params::{GenParams, Param, ParamKey, ParamValue, keys};
pub use foundation::error::{FlowError, FlowResult};
pub use graph::class;
pub use graph::node::{InputValue, Node, NodeId, NodeInputs, NodeRef, inputs};
pub use graph::workflow::{Workflow, WorkflowGraph};
pub use media::convert::MediaConverter;
pub use media::handle::{MediaHandle, ModelRef};
pub use media::kind::MediaKind;
pub use media::output::FILENAME_PREFIX;
