//! Typed media handles and the conversions between raw and latent representations.
//!
//! All node emission goes through [`MediaConverter`](convert::MediaConverter). Operations are
//! split by concern: `codec` holds decode/encode, `coerce` the higher-level "give me the form I
//! need" helpers, `output` the save step.

pub(crate) mod codec;
pub(crate) mod coerce;
pub(crate) mod convert;
pub(crate) mod dedup;
pub(crate) mod handle;
pub(crate) mod kind;
pub(crate) mod output;

#[cfg(test)]
#[path = "../../tests/unit/media/support.rs"]
pub(crate) mod test_support;
