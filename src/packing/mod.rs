//! Packing model, construction heuristics and bin-merging local search.
//!
//! Everything here is a pure function of its inputs: decoders take the
//! items in a given order and return a fresh [`Packing`], the improver
//! consumes a packing and returns the merged one.

mod decoder;
mod improve;
mod types;

pub use decoder::{decode, DecoderKind};
pub use improve::improve;
pub use types::{lower_bound, Bin, Packing};

pub(crate) use decoder::decode_unchecked;
