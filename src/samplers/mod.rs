//! Sampling strategies for the consensus engines.

pub mod uniform;

pub use uniform::UniformRandomSampler;
