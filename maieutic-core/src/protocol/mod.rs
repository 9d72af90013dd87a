//! Protocol types shared by the gateway and the provider adapters

pub mod types;

pub use types::{GenerationOutcome, GenerationRequest};
