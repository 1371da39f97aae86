#![deny(missing_docs)]
#![doc = "Core error taxonomy and provenance descriptors for the lightcone conformal truncation engine."]

pub mod errors;
pub mod provenance;

pub use errors::{ErrorInfo, LctError};
pub use provenance::{RunProvenance, SchemaVersion};
