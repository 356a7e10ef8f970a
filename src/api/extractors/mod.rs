//! Request extractors that report failures in the error envelope.

mod params;
mod validated_json;

pub use params::{PathParam, QueryParams};
pub use validated_json::{OptionalJson, ValidatedJson};
