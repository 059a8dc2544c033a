//! Request extractors that reject with the JSON error envelope.

mod body;
mod query;
pub use body::PersonBody;
pub use query::{City, PersonId};
