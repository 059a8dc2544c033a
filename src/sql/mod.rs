//! Safe SQL builder: identifiers from configuration only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
