pub mod sweep;
pub mod errors;

pub use sweep::*;
pub use errors::*;
