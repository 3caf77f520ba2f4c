pub mod error;
pub mod handlers;
pub mod params;

pub use error::*;
pub use handlers::*;
pub use params::*;
