//! Type definitions

pub mod load;
pub mod location;
pub mod messages;
pub mod route;

pub use load::*;
pub use location::*;
pub use messages::*;
pub use route::*;
