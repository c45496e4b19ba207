pub mod doc;
pub mod error;
pub mod messages;

pub use doc::*;
pub use error::*;
pub use messages::*;
