pub mod coordinator;
pub mod status;
pub mod surface;

pub use coordinator::*;
pub use status::*;
pub use surface::*;
