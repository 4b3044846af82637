pub mod errors;
pub mod logging;

pub use errors::PageError;
pub use logging::Logger;
