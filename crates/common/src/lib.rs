pub mod constants;
pub mod ether;
pub mod utils;

mod error;
pub use error::{Error, SourceError};
