pub mod codec;
pub mod persist;
mod state;

pub use state::{IndexState, Posting};
