pub mod testing;
mod window;

pub use window::*;
