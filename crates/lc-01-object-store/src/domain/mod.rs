pub mod errors;
pub mod table;
pub mod undo;

pub use errors::*;
pub use table::*;
