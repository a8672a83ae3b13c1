pub mod help;
pub mod info;
pub mod fun;
pub mod cleanup;

pub use help::*;
pub use info::*;
pub use fun::*;
pub use cleanup::*;
