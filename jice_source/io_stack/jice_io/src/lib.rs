pub mod atomic;
pub mod paths;
pub mod walkdir;

pub use atomic::*;
pub use paths::*;
pub use walkdir::*;
