pub mod run;
pub mod stages;

pub use run::*;
pub use stages::*;
