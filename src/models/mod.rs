pub mod comparison;
pub mod hospital;

pub use comparison::*;
pub use hospital::*;
