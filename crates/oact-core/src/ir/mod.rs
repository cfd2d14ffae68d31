pub mod operations;
pub mod policy;
pub mod schemas;
pub mod types;

pub use operations::*;
pub use policy::*;
pub use schemas::*;
pub use types::{IrInfo, IrSpec, NormalizedName};
