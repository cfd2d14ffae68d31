pub mod name_normalizer;
pub mod spec_to_ir;
pub mod type_mapper;

pub use spec_to_ir::{TransformOptions, transform, transform_with_options};
pub use type_mapper::TypeMapper;
