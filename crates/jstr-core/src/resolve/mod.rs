pub mod name_generator;
pub mod registry;
pub mod resolver;
pub mod union;

pub use name_generator::{DefaultTypeNameGenerator, TypeNameGenerator};
pub use registry::TypeRegistry;
pub use resolver::TypeResolver;
pub use union::{EnumerationItem, UnionTemplateModel};
