pub mod emitters;
pub mod generator;
pub mod resolver;

pub use generator::{TypeScriptError, TypeScriptGenerator};
pub use resolver::TypeScriptTypeResolver;
