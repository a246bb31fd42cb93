pub mod api;
pub mod ast;
pub mod error;
pub mod identifier;
pub mod lexer;
pub mod mappings;
pub mod options;
pub mod parameter;
pub mod parser;
pub mod utils;

pub use api::resolve;
pub use error::{MappingError, OptionsError, ParseError};
pub use mappings::ModuleMappings;
pub use options::{
    GeneratorOptions, MessageConformance, MessageConformances, OutputNaming, Visibility,
};
