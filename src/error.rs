use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Everything that can stop the generator options from resolving.
///
/// All variants are fatal: resolution aborts on the first one and the caller
/// decides how to report it.
#[derive(Error, Debug, Diagnostic)]
pub enum OptionsError {
    #[error("Unknown generation parameter '{name}'")]
    #[diagnostic(
        code(options::unknown_parameter),
        help("Supported parameters are FileNaming, ProtoPathModuleMappings, Visibility, SwiftProtobufModuleName, MessageConformances, ReduceComments and SwiftLintDisabled.")
    )]
    UnknownParameter { name: String },

    #[error("Unknown value for generation parameter '{name}': '{value}'")]
    #[diagnostic(code(options::invalid_value))]
    InvalidValue { name: String, value: String },

    #[error("{context}: {source}")]
    #[diagnostic(code(options::wrapped))]
    Wrapped {
        context: String,
        #[source]
        #[diagnostic_source]
        source: MappingError,
    },
}

impl OptionsError {
    pub(crate) fn invalid_value(name: &str, value: &str) -> Self {
        OptionsError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Failures while loading a module mappings file.
#[derive(Error, Debug, Diagnostic)]
pub enum MappingError {
    #[error("Failed to open module mappings file '{path}'")]
    #[diagnostic(code(mappings::fail_to_open))]
    FailToOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Mapping entry #{mapping_index} has no module name")]
    #[diagnostic(
        code(mappings::missing_module_name),
        help("Every `mapping` entry needs a non-empty `module_name`.")
    )]
    EntryMissingModuleName { mapping_index: usize },

    #[error("Mapping entry #{mapping_index} lists no proto file paths")]
    #[diagnostic(
        code(mappings::no_proto_paths),
        help("Add at least one `proto_file_path` to the entry.")
    )]
    EntryHasNoProtoPaths { mapping_index: usize },

    #[error("Proto file '{path}' is mapped to both '{first_module}' and '{second_module}'")]
    #[diagnostic(code(mappings::duplicate_mapping))]
    DuplicateProtoPathMapping {
        path: String,
        first_module: String,
        second_module: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParseError {
    #[error("Unexpected token at line {line}, column {column}")]
    #[diagnostic(
        code(parser::unexpected_token),
        help("The parser found a token it did not expect in this position.")
    )]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected}, but found this")]
        span: SourceSpan,
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("Unexpected end of file")]
    #[diagnostic(
        code(parser::unexpected_eof),
        help("The file ended unexpectedly. The parser expected more tokens.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("File ended unexpectedly here")]
        span: SourceSpan,
    },

    #[error("Unterminated string literal at line {line}, column {column}")]
    #[diagnostic(code(parser::unterminated_string))]
    UnterminatedString {
        #[source_code]
        src: NamedSource<String>,
        #[label("String starts here")]
        span: SourceSpan,
        line: usize,
        column: usize,
    },

    #[error("String at line {line}, column {column} is not valid UTF-8")]
    #[diagnostic(
        code(parser::invalid_utf8),
        help("Octal and hex escapes must spell out a valid UTF-8 sequence.")
    )]
    InvalidUtf8 {
        #[source_code]
        src: NamedSource<String>,
        #[label("this string decodes to invalid UTF-8")]
        span: SourceSpan,
        line: usize,
        column: usize,
    },

    #[error("Unknown field '{name}' at line {line}, column {column}")]
    #[diagnostic(
        code(parser::unknown_field),
        help("{context} only accepts {allowed}.")
    )]
    UnknownField {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a field of {context}")]
        span: SourceSpan,
        name: String,
        context: String,
        allowed: String,
        line: usize,
        column: usize,
    },
}
