/// A parsed module mappings file: the text-format form of a `ModuleMappings`
/// message.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct MappingFile {
    pub mappings: Vec<MappingEntry>,
}

/// One `mapping { ... }` block.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct MappingEntry {
    pub module_name: String,
    pub proto_file_paths: Vec<String>,
    pub pos_start: usize,
    pub pos_end: usize,
}
