use crate::ast::MappingFile;
use crate::error::MappingError;
use crate::parser::Parser;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Name of the Swift runtime module when no override is given.
pub const DEFAULT_SWIFT_PROTOBUF_MODULE_NAME: &str = "SwiftProtobuf";

/// The well-known types shipped inside the runtime module.
pub const WELL_KNOWN_TYPE_FILES: &[&str] = &[
    "google/protobuf/any.proto",
    "google/protobuf/api.proto",
    "google/protobuf/duration.proto",
    "google/protobuf/empty.proto",
    "google/protobuf/field_mask.proto",
    "google/protobuf/source_context.proto",
    "google/protobuf/struct.proto",
    "google/protobuf/timestamp.proto",
    "google/protobuf/type.proto",
    "google/protobuf/wrappers.proto",
];

/// Resolution table from proto file path to the Swift module that owns the
/// code generated for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleMappings {
    swift_protobuf_module_name: String,
    mappings: BTreeMap<String, String>,
    #[serde(skip)]
    has_proto_path_mappings: bool,
}

impl Default for ModuleMappings {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ModuleMappings {
    /// Builds the table used when no mappings file was given: only the
    /// well-known types, owned by the runtime module.
    pub fn new(swift_protobuf_module_name: Option<&str>) -> Self {
        let swift_protobuf_module_name = swift_protobuf_module_name
            .unwrap_or(DEFAULT_SWIFT_PROTOBUF_MODULE_NAME)
            .to_string();
        let mappings = WELL_KNOWN_TYPE_FILES
            .iter()
            .map(|path| (path.to_string(), swift_protobuf_module_name.clone()))
            .collect();
        ModuleMappings {
            swift_protobuf_module_name,
            mappings,
            has_proto_path_mappings: false,
        }
    }

    /// Reads and parses a text-format mappings file, then builds the table.
    ///
    /// # Errors
    /// Returns `MappingError::FailToOpen` if the file cannot be read, a
    /// `MappingError::Parse` if it is not valid text format, and the entry
    /// validation errors of [`ModuleMappings::from_file`].
    pub fn load(
        path: impl AsRef<Path>,
        swift_protobuf_module_name: Option<&str>,
    ) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let display = path.to_string_lossy().to_string();
        debug!("loading module mappings from {display}");
        let source = std::fs::read_to_string(path).map_err(|source| MappingError::FailToOpen {
            path: display.clone(),
            source,
        })?;
        Self::parse(&source, &display, swift_protobuf_module_name)
    }

    /// Parses mappings from text already in memory. `name` labels diagnostics.
    pub fn parse(
        source: &str,
        name: &str,
        swift_protobuf_module_name: Option<&str>,
    ) -> Result<Self, MappingError> {
        let file = Parser::new_with_name(source, name.to_string()).parse_file()?;
        Self::from_file(&file, swift_protobuf_module_name)
    }

    /// Builds the table from parsed entries on top of the well-known-type seed.
    ///
    /// # Errors
    /// Rejects entries without a module name or without paths, and any path
    /// claimed by two different modules.
    pub fn from_file(
        file: &MappingFile,
        swift_protobuf_module_name: Option<&str>,
    ) -> Result<Self, MappingError> {
        let mut table = Self::new(swift_protobuf_module_name);
        let seeded = table.mappings.len();

        for (mapping_index, entry) in file.mappings.iter().enumerate() {
            if entry.module_name.is_empty() {
                return Err(MappingError::EntryMissingModuleName { mapping_index });
            }
            if entry.proto_file_paths.is_empty() {
                return Err(MappingError::EntryHasNoProtoPaths { mapping_index });
            }
            for path in &entry.proto_file_paths {
                if let Some(existing) = table.mappings.get(path) {
                    if *existing != entry.module_name {
                        return Err(MappingError::DuplicateProtoPathMapping {
                            path: path.clone(),
                            first_module: existing.clone(),
                            second_module: entry.module_name.clone(),
                        });
                    }
                }
                table
                    .mappings
                    .insert(path.clone(), entry.module_name.clone());
            }
        }

        table.has_proto_path_mappings = table.mappings.len() != seeded;
        debug!(
            "module mappings built: {} entries, {} paths",
            file.mappings.len(),
            table.mappings.len() - seeded
        );
        Ok(table)
    }

    pub fn swift_protobuf_module_name(&self) -> &str {
        &self.swift_protobuf_module_name
    }

    /// True when the mappings file contributed paths beyond the well-known types.
    pub fn has_proto_path_mappings(&self) -> bool {
        self.has_proto_path_mappings
    }

    pub fn module_name(&self, for_file: &str) -> Option<&str> {
        self.mappings.get(for_file).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Modules a generated file must import for its dependencies.
    ///
    /// Returns `None` when there is nothing to decide: no user mappings, or
    /// no dependencies. The file's own module and the runtime module (always
    /// imported) are left out. The result is sorted.
    pub fn needed_modules(&self, for_file: &str, dependencies: &[&str]) -> Option<Vec<String>> {
        if !self.has_proto_path_mappings || dependencies.is_empty() {
            return None;
        }

        let mut needed: BTreeSet<&str> = dependencies
            .iter()
            .filter_map(|dep| self.module_name(dep))
            .collect();
        if let Some(own) = self.module_name(for_file) {
            needed.remove(own);
        }
        needed.remove(self.swift_protobuf_module_name.as_str());

        Some(needed.into_iter().map(str::to_string).collect())
    }
}
