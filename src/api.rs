use crate::error::OptionsError;
use crate::options::GeneratorOptions;

/// Resolves the parameter string `protoc` hands to the plugin.
///
/// This is the primary entry point. `None` and `Some("")` both yield the
/// default options.
///
/// # Errors
///
/// Returns an `OptionsError` for an unknown parameter, a value outside a
/// parameter's domain, or a module mappings file that fails to load.
pub fn resolve(parameter: Option<&str>) -> Result<GeneratorOptions, OptionsError> {
    GeneratorOptions::resolve(parameter)
}

impl GeneratorOptions {
    /// Serializes the effective options into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the effective options into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
