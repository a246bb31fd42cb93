use crate::error::OptionsError;
use crate::identifier::is_valid_swift_identifier;
use crate::mappings::ModuleMappings;
use crate::parameter::parse_parameter;
use log::{debug, trace};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Declares a closed enumeration whose variants are spelled in the parameter
/// string exactly as they are named.
macro_rules! parameter_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

parameter_enum! {
    /// How output file names are derived from the input proto paths.
    #[derive(Default)]
    OutputNaming { #[default] FullPath, PathToUnderscores, DropPath }
}

parameter_enum! {
    /// Access level of the generated declarations.
    #[derive(Default)]
    Visibility { #[default] Internal, Public }
}

parameter_enum! {
    /// Extra protocols generated message types declare conformance to.
    MessageConformance { DecodableMessage }
}


impl Visibility {
    /// Text emitted in front of every generated declaration.
    pub fn source_snippet(self) -> &'static str {
        match self {
            Visibility::Internal => "",
            Visibility::Public => "public ",
        }
    }
}

/// Insertion-ordered set of message conformances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageConformances(Vec<MessageConformance>);

impl MessageConformances {
    pub fn empty() -> Self {
        MessageConformances(Vec::new())
    }

    pub fn all() -> Self {
        MessageConformances(MessageConformance::ALL.to_vec())
    }

    /// Adds `conformance` unless already present; returns whether it was added.
    pub fn insert(&mut self, conformance: MessageConformance) -> bool {
        if self.contains(conformance) {
            return false;
        }
        self.0.push(conformance);
        true
    }

    pub fn contains(&self, conformance: MessageConformance) -> bool {
        self.0.contains(&conformance)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = MessageConformance> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[MessageConformance] {
        &self.0
    }
}

impl Default for MessageConformances {
    fn default() -> Self {
        Self::all()
    }
}

/// Validated options for one run of the generator.
///
/// Built once from the plugin parameter string and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorOptions {
    output_naming: OutputNaming,
    visibility: Visibility,
    visibility_source_snippet: &'static str,
    message_conformances: MessageConformances,
    comments_reduced: bool,
    swift_lint_disabled: bool,
    module_mappings: ModuleMappings,
}

/// Values collected while folding over the parameter pairs.
#[derive(Debug, Default)]
struct Accumulator {
    output_naming: OutputNaming,
    module_map_path: Option<String>,
    visibility: Visibility,
    swift_protobuf_module_name: Option<String>,
    // `None` until the parameter is given; distinct from an explicit empty list.
    message_conformances: Option<MessageConformances>,
    comments_reduced: bool,
    swift_lint_disabled: bool,
}

type Apply = fn(&mut Accumulator, &str, &str) -> Result<(), OptionsError>;

/// A recognized parameter and the function that validates and applies it.
pub struct ParameterHandler {
    pub name: &'static str,
    apply: Apply,
}

/// Every parameter the generator understands, matched case-sensitively.
pub static PARAMETERS: &[ParameterHandler] = &[
    ParameterHandler {
        name: "FileNaming",
        apply: apply_file_naming,
    },
    ParameterHandler {
        name: "ProtoPathModuleMappings",
        apply: apply_module_mappings_path,
    },
    ParameterHandler {
        name: "Visibility",
        apply: apply_visibility,
    },
    ParameterHandler {
        name: "SwiftProtobufModuleName",
        apply: apply_swift_protobuf_module_name,
    },
    ParameterHandler {
        name: "MessageConformances",
        apply: apply_message_conformances,
    },
    ParameterHandler {
        name: "ReduceComments",
        apply: apply_reduce_comments,
    },
    ParameterHandler {
        name: "SwiftLintDisabled",
        apply: apply_swift_lint_disabled,
    },
];

/// Looks up the handler for a parameter name.
pub fn find_parameter(name: &str) -> Option<&'static ParameterHandler> {
    PARAMETERS.iter().find(|handler| handler.name == name)
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, OptionsError> {
    value
        .parse()
        .map_err(|_| OptionsError::invalid_value(name, value))
}

/// `Yes` / `No` switches.
fn parse_yes_no(name: &str, value: &str) -> Result<bool, OptionsError> {
    match value {
        "Yes" => Ok(true),
        "No" => Ok(false),
        _ => Err(OptionsError::invalid_value(name, value)),
    }
}

fn apply_file_naming(acc: &mut Accumulator, name: &str, value: &str) -> Result<(), OptionsError> {
    acc.output_naming = parse_value(name, value)?;
    Ok(())
}

fn apply_module_mappings_path(
    acc: &mut Accumulator,
    _name: &str,
    value: &str,
) -> Result<(), OptionsError> {
    // An empty value means "not given"; it does not clear an earlier path.
    if !value.is_empty() {
        acc.module_map_path = Some(value.to_string());
    }
    Ok(())
}

fn apply_visibility(acc: &mut Accumulator, name: &str, value: &str) -> Result<(), OptionsError> {
    acc.visibility = parse_value(name, value)?;
    Ok(())
}

fn apply_swift_protobuf_module_name(
    acc: &mut Accumulator,
    name: &str,
    value: &str,
) -> Result<(), OptionsError> {
    if !is_valid_swift_identifier(value, false) {
        return Err(OptionsError::invalid_value(name, value));
    }
    acc.swift_protobuf_module_name = Some(value.to_string());
    Ok(())
}

fn apply_message_conformances(
    acc: &mut Accumulator,
    name: &str,
    value: &str,
) -> Result<(), OptionsError> {
    let mut conformances = MessageConformances::empty();
    for element in value.split('+').filter(|element| !element.is_empty()) {
        // Matched trimmed, reported as written.
        let conformance = element
            .trim()
            .parse()
            .map_err(|_| OptionsError::invalid_value(name, element))?;
        conformances.insert(conformance);
    }
    acc.message_conformances = Some(conformances);
    Ok(())
}

fn apply_reduce_comments(
    acc: &mut Accumulator,
    name: &str,
    value: &str,
) -> Result<(), OptionsError> {
    acc.comments_reduced = parse_yes_no(name, value)?;
    Ok(())
}

fn apply_swift_lint_disabled(
    acc: &mut Accumulator,
    name: &str,
    value: &str,
) -> Result<(), OptionsError> {
    acc.swift_lint_disabled = parse_yes_no(name, value)?;
    Ok(())
}

impl Accumulator {
    fn apply(&mut self, key: &str, value: &str) -> Result<(), OptionsError> {
        let handler = find_parameter(key).ok_or_else(|| OptionsError::UnknownParameter {
            name: key.to_string(),
        })?;
        (handler.apply)(self, handler.name, value)?;
        debug!("generator parameter {key}={value}");
        Ok(())
    }

    fn finish(self) -> Result<GeneratorOptions, OptionsError> {
        let module_name = self.swift_protobuf_module_name.as_deref();
        let module_mappings = match self.module_map_path {
            Some(path) => ModuleMappings::load(&path, module_name).map_err(|source| {
                OptionsError::Wrapped {
                    context: format!("Parameter 'ProtoPathModuleMappings={path}'"),
                    source,
                }
            })?,
            None => ModuleMappings::new(module_name),
        };

        Ok(GeneratorOptions {
            output_naming: self.output_naming,
            visibility: self.visibility,
            visibility_source_snippet: self.visibility.source_snippet(),
            message_conformances: self.message_conformances.unwrap_or_default(),
            comments_reduced: self.comments_reduced,
            swift_lint_disabled: self.swift_lint_disabled,
            module_mappings,
        })
    }
}

impl GeneratorOptions {
    /// Resolves the plugin parameter string into generator options.
    ///
    /// Pairs are applied left to right, so a repeated key keeps its last
    /// value. The module mappings file, if any, is loaded after every pair
    /// has been validated.
    ///
    /// # Errors
    /// Returns the first `OptionsError` encountered; no partial options are
    /// produced.
    pub fn resolve(parameter: Option<&str>) -> Result<Self, OptionsError> {
        Self::from_pairs(parse_parameter(parameter))
    }

    /// Resolves already tokenized `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let acc = pairs
            .into_iter()
            .try_fold(Accumulator::default(), |mut acc, (key, value)| {
                acc.apply(key.as_ref(), value.as_ref())?;
                Ok::<_, OptionsError>(acc)
            })?;
        let options = acc.finish()?;
        trace!("resolved generator options: {options:?}");
        Ok(options)
    }

    pub fn output_naming(&self) -> OutputNaming {
        self.output_naming
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// `""` or `"public "`, matching [`GeneratorOptions::visibility`].
    pub fn visibility_source_snippet(&self) -> &'static str {
        self.visibility_source_snippet
    }

    pub fn message_conformances(&self) -> &MessageConformances {
        &self.message_conformances
    }

    pub fn comments_reduced(&self) -> bool {
        self.comments_reduced
    }

    pub fn swift_lint_disabled(&self) -> bool {
        self.swift_lint_disabled
    }

    pub fn module_mappings(&self) -> &ModuleMappings {
        &self.module_mappings
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            output_naming: OutputNaming::default(),
            visibility: Visibility::default(),
            visibility_source_snippet: Visibility::default().source_snippet(),
            message_conformances: MessageConformances::default(),
            comments_reduced: false,
            swift_lint_disabled: false,
            module_mappings: ModuleMappings::default(),
        }
    }
}
