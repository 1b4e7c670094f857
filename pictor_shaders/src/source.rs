// Copyright 2025 the Pictor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An ordered accumulator of macro definitions and GLSL snippets.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

/// How a piece of added source text is interpreted at assembly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceKind {
    /// Literal shader text.
    String,
    /// Key of a snippet resolved against a resource registry.
    Resource,
}

/// Value bound by a macro definition.
#[derive(Clone, Debug, PartialEq)]
pub enum MacroValue {
    Text(String),
    U32(u32),
    F32(f32),
}

impl From<&str> for MacroValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<u32> for MacroValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<f32> for MacroValue {
    fn from(value: f32) -> Self {
        Self::F32(value)
    }
}

#[derive(Clone, Debug)]
enum Entry {
    Define { name: String, value: MacroValue },
    Undef { name: String },
    Source { contents: String, kind: SourceKind },
}

/// Errors produced while assembling a [`ShaderSource`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// A [`SourceKind::Resource`] entry named a key the registry lacks.
    #[error("unknown shader resource `{0}`")]
    UnknownResource(String),
}

/// A shader source under construction.
///
/// Macro definitions, `#undef`s and source snippets are emitted in
/// exactly the order they were added, so a macro added before a snippet
/// parameterizes it and an `#undef` added after scopes it. Sources
/// compose: pushing the entries of one builder into another preserves
/// this ordering.
#[derive(Clone, Debug, Default)]
pub struct ShaderSource {
    entries: Vec<Entry>,
}

impl ShaderSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `#define` of `name` to `value`.
    pub fn add_macro(&mut self, name: &str, value: impl Into<MacroValue>) -> &mut Self {
        self.entries.push(Entry::Define {
            name: name.to_owned(),
            value: value.into(),
        });
        self
    }

    /// Appends an `#undef` of `name`.
    ///
    /// Assembling a source that undefines a macro it never defined logs a
    /// warning but still emits the `#undef`.
    pub fn remove_macro(&mut self, name: &str) -> &mut Self {
        self.entries.push(Entry::Undef {
            name: name.to_owned(),
        });
        self
    }

    /// Appends a source snippet, literal text or a resource key.
    pub fn add_source(&mut self, contents: &str, kind: SourceKind) -> &mut Self {
        self.entries.push(Entry::Source {
            contents: contents.to_owned(),
            kind,
        });
        self
    }

    /// Appends every entry of `other`, preserving its internal order.
    pub fn extend(&mut self, other: &ShaderSource) -> &mut Self {
        self.entries.extend_from_slice(&other.entries);
        self
    }

    /// Concatenates the accumulated entries into one GLSL string,
    /// resolving resource entries against `resources`.
    pub fn assemble(&self, resources: &HashMap<&str, &str>) -> Result<String, SourceError> {
        let mut out = String::new();
        let mut defined: HashSet<&str> = HashSet::new();
        for entry in &self.entries {
            match entry {
                Entry::Define { name, value } => {
                    defined.insert(name.as_str());
                    match value {
                        MacroValue::Text(text) => {
                            out.push_str(&format!("#define {name} {text}\n"));
                        }
                        MacroValue::U32(value) => {
                            out.push_str(&format!("#define {name} {value}\n"));
                        }
                        // Debug formatting keeps a decimal point on round
                        // values, which GLSL needs to type the literal as
                        // a float.
                        MacroValue::F32(value) => {
                            out.push_str(&format!("#define {name} {value:?}\n"));
                        }
                    }
                }
                Entry::Undef { name } => {
                    if !defined.remove(name.as_str()) {
                        log::warn!("#undef of `{name}`, which this source never defined");
                    }
                    out.push_str(&format!("#undef {name}\n"));
                }
                Entry::Source { contents, kind } => {
                    let text = match kind {
                        SourceKind::String => contents.as_str(),
                        SourceKind::Resource => resources
                            .get(contents.as_str())
                            .copied()
                            .ok_or_else(|| SourceError::UnknownResource(contents.clone()))?,
                    };
                    out.push_str(text);
                    if !text.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ShaderSource, SourceError, SourceKind};

    #[test]
    fn entries_assemble_in_recorded_order() {
        let mut source = ShaderSource::new();
        source
            .add_macro("WIDTH", 32_u32)
            .add_macro("SCALE", 2.0_f32)
            .add_macro("FETCH", "texelFetch")
            .add_source("float helper(void);", SourceKind::String)
            .remove_macro("FETCH");
        let assembled = source.assemble(&HashMap::new()).unwrap();
        assert_eq!(
            assembled,
            "#define WIDTH 32\n\
             #define SCALE 2.0\n\
             #define FETCH texelFetch\n\
             float helper(void);\n\
             #undef FETCH\n"
        );
    }

    #[test]
    fn resources_resolve_by_key() {
        let resources = HashMap::from([("helper.glsl", "float helper(void) { return 1.0; }\n")]);
        let mut source = ShaderSource::new();
        source.add_source("helper.glsl", SourceKind::Resource);
        let assembled = source.assemble(&resources).unwrap();
        assert_eq!(assembled, "float helper(void) { return 1.0; }\n");
    }

    #[test]
    fn unknown_resource_is_an_error() {
        let mut source = ShaderSource::new();
        source.add_source("missing.glsl", SourceKind::Resource);
        let err = source.assemble(&HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            SourceError::UnknownResource(name) if name == "missing.glsl"
        ));
    }

    #[test]
    fn extend_preserves_order() {
        let mut inner = ShaderSource::new();
        inner
            .add_macro("NAME", "inner_fn")
            .add_source("void inner_fn(void);", SourceKind::String)
            .remove_macro("NAME");

        let mut outer = ShaderSource::new();
        outer.add_source("// prologue", SourceKind::String);
        outer.extend(&inner);
        let assembled = outer.assemble(&HashMap::new()).unwrap();
        assert_eq!(
            assembled,
            "// prologue\n\
             #define NAME inner_fn\n\
             void inner_fn(void);\n\
             #undef NAME\n"
        );
    }

    #[test]
    fn undef_without_define_still_emits() {
        let mut source = ShaderSource::new();
        source.remove_macro("NEVER_DEFINED");
        let assembled = source.assemble(&HashMap::new()).unwrap();
        assert_eq!(assembled, "#undef NEVER_DEFINED\n");
    }
}
