use serde::{Deserialize, Serialize};

use crate::kind::DeclarationKind;

/// A named, typed field or operation to place in a definition body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub type_annotation: String,
    pub description: String,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        type_annotation: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_annotation: type_annotation.into(),
            description: description.into(),
        }
    }
}

/// A generated Lean 4 definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DeclarationKind,
    pub components: Vec<Component>,
    /// Full declaration text, imports included.
    pub code: String,
    /// Modules named by `import` lines, in order of appearance.
    pub dependencies: Vec<String>,
}
