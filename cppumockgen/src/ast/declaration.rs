use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::TypeDescriptor;

bitflags! {
    /// Qualifiers attached to a callable declaration.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u16 {
        /// `const` member function.
        const CONST = 1 << 0;
        /// `static` member function.
        const STATIC = 1 << 1;
        /// `virtual` member function.
        const VIRTUAL = 1 << 2;
        /// Function template or member of a class template.
        const TEMPLATE = 1 << 3;
        /// Operator overload, including conversion operators.
        const OPERATOR = 1 << 4;
        /// Pure virtual (`= 0`) member function.
        const PURE_VIRTUAL = 1 << 5;
        /// The header also provides the body.
        const DEFINED = 1 << 6;
    }
}

/// Whether a callable is a free function or a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallableKind {
    /// Namespace-scope function.
    FreeFunction,
    /// Member function of a class or struct.
    MemberFunction,
}

/// Member access specifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// `public`, and the access of every free function.
    #[default]
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
}

/// A named, positioned parameter of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: String,
    position: usize,
    ty: TypeDescriptor,
}

impl Parameter {
    /// Parameter name. Unnamed parameters are called `_unnamedArg<N>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0-based position in the parameter list.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Declared type.
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }
}

/// A normalized view of one parsed function or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableDeclaration {
    qualified_name: String,
    kind: CallableKind,
    qualifiers: Qualifiers,
    access: Access,
    parameters: Vec<Parameter>,
    return_type: TypeDescriptor,
}

impl CallableDeclaration {
    /// A declaration with no parameters and no qualifiers.
    pub fn new(
        qualified_name: impl Into<String>,
        kind: CallableKind,
        return_type: TypeDescriptor,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            qualifiers: Qualifiers::empty(),
            access: Access::Public,
            parameters: Vec::new(),
            return_type,
        }
    }

    /// Appends a parameter. An empty name is replaced by `_unnamedArg<N>`.
    pub fn with_parameter(mut self, name: &str, ty: TypeDescriptor) -> Self {
        let position = self.parameters.len();
        let name = if name.trim().is_empty() {
            format!("_unnamedArg{position}")
        } else {
            name.trim().to_string()
        };
        self.parameters.push(Parameter { name, position, ty });
        self
    }

    /// Adds qualifier flags.
    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers |= qualifiers;
        self
    }

    /// Sets the member access.
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Fully qualified name, e.g. `ns1::Class1::method1`.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The last component of the qualified name.
    pub fn name(&self) -> &str {
        self.split_name().1
    }

    /// Enclosing namespaces and classes, outermost first.
    pub fn scopes(&self) -> Vec<&str> {
        match self.split_name().0 {
            "" => Vec::new(),
            scope => scope.split("::").collect(),
        }
    }

    fn split_name(&self) -> (&str, &str) {
        // Template arguments may contain `::`.
        let mut depth = 0usize;
        let mut last = None;
        let bytes = self.qualified_name.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            match b {
                b'<' => depth += 1,
                b'>' => depth = depth.saturating_sub(1),
                b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => last = Some(i),
                _ => {}
            }
        }
        match last {
            Some(i) => (&self.qualified_name[..i], &self.qualified_name[i + 2..]),
            None => ("", &self.qualified_name),
        }
    }

    /// Free function or member function.
    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    /// Whether this is a member function.
    pub fn is_method(&self) -> bool {
        self.kind == CallableKind::MemberFunction
    }

    /// Qualifier flags.
    pub fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    /// Member access; always public for free functions.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared return type.
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    /// Whether the mock must bind the implicit object.
    pub fn binds_object(&self) -> bool {
        self.is_method() && !self.qualifiers.contains(Qualifiers::STATIC)
    }

    /// Whether this is a user-defined conversion operator like `operator bool`.
    pub fn is_conversion_operator(&self) -> bool {
        if !self.qualifiers.contains(Qualifiers::OPERATOR) {
            return false;
        }
        let Some(rest) = self.name().strip_prefix("operator") else {
            return false;
        };
        if !rest.starts_with(char::is_whitespace) {
            return false;
        }
        let rest = rest.trim_start();
        let word: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        !word.is_empty() && word != "new" && word != "delete"
    }

    /// Same name, same parameter types and same constness.
    pub fn is_redeclaration_of(&self, other: &CallableDeclaration) -> bool {
        self.qualified_name == other.qualified_name
            && self.qualifiers.contains(Qualifiers::CONST)
                == other.qualifiers.contains(Qualifiers::CONST)
            && self.parameter_spellings() == other.parameter_spellings()
    }

    /// Takes over what a later redeclaration of the same function adds: a
    /// body, or a pure specifier.
    pub(crate) fn merge_redeclaration(&mut self, other: &CallableDeclaration) {
        self.qualifiers |= other.qualifiers & (Qualifiers::DEFINED | Qualifiers::PURE_VIRTUAL);
    }

    /// Parameter type spellings in declaration order.
    pub fn parameter_spellings(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.ty.spelling()).collect()
    }
}
