//! The seam to the C/C++ parser.
//!
//! A front-end turns a header into a [`TranslationUnit`]: diagnostics plus a
//! tree of entities. [`JsonFrontEnd`] reads that tree from a JSON dump made by
//! an external clang-based tool.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::{
    Access, CallableDeclaration, CallableKind, Error, Qualifiers, Result, TypeDescriptor,
};

/// What the front-end is asked to parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    /// The header to parse.
    pub input: &'a Path,
    /// Parse as C++ rather than C.
    pub interpret_as_cpp: bool,
    /// Use the C++11 dialect when parsing as C++.
    pub cpp11: bool,
    /// `-I` directories.
    pub include_paths: &'a [PathBuf],
    /// Headers included before the input.
    pub extra_includes: &'a [PathBuf],
}

/// Something that can parse a header.
pub trait FrontEnd {
    /// Parses `request.input`. Syntax problems are returned as diagnostics;
    /// `Err` means the front-end itself could not run.
    fn parse(&self, request: &ParseRequest<'_>) -> Result<TranslationUnit>;
}

/// A parsed header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Messages reported while parsing.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    /// Top-level entities.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

fn main_file() -> bool {
    true
}

/// A node of the declaration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    /// `namespace name { ... }`
    Namespace {
        /// Namespace name; empty for an anonymous namespace.
        #[serde(default)]
        name: String,
        /// Declared in the input file rather than an included one.
        #[serde(default = "main_file")]
        from_main_file: bool,
        /// Nested entities.
        #[serde(default)]
        children: Vec<Entity>,
    },
    /// A class, struct or union definition.
    Class {
        /// Class name.
        name: String,
        /// Declared in the input file rather than an included one.
        #[serde(default = "main_file")]
        from_main_file: bool,
        /// Whether this is a class template.
        #[serde(default)]
        is_template: bool,
        /// Members.
        #[serde(default)]
        children: Vec<Entity>,
    },
    /// A function or member function declaration.
    Function(FunctionEntity),
    /// Anything else, such as an `extern "C"` block.
    Other {
        /// Declared in the input file rather than an included one.
        #[serde(default = "main_file")]
        from_main_file: bool,
        /// Nested entities.
        #[serde(default)]
        children: Vec<Entity>,
    },
}

/// A function as reported by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntity {
    /// Unqualified name, e.g. `method1` or `operator==`.
    pub name: String,
    /// Declared in the input file rather than an included one.
    #[serde(default = "main_file")]
    pub from_main_file: bool,
    /// Return type.
    pub return_type: TypeDescriptor,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterEntity>,
    /// Member access; ignored for free functions.
    #[serde(default)]
    pub access: Access,
    /// `const` member function.
    #[serde(default)]
    pub is_const: bool,
    /// `static` member function.
    #[serde(default)]
    pub is_static: bool,
    /// `virtual` member function.
    #[serde(default)]
    pub is_virtual: bool,
    /// `= 0`
    #[serde(default)]
    pub is_pure_virtual: bool,
    /// Function template.
    #[serde(default)]
    pub is_template: bool,
    /// The declaration carries a body.
    #[serde(default)]
    pub is_defined: bool,
}

/// A parameter as reported by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntity {
    /// Name; empty when unnamed.
    #[serde(default)]
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

/// Enclosing class of a member being collected.
#[derive(Clone, Copy)]
struct ClassScope {
    is_template: bool,
}

impl FunctionEntity {
    fn to_declaration(&self, scope: &[String], class: Option<ClassScope>) -> CallableDeclaration {
        let qualified_name = scope
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join("::");
        let kind = match class {
            Some(_) => CallableKind::MemberFunction,
            None => CallableKind::FreeFunction,
        };

        let mut qualifiers = Qualifiers::empty();
        qualifiers.set(Qualifiers::CONST, self.is_const);
        qualifiers.set(Qualifiers::STATIC, self.is_static);
        qualifiers.set(Qualifiers::VIRTUAL, self.is_virtual || self.is_pure_virtual);
        qualifiers.set(Qualifiers::PURE_VIRTUAL, self.is_pure_virtual);
        qualifiers.set(
            Qualifiers::TEMPLATE,
            self.is_template || class.is_some_and(|c| c.is_template),
        );
        qualifiers.set(Qualifiers::OPERATOR, is_operator_name(&self.name));
        qualifiers.set(Qualifiers::DEFINED, self.is_defined);

        let access = match class {
            Some(_) => self.access,
            None => Access::Public,
        };

        self.parameters.iter().fold(
            CallableDeclaration::new(qualified_name, kind, self.return_type.clone())
                .with_qualifiers(qualifiers)
                .with_access(access),
            |declaration, parameter| declaration.with_parameter(&parameter.name, parameter.ty.clone()),
        )
    }
}

fn is_operator_name(name: &str) -> bool {
    name.strip_prefix("operator")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| !(c.is_ascii_alphanumeric() || c == '_'))
}

/// Every function declared in the input file, in source order.
pub fn collect_declarations(unit: &TranslationUnit) -> Vec<CallableDeclaration> {
    collect(&unit.entities, &[], None)
}

fn collect(
    entities: &[Entity],
    scope: &[String],
    class: Option<ClassScope>,
) -> Vec<CallableDeclaration> {
    let nested = |name: &str| {
        let mut scope = scope.to_vec();
        scope.push(name.to_string());
        scope
    };

    entities
        .iter()
        .flat_map(|entity| match entity {
            Entity::Namespace {
                name,
                from_main_file: true,
                children,
            } if !name.is_empty() => collect(children, &nested(name), None),
            Entity::Class {
                name,
                from_main_file: true,
                is_template,
                children,
            } => {
                let is_template = *is_template || class.is_some_and(|c| c.is_template);
                collect(children, &nested(name), Some(ClassScope { is_template }))
            }
            Entity::Function(function) if function.from_main_file => {
                vec![function.to_declaration(scope, class)]
            }
            Entity::Other {
                from_main_file: true,
                children,
            } => collect(children, scope, class),
            _ => Vec::new(),
        })
        .collect()
}

/// Reads the declaration tree from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonFrontEnd {
    ast_path: Option<PathBuf>,
}

impl JsonFrontEnd {
    /// Reads `<input>.json` next to each input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the tree from `path` instead.
    pub fn with_ast_path(path: impl Into<PathBuf>) -> Self {
        Self {
            ast_path: Some(path.into()),
        }
    }

    /// The JSON file read for `input`.
    pub fn ast_path(&self, input: &Path) -> PathBuf {
        match &self.ast_path {
            Some(path) => path.clone(),
            None => {
                let mut path = input.as_os_str().to_owned();
                path.push(".json");
                PathBuf::from(path)
            }
        }
    }
}

impl FrontEnd for JsonFrontEnd {
    fn parse(&self, request: &ParseRequest<'_>) -> Result<TranslationUnit> {
        let path = self.ast_path(request.input);
        debug!(path = %path.display(), "reading declaration tree");
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::FrontEnd(format!("cannot read '{}': {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::FrontEnd(format!("invalid declaration tree '{}': {e}", path.display())))
    }
}
