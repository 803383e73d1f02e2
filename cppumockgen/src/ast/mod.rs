//! Parser-independent model of the declarations found in a header.

mod declaration;
mod types;

pub use declaration::{Access, CallableDeclaration, CallableKind, Parameter, Qualifiers};
pub(crate) use types::normalize_spelling;
pub use types::{Builtin, PointerLevel, Reference, TypeCategory, TypeDescriptor};
