//! Companion functions registering expected calls.
//!
//! Each mockable declaration gets two overloads in `namespace expect`, one
//! expecting a single call and one taking `unsigned int __numCalls__`.

use crate::classifier::{BufferSize, Classification};
use crate::declarations::AnalyzedDeclaration;
use crate::{DataKind, Parameter, Reference, TypeDescriptor};

/// Prototypes for the header or definitions for the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationMode {
    /// `MockExpectedCall& f(...);`
    Header,
    /// Full definitions.
    Implementation,
}

/// One parameter of the companion function and what it contributes to the call chain.
struct Slot {
    declarations: Vec<String>,
    call: String,
}

/// Both companion functions of `analyzed`, named `identifier` inside its scopes.
pub(crate) fn generate(
    analyzed: &AnalyzedDeclaration,
    identifier: &str,
    mode: ExpectationMode,
) -> String {
    let decl = analyzed.declaration();
    let scopes = decl.scopes();

    let mut out = String::from("namespace expect {");
    for scope in &scopes {
        out.push_str(&format!(" namespace {scope} {{"));
    }
    out.push('\n');

    let slots: Vec<Slot> = analyzed
        .parameters()
        .filter_map(|(parameter, classification)| parameter_slot(parameter, classification))
        .chain(
            analyzed
                .return_classification()
                .map(|classification| return_slot(decl.return_type(), classification)),
        )
        .collect();

    for one_call in [true, false] {
        let mut parameters = Vec::new();
        if !one_call {
            parameters.push("unsigned int __numCalls__".to_string());
        }
        if decl.binds_object() {
            parameters.push("void *__object__".to_string());
        }
        parameters.extend(slots.iter().flat_map(|slot| slot.declarations.iter().cloned()));

        let signature = format!("MockExpectedCall& {identifier}({})", parameters.join(", "));
        match mode {
            ExpectationMode::Header => {
                out.push_str(&signature);
                out.push_str(";\n");
            }
            ExpectationMode::Implementation => {
                let mut body = if one_call {
                    format!("mock().expectOneCall(\"{}\")", decl.qualified_name())
                } else {
                    format!("mock().expectNCalls(__numCalls__, \"{}\")", decl.qualified_name())
                };
                if decl.binds_object() {
                    body.push_str(".onObject(__object__)");
                }
                for slot in &slots {
                    body.push_str(&slot.call);
                }
                out.push_str(&format!("{signature}\n{{\n    return {body};\n}}\n"));
            }
        }
    }

    for _ in &scopes {
        out.push_str("} ");
    }
    out.push_str("}\n");
    out
}

fn parameter_slot(parameter: &Parameter, classification: &Classification) -> Option<Slot> {
    let name = parameter.name();
    let ty = parameter.ty();
    let value = classification.modifier().apply(name);

    let slot = match classification.kind() {
        DataKind::Skip => return None,
        DataKind::Output => {
            let (declaration, size) = match classification.size() {
                Some(BufferSize::Static(size)) => {
                    (output_pointer(ty).declare(name), Some(size.clone()))
                }
                _ if classification.copier().is_some() => (output_pointer(ty).declare(name), None),
                _ => (format!("const void * {name}"), None),
            };
            let mut declarations = vec![declaration];
            let call = match (classification.copier(), size) {
                (Some(tag), _) => {
                    format!(".withOutputParameterOfTypeReturning(\"{tag}\", \"{name}\", {name})")
                }
                (None, Some(size)) => {
                    format!(".withOutputParameterReturning(\"{name}\", {name}, {size})")
                }
                (None, None) => {
                    declarations.push(format!("size_t __sizeof_{name}"));
                    format!(".withOutputParameterReturning(\"{name}\", {name}, __sizeof_{name})")
                }
            };
            Slot { declarations, call }
        }
        DataKind::MemoryBuffer => {
            let mut declarations = vec![input_type(ty).declare(name)];
            let size = match classification.size() {
                Some(BufferSize::Static(size)) => size.replace('$', name),
                _ => {
                    declarations.push(format!("size_t __sizeof_{name}"));
                    format!("__sizeof_{name}")
                }
            };
            Slot {
                declarations,
                call: format!(
                    ".withMemoryBufferParameter(\"{name}\", reinterpret_cast<const unsigned char *>({value}), {size})"
                ),
            }
        }
        DataKind::Object(tag) => {
            let canonical = ty.canonical();
            let declaration = if canonical.pointers.is_empty() && canonical.reference == Reference::None {
                ty.clone().with_const().lvalue_ref().declare(name)
            } else {
                input_type(ty).declare(name)
            };
            Slot {
                declarations: vec![declaration],
                call: format!(".withParameterOfType(\"{tag}\", \"{name}\", {value})"),
            }
        }
        kind => Slot {
            declarations: vec![input_type(ty).declare(name)],
            call: format!(".{}(\"{name}\", {value})", kind.parameter_call()),
        },
    };
    Some(slot)
}

fn return_slot(ty: &TypeDescriptor, classification: &Classification) -> Slot {
    let (declaration, value) = if classification.by_address() {
        let declared = if ty.reference == Reference::None {
            ty.clone().with_const().lvalue_ref()
        } else {
            ty.clone()
        };
        (declared.declare("__return__"), "&__return__")
    } else {
        (ty.declare("__return__"), "__return__")
    };
    let call = match classification.kind().return_value_type() {
        Some(value_type) => format!(".andReturnValue(static_cast<{value_type}>({value}))"),
        None => String::new(),
    };
    Slot {
        declarations: vec![declaration],
        call,
    }
}

/// Expected values are taken by value where the mock takes an rvalue reference.
fn input_type(ty: &TypeDescriptor) -> TypeDescriptor {
    let mut input = ty.clone();
    if input.reference == Reference::RValue {
        input.reference = Reference::None;
    }
    input
}

/// `const <pointee> *` for the value copied into an output parameter.
fn output_pointer(ty: &TypeDescriptor) -> TypeDescriptor {
    let mut pointee = if !ty.array.is_empty() {
        ty.element()
    } else if ty.reference != Reference::None || !ty.pointers.is_empty() {
        ty.pointee().unwrap_or_else(|| ty.clone())
    } else {
        let canonical = ty.canonical();
        if canonical.array.is_empty() {
            canonical.pointee().unwrap_or(canonical)
        } else {
            canonical.element()
        }
    };
    pointee.reference = Reference::None;
    pointee.with_const().pointer()
}
