//! Substitute definitions forwarding each call to `mock().actualCall(...)`.

use crate::classifier::{BufferSize, Classification};
use crate::declarations::AnalyzedDeclaration;
use crate::{DataKind, Parameter, Qualifiers};

/// The mock definition of a mockable declaration.
pub(crate) fn generate(analyzed: &AnalyzedDeclaration) -> String {
    let decl = analyzed.declaration();

    let parameters: Vec<String> = analyzed
        .parameters()
        .map(|(parameter, classification)| match classification.kind() {
            DataKind::Skip => parameter.ty().spelling(),
            _ => parameter.ty().declare(parameter.name()),
        })
        .collect();
    let constness = if decl.qualifiers().contains(Qualifiers::CONST) {
        " const"
    } else {
        ""
    };

    let mut call = format!("mock().actualCall(\"{}\")", decl.qualified_name());
    if decl.binds_object() {
        call.push_str(".onObject(this)");
    }
    for (parameter, classification) in analyzed.parameters() {
        call.push_str(&parameter_call(parameter, classification));
    }

    let statement = match analyzed.return_classification() {
        Some(classification) => {
            if let Some(retrieval) = classification.kind().return_call() {
                call.push('.');
                call.push_str(retrieval);
                call.push_str("()");
            }
            format!("return {}", classification.modifier().apply(&call))
        }
        None => call,
    };

    format!(
        "{} {}({}){}\n{{\n    {};\n}}\n",
        decl.return_type().spelling(),
        decl.qualified_name(),
        parameters.join(", "),
        constness,
        statement,
    )
}

fn parameter_call(parameter: &Parameter, classification: &Classification) -> String {
    let name = parameter.name();
    let value = classification.modifier().apply(name);
    match classification.kind() {
        DataKind::Skip => String::new(),
        DataKind::MemoryBuffer => {
            let size = match classification.size() {
                Some(BufferSize::Static(size) | BufferSize::Runtime(size)) => size.replace('$', name),
                Some(BufferSize::Caller) | None => "0".to_string(),
            };
            format!(
                ".withMemoryBufferParameter(\"{name}\", reinterpret_cast<const unsigned char *>({value}), {size})"
            )
        }
        DataKind::Object(tag) => format!(".withParameterOfType(\"{tag}\", \"{name}\", {value})"),
        DataKind::Output => match classification.copier() {
            Some(tag) => format!(".withOutputParameterOfType(\"{tag}\", \"{name}\", {value})"),
            None => format!(".withOutputParameter(\"{name}\", {value})"),
        },
        kind => format!(".{}(\"{name}\", {value})", kind.parameter_call()),
    }
}
