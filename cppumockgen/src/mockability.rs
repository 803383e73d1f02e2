use std::fmt;

use crate::classifier::Classification;
use crate::{Access, CallableDeclaration, Qualifiers};

/// Why a declaration cannot be mocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unmockable {
    /// Function templates and members of class templates.
    Template,
    /// `operator T()` has no return type to declare the mock with.
    ConversionOperator,
    /// Pure virtual methods have no definition to substitute.
    PureVirtual,
    /// The header already provides the body.
    InlineDefinition,
    /// Private or protected non-virtual method.
    Hidden,
    /// The return type has no mock representation.
    UnsupportedReturn(String),
    /// A parameter type has no mock representation.
    UnsupportedParameter {
        /// Parameter name.
        name: String,
        /// Declared type spelling.
        ty: String,
    },
}

impl fmt::Display for Unmockable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unmockable::Template => f.write_str("template"),
            Unmockable::ConversionOperator => f.write_str("conversion operator"),
            Unmockable::PureVirtual => f.write_str("pure virtual"),
            Unmockable::InlineDefinition => f.write_str("defined inline"),
            Unmockable::Hidden => f.write_str("non-virtual and not public"),
            Unmockable::UnsupportedReturn(ty) => write!(f, "unsupported return type `{ty}`"),
            Unmockable::UnsupportedParameter { name, ty } => {
                write!(f, "unsupported type `{ty}` for parameter `{name}`")
            }
        }
    }
}

/// Decides whether `decl` can be mocked given its classifications.
pub fn evaluate(
    decl: &CallableDeclaration,
    return_classification: Option<&Classification>,
    parameter_classifications: &[Classification],
) -> Result<(), Unmockable> {
    let qualifiers = decl.qualifiers();
    if qualifiers.contains(Qualifiers::TEMPLATE) {
        return Err(Unmockable::Template);
    }
    if decl.is_conversion_operator() {
        return Err(Unmockable::ConversionOperator);
    }
    if qualifiers.contains(Qualifiers::PURE_VIRTUAL) {
        return Err(Unmockable::PureVirtual);
    }
    if qualifiers.contains(Qualifiers::DEFINED) {
        return Err(Unmockable::InlineDefinition);
    }
    if decl.is_method()
        && decl.access() != Access::Public
        && !qualifiers.contains(Qualifiers::VIRTUAL)
    {
        return Err(Unmockable::Hidden);
    }
    if return_classification.is_some_and(Classification::is_unsupported) {
        return Err(Unmockable::UnsupportedReturn(decl.return_type().spelling()));
    }
    for (parameter, classification) in decl.parameters().iter().zip(parameter_classifications) {
        if classification.is_unsupported() {
            return Err(Unmockable::UnsupportedParameter {
                name: parameter.name().to_string(),
                ty: parameter.ty().spelling(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builtin, CallableKind, Classifier, Config, TypeDescriptor};

    fn check(decl: &CallableDeclaration, config: &Config) -> Result<(), Unmockable> {
        let classifier = Classifier::new(config);
        let ret = classifier.classify_return(decl.qualified_name(), decl.return_type());
        let params: Vec<_> = decl
            .parameters()
            .iter()
            .map(|p| classifier.classify_parameter(decl.qualified_name(), p))
            .collect();
        evaluate(decl, ret.as_ref(), &params)
    }

    fn free(ret: TypeDescriptor) -> CallableDeclaration {
        CallableDeclaration::new("f", CallableKind::FreeFunction, ret)
    }

    #[test]
    fn zero_parameters_with_supported_return() {
        let decl = free(TypeDescriptor::builtin(Builtin::Int));
        assert_eq!(check(&decl, &Config::default()), Ok(()));
    }

    #[test]
    fn one_unsupported_parameter_is_enough() {
        let decl = free(TypeDescriptor::void())
            .with_parameter("a", TypeDescriptor::builtin(Builtin::Int))
            .with_parameter("cb", TypeDescriptor::named("void (*)()", crate::TypeCategory::FunctionPointer));
        let config = Config::from_options(false, &["f#a=Double"], &[] as &[&str]).unwrap();
        assert_eq!(
            check(&decl, &config),
            Err(Unmockable::UnsupportedParameter {
                name: "cb".into(),
                ty: "void (*)()".into()
            })
        );
    }

    #[test]
    fn skip_override_keeps_declaration_mockable() {
        let decl = free(TypeDescriptor::void())
            .with_parameter("cb", TypeDescriptor::named("void (*)()", crate::TypeCategory::FunctionPointer));
        let config = Config::from_options(false, &["f#cb=Skip"], &[] as &[&str]).unwrap();
        assert_eq!(check(&decl, &config), Ok(()));
    }

    #[test]
    fn unsupported_return() {
        let decl = free(TypeDescriptor::record("Class1").rvalue_ref());
        assert_eq!(
            check(&decl, &Config::default()),
            Err(Unmockable::UnsupportedReturn("Class1 &&".into()))
        );
    }

    #[test]
    fn qualifiers_that_prevent_mocking() {
        let cases = [
            (Qualifiers::TEMPLATE, Unmockable::Template),
            (Qualifiers::PURE_VIRTUAL | Qualifiers::VIRTUAL, Unmockable::PureVirtual),
            (Qualifiers::DEFINED, Unmockable::InlineDefinition),
        ];
        for (qualifiers, reason) in cases {
            let decl = CallableDeclaration::new(
                "Class1::method1",
                CallableKind::MemberFunction,
                TypeDescriptor::void(),
            )
            .with_qualifiers(qualifiers);
            assert_eq!(check(&decl, &Config::default()), Err(reason));
        }
    }

    #[test]
    fn hidden_methods_are_mocked_only_when_virtual() {
        let private = CallableDeclaration::new(
            "Class1::method1",
            CallableKind::MemberFunction,
            TypeDescriptor::void(),
        )
        .with_access(Access::Private);
        assert_eq!(check(&private, &Config::default()), Err(Unmockable::Hidden));

        let virtual_private = private.with_qualifiers(Qualifiers::VIRTUAL);
        assert_eq!(check(&virtual_private, &Config::default()), Ok(()));
    }
}
