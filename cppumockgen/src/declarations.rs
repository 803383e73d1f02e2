use std::collections::BTreeMap;

use tracing::debug;

use crate::classifier::Classification;
use crate::expectation::{self, ExpectationMode};
use crate::mockability::{self, Unmockable};
use crate::{CallableDeclaration, Classifier, Parameter, Qualifiers, mock_body};

/// A declaration together with its classifications and mockability.
#[derive(Debug, Clone)]
pub struct AnalyzedDeclaration {
    declaration: CallableDeclaration,
    return_classification: Option<Classification>,
    parameter_classifications: Vec<Classification>,
    mockability: Result<(), Unmockable>,
    expectation_name: String,
}

impl AnalyzedDeclaration {
    /// Classifies every parameter and the return type, then decides mockability once.
    pub fn analyze(declaration: CallableDeclaration, classifier: &Classifier<'_>) -> Self {
        let function = declaration.qualified_name();
        let return_classification = classifier.classify_return(function, declaration.return_type());
        let parameter_classifications: Vec<_> = declaration
            .parameters()
            .iter()
            .map(|parameter| classifier.classify_parameter(function, parameter))
            .collect();
        let mockability = mockability::evaluate(
            &declaration,
            return_classification.as_ref(),
            &parameter_classifications,
        );
        if let Err(reason) = &mockability {
            debug!(function, %reason, "not mockable");
        }
        let expectation_name = declaration.name().to_string();

        Self {
            declaration,
            return_classification,
            parameter_classifications,
            mockability,
            expectation_name,
        }
    }

    /// The analyzed declaration.
    pub fn declaration(&self) -> &CallableDeclaration {
        &self.declaration
    }

    /// Whether a mock can be generated.
    pub fn is_mockable(&self) -> bool {
        self.mockability.is_ok()
    }

    /// Why no mock can be generated.
    pub fn unmockable_reason(&self) -> Option<&Unmockable> {
        self.mockability.as_ref().err()
    }

    /// Parameters paired with their classifications.
    pub fn parameters(&self) -> impl Iterator<Item = (&Parameter, &Classification)> {
        self.declaration
            .parameters()
            .iter()
            .zip(&self.parameter_classifications)
    }

    /// Classification of the return value; `None` for `void`.
    pub fn return_classification(&self) -> Option<&Classification> {
        self.return_classification.as_ref()
    }

    /// Unqualified name of the companion functions.
    pub fn expectation_name(&self) -> &str {
        &self.expectation_name
    }

    /// The mock definition, if the declaration is mockable.
    pub fn generate_mock(&self) -> Option<String> {
        self.is_mockable().then(|| mock_body::generate(self))
    }

    /// The companion functions, if the declaration is mockable.
    pub fn generate_expectation(&self, mode: ExpectationMode) -> Option<String> {
        self.is_mockable()
            .then(|| expectation::generate(self, &self.expectation_name, mode))
    }
}

/// The mockable declarations of one input file, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DeclarationSet {
    declarations: Vec<AnalyzedDeclaration>,
    unmockable: Vec<AnalyzedDeclaration>,
}

impl DeclarationSet {
    /// Analyzes `declarations`, drops repeated redeclarations and names
    /// overloaded companion functions `<name>_<n>`.
    pub fn new(declarations: Vec<CallableDeclaration>, classifier: &Classifier<'_>) -> Self {
        let mut unique: Vec<CallableDeclaration> = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            if let Some(seen) = unique
                .iter_mut()
                .find(|seen| declaration.is_redeclaration_of(seen))
            {
                debug!(function = declaration.qualified_name(), "redeclaration");
                seen.merge_redeclaration(&declaration);
                continue;
            }
            unique.push(declaration);
        }

        let (mut mockable, unmockable): (Vec<_>, Vec<_>) = unique
            .into_iter()
            .map(|declaration| AnalyzedDeclaration::analyze(declaration, classifier))
            .partition(AnalyzedDeclaration::is_mockable);

        let mut overloads: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (index, analyzed) in mockable.iter().enumerate() {
            overloads
                .entry(analyzed.declaration.qualified_name())
                .or_default()
                .push(index);
        }
        let mut renames = Vec::new();
        for mut group in overloads.into_values().filter(|group| group.len() > 1) {
            group.sort_by_key(|&index| {
                let declaration = &mockable[index].declaration;
                (
                    declaration.parameter_spellings(),
                    declaration.qualifiers().contains(Qualifiers::CONST),
                )
            });
            for (n, index) in group.into_iter().enumerate() {
                renames.push((index, format!("{}_{}", mockable[index].declaration.name(), n + 1)));
            }
        }
        for (index, name) in renames {
            mockable[index].expectation_name = name;
        }

        Self {
            declarations: mockable,
            unmockable,
        }
    }

    /// Mockable declarations.
    pub fn mockable(&self) -> &[AnalyzedDeclaration] {
        &self.declarations
    }

    /// Declarations that were analyzed but cannot be mocked.
    pub fn unmockable(&self) -> &[AnalyzedDeclaration] {
        &self.unmockable
    }

    /// Whether nothing can be mocked.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Number of mockable declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// All mock definitions, in declaration order.
    pub fn mocks(&self) -> Vec<String> {
        self.declarations
            .iter()
            .filter_map(AnalyzedDeclaration::generate_mock)
            .collect()
    }

    /// All companion functions, in declaration order.
    pub fn expectations(&self, mode: ExpectationMode) -> Vec<String> {
        self.declarations
            .iter()
            .filter_map(|analyzed| analyzed.generate_expectation(mode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Builtin, CallableKind, Config, TypeCategory, TypeDescriptor};

    fn h(parameter: TypeDescriptor) -> CallableDeclaration {
        CallableDeclaration::new("h", CallableKind::FreeFunction, TypeDescriptor::void())
            .with_parameter("a", parameter)
    }

    fn names(set: &DeclarationSet) -> Vec<&str> {
        set.mockable()
            .iter()
            .map(AnalyzedDeclaration::expectation_name)
            .collect()
    }

    #[test]
    fn overloads_get_distinct_companions() {
        let config = Config::default();
        let set = DeclarationSet::new(
            vec![
                h(TypeDescriptor::builtin(Builtin::Long)),
                h(TypeDescriptor::builtin(Builtin::Bool)),
                CallableDeclaration::new("other", CallableKind::FreeFunction, TypeDescriptor::void()),
            ],
            &Classifier::new(&config),
        );
        // Sorted by parameter spellings: "bool" < "long".
        assert_eq!(names(&set), ["h_2", "h_1", "other"]);
    }

    #[test]
    fn const_overloads_yield_two_companions() {
        let config = Config::default();
        let method = |qualifiers| {
            CallableDeclaration::new("C::get", CallableKind::MemberFunction, TypeDescriptor::void())
                .with_qualifiers(qualifiers)
        };
        let set = DeclarationSet::new(
            vec![method(Qualifiers::CONST), method(Qualifiers::empty())],
            &Classifier::new(&config),
        );
        assert_eq!(names(&set), ["get_2", "get_1"]);
    }

    #[test]
    fn redeclarations_are_dropped() {
        let config = Config::default();
        let int = TypeDescriptor::builtin(Builtin::Int);
        let set = DeclarationSet::new(
            vec![h(int.clone()), h(int)],
            &Classifier::new(&config),
        );
        assert_eq!(set.len(), 1);
        assert_eq!(names(&set), ["h"]);
    }

    #[test]
    fn later_inline_definition_makes_function_unmockable() {
        let config = Config::default();
        let int = TypeDescriptor::builtin(Builtin::Int);
        let set = DeclarationSet::new(
            vec![
                h(int.clone()),
                h(int).with_qualifiers(Qualifiers::DEFINED),
                h(TypeDescriptor::builtin(Builtin::Double)),
            ],
            &Classifier::new(&config),
        );
        assert_eq!(names(&set), ["h"]);
        assert_eq!(set.mockable()[0].declaration().parameter_spellings(), ["double"]);
        assert_eq!(set.unmockable().len(), 1);
        assert_eq!(
            set.unmockable()[0].unmockable_reason(),
            Some(&Unmockable::InlineDefinition)
        );
    }

    #[test]
    fn unmockable_declarations_are_kept_apart() {
        let config = Config::default();
        let callback = TypeDescriptor::named("void (*)()", TypeCategory::FunctionPointer);
        let set = DeclarationSet::new(
            vec![h(callback), h(TypeDescriptor::builtin(Builtin::Int))],
            &Classifier::new(&config),
        );
        assert_eq!(names(&set), ["h"]);
        assert_eq!(set.unmockable().len(), 1);
        assert!(set.unmockable()[0].generate_mock().is_none());
    }
}
