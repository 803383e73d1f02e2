//! Maps parameter and return types onto the mock API.
//!
//! Parameter and function-return overrides are consulted first, then type
//! overrides for the declared type, then heuristics on the canonical type.

use tracing::debug;

use crate::config::{ExprModifier, OverrideRule, Role, Selector};
use crate::{Builtin, Config, DataKind, Parameter, Reference, TypeCategory, TypeDescriptor};

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Derived from the type alone.
    Heuristic,
    /// A `<function>#<param>`, `#<param>` or `<function>@` rule.
    ParameterOverride,
    /// A `#<type>` or `@<type>` rule.
    TypeOverride,
}

/// Byte length of an output or memory buffer parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferSize {
    /// Known from the declared type, e.g. `sizeof(int)` or `16 * sizeof(char)`.
    Static(String),
    /// Computed from the call arguments in the mock; the expectation receives
    /// it as `size_t __sizeof_<name>`.
    Runtime(String),
    /// Unknown to the mock; the expectation receives it as `size_t __sizeof_<name>`.
    Caller,
}

/// The decision for one parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    kind: DataKind,
    modifier: ExprModifier,
    size: Option<BufferSize>,
    copier: Option<String>,
    origin: Origin,
    by_address: bool,
}

impl Classification {
    fn new(kind: DataKind, origin: Origin) -> Self {
        Self {
            kind,
            modifier: ExprModifier::default(),
            size: None,
            copier: None,
            origin,
            by_address: false,
        }
    }

    fn heuristic(kind: DataKind) -> Self {
        Self::new(kind, Origin::Heuristic)
    }

    fn skip() -> Self {
        Self::heuristic(DataKind::Skip)
    }

    fn with_modifier(mut self, modifier: ExprModifier) -> Self {
        self.modifier = modifier;
        self
    }

    fn with_size(mut self, size: BufferSize) -> Self {
        self.size = Some(size);
        self
    }

    /// The chosen kind.
    pub fn kind(&self) -> &DataKind {
        &self.kind
    }

    /// Expression wrapped around the value in the mock.
    pub fn modifier(&self) -> &ExprModifier {
        &self.modifier
    }

    /// Byte length for `Output` and `MemoryBuffer`.
    pub fn size(&self) -> Option<&BufferSize> {
        self.size.as_ref()
    }

    /// Copier type tag of an `Output` bound through an `Object` rule.
    pub fn copier(&self) -> Option<&str> {
        self.copier.as_deref()
    }

    /// Heuristic or override.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether the returned value is exchanged through its address.
    pub fn by_address(&self) -> bool {
        self.by_address
    }

    /// A Skip the heuristics fell back to, as opposed to a requested one.
    pub fn is_unsupported(&self) -> bool {
        self.kind == DataKind::Skip && self.origin == Origin::Heuristic
    }
}

/// Classifies types against one [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    config: &'a Config,
}

impl<'a> Classifier<'a> {
    /// A classifier consulting `config`.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Classifies parameter `parameter` of `function`.
    pub fn classify_parameter(&self, function: &str, parameter: &Parameter) -> Classification {
        if let Some(rule) = self
            .config
            .resolve_parameter_override(function, parameter.name())
        {
            debug!(function, parameter = parameter.name(), rule = %rule, "parameter override");
            return override_parameter(rule, parameter.ty(), Origin::ParameterOverride);
        }
        self.classify_type(parameter.ty(), Role::Parameter)
    }

    /// Classifies the return type of `function`; `None` for `void`.
    pub fn classify_return(&self, function: &str, ty: &TypeDescriptor) -> Option<Classification> {
        if ty.canonical().is_void() {
            return None;
        }
        if let Some(rule) = self.config.resolve_return_override(function) {
            debug!(function, rule = %rule, "return override");
            return Some(override_return(rule, ty, Origin::ParameterOverride));
        }
        Some(self.classify_type(ty, Role::Return))
    }

    /// Classifies `ty` from type rules and heuristics only.
    pub fn classify_type(&self, ty: &TypeDescriptor, role: Role) -> Classification {
        let canonical = ty.canonical();
        let lookup = if self.config.use_underlying_typedef_type() {
            &canonical
        } else {
            ty
        };
        if let Some(rule) = self.config.resolve_type_override(lookup, role) {
            if let Some(classification) = type_override(rule, ty, lookup, &canonical, role) {
                return classification;
            }
        }
        match role {
            Role::Parameter => parameter_heuristics(ty, &canonical),
            Role::Return => return_heuristics(ty, &canonical),
        }
    }
}

fn type_override(
    rule: &OverrideRule,
    ty: &TypeDescriptor,
    lookup: &TypeDescriptor,
    canonical: &TypeDescriptor,
    role: Role,
) -> Option<Classification> {
    if let Selector::TypeNameOnly { .. } = rule.selector() {
        if let (DataKind::Object(tag), Role::Parameter) = (rule.kind(), role) {
            if canonical.array.is_empty()
                && canonical.reference != Reference::RValue
                && canonical.pointers.len() <= 1
            {
                let indirect = canonical.reference == Reference::LValue || !canonical.pointers.is_empty();
                let mutable = canonical
                    .pointee()
                    .is_some_and(|pointee| !pointee.is_outer_const());
                if indirect && mutable {
                    let mut output = override_parameter(rule, ty, Origin::TypeOverride);
                    output.kind = DataKind::Output;
                    output.copier = Some(tag.clone());
                    output.size = None;
                    return Some(output);
                }
                return Some(override_parameter(rule, ty, Origin::TypeOverride));
            }
            return None;
        }
        if !lookup.is_plain() {
            return None;
        }
    }
    Some(match role {
        Role::Parameter => override_parameter(rule, ty, Origin::TypeOverride),
        Role::Return => override_return(rule, ty, Origin::TypeOverride),
    })
}

fn override_parameter(rule: &OverrideRule, ty: &TypeDescriptor, origin: Origin) -> Classification {
    let canonical = ty.canonical();
    let kind = rule.kind().clone();
    let modifier = rule
        .modifier()
        .cloned()
        .unwrap_or_else(|| natural_modifier(&kind, &canonical));
    let mut classification = Classification::new(kind, origin).with_modifier(modifier);
    match classification.kind {
        DataKind::Output => classification.size = Some(output_size(ty, &canonical)),
        DataKind::MemoryBuffer => {
            classification.size = rule
                .buffer_size()
                .map(|size| BufferSize::Runtime(size.to_string()));
        }
        _ => {}
    }
    classification
}

fn override_return(rule: &OverrideRule, ty: &TypeDescriptor, origin: Origin) -> Classification {
    let canonical = ty.canonical();
    let mut classification = Classification::new(rule.kind().clone(), origin);
    if let Some(modifier) = rule.modifier() {
        classification.modifier = modifier.clone();
    }
    classification.by_address = matches!(classification.kind, DataKind::Pointer | DataKind::ConstPointer)
        && (canonical.reference == Reference::LValue
            || (canonical.is_plain() && canonical.category == TypeCategory::Record));
    classification
}

/// `&` for values the kind can only carry by address.
fn natural_modifier(kind: &DataKind, canonical: &TypeDescriptor) -> ExprModifier {
    let by_reference = canonical.reference != Reference::None && canonical.array.is_empty();
    let address = match kind {
        DataKind::Object(_) => by_reference || canonical.pointers.is_empty(),
        DataKind::Output
        | DataKind::Pointer
        | DataKind::ConstPointer
        | DataKind::MemoryBuffer => by_reference,
        _ => false,
    };
    if address {
        ExprModifier::new("&", "")
    } else {
        ExprModifier::default()
    }
}

fn sizeof(ty: &TypeDescriptor) -> String {
    format!("sizeof({})", ty.without_outer_const().spelling())
}

/// Element type of an array, spelled through the declared typedef when the
/// extents are written on it.
fn array_element(ty: &TypeDescriptor, canonical: &TypeDescriptor) -> TypeDescriptor {
    if ty.array.is_empty() {
        canonical.element()
    } else {
        ty.element()
    }
}

fn array_count(canonical: &TypeDescriptor) -> Option<u64> {
    canonical
        .array
        .iter()
        .try_fold(1u64, |count, extent| extent.map(|n| count.saturating_mul(n)))
}

fn output_size(ty: &TypeDescriptor, canonical: &TypeDescriptor) -> BufferSize {
    if !canonical.array.is_empty() {
        let element = array_element(ty, canonical);
        if !element.is_sized() {
            return BufferSize::Caller;
        }
        return match array_count(canonical) {
            Some(count) if count != 1 => BufferSize::Static(format!("{count} * {}", sizeof(&element))),
            _ => BufferSize::Static(sizeof(&element)),
        };
    }
    let pointee = if ty.reference != Reference::None || !ty.pointers.is_empty() {
        ty.pointee()
    } else {
        canonical.pointee()
    };
    match pointee {
        Some(pointee) if pointee.is_sized() => BufferSize::Static(sizeof(&pointee)),
        _ => BufferSize::Caller,
    }
}

fn scalar_kind(builtin: Builtin) -> DataKind {
    match builtin {
        Builtin::Bool => DataKind::Bool,
        Builtin::Char | Builtin::SChar | Builtin::Short | Builtin::Int | Builtin::WChar => {
            DataKind::Int
        }
        Builtin::UChar | Builtin::UShort | Builtin::UInt | Builtin::Char16 => DataKind::UnsignedInt,
        Builtin::Long | Builtin::LongLong => DataKind::LongInt,
        Builtin::ULong | Builtin::ULongLong | Builtin::Char32 => DataKind::UnsignedLongInt,
        Builtin::Float | Builtin::Double | Builtin::LongDouble => DataKind::Double,
    }
}

/// Whether the value returned by the mock API differs from the declared type.
fn needs_return_cast(builtin: Builtin) -> bool {
    !matches!(
        builtin,
        Builtin::Bool
            | Builtin::Int
            | Builtin::UInt
            | Builtin::Long
            | Builtin::ULong
            | Builtin::Double
    )
}

fn static_cast(target: &str) -> ExprModifier {
    ExprModifier::new(format!("static_cast<{target}>( "), " )")
}

fn parameter_heuristics(ty: &TypeDescriptor, canonical: &TypeDescriptor) -> Classification {
    if canonical.category == TypeCategory::FunctionPointer {
        return Classification::skip();
    }
    if canonical.reference == Reference::RValue {
        let mut value = canonical.clone();
        value.reference = Reference::None;
        return match value.category {
            TypeCategory::Builtin(_) | TypeCategory::Enum if value.is_plain() => {
                parameter_heuristics(&value, &value)
            }
            _ => Classification::skip(),
        };
    }
    if !canonical.array.is_empty() {
        return array_heuristics(ty, canonical);
    }
    if canonical.pointers.is_empty() && canonical.reference == Reference::None {
        return match canonical.category {
            TypeCategory::Builtin(builtin) => Classification::heuristic(scalar_kind(builtin)),
            TypeCategory::Enum => {
                Classification::heuristic(DataKind::Int).with_modifier(static_cast("int"))
            }
            _ => Classification::skip(),
        };
    }

    let Some(pointee) = canonical.pointee() else {
        return Classification::skip();
    };
    let by_reference = canonical.reference == Reference::LValue;
    let address = if by_reference {
        ExprModifier::new("&", "")
    } else {
        ExprModifier::default()
    };

    if !by_reference
        && pointee.pointers.is_empty()
        && pointee.category == TypeCategory::Builtin(Builtin::Char)
    {
        return Classification::heuristic(DataKind::String);
    }

    if pointee.is_outer_const() {
        if by_reference && pointee.pointers.is_empty() && pointee.category == TypeCategory::Record {
            return Classification::skip();
        }
        return Classification::heuristic(DataKind::ConstPointer).with_modifier(address);
    }

    if !pointee.pointers.is_empty()
        || matches!(
            pointee.category,
            TypeCategory::Void | TypeCategory::Incomplete | TypeCategory::Template
        )
    {
        return Classification::heuristic(DataKind::Pointer).with_modifier(address);
    }

    match pointee.category {
        TypeCategory::Builtin(_) | TypeCategory::Enum | TypeCategory::Record => {
            Classification::heuristic(DataKind::Output)
                .with_modifier(address)
                .with_size(output_size(ty, canonical))
        }
        _ => Classification::skip(),
    }
}

fn array_heuristics(ty: &TypeDescriptor, canonical: &TypeDescriptor) -> Classification {
    let element = canonical.element();
    if element.pointers.is_empty() && element.category == TypeCategory::FunctionPointer {
        return Classification::skip();
    }
    if element.is_outer_const() {
        let declared = array_element(ty, canonical);
        return match array_count(canonical) {
            Some(count) if element.is_sized() => {
                let size = if count == 1 {
                    sizeof(&declared)
                } else {
                    format!("{count} * {}", sizeof(&declared))
                };
                Classification::heuristic(DataKind::MemoryBuffer).with_size(BufferSize::Static(size))
            }
            _ => Classification::heuristic(DataKind::ConstPointer),
        };
    }
    if !element.is_sized() {
        return Classification::heuristic(DataKind::Pointer);
    }
    Classification::heuristic(DataKind::Output).with_size(output_size(ty, canonical))
}

fn return_heuristics(ty: &TypeDescriptor, canonical: &TypeDescriptor) -> Classification {
    if canonical.category == TypeCategory::FunctionPointer
        || canonical.reference == Reference::RValue
        || !canonical.array.is_empty()
    {
        return Classification::skip();
    }

    if canonical.pointers.is_empty() && canonical.reference == Reference::None {
        return match canonical.category {
            TypeCategory::Builtin(builtin) => {
                let classification = Classification::heuristic(scalar_kind(builtin));
                if ty.is_typedef() || needs_return_cast(builtin) {
                    classification.with_modifier(static_cast(&ty.spelling()))
                } else {
                    classification
                }
            }
            TypeCategory::Enum => {
                Classification::heuristic(DataKind::Int).with_modifier(static_cast(&ty.spelling()))
            }
            TypeCategory::Record => {
                let target = ty.clone().with_const().pointer();
                let mut classification = Classification::heuristic(DataKind::ConstPointer)
                    .with_modifier(ExprModifier::new(
                        format!("* static_cast<{}>( ", target.spelling()),
                        " )",
                    ));
                classification.by_address = true;
                classification
            }
            _ => Classification::skip(),
        };
    }

    let Some(pointee) = canonical.pointee() else {
        return Classification::skip();
    };
    let by_reference = canonical.reference == Reference::LValue;

    if !by_reference
        && pointee.is_plain()
        && pointee.is_const
        && pointee.category == TypeCategory::Builtin(Builtin::Char)
    {
        let classification = Classification::heuristic(DataKind::String);
        return if ty.is_typedef() {
            classification.with_modifier(static_cast(&ty.spelling()))
        } else {
            classification
        };
    }

    let kind = if pointee.is_outer_const() {
        DataKind::ConstPointer
    } else {
        DataKind::Pointer
    };
    let mut classification = Classification::heuristic(kind);

    if by_reference {
        let mut target = ty.clone();
        target.reference = Reference::None;
        let target = if ty.reference != Reference::None && target.is_typedef() && target.is_plain() {
            target
        } else {
            canonical.pointee().unwrap_or(target)
        };
        classification.modifier = ExprModifier::new(
            format!("* static_cast<{}>( ", target.pointer().spelling()),
            " )",
        );
        classification.by_address = true;
    } else if ty.is_typedef()
        || !pointee.pointers.is_empty()
        || pointee.category != TypeCategory::Void
    {
        classification.modifier = static_cast(&ty.spelling());
    }
    classification
}
