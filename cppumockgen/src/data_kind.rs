use std::fmt;

/// How a value travels through the CppUTest mock API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// `withBoolParameter` / `returnBoolValue`.
    Bool,
    /// `withIntParameter` / `returnIntValue`.
    Int,
    /// `withUnsignedIntParameter` / `returnUnsignedIntValue`.
    UnsignedInt,
    /// `withLongIntParameter` / `returnLongIntValue`.
    LongInt,
    /// `withUnsignedLongIntParameter` / `returnUnsignedLongIntValue`.
    UnsignedLongInt,
    /// `withDoubleParameter` / `returnDoubleValue`.
    Double,
    /// `withStringParameter` / `returnStringValue`.
    String,
    /// `withPointerParameter` / `returnPointerValue`.
    Pointer,
    /// `withConstPointerParameter` / `returnConstPointerValue`.
    ConstPointer,
    /// `withOutputParameter`, filled by the expectation.
    Output,
    /// `withMemoryBufferParameter`, compared byte by byte.
    MemoryBuffer,
    /// `withParameterOfType` using the named comparator.
    Object(String),
    /// Not passed to the mock at all.
    Skip,
}

impl DataKind {
    /// Parses the kind token of an override rule, with its parenthesized argument if any.
    pub(crate) fn from_token(name: &str, argument: Option<&str>) -> Option<Self> {
        let kind = match (name, argument) {
            ("Bool", None) => DataKind::Bool,
            ("Int", None) => DataKind::Int,
            ("UnsignedInt", None) => DataKind::UnsignedInt,
            ("LongInt", None) => DataKind::LongInt,
            ("UnsignedLongInt", None) => DataKind::UnsignedLongInt,
            ("Double", None) => DataKind::Double,
            ("String", None) => DataKind::String,
            ("Pointer", None) => DataKind::Pointer,
            ("ConstPointer", None) => DataKind::ConstPointer,
            ("Output", None) => DataKind::Output,
            ("Skip", None) => DataKind::Skip,
            ("MemoryBuffer", Some(_)) => DataKind::MemoryBuffer,
            ("Object", Some(tag)) => DataKind::Object(tag.to_string()),
            _ => return None,
        };
        Some(kind)
    }

    /// Whether a return value can be expressed with this kind.
    pub fn is_return_kind(&self) -> bool {
        matches!(
            self,
            DataKind::Bool
                | DataKind::Int
                | DataKind::UnsignedInt
                | DataKind::LongInt
                | DataKind::UnsignedLongInt
                | DataKind::Double
                | DataKind::String
                | DataKind::Pointer
                | DataKind::ConstPointer
        )
    }

    /// The `MockActualCall` / `MockExpectedCall` method registering a parameter.
    pub(crate) fn parameter_call(&self) -> &'static str {
        match self {
            DataKind::Bool => "withBoolParameter",
            DataKind::Int => "withIntParameter",
            DataKind::UnsignedInt => "withUnsignedIntParameter",
            DataKind::LongInt => "withLongIntParameter",
            DataKind::UnsignedLongInt => "withUnsignedLongIntParameter",
            DataKind::Double => "withDoubleParameter",
            DataKind::String => "withStringParameter",
            DataKind::Pointer => "withPointerParameter",
            DataKind::ConstPointer => "withConstPointerParameter",
            DataKind::Output => "withOutputParameter",
            DataKind::MemoryBuffer => "withMemoryBufferParameter",
            DataKind::Object(_) => "withParameterOfType",
            DataKind::Skip => "",
        }
    }

    /// The `MockActualCall` method retrieving a return value.
    pub(crate) fn return_call(&self) -> Option<&'static str> {
        let call = match self {
            DataKind::Bool => "returnBoolValue",
            DataKind::Int => "returnIntValue",
            DataKind::UnsignedInt => "returnUnsignedIntValue",
            DataKind::LongInt => "returnLongIntValue",
            DataKind::UnsignedLongInt => "returnUnsignedLongIntValue",
            DataKind::Double => "returnDoubleValue",
            DataKind::String => "returnStringValue",
            DataKind::Pointer => "returnPointerValue",
            DataKind::ConstPointer => "returnConstPointerValue",
            _ => return None,
        };
        Some(call)
    }

    /// The C++ type `andReturnValue` is called with.
    pub(crate) fn return_value_type(&self) -> Option<&'static str> {
        let ty = match self {
            DataKind::Bool => "bool",
            DataKind::Int => "int",
            DataKind::UnsignedInt => "unsigned int",
            DataKind::LongInt => "long",
            DataKind::UnsignedLongInt => "unsigned long",
            DataKind::Double => "double",
            DataKind::String => "const char *",
            DataKind::Pointer => "void *",
            DataKind::ConstPointer => "const void *",
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            DataKind::Bool => "Bool",
            DataKind::Int => "Int",
            DataKind::UnsignedInt => "UnsignedInt",
            DataKind::LongInt => "LongInt",
            DataKind::UnsignedLongInt => "UnsignedLongInt",
            DataKind::Double => "Double",
            DataKind::String => "String",
            DataKind::Pointer => "Pointer",
            DataKind::ConstPointer => "ConstPointer",
            DataKind::Output => "Output",
            DataKind::MemoryBuffer => "MemoryBuffer",
            DataKind::Object(tag) => return write!(f, "Object({tag})"),
            DataKind::Skip => "Skip",
        };
        f.write_str(token)
    }
}
