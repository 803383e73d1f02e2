use std::fmt;

use serde::{Deserialize, Serialize};

/// A fundamental C/C++ arithmetic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Builtin {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `signed char`
    SChar,
    /// `unsigned char`
    UChar,
    /// `short`
    Short,
    /// `unsigned short`
    UShort,
    /// `int`
    Int,
    /// `unsigned int`
    UInt,
    /// `long`
    Long,
    /// `unsigned long`
    ULong,
    /// `long long`
    LongLong,
    /// `unsigned long long`
    ULongLong,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `long double`
    LongDouble,
    /// `wchar_t`
    WChar,
    /// `char16_t`
    Char16,
    /// `char32_t`
    Char32,
}

impl Builtin {
    /// The C spelling of the type.
    pub fn c_name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Char => "char",
            Builtin::SChar => "signed char",
            Builtin::UChar => "unsigned char",
            Builtin::Short => "short",
            Builtin::UShort => "unsigned short",
            Builtin::Int => "int",
            Builtin::UInt => "unsigned int",
            Builtin::Long => "long",
            Builtin::ULong => "unsigned long",
            Builtin::LongLong => "long long",
            Builtin::ULongLong => "unsigned long long",
            Builtin::Float => "float",
            Builtin::Double => "double",
            Builtin::LongDouble => "long double",
            Builtin::WChar => "wchar_t",
            Builtin::Char16 => "char16_t",
            Builtin::Char32 => "char32_t",
        }
    }
}

/// What kind of entity the base name of a type refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    /// `void`
    Void,
    /// A fundamental arithmetic type.
    Builtin(Builtin),
    /// An enumeration.
    Enum,
    /// A complete class, struct or union.
    Record,
    /// A typedef or alias; the aliased type is in [`TypeDescriptor::underlying`].
    Typedef,
    /// A class template specialization such as `std::vector<int>`.
    Template,
    /// A function type, reached through a function pointer.
    FunctionPointer,
    /// A forward-declared type whose definition is not visible.
    Incomplete,
}

/// One `*` in a declarator, with the qualifiers written after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerLevel {
    /// `* const`
    #[serde(default)]
    pub is_const: bool,
    /// `* volatile`
    #[serde(default)]
    pub is_volatile: bool,
}

/// Reference qualifier of a declarator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// Not a reference.
    #[default]
    None,
    /// `T &`
    LValue,
    /// `T &&`
    RValue,
}

/// A normalized view of a C/C++ type, independent of any parser.
///
/// The shape reads left to right as it is written in source: the base name
/// with its qualifiers, then pointer levels from the innermost outwards, then
/// an optional reference, then array extents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Base spelling, e.g. `int`, `struct Point`, `ns::Class1`, `uint8_t`.
    pub name: String,
    /// What the base name refers to.
    pub category: TypeCategory,
    /// `const` on the base type.
    #[serde(default)]
    pub is_const: bool,
    /// `volatile` on the base type.
    #[serde(default)]
    pub is_volatile: bool,
    /// Pointer levels, innermost first.
    #[serde(default)]
    pub pointers: Vec<PointerLevel>,
    /// Reference qualifier.
    #[serde(default)]
    pub reference: Reference,
    /// Array extents, outermost first; `None` for `[]`.
    #[serde(default)]
    pub array: Vec<Option<u64>>,
    /// The aliased type when `category` is [`TypeCategory::Typedef`].
    #[serde(default)]
    pub underlying: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// A type with the given base name and category and no declarator parts.
    pub fn named(name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            is_const: false,
            is_volatile: false,
            pointers: Vec::new(),
            reference: Reference::None,
            array: Vec::new(),
            underlying: None,
        }
    }

    /// `void`
    pub fn void() -> Self {
        Self::named("void", TypeCategory::Void)
    }

    /// A fundamental type spelled the standard way.
    pub fn builtin(builtin: Builtin) -> Self {
        Self::named(builtin.c_name(), TypeCategory::Builtin(builtin))
    }

    /// A complete class, struct or union.
    pub fn record(name: impl Into<String>) -> Self {
        Self::named(name, TypeCategory::Record)
    }

    /// An enumeration.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::named(name, TypeCategory::Enum)
    }

    /// A typedef named `name` aliasing `underlying`.
    pub fn typedef(name: impl Into<String>, underlying: TypeDescriptor) -> Self {
        let mut ty = Self::named(name, TypeCategory::Typedef);
        ty.underlying = Some(Box::new(underlying));
        ty
    }

    /// Adds `const` to the outermost level.
    pub fn with_const(mut self) -> Self {
        match self.pointers.last_mut() {
            Some(level) => level.is_const = true,
            None => self.is_const = true,
        }
        self
    }

    /// Adds one pointer level.
    pub fn pointer(mut self) -> Self {
        self.pointers.push(PointerLevel::default());
        self
    }

    /// Makes this an lvalue reference.
    pub fn lvalue_ref(mut self) -> Self {
        self.reference = Reference::LValue;
        self
    }

    /// Makes this an rvalue reference.
    pub fn rvalue_ref(mut self) -> Self {
        self.reference = Reference::RValue;
        self
    }

    /// Appends an array dimension.
    pub fn array_of(mut self, extent: Option<u64>) -> Self {
        self.array.push(extent);
        self
    }

    /// Whether the type is `void` with no declarator parts.
    pub fn is_void(&self) -> bool {
        self.category == TypeCategory::Void && self.is_plain()
    }

    /// Whether the declared type is spelled through a typedef name.
    pub fn is_typedef(&self) -> bool {
        self.category == TypeCategory::Typedef
    }

    /// No pointers, no reference and no array extents.
    pub fn is_plain(&self) -> bool {
        self.pointers.is_empty() && self.reference == Reference::None && self.array.is_empty()
    }

    /// Whether the outermost level is `const`-qualified.
    pub fn is_outer_const(&self) -> bool {
        match self.pointers.last() {
            Some(level) => level.is_const,
            None => self.is_const,
        }
    }

    /// The base name without an elaborated `struct`/`class`/`union`/`enum` tag.
    pub fn bare_name(&self) -> &str {
        ["struct ", "class ", "union ", "enum "]
            .iter()
            .find_map(|tag| self.name.strip_prefix(tag))
            .unwrap_or(&self.name)
            .trim()
    }

    /// The same type without any typedef sugar.
    ///
    /// Qualifiers written on a typedef name bind to the outermost level of the
    /// aliased type, so `const IntPtr` with `typedef int *IntPtr` becomes
    /// `int *const`.
    ///
    /// A pointer to an array typedef has no shape in this model and is
    /// returned unresolved.
    pub fn canonical(&self) -> TypeDescriptor {
        let Some(underlying) = self.underlying.as_deref() else {
            return self.clone();
        };
        if self.category != TypeCategory::Typedef {
            return self.clone();
        }

        let mut resolved = underlying.canonical();
        if !resolved.array.is_empty() && !self.pointers.is_empty() {
            return self.clone();
        }
        match resolved.pointers.last_mut() {
            Some(level) => {
                level.is_const |= self.is_const;
                level.is_volatile |= self.is_volatile;
            }
            None => {
                resolved.is_const |= self.is_const;
                resolved.is_volatile |= self.is_volatile;
            }
        }
        resolved.pointers.extend(self.pointers.iter().copied());
        if self.reference != Reference::None {
            resolved.reference = self.reference;
        }
        if !self.array.is_empty() {
            let mut extents = self.array.clone();
            extents.append(&mut resolved.array);
            resolved.array = extents;
        }
        resolved
    }

    /// The type one indirection away: the referent of a reference, the
    /// pointee of a pointer or the element of an array.
    pub fn pointee(&self) -> Option<TypeDescriptor> {
        let mut inner = self.clone();
        if inner.reference != Reference::None {
            inner.reference = Reference::None;
        } else if !inner.array.is_empty() {
            inner.array.remove(0);
        } else if inner.pointers.pop().is_none() {
            return None;
        }
        Some(inner)
    }

    /// The element type of an array, with the reference dropped.
    pub fn element(&self) -> TypeDescriptor {
        let mut element = self.clone();
        element.array.clear();
        element.reference = Reference::None;
        element
    }

    /// The same type with the outermost `const` dropped.
    pub fn without_outer_const(&self) -> TypeDescriptor {
        let mut ty = self.clone();
        match ty.pointers.last_mut() {
            Some(level) => level.is_const = false,
            None => ty.is_const = false,
        }
        ty
    }

    /// Whether `sizeof` can be applied to the type.
    pub fn is_sized(&self) -> bool {
        if !self.pointers.is_empty() {
            return true;
        }
        match &self.category {
            TypeCategory::Void | TypeCategory::Incomplete | TypeCategory::FunctionPointer => false,
            TypeCategory::Typedef => self
                .underlying
                .as_deref()
                .is_some_and(TypeDescriptor::is_sized),
            _ => true,
        }
    }

    /// The type spelled the way clang prints it, e.g. `const char *`.
    pub fn spelling(&self) -> String {
        self.declare("")
    }

    /// A declaration of `name` with this type, e.g. `const int (&arr)[4]`.
    ///
    /// For a function pointer the declarator goes inside the parentheses of
    /// its spelling: `void (*const cb)(int)`.
    pub fn declare(&self, name: &str) -> String {
        if let Some(declared) = self.declare_function_pointer(name) {
            return declared;
        }

        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        if self.is_volatile {
            out.push_str("volatile ");
        }
        out.push_str(&self.name);

        let mut qualified_previous = true;
        for level in &self.pointers {
            if qualified_previous {
                out.push(' ');
            }
            out.push('*');
            if level.is_const {
                out.push_str("const");
            }
            if level.is_volatile {
                if level.is_const {
                    out.push(' ');
                }
                out.push_str("volatile");
            }
            qualified_previous = level.is_const || level.is_volatile;
        }

        let reference = match self.reference {
            Reference::None => "",
            Reference::LValue => "&",
            Reference::RValue => "&&",
        };
        let extents: String = self
            .array
            .iter()
            .map(|extent| match extent {
                Some(n) => format!("[{n}]"),
                None => "[]".to_string(),
            })
            .collect();

        if extents.is_empty() {
            if !reference.is_empty() {
                out.push(' ');
                out.push_str(reference);
            }
            if !name.is_empty() {
                out.push(' ');
                out.push_str(name);
            }
        } else if !reference.is_empty() {
            out.push_str(&format!(" ({reference}{name}){extents}"));
        } else {
            out.push(' ');
            out.push_str(name);
            out.push_str(&extents);
        }
        out
    }

    /// Splices qualifiers, extra pointer levels, reference, `name` and array
    /// extents after the `(*` of a function pointer spelling.
    fn declare_function_pointer(&self, name: &str) -> Option<String> {
        if self.category != TypeCategory::FunctionPointer {
            return None;
        }
        let open = self.name.find("(*")? + 2;
        let close = open + self.name[open..].find(')')?;

        let mut declarator = self.name[open..close].trim().to_string();
        for (set, qualifier) in [(self.is_const, "const"), (self.is_volatile, "volatile")] {
            if set {
                if declarator.ends_with(|c: char| c.is_ascii_alphanumeric()) {
                    declarator.push(' ');
                }
                declarator.push_str(qualifier);
            }
        }
        for level in &self.pointers {
            if !declarator.is_empty() && !declarator.ends_with('*') {
                declarator.push(' ');
            }
            declarator.push('*');
            if level.is_const {
                declarator.push_str("const");
            }
            if level.is_volatile {
                if level.is_const {
                    declarator.push(' ');
                }
                declarator.push_str("volatile");
            }
        }
        declarator.push_str(match self.reference {
            Reference::None => "",
            Reference::LValue => "&",
            Reference::RValue => "&&",
        });
        if !name.is_empty() {
            if declarator.ends_with(|c: char| c.is_ascii_alphanumeric()) {
                declarator.push(' ');
            }
            declarator.push_str(name);
        }
        for extent in &self.array {
            match extent {
                Some(n) => declarator.push_str(&format!("[{n}]")),
                None => declarator.push_str("[]"),
            }
        }

        Some(format!(
            "{}{}{}",
            &self.name[..open],
            declarator,
            &self.name[close..]
        ))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spelling())
    }
}

/// Collapse whitespace in a type spelling so `const int*` and `const int *`
/// compare equal.
///
/// A single space survives only between two identifier characters.
pub(crate) fn normalize_spelling(spelling: &str) -> String {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';

    let mut out = String::with_capacity(spelling.len());
    let mut pending_space = false;
    for c in spelling.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && out.chars().last().is_some_and(is_ident) && is_ident(c) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}
