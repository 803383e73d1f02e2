//! Override rules supplied on the command line.
//!
//! Rule text is `<key>=<kind>[/<modifier>]`. Parameter rules are keyed by
//! `<function>#<param>`, `#<param>` or `<function>@` (the return value).
//! Type rules are keyed by `#<type>` for parameters and `@<type>` for return
//! values. A modifier is an expression with one `$` standing for the value.

use std::fmt;

use thiserror::Error;

use crate::ast::normalize_spelling;
use crate::{DataKind, TypeDescriptor};

/// A malformed override option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} <{option}>")]
pub struct ConfigError {
    /// The option text as given.
    pub option: String,
    /// What is wrong with it.
    pub kind: ConfigErrorKind,
}

/// Reasons an override option is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigErrorKind {
    /// No `=` between key and value.
    #[error("Invalid override option")]
    MissingSeparator,
    /// Nothing before `=`.
    #[error("Override option key cannot be empty")]
    EmptyKey,
    /// Key is neither `<function>#<param>` nor `<function>@`.
    #[error("Invalid override option key")]
    InvalidKey,
    /// `#` with nothing after it.
    #[error("Override option parameter name cannot be empty")]
    EmptyParameterName,
    /// Type key not starting with `#` or `@`.
    #[error("Override option type key must start with '#' or '@'")]
    MissingRole,
    /// Nothing after `=`.
    #[error("Override option specification cannot be empty")]
    EmptyValue,
    /// Nothing before `/`.
    #[error("Override option type cannot be empty")]
    EmptyKind,
    /// Unknown kind token.
    #[error("Invalid parameter override option type")]
    InvalidParameterKind,
    /// Kind that cannot describe a return value.
    #[error("Invalid return override option type")]
    InvalidReturnKind,
    /// `MemoryBuffer` or `Object` without an argument.
    #[error("Override option type argument cannot be empty")]
    EmptyKindArgument,
    /// Nothing after `/`.
    #[error("Override option argument expression cannot be empty if specified")]
    EmptyModifier,
    /// Modifier without `$`.
    #[error("Override option argument expression does not contain parameter name placeholder ($)")]
    MissingPlaceholder,
    /// Modifier with more than one `$`.
    #[error("Override option argument expression contains more than one parameter name placeholder ($)")]
    MultiplePlaceholders,
    /// Same key given twice.
    #[error("Override option key can only be passed once")]
    Duplicate,
}

/// Whether a rule targets parameters or return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A parameter.
    Parameter,
    /// A return value.
    Return,
}

impl Role {
    fn sigil(self) -> char {
        match self {
            Role::Parameter => '#',
            Role::Return => '@',
        }
    }
}

/// What an override rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `<function>#<param>`
    FunctionAndParameter {
        /// Qualified function name.
        function: String,
        /// Parameter name.
        parameter: String,
    },
    /// `<function>@`
    FunctionReturn {
        /// Qualified function name.
        function: String,
    },
    /// `#<param>`, any function.
    ParameterNameOnly {
        /// Parameter name.
        parameter: String,
    },
    /// `#<type>` / `@<type>` with qualifier tokens; matched on the normalized spelling.
    QualifiedTypeName {
        /// Parameter or return.
        role: Role,
        /// Normalized spelling.
        spelling: String,
    },
    /// `#<type>` / `@<type>` without qualifier tokens; matched on the base name.
    TypeNameOnly {
        /// Parameter or return.
        role: Role,
        /// Normalized base name.
        name: String,
    },
}

impl Selector {
    fn role(&self) -> Role {
        match self {
            Selector::FunctionReturn { .. } => Role::Return,
            Selector::FunctionAndParameter { .. } | Selector::ParameterNameOnly { .. } => {
                Role::Parameter
            }
            Selector::QualifiedTypeName { role, .. } | Selector::TypeNameOnly { role, .. } => *role,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::FunctionAndParameter {
                function,
                parameter,
            } => write!(f, "{function}#{parameter}"),
            Selector::FunctionReturn { function } => write!(f, "{function}@"),
            Selector::ParameterNameOnly { parameter } => write!(f, "#{parameter}"),
            Selector::QualifiedTypeName { role, spelling } => {
                write!(f, "{}{spelling}", role.sigil())
            }
            Selector::TypeNameOnly { role, name } => write!(f, "{}{name}", role.sigil()),
        }
    }
}

/// An expression wrapped around a value, split at the `$` placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExprModifier {
    front: String,
    back: String,
}

impl ExprModifier {
    /// A modifier with the given text before and after the value.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Parses `&$`, `*$`, `static_cast<int>($)` and the like.
    pub fn parse(text: &str) -> Result<Self, ConfigErrorKind> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigErrorKind::EmptyModifier);
        }
        let (front, back) = text
            .split_once('$')
            .ok_or(ConfigErrorKind::MissingPlaceholder)?;
        if back.contains('$') {
            return Err(ConfigErrorKind::MultiplePlaceholders);
        }
        Ok(Self::new(front.trim(), back.trim()))
    }

    /// Text before the value.
    pub fn front(&self) -> &str {
        &self.front
    }

    /// Text after the value.
    pub fn back(&self) -> &str {
        &self.back
    }

    /// Whether the value is used unchanged.
    pub fn is_identity(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// Wraps `expr`.
    pub fn apply(&self, expr: &str) -> String {
        format!("{}{expr}{}", self.front, self.back)
    }
}

impl fmt::Display for ExprModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}${}", self.front, self.back)
    }
}

/// One parsed override option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideRule {
    selector: Selector,
    kind: DataKind,
    buffer_size: Option<String>,
    modifier: Option<ExprModifier>,
}

impl OverrideRule {
    /// Parses a `-p` option: `<function>#<param>=...`, `#<param>=...` or `<function>@=...`.
    pub fn parse_parameter_rule(text: &str) -> Result<Self, ConfigError> {
        Self::parse_with(text, parse_parameter_key).map_err(|kind| ConfigError {
            option: text.to_string(),
            kind,
        })
    }

    /// Parses a `-t` option: `#<type>=...` or `@<type>=...`.
    pub fn parse_type_rule(text: &str) -> Result<Self, ConfigError> {
        Self::parse_with(text, parse_type_key).map_err(|kind| ConfigError {
            option: text.to_string(),
            kind,
        })
    }

    fn parse_with(
        text: &str,
        parse_key: fn(&str) -> Result<Selector, ConfigErrorKind>,
    ) -> Result<Self, ConfigErrorKind> {
        let (key, value) = text
            .split_once('=')
            .ok_or(ConfigErrorKind::MissingSeparator)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigErrorKind::EmptyKey);
        }
        let selector = parse_key(key)?;

        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigErrorKind::EmptyValue);
        }
        let role = selector.role();
        let (name, argument, modifier) = split_value(value)?;
        if name.is_empty() {
            return Err(ConfigErrorKind::EmptyKind);
        }
        if matches!(name, "MemoryBuffer" | "Object") && argument.is_none_or(str::is_empty) {
            return Err(ConfigErrorKind::EmptyKindArgument);
        }
        let invalid_kind = match role {
            Role::Parameter => ConfigErrorKind::InvalidParameterKind,
            Role::Return => ConfigErrorKind::InvalidReturnKind,
        };
        let kind = DataKind::from_token(name, argument).ok_or(invalid_kind)?;
        if role == Role::Return && !kind.is_return_kind() {
            return Err(ConfigErrorKind::InvalidReturnKind);
        }
        let buffer_size = match kind {
            DataKind::MemoryBuffer => argument.map(str::to_string),
            _ => None,
        };
        let modifier = modifier.map(ExprModifier::parse).transpose()?;

        Ok(Self {
            selector,
            kind,
            buffer_size,
            modifier,
        })
    }

    /// What the rule matches.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The kind forced by the rule.
    pub fn kind(&self) -> &DataKind {
        &self.kind
    }

    /// The byte-length expression of a `MemoryBuffer(...)` rule. A `$` in it
    /// stands for the parameter.
    pub fn buffer_size(&self) -> Option<&str> {
        self.buffer_size.as_deref()
    }

    /// The value expression, if one was given.
    pub fn modifier(&self) -> Option<&ExprModifier> {
        self.modifier.as_ref()
    }
}

impl fmt::Display for OverrideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.selector)?;
        match (&self.kind, &self.buffer_size) {
            (DataKind::MemoryBuffer, Some(size)) => write!(f, "MemoryBuffer({size})")?,
            (kind, _) => write!(f, "{kind}")?,
        }
        if let Some(modifier) = &self.modifier {
            write!(f, "/{modifier}")?;
        }
        Ok(())
    }
}

fn parse_parameter_key(key: &str) -> Result<Selector, ConfigErrorKind> {
    if let Some(function) = key.strip_suffix('@') {
        let function = function.trim();
        if function.is_empty() || function.contains('#') {
            return Err(ConfigErrorKind::InvalidKey);
        }
        return Ok(Selector::FunctionReturn {
            function: function.to_string(),
        });
    }

    let (function, parameter) = key.split_once('#').ok_or(ConfigErrorKind::InvalidKey)?;
    let (function, parameter) = (function.trim(), parameter.trim());
    if parameter.is_empty() {
        return Err(ConfigErrorKind::EmptyParameterName);
    }
    if function.is_empty() {
        Ok(Selector::ParameterNameOnly {
            parameter: parameter.to_string(),
        })
    } else {
        Ok(Selector::FunctionAndParameter {
            function: function.to_string(),
            parameter: parameter.to_string(),
        })
    }
}

fn parse_type_key(key: &str) -> Result<Selector, ConfigErrorKind> {
    let (role, ty) = if let Some(ty) = key.strip_prefix('#') {
        (Role::Parameter, ty)
    } else if let Some(ty) = key.strip_prefix('@') {
        (Role::Return, ty)
    } else {
        return Err(ConfigErrorKind::MissingRole);
    };

    let spelling = normalize_spelling(ty);
    if spelling.is_empty() {
        return Err(ConfigErrorKind::EmptyKey);
    }
    if has_qualifier_tokens(&spelling) {
        Ok(Selector::QualifiedTypeName { role, spelling })
    } else {
        Ok(Selector::TypeNameOnly {
            role,
            name: spelling,
        })
    }
}

fn has_qualifier_tokens(spelling: &str) -> bool {
    spelling.contains(['*', '&', '['])
        || spelling
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| word == "const" || word == "volatile")
}

/// Splits `Kind(arg)/modifier` into its three parts.
fn split_value(value: &str) -> Result<(&str, Option<&str>, Option<&str>), ConfigErrorKind> {
    let name_end = value
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(value.len());
    let (name, rest) = value.split_at(name_end);
    let mut rest = rest.trim_start();

    let mut argument = None;
    if rest.starts_with('(') {
        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in rest.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or(ConfigErrorKind::EmptyKindArgument)?;
        argument = Some(rest[1..close].trim());
        rest = rest[close + 1..].trim_start();
    }

    if rest.is_empty() {
        return Ok((name, argument, None));
    }
    match rest.strip_prefix('/') {
        Some(modifier) => Ok((name, argument, Some(modifier))),
        None if name.is_empty() => Err(ConfigErrorKind::EmptyKind),
        None => Err(ConfigErrorKind::InvalidParameterKind),
    }
}

/// The override rules and options of one session.
#[derive(Debug, Clone, Default)]
pub struct Config {
    use_underlying_typedef_type: bool,
    param_overrides: Vec<OverrideRule>,
    type_overrides: Vec<OverrideRule>,
}

impl Config {
    /// An empty configuration.
    pub fn new(use_underlying_typedef_type: bool) -> Self {
        Self {
            use_underlying_typedef_type,
            ..Self::default()
        }
    }

    /// Builds a configuration from raw `-p` and `-t` option texts.
    pub fn from_options<P, T>(
        use_underlying_typedef_type: bool,
        param_overrides: &[P],
        type_overrides: &[T],
    ) -> Result<Self, ConfigError>
    where
        P: AsRef<str>,
        T: AsRef<str>,
    {
        let mut config = Self::new(use_underlying_typedef_type);
        for option in param_overrides {
            config.add_param_override(option.as_ref())?;
        }
        for option in type_overrides {
            config.add_type_override(option.as_ref())?;
        }
        Ok(config)
    }

    /// Adds a parameter or function-return rule.
    pub fn add_param_override(&mut self, text: &str) -> Result<&mut Self, ConfigError> {
        let rule = OverrideRule::parse_parameter_rule(text)?;
        Self::push_unique(&mut self.param_overrides, rule, text)?;
        Ok(self)
    }

    /// Adds a type rule.
    pub fn add_type_override(&mut self, text: &str) -> Result<&mut Self, ConfigError> {
        let rule = OverrideRule::parse_type_rule(text)?;
        Self::push_unique(&mut self.type_overrides, rule, text)?;
        Ok(self)
    }

    fn push_unique(
        rules: &mut Vec<OverrideRule>,
        rule: OverrideRule,
        text: &str,
    ) -> Result<(), ConfigError> {
        if rules.iter().any(|r| r.selector == rule.selector) {
            return Err(ConfigError {
                option: text.to_string(),
                kind: ConfigErrorKind::Duplicate,
            });
        }
        rules.push(rule);
        Ok(())
    }

    /// Whether typedefs are looked up through their underlying type.
    pub fn use_underlying_typedef_type(&self) -> bool {
        self.use_underlying_typedef_type
    }

    /// Parameter rules in the order they were given.
    pub fn param_overrides(&self) -> &[OverrideRule] {
        &self.param_overrides
    }

    /// Type rules in the order they were given.
    pub fn type_overrides(&self) -> &[OverrideRule] {
        &self.type_overrides
    }

    /// The rule for parameter `parameter` of `function`, preferring the
    /// function-specific key.
    pub fn resolve_parameter_override(
        &self,
        function: &str,
        parameter: &str,
    ) -> Option<&OverrideRule> {
        let specific = self.param_overrides.iter().find(|rule| {
            matches!(&rule.selector, Selector::FunctionAndParameter { function: f, parameter: p }
                if f == function && p == parameter)
        });
        specific.or_else(|| {
            self.param_overrides.iter().find(|rule| {
                matches!(&rule.selector, Selector::ParameterNameOnly { parameter: p } if p == parameter)
            })
        })
    }

    /// The rule for the return value of `function`.
    pub fn resolve_return_override(&self, function: &str) -> Option<&OverrideRule> {
        self.param_overrides.iter().find(|rule| {
            matches!(&rule.selector, Selector::FunctionReturn { function: f } if f == function)
        })
    }

    /// The type rule for `ty` in `role`, preferring the qualified spelling.
    pub fn resolve_type_override(&self, ty: &TypeDescriptor, role: Role) -> Option<&OverrideRule> {
        let spelling = normalize_spelling(&ty.spelling());
        let qualified = self.type_overrides.iter().find(|rule| {
            matches!(&rule.selector, Selector::QualifiedTypeName { role: r, spelling: s }
                if *r == role && *s == spelling)
        });
        qualified.or_else(|| {
            let name = normalize_spelling(&ty.name);
            let bare = normalize_spelling(ty.bare_name());
            self.type_overrides.iter().find(|rule| {
                matches!(&rule.selector, Selector::TypeNameOnly { role: r, name: n }
                    if *r == role && (*n == name || *n == bare))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Builtin;

    fn param_error(text: &str) -> ConfigErrorKind {
        OverrideRule::parse_parameter_rule(text).unwrap_err().kind
    }

    fn type_error(text: &str) -> ConfigErrorKind {
        OverrideRule::parse_type_rule(text).unwrap_err().kind
    }

    #[test]
    fn parameter_keys() {
        let rule = OverrideRule::parse_parameter_rule("function1#p=Int").unwrap();
        assert_eq!(
            rule.selector(),
            &Selector::FunctionAndParameter {
                function: "function1".into(),
                parameter: "p".into()
            }
        );
        assert_eq!(rule.kind(), &DataKind::Int);
        assert_eq!(rule.modifier(), None);

        let rule = OverrideRule::parse_parameter_rule(" #p = ConstPointer / & $ ").unwrap();
        assert_eq!(
            rule.selector(),
            &Selector::ParameterNameOnly {
                parameter: "p".into()
            }
        );
        assert_eq!(rule.modifier(), Some(&ExprModifier::new("&", "")));

        let rule = OverrideRule::parse_parameter_rule("ns::f@=LongInt/static_cast<long>($)").unwrap();
        assert_eq!(
            rule.selector(),
            &Selector::FunctionReturn {
                function: "ns::f".into()
            }
        );
        assert_eq!(
            rule.modifier(),
            Some(&ExprModifier::new("static_cast<long>(", ")"))
        );
    }

    #[test]
    fn kinds_with_arguments() {
        let rule = OverrideRule::parse_parameter_rule("f#buf=MemoryBuffer(len * 2)").unwrap();
        assert_eq!(rule.kind(), &DataKind::MemoryBuffer);
        assert_eq!(rule.buffer_size(), Some("len * 2"));

        let rule = OverrideRule::parse_parameter_rule("f#buf=MemoryBuffer(sizeof(T))/*$").unwrap();
        assert_eq!(rule.buffer_size(), Some("sizeof(T)"));
        assert_eq!(rule.modifier(), Some(&ExprModifier::new("*", "")));

        let rule = OverrideRule::parse_parameter_rule("#c=Object(Class1)").unwrap();
        assert_eq!(rule.kind(), &DataKind::Object("Class1".into()));
    }

    #[test]
    fn type_keys() {
        let rule = OverrideRule::parse_type_rule("#const char *=ConstPointer").unwrap();
        assert_eq!(
            rule.selector(),
            &Selector::QualifiedTypeName {
                role: Role::Parameter,
                spelling: "const char*".into()
            }
        );

        let rule = OverrideRule::parse_type_rule("@ Type1 =Int").unwrap();
        assert_eq!(
            rule.selector(),
            &Selector::TypeNameOnly {
                role: Role::Return,
                name: "Type1".into()
            }
        );
    }

    #[test]
    fn malformed_rules_are_rejected() {
        assert_eq!(param_error("function1#p"), ConfigErrorKind::MissingSeparator);
        assert_eq!(param_error("=Int"), ConfigErrorKind::EmptyKey);
        assert_eq!(param_error("function1"), ConfigErrorKind::MissingSeparator);
        assert_eq!(param_error("function1=Int"), ConfigErrorKind::InvalidKey);
        assert_eq!(param_error("function1#=Int"), ConfigErrorKind::EmptyParameterName);
        assert_eq!(param_error("function1#p="), ConfigErrorKind::EmptyValue);
        assert_eq!(param_error("function1#p=/&$"), ConfigErrorKind::EmptyKind);
        assert_eq!(param_error("function1#p=Foo"), ConfigErrorKind::InvalidParameterKind);
        assert_eq!(param_error("function1#p=Int/"), ConfigErrorKind::EmptyModifier);
        assert_eq!(param_error("function1#p=Int/&p"), ConfigErrorKind::MissingPlaceholder);
        assert_eq!(param_error("function1#p=Int/$+$"), ConfigErrorKind::MultiplePlaceholders);
        assert_eq!(type_error("@int=Int/($ * $)"), ConfigErrorKind::MultiplePlaceholders);
        assert_eq!(param_error("function1#p=MemoryBuffer"), ConfigErrorKind::EmptyKindArgument);
        assert_eq!(param_error("function1#p=Object()"), ConfigErrorKind::EmptyKindArgument);
        assert_eq!(param_error("function1@=Output"), ConfigErrorKind::InvalidReturnKind);
        assert_eq!(param_error("function1@=Skip"), ConfigErrorKind::InvalidReturnKind);
        assert_eq!(param_error("function1@=Object(Class1)"), ConfigErrorKind::InvalidReturnKind);
        assert_eq!(type_error("int=Int"), ConfigErrorKind::MissingRole);
        assert_eq!(type_error("#=Int"), ConfigErrorKind::EmptyKey);
        assert_eq!(type_error("@int=Output"), ConfigErrorKind::InvalidReturnKind);
    }

    #[test]
    fn error_carries_option_text() {
        let err = OverrideRule::parse_parameter_rule("f#p=Bogus").unwrap_err();
        assert_eq!(err.option, "f#p=Bogus");
        assert_eq!(
            err.to_string(),
            "Invalid parameter override option type <f#p=Bogus>"
        );
    }

    #[test]
    fn canonical_text_parses_back_to_the_same_rule() {
        let rules = [
            "  f # p =  Output / & $ ",
            "f@=ConstPointer/*static_cast<const T *>($)",
            "#buf=MemoryBuffer( n )",
            "g#c=Object(Class1)/&$",
        ];
        for text in rules {
            let rule = OverrideRule::parse_parameter_rule(text).unwrap();
            let again = OverrideRule::parse_parameter_rule(&rule.to_string()).unwrap();
            assert_eq!(rule, again, "{text}");
        }

        let rule = OverrideRule::parse_type_rule("# const  int * =ConstPointer").unwrap();
        assert_eq!(rule.to_string(), "#const int*=ConstPointer");
        assert_eq!(OverrideRule::parse_type_rule(&rule.to_string()).unwrap(), rule);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut config = Config::default();
        config.add_param_override("f#p=Int").unwrap();
        let err = config.add_param_override(" f#p = Bool").unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::Duplicate);

        config.add_type_override("#const int*=ConstPointer").unwrap();
        let err = config.add_type_override("#const int *=Pointer").unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::Duplicate);
    }

    #[test]
    fn specific_parameter_rule_wins() {
        let config =
            Config::from_options(false, &["#p=Int", "f#p=Bool"], &[] as &[&str]).unwrap();

        let rule = config.resolve_parameter_override("f", "p").unwrap();
        assert_eq!(rule.kind(), &DataKind::Bool);
        let rule = config.resolve_parameter_override("g", "p").unwrap();
        assert_eq!(rule.kind(), &DataKind::Int);
        assert!(config.resolve_parameter_override("g", "q").is_none());
        assert!(config.resolve_return_override("f").is_none());
    }

    #[test]
    fn qualified_type_rule_wins() {
        let config = Config::from_options(
            false,
            &[] as &[&str],
            &["#Type1=Int", "#const Type1 *=ConstPointer", "@Type1=Double"],
        )
        .unwrap();
        let type1 = TypeDescriptor::typedef("Type1", TypeDescriptor::builtin(Builtin::Short));

        let rule = config.resolve_type_override(&type1, Role::Parameter).unwrap();
        assert_eq!(rule.kind(), &DataKind::Int);
        let rule = config.resolve_type_override(&type1, Role::Return).unwrap();
        assert_eq!(rule.kind(), &DataKind::Double);

        let pointer = type1.clone().with_const().pointer();
        let rule = config.resolve_type_override(&pointer, Role::Parameter).unwrap();
        assert_eq!(rule.kind(), &DataKind::ConstPointer);
    }

    #[test]
    fn type_name_rule_matches_tagged_names() {
        let config =
            Config::from_options(false, &[] as &[&str], &["#Point=Object(Point)"]).unwrap();
        let point = TypeDescriptor::record("struct Point");

        assert!(config.resolve_type_override(&point, Role::Parameter).is_some());
        assert!(config.resolve_type_override(&point, Role::Return).is_none());
    }
}
