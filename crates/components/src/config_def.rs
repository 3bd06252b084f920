//! Declarative description of a connector's configuration keys.
//!
//! Capabilities describe their settings as [`ConfigKey`]s in their native
//! (Kafka Connect `ConfigDef`) vocabulary. The registry turns them into
//! [`ConnectorProperty`](crate::property::ConnectorProperty) records and the
//! validation pipeline checks raw string values against them.

use crate::filters::compile_filter_pattern;
use crate::property::{DefaultValue, PropertyCategory, PropertyType};

/// Kafka Connect `ConfigDef.Type` of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeType {
    Boolean,
    Class,
    Double,
    Int,
    List,
    Long,
    Password,
    Short,
    String,
    /// Any type the gateway has no property mapping for.
    Other(String),
}

impl NativeType {
    pub fn property_type(&self) -> Option<PropertyType> {
        match self {
            Self::Boolean => Some(PropertyType::Boolean),
            Self::Class => Some(PropertyType::Class),
            Self::Double => Some(PropertyType::Double),
            Self::Int => Some(PropertyType::Int),
            Self::List => Some(PropertyType::List),
            Self::Long => Some(PropertyType::Long),
            Self::Password => Some(PropertyType::Password),
            Self::Short => Some(PropertyType::Short),
            Self::String => Some(PropertyType::String),
            Self::Other(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Class => "CLASS",
            Self::Double => "DOUBLE",
            Self::Int => "INT",
            Self::List => "LIST",
            Self::Long => "LONG",
            Self::Password => "PASSWORD",
            Self::Short => "SHORT",
            Self::String => "STRING",
            Self::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Inclusive numeric bounds.
    Range { min: Option<i64>, max: Option<i64> },
    NonEmpty,
    /// Comma separated list of regular expressions.
    RegexList,
}

pub const REQUIRED_MESSAGE: &str = "A value is required";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigKey {
    pub name: &'static str,
    pub display_name: &'static str,
    pub documentation: &'static str,
    pub native_type: NativeType,
    pub default_value: Option<DefaultValue>,
    pub required: bool,
    pub category: PropertyCategory,
    pub allowed_values: Option<Vec<String>>,
    pub validator: Option<Validator>,
}

impl ConfigKey {
    pub fn new(name: &'static str, native_type: NativeType, category: PropertyCategory) -> Self {
        Self {
            name,
            display_name: name,
            documentation: "",
            native_type,
            default_value: None,
            required: false,
            category,
            allowed_values: None,
            validator: None,
        }
    }

    pub fn display(mut self, display_name: &'static str) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn doc(mut self, documentation: &'static str) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn allowed(mut self, values: &[&str]) -> Self {
        self.allowed_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn range(self, min: Option<i64>, max: Option<i64>) -> Self {
        self.validator(Validator::Range { min, max })
    }

    /// Mandatory keys must be supplied by the caller: required and without a default.
    pub fn is_mandatory(&self) -> bool {
        self.required && self.default_value.is_none()
    }

    fn invalid(&self, value: &str, reason: impl std::fmt::Display) -> String {
        format!(
            "Invalid value {value} for configuration {}: {reason}",
            self.name
        )
    }

    /// Checks a raw value against the key's type, allowed values and
    /// validator, returning the first problem found.
    pub fn check(&self, raw: &str) -> Result<(), String> {
        let value = raw.trim();
        if self.required && value.is_empty() {
            return Err(REQUIRED_MESSAGE.to_string());
        }

        let number = match self.native_type {
            NativeType::Int => Some(self.parse_int::<i32>(value)?),
            NativeType::Short => Some(self.parse_int::<i16>(value)?),
            NativeType::Long => Some(self.parse_int::<i64>(value)?),
            NativeType::Double => {
                value
                    .parse::<f64>()
                    .map_err(|_| self.invalid(value, "Not a number of type DOUBLE"))?;
                None
            }
            NativeType::Boolean => {
                if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
                    return Err(self.invalid(value, "Expected value to be either true or false"));
                }
                None
            }
            _ => None,
        };

        if let Some(allowed) = &self.allowed_values {
            if !value.is_empty() && !allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
                return Err(self.invalid(
                    value,
                    format!("Value must be one of {}", allowed.join(", ")),
                ));
            }
        }

        match &self.validator {
            Some(Validator::Range { min, max }) => {
                if let Some(n) = number {
                    if let Some(min) = min.filter(|min| n < *min) {
                        return Err(self.invalid(value, format!("Value must be at least {min}")));
                    }
                    if let Some(max) = max.filter(|max| n > *max) {
                        return Err(self.invalid(value, format!("Value must be no more than {max}")));
                    }
                }
            }
            Some(Validator::NonEmpty) if value.is_empty() => {
                return Err(self.invalid(value, "String must be non-empty"));
            }
            Some(Validator::RegexList) => {
                for pattern in split_list(value) {
                    if let Err(e) = compile_filter_pattern(pattern) {
                        return Err(self.invalid(
                            value,
                            format!("'{pattern}' is not a valid regular expression: {e}"),
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn parse_int<T>(&self, value: &str) -> Result<i64, String>
    where
        T: std::str::FromStr + Into<i64>,
    {
        value
            .parse::<T>()
            .map(Into::into)
            .map_err(|_| self.invalid(value, format!("Not a number of type {}", self.native_type.label())))
    }
}

/// Splits a comma separated list value, dropping blank entries.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// All keys of one connector type, in definition order, plus the pairs of
/// keys that must not be set together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDef {
    keys: Vec<ConfigKey>,
    exclusive: Vec<(&'static str, &'static str)>,
}

impl ConfigDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(mut self, key: ConfigKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn define_all(mut self, keys: impl IntoIterator<Item = ConfigKey>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn mutually_exclusive(mut self, a: &'static str, b: &'static str) -> Self {
        self.exclusive.push((a, b));
        self
    }

    pub fn keys(&self) -> &[ConfigKey] {
        &self.keys
    }

    pub fn connection_keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.keys.iter().filter(|k| k.category.is_connection())
    }

    pub fn exclusive_pairs(&self) -> &[(&'static str, &'static str)] {
        &self.exclusive
    }
}
