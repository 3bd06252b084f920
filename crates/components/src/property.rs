use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Boolean,
    String,
    Int,
    Short,
    Long,
    Double,
    List,
    Class,
    Password,
}

/// UI section a property is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyCategory {
    Generic,
    GenericAdvanced,
    Connection,
    ConnectionAdvanced,
    Connector,
    ConnectorAdvanced,
    Advanced,
}

impl PropertyCategory {
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection | Self::ConnectionAdvanced)
    }
}

/// Default of a config key. Serialised as the bare value; a class default
/// is its fully qualified name.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Boolean(bool),
    Int(i64),
    Double(f64),
    String(String),
    Class(String),
    List(Vec<String>),
}

impl DefaultValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn class(fqn: impl Into<String>) -> Self {
        Self::Class(fqn.into())
    }

    /// The value as it would appear in a connector config map.
    pub fn as_config_value(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Double(d) => d.to_string(),
            Self::String(s) | Self::Class(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

impl Serialize for DefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Double(d) => serializer.serialize_f64(*d),
            Self::String(s) | Self::Class(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// A configuration property of a connector type as offered to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorProperty {
    pub name: String,
    pub display_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub default_value: Option<DefaultValue>,
    pub is_mandatory: bool,
    pub category: PropertyCategory,
    pub allowed_values: Option<Vec<String>>,
}
