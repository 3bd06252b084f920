use crate::errors::RegistryError;
use crate::property::ConnectorProperty;
use crate::traits::ConnectorCapability;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorTypeDescriptor {
    pub id: String,
    pub class_name: String,
    pub display_name: String,
    pub version: String,
    pub enabled: bool,
    pub properties: Vec<ConnectorProperty>,
}

struct Registered {
    descriptor: ConnectorTypeDescriptor,
    capability: Arc<dyn ConnectorCapability>,
}

/// Supported connector types, built once at startup and read-only afterwards.
pub struct ConnectorRegistry {
    entries: Vec<Registered>,
    by_id: HashMap<String, usize>,
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

fn describe(capability: &dyn ConnectorCapability) -> Result<ConnectorTypeDescriptor, RegistryError> {
    let properties = capability
        .describe()
        .keys()
        .iter()
        .map(|key| {
            let property_type = key.native_type.property_type().ok_or_else(|| {
                RegistryError::unsupported_type(
                    capability.id(),
                    key.name,
                    key.native_type.label(),
                )
            })?;
            Ok(ConnectorProperty {
                name: key.name.to_string(),
                display_name: key.display_name.to_string(),
                description: key.documentation.to_string(),
                property_type,
                default_value: key.default_value.clone(),
                is_mandatory: key.is_mandatory(),
                category: key.category,
                allowed_values: key.allowed_values.clone(),
            })
        })
        .collect::<Result<Vec<_>, RegistryError>>()?;

    Ok(ConnectorTypeDescriptor {
        id: capability.id().to_string(),
        class_name: capability.class_name().to_string(),
        display_name: capability.display_name().to_string(),
        version: capability.version().to_string(),
        enabled: capability.enabled(),
        properties,
    })
}

impl ConnectorRegistry {
    /// Registers `capabilities` in the given order.
    pub fn new(capabilities: Vec<Arc<dyn ConnectorCapability>>) -> Result<Self, RegistryError> {
        let mut entries = Vec::with_capacity(capabilities.len());
        let mut by_id = HashMap::new();

        for capability in capabilities {
            let descriptor = describe(capability.as_ref())?;
            if by_id.contains_key(&descriptor.id) {
                return Err(RegistryError::duplicate(&descriptor.id));
            }
            info!(
                "registered connector type {} ({} properties)",
                descriptor.id,
                descriptor.properties.len()
            );
            by_id.insert(descriptor.id.clone(), entries.len());
            entries.push(Registered {
                descriptor,
                capability,
            });
        }

        Ok(Self { entries, by_id })
    }

    fn entry(&self, id: &str) -> Result<&Registered, RegistryError> {
        self.by_id
            .get(id)
            .map(|idx| &self.entries[*idx])
            .ok_or_else(|| RegistryError::not_found(id))
    }

    pub fn describe(&self, id: &str) -> Result<&ConnectorTypeDescriptor, RegistryError> {
        self.entry(id).map(|e| &e.descriptor)
    }

    pub fn capability(&self, id: &str) -> Result<Arc<dyn ConnectorCapability>, RegistryError> {
        self.entry(id).map(|e| Arc::clone(&e.capability))
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<&ConnectorTypeDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.descriptor.id.as_str())
    }

    pub fn find_by_class(&self, class_name: &str) -> Option<&ConnectorTypeDescriptor> {
        self.entries
            .iter()
            .map(|e| &e.descriptor)
            .find(|d| d.class_name == class_name)
    }

    pub fn is_supported_class(&self, class_name: &str) -> bool {
        self.find_by_class(class_name).is_some()
    }
}
