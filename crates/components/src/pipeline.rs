use crate::config_def::{ConfigDef, ConfigKey, REQUIRED_MESSAGE};
use crate::errors::{ErrorBag, PipelineError, ProbeError};
use crate::filters::CollectionFilter;
use crate::registry::ConnectorRegistry;
use crate::traits::ConnectorProperties;
use crate::validation::{
    ConnectionValidationResult, FilterValidationResult, GenericValidationResult,
    PropertiesValidationResult, PropertyValidationResult,
};
use common::error::trace_as_string;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Renders a JSON object as a flat string config. Strings are taken as is,
/// numbers and booleans by their JSON text, arrays and objects as JSON; a
/// `null` value counts as absent.
pub fn coerce_properties(raw: &Map<String, Value>) -> ConnectorProperties {
    raw.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

fn check_keys<'a>(
    keys: impl Iterator<Item = &'a ConfigKey>,
    props: &ConnectorProperties,
    full: bool,
) -> Vec<PropertyValidationResult> {
    keys.filter_map(|key| match props.get(key.name) {
        Some(value) => key
            .check(value)
            .err()
            .map(|message| PropertyValidationResult::new(key.name, message)),
        None if full && key.is_mandatory() => {
            Some(PropertyValidationResult::new(key.name, REQUIRED_MESSAGE))
        }
        None => None,
    })
    .collect()
}

fn cross_field(
    def: &ConfigDef,
    props: &ConnectorProperties,
    results: Vec<PropertyValidationResult>,
) -> Vec<PropertyValidationResult> {
    let set = |key: &str| props.get(key).filter(|v| !v.trim().is_empty());
    let mut bag = ErrorBag::new(results);
    for &(a, b) in def.exclusive_pairs() {
        bag.check_mutually_exclusive(a, set(a), b, set(b));
    }
    bag.finish()
}

/// Partial validation: only keys present in `props` are checked, in
/// definition order, first error per key; then cross-field rules.
pub fn validate_present(def: &ConfigDef, props: &ConnectorProperties) -> PropertiesValidationResult {
    let results = check_keys(def.keys().iter(), props, false);
    PropertiesValidationResult::from_results(cross_field(def, props, results))
}

fn probe_failure(err: &ProbeError) -> GenericValidationResult {
    GenericValidationResult {
        message: err.message().to_string(),
        trace: Some(trace_as_string(err)),
    }
}

/// Runs connection, property and filter validation for registered connector
/// types.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    registry: Arc<ConnectorRegistry>,
    probe_timeout: Duration,
}

impl ValidationPipeline {
    pub fn new(registry: Arc<ConnectorRegistry>, probe_timeout: Duration) -> Self {
        Self {
            registry,
            probe_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectorRegistry> {
        &self.registry
    }

    /// Validates the connection keys, then probes the database. Probe
    /// problems come back as an invalid result, never as an error.
    pub async fn validate_connection(
        &self,
        type_id: &str,
        raw: &Map<String, Value>,
    ) -> Result<ConnectionValidationResult, PipelineError> {
        let capability = self.registry.capability(type_id)?;
        let props = coerce_properties(raw);

        let results = check_keys(capability.describe().connection_keys(), &props, true);
        if !results.is_empty() {
            return Ok(ConnectionValidationResult::invalid(results, Vec::new()));
        }

        let probe =
            tokio::time::timeout(self.probe_timeout, capability.validate_connection(&props)).await;
        let result = match probe {
            Ok(Ok(())) => ConnectionValidationResult::valid(),
            Ok(Err(ProbeError::Property { property, context })) => {
                debug!("{} connection probe rejected {}: {}", type_id, property, context);
                ConnectionValidationResult::invalid(
                    vec![PropertyValidationResult::new(property, context.message())],
                    Vec::new(),
                )
            }
            Ok(Err(err)) => {
                warn!("{} connection probe failed: {}", type_id, err);
                ConnectionValidationResult::invalid(Vec::new(), vec![probe_failure(&err)])
            }
            Err(_) => ConnectionValidationResult::invalid(
                Vec::new(),
                vec![GenericValidationResult {
                    message: format!(
                        "Connection validation timed out after {}ms",
                        self.probe_timeout.as_millis()
                    ),
                    trace: None,
                }],
            ),
        };
        Ok(result)
    }

    pub fn validate_properties(
        &self,
        type_id: &str,
        raw: &Map<String, Value>,
    ) -> Result<PropertiesValidationResult, PipelineError> {
        self.validate_config(type_id, &coerce_properties(raw))
    }

    /// [`Self::validate_properties`] for an already flattened config.
    pub fn validate_config(
        &self,
        type_id: &str,
        props: &ConnectorProperties,
    ) -> Result<PropertiesValidationResult, PipelineError> {
        let capability = self.registry.capability(type_id)?;
        Ok(validate_present(capability.describe(), props))
    }

    /// Validates the properties and, when they pass, lists the live data
    /// collections the include/exclude lists select.
    pub async fn validate_filters(
        &self,
        type_id: &str,
        raw: &Map<String, Value>,
    ) -> Result<FilterValidationResult, PipelineError> {
        let capability = self.registry.capability(type_id)?;
        let props = coerce_properties(raw);

        let checked = validate_present(capability.describe(), &props);
        if !checked.is_valid() {
            return Ok(FilterValidationResult::invalid(
                checked.property_validation_results,
            ));
        }

        let filter = CollectionFilter::from_properties(&props)
            .map_err(|e| PipelineError::probe(ProbeError::failed(e)))?;
        let collections = tokio::time::timeout(
            self.probe_timeout,
            capability.list_data_collections(&props),
        )
        .await
        .map_err(|_| {
            PipelineError::probe(ProbeError::failed_msg(format!(
                "listing data collections timed out after {}ms",
                self.probe_timeout.as_millis()
            )))
        })?
        .map_err(PipelineError::probe)?;

        Ok(FilterValidationResult::valid(filter.apply(collections)))
    }
}
