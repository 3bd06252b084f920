use crate::config_def::split_list;
use crate::traits::ConnectorProperties;
use regex::{Regex, RegexBuilder};
use shared_clients::DataCollection;

pub const SCHEMA_INCLUDE_LIST: &str = "schema.include.list";
pub const SCHEMA_EXCLUDE_LIST: &str = "schema.exclude.list";
pub const TABLE_INCLUDE_LIST: &str = "table.include.list";
pub const TABLE_EXCLUDE_LIST: &str = "table.exclude.list";

#[derive(Debug, Clone)]
enum Selector {
    All,
    Include(Vec<Regex>),
    Exclude(Vec<Regex>),
}

impl Selector {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Include(patterns) => patterns.iter().any(|p| p.is_match(candidate)),
            Selector::Exclude(patterns) => !patterns.iter().any(|p| p.is_match(candidate)),
        }
    }
}

/// Compiles one include/exclude list entry the way the filters match it:
/// anchored at both ends and case-insensitive.
pub fn compile_filter_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(true)
        .build()
}

fn compile(list: &str) -> Result<Vec<Regex>, regex::Error> {
    split_list(list).map(compile_filter_pattern).collect()
}

fn selector(
    props: &ConnectorProperties,
    include_key: &str,
    exclude_key: &str,
) -> Result<Selector, regex::Error> {
    let non_blank = |key: &str| props.get(key).filter(|v| !v.trim().is_empty());
    if let Some(include) = non_blank(include_key) {
        Ok(Selector::Include(compile(include)?))
    } else if let Some(exclude) = non_blank(exclude_key) {
        Ok(Selector::Exclude(compile(exclude)?))
    } else {
        Ok(Selector::All)
    }
}

/// Decides which data collections the include/exclude lists of a connector
/// config select. Schema lists match the namespace, table lists match
/// `namespace.name`.
#[derive(Debug, Clone)]
pub struct CollectionFilter {
    schemas: Selector,
    tables: Selector,
}

impl CollectionFilter {
    pub fn from_properties(props: &ConnectorProperties) -> Result<Self, regex::Error> {
        Ok(Self {
            schemas: selector(props, SCHEMA_INCLUDE_LIST, SCHEMA_EXCLUDE_LIST)?,
            tables: selector(props, TABLE_INCLUDE_LIST, TABLE_EXCLUDE_LIST)?,
        })
    }

    pub fn is_included(&self, collection: &DataCollection) -> bool {
        self.schemas.matches(&collection.namespace)
            && self.tables.matches(&collection.qualified_name())
    }

    pub fn apply(&self, collections: Vec<DataCollection>) -> Vec<DataCollection> {
        collections
            .into_iter()
            .filter(|c| self.is_included(c))
            .collect()
    }
}
