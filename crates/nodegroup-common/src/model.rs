//! Cluster model types shared by the admin endpoint, the client and the CLI.
//!
//! Only the identifiers the group logic needs are modelled here: server
//! addresses, table names, namespace and table descriptors (as plain
//! property maps), and the group descriptor itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::protocol::error::GroupAdminError;

/// Name of the group every server and table belongs to until moved.
pub const DEFAULT_GROUP: &str = "default";

/// Namespace configuration key naming the group of the namespace's tables.
pub const NAMESPACE_GROUP_PROP: &str = "nodegroup.group.name";

/// Table descriptor key naming the group the table should be placed in.
pub const TABLE_GROUP_PROP: &str = "nodegroup.group.name";

/// Namespace used when a table name carries no explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A cluster worker identified by host and port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn from_parts(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Address {
    type Err = GroupAdminError;

    /// Parses `host:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.rsplit_once(':').ok_or_else(|| {
            GroupAdminError::InvalidRequest(format!(
                "Invalid server address '{}': expected host:port",
                s
            ))
        })?;
        if host.is_empty() {
            return Err(GroupAdminError::InvalidRequest(format!(
                "Invalid server address '{}': empty host",
                s
            )));
        }
        let port = port.parse::<u16>().map_err(|e| {
            GroupAdminError::InvalidRequest(format!("Invalid port in '{}': {}", s, e))
        })?;
        Ok(Self::from_parts(host, port))
    }
}

/// Fully qualified table name, `namespace:qualifier`.
///
/// Serialized as its string form so it can be used directly in JSON params.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName {
    namespace: String,
    qualifier: String,
}

impl TableName {
    pub fn new(namespace: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            qualifier: qualifier.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == DEFAULT_NAMESPACE {
            write!(f, "{}", self.qualifier)
        } else {
            write!(f, "{}:{}", self.namespace, self.qualifier)
        }
    }
}

impl FromStr for TableName {
    type Err = GroupAdminError;

    /// Parses `namespace:qualifier`, or a bare qualifier in the default namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, qualifier) = match s.split_once(':') {
            Some((ns, q)) => (ns, q),
            None => (DEFAULT_NAMESPACE, s),
        };
        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        };
        if !valid(namespace) || !valid(qualifier) {
            return Err(GroupAdminError::InvalidRequest(format!(
                "Invalid table name '{}'",
                s
            )));
        }
        Ok(Self::new(namespace, qualifier))
    }
}

impl TryFrom<String> for TableName {
    type Error = GroupAdminError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.to_string()
    }
}

/// Descriptor of a server group: its members and the tables placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub name: String,
    #[serde(default)]
    pub servers: BTreeSet<Address>,
    #[serde(default)]
    pub tables: BTreeSet<TableName>,
}

impl GroupInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            servers: BTreeSet::new(),
            tables: BTreeSet::new(),
        }
    }

    pub fn add_server(&mut self, server: Address) {
        self.servers.insert(server);
    }

    pub fn remove_server(&mut self, server: &Address) -> bool {
        self.servers.remove(server)
    }

    pub fn contains_server(&self, server: &Address) -> bool {
        self.servers.contains(server)
    }

    pub fn add_table(&mut self, table: TableName) {
        self.tables.insert(table);
    }

    pub fn remove_table(&mut self, table: &TableName) -> bool {
        self.tables.remove(table)
    }

    pub fn contains_table(&self, table: &TableName) -> bool {
        self.tables.contains(table)
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty() && self.tables.is_empty()
    }
}

/// Namespace metadata as seen by lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDescriptor {
    pub name: String,
    #[serde(default)]
    pub configuration: BTreeMap<String, String>,
}

impl NamespaceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configuration: BTreeMap::new(),
        }
    }

    pub fn with_configuration(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configuration.insert(key.into(), value.into());
        self
    }

    pub fn configuration_value(&self, key: &str) -> Option<&str> {
        self.configuration.get(key).map(String::as_str)
    }

    /// The group this namespace's tables are placed in, if configured.
    pub fn group(&self) -> Option<&str> {
        self.configuration_value(NAMESPACE_GROUP_PROP)
    }
}

/// Table metadata as seen by lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: TableName,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl TableDescriptor {
    pub fn new(name: TableName) -> Self {
        Self {
            name,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Explicitly requested group, if any.
    pub fn group(&self) -> Option<&str> {
        self.value(TABLE_GROUP_PROP)
    }
}

/// Region identity passed along with table events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub table: TableName,
    pub region_id: u64,
    #[serde(default)]
    pub start_key: Vec<u8>,
    #[serde(default)]
    pub end_key: Vec<u8>,
}
