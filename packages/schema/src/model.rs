use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use flowconf_document::ComponentKind;

/// A `(kind, name)` reference to a component the registry knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    pub kind: ComponentKind,
    pub name: String,
}

/// The schema describing one named component's configuration block.
pub type ComponentSchema = SchemaNode;

/// JSON-Schema-like description of a configuration subtree.
///
/// Only the subset the engine consumes is modeled; unknown fields in
/// registry payloads are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub properties: HashMap<String, SchemaNode>,
    pub required: Vec<String>,
    #[serde(rename = "enum")]
    pub enum_values: Vec<Value>,
    pub one_of: Vec<SchemaNode>,
    pub any_of: Vec<SchemaNode>,
    pub all_of: Vec<SchemaNode>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
}

impl SchemaNode {
    /// Combinator branches in declaration order.
    fn branches(&self) -> impl Iterator<Item = &SchemaNode> {
        self.one_of
            .iter()
            .chain(self.any_of.iter())
            .chain(self.all_of.iter())
    }

    /// Looks up a property by name: direct `properties` first, then
    /// combinator branches depth-first.
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        if let Some(node) = self.properties.get(key) {
            return Some(node);
        }
        self.branches().find_map(|branch| branch.property(key))
    }

    /// Every property key this node accepts, including keys declared
    /// inside `oneOf`/`anyOf`/`allOf` branches.
    pub fn known_keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self.properties.keys().cloned().collect();
        for branch in self.branches() {
            keys.extend(branch.known_keys());
        }
        keys
    }

    /// Whether `key` appears in a `required` list at this node or in
    /// any combinator branch.
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|k| k == key) || self.branches().any(|b| b.is_required(key))
    }

    /// Property name → node pairs visible at this level, combinator
    /// branches included. On duplicate names the shallowest declaration
    /// wins.
    pub fn visible_properties(&self) -> BTreeMap<&str, &SchemaNode> {
        let mut out = BTreeMap::new();
        self.collect_properties(&mut out);
        out
    }

    fn collect_properties<'a>(&'a self, out: &mut BTreeMap<&'a str, &'a SchemaNode>) {
        for (key, child) in &self.properties {
            out.entry(key.as_str()).or_insert(child);
        }
        for branch in self.branches() {
            branch.collect_properties(out);
        }
    }
}
