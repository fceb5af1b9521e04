use flowconf_schema::SchemaNode;

/// Walks the schema tree along a context path, resolving each segment
/// through `property()` so combinator branches are searched too.
/// Any unresolvable segment answers `None`, so completions and hover
/// degrade to nothing rather than guessing.
pub fn resolve_node<'a>(schema: &'a SchemaNode, path: &[String]) -> Option<&'a SchemaNode> {
    let mut node = schema;
    for segment in path {
        node = node.property(segment)?;
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_nested_path() {
        let schema: SchemaNode = serde_json::from_value(json!({
            "properties": {
                "protocols": {
                    "properties": {
                        "grpc": {"properties": {"endpoint": {"type": "string"}}}
                    }
                }
            }
        }))
        .unwrap();

        let path = vec!["protocols".to_string(), "grpc".to_string()];
        let node = resolve_node(&schema, &path).unwrap();
        assert!(node.property("endpoint").is_some());

        let bad = vec!["protocols".to_string(), "http".to_string()];
        assert!(resolve_node(&schema, &bad).is_none());
    }

    #[test]
    fn test_empty_path_is_root() {
        let schema = SchemaNode::default();
        assert_eq!(resolve_node(&schema, &[]), Some(&schema));
    }
}
