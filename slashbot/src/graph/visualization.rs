//! Renders a `StateGraph`'s node/edge shape for debugging: either Graphviz
//! `dot` or a plain indented text outline. Takes the raw shape rather than a
//! `CompiledStateGraph` so it can be called before `compile()` too.

use std::collections::HashMap;

use super::conditional::NextEntry;
use super::state_graph::{END, START};

/// Renders a Graphviz `dot` graph from a node id list, explicit edges, and
/// conditional edges (source -> target, with the branch label when known).
pub fn generate_dot(
    node_ids: &[String],
    edges: &[(String, String)],
    conditional_edges: &HashMap<String, Vec<(String, String)>>,
) -> String {
    let mut out = String::from("digraph G {\n");
    out.push_str(&format!("    \"{START}\" [shape=point];\n"));
    out.push_str(&format!("    \"{END}\" [shape=doublecircle];\n"));
    for id in node_ids {
        out.push_str(&format!("    \"{id}\" [shape=box];\n"));
    }
    for (from, to) in edges {
        out.push_str(&format!("    \"{from}\" -> \"{to}\";\n"));
    }
    for (source, branches) in conditional_edges {
        for (label, target) in branches {
            out.push_str(&format!(
                "    \"{source}\" -> \"{target}\" [label=\"{label}\"];\n"
            ));
        }
    }
    out.push_str("}\n");
    out
}

/// Renders a plain-text outline, walking `edge_order` and noting any
/// conditional branches off each node.
pub fn generate_text<S>(
    edge_order: &[String],
    next_map: &HashMap<String, NextEntry<S>>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{START}\n"));
    for (i, id) in edge_order.iter().enumerate() {
        out.push_str(&format!("  -> {id}\n"));
        if let Some(NextEntry::Conditional(router)) = next_map.get(id) {
            if let Some(path_map) = &router.path_map {
                let mut keys: Vec<_> = path_map.keys().collect();
                keys.sort();
                for key in keys {
                    out.push_str(&format!("       [{key}] -> {}\n", path_map[key]));
                }
            }
        }
        if i == edge_order.len() - 1 && !next_map.contains_key(id) {
            out.push_str(&format!("  -> {END}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_dot_includes_nodes_and_edges() {
        let nodes = vec!["think".to_string(), "act".to_string()];
        let edges = vec![
            (START.to_string(), "think".to_string()),
            ("act".to_string(), END.to_string()),
        ];
        let dot = generate_dot(&nodes, &edges, &HashMap::new());
        assert!(dot.contains("\"think\""));
        assert!(dot.contains("\"act\" -> \"__end__\""));
    }

    #[test]
    fn generate_text_walks_edge_order() {
        let order = vec!["think".to_string(), "act".to_string()];
        let next_map: HashMap<String, NextEntry<i32>> = HashMap::new();
        let text = generate_text(&order, &next_map);
        assert!(text.contains("think"));
        assert!(text.contains("act"));
        assert!(text.contains(END));
    }
}
