use petgraph::{
    dot::Dot,
    graph::{DiGraph, NodeIndex},
};

use crate::emit::display_keyword;
use crate::registry::TokenRegistry;
use crate::trie::Trie;

/// The trie as a directed graph: nodes labelled with their prefix (and token, for
/// keys), edges labelled with the byte they consume.
pub fn trie_to_graph(trie: &Trie, registry: &TokenRegistry) -> DiGraph<String, String> {
    let mut graph = DiGraph::with_capacity(trie.len(), trie.len().saturating_sub(1));
    let mut graph_nodes: Vec<Option<NodeIndex>> = vec![None; trie.len()];

    trie.traverse(|idx, node, prefix, _| {
        let mut label = format!("\"{}\"", display_keyword(prefix));
        if let Some(token) = node.token() {
            label.push_str(&format!(" => {}", registry.name(token)));
        }
        graph_nodes[idx.as_usize()] = Some(graph.add_node(label));
    });

    trie.traverse(|idx, node, _, _| {
        for (byte, child) in node.edges() {
            if let (Some(from), Some(to)) = (graph_nodes[idx.as_usize()], graph_nodes[child.as_usize()]) {
                graph.add_edge(from, to, display_keyword(&[byte]));
            }
        }
    });

    graph
}

pub fn trie_to_dot(trie: &Trie, registry: &TokenRegistry) -> String {
    let graph = trie_to_graph(trie, registry);
    format!("{}", Dot::new(&graph))
}
