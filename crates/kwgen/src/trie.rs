use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use kwgen_util::make_type_idx;

use crate::registry::TokenId;

// one node per distinct prefix; edges sorted by byte so traversal order is reproducible
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    edges: BTreeMap<u8, NodeIdx>,
    token: Option<TokenId>,
}

make_type_idx!(pub NodeIdx, TrieNode);

impl TrieNode {
    pub fn is_key(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<TokenId> {
        self.token
    }

    pub fn child(&self, byte: u8) -> Option<NodeIdx> {
        self.edges.get(&byte).copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (u8, NodeIdx)> + '_ {
        self.edges.iter().map(|(byte, idx)| (*byte, *idx))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrieError {
    #[error("keyword must not be empty")]
    EmptyKeyword,
}

/// Prefix tree over keyword bytes. The root is the empty prefix and is never a key.
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    root: NodeIdx,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

// the root always exists, so an `is_empty` would never be true
#[allow(clippy::len_without_is_empty)]
impl Trie {
    pub fn new() -> Trie {
        let mut nodes = Vec::new();
        let root = NodeIdx::from_push(&mut nodes, TrieNode::default());
        Trie { nodes, root }
    }

    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn node(&self, idx: NodeIdx) -> &TrieNode {
        &self.nodes[idx]
    }

    /// Walks (creating as needed) one node per byte of `keyword` and marks the last
    /// one as a key. Inserting the same keyword again replaces its token.
    pub fn insert(&mut self, keyword: &[u8], token: TokenId) -> Result<NodeIdx, TrieError> {
        if keyword.is_empty() {
            return Err(TrieError::EmptyKeyword);
        }

        let mut current = self.root;
        for &byte in keyword {
            current = match self.nodes[current].child(byte) {
                Some(existing) => existing,
                None => {
                    let created = NodeIdx::from_push(&mut self.nodes, TrieNode::default());
                    self.nodes[current].edges.insert(byte, created);
                    created
                }
            };
        }

        if let Some(previous) = self.nodes[current].token.replace(token) {
            if previous != token {
                trace!(
                    keyword = %String::from_utf8_lossy(keyword),
                    "keyword redeclared, last declaration wins"
                );
            }
        }

        Ok(current)
    }

    pub fn get(&self, keyword: &[u8]) -> Option<TokenId> {
        let mut current = self.root;
        for &byte in keyword {
            current = self.nodes[current].child(byte)?;
        }
        self.nodes[current].token
    }

    /// Depth-first walk from the root, calling `visit(idx, node, prefix, is_key)` once
    /// per node. Siblings are visited in ascending byte order.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(NodeIdx, &TrieNode, &[u8], bool),
    {
        let mut prefix = Vec::new();
        self.traverse_helper(self.root, &mut prefix, &mut visit);
    }

    fn traverse_helper<F>(&self, idx: NodeIdx, prefix: &mut Vec<u8>, visit: &mut F)
    where
        F: FnMut(NodeIdx, &TrieNode, &[u8], bool),
    {
        let node = &self.nodes[idx];
        visit(idx, node, prefix.as_slice(), node.is_key());

        for (byte, child) in node.edges() {
            prefix.push(byte);
            self.traverse_helper(child, prefix, visit);
            prefix.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn key_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_key()).count()
    }
}
