// Frozen form of the trie: one stepper per node, children referenced by index into
// the stepper table instead of through forward declarations. Steppers are stored in
// traversal order, which is also the order every backend emits them in.

use tracing::debug;

use kwgen_util::make_type_idx;

use crate::registry::TokenRegistry;
use crate::trie::{NodeIdx, Trie};

/// Returned by every recognizer when the input is not exactly a keyword.
pub const NO_MATCH: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accept {
    pub token: String,
    pub value: i32,
}

#[derive(Debug, Clone)]
pub struct Stepper {
    pub prefix: Vec<u8>,
    pub accept: Option<Accept>,
    pub branches: Vec<(u8, StepperIdx)>,
}

make_type_idx!(pub StepperIdx, Stepper);

impl Stepper {
    pub fn branch(&self, byte: u8) -> Option<StepperIdx> {
        // branches are sorted by byte
        self.branches
            .binary_search_by_key(&byte, |(b, _)| *b)
            .ok()
            .map(|pos| self.branches[pos].1)
    }

    /// Result of this stepper once the input is exhausted.
    pub fn on_end(&self) -> i32 {
        self.accept.as_ref().map_or(NO_MATCH, |accept| accept.value)
    }
}

#[derive(Debug, Clone)]
pub struct Automaton {
    steppers: Vec<Stepper>,
    root: StepperIdx,
}

// one stepper per trie node, root included
#[allow(clippy::len_without_is_empty)]
impl Automaton {
    pub fn from_trie(trie: &Trie, registry: &TokenRegistry) -> Automaton {
        let mut steppers: Vec<Stepper> = Vec::with_capacity(trie.len());
        let mut pending: Vec<Vec<(u8, NodeIdx)>> = Vec::with_capacity(trie.len());
        let mut node_to_stepper: Vec<Option<StepperIdx>> = vec![None; trie.len()];

        trie.traverse(|idx, node, prefix, is_key| {
            let accept = node.token().filter(|_| is_key).map(|token| Accept {
                token: registry.name(token).to_string(),
                value: registry.value(token),
            });

            let stepper = StepperIdx::from_push(
                &mut steppers,
                Stepper {
                    prefix: prefix.to_vec(),
                    accept,
                    branches: Vec::new(),
                },
            );
            node_to_stepper[idx.as_usize()] = Some(stepper);
            pending.push(node.edges().collect());
        });

        // preorder visits a parent before its children, so links are resolved afterwards
        for (stepper, edges) in steppers.iter_mut().zip(pending) {
            stepper.branches = edges
                .into_iter()
                .filter_map(|(byte, child)| {
                    node_to_stepper[child.as_usize()].map(|target| (byte, target))
                })
                .collect();
        }

        let root = node_to_stepper[trie.root().as_usize()]
            .unwrap_or_else(|| unreachable!("traversal always visits the root"));

        debug!(
            steppers = steppers.len(),
            keywords = trie.key_count(),
            "built automaton"
        );

        Automaton { steppers, root }
    }

    pub fn root(&self) -> StepperIdx {
        self.root
    }

    pub fn stepper(&self, idx: StepperIdx) -> &Stepper {
        &self.steppers[idx]
    }

    pub fn steppers(&self) -> impl Iterator<Item = (StepperIdx, &Stepper)> + '_ {
        self.steppers
            .iter()
            .enumerate()
            .map(|(idx, stepper)| (StepperIdx(idx as u32), stepper))
    }

    pub fn len(&self) -> usize {
        self.steppers.len()
    }

    /// Runs the generated recognizer's contract in-process: consumes one byte per
    /// stepper and returns the token value only if the input ends exactly on a key.
    pub fn recognize(&self, input: &[u8]) -> i32 {
        let mut current = self.root;
        let mut rest = input;
        loop {
            let stepper = &self.steppers[current];
            match rest.split_first() {
                None => return stepper.on_end(),
                Some((byte, tail)) => match stepper.branch(*byte) {
                    Some(next) => {
                        current = next;
                        rest = tail;
                    }
                    None => return NO_MATCH,
                },
            }
        }
    }

    // mirrors the generated entry point, which takes an explicit length
    pub fn recognize_len(&self, input: &[u8], len: usize) -> i32 {
        match input.get(..len) {
            Some(candidate) => self.recognize(candidate),
            None => NO_MATCH,
        }
    }
}
