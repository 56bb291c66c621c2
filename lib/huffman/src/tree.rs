//! Huffman encoding tree
//!
//! https://en.wikipedia.org/wiki/Huffman_coding
use crate::bits::{Bit, BitStr};
use crate::flatten::flatten_node;
use crate::stats::WeightTable;
use crate::*;
use alloc::collections::{BTreeSet, BinaryHeap};
use alloc::format;
use core::{cmp, fmt, mem};
use tracing::{debug, trace};

/// Placeholder for a child that has been moved out of its parent
const DETACHED: char = '\0';

/// A node of a full binary encoding tree
///
/// Every internal node owns exactly two children; a path from the root to a
/// leaf, reading `zero` as 0 and `one` as 1, is the code of that leaf.
///
/// Walks over a node never recurse. `Clone`, `PartialEq`, `Debug` and `Drop`
/// keep their pending nodes in a heap-allocated work list, so the depth of a
/// tree is limited by memory only.
#[derive(Eq)]
pub enum HuffmanNode {
    Leaf(char),
    Internal {
        zero: Box<HuffmanNode>,
        one: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    #[inline]
    pub fn make_leaf(symbol: char) -> Self {
        Self::Leaf(symbol)
    }

    #[inline]
    pub fn make_pair(zero: Self, one: Self) -> Self {
        Self::Internal {
            zero: Box::new(zero),
            one: Box::new(one),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    #[inline]
    pub fn symbol(&self) -> Option<char> {
        match self {
            Self::Leaf(symbol) => Some(*symbol),
            Self::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn zero(&self) -> Option<&Self> {
        self.child(Bit::Zero)
    }

    #[inline]
    pub fn one(&self) -> Option<&Self> {
        self.child(Bit::One)
    }

    #[inline]
    pub fn child(&self, bit: Bit) -> Option<&Self> {
        match (self, bit) {
            (Self::Leaf(_), _) => None,
            (Self::Internal { zero, .. }, Bit::Zero) => Some(&**zero),
            (Self::Internal { one, .. }, Bit::One) => Some(&**one),
        }
    }

    /// Nodes of this subtree in preorder, `zero` before `one`
    #[inline]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            pending: alloc::vec![self],
        }
    }

    fn count_leaves(&self) -> usize {
        self.preorder().filter(|node| node.is_leaf()).count()
    }

    fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = alloc::vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            match node {
                Self::Leaf(_) => deepest = deepest.max(depth),
                Self::Internal { zero, one } => {
                    pending.push((&**one, depth + 1));
                    pending.push((&**zero, depth + 1));
                }
            }
        }
        deepest
    }

    /// Copy of this node with placeholder leaves in place of its children
    fn shallow_clone(&self) -> Self {
        match self {
            Self::Leaf(symbol) => Self::Leaf(*symbol),
            Self::Internal { .. } => Self::make_pair(Self::Leaf(DETACHED), Self::Leaf(DETACHED)),
        }
    }

    /// Moves internal children out, leaving placeholder leaves behind.
    fn detach_children(&mut self, detached: &mut Vec<HuffmanNode>) {
        if let Self::Internal { zero, one } = self {
            for child in [zero, one] {
                if !child.is_leaf() {
                    detached.push(mem::replace(&mut **child, Self::Leaf(DETACHED)));
                }
            }
        }
    }
}

impl Drop for HuffmanNode {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

impl Clone for HuffmanNode {
    fn clone(&self) -> Self {
        let mut root = self.shallow_clone();
        let mut pending = alloc::vec![(self, &mut root)];
        while let Some(pair) = pending.pop() {
            if let (
                Self::Internal { zero, one },
                Self::Internal {
                    zero: zero_copy,
                    one: one_copy,
                },
            ) = pair
            {
                **zero_copy = zero.shallow_clone();
                **one_copy = one.shallow_clone();
                pending.push((&**one, &mut **one_copy));
                pending.push((&**zero, &mut **zero_copy));
            }
        }
        root
    }
}

impl PartialEq for HuffmanNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = alloc::vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Self::Leaf(a), Self::Leaf(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    Self::Internal { zero, one },
                    Self::Internal {
                        zero: other_zero,
                        one: other_one,
                    },
                ) => {
                    pending.push((&**one, &**other_one));
                    pending.push((&**zero, &**other_zero));
                }
                _ => return false,
            }
        }
        true
    }
}

impl fmt::Debug for HuffmanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(symbol) => f.debug_tuple("Leaf").field(symbol).finish(),
            Self::Internal { .. } => {
                let (shape, leaves) = flatten_node(self);
                f.debug_struct("Internal")
                    .field("shape", &format_args!("{}", BitStr(&shape)))
                    .field("leaves", &leaves)
                    .finish()
            }
        }
    }
}

/// Preorder iterator over the nodes of a subtree
pub struct Preorder<'a> {
    pending: Vec<&'a HuffmanNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a HuffmanNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        if let HuffmanNode::Internal { zero, one } = node {
            self.pending.push(&**one);
            self.pending.push(&**zero);
        }
        Some(node)
    }
}

/// An owned Huffman tree whose root is always an internal node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Counts the characters of `text` and builds the tree for them.
    #[inline]
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_weights(&WeightTable::from_text(text)?)
    }

    /// Builds the tree by repeatedly merging the two lightest subtrees.
    ///
    /// The first subtree taken from the queue becomes the `zero` child and the
    /// second one the `one` child. Subtrees of equal weight leave the queue in
    /// first-seen order of their earliest character, so the same table always
    /// yields the same tree.
    ///
    /// A merged subtree is not queued behind every entry of its weight, as a
    /// plain insertion counter would do. It is ranked by the smaller first-seen
    /// position of its two children instead. For `STREETTEST` this yields
    /// `T=0, R=100, S=101, E=11`, where insertion order would give
    /// `T=0, E=10, R=110, S=111`.
    pub fn from_weights(table: &WeightTable) -> Result<Self> {
        table.ensure_buildable()?;

        let mut queue = table
            .iter()
            .enumerate()
            .map(|(rank, (symbol, weight))| QueueEntry {
                weight,
                rank,
                node: HuffmanNode::make_leaf(symbol),
            })
            .collect::<BinaryHeap<_>>();

        while let Some(zero) = queue.pop() {
            let Some(one) = queue.pop() else {
                debug!(
                    symbols = table.len(),
                    weight = zero.weight,
                    "built huffman tree"
                );
                return Self::from_root(zero.node);
            };
            let merged = QueueEntry::merge(zero, one);
            trace!(weight = merged.weight, rank = merged.rank, "merged subtrees");
            queue.push(merged);
        }

        Err(HuffmanError::Configuration { distinct: 0 })
    }

    /// Wraps `root`, which must be an internal node whose leaves carry
    /// distinct characters.
    pub fn from_root(root: HuffmanNode) -> Result<Self> {
        if root.is_leaf() {
            return Err(FormatError::LeafRoot.into());
        }
        let mut seen = BTreeSet::new();
        for symbol in root.preorder().filter_map(HuffmanNode::symbol) {
            if !seen.insert(symbol) {
                return Err(FormatError::DuplicateLeaf(symbol).into());
            }
        }
        Ok(Self { root })
    }

    #[inline]
    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    #[inline]
    pub fn into_root(self) -> HuffmanNode {
        self.root
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.root.count_leaves()
    }

    /// Length of the longest code
    #[inline]
    pub fn depth(&self) -> usize {
        self.root.max_depth()
    }

    /// Leaf characters in preorder
    pub fn leaves(&self) -> Vec<char> {
        self.root.preorder().filter_map(HuffmanNode::symbol).collect()
    }

    /// Multi-line drawing of the tree, one node per line
    pub fn render(&self) -> String {
        render_huffman_tree(&self.root).join("\n")
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_huffman_tree(root: &HuffmanNode) -> Vec<String> {
    let mut output = Vec::new();
    let mut pending = alloc::vec![(root, 0, "")];
    while let Some((item, nest, label)) = pending.pop() {
        let current_indent = " ".repeat(nest * 2);
        match item {
            HuffmanNode::Leaf(symbol) => {
                output.push(format!("{current_indent}{label}{:?}", symbol));
            }
            HuffmanNode::Internal { zero, one } => {
                output.push(format!("{current_indent}{label}*"));
                pending.push((&**one, nest + 1, "1: "));
                pending.push((&**zero, nest + 1, "0: "));
            }
        }
    }
    output
}

/// Pending subtree in the builder queue
///
/// `rank` is the first-seen position of the earliest character inside the
/// subtree. Ranks are unique among queued entries.
struct QueueEntry {
    weight: usize,
    rank: usize,
    node: HuffmanNode,
}

impl QueueEntry {
    #[inline]
    fn merge(zero: Self, one: Self) -> Self {
        Self {
            weight: zero.weight + one.weight,
            rank: zero.rank.min(one.rank),
            node: HuffmanNode::make_pair(zero.node, one.node),
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.rank == other.rank
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // reversed: `BinaryHeap` pops the lightest, then lowest-ranked, entry
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match other.weight.cmp(&self.weight) {
            cmp::Ordering::Equal => other.rank.cmp(&self.rank),
            ord => ord,
        }
    }
}
