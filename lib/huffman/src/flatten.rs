//! Self-describing tree serialization
//!
//! A tree is written in preorder as two parallel sequences: `shape` holds one
//! bit per node (`1` internal, `0` leaf) and `leaves` holds the character of
//! every leaf in the order the leaves are visited.
use crate::bits::Bit;
use crate::tree::{HuffmanNode, HuffmanTree};
use crate::*;

impl HuffmanTree {
    #[inline]
    pub fn flatten(&self) -> (Vec<Bit>, Vec<char>) {
        flatten_tree(self)
    }

    #[inline]
    pub fn unflatten(shape: &[Bit], leaves: &[char]) -> Result<Self> {
        unflatten_tree(shape, leaves)
    }
}

#[inline]
pub fn flatten_tree(tree: &HuffmanTree) -> (Vec<Bit>, Vec<char>) {
    flatten_node(tree.root())
}

pub(crate) fn flatten_node(node: &HuffmanNode) -> (Vec<Bit>, Vec<char>) {
    let mut shape = Vec::new();
    let mut leaves = Vec::new();
    for node in node.preorder() {
        match node.symbol() {
            Some(symbol) => {
                shape.push(Bit::Zero);
                leaves.push(symbol);
            }
            None => shape.push(Bit::One),
        }
    }
    (shape, leaves)
}

/// Rebuilds the tree written by [`flatten_tree`].
///
/// Both sequences must be consumed exactly and every leaf character may occur
/// only once. Internal nodes still waiting for children live on an explicit
/// stack, so the nesting depth of `shape` is not bounded by the call stack.
pub fn unflatten_tree(shape: &[Bit], leaves: &[char]) -> Result<HuffmanTree> {
    if shape.is_empty() {
        return Err(FormatError::EmptyShape.into());
    }

    let mut shape_iter = shape.iter();
    let mut leaf_iter = leaves.iter();
    // `None`: internal node with no finished child yet
    // `Some(zero)`: internal node waiting for its one-subtree
    let mut open: Vec<Option<HuffmanNode>> = Vec::new();

    loop {
        let mut node = match shape_iter.next().ok_or(FormatError::ShapeTruncated)? {
            Bit::One => {
                open.push(None);
                continue;
            }
            Bit::Zero => {
                HuffmanNode::make_leaf(*leaf_iter.next().ok_or(FormatError::LeavesExhausted)?)
            }
        };

        loop {
            match open.pop() {
                None => {
                    if shape_iter.len() > 0 {
                        return Err(FormatError::TrailingShape {
                            remaining: shape_iter.len(),
                        }
                        .into());
                    }
                    if leaf_iter.len() > 0 {
                        return Err(FormatError::UnusedLeaves {
                            remaining: leaf_iter.len(),
                        }
                        .into());
                    }
                    return HuffmanTree::from_root(node);
                }
                Some(None) => {
                    open.push(Some(node));
                    break;
                }
                Some(Some(zero)) => {
                    node = HuffmanNode::make_pair(zero, node);
                }
            }
        }
    }
}
