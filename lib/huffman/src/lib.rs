//! Huffman text compression
//!
//! A text is compressed into three ordered sequences: the preorder shape of
//! its Huffman tree, the characters at the leaves of that tree, and the
//! encoded message. Together they are enough to restore the text.
//!
//! ```
//! let data = huffman::compress("STREETTEST")?;
//! assert_eq!(data.leaves, ['T', 'R', 'S', 'E']);
//! assert_eq!(huffman::decompress(&data)?, "STREETTEST");
//! # Ok::<(), huffman::HuffmanError>(())
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

pub mod bits;
pub mod codec;
pub mod flatten;
pub mod prefix;
pub mod stats;
pub mod tree;

pub use bits::Bit;
pub use codec::{EncodedData, PackedData, compress, decompress, decompress_with};
pub use flatten::{flatten_tree, unflatten_tree};
pub use prefix::{Codebook, TrailingBits, decode_text, decode_text_with, encode_text};
pub use stats::WeightTable;
pub use tree::{HuffmanNode, HuffmanTree};

pub type Result<T> = core::result::Result<T, HuffmanError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HuffmanError {
    #[error("at least two distinct characters are required, found {distinct}")]
    Configuration { distinct: usize },

    #[error("character {0:?} has no code in this tree")]
    Lookup(char),

    #[error("malformed data: {0}")]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("tree shape is empty")]
    EmptyShape,

    #[error("tree shape needs more leaf characters than given")]
    LeavesExhausted,

    #[error("tree shape ends inside an incomplete tree")]
    ShapeTruncated,

    #[error("{remaining} shape bits follow the complete tree")]
    TrailingShape { remaining: usize },

    #[error("{remaining} leaf characters are not used by the tree shape")]
    UnusedLeaves { remaining: usize },

    #[error("tree root must be an internal node")]
    LeafRoot,

    #[error("leaf character {0:?} occurs more than once")]
    DuplicateLeaf(char),

    #[error("bit stream ends {pending} bits into an incomplete code")]
    IncompleteCode { pending: usize },

    #[error("{bytes} bytes cannot hold exactly {bits} bits")]
    PackedLength { bytes: usize, bits: usize },
}

/// Builds the Huffman tree of `text`.
///
/// Fails with [`HuffmanError::Configuration`] when `text` has fewer than two
/// distinct characters.
#[inline]
pub fn build_huffman_tree(text: &str) -> Result<HuffmanTree> {
    HuffmanTree::from_text(text)
}


#[test]
fn streettest_scenario() {
    use testing::bits_of;

    let tree = build_huffman_tree("STREETTEST").unwrap();
    assert_eq!(tree, testing::example_tree());
    assert_eq!(encode_text(&tree, "SET").unwrap(), bits_of("101110"));
    assert_eq!(decode_text(&tree, &bits_of("101110")).unwrap(), "SET");

    let (shape, leaves) = flatten_tree(&tree);
    assert_eq!(shape, bits_of("1011000"));
    assert_eq!(leaves, ['T', 'R', 'S', 'E']);

    assert_eq!(
        build_huffman_tree("aaaa"),
        Err(HuffmanError::Configuration { distinct: 1 })
    );
    assert_eq!(encode_text(&tree, "Z"), Err(HuffmanError::Lookup('Z')));
}
