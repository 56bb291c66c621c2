//! Compression of whole texts
use crate::bits::{self, Bit};
use crate::flatten::{flatten_tree, unflatten_tree};
use crate::prefix::{TrailingBits, decode_text_with, encode_text};
use crate::tree::HuffmanTree;
use crate::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compressed message together with the flattened tree needed to read it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedData {
    /// Preorder tree shape, `1` for internal nodes and `0` for leaves
    pub shape: Vec<Bit>,
    /// Leaf characters in preorder
    pub leaves: Vec<char>,
    /// The encoded message
    pub bits: Vec<Bit>,
}

impl EncodedData {
    /// Total number of bits in the message and the shape
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.shape.len() + self.bits.len()
    }

    pub fn pack(&self) -> PackedData {
        PackedData {
            shape: bits::pack_bits(&self.shape),
            shape_len: self.shape.len(),
            leaves: self.leaves.iter().collect(),
            bits: bits::pack_bits(&self.bits),
            bit_len: self.bits.len(),
        }
    }
}

/// [`EncodedData`] with both bit sequences packed into bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedData {
    pub shape: Vec<u8>,
    pub shape_len: usize,
    pub leaves: String,
    pub bits: Vec<u8>,
    pub bit_len: usize,
}

impl PackedData {
    pub fn unpack(&self) -> Result<EncodedData> {
        Ok(EncodedData {
            shape: bits::unpack_bits(&self.shape, self.shape_len)?,
            leaves: self.leaves.chars().collect(),
            bits: bits::unpack_bits(&self.bits, self.bit_len)?,
        })
    }
}

/// Builds a tree for `text`, encodes `text` with it and flattens the tree.
pub fn compress(text: &str) -> Result<EncodedData> {
    let tree = HuffmanTree::from_text(text)?;
    let bits = encode_text(&tree, text)?;
    let (shape, leaves) = flatten_tree(&tree);
    drop(tree);

    debug!(
        symbols = leaves.len(),
        input_chars = text.chars().count(),
        output_bits = bits.len(),
        shape_bits = shape.len(),
        "compressed text"
    );
    Ok(EncodedData {
        shape,
        leaves,
        bits,
    })
}

#[inline]
pub fn decompress(data: &EncodedData) -> Result<String> {
    decompress_with(data, TrailingBits::default())
}

/// Rebuilds the tree carried by `data` and decodes the message with it.
pub fn decompress_with(data: &EncodedData, trailing: TrailingBits) -> Result<String> {
    let tree = unflatten_tree(&data.shape, &data.leaves)?;
    let text = decode_text_with(&tree, &data.bits, trailing)?;
    drop(tree);

    debug!(
        input_bits = data.bits.len(),
        output_chars = text.chars().count(),
        "decompressed text"
    );
    Ok(text)
}
