//! Prefix code derived from a Huffman tree
use crate::bits::{Bit, BitStr};
use crate::tree::{HuffmanNode, HuffmanTree};
use crate::*;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Character to code mapping of a tree
///
/// No code is a prefix of another, because only leaves carry codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    codes: BTreeMap<char, Vec<Bit>>,
}

impl Codebook {
    pub fn new(tree: &HuffmanTree) -> Self {
        Self {
            codes: compute_codes(tree.root()),
        }
    }

    #[inline]
    pub fn get(&self, symbol: char) -> Option<&[Bit]> {
        self.codes.get(&symbol).map(|v| v.as_slice())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries ordered by character
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (char, &[Bit])> + '_ {
        self.codes.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Concatenates the code of every character of `text`.
    ///
    /// Fails with [`HuffmanError::Lookup`] on the first character without a
    /// code; nothing is returned in that case.
    pub fn encode(&self, text: &str) -> Result<Vec<Bit>> {
        let mut output = Vec::new();
        for symbol in text.chars() {
            let code = self.get(symbol).ok_or(HuffmanError::Lookup(symbol))?;
            output.extend_from_slice(code);
        }
        Ok(output)
    }
}

impl fmt::Display for Codebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "{:?} {}", symbol, BitStr(code))?;
        }
        Ok(())
    }
}

/// Collects the path to every leaf in a depth-first walk.
///
/// Each pending node remembers the path length of its parent, so a single
/// `path` buffer is shared by the whole walk.
fn compute_codes(root: &HuffmanNode) -> BTreeMap<char, Vec<Bit>> {
    let mut codes = BTreeMap::new();
    let mut path = Vec::new();
    let mut pending = alloc::vec![(root, 0, None)];
    while let Some((node, parent_len, edge)) = pending.pop() {
        path.truncate(parent_len);
        if let Some(bit) = edge {
            path.push(bit);
        }
        match node {
            HuffmanNode::Leaf(symbol) => {
                codes.insert(*symbol, path.clone());
            }
            HuffmanNode::Internal { zero, one } => {
                pending.push((&**one, path.len(), Some(Bit::One)));
                pending.push((&**zero, path.len(), Some(Bit::Zero)));
            }
        }
    }
    codes
}

/// What to do with bits left over after the last complete code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBits {
    /// Fail with [`FormatError::IncompleteCode`]
    #[default]
    Reject,
    /// Drop the partial code silently
    Discard,
}

#[inline]
pub fn encode_text(tree: &HuffmanTree, text: &str) -> Result<Vec<Bit>> {
    Codebook::new(tree).encode(text)
}

#[inline]
pub fn decode_text(tree: &HuffmanTree, bits: &[Bit]) -> Result<String> {
    decode_text_with(tree, bits, TrailingBits::default())
}

/// Walks the tree from the root, emitting a character at every leaf.
pub fn decode_text_with(tree: &HuffmanTree, bits: &[Bit], trailing: TrailingBits) -> Result<String> {
    let root = tree.root();
    let mut output = String::new();
    let mut cursor = root;
    let mut pending = 0;
    for &bit in bits {
        cursor = match cursor.child(bit) {
            Some(next) => next,
            // the cursor is reset at every leaf and the root is internal
            None => return Err(FormatError::LeafRoot.into()),
        };
        if let Some(symbol) = cursor.symbol() {
            output.push(symbol);
            cursor = root;
            pending = 0;
        } else {
            pending += 1;
        }
    }

    if pending > 0 {
        match trailing {
            TrailingBits::Reject => return Err(FormatError::IncompleteCode { pending }.into()),
            TrailingBits::Discard => {}
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bits_of, example_tree};

    #[test]
    fn codes() {
        let codebook = Codebook::new(&example_tree());
        let codes = codebook
            .iter()
            .map(|(symbol, code)| (symbol, code.to_vec()))
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            [
                ('E', bits_of("11")),
                ('R', bits_of("100")),
                ('S', bits_of("101")),
                ('T', bits_of("0")),
            ]
        );
        println!("{codebook}");
    }

    #[test]
    fn deep_codes() {
        let depth = 2_000;
        let (shape, leaves) = crate::testing::left_comb(depth);
        let tree = HuffmanTree::unflatten(&shape, &leaves).unwrap();
        let codebook = Codebook::new(&tree);
        assert_eq!(codebook.len(), depth + 1);
        assert_eq!(codebook.get(leaves[0]), Some(&[Bit::Zero; 2_000][..]));
        assert_eq!(codebook.get(leaves[depth]), Some(&[Bit::One][..]));
        for (k, &symbol) in leaves.iter().enumerate().skip(1) {
            let code = codebook.get(symbol).unwrap();
            assert_eq!(code.len(), depth - k + 1);
            assert_eq!(code.last(), Some(&Bit::One));
        }

        let text = leaves.iter().rev().collect::<String>();
        let bits = codebook.encode(&text).unwrap();
        assert_eq!(decode_text(&tree, &bits).unwrap(), text);
    }

    #[test]
    fn encode() {
        let tree = example_tree();
        assert_eq!(encode_text(&tree, "E").unwrap(), bits_of("11"));
        assert_eq!(encode_text(&tree, "SET").unwrap(), bits_of("101110"));
        assert_eq!(
            encode_text(&tree, "STREETS").unwrap(),
            bits_of("101010011110101")
        );
        assert!(encode_text(&tree, "").unwrap().is_empty());
    }

    #[test]
    fn encode_unknown() {
        let tree = example_tree();
        assert_eq!(encode_text(&tree, "Z"), Err(HuffmanError::Lookup('Z')));
        assert_eq!(encode_text(&tree, "SETZ"), Err(HuffmanError::Lookup('Z')));
    }

    #[test]
    fn decode() {
        let tree = example_tree();
        assert_eq!(decode_text(&tree, &bits_of("11")).unwrap(), "E");
        assert_eq!(decode_text(&tree, &bits_of("101110")).unwrap(), "SET");
        assert_eq!(
            decode_text(&tree, &bits_of("101010011110101")).unwrap(),
            "STREETS"
        );
        assert_eq!(decode_text(&tree, &[]).unwrap(), "");
    }

    #[test]
    fn decode_trailing_bits() {
        let tree = example_tree();
        let bits = bits_of("10111010");
        assert_eq!(
            decode_text(&tree, &bits),
            Err(HuffmanError::Format(FormatError::IncompleteCode { pending: 2 }))
        );
        assert_eq!(
            decode_text_with(&tree, &bits, TrailingBits::Discard).unwrap(),
            "SET"
        );
    }
}
