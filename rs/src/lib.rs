//! Huffman Text Compressor

use core::fmt::Display;
use huffman::bits::BitStr;
use huffman::{Codebook, EncodedData, HuffmanError, HuffmanTree, PackedData, WeightTable};
use serde::{Deserialize, Serialize};
use tracing::warn;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn compress_text(input: &str) -> Result<String, String> {
    _compress_text(input).map_err(|e| report_error("compress", e))
}

pub fn _compress_text(input: &str) -> Result<String, CodecError> {
    let report = CompressReport::new(input)?;
    let result = serde_json::to_string(&report)?;
    Ok(result)
}

#[wasm_bindgen]
pub fn decompress_text(input: &str) -> Result<String, String> {
    _decompress_text(input).map_err(|e| report_error("decompress", e))
}

pub fn _decompress_text(input: &str) -> Result<String, CodecError> {
    let data: EncodedData = serde_json::from_str(input)?;
    Ok(huffman::decompress(&data)?)
}

fn report_error(operation: &str, error: impl Display) -> String {
    let message = format!("{}", error);
    warn!(operation, error = %message, "request failed");
    message
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompressReport {
    pub input_len: usize,
    pub input_bits: usize,
    pub input_entropy: f64,
    pub output_bits: usize,
    pub shape_bits: usize,
    pub prefix_table: Vec<PrefixTableEntry>,
    pub encoded_str: Vec<String>,
    pub packed: PackedData,
    pub huffman_tree: String,
    pub data: EncodedData,
}

impl CompressReport {
    pub fn new(input: &str) -> Result<Self, HuffmanError> {
        let freq_table = WeightTable::from_text(input)?;
        let tree = HuffmanTree::from_weights(&freq_table)?;
        let codebook = Codebook::new(&tree);

        let encoded_str = input
            .chars()
            .map(|symbol| {
                codebook
                    .get(symbol)
                    .map(|code| format!("{}", BitStr(code)))
                    .ok_or(HuffmanError::Lookup(symbol))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bits = codebook.encode(input)?;
        let (shape, leaves) = tree.flatten();
        let data = EncodedData {
            shape,
            leaves,
            bits,
        };

        let input_len = freq_table.total() as f64;
        let prefix_table = freq_table
            .iter()
            .map(|(symbol, freq)| {
                let code = codebook.get(symbol).unwrap_or_default();
                PrefixTableEntry {
                    symbol: symbol as u32,
                    symbol_char: stringify_char(symbol),
                    freq,
                    freq_rate: freq as f64 / input_len,
                    len: code.len(),
                    code: format!("{}", BitStr(code)),
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            input_len: freq_table.total(),
            input_bits: input.len() * 8,
            input_entropy: freq_table.entropy(),
            output_bits: data.bits.len(),
            shape_bits: data.shape.len(),
            prefix_table,
            encoded_str,
            packed: data.pack(),
            huffman_tree: tree.render(),
            data,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrefixTableEntry {
    pub symbol: u32,
    pub symbol_char: String,
    pub freq: usize,
    pub freq_rate: f64,
    pub len: usize,
    pub code: String,
}

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    Huffman(HuffmanError),
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<HuffmanError> for CodecError {
    fn from(value: HuffmanError) -> Self {
        Self::Huffman(value)
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CodecError::Huffman(e) => write!(f, "{}", e),
        }
    }
}

fn stringify_char(data: char) -> String {
    if data.is_control() {
        format!("\"{}\"", data.escape_unicode())
    } else {
        format!("\"{}\"", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report() {
        let json = compress_text("STREETTEST").unwrap();
        println!("{json}");
        let report: CompressReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.input_len, 10);
        assert_eq!(report.input_bits, 80);
        assert_eq!(report.output_bits, 19);
        assert_eq!(report.shape_bits, 7);
        assert_eq!(report.data.leaves, ['T', 'R', 'S', 'E']);
        assert_eq!(
            report.encoded_str,
            ["101", "0", "100", "11", "11", "0", "0", "11", "101", "0"]
        );
        assert_eq!(report.packed.bits.len(), 3);
        assert_eq!(report.packed.bit_len, 19);
        assert_eq!(report.packed.shape_len, 7);
        assert_eq!(report.packed.leaves, "TRSE");
        assert_eq!(report.packed.unpack().unwrap(), report.data);

        let table = report
            .prefix_table
            .iter()
            .map(|e| (e.symbol_char.as_str(), e.freq, e.code.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            table,
            [
                ("\"S\"", 2, "101"),
                ("\"T\"", 4, "0"),
                ("\"R\"", 1, "100"),
                ("\"E\"", 3, "11"),
            ]
        );
        assert!((report.input_entropy - 1.846_439_344_671_015).abs() < 1e-9);
        assert!(report.huffman_tree.starts_with("*\n  0: 'T'"));
    }

    #[test]
    fn bits_are_json_integers() {
        let json = compress_text("ab").unwrap();
        assert!(json.contains(r#""data":{"shape":[1,0,0],"leaves":["a","b"],"bits":[0,1]}"#));
    }

    #[test]
    fn round_trip() {
        for input in ["HAPPY HIP HOP", "ñandú – ¿qué?", "a\tb\nc"] {
            let json = compress_text(input).unwrap();
            let report: CompressReport = serde_json::from_str(&json).unwrap();
            let data = serde_json::to_string(&report.data).unwrap();
            assert_eq!(decompress_text(&data).unwrap(), input);
        }
    }

    #[test]
    fn deep_tree() {
        let depth = 200_000;
        let shape = vec!["1"; depth].join(",") + "," + &vec!["0"; depth + 1].join(",");
        let symbols = (0x100..)
            .filter_map(char::from_u32)
            .take(depth + 1)
            .collect::<Vec<_>>();
        let leaves = serde_json::to_string(&symbols).unwrap();
        let json = format!(r#"{{"shape":[{shape}],"leaves":{leaves},"bits":[1]}}"#);
        assert_eq!(decompress_text(&json).unwrap(), symbols[depth].to_string());
    }

    #[test]
    fn errors() {
        assert_eq!(
            compress_text("aaaa").unwrap_err(),
            "at least two distinct characters are required, found 1"
        );
        assert!(
            decompress_text("not json")
                .unwrap_err()
                .starts_with("Invalid JSON")
        );
        assert!(
            decompress_text(r#"{"shape":[2],"leaves":[],"bits":[]}"#)
                .unwrap_err()
                .starts_with("Invalid JSON")
        );
        assert_eq!(
            decompress_text(r#"{"shape":[1,0,0],"leaves":["a","b"],"bits":[1,1,0]}"#).unwrap(),
            "bba"
        );
        assert_eq!(
            decompress_text(r#"{"shape":[1,0],"leaves":["a"],"bits":[]}"#).unwrap_err(),
            "malformed data: tree shape ends inside an incomplete tree"
        );
    }

    #[test]
    fn printable() {
        assert_eq!(stringify_char('a'), "\"a\"");
        assert_eq!(stringify_char(' '), "\" \"");
        assert_eq!(stringify_char('\n'), "\"\\u{a}\"");
        assert_eq!(stringify_char('ñ'), "\"ñ\"");
    }
}
