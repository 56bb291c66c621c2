//! Bit processing utilities
use crate::{FormatError, HuffmanError};
use alloc::vec::Vec;
use core::fmt;
use core::slice::Iter;
use serde::{Deserialize, Serialize};

/// A single binary digit of a code, a tree shape or a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_one(self) -> bool {
        matches!(self, Self::One)
    }
}

impl From<bool> for Bit {
    #[inline]
    fn from(value: bool) -> Self {
        if value { Self::One } else { Self::Zero }
    }
}

impl From<Bit> for bool {
    #[inline]
    fn from(value: Bit) -> Self {
        value.is_one()
    }
}

impl From<Bit> for u8 {
    #[inline]
    fn from(value: Bit) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for Bit {
    type Error = InvalidBit;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            _ => Err(InvalidBit(value)),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Value other than 0 or 1 given where a bit was expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBit(pub u8);

impl fmt::Display for InvalidBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid bit value {}", self.0)
    }
}

/// Displays a bit slice as a string of `0` and `1`
pub struct BitStr<'a>(pub &'a [Bit]);

impl fmt::Display for BitStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = f.width() {
            if width > self.0.len() {
                for _ in 0..width - self.0.len() {
                    write!(f, " ")?;
                }
            }
        }
        for bit in self.0 {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

/// Number of bytes needed to hold `bit_len` bits
#[inline]
pub const fn packed_len(bit_len: usize) -> usize {
    bit_len.div_ceil(8)
}

pub fn pack_bits(bits: &[Bit]) -> Vec<u8> {
    let mut writer = BitStreamWriter::new();
    writer.push_slice(bits);
    writer.into_bytes()
}

pub fn unpack_bits(bytes: &[u8], bit_len: usize) -> Result<Vec<Bit>, HuffmanError> {
    if bytes.len() != packed_len(bit_len) {
        return Err(FormatError::PackedLength {
            bytes: bytes.len(),
            bits: bit_len,
        }
        .into());
    }
    Ok(BitStreamReader::new(bytes).take(bit_len).collect())
}

/// Packs bits into bytes, least significant bit first
pub struct BitStreamWriter {
    buf: Vec<u8>,
    acc: u8,
    bit_position: u8,
}

impl BitStreamWriter {
    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            acc: 0,
            bit_position: 0,
        }
    }

    #[inline]
    pub fn bit_count(&self) -> usize {
        self.buf.len() * 8 + self.bit_position as usize
    }

    #[inline]
    pub fn push_slice(&mut self, value: &[Bit]) {
        for &bit in value.iter() {
            self.push(bit);
        }
    }

    pub fn push(&mut self, bit: Bit) {
        self.acc |= bit.as_u8() << self.bit_position;
        self.bit_position += 1;
        if self.bit_position == 8 {
            self.buf.push(self.acc);
            self.acc = 0;
            self.bit_position = 0;
        }
    }

    fn flush(&mut self) {
        if self.bit_position > 0 {
            self.buf.push(self.acc);
            self.acc = 0;
            self.bit_position = 0;
        }
    }

    #[inline]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.buf
    }
}

impl Default for BitStreamWriter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

pub struct BitStreamReader<'a> {
    iter: Iter<'a, u8>,
    acc: u8,
    bit_position: u8,
}

impl<'a> BitStreamReader<'a> {
    #[inline]
    pub fn new(slice: &'a [u8]) -> Self {
        Self {
            iter: slice.iter(),
            acc: 0,
            bit_position: 8,
        }
    }
}

impl BitStreamReader<'_> {
    pub fn read(&mut self) -> Option<Bit> {
        if self.bit_position == 8 {
            self.acc = *self.iter.next()?;
            self.bit_position = 0;
        }
        let bit = (self.acc >> self.bit_position) & 1;
        self.bit_position += 1;
        Some(Bit::from(bit != 0))
    }
}

impl Iterator for BitStreamReader<'_> {
    type Item = Bit;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}
