use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

/// Append-only sequence of bits, packed most significant bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self { data: Vec::new(), len: 0 }
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self { data: Vec::with_capacity(bit_capacity.div_ceil(8)), len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes; the unused tail of the last byte is zero.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "Bit index out of range: Index {i}, Length {}", self.len);
        self.data[i >> 3] & (0b1000_0000 >> (i & 7)) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}

impl From<&[u8]> for BitStream {
    fn from(inp: &[u8]) -> Self {
        Self { data: inp.to_vec(), len: inp.len() << 3 }
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    /// Appends the low `size` bits of `bits`, big endian. `size` must be at most 31
    /// and `bits` must fit in it.
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        assert!(size <= 31, "Bit count should be at most 31: Length {size}");
        let max_bits = mem::size_of::<T>() * 8;
        assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );

        let bits = bits.to_u32().expect("Value fits in 31 bits");
        for i in (0..size).rev() {
            self.push((bits >> i) & 1 == 1);
        }
    }

    pub fn push(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.len >> 3] |= 0b1000_0000 >> offset;
        }
        self.len += 1;
    }

    pub fn extend(&mut self, arr: &[u8]) {
        if self.len & 7 == 0 {
            self.data.extend_from_slice(arr);
            self.len += arr.len() << 3;
        } else {
            arr.iter().for_each(|b| self.push_bits(*b, 8));
        }
    }

    pub fn extend_bits(&mut self, other: &BitStream) {
        other.iter().for_each(|b| self.push(b));
    }
}
