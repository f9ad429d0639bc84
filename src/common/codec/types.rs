use crate::common::bitstream::BitStream;
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
    Eci = 0b0111,
}

impl Mode {
    // 4 bit mode indicator
    pub fn indicator(self) -> u8 {
        self as u8
    }

    // Char count field widths for versions 1-9, 10-26 & 27-40
    pub fn char_cnt_bits(self) -> [usize; 3] {
        match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji => [8, 10, 12],
            Self::Eci => [0, 0, 0],
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conver: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conver: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conver: {len}");
                data[0] as u16
            }
            Self::Kanji => {
                debug_assert!(len == 2, "Kanji chunk should be a Shift JIS pair: {len}");
                let sjis = ((data[0] as u16) << 8) | data[1] as u16;
                let off = match sjis {
                    0x8140..=0x9FFC => sjis - 0x8140,
                    _ => sjis - 0xC140,
                };
                (off >> 8) * 0xC0 + (off & 0xFF)
            }
            Self::Eci => unreachable!("Cannot encode in ECI mode"),
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(
                    byte,
                    b'0'..=b'9'
                        | b'A'..=b'Z'
                        | b' '
                        | b'$'
                        | b'%'
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'/'
                        | b':'
                )
            }
            Self::Byte => true,
            Self::Kanji | Self::Eci => false,
        }
    }

    // Bit length of `len` encoded chars
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
            Self::Eci => unreachable!("ECI length depends on the assignment value"),
        }
    }
}


// Segment
//------------------------------------------------------------------------------

/// A run of data encoded in a single mode. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: Mode,
    // Chars for numeric, alphanumeric & kanji; bytes for byte mode; 0 for ECI
    char_cnt: usize,
    data: BitStream,
}

impl Segment {
    /// Low level constructor. The char count must agree with the mode and the
    /// bit length of `data`; this isn't checked.
    pub fn new(mode: Mode, char_cnt: usize, data: BitStream) -> Self {
        Self { mode, char_cnt, data }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn char_count(&self) -> usize {
        self.char_cnt
    }

    pub fn data(&self) -> &BitStream {
        &self.data
    }

    /// Header plus data bits at the given version, or `None` if the char count
    /// doesn't fit the count field.
    pub fn bit_len(&self, ver: Version) -> Option<usize> {
        let len_bits = ver.char_cnt_bits(self.mode);
        if self.char_cnt >= 1 << len_bits {
            return None;
        }
        (ver.mode_bits() + len_bits).checked_add(self.data.len())
    }
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
