pub use encode::*;
pub use segments::*;

// Segment constructors
//------------------------------------------------------------------------------

pub mod segments {
    use encoding_rs::SHIFT_JIS;

    use crate::common::bitstream::BitStream;
    use crate::common::codec::{Mode, Segment};
    use crate::common::error::{QRError, QRResult};

    pub fn is_numeric(text: &str) -> bool {
        text.bytes().all(|b| Mode::Numeric.contains(b))
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.bytes().all(|b| Mode::Alphanumeric.contains(b))
    }

    pub fn is_kanji(text: &str) -> bool {
        shift_jis_pairs(text).is_some()
    }

    // Shift JIS double byte chars within the kanji mode ranges
    fn shift_jis_pairs(text: &str) -> Option<Vec<[u8; 2]>> {
        let (sjis, _, had_errors) = SHIFT_JIS.encode(text);
        if had_errors || sjis.len() % 2 != 0 {
            return None;
        }
        sjis.chunks_exact(2)
            .map(|c| {
                let code = ((c[0] as u16) << 8) | c[1] as u16;
                matches!(code, 0x8140..=0x9FFC | 0xE040..=0xEBBF).then_some([c[0], c[1]])
            })
            .collect()
    }

    impl Segment {
        pub fn make_numeric(text: &str) -> QRResult<Segment> {
            if !is_numeric(text) {
                return Err(QRError::InvalidChar);
            }
            Ok(numeric_segment(text.as_bytes()))
        }

        pub fn make_alphanumeric(text: &str) -> QRResult<Segment> {
            if !is_alphanumeric(text) {
                return Err(QRError::InvalidChar);
            }
            Ok(alphanumeric_segment(text.as_bytes()))
        }

        pub fn make_bytes(data: &[u8]) -> QRResult<Segment> {
            if data.len() > i32::MAX as usize {
                return Err(QRError::DataTooLong {
                    required: data.len().saturating_mul(8),
                    available: (i32::MAX as usize) * 8,
                });
            }
            Ok(byte_segment(data))
        }

        pub fn make_kanji(text: &str) -> QRResult<Segment> {
            let pairs = shift_jis_pairs(text).ok_or(QRError::InvalidChar)?;
            let mut bs = BitStream::with_capacity(Mode::Kanji.encoded_len(pairs.len()));
            for p in pairs.iter() {
                bs.push_bits(Mode::Kanji.encode_chunk(p), 13);
            }
            Ok(Segment::new(Mode::Kanji, pairs.len(), bs))
        }

        /// Extended Channel Interpretation designator.
        pub fn make_eci(assign_val: u32) -> QRResult<Segment> {
            let mut bs = BitStream::with_capacity(24);
            match assign_val {
                0..=0x7F => bs.push_bits(assign_val, 8),
                0x80..=0x3FFF => {
                    bs.push_bits(0b10u8, 2);
                    bs.push_bits(assign_val, 14);
                }
                0x4000..=999_999 => {
                    bs.push_bits(0b110u8, 3);
                    bs.push_bits(assign_val, 21);
                }
                _ => return Err(QRError::InvalidEci),
            }
            Ok(Segment::new(Mode::Eci, 0, bs))
        }

        /// Picks a single mode for the whole text: numeric, else alphanumeric,
        /// else UTF-8 bytes. Empty text has no segments.
        pub fn make_segments(text: &str) -> Vec<Segment> {
            if text.is_empty() {
                vec![]
            } else if is_numeric(text) {
                vec![numeric_segment(text.as_bytes())]
            } else if is_alphanumeric(text) {
                vec![alphanumeric_segment(text.as_bytes())]
            } else {
                vec![byte_segment(text.as_bytes())]
            }
        }
    }

    fn numeric_segment(data: &[u8]) -> Segment {
        let mut bs = BitStream::with_capacity(Mode::Numeric.encoded_len(data.len()));
        for chunk in data.chunks(3) {
            let len = (chunk.len() * 10 + 2) / 3;
            bs.push_bits(Mode::Numeric.encode_chunk(chunk), len);
        }
        Segment::new(Mode::Numeric, data.len(), bs)
    }

    fn alphanumeric_segment(data: &[u8]) -> Segment {
        let mut bs = BitStream::with_capacity(Mode::Alphanumeric.encoded_len(data.len()));
        for chunk in data.chunks(2) {
            let len = (chunk.len() * 11 + 1) / 2;
            bs.push_bits(Mode::Alphanumeric.encode_chunk(chunk), len);
        }
        Segment::new(Mode::Alphanumeric, data.len(), bs)
    }

    fn byte_segment(data: &[u8]) -> Segment {
        let mut bs = BitStream::with_capacity(Mode::Byte.encoded_len(data.len()));
        bs.extend(data);
        Segment::new(Mode::Byte, data.len(), bs)
    }

}

// Version planning & bit stream assembly
//------------------------------------------------------------------------------

pub mod encode {
    use crate::common::bitstream::BitStream;
    use crate::common::codec::Segment;
    use crate::common::debug::debug_log;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    /// Total bits the segments need at `ver`, or `None` if a char count overflows
    /// its field or the sum overflows.
    pub fn total_bits(segs: &[Segment], ver: Version) -> Option<usize> {
        segs.iter().try_fold(0usize, |acc, s| acc.checked_add(s.bit_len(ver)?))
    }

    /// Smallest version in `min..=max` that holds the segments, with the bits used.
    pub fn find_version(
        segs: &[Segment],
        ecl: ECLevel,
        min: Version,
        max: Version,
    ) -> QRResult<(Version, usize)> {
        if min > max {
            return Err(QRError::InvalidVersionRange);
        }
        for v in *min..=*max {
            let ver = Version(v);
            let bcap = ver.data_bit_capacity(ecl);
            if let Some(sz) = total_bits(segs, ver) {
                if sz <= bcap {
                    return Ok((ver, sz));
                }
            }
        }
        match total_bits(segs, max) {
            Some(required) => {
                Err(QRError::DataTooLong { required, available: max.data_bit_capacity(ecl) })
            }
            None => Err(QRError::SegmentTooLong),
        }
    }

    // Raises the ec level one step at a time while the data still fits
    pub fn boost_ec_level(used_bits: usize, ver: Version, ecl: ECLevel) -> ECLevel {
        let mut res = ecl;
        for new_ecl in [ECLevel::M, ECLevel::Q, ECLevel::H] {
            if new_ecl > res && used_bits <= ver.data_bit_capacity(new_ecl) {
                res = new_ecl;
            }
        }
        res
    }

    /// Data codewords for the segments at a fixed version & ec level, padded to capacity.
    pub fn encode_with_version(segs: &[Segment], ver: Version, ecl: ECLevel) -> QRResult<Vec<u8>> {
        let bcap = ver.data_bit_capacity(ecl);
        let sz = total_bits(segs, ver).ok_or(QRError::SegmentTooLong)?;
        if sz > bcap {
            return Err(QRError::DataTooLong { required: sz, available: bcap });
        }

        let mut bs = BitStream::with_capacity(bcap);
        for seg in segs {
            push_segment(seg, ver, &mut bs);
        }
        if bs.len() != sz {
            return Err(QRError::Internal("segment bit length differs from planned length"));
        }

        push_terminator(&mut bs, bcap);
        pad_remaining_capacity(&mut bs, bcap);
        if bs.len() != bcap {
            return Err(QRError::Internal("padded bit stream doesn't fill data capacity"));
        }
        debug_log!("Encoded {sz} data bits into {} codewords", bcap >> 3);
        Ok(bs.data().to_vec())
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bitstream::BitStream;
    use crate::common::codec::{Segment, PADDING_CODEWORDS};
    use crate::common::metadata::Version;

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitStream) {
        push_header(seg, ver, out);
        out.extend_bits(seg.data());
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitStream) {
        out.push_bits(seg.mode().indicator(), ver.mode_bits());
        let len_bits = ver.char_cnt_bits(seg.mode());
        let char_cnt = seg.char_count();
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u32, len_bits);
    }

    pub fn push_terminator(out: &mut BitStream, bit_capacity: usize) {
        let bit_len = out.len();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream, bit_capacity: usize) {
        push_padding_bits(out);
        push_padding_codewords(out, bit_capacity);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream, bit_capacity: usize) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = bit_capacity.saturating_sub(out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
