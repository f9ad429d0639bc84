use std::ops::Deref;

use crate::common::{
    ec::{generator_polynomial, remainder},
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};

/// Splits data into blocks, appends ecc to each and interleaves them into the
/// final codeword sequence.
pub(crate) fn add_ecc_and_interleave(
    data: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> QRResult<Vec<u8>> {
    if data.len() != version.data_codewords(ec_level) {
        return Err(QRError::Internal("Data codeword count doesn't match version capacity"));
    }

    let (data_blocks, ecc_blocks) = ecc(data, version, ec_level);

    let mut res = interleave(&data_blocks);
    res.extend(interleave(&ecc_blocks));

    if res.len() != version.total_codewords() {
        return Err(QRError::Internal("Interleaved length doesn't match total codewords"));
    }
    Ok(res)
}

// ECC: Error Correction Codeword generator
pub(crate) fn ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, version, ec_level);

    let ecc_size_per_block = version.ecc_per_block(ec_level);
    let gen_poly = generator_polynomial(ecc_size_per_block);
    let ecc_blocks = data_blocks.iter().map(|b| remainder(b, &gen_poly)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

// Short blocks first, then long blocks with one extra data codeword
pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// Column-wise read across blocks, skipping blocks already exhausted
pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}

// Correctable codewords, less the misdecode protection codewords of small symbols
pub(crate) fn error_correction_capacity(version: Version, ec_level: ECLevel) -> usize {
    let p = match (*version, ec_level) {
        (1, ECLevel::L) => 3,
        (1, ECLevel::M) | (2, ECLevel::L) => 2,
        (1, _) | (3, ECLevel::L) => 1,
        _ => 0,
    };
    let ec_bytes = version.num_blocks(ec_level) * version.ecc_per_block(ec_level);
    (ec_bytes - p) / 2
}
