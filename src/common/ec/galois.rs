// GF(256) arithmetic with reducing polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const REDUCING_POLYNOMIAL: u16 = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= REDUCING_POLYNOMIAL;
        }
        i += 1;
    }
    table[255] = table[0];
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

pub(crate) static EXP_TABLE: [u8; 256] = build_exp_table();

pub(crate) static LOG_TABLE: [u8; 256] = build_log_table();

// α^i for the primitive element α = 0x02
pub(crate) fn exp(i: usize) -> u8 {
    EXP_TABLE[i % 255]
}

pub(crate) fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}
