mod galois;

pub(crate) use galois::*;

// Reed Solomon polynomials
//------------------------------------------------------------------------------

/// Coefficients of the monic generator polynomial (x - α^0)(x - α^1)...(x - α^(degree-1)),
/// highest power first with the leading 1 dropped.
pub fn generator_polynomial(degree: usize) -> Vec<u8> {
    assert!((1..=255).contains(&degree), "Degree out of range: {degree}");

    let mut res = vec![0u8; degree];
    res[degree - 1] = 1;

    // Multiply by (x - α^i) for each root, i.e. by x then add α^i times the current poly
    for i in 0..degree {
        let root = exp(i);
        for j in 0..degree {
            res[j] = mul(res[j], root);
            if j + 1 < degree {
                res[j] ^= res[j + 1];
            }
        }
    }
    res
}

/// Remainder of data(x)·x^n divided by the generator, n being the generator's degree.
/// The coefficients are the ecc codewords.
pub fn remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    let mut res = vec![0u8; divisor.len()];
    for &b in data {
        let factor = b ^ res[0];
        res.rotate_left(1);
        let last = res.len() - 1;
        res[last] = 0;
        if factor == 0 {
            continue;
        }
        for (r, &d) in res.iter_mut().zip(divisor.iter()) {
            *r ^= mul(d, factor);
        }
    }
    res
}
