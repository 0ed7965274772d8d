//! GF(2^8) arithmetic under the AES polynomial x^8 + x^4 + x^3 + x + 1 (0x11B)

/// Low byte of the reduction polynomial
const REDUCTION: u8 = 0x1b;

/// Multiply two field elements (carry-less "peasant" multiplication)
#[inline(always)]
pub const fn multiply(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    let mut i = 0;

    while i < 8 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= REDUCTION;
        }
        b >>= 1;
        i += 1;
    }

    product
}

/// MDS combination of one column: circ(2, 3, 1, 1)
///
/// Shared by the per-Word AES MixColumns and the grid level BIG.MixColumns.
#[inline(always)]
pub const fn mix_column(a: u8, b: u8, c: u8, d: u8) -> [u8; 4] {
    [
        multiply(2, a) ^ multiply(3, b) ^ c ^ d,
        a ^ multiply(2, b) ^ multiply(3, c) ^ d,
        a ^ b ^ multiply(2, c) ^ multiply(3, d),
        multiply(3, a) ^ b ^ c ^ multiply(2, d),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_products() {
        // FIPS-197 section 4.2 examples
        assert_eq!(multiply(0x57, 0x83), 0xc1);
        assert_eq!(multiply(0x57, 0x13), 0xfe);
        assert_eq!(multiply(0x57, 0x02), 0xae);
        assert_eq!(multiply(0x57, 0x04), 0x47);
        assert_eq!(multiply(0x80, 0x02), 0x1b);
    }

    #[test]
    fn test_identity_and_zero() {
        for a in 0..=255u8 {
            assert_eq!(multiply(a, 0), 0, "a * 0 for a = {:#04x}", a);
            assert_eq!(multiply(a, 1), a, "a * 1 for a = {:#04x}", a);
        }
    }

    #[test]
    fn test_commutative_exhaustive() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(multiply(a, b), multiply(b, a));
            }
        }
    }

    #[test]
    fn test_mix_column_fips_vector() {
        // First column of FIPS-197 Appendix B, round 1
        assert_eq!(mix_column(0xd4, 0xbf, 0x5d, 0x30), [0x04, 0x66, 0x81, 0xe5]);
    }

    proptest! {
        #[test]
        fn multiply_distributes_over_xor(a: u8, b: u8, c: u8) {
            prop_assert_eq!(multiply(a, b ^ c), multiply(a, b) ^ multiply(a, c));
        }

        #[test]
        fn multiply_is_associative(a: u8, b: u8, c: u8) {
            prop_assert_eq!(multiply(multiply(a, b), c), multiply(a, multiply(b, c)));
        }
    }
}
