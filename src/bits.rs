/// Count zero bits before the first `1`, scanning bytes in order and each byte
/// from its most significant bit. An all-zero input yields `8 * len`.
pub fn leading_zero_bits(digest: &[u8]) -> u32 {
    let mut count = 0u32;
    for byte in digest {
        if *byte == 0 {
            count += 8;
            continue;
        }
        count += byte.leading_zeros();
        break;
    }
    count
}

/// Whether `digest` carries at least `bits` leading zero bits.
#[inline]
pub fn meets_leading_zero_bits(digest: &[u8], bits: u32) -> bool {
    leading_zero_bits(digest) >= bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_counts_every_bit() {
        assert_eq!(leading_zero_bits(&[0u8; 64]), 512);
        assert_eq!(leading_zero_bits(&[0u8; 3]), 24);
        assert_eq!(leading_zero_bits(&[]), 0);
    }

    #[test]
    fn high_first_byte_has_no_leading_zeros() {
        assert_eq!(leading_zero_bits(&[0x80, 0x00]), 0);
        assert_eq!(leading_zero_bits(&[0xff, 0x00]), 0);
    }

    #[test]
    fn stops_at_first_set_bit_across_bytes() {
        assert_eq!(leading_zero_bits(&[0x00, 0x40, 0xff]), 9);
        assert_eq!(leading_zero_bits(&[0x00, 0x00, 0x01]), 23);
        assert_eq!(leading_zero_bits(&[0x01, 0x00]), 7);
    }

    #[test]
    fn threshold_check() {
        let digest = [0x00, 0x0f, 0xff];
        assert!(meets_leading_zero_bits(&digest, 0));
        assert!(meets_leading_zero_bits(&digest, 12));
        assert!(!meets_leading_zero_bits(&digest, 13));
    }
}
