/// CRC64 polynomial from ECMA-182, reflected.
const POLY: u64 = 0xC96C_5795_D787_0F42;

/// 256-entry lookup table, built from the polynomial at compile time.
const TABLE: [u64; 256] = {
    let mut table = [0u64; 256];
    let mut n = 0;
    while n < 256 {
        let mut crc = n as u64;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { POLY ^ (crc >> 1) } else { crc >> 1 };
            bit += 1;
        }
        table[n] = crc;
        n += 1;
    }
    table
};

/// Updates a CRC64 value with `buf`. Start a new calculation by passing zero,
/// continue one by passing the previously returned value.
pub fn crc64(crc: u64, buf: &[u8]) -> u64 {
    let mut crc = !crc;
    for &byte in buf {
        crc = TABLE[((crc ^ u64::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    !crc
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use super::crc64;

    #[test]
    fn check_value() {
        assert_eq!(crc64(0, b"123456789"), 0x995D_C9BB_DF19_39FA);
    }

    #[test]
    fn resumable() {
        assert_eq!(crc64(crc64(0, b"12345"), b"6789"), crc64(0, b"123456789"));
    }
}
