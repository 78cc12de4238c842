/// XOR checksum carried in every packet header.
pub struct Checksum;

impl Checksum {
    /// XOR of every payload byte, widened to the header's 16-bit field.
    pub fn new(payload: &[u8]) -> u16 {
        payload.iter().fold(0u16, |checksum, &byte| checksum ^ byte as u16)
    }

    pub fn check(checksum: u16, payload: &[u8]) -> bool {
        checksum == Checksum::new(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty_payload() {
        assert_eq!(Checksum::new(&[]), 0);
    }

    #[test]
    fn test_checksum_multiple_bytes() {
        // 0x01 ^ 0x02 ^ 0x03 cancels out.
        assert_eq!(Checksum::new(&[0x01, 0x02, 0x03]), 0);
        assert_eq!(Checksum::new(&[0xAB]), 0xAB);
    }

    #[test]
    fn test_checksum_check() {
        let payload = br#"{"action":"endTurn"}"#;
        assert!(Checksum::check(Checksum::new(payload), payload));
        assert!(!Checksum::check(0xFF00, payload));
    }
}
