//! Byte signatures with wildcards
//!
//! A signature is written as whitespace-separated hex bytes, with `?` or `??`
//! standing for a byte that may hold anything:
//!
//! ```text
//! 48 8B 05 ? ? ? ? 48 85 C0
//! ```

use std::fmt;
use std::str::FromStr;

/// Error produced when a signature string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid hex byte '{token}' at position {position}")]
pub struct PatternError {
    /// The offending token
    pub token: String,
    /// Zero-based token index
    pub position: usize,
}

/// A parsed signature: `Some(byte)` must match, `None` matches anything
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BytePattern {
    bytes: Vec<Option<u8>>,
}

impl BytePattern {
    /// Parse a signature string
    ///
    /// Fails only on a token that is neither a wildcard nor a hex byte.
    pub fn parse(signature: &str) -> Result<Self, PatternError> {
        let bytes = signature
            .split_whitespace()
            .enumerate()
            .map(|(position, token)| match token {
                "?" | "??" => Ok(None),
                _ => u8::from_str_radix(token, 16)
                    .map(Some)
                    .map_err(|_| PatternError {
                        token: token.to_string(),
                        position,
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { bytes })
    }

    /// Number of bytes the pattern spans
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the pattern has no bytes at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The pattern's bytes, `None` marking wildcards
    pub fn bytes(&self) -> &[Option<u8>] {
        &self.bytes
    }

    /// Check if the pattern matches at the start of `window`
    ///
    /// `window` must be exactly as long as the pattern.
    #[inline]
    fn matches(&self, window: &[u8]) -> bool {
        self.bytes
            .iter()
            .zip(window)
            .all(|(expected, actual)| expected.map_or(true, |b| b == *actual))
    }

    /// Find the lowest offset in `haystack` where the pattern matches
    ///
    /// An empty pattern, or one longer than the haystack, never matches.
    pub fn scan(&self, haystack: &[u8]) -> Option<usize> {
        if self.bytes.is_empty() || haystack.len() < self.bytes.len() {
            return None;
        }

        haystack
            .windows(self.bytes.len())
            .position(|window| self.matches(window))
    }

    /// Scan a raw memory range
    ///
    /// # Safety
    /// `start .. start + size` must be mapped and readable.
    pub unsafe fn scan_raw(&self, start: *const u8, size: usize) -> Option<usize> {
        if start.is_null() {
            return None;
        }
        self.scan(std::slice::from_raw_parts(start, size))
    }
}

impl FromStr for BytePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match byte {
                Some(b) => write!(f, "{:02X}", b)?,
                None => f.write_str("?")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signature() {
        let pattern = BytePattern::parse("55 48 89 E5").unwrap();
        assert_eq!(
            pattern.bytes(),
            &[Some(0x55), Some(0x48), Some(0x89), Some(0xE5)]
        );

        let pattern = BytePattern::parse("55 ? 89 ??").unwrap();
        assert_eq!(pattern.bytes(), &[Some(0x55), None, Some(0x89), None]);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let pattern = BytePattern::parse("  aa\tBB\n ?  ").unwrap();
        assert_eq!(pattern.bytes(), &[Some(0xAA), Some(0xBB), None]);
    }

    #[test]
    fn test_parse_rejects_bad_token() {
        let err = BytePattern::parse("55 ZZ 89").unwrap_err();
        assert_eq!(err.token, "ZZ");
        assert_eq!(err.position, 1);

        assert!(BytePattern::parse("55 123").is_err());
        assert!(BytePattern::parse("55 ???").is_err());
    }

    #[test]
    fn test_parse_empty_is_empty_pattern() {
        let pattern = BytePattern::parse("   ").unwrap();
        assert!(pattern.is_empty());
        assert_eq!(pattern.scan(&[0x00, 0x01]), None);
    }

    #[test]
    fn test_scan_signature() {
        let data = [0x00, 0x55, 0x48, 0x89, 0xE5, 0x00];
        let pattern = BytePattern::parse("55 48 89 E5").unwrap();
        assert_eq!(pattern.scan(&data), Some(1));
    }

    #[test]
    fn test_scan_signature_with_wildcard() {
        let pattern = BytePattern::parse("AA ?? CC").unwrap();
        assert_eq!(pattern.scan(&[0xAA, 0x42, 0xCC]), Some(0));
        assert_eq!(pattern.scan(&[0xAA, 0x42, 0xCD]), None);
    }

    #[test]
    fn test_scan_returns_first_match() {
        let data = [0x01, 0xAB, 0x02, 0xAB, 0x02, 0xAB, 0x02];
        let pattern = BytePattern::parse("AB 02").unwrap();
        assert_eq!(pattern.scan(&data), Some(1));
    }

    #[test]
    fn test_scan_all_wildcards() {
        let pattern = BytePattern::parse("? ? ? ?").unwrap();
        assert_eq!(pattern.scan(&[9, 8, 7, 6, 5]), Some(0));
        assert_eq!(pattern.scan(&[9, 8, 7, 6]), Some(0));
        assert_eq!(pattern.scan(&[9, 8, 7]), None);
    }

    #[test]
    fn test_scan_pattern_as_long_as_region() {
        let data = [0x10, 0x20, 0x30];
        assert_eq!(BytePattern::parse("10 20 30").unwrap().scan(&data), Some(0));
        assert_eq!(BytePattern::parse("10 20 31").unwrap().scan(&data), None);
        assert_eq!(BytePattern::parse("10 20 30 40").unwrap().scan(&data), None);
    }

    #[test]
    fn test_scan_match_at_last_position() {
        let data = [0x00, 0x00, 0x00, 0xDE, 0xAD];
        assert_eq!(BytePattern::parse("DE AD").unwrap().scan(&data), Some(3));
    }

    #[test]
    fn test_scan_agrees_with_substring_search() {
        // Small deterministic generator so the test needs no extra crates
        let mut state: u32 = 0x1234_5678;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state % 4) as u8
        };

        for _ in 0..200 {
            let haystack: Vec<u8> = (0..64).map(|_| next()).collect();
            let needle: Vec<u8> = (0..3).map(|_| next()).collect();

            let expected = haystack
                .windows(needle.len())
                .position(|w| w == needle.as_slice());

            let signature = needle
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" ");
            let pattern = BytePattern::parse(&signature).unwrap();

            assert_eq!(pattern.scan(&haystack), expected);
        }
    }

    #[test]
    fn test_scan_raw() {
        let data = vec![0x90u8, 0x90, 0x48, 0x8B, 0x05];
        let pattern = BytePattern::parse("48 8B ?").unwrap();
        unsafe {
            assert_eq!(pattern.scan_raw(data.as_ptr(), data.len()), Some(2));
            assert_eq!(pattern.scan_raw(std::ptr::null(), 16), None);
        }
    }

    #[test]
    fn test_display_roundtrip() {
        let pattern: BytePattern = "4c 8b ?? 0d".parse().unwrap();
        assert_eq!(pattern.to_string(), "4C 8B ? 0D");
    }
}
