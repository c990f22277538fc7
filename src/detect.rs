/*!
 * Binary content detection
 */

/// Number of leading bytes sampled for classification
pub const SAMPLE_SIZE: usize = 8192;

/// Classifies a byte sample as text or binary
pub trait BinaryDetector {
    /// Returns true when the sample should not be rendered as text
    fn is_binary(&self, sample: &[u8]) -> bool;
}

/// Default detector: NUL bytes, control-character ratio and UTF-8 validity
#[derive(Debug, Clone, Copy)]
pub struct HeuristicDetector {
    /// Maximum share of control bytes tolerated in a text file
    pub control_ratio: f32,
}

impl Default for HeuristicDetector {
    fn default() -> Self {
        Self { control_ratio: 0.1 }
    }
}

impl BinaryDetector for HeuristicDetector {
    fn is_binary(&self, sample: &[u8]) -> bool {
        if sample.is_empty() {
            return false;
        }

        if sample.contains(&0) {
            return true;
        }

        // A sample may end in the middle of a multi-byte character
        if let Err(e) = std::str::from_utf8(sample) {
            if e.error_len().is_some() {
                return true;
            }
        }

        // Control characters other than \t \n \v \f \r (plus DEL)
        let control_count = sample
            .iter()
            .filter(|&&b| b < 9 || (b > 13 && b < 32) || b == 127)
            .count();
        let control_ratio = control_count as f32 / sample.len() as f32;

        control_ratio >= self.control_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_not_binary() {
        let detector = HeuristicDetector::default();
        assert!(!detector.is_binary(b"fn main() {\n\tprintln!(\"hi\");\r\n}\n"));
        assert!(!detector.is_binary("héllo wörld ✓".as_bytes()));
        assert!(!detector.is_binary(b""));
    }

    #[test]
    fn test_nul_byte_is_binary() {
        let detector = HeuristicDetector::default();
        assert!(detector.is_binary(b"text\0more text"));
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        let detector = HeuristicDetector::default();
        assert!(detector.is_binary(&[b'a', 0xff, 0xfe, b'b']));
    }

    #[test]
    fn test_cut_multibyte_char_at_end_is_text() {
        let detector = HeuristicDetector::default();
        let bytes = "abc✓".as_bytes();
        assert!(!detector.is_binary(&bytes[..bytes.len() - 1]));
    }

    #[test]
    fn test_control_ratio_threshold() {
        let detector = HeuristicDetector::default();
        let mut sample = vec![b'a'; 100];
        sample[..5].fill(0x1b);
        assert!(!detector.is_binary(&sample));
        sample[..9].fill(0x1b);
        assert!(!detector.is_binary(&sample));
        sample[..10].fill(0x1b);
        assert!(detector.is_binary(&sample));
        sample[..20].fill(0x1b);
        assert!(detector.is_binary(&sample));
    }
}
