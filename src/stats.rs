use log::debug;

use crate::tree::FreqTable;

/// Shannon entropy in bits per symbol. Zero for an empty table.
pub fn entropy_from_freq(freq: &FreqTable) -> f64 {
    let total: u64 = freq.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total_f = total as f64;

    let entropy: f64 = freq
        .values()
        .map(|&count| {
            let p = count as f64 / total_f;
            -p * p.log2()
        })
        .sum();

    debug!(
        "Calculated entropy: {:.4} bits/symbol (Total samples: {})",
        entropy, total
    );
    entropy
}

/// Sizes and entropy of one compress or decompress run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    /// Size of the text in UTF-8 bytes.
    pub plain_bytes: u64,
    /// Size of the container, header included.
    pub packed_bytes: u64,
    pub distinct_symbols: usize,
    pub entropy: f64,
}

impl CompressionReport {
    /// Space saved relative to the text, in percent. Negative when the
    /// container is larger than the text.
    pub fn space_saving(&self) -> f64 {
        if self.plain_bytes > 0 {
            100.0 * (1.0 - (self.packed_bytes as f64) / (self.plain_bytes as f64))
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::count_frequencies;

    #[test]
    fn uniform_alphabet_entropy() {
        let e = entropy_from_freq(&count_frequencies("abcdabcd"));
        assert!((e - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_symbol_has_zero_entropy() {
        assert_eq!(entropy_from_freq(&count_frequencies("aaaa")), 0.0);
        assert_eq!(entropy_from_freq(&FreqTable::new()), 0.0);
    }

    #[test]
    fn ratios() {
        let mut report = CompressionReport {
            plain_bytes: 200,
            packed_bytes: 50,
            distinct_symbols: 3,
            entropy: 1.5,
        };
        assert!((report.space_saving() - 75.0).abs() < 1e-9);

        report.packed_bytes = 300;
        assert!((report.space_saving() + 50.0).abs() < 1e-9);

        report.plain_bytes = 0;
        assert_eq!(report.space_saving(), 0.0);
    }
}
