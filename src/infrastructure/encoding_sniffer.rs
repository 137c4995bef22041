// ============================================================
// ENCODING SNIFFER
// ============================================================
// Statistical best-guess text encoding for an opaque byte buffer

use encoding_rs::{Encoding, EUC_KR, SHIFT_JIS, UTF_8, WINDOWS_1252};

/// Best-effort encoding detection. Never fails: low-confidence input
/// falls back to windows-1252, which decodes any byte sequence.
pub struct EncodingSniffer;

impl EncodingSniffer {
    /// Guess the encoding of `bytes` from its byte distribution.
    pub fn sniff(bytes: &[u8]) -> &'static Encoding {
        if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) || std::str::from_utf8(bytes).is_ok() {
            return UTF_8;
        }

        let euc_kr = Self::score_euc_kr(bytes);
        let shift_jis = Self::score_shift_jis(bytes);

        // Ties prefer EUC-KR, the dominant legacy feed encoding.
        if euc_kr <= 0 && shift_jis <= 0 {
            WINDOWS_1252
        } else if shift_jis > euc_kr {
            SHIFT_JIS
        } else {
            EUC_KR
        }
    }

    /// Score the high-byte sequences as EUC-KR double-byte pairs.
    /// Pairs inside the precomposed hangul block weigh double; any
    /// invalid sequence is penalized.
    fn score_euc_kr(bytes: &[u8]) -> i64 {
        let mut score = 0i64;
        let mut i = 0;
        while i < bytes.len() {
            let lead = bytes[i];
            if lead < 0x80 {
                i += 1;
                continue;
            }
            let trail = match bytes.get(i + 1) {
                Some(&b) => b,
                None => {
                    score -= 2;
                    break;
                }
            };
            if (0x81..=0xFE).contains(&lead) && (0x41..=0xFE).contains(&trail) {
                if (0xB0..=0xC8).contains(&lead) && trail >= 0xA1 {
                    score += 2;
                } else {
                    score += 1;
                }
                i += 2;
            } else {
                score -= 2;
                i += 1;
            }
        }
        score
    }

    /// Score the high-byte sequences as Shift_JIS. Single-byte
    /// half-width katakana and kana-block pairs are both valid.
    fn score_shift_jis(bytes: &[u8]) -> i64 {
        let mut score = 0i64;
        let mut i = 0;
        while i < bytes.len() {
            let lead = bytes[i];
            if lead < 0x80 {
                i += 1;
                continue;
            }
            if (0xA1..=0xDF).contains(&lead) {
                score += 1;
                i += 1;
                continue;
            }
            let is_lead = (0x81..=0x9F).contains(&lead) || (0xE0..=0xFC).contains(&lead);
            let trail = bytes.get(i + 1).copied().unwrap_or(0);
            let is_trail = (0x40..=0xFC).contains(&trail) && trail != 0x7F;
            if is_lead && is_trail {
                if lead == 0x82 || lead == 0x83 {
                    score += 2;
                } else {
                    score += 1;
                }
                i += 2;
            } else {
                score -= 2;
                i += 1;
            }
        }
        score
    }
}
