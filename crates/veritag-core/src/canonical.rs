//! Canonical metadata encoding.
//!
//! Free-form metadata text is normalized into an ordered list of
//! attribute strings, then deterministically encoded and hashed so that
//! every party computes the same commitment for the same metadata. The
//! encoding is the standard ABI head/tail layout for a dynamic string
//! array, which keeps the commitment compatible with on-chain
//! recomputation.

use crate::crypto::{keccak256, Keccak256Hash};

const WORD: usize = 32;

fn abi_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Canonicalize a metadata attribute list: trim each element of
/// surrounding whitespace, drop empties, preserve the order of the
/// survivors. Idempotent.
pub fn canonicalize_metadata(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Split comma-separated metadata text into canonical attribute strings,
/// so `"a,,b"` and `"a, b"` both canonicalize cleanly.
pub fn canonicalize_metadata_text(raw: &str) -> Vec<String> {
    canonicalize_metadata(&raw.split(',').map(str::to_owned).collect::<Vec<_>>())
}

/// ABI-encode a string array: head words with per-element offsets, then
/// a tail per element holding its byte length and padded UTF-8 payload.
pub fn encode_string_array(items: &[String]) -> Vec<u8> {
    let mut heads = Vec::with_capacity((2 + items.len()) * WORD);
    let mut tails = Vec::new();

    // Offset of the array data within the outer encoding, then length.
    heads.extend_from_slice(&abi_word(WORD));
    heads.extend_from_slice(&abi_word(items.len()));

    for item in items {
        // Element offsets are relative to the start of the offset table.
        heads.extend_from_slice(&abi_word(items.len() * WORD + tails.len()));

        let bytes = item.as_bytes();
        tails.extend_from_slice(&abi_word(bytes.len()));
        tails.extend_from_slice(bytes);
        let padding = (WORD - bytes.len() % WORD) % WORD;
        tails.extend_from_slice(&vec![0u8; padding]);
    }

    heads.extend_from_slice(&tails);
    heads
}

/// Hash a canonical metadata list into its 32-byte commitment.
pub fn hash_metadata(items: &[String]) -> Keccak256Hash {
    Keccak256Hash::from_bytes(keccak256(&encode_string_array(items)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonicalize_trims_and_drops_empties() {
        assert_eq!(
            canonicalize_metadata_text("  Red , 128GB,,  ,Refurbished"),
            strings(&["Red", "128GB", "Refurbished"])
        );
        assert_eq!(canonicalize_metadata_text(""), Vec::<String>::new());
        assert_eq!(canonicalize_metadata_text(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn test_canonicalize_sequence_form() {
        assert_eq!(
            canonicalize_metadata(&strings(&["  Red  ", "", "128GB", "   "])),
            strings(&["Red", "128GB"])
        );

        // Idempotent: canonical input passes through unchanged.
        let canonical = strings(&["Red", "128GB"]);
        assert_eq!(canonicalize_metadata(&canonical), canonical);
    }

    #[test]
    fn test_canonicalize_preserves_order() {
        assert_eq!(canonicalize_metadata_text("b,a,c"), strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_encode_single_string_layout() {
        let encoded = encode_string_array(&strings(&["ab"]));
        // outer offset, length 1, element offset, byte length, padded payload
        assert_eq!(encoded.len(), 5 * WORD);
        assert_eq!(encoded[31], 0x20);
        assert_eq!(encoded[63], 1);
        assert_eq!(encoded[95], 0x20);
        assert_eq!(encoded[127], 2);
        assert_eq!(&encoded[128..130], b"ab");
        assert!(encoded[130..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_array_hash() {
        assert_eq!(
            hash_metadata(&[]).to_hex(),
            "0x569e75fc77c1a856f6daaf9e69d8a9566ca34aa47f9133711ce065a571af0cfd"
        );
    }

    #[test]
    fn test_metadata_hash_golden_vector() {
        assert_eq!(
            hash_metadata(&strings(&["Red", "128GB"])).to_hex(),
            "0xa2fb16202897754a063687661e1090d7431bce9d29d40b6f47bc128694e0b244"
        );
    }

    #[test]
    fn test_hash_sensitive_to_order_and_content() {
        let base = hash_metadata(&strings(&["Red", "128GB"]));
        assert_ne!(base, hash_metadata(&strings(&["128GB", "Red"])));
        assert_ne!(base, hash_metadata(&strings(&["Red", "256GB"])));
        assert_ne!(base, hash_metadata(&strings(&["Red"])));
    }
}
