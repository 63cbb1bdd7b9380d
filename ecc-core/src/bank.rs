//! Bank name normalization for truncated / garbled pay-bank tokens.
//!
//! The report renders the pay bank in a narrow column, so long names arrive cut to
//! five or six letters. Exact key match only; unknown tokens pass through untouched
//! and become a natural place for per-institution configuration later.

const BANK_NAME_FIXES: &[(&str, &str)] = &[
    ("CITIZE", "CITIZENS"),
    ("KUMARI", "KUMARI"),
    ("KUMA", "KUMARI"),
    ("SIDDHA", "SIDDHARTHA"),
    ("SIDDH", "SIDDHARTHA"),
    ("MACHI", "MACHAPUCHARE"),
    ("MACHA", "MACHAPUCHARE"),
    ("SUNRI", "SUNRISE"),
    ("EXCEL", "EXCEL"),
];

/// Map a raw bank token to its canonical name.
pub fn normalize_bank_name(raw: &str) -> String {
    BANK_NAME_FIXES
        .iter()
        .find(|(key, _)| *key == raw)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// True when `name` is one of the canonical names the fix table produces.
pub fn is_canonical_bank(name: &str) -> bool {
    BANK_NAME_FIXES.iter().any(|(_, canonical)| *canonical == name)
}
