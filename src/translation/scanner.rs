#[derive(Clone, Copy)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Bracketed,
    LineComment,
    BlockComment(u32),
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan an identifier starting at `start`; returns the end index and the name.
pub(super) fn scan_identifier(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let first = *bytes.get(start)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && is_ident_byte(bytes[idx]) {
        idx += 1;
    }
    std::str::from_utf8(&bytes[start..idx])
        .ok()
        .map(|name| (idx, name))
}

/// True when the byte before `idx` would make `@` part of a longer token (`x@y`, `@@`).
pub(super) fn is_glued(bytes: &[u8], idx: usize) -> bool {
    idx > 0 && (is_ident_byte(bytes[idx - 1]) || bytes[idx - 1] == b'@')
}

fn pair_at(bytes: &[u8], idx: usize, pair: [u8; 2]) -> bool {
    bytes.get(idx) == Some(&pair[0]) && bytes.get(idx + 1) == Some(&pair[1])
}

pub(super) fn opens_line_comment(bytes: &[u8], idx: usize) -> bool {
    pair_at(bytes, idx, *b"--")
}

pub(super) fn opens_block_comment(bytes: &[u8], idx: usize) -> bool {
    pair_at(bytes, idx, *b"/*")
}

pub(super) fn closes_block_comment(bytes: &[u8], idx: usize) -> bool {
    pair_at(bytes, idx, *b"*/")
}
