//! Swift identifier syntax, as given by the "Identifiers" section of The
//! Swift Programming Language reference.

/// Characters allowed at the start of an identifier beyond `A-Z a-z _`.
const HEAD_RANGES: &[(u32, u32)] = &[
    (0x00A8, 0x00A8),
    (0x00AA, 0x00AA),
    (0x00AD, 0x00AD),
    (0x00AF, 0x00AF),
    (0x00B2, 0x00B5),
    (0x00B7, 0x00BA),
    (0x00BC, 0x00BE),
    (0x00C0, 0x00D6),
    (0x00D8, 0x00F6),
    (0x00F8, 0x00FF),
    (0x0100, 0x02FF),
    (0x0370, 0x167F),
    (0x1681, 0x180D),
    (0x180F, 0x1DBF),
    (0x1E00, 0x1FFF),
    (0x200B, 0x200D),
    (0x202A, 0x202E),
    (0x203F, 0x2040),
    (0x2054, 0x2054),
    (0x2060, 0x206F),
    (0x2070, 0x20CF),
    (0x2100, 0x218F),
    (0x2460, 0x24FF),
    (0x2776, 0x2793),
    (0x2C00, 0x2DFF),
    (0x2E80, 0x2FFF),
    (0x3004, 0x3007),
    (0x3021, 0x302F),
    (0x3031, 0x303F),
    (0x3040, 0xD7FF),
    (0xF900, 0xFD3D),
    (0xFD40, 0xFDCF),
    (0xFDF0, 0xFE1F),
    (0xFE30, 0xFE44),
    (0xFE47, 0xFFFD),
];

/// Combining marks allowed after the first character.
const CONTINUE_RANGES: &[(u32, u32)] = &[
    (0x0300, 0x036F),
    (0x1DC0, 0x1DFF),
    (0x20D0, 0x20FF),
    (0xFE20, 0xFE2F),
];

fn in_ranges(c: char, ranges: &[(u32, u32)]) -> bool {
    let c = c as u32;
    ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
}

fn is_identifier_head(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic() || c == '_';
    }
    let v = c as u32;
    // U+10000 through U+EFFFD, skipping the last two code points of every plane.
    if (0x10000..=0xEFFFD).contains(&v) {
        return v & 0xFFFE != 0xFFFE;
    }
    in_ranges(c, HEAD_RANGES)
}

fn is_identifier_character(c: char) -> bool {
    c.is_ascii_digit() || is_identifier_head(c) || in_ranges(c, CONTINUE_RANGES)
}

/// Reports whether `s` is a syntactically valid Swift identifier.
///
/// With `allow_quoted`, the backtick form (`` `default` ``) is also accepted
/// when the name between the backticks is itself valid. Keywords are not
/// rejected here; that is the job of whoever emits the name.
pub fn is_valid_swift_identifier(s: &str, allow_quoted: bool) -> bool {
    let name = match s.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
        Some(inner) if allow_quoted => inner,
        Some(_) => return false,
        None => s,
    };

    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_head(first) => chars.all(is_identifier_character),
        _ => false,
    }
}
