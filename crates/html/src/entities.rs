use memchr::memchr;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Semicolon-terminated HTML5 named references, keyed by the bare name.
static NAMED: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    entities::ENTITIES
        .iter()
        .filter_map(|e| {
            let name = e.entity.strip_prefix('&')?.strip_suffix(';')?;
            Some((name, e.characters))
        })
        .collect()
});

/// Legacy references the parser also accepts without a semicolon (`&amp`,
/// `&copy`, `&frac12`).
static LEGACY: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    entities::ENTITIES
        .iter()
        .filter_map(|e| {
            let name = e.entity.strip_prefix('&')?;
            (!name.ends_with(';')).then_some((name, e.characters))
        })
        .collect()
});

// "CounterClockwiseContourIntegral"
const MAX_NAME_LEN: usize = 32;

// "frac34", "middot"
const MAX_LEGACY_LEN: usize = 6;

/// Decode HTML character references to literal text.
///
/// Contract (text content, as a browser parses it):
/// - Named references come from the full HTML5 table. A semicolon-terminated
///   name is matched first; otherwise the longest legacy name that prefixes
///   the run is decoded and the rest is kept (`&notit;` -> `¬it;`).
/// - Numeric references (`&#215;`, `&#xD7;`, `&#215`) take an optional
///   semicolon and follow the parser's replacement rules: NUL, surrogates and
///   values above U+10FFFF decode to U+FFFD; C1 controls map through
///   Windows-1252.
/// - Unknown names and numerics without digits pass through unchanged.
/// - Input without a decodable reference is returned borrowed.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = first;
    let mut decoded_any = false;

    while i < bytes.len() {
        let Some(rel) = memchr(b'&', &bytes[i..]) else {
            break;
        };
        let amp = i + rel;
        match decode_reference(s, amp) {
            Some((decoded, consumed)) => {
                out.push_str(&s[copy_start..amp]);
                match decoded {
                    Decoded::Char(ch) => out.push(ch),
                    Decoded::Str(text) => out.push_str(text),
                }
                i = amp + consumed;
                copy_start = i;
                decoded_any = true;
            }
            None => i = amp + 1,
        }
    }

    if !decoded_any {
        return Cow::Borrowed(s);
    }
    out.push_str(&s[copy_start..]);
    Cow::Owned(out)
}

enum Decoded {
    Char(char),
    Str(&'static str),
}

/// Try to decode the reference starting at `s[amp] == '&'`. Returns the
/// replacement and the number of bytes consumed.
fn decode_reference(s: &str, amp: usize) -> Option<(Decoded, usize)> {
    let rest = &s.as_bytes()[amp + 1..];
    match rest.first()? {
        b'#' => {
            let (radix, digits_at) = match rest.get(1) {
                Some(b'x' | b'X') => (16, 2),
                _ => (10, 1),
            };
            let digits = rest[digits_at..]
                .iter()
                .take_while(|b| b.is_ascii_digit() || (radix == 16 && b.is_ascii_hexdigit()))
                .count();
            if digits == 0 {
                return None;
            }
            let text = &s[amp + 1 + digits_at..amp + 1 + digits_at + digits];
            // Overlong digit runs saturate and land on U+FFFD below.
            let value = u32::from_str_radix(text, radix).unwrap_or(u32::MAX);
            let semicolon = usize::from(rest.get(digits_at + digits) == Some(&b';'));
            Some((Decoded::Char(numeric_char(value)), 1 + digits_at + digits + semicolon))
        }
        b if b.is_ascii_alphanumeric() => {
            let len = rest
                .iter()
                .take(MAX_NAME_LEN + 1)
                .take_while(|b| b.is_ascii_alphanumeric())
                .count();
            let name = &s[amp + 1..amp + 1 + len];
            if len <= MAX_NAME_LEN && rest.get(len) == Some(&b';') {
                if let Some(text) = NAMED.get(name) {
                    return Some((Decoded::Str(*text), 1 + len + 1));
                }
            }
            (1..=len.min(MAX_LEGACY_LEN))
                .rev()
                .find_map(|k| LEGACY.get(&name[..k]).map(|text| (Decoded::Str(*text), 1 + k)))
        }
        _ => None,
    }
}

fn numeric_char(value: u32) -> char {
    const REPLACEMENT: char = '\u{FFFD}';
    if value == 0 {
        return REPLACEMENT;
    }
    if let Some(ch) = windows_1252(value) {
        return ch;
    }
    char::from_u32(value).unwrap_or(REPLACEMENT)
}

fn windows_1252(value: u32) -> Option<char> {
    let ch = match value {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(ch)
}
