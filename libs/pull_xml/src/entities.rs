//! Entity and character reference decoding.
//!
//! Only the five predefined entities and numeric references are known, there
//! is no DTD to declare more. Anything unrecognized is copied through as is.

use alloc::vec::Vec;

use memchr::memchr;

/// Longest reference body looked at, `#x10FFFF` and the entity names fit.
const MAX_REFERENCE: usize = 32;

/// Replaces `&lt;`, `&gt;`, `&amp;`, `&quot;`, `&apos;`, `&#N;` and `&#xH;`.
/// ```
/// # use pull_xml::decode_entities;
/// assert_eq!(decode_entities(b"a &lt; b &amp;&amp; c"), b"a < b && c");
/// assert_eq!(decode_entities(b"&#65;&#x42;"), b"AB");
/// assert_eq!(decode_entities(b"&nbsp; & stray"), b"&nbsp; & stray");
/// ```
pub fn decode(input: &[u8]) -> Vec<u8> {
    let Some(first) = memchr(b'&', input) else {
        return input.to_vec();
    };

    let mut out = Vec::with_capacity(input.len());
    out.extend_from_slice(&input[..first]);
    let mut pos = first;
    while pos < input.len() {
        let Some(amp) = memchr(b'&', &input[pos..]) else {
            out.extend_from_slice(&input[pos..]);
            break;
        };
        out.extend_from_slice(&input[pos..pos + amp]);
        pos += amp;

        let rest = &input[pos + 1..];
        let window = &rest[..rest.len().min(MAX_REFERENCE)];
        let resolved = memchr(b';', window).and_then(|semi| Some((semi, resolve(&rest[..semi])?)));
        match resolved {
            Some((semi, c)) => {
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                pos += semi + 2;
            }
            None => {
                out.push(b'&');
                pos += 1;
            }
        }
    }
    out
}

fn resolve(name: &[u8]) -> Option<char> {
    match name {
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => char_ref(hex, 16),
        [b'#', dec @ ..] => char_ref(dec, 10),
        _ => None,
    }
}

fn char_ref(digits: &[u8], radix: u32) -> Option<char> {
    if digits.is_empty() || !digits.iter().all(|&b| (b as char).is_digit(radix)) {
        return None;
    }
    let digits = core::str::from_utf8(digits).ok()?;
    let code = u32::from_str_radix(digits, radix).ok()?;
    char::from_u32(code).filter(|&c| c != '\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined() {
        assert_eq!(decode(b"&lt;&gt;&amp;&quot;&apos;"), b"<>&\"'");
    }

    #[test]
    fn numeric() {
        assert_eq!(decode(b"&#169; &#xE9;&#Xe9;"), "\u{a9} \u{e9}\u{e9}".as_bytes());
        assert_eq!(decode(b"&#x1F600;"), "\u{1F600}".as_bytes());
    }

    #[test]
    fn invalid_references_are_kept() {
        assert_eq!(decode(b"&#;&#x;&#12a;&#+65;"), b"&#;&#x;&#12a;&#+65;");
        assert_eq!(decode(b"&#xD800;&#0;"), b"&#xD800;&#0;");
        assert_eq!(decode(b"&#x110000;"), b"&#x110000;");
        assert_eq!(decode(b"&unknown;"), b"&unknown;");
    }

    #[test]
    fn unterminated() {
        assert_eq!(decode(b"fish & chips"), b"fish & chips");
        assert_eq!(decode(b"tail &amp"), b"tail &amp");
        assert_eq!(decode(b"&&amp;"), b"&&");
    }

    #[test]
    fn reference_scan_is_bounded() {
        let mut long = Vec::from(&b"&"[..]);
        long.extend_from_slice(&[b'a'; MAX_REFERENCE]);
        long.extend_from_slice(b";&lt;");
        let mut expected = long[..long.len() - 4].to_vec();
        expected.push(b'<');
        assert_eq!(decode(&long), expected);

        let stray = b"& ".repeat(200_000);
        assert_eq!(decode(&stray), stray);
    }

    #[test]
    fn without_references() {
        assert_eq!(decode(b""), b"");
        assert_eq!(decode("plain \u{e4}".as_bytes()), "plain \u{e4}".as_bytes());
    }
}
