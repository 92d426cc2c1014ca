//! # UTF-8 Decoding
//!
//! Table-driven decoder for the classic 1 to 6 byte UTF-8 forms. Each
//! sequence length has a lead-byte mask/value pair, a value mask and the
//! smallest value that length may encode; anything below it is overlong.
//!
//! The glyph atlas is keyed by raw code points, so values above U+10FFFF
//! and surrogates decode without complaint.

/// Outcome of decoding the leading code point of a byte sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A code point spanning `len` bytes
    Char { code: u32, len: usize },
    /// The input ended inside a sequence
    Incomplete,
    /// Bad continuation byte, overlong form or invalid lead byte; `len` is
    /// the sequence length reached when the error was found
    Malformed { len: usize },
}

impl Decoded {
    /// Classic return convention: bytes consumed, `0` for short input,
    /// negated length for malformed input.
    pub fn count(&self) -> i32 {
        match *self {
            Decoded::Char { len, .. } => len as i32,
            Decoded::Incomplete => 0,
            Decoded::Malformed { len } => -(len as i32),
        }
    }

    pub fn code(&self) -> Option<u32> {
        match *self {
            Decoded::Char { code, .. } => Some(code),
            _ => None,
        }
    }
}

struct Form {
    cmask: u32,
    cval: u32,
    lmask: u64,
    lval: u64,
}

const FORMS: [Form; 6] = [
    Form { cmask: 0x80, cval: 0x00, lmask: 0x7F, lval: 0 },
    Form { cmask: 0xE0, cval: 0xC0, lmask: 0x7FF, lval: 0x80 },
    Form { cmask: 0xF0, cval: 0xE0, lmask: 0xFFFF, lval: 0x800 },
    Form { cmask: 0xF8, cval: 0xF0, lmask: 0x1F_FFFF, lval: 0x10000 },
    Form { cmask: 0xFC, cval: 0xF8, lmask: 0x3FF_FFFF, lval: 0x20_0000 },
    Form { cmask: 0xFE, cval: 0xFC, lmask: 0x7FFF_FFFF, lval: 0x400_0000 },
];

/// Decodes the code point at the start of `s`.
pub fn decode(s: &[u8]) -> Decoded {
    let Some(&c0) = s.first() else {
        return Decoded::Incomplete;
    };
    let c0 = c0 as u32;
    let mut value = c0 as u64;

    for (i, form) in FORMS.iter().enumerate() {
        let nc = i + 1;
        if c0 & form.cmask == form.cval {
            value &= form.lmask;
            if value < form.lval {
                return Decoded::Malformed { len: nc };
            }
            return Decoded::Char {
                code: value as u32,
                len: nc,
            };
        }
        if s.len() <= nc {
            return Decoded::Incomplete;
        }
        let c = (s[nc] ^ 0x80) as u64;
        if c & 0xC0 != 0 {
            return Decoded::Malformed { len: nc };
        }
        value = (value << 6) | c;
    }
    Decoded::Malformed { len: FORMS.len() }
}

/// Iterates code points, stopping at the first sequence that fails to
/// decode. Yields `(byte offset, code point, byte length)`.
pub struct CodePoints<'a> {
    bytes: &'a [u8],
    pos: usize,
    stopped: Option<usize>,
}

impl<'a> CodePoints<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            stopped: None,
        }
    }

    /// Offset of the sequence that stopped iteration, if any.
    pub fn stopped_at(&self) -> Option<usize> {
        self.stopped
    }
}

impl<'a> Iterator for CodePoints<'a> {
    type Item = (usize, u32, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped.is_some() || self.pos >= self.bytes.len() {
            return None;
        }
        match decode(&self.bytes[self.pos..]) {
            Decoded::Char { code, len } => {
                let at = self.pos;
                self.pos += len;
                Some((at, code, len))
            }
            _ => {
                self.stopped = Some(self.pos);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sequences() {
        let cases: &[(&[u8], u32)] = &[
            (b"A", 0x41),
            (b"\x7F", 0x7F),
            ("é".as_bytes(), 0xE9),
            ("中".as_bytes(), 0x4E2D),
            ("😀".as_bytes(), 0x1F600),
            (&[0xF8, 0x88, 0x80, 0x80, 0x80], 0x20_0000),
            (&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80], 0x400_0000),
            (&[0xFD, 0xBF, 0xBF, 0xBF, 0xBF, 0xBF], 0x7FFF_FFFF),
        ];
        for (bytes, code) in cases {
            assert_eq!(
                decode(bytes),
                Decoded::Char {
                    code: *code,
                    len: bytes.len()
                },
                "{:x?}",
                bytes
            );
        }
    }

    #[test]
    fn test_only_leading_code_point() {
        assert_eq!(decode(b"AB").count(), 1);
        assert_eq!(decode("中文".as_bytes()).count(), 3);
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(decode(b""), Decoded::Incomplete);
        assert_eq!(decode(&[0xC3]), Decoded::Incomplete);
        assert_eq!(decode(&[0xE4, 0xB8]).count(), 0);
        assert_eq!(decode(&[0xF0, 0x9F, 0x98]).count(), 0);
    }

    #[test]
    fn test_bad_continuation() {
        assert_eq!(decode(&[0xC3, 0x41]), Decoded::Malformed { len: 1 });
        assert_eq!(decode(&[0xE4, 0xB8, 0xC0]).count(), -2);
    }

    #[test]
    fn test_overlong_rejected() {
        assert_eq!(decode(&[0xC0, 0x80]).count(), -2);
        assert_eq!(decode(&[0xC1, 0xBF]).count(), -2);
        assert_eq!(decode(&[0xE0, 0x80, 0xAF]).count(), -3);
        assert_eq!(decode(&[0xF0, 0x80, 0x80, 0xAF]).count(), -4);
    }

    #[test]
    fn test_invalid_lead_bytes() {
        assert_eq!(decode(&[0x80, 0x41]).count(), -1);
        assert!(decode(&[0xFF, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80]).count() < 0);
    }

    #[test]
    fn test_code_points_stop_on_error() {
        let bytes = b"ab\xC3\x41cd";
        let mut it = CodePoints::new(bytes);
        let codes: Vec<u32> = it.by_ref().map(|(_, c, _)| c).collect();
        assert_eq!(codes, vec![0x61, 0x62]);
        assert_eq!(it.stopped_at(), Some(2));
    }

    #[test]
    fn test_code_points_clean_end() {
        let mut it = CodePoints::new("a中".as_bytes());
        assert_eq!(it.next(), Some((0, 0x61, 1)));
        assert_eq!(it.next(), Some((1, 0x4E2D, 3)));
        assert_eq!(it.next(), None);
        assert_eq!(it.stopped_at(), None);
    }
}
