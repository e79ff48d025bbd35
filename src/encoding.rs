//! Encoding profiles and the legacy 8-bit code pages.

use crate::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How character codes are interpreted and which character map the subset
/// font receives. The profile is fixed for the lifetime of a subset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Encoding {
    /// Full Unicode code points.
    Unicode,
    /// Unicode characters squeezed into 256 single-byte codes, allocated in
    /// the order they are first used.
    Unicode8Bit,
    /// The Macintosh Roman code page.
    MacRoman,
    /// The Windows-1252 code page.
    Windows1252,
}

impl Encoding {
    /// Convert a Unicode scalar to its byte in a legacy code page.
    ///
    /// Returns `None` for the Unicode profiles and for characters without a
    /// representation in the code page.
    pub fn from_unicode(self, code: u32) -> Option<u8> {
        let table = match self {
            Encoding::MacRoman => &MAC_ROMAN,
            Encoding::Windows1252 => &WINDOWS_1252,
            Encoding::Unicode | Encoding::Unicode8Bit => return None,
        };

        if code < 0x80 && code != 0x7F {
            return u8::try_from(code).ok();
        }

        let code = u16::try_from(code).ok()?;
        let position = table.iter().position(|&c| c == code)?;
        u8::try_from(0x80 + position).ok()
    }

    /// Convert a byte of a legacy code page back to Unicode.
    pub fn to_unicode(self, byte: u8) -> Option<u32> {
        let table = match self {
            Encoding::MacRoman => &MAC_ROMAN,
            Encoding::Windows1252 => &WINDOWS_1252,
            Encoding::Unicode | Encoding::Unicode8Bit => return None,
        };

        match byte {
            0x7F => None,
            0x00..=0x7E => Some(u32::from(byte)),
            _ => match table[usize::from(byte - 0x80)] {
                0 => None,
                c => Some(u32::from(c)),
            },
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unicode" => Ok(Encoding::Unicode),
            "unicode_8bit" => Ok(Encoding::Unicode8Bit),
            "mac_roman" => Ok(Encoding::MacRoman),
            "windows_1252" => Ok(Encoding::Windows1252),
            _ => Err(Error::UnknownEncoding),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(match self {
            Encoding::Unicode => "unicode",
            Encoding::Unicode8Bit => "unicode_8bit",
            Encoding::MacRoman => "mac_roman",
            Encoding::Windows1252 => "windows_1252",
        })
    }
}

/// Upper half (0x80-0xFF) of Mac OS Roman.
#[rustfmt::skip]
static MAC_ROMAN: [u16; 128] = [
    0x00C4, 0x00C5, 0x00C7, 0x00C9, 0x00D1, 0x00D6, 0x00DC, 0x00E1,
    0x00E0, 0x00E2, 0x00E4, 0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8,
    0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF, 0x00F1, 0x00F3,
    0x00F2, 0x00F4, 0x00F6, 0x00F5, 0x00FA, 0x00F9, 0x00FB, 0x00FC,
    0x2020, 0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF,
    0x00AE, 0x00A9, 0x2122, 0x00B4, 0x00A8, 0x2260, 0x00C6, 0x00D8,
    0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x00B5, 0x2202, 0x2211,
    0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8,
    0x00BF, 0x00A1, 0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB,
    0x00BB, 0x2026, 0x00A0, 0x00C0, 0x00C3, 0x00D5, 0x0152, 0x0153,
    0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA,
    0x00FF, 0x0178, 0x2044, 0x20AC, 0x2039, 0x203A, 0xFB01, 0xFB02,
    0x2021, 0x00B7, 0x201A, 0x201E, 0x2030, 0x00C2, 0x00CA, 0x00C1,
    0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC, 0x00D3, 0x00D4,
    0xF8FF, 0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC,
    0x00AF, 0x02D8, 0x02D9, 0x02DA, 0x00B8, 0x02DD, 0x02DB, 0x02C7,
];

/// Upper half (0x80-0xFF) of Windows-1252. Zero marks undefined bytes.
#[rustfmt::skip]
static WINDOWS_1252: [u16; 128] = [
    0x20AC, 0x0000, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021,
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x0000, 0x017D, 0x0000,
    0x0000, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x0000, 0x017E, 0x0178,
    0x00A0, 0x00A1, 0x00A2, 0x00A3, 0x00A4, 0x00A5, 0x00A6, 0x00A7,
    0x00A8, 0x00A9, 0x00AA, 0x00AB, 0x00AC, 0x00AD, 0x00AE, 0x00AF,
    0x00B0, 0x00B1, 0x00B2, 0x00B3, 0x00B4, 0x00B5, 0x00B6, 0x00B7,
    0x00B8, 0x00B9, 0x00BA, 0x00BB, 0x00BC, 0x00BD, 0x00BE, 0x00BF,
    0x00C0, 0x00C1, 0x00C2, 0x00C3, 0x00C4, 0x00C5, 0x00C6, 0x00C7,
    0x00C8, 0x00C9, 0x00CA, 0x00CB, 0x00CC, 0x00CD, 0x00CE, 0x00CF,
    0x00D0, 0x00D1, 0x00D2, 0x00D3, 0x00D4, 0x00D5, 0x00D6, 0x00D7,
    0x00D8, 0x00D9, 0x00DA, 0x00DB, 0x00DC, 0x00DD, 0x00DE, 0x00DF,
    0x00E0, 0x00E1, 0x00E2, 0x00E3, 0x00E4, 0x00E5, 0x00E6, 0x00E7,
    0x00E8, 0x00E9, 0x00EA, 0x00EB, 0x00EC, 0x00ED, 0x00EE, 0x00EF,
    0x00F0, 0x00F1, 0x00F2, 0x00F3, 0x00F4, 0x00F5, 0x00F6, 0x00F7,
    0x00F8, 0x00F9, 0x00FA, 0x00FB, 0x00FC, 0x00FD, 0x00FE, 0x00FF,
];
