//! Xilinx `.bit` file header.
//!
//! A `.bit` file wraps the raw configuration stream in a small TLV header:
//! a fixed preamble, then tagged fields `a` (design name), `b` (part name),
//! `c` (date) and `d` (time), each with a 2-byte big-endian length that
//! counts a trailing NUL, and finally tag `e` with a 4-byte length followed
//! by the configuration data itself.

/// Fixed bytes at the start of every `.bit` file: a 9-byte field and the
/// length (1) of the key field that follows.
const PREAMBLE: [u8; 13] = [
    0x00, 0x09, 0x0F, 0xF0, 0x0F, 0xF0, 0x0F, 0xF0, 0x0F, 0xF0, 0x00, 0x00, 0x01,
];

/// Header field tag 'a' (design name).
const FIELD_DESIGN: u8 = b'a';
/// Header field tag 'b' (part name).
const FIELD_PART: u8 = b'b';
/// Header field tag 'c' (date).
const FIELD_DATE: u8 = b'c';
/// Header field tag 'd' (time).
const FIELD_TIME: u8 = b'd';
/// Header field tag 'e' (data length).
const FIELD_DATA: u8 = b'e';

/// Errors raised while parsing a `.bit` header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitHeaderError {
    /// The file does not start with the `.bit` preamble.
    #[error("missing .bit preamble")]
    MissingPreamble,

    /// The header ends in the middle of a field.
    #[error("header truncated in field '{}'", tag_name(.0))]
    Truncated(u8),

    /// A field tag outside `a`..`e`.
    #[error("unknown header field tag 0x{0:02x}")]
    UnknownTag(u8),

    /// A text field is not valid UTF-8.
    #[error("header field '{}' is not valid UTF-8", tag_name(.0))]
    InvalidText(u8),
}

fn tag_name(tag: &u8) -> char {
    char::from(*tag)
}

/// Metadata carried in a `.bit` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BitHeader {
    /// Design name, often with tool options appended after `;`.
    pub design_name: String,
    /// Target part, e.g. `7a35tcsg324`.
    pub part_name: String,
    /// Build date, `YYYY/MM/DD`.
    pub date: String,
    /// Build time, `HH:MM:SS`.
    pub time: String,
}

fn take<'a>(bytes: &mut &'a [u8], count: usize, tag: u8) -> Result<&'a [u8], BitHeaderError> {
    if bytes.len() < count {
        return Err(BitHeaderError::Truncated(tag));
    }
    let (head, tail) = bytes.split_at(count);
    *bytes = tail;
    Ok(head)
}

impl BitHeader {
    /// Parses the header and returns it with the configuration data that
    /// follows the `e` field.
    ///
    /// If the `e` length is larger than the remaining bytes, the remaining
    /// bytes are returned as-is.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), BitHeaderError> {
        let mut rest = bytes
            .strip_prefix(&PREAMBLE[..])
            .ok_or(BitHeaderError::MissingPreamble)?;
        let mut header = Self::default();

        loop {
            let tag = take(&mut rest, 1, 0)?[0];
            match tag {
                FIELD_DESIGN | FIELD_PART | FIELD_DATE | FIELD_TIME => {
                    let len = take(&mut rest, 2, tag)?;
                    let len = usize::from(u16::from_be_bytes([len[0], len[1]]));
                    let value = take(&mut rest, len, tag)?;
                    let value = value.strip_suffix(&[0]).unwrap_or(value);
                    let text = std::str::from_utf8(value)
                        .map_err(|_| BitHeaderError::InvalidText(tag))?
                        .to_string();
                    match tag {
                        FIELD_DESIGN => header.design_name = text,
                        FIELD_PART => header.part_name = text,
                        FIELD_DATE => header.date = text,
                        _ => header.time = text,
                    }
                }
                FIELD_DATA => {
                    let len = take(&mut rest, 4, tag)?;
                    let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize;
                    if len > rest.len() {
                        log::warn!(
                            ".bit header declares {len} data bytes but {} are present",
                            rest.len()
                        );
                        return Ok((header, rest));
                    }
                    return Ok((header, &rest[..len]));
                }
                other => return Err(BitHeaderError::UnknownTag(other)),
            }
        }
    }

    /// Emits the header followed by `data`.
    pub fn write(&self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(PREAMBLE.len() + 64 + data.len());
        out.extend_from_slice(&PREAMBLE);
        write_tlv_field(&mut out, FIELD_DESIGN, self.design_name.as_bytes());
        write_tlv_field(&mut out, FIELD_PART, self.part_name.as_bytes());
        write_tlv_field(&mut out, FIELD_DATE, self.date.as_bytes());
        write_tlv_field(&mut out, FIELD_TIME, self.time.as_bytes());
        out.push(FIELD_DATA);
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(data);
        out
    }
}

/// Writes a single TLV field (tag + 2-byte length + NUL-terminated value).
fn write_tlv_field(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    let len = (value.len() + 1) as u16;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(value);
    out.push(0);
}
