//! Line-by-line reading of an encoded byte stream.

use std::io::{self, BufRead, ErrorKind};

use anyhow::Result;

use crate::app::offsets::{LineSource, SourceLine};
use crate::domain::encoding::Encoding;
use crate::domain::errors::DomainError;

const LF: u16 = 0x0A;
const CR: u16 = 0x0D;

#[derive(Debug, Clone, Copy)]
struct Unit {
    bytes: [u8; 2],
    len: usize,
    value: u16,
}

/// Splits a reader into decoded lines while tracking the byte offset each line starts at.
///
/// `\n`, `\r\n` and a lone `\r` all terminate a line. Terminators are kept in the line text so
/// that column arithmetic can still reach the real bytes behind them. A byte order mark matching
/// the declared encoding is skipped but still counted in offsets.
#[derive(Debug)]
pub struct EncodedLines<R> {
    reader: R,
    encoding: Encoding,
    position: u64,
    row: usize,
    started: bool,
    pending: Option<Unit>,
}

impl<R: BufRead> EncodedLines<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Self {
            reader,
            encoding,
            position: 0,
            row: 0,
            started: false,
            pending: None,
        }
    }

    fn skip_bom(&mut self) -> io::Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let bom = self.encoding.bom();
        if bom.is_empty() {
            return Ok(());
        }
        if self.reader.fill_buf()?.starts_with(bom) {
            self.reader.consume(bom.len());
            self.position += bom.len() as u64;
        }
        Ok(())
    }

    fn read_unit(&mut self) -> io::Result<Option<Unit>> {
        if let Some(unit) = self.pending.take() {
            return Ok(Some(unit));
        }

        let width = self.encoding.unit_width();
        let mut bytes = [0u8; 2];
        let mut filled = 0;
        while filled < width {
            match self.reader.read(&mut bytes[filled..width]) {
                Ok(0) => break,
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        // A truncated trailing unit never terminates a line; decoding rejects it later.
        let value = if filled == width {
            self.encoding.unit_value(&bytes[..width])
        } else {
            u16::MAX
        };
        Ok(Some(Unit {
            bytes,
            len: filled,
            value,
        }))
    }

    fn push(&mut self, raw: &mut Vec<u8>, unit: Unit) {
        raw.extend_from_slice(&unit.bytes[..unit.len]);
        self.position += unit.len as u64;
    }
}

impl<R: BufRead> LineSource for EncodedLines<R> {
    fn next_line(&mut self) -> Result<Option<SourceLine>> {
        self.skip_bom()?;

        let start = self.position;
        let mut raw = Vec::new();
        while let Some(unit) = self.read_unit()? {
            self.push(&mut raw, unit);
            match unit.value {
                LF => break,
                CR => {
                    if let Some(next) = self.read_unit()? {
                        if next.value == LF {
                            self.push(&mut raw, next);
                        } else {
                            self.pending = Some(next);
                        }
                    }
                    break;
                }
                _ => {}
            }
        }

        if raw.is_empty() {
            return Ok(None);
        }

        let text = self
            .encoding
            .decode(&raw)
            .ok_or_else(|| DomainError::Decode {
                row: self.row,
                encoding: self.encoding.label().to_string(),
            })?;
        self.row += 1;
        Ok(Some(SourceLine { start, text }))
    }

    fn position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    fn collect(bytes: &[u8], encoding: Encoding) -> Result<Vec<(u64, String)>> {
        let mut lines = EncodedLines::new(Cursor::new(bytes.to_vec()), encoding);
        let mut out = Vec::new();
        while let Some(line) = lines.next_line()? {
            out.push((line.start, line.text));
        }
        Ok(out)
    }

    #[test]
    fn splits_on_every_terminator_style() -> Result<()> {
        let lines = collect(b"a\r\nbb\rccc\nd", Encoding::Utf8)?;
        assert_eq!(
            lines,
            vec![
                (0, "a\r\n".to_string()),
                (3, "bb\r".to_string()),
                (6, "ccc\n".to_string()),
                (10, "d".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn bom_is_skipped_but_counted() -> Result<()> {
        let lines = collect(b"\xEF\xBB\xBFone\ntwo", Encoding::Utf8Bom)?;
        assert_eq!(lines[0], (3, "one\n".to_string()));
        assert_eq!(lines[1], (7, "two".to_string()));
        Ok(())
    }

    #[test]
    fn reads_utf16_code_units() -> Result<()> {
        let bytes: Vec<u8> = "hé\nyo"
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect();
        let lines = collect(&bytes, Encoding::Utf16Be)?;
        assert_eq!(lines[0], (0, "hé\n".to_string()));
        assert_eq!(lines[1], (6, "yo".to_string()));
        Ok(())
    }

    #[test]
    fn position_reaches_stream_length_at_eof() -> Result<()> {
        let mut lines = EncodedLines::new(Cursor::new(b"ab\n".to_vec()), Encoding::Ascii);
        assert!(lines.next_line()?.is_some());
        assert!(lines.next_line()?.is_none());
        assert_eq!(lines.position(), 3);
        Ok(())
    }

    #[test]
    fn invalid_bytes_report_the_row() {
        let err = collect(b"ok\n\xFF\n", Encoding::Utf8).unwrap_err();
        let domain = err.downcast_ref::<DomainError>().expect("domain error");
        assert_eq!(
            domain,
            &DomainError::Decode {
                row: 1,
                encoding: "UTF-8".into()
            }
        );
    }
}
