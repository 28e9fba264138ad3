use crate::error::{Error, Result};

/// Big-endian cursor over a byte slice.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn read_u1(&mut self) -> Result<u8> {
        let b = *self.bytes.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn read_u2(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u4(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::UnexpectedEof)?;
        let slice = self.bytes.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn ensure_empty(&self) -> Result<()> {
        let remaining = self.bytes.len() - self.pos;
        if remaining == 0 {
            Ok(())
        } else {
            Err(Error::TrailingBytes(remaining))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_values() {
        let mut reader = Reader::new(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34, 0x07]);
        assert_eq!(reader.read_u4().unwrap(), 0xCAFEBABE);
        assert_eq!(reader.read_u2().unwrap(), 52);
        assert_eq!(reader.read_u1().unwrap(), 7);
        assert!(reader.ensure_empty().is_ok());
        assert_eq!(reader.read_u1(), Err(Error::UnexpectedEof));
    }

    #[test]
    fn reports_trailing_bytes() {
        let mut reader = Reader::new(&[1, 2, 3]);
        reader.read_u1().unwrap();
        assert_eq!(reader.ensure_empty(), Err(Error::TrailingBytes(2)));
    }
}
