//! Compact binary form of a codec's tables.
//!
//! A blob is what `compile` writes and what applications embed with
//! `include_bytes!`. All integers are little-endian:
//!
//! ```text
//! "EDBT" version:u16 name_len:u16 name
//! ccsid:u32 has_sbcs:u8 sbcs:u8 has_dbcs:u8 dbcs:[u8; 2]
//! decode: mask1:u16 mask2:u16 shift:u8 len1:u32 len2:u32 index1 index2
//! encode: mask1:u16 mask2:u16 shift:u8 maps_nul:u8 len1:u32 len2:u32 len2a:u32
//!         index1 index2 index2a
//! ```

use ebcdic_dbcs_core::{CodecParams, DecodeTable, EncodeTable, Substitution};

use crate::error::TableError;

const MAGIC: &[u8; 4] = b"EDBT";
const VERSION: u16 = 1;

/// Everything needed to rebuild a codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlob {
    pub name: String,
    pub ccsid: Option<u32>,
    pub substitution: Substitution,
    pub decode: DecodeTable,
    pub encode: EncodeTable,
}

impl TableBlob {
    /// Whether `bytes` start with the blob magic.
    pub fn looks_like_blob(bytes: &[u8]) -> bool {
        bytes.starts_with(MAGIC)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        let name_len = u16::try_from(self.name.len())
            .map_err(|_| TableError::Blob(format!("name of {} bytes is too long", self.name.len())))?;
        let mut out = Vec::with_capacity(
            32 + self.name.len() + 2 * (self.decode.index1().len() + self.decode.index2().len())
                + 2 * (self.encode.index1().len() + self.encode.len()),
        );
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&name_len.to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());

        out.extend_from_slice(&self.ccsid.unwrap_or(0).to_le_bytes());
        let Substitution { sbcs, dbcs } = self.substitution;
        out.push(u8::from(sbcs.is_some()));
        out.push(sbcs.unwrap_or(0));
        out.push(u8::from(dbcs.is_some()));
        out.extend_from_slice(&dbcs.unwrap_or([0, 0]));

        write_params(&mut out, self.decode.params());
        write_len(&mut out, self.decode.index1().len())?;
        write_len(&mut out, self.decode.index2().len())?;
        write_words(&mut out, self.decode.index1());
        write_words(&mut out, self.decode.index2());

        write_params(&mut out, self.encode.params());
        out.push(u8::from(self.encode.maps_nul()));
        write_len(&mut out, self.encode.index1().len())?;
        write_len(&mut out, self.encode.index2().len())?;
        write_len(&mut out, self.encode.index2a().len())?;
        write_words(&mut out, self.encode.index1());
        write_words(&mut out, self.encode.index2());
        write_words(&mut out, self.encode.index2a());

        Ok(out)
    }

    /// Parse and validate a blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        let mut r = Reader { bytes, pos: 0 };

        if r.take(4)? != MAGIC {
            return Err(TableError::Blob("missing EDBT magic".to_string()));
        }
        let version = r.u16()?;
        if version != VERSION {
            return Err(TableError::Blob(format!("unsupported version {version}")));
        }
        let name_len = r.u16()? as usize;
        let name = std::str::from_utf8(r.take(name_len)?)
            .map_err(|e| TableError::Blob(format!("name is not UTF-8: {e}")))?
            .to_string();

        let ccsid = match r.u32()? {
            0 => None,
            n => Some(n),
        };
        let has_sbcs = r.flag()?;
        let sbcs = r.u8()?;
        let has_dbcs = r.flag()?;
        let dbcs = [r.u8()?, r.u8()?];
        let substitution = Substitution {
            sbcs: has_sbcs.then_some(sbcs),
            dbcs: has_dbcs.then_some(dbcs),
        };

        let params = r.params()?;
        let len1 = r.u32()? as usize;
        let len2 = r.u32()? as usize;
        let index1 = r.words(len1)?;
        let index2 = r.words(len2)?;
        let decode = DecodeTable::new(params, index1, index2)?;

        let params = r.params()?;
        let maps_nul = r.flag()?;
        let len1 = r.u32()? as usize;
        let len2 = r.u32()? as usize;
        let len2a = r.u32()? as usize;
        let index1 = r.words(len1)?;
        let index2 = r.words(len2)?;
        let index2a = r.words(len2a)?;
        let encode = EncodeTable::new(params, index1, index2, index2a)?.with_nul_mapped(maps_nul);

        if r.pos != bytes.len() {
            return Err(TableError::Blob(format!(
                "{} trailing bytes after encode table",
                bytes.len() - r.pos
            )));
        }

        Ok(Self {
            name,
            ccsid,
            substitution,
            decode,
            encode,
        })
    }
}

fn write_params(out: &mut Vec<u8>, params: CodecParams) {
    out.extend_from_slice(&params.mask1.to_le_bytes());
    out.extend_from_slice(&params.mask2.to_le_bytes());
    out.push(params.shift);
}

fn write_len(out: &mut Vec<u8>, len: usize) -> Result<(), TableError> {
    let len = u32::try_from(len).map_err(|_| TableError::Blob(format!("array of {len} entries")))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn write_words(out: &mut Vec<u8>, words: &[u16]) {
    for w in words {
        out.extend_from_slice(&w.to_le_bytes());
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], TableError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                TableError::Blob(format!(
                    "truncated: needed {n} bytes at offset {}, {} left",
                    self.pos,
                    self.bytes.len() - self.pos
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, TableError> {
        Ok(self.take(1)?[0])
    }

    fn flag(&mut self) -> Result<bool, TableError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(TableError::Blob(format!(
                "flag byte {v:#04x} at offset {}",
                self.pos - 1
            ))),
        }
    }

    fn u16(&mut self) -> Result<u16, TableError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, TableError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn params(&mut self) -> Result<CodecParams, TableError> {
        let mask1 = self.u16()?;
        let mask2 = self.u16()?;
        let shift = self.u8()?;
        Ok(CodecParams::from_masks(mask1, mask2, shift)?)
    }

    fn words(&mut self, count: usize) -> Result<Vec<u16>, TableError> {
        let bytes = count
            .checked_mul(2)
            .ok_or_else(|| TableError::Blob(format!("array of {count} entries")))?;
        Ok(self
            .take(bytes)?
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect())
    }
}
