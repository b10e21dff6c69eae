use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, Write};

/// Length of a [Seed] in bytes.
pub const SEED_LENGTH: usize = 32;

/// Session entropy every round's random draws are derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    pub const fn new(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Expand a short numeric seed (big-endian in the leading bytes, zero padded).
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; SEED_LENGTH];
        bytes[..8].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl Write for Seed {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_slice(&self.0);
    }
}

impl Read for Seed {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < SEED_LENGTH {
            return Err(Error::EndOfBuffer);
        }
        let mut bytes = [0u8; SEED_LENGTH];
        reader.copy_to_slice(&mut bytes);
        Ok(Self(bytes))
    }
}

impl FixedSize for Seed {
    const SIZE: usize = SEED_LENGTH;
}
