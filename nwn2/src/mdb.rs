use crate::error::{PatchError, PatchErrorKind};
use byteorder::{ByteOrder, LE};
use std::{
    fmt,
    fs::OpenOptions,
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};

pub const HEADER_LEN: usize = 12;
pub const NAME_LEN: usize = 32;

const DIRECTORY_ENTRY_LEN: usize = 8;
const NAME_OFFSET: usize = 8;
const SKIN_MIN_LEN: u32 = 52;
const HAIR_MIN_LEN: u32 = 44;
const HIDE_HAIR_OFFSET: usize = 40;
const HIDE_HAIR: u32 = 1;

/// Four character packet tag, stored little-endian on disk.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub u32);

impl Tag {
    pub const HAIR: Tag = Tag::from_bytes(*b"HAIR");
    pub const HELM: Tag = Tag::from_bytes(*b"HELM");
    pub const SKIN: Tag = Tag::from_bytes(*b"SKIN");

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            if b.is_ascii_graphic() {
                f.write_fmt(format_args!("{}", b as char))?;
            } else {
                f.write_fmt(format_args!("\\x{:02x}", b))?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Tag({})", self))
    }
}

/// Counts of the packets rewritten by one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchSummary {
    pub skins_embossed: usize,
    pub hairs_converted: usize,
}

/// Header bytes 4..8 accepted by the converter.
///
/// The grouping is kept bit-compatible with the legacy tool: byte 5 and
/// byte 6 are alternatives, so `01 00 xx 00` and `01 xx 0c 00` both pass.
fn is_known_header(header: &[u8]) -> bool {
    header[4] == 0x01 && (header[5] == 0x00 || header[6] == 0x0c) && header[7] == 0x00
}

/// Start of a packet body that must span at least `required` bytes.
fn body_start(offset: u32, required: u32, size: usize) -> Option<usize> {
    let end = offset as u64 + required as u64;
    (end <= size as u64).then_some(offset as usize)
}

/// Rewrites hair packets as helm packets and embosses `name` into skin
/// packets. Only existing bytes of `data` are overwritten.
pub fn patch_model(data: &mut [u8], name: &str) -> Result<PatchSummary, PatchErrorKind> {
    let size = data.len();
    if size < HEADER_LEN {
        return Err(PatchErrorKind::TooShort(size as u64));
    }
    if !is_known_header(data) {
        return Err(PatchErrorKind::UnrecognizedFormat([
            data[4], data[5], data[6], data[7],
        ]));
    }

    let packets = data[8] as usize;
    let mut summary = PatchSummary::default();

    for index in 0..packets {
        let pos = HEADER_LEN + index * DIRECTORY_ENTRY_LEN;
        if pos + DIRECTORY_ENTRY_LEN > size {
            return Err(PatchErrorKind::DirectoryOutOfBounds { index });
        }

        let tag = Tag(LE::read_u32(&data[pos..]));
        let offset = LE::read_u32(&data[pos + 4..]);
        let out_of_bounds = |required| PatchErrorKind::OffsetOutOfBounds {
            tag,
            offset,
            required,
            size,
        };

        match tag {
            Tag::SKIN => {
                let body = body_start(offset, SKIN_MIN_LEN, size)
                    .ok_or_else(|| out_of_bounds(SKIN_MIN_LEN))?;
                let field = &mut data[body + NAME_OFFSET..body + NAME_OFFSET + NAME_LEN];
                field.fill(0);

                let name = name.as_bytes();
                let len = name.len().min(NAME_LEN);
                field[..len].copy_from_slice(&name[..len]);
                summary.skins_embossed += 1;
            }
            Tag::HAIR => {
                let body = body_start(offset, HAIR_MIN_LEN, size)
                    .ok_or_else(|| out_of_bounds(HAIR_MIN_LEN))?;
                // The name field of hair packets stays as it is.
                LE::write_u32(&mut data[pos..], Tag::HELM.0);
                LE::write_u32(&mut data[body..], Tag::HELM.0);
                LE::write_u32(&mut data[body + HIDE_HAIR_OFFSET..], HIDE_HAIR);
                summary.hairs_converted += 1;
            }
            _ => {}
        }
    }

    Ok(summary)
}

/// Converts the model at `path` in place.
///
/// The file is only written once every packet has been patched in
/// memory, so a failed conversion leaves it untouched on disk.
pub fn convert(path: impl AsRef<Path>, name: &str) -> Result<PatchSummary, PatchError> {
    let path = path.as_ref();
    let fail = |kind: PatchErrorKind| PatchError {
        path: path.to_owned(),
        kind,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| fail(PatchErrorKind::OpenFailed(e)))?;

    let size = file
        .metadata()
        .map_err(|e| fail(PatchErrorKind::OpenFailed(e)))?
        .len();
    if size < HEADER_LEN as u64 {
        return Err(fail(PatchErrorKind::TooShort(size)));
    }

    let mut data = vec![0u8; size as usize];
    file.read_exact(&mut data)
        .map_err(|e| fail(PatchErrorKind::ReadFailed(e)))?;

    let summary = patch_model(&mut data, name).map_err(fail)?;

    file.seek(SeekFrom::Start(0))
        .map_err(|e| fail(PatchErrorKind::WriteFailed(e)))?;
    file.write_all(&data)
        .map_err(|e| fail(PatchErrorKind::WriteFailed(e)))?;

    Ok(summary)
}
