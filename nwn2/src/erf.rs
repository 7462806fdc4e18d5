use crate::{
    error::ArchiveError,
    resources::{ResourceEntry, ResourceSource},
    restype::ResType,
};
use binrw::{binread, BinRead};
use std::{
    fmt::Debug,
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

const FILE_TYPES: &[&[u8; 4]] = &[b"ERF ", b"MOD ", b"HAK ", b"SAV ", b"NWM "];

#[binread]
#[br(little)]
struct Header {
    file_type: [u8; 4],
    version: [u8; 4],
    _language_count: u32,
    _localized_string_size: u32,
    entry_count: u32,
    _localized_string_offset: u32,
    key_list_offset: u32,
    resource_list_offset: u32,
}

#[binread]
#[br(little, import(resref_len: usize))]
struct KeyEntry {
    #[br(count = resref_len)]
    resref: Vec<u8>,
    _res_id: u32,
    res_type: u16,
    _unused: u16,
}

#[binread]
#[br(little)]
#[derive(Clone, Copy)]
struct ResourceListEntry {
    offset: u32,
    size: u32,
}

/// Encapsulated resource file (`.mod`, `.hak`, `.erf`).
#[derive(Clone)]
pub struct ErfArchive {
    path: PathBuf,
    len: u64,
    entries: Vec<ResourceEntry>,
    locations: Vec<ResourceListEntry>,
}

fn resref_len(version: &[u8; 4]) -> Option<usize> {
    match version {
        b"V1.0" => Some(16),
        b"V1.1" => Some(32),
        _ => None,
    }
}

fn resref_to_name(resref: &[u8]) -> Box<str> {
    let end = resref.iter().position(|&b| b == 0).unwrap_or(resref.len());
    String::from_utf8_lossy(&resref[..end]).into()
}

impl ErfArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_owned();
        let file = File::open(&path).map_err(ArchiveError::IO)?;
        let len = file.metadata().map_err(ArchiveError::IO)?.len();
        let mut r = BufReader::new(file);

        let header = Header::read(&mut r).map_err(|e| ArchiveError::ErfHeader(path.clone(), e))?;
        let resref_len = match resref_len(&header.version) {
            Some(n) if FILE_TYPES.contains(&&header.file_type) => n,
            _ => {
                return Err(ArchiveError::BadErfHeader(
                    path,
                    String::from_utf8_lossy(&header.file_type).into(),
                    String::from_utf8_lossy(&header.version).into(),
                ))
            }
        };

        r.seek(SeekFrom::Start(header.key_list_offset as u64))
            .map_err(ArchiveError::ErfSeek)?;
        let mut entries = Vec::new();
        for _ in 0..header.entry_count {
            let key = KeyEntry::read_args(&mut r, (resref_len,)).map_err(ArchiveError::ErfEntry)?;
            entries.push(ResourceEntry {
                name: resref_to_name(&key.resref),
                res_type: ResType(key.res_type),
            });
        }

        r.seek(SeekFrom::Start(header.resource_list_offset as u64))
            .map_err(ArchiveError::ErfSeek)?;
        let mut locations = Vec::with_capacity(entries.len());
        for _ in 0..header.entry_count {
            locations.push(ResourceListEntry::read(&mut r).map_err(ArchiveError::ErfEntry)?);
        }

        log::debug!("{}: {} resources", path.display(), entries.len());
        Ok(Self {
            path,
            len,
            entries,
            locations,
        })
    }
}

impl ResourceSource for ErfArchive {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    fn read(&self, index: usize) -> Result<Vec<u8>, ArchiveError> {
        let entry = &self.entries[index];
        let location = self.locations[index];
        if location.offset as u64 + location.size as u64 > self.len {
            return Err(ArchiveError::ErfResourceBounds(entry.name.clone()));
        }

        let mut fd = File::open(&self.path).map_err(ArchiveError::IO)?;
        fd.seek(SeekFrom::Start(location.offset as u64))
            .map_err(ArchiveError::ErfSeek)?;
        let mut data = vec![0u8; location.size as usize];
        fd.read_exact(&mut data).map_err(ArchiveError::IO)?;
        Ok(data)
    }
}

impl Debug for ErfArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "ErfArchive {{ {}, {} entries }}",
            self.path.display(),
            self.entries.len()
        ))
    }
}
