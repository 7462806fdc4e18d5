#![allow(dead_code)]

use std::path::Path;

pub const HAIR: &[u8; 4] = b"HAIR";
pub const SKIN: &[u8; 4] = b"SKIN";
pub const HELM: &[u8; 4] = b"HELM";

/// Model file of `size` bytes filled with a recognizable pattern.
pub fn model(size: usize, packets: &[(&[u8; 4], u32)]) -> Vec<u8> {
    let mut data: Vec<u8> = (0..size).map(|i| (i * 7 % 256) as u8).collect();
    data[..12].copy_from_slice(b"NWN2\x01\x00\x0c\x00\0\0\0\0");
    data[8] = packets.len() as u8;
    for (i, (tag, offset)) in packets.iter().enumerate() {
        let pos = 12 + i * 8;
        data[pos..pos + 4].copy_from_slice(*tag);
        data[pos + 4..pos + 8].copy_from_slice(&offset.to_le_bytes());
    }
    data
}

/// Writes an ERF archive holding `(resref, res_type, data)` resources.
pub fn write_erf(path: &Path, file_type: &[u8; 4], version: &[u8; 4], resources: &[(&str, u16, &[u8])]) {
    let resref_len = if version == b"V1.0" { 16 } else { 32 };
    let header_len = 160u32;
    let key_list = header_len;
    let resource_list = key_list + resources.len() as u32 * (resref_len as u32 + 8);
    let mut data_offset = resource_list + resources.len() as u32 * 8;

    let mut out = Vec::new();
    out.extend_from_slice(file_type);
    out.extend_from_slice(version);
    for value in [0, 0, resources.len() as u32, header_len, key_list, resource_list] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.resize(header_len as usize, 0);

    for (id, (name, res_type, _)) in resources.iter().enumerate() {
        let mut resref = vec![0u8; resref_len];
        resref[..name.len()].copy_from_slice(name.as_bytes());
        out.extend_from_slice(&resref);
        out.extend_from_slice(&(id as u32).to_le_bytes());
        out.extend_from_slice(&res_type.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    for (_, _, body) in resources {
        out.extend_from_slice(&data_offset.to_le_bytes());
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data_offset += body.len() as u32;
    }
    for (_, _, body) in resources {
        out.extend_from_slice(body);
    }

    std::fs::write(path, out).unwrap();
}

#[derive(Default)]
pub struct Lines(pub Vec<String>);

impl nwn2::batch::StatusSink for Lines {
    fn status(&mut self, line: &str) {
        self.0.push(line.to_owned());
    }
}
