use lazy_static::lazy_static;
use std::{collections::HashMap, fmt};

lazy_static! {
    static ref EXTENSION_TO_TYPE: HashMap<&'static str, u16> = {
        let mut m = HashMap::new();
        m.insert("bmp", 1);
        m.insert("tga", 3);
        m.insert("wav", 4);
        m.insert("txt", 10);
        m.insert("nss", 2009);
        m.insert("ncs", 2010);
        m.insert("are", 2012);
        m.insert("ifo", 2014);
        m.insert("2da", 2017);
        m.insert("git", 2023);
        m.insert("uti", 2025);
        m.insert("utc", 2027);
        m.insert("dlg", 2029);
        m.insert("dds", 2033);
        m.insert("gic", 2046);
        m.insert("mdb", 4000);
        m.insert("gr2", 4003);
        m.insert("fxe", 4004);
        m.insert("jrl", 2056);
        m.insert("trn", 3000);
        m.insert("trx", 3002);
        m.shrink_to_fit();
        m
    };
    static ref TYPE_TO_EXTENSION: HashMap<u16, &'static str> =
        EXTENSION_TO_TYPE.iter().map(|(ext, ty)| (*ty, *ext)).collect();
}

/// Numeric resource type as stored in archive key lists.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResType(pub u16);

impl ResType {
    pub const MDB: ResType = ResType(4000);

    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSION_TO_TYPE
            .get(ext.to_ascii_lowercase().as_str())
            .map(|ty| Self(*ty))
    }

    pub fn extension(&self) -> Option<&'static str> {
        TYPE_TO_EXTENSION.get(&self.0).copied()
    }
}

impl fmt::Debug for ResType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extension() {
            Some(ext) => f.write_fmt(format_args!("ResType({})", ext)),
            None => f.write_fmt(format_args!("ResType({})", self.0)),
        }
    }
}
