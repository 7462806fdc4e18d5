mod common;

use common::write_erf;
use nwn2::{
    erf::ErfArchive,
    error::ArchiveError,
    resources::{DirectoryModule, ResourceSource},
    restype::ResType,
};
use std::fs;

#[test]
fn read_nwn2_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.mod");
    let long_name = "a_resref_that_uses_all_32_chars_";
    write_erf(
        &path,
        b"MOD ",
        b"V1.1",
        &[("P_HHM_Hair01", 4000, &b"model"[..]), (long_name, 2017, &b"2DA V2.0"[..])],
    );

    let erf = ErfArchive::open(&path).unwrap();
    let entries = erf.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(&*entries[0].name, "P_HHM_Hair01");
    assert_eq!(entries[0].res_type, ResType::MDB);
    assert_eq!(&*entries[1].name, long_name);
    assert_eq!(entries[1].res_type.extension(), Some("2da"));

    assert_eq!(erf.read(0).unwrap(), b"model");
    assert_eq!(erf.read(1).unwrap(), b"2DA V2.0");

    let out = dir.path().join("out.mdb");
    erf.extract(0, &out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), b"model");
}

#[test]
fn read_nwn1_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.hak");
    write_erf(&path, b"HAK ", b"V1.0", &[("short", 2017, &b"x"[..])]);

    let erf = ErfArchive::open(&path).unwrap();
    assert_eq!(&*erf.entries()[0].name, "short");
    assert_eq!(erf.read(0).unwrap(), b"x");
}

#[test]
fn reject_non_erf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.ifo");
    write_erf(&path, b"GFF ", b"V3.2", &[]);

    assert!(matches!(
        ErfArchive::open(&path),
        Err(ArchiveError::BadErfHeader(_, file_type, _)) if &*file_type == "GFF "
    ));

    fs::write(&path, b"MOD V1.1").unwrap();
    assert!(matches!(ErfArchive::open(&path), Err(ArchiveError::ErfHeader(..))));
}

#[test]
fn truncated_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.mod");
    write_erf(&path, b"MOD ", b"V1.1", &[("P_HHM_Hair01", 4000, &[0u8; 64][..])]);

    let data = fs::read(&path).unwrap();
    fs::write(&path, &data[..data.len() - 10]).unwrap();

    let erf = ErfArchive::open(&path).unwrap();
    assert!(matches!(erf.read(0), Err(ArchiveError::ErfResourceBounds(name)) if &*name == "P_HHM_Hair01"));

    // key list cut off
    fs::write(&path, &data[..180]).unwrap();
    assert!(matches!(ErfArchive::open(&path), Err(ArchiveError::ErfEntry(_))));
}

#[test]
fn directory_module() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("P_HHM_Hair01.MDB"), b"model").unwrap();
    fs::write(dir.path().join("module.ifo"), b"ifo").unwrap();
    fs::write(dir.path().join("notes.unknown"), b"skip").unwrap();
    fs::create_dir(dir.path().join("nested.mdb")).unwrap();

    let module = DirectoryModule::open(dir.path()).unwrap();
    let names: Vec<_> = module.entries().iter().map(|e| (&*e.name, e.res_type)).collect();
    assert_eq!(names, vec![("P_HHM_Hair01", ResType::MDB), ("module", ResType(2014))]);

    let out = dir.path().join("copy.bin");
    module.extract(0, &out).unwrap();
    assert_eq!(fs::read(&out).unwrap(), b"model");
}
