use nwn2::error::PatchError;
use serde::Serialize;
use std::{
    error::Error,
    fs,
    io::{self, Write},
    path::Path,
};

#[derive(Debug, Serialize)]
struct FailureRow<'a> {
    path: &'a str,
    error: String,
}

/// Error message followed by its causes, e.g. the OS reason an open failed.
fn error_text(err: &PatchError) -> String {
    let mut text = err.kind.to_string();
    let mut source = err.kind.source();
    while let Some(cause) = source {
        text.push_str(&format!(" ({cause})"));
        source = cause.source();
    }
    text
}

pub fn write_error_log(mut w: impl Write, failures: &[PatchError]) -> io::Result<()> {
    if !failures.is_empty() {
        writeln!(w, "Errors:")?;
    }
    for failure in failures {
        writeln!(w, "{} : {}", failure.path.display(), error_text(failure))?;
    }
    w.flush()
}

pub fn save_error_log(path: &Path, failures: &[PatchError]) -> io::Result<()> {
    write_error_log(io::BufWriter::new(fs::File::create(path)?), failures)
}

pub fn write_csv(w: impl Write, failures: &[PatchError]) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(w);
    for failure in failures {
        let path = failure.path.to_string_lossy();
        w.serialize(FailureRow {
            path: &path,
            error: error_text(failure),
        })?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nwn2::{error::PatchErrorKind, mdb::Tag};
    use std::path::PathBuf;

    fn failures() -> Vec<PatchError> {
        vec![
            PatchError {
                path: PathBuf::from("out/p_hhm_hair_helm01.mdb"),
                kind: PatchErrorKind::TooShort(4),
            },
            PatchError {
                path: PathBuf::from("out/p_eef_hair_helm02.mdb"),
                kind: PatchErrorKind::OffsetOutOfBounds {
                    tag: Tag::HAIR,
                    offset: 0xbe,
                    required: 44,
                    size: 200,
                },
            },
            PatchError {
                path: PathBuf::from("out/gone.mdb"),
                kind: PatchErrorKind::OpenFailed(io::Error::new(io::ErrorKind::NotFound, "not here")),
            },
        ]
    }

    #[test]
    fn error_log() {
        let mut out = Vec::new();
        write_error_log(&mut out, &failures()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Errors:\n\
             out/p_hhm_hair_helm01.mdb : File is too short (4 bytes)\n\
             out/p_eef_hair_helm02.mdb : HAIR offset out of bounds (0xbe + 44 > 200)\n\
             out/gone.mdb : File could not be opened (not here)\n"
        );
    }

    #[test]
    fn empty_error_log() {
        let mut out = Vec::new();
        write_error_log(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn csv_report() {
        let mut out = Vec::new();
        write_csv(&mut out, &failures()[..1]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "path,error\nout/p_hhm_hair_helm01.mdb,File is too short (4 bytes)\n"
        );
    }
}
