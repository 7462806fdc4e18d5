use crate::{
    error::{ArchiveError, PatchError},
    mdb,
    resources::{ResourceRef, Resources},
    restype::ResType,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};

lazy_static! {
    static ref HAIR_MODEL_REGEX: Regex = Regex::new(r"^P_").unwrap();
}

/// Receives progress lines from [`run`].
pub trait StatusSink {
    fn status(&mut self, line: &str);
}

/// Standard player hair models only: `P_..._HAIR..` but not `_HAIR_` variants.
pub fn is_hair_model(name: &str) -> bool {
    let name = name.to_uppercase();
    HAIR_MODEL_REGEX.is_match(&name) && name.contains("_HAIR") && !name.contains("_HAIR_")
}

/// `P_HHM_Hair01` becomes `p_hhm_hair_helm01`.
pub fn helm_name(name: &str) -> Option<String> {
    let mut name = name.to_lowercase();
    let at = name.find("_hair")? + "_hair".len();
    name.insert_str(at, "_helm");
    Some(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HairModel {
    pub resource: ResourceRef,
    pub name: Box<str>,
    pub helm_name: String,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    pub failures: Vec<PatchError>,
}

pub fn find_hair_models(resources: &Resources) -> Vec<HairModel> {
    resources
        .encapsulated()
        .into_iter()
        .rev()
        .filter(|(_, entry)| entry.res_type == ResType::MDB && is_hair_model(&entry.name))
        .filter_map(|(resource, entry)| {
            Some(HairModel {
                resource,
                name: entry.name.clone(),
                helm_name: helm_name(&entry.name)?,
            })
        })
        .collect()
}

pub fn target_path(output_dir: &Path, model: &HairModel) -> PathBuf {
    output_dir.join(format!("{}.mdb", model.helm_name))
}

/// Copies every model to `output_dir`, replacing files left by earlier runs.
pub fn export_models(
    resources: &Resources,
    models: &[HairModel],
    output_dir: &Path,
) -> Result<Vec<(PathBuf, String)>, ArchiveError> {
    let mut files = Vec::with_capacity(models.len());
    for model in models {
        let target = target_path(output_dir, model);
        if target.exists() {
            fs::remove_file(&target).map_err(|e| ArchiveError::Extract(model.name.clone(), e))?;
        }
        resources.demand(model.resource, &target)?;
        log::debug!("Exported {} to {}", model.name, target.display());
        files.push((target, model.helm_name.clone()));
    }
    Ok(files)
}

/// Converts each `(path, name)` pair. A failing file never stops the others.
pub fn convert_models(files: &[(PathBuf, String)]) -> BatchReport {
    let mut report = BatchReport::default();
    for (path, name) in files {
        match mdb::convert(path, name) {
            Ok(summary) => {
                log::debug!(
                    "{}: {} skin(s) embossed, {} hair packet(s) converted",
                    path.display(),
                    summary.skins_embossed,
                    summary.hairs_converted
                );
                report.converted.push(path.clone());
            }
            Err(err) => {
                log::warn!("{err}");
                report.failures.push(err);
            }
        }
    }
    report
}

pub fn run(
    resources: &Resources,
    output_dir: &Path,
    sink: &mut dyn StatusSink,
) -> Result<BatchReport, ArchiveError> {
    let models = find_hair_models(resources);
    sink.status(&format!("Gathering hair models ... found {} models.", models.len()));

    let files = export_models(resources, &models, output_dir)?;
    sink.status("Exporting models ... complete!");

    let report = convert_models(&files);
    sink.status("Converting models ... complete!");

    Ok(report)
}
