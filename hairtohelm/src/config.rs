use anyhow::{anyhow, bail, Context};
use ini::Ini;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub module: String,
    /// Hak names, highest priority first.
    pub haks: Vec<String>,
    pub install: PathBuf,
    pub home: PathBuf,
    pub output: PathBuf,
}

fn existing_dir(ini: &Ini, key: &str, what: &str) -> anyhow::Result<PathBuf> {
    let path = ini
        .get_from(Some("paths"), key)
        .ok_or(anyhow!("{what} location not set."))?;
    let path = PathBuf::from(path.trim());
    if !path.exists() {
        bail!("{what} location does not exist.");
    }
    Ok(path)
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path)
            .with_context(|| format!("Cannot read configuration {}", path.display()))?;
        Self::from_ini(&ini)
    }

    pub fn from_ini(ini: &Ini) -> anyhow::Result<Self> {
        let module = ini
            .get_from(Some("settings"), "module")
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(anyhow!("Module not set."))?
            .to_owned();

        let haks = ini
            .get_from(Some("settings"), "haks")
            .map(|haks| {
                haks.split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let install = existing_dir(ini, "nwn2-install", "NWN2 install")?;
        let home = existing_dir(ini, "nwn2-home", "NWN2 home")?;
        let output = existing_dir(ini, "output", "Output")?;

        Ok(Self {
            module,
            haks,
            install,
            home,
            output,
        })
    }
}
