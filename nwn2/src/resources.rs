use crate::{erf::ErfArchive, error::ArchiveError, restype::ResType};
use std::{
    collections::HashSet,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub name: Box<str>,
    pub res_type: ResType,
}

/// A container of named resources: an ERF archive or a directory module.
pub trait ResourceSource: Debug {
    fn path(&self) -> &Path;

    fn entries(&self) -> &[ResourceEntry];

    fn read(&self, index: usize) -> Result<Vec<u8>, ArchiveError>;

    /// Writes the resource at `index` to `dest`.
    fn extract(&self, index: usize, dest: &Path) -> Result<(), ArchiveError> {
        let data = self.read(index)?;
        fs::write(dest, data).map_err(|e| ArchiveError::Extract(self.entries()[index].name.clone(), e))
    }
}

/// A module stored as a plain folder of `resref.ext` files.
#[derive(Debug)]
pub struct DirectoryModule {
    path: PathBuf,
    entries: Vec<ResourceEntry>,
    files: Vec<PathBuf>,
}

impl DirectoryModule {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_owned();

        let mut found = Vec::new();
        for dir_entry in fs::read_dir(&path).map_err(ArchiveError::IO)? {
            let dir_entry = dir_entry.map_err(ArchiveError::IO)?;
            if !dir_entry.file_type().map_err(ArchiveError::IO)?.is_file() {
                continue;
            }
            let file = dir_entry.path();
            let res_type = file
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(ResType::from_extension);
            let name = file.file_stem().and_then(|stem| stem.to_str());
            if let (Some(res_type), Some(name)) = (res_type, name) {
                let entry = ResourceEntry {
                    name: name.into(),
                    res_type,
                };
                found.push((entry, file));
            }
        }
        found.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

        let (entries, files) = found.into_iter().unzip();
        Ok(Self {
            path,
            entries,
            files,
        })
    }
}

impl ResourceSource for DirectoryModule {
    fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    fn read(&self, index: usize) -> Result<Vec<u8>, ArchiveError> {
        fs::read(&self.files[index]).map_err(ArchiveError::IO)
    }

    fn extract(&self, index: usize, dest: &Path) -> Result<(), ArchiveError> {
        fs::copy(&self.files[index], dest)
            .map(|_| ())
            .map_err(|e| ArchiveError::Extract(self.entries[index].name.clone(), e))
    }
}

/// Handle to one resource within [`Resources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    source: usize,
    index: usize,
}

/// Loaded resource sources, highest priority first.
#[derive(Debug, Default)]
pub struct Resources {
    sources: Vec<Box<dyn ResourceSource>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source with lower priority than every source added before.
    pub fn add(&mut self, source: impl ResourceSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn sources(&self) -> &[Box<dyn ResourceSource>] {
        &self.sources
    }

    /// Loads `module` together with its haks from the user's home directory
    /// or the game installation.
    pub fn load_module(
        module: &str,
        home: &Path,
        install: &Path,
        haks: &[impl AsRef<str>],
    ) -> Result<Self, ArchiveError> {
        let mut resources = Self::new();

        for hak in haks {
            let hak = hak.as_ref();
            let file_name = format!("{hak}.hak");
            let path = [home.join("hak"), install.join("hak")]
                .into_iter()
                .map(|dir| dir.join(&file_name))
                .find(|path| path.is_file())
                .ok_or_else(|| ArchiveError::HakNotFound(hak.into()))?;
            log::info!("Loading hak {}", path.display());
            resources.add(ErfArchive::open(path)?);
        }

        let file_name = format!("{module}.mod");
        let home_mod = home.join("modules").join(&file_name);
        let home_dir = home.join("modules").join(module);
        let install_mod = install.join("Modules").join(&file_name);

        if home_mod.is_file() {
            log::info!("Loading module {}", home_mod.display());
            resources.add(ErfArchive::open(home_mod)?);
        } else if home_dir.is_dir() {
            log::info!("Loading directory module {}", home_dir.display());
            resources.add(DirectoryModule::open(home_dir)?);
        } else if install_mod.is_file() {
            log::info!("Loading module {}", install_mod.display());
            resources.add(ErfArchive::open(install_mod)?);
        } else {
            return Err(ArchiveError::ModuleNotFound(module.into()));
        }

        Ok(resources)
    }

    /// Every resource across all sources. A resref/type pair present in
    /// several sources is reported once, from the highest priority source.
    pub fn encapsulated(&self) -> Vec<(ResourceRef, &ResourceEntry)> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for (source_idx, source) in self.sources.iter().enumerate() {
            for (index, entry) in source.entries().iter().enumerate() {
                if seen.insert((entry.name.to_ascii_lowercase(), entry.res_type)) {
                    let resource = ResourceRef {
                        source: source_idx,
                        index,
                    };
                    result.push((resource, entry));
                }
            }
        }
        result
    }

    pub fn entry(&self, resource: ResourceRef) -> &ResourceEntry {
        &self.sources[resource.source].entries()[resource.index]
    }

    pub fn read(&self, resource: ResourceRef) -> Result<Vec<u8>, ArchiveError> {
        self.sources[resource.source].read(resource.index)
    }

    /// Materializes a resource at `dest`.
    pub fn demand(&self, resource: ResourceRef, dest: &Path) -> Result<(), ArchiveError> {
        self.sources[resource.source].extract(resource.index, dest)
    }
}
