use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

use log::{debug, info};

use crate::config::*;
use crate::{decode, tokenize};

/// Errors when declaring or loading the sources of a registry.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RegistryError {
    /// The same name was declared twice.
    DuplicateSource(String),
    /// No source with this name was declared.
    UnknownSource(String),
    /// The source already holds a dataset.
    AlreadyLoaded(String),
}

impl Error for RegistryError {}

impl Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateSource(name) => write!(f, "source {} declared twice", name),
            RegistryError::UnknownSource(name) => write!(f, "unknown source {}", name),
            RegistryError::AlreadyLoaded(name) => write!(f, "source {} is already loaded", name),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct Entry {
    dataset: Dataset,
    profile: VillageProfile,
}

/// The datasets of all the sources, in declaration order.
///
/// Each source is loaded at most once. Sources that were declared but not
/// loaded (yet) are still listed, and selecting them returns nothing.
///
/// ```
/// use village_profile::{DatasetRegistry, SourceDescriptor};
///
/// let sources = vec![
///     SourceDescriptor::new("Kampangar", "0"),
///     SourceDescriptor::new("Kuntang", "1348203775"),
/// ];
/// let mut registry = DatasetRegistry::new(&sources)?;
/// registry.load_text("Kuntang", "header\nA quiet village by the sea")?;
///
/// assert_eq!(registry.names(), vec!["Kampangar", "Kuntang"]);
/// assert!(registry.select(0).is_none());
/// assert_eq!(registry.select(1).unwrap().description, "A quiet village by the sea");
/// assert!(registry.select(2).is_none());
/// # Ok::<(), village_profile::RegistryError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DatasetRegistry {
    sources: Vec<SourceDescriptor>,
    entries: Vec<Option<Entry>>,
}

impl DatasetRegistry {
    pub fn new(sources: &[SourceDescriptor]) -> Result<DatasetRegistry, RegistryError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for s in sources {
            if !seen.insert(s.name.as_str()) {
                return Err(RegistryError::DuplicateSource(s.name.clone()));
            }
        }
        Ok(DatasetRegistry {
            sources: sources.to_vec(),
            entries: vec![None; sources.len()],
        })
    }

    /// Declares the sources and loads the grids that were retrieved.
    pub fn populate(
        sources: &[SourceDescriptor],
        loaded: Vec<(SourceDescriptor, Grid)>,
    ) -> Result<DatasetRegistry, RegistryError> {
        let mut registry = DatasetRegistry::new(sources)?;
        for (source, grid) in loaded {
            registry.load(&source.name, grid)?;
        }
        info!(
            "DatasetRegistry: {} of {} sources loaded",
            registry.loaded_count(),
            registry.len()
        );
        Ok(registry)
    }

    /// Decodes the grid and stores it with its profile.
    pub fn load(&mut self, name: &str, grid: Grid) -> Result<&VillageProfile, RegistryError> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| RegistryError::UnknownSource(name.to_string()))?;
        if self.entries[idx].is_some() {
            return Err(RegistryError::AlreadyLoaded(name.to_string()));
        }
        debug!("DatasetRegistry::load: {} ({} rows)", name, grid.len());
        let profile = decode(&grid);
        let entry = self.entries[idx].insert(Entry {
            dataset: Dataset::new(name, grid),
            profile,
        });
        Ok(&entry.profile)
    }

    pub fn load_text(&mut self, name: &str, text: &str) -> Result<&VillageProfile, RegistryError> {
        self.load(name, tokenize(text))
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// The profile of the source at `index`, if it exists and was loaded.
    pub fn select(&self, index: usize) -> Option<&VillageProfile> {
        self.entries
            .get(index)
            .and_then(|e| e.as_ref())
            .map(|e| &e.profile)
    }

    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.entries
            .get(index)
            .and_then(|e| e.as_ref())
            .map(|e| &e.dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<SourceDescriptor> {
        vec![
            SourceDescriptor::new("Kampangar", "0"),
            SourceDescriptor::new("Kuntang", "1348203775"),
            SourceDescriptor::new("Pulo Dua", "363769630"),
        ]
    }

    #[test]
    fn names_in_declared_order() {
        let registry = DatasetRegistry::new(&sources()).unwrap();
        assert_eq!(registry.names(), vec!["Kampangar", "Kuntang", "Pulo Dua"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.loaded_count(), 0);
        assert_eq!(registry.index_of("Pulo Dua"), Some(2));
        assert_eq!(registry.index_of("Banggai"), None);
    }

    #[test]
    fn select_is_bounds_checked() {
        let mut registry = DatasetRegistry::new(&sources()).unwrap();
        registry.load_text("Kampangar", "h\nDesa pesisir").unwrap();
        assert_eq!(registry.select(0).unwrap().description, "Desa pesisir");
        assert!(registry.select(1).is_none());
        assert!(registry.select(3).is_none());
        assert!(registry.select(usize::MAX).is_none());
    }

    #[test]
    fn load_is_write_once() {
        let mut registry = DatasetRegistry::new(&sources()).unwrap();
        registry.load_text("Kuntang", "a\nb").unwrap();
        assert_eq!(
            registry.load_text("Kuntang", "c\nd"),
            Err(RegistryError::AlreadyLoaded("Kuntang".to_string()))
        );
        assert_eq!(registry.select(1).unwrap().description, "b");
    }

    #[test]
    fn unknown_and_duplicate_sources() {
        let mut registry = DatasetRegistry::new(&sources()).unwrap();
        assert_eq!(
            registry.load_text("Banggai", "a"),
            Err(RegistryError::UnknownSource("Banggai".to_string()))
        );
        let mut dup = sources();
        dup.push(SourceDescriptor::new("Kuntang", "1"));
        assert_eq!(
            DatasetRegistry::new(&dup),
            Err(RegistryError::DuplicateSource("Kuntang".to_string()))
        );
    }

    #[test]
    fn dataset_header_and_body() {
        let mut registry = DatasetRegistry::new(&sources()).unwrap();
        registry.load_text("Pulo Dua", "h1,h2\nr1\nr2").unwrap();
        let ds = registry.dataset(2).unwrap();
        assert_eq!(ds.name, "Pulo Dua");
        assert_eq!(ds.header_row(), &["h1".to_string(), "h2".to_string()]);
        assert_eq!(ds.body_rows().len(), 2);

        let empty = Dataset::new("empty", Grid::default());
        assert!(empty.header_row().is_empty());
        assert!(empty.body_rows().is_empty());
    }

    #[test]
    fn populate_keeps_missing_sources() {
        let srcs = sources();
        let loaded = vec![(srcs[2].clone(), tokenize("h\nPulo"))];
        let registry = DatasetRegistry::populate(&srcs, loaded).unwrap();
        assert_eq!(registry.loaded_count(), 1);
        assert!(registry.select(0).is_none());
        assert_eq!(registry.select(2).unwrap().description, "Pulo");
    }
}
