use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One entry of the directory service payload
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryEntry {
    pub nome: String,
    pub municipio: MunicipalityRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MunicipalityRef {
    pub id: u32,
}

/// Read-only lookup from municipality id to display name
#[derive(Debug, Clone, Default)]
pub struct MunicipalityDirectory {
    names: HashMap<u32, String>,
}

impl MunicipalityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from directory entries; the first name seen for an id wins
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DirectoryEntry>,
    {
        let mut names = HashMap::new();
        for entry in entries {
            names.entry(entry.municipio.id).or_insert(entry.nome);
        }
        Self { names }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<DirectoryEntry> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn resolve(&self, municipality_id: u32) -> Option<&str> {
        self.names.get(&municipality_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for MunicipalityDirectory {
    fn from_iter<T: IntoIterator<Item = (u32, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
