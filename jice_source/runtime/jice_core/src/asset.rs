use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::error;

/// Raw bytes of one asset, embedded or loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    data: Vec<u8>,
}

impl Asset {
    /// Used by generated code for assets compiled into the binary.
    pub fn from_bytes(bytes: &[u8]) -> Asset {
        Asset {
            data: bytes.to_vec(),
        }
    }

    /// Used by generated code for assets staged next to the binary.
    /// `rel` is resolved under `assets/` in the working directory; a
    /// missing file yields an empty asset and an error log.
    pub fn from_file(rel: &str) -> Asset {
        let path = Path::new("assets").join(rel);
        match fs::read(&path) {
            Ok(data) => Asset { data },
            Err(err) => {
                error!("failed to read asset '{}': {err}", path.display());
                Asset { data: Vec::new() }
            }
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Assets keyed by their project-relative path with `/` separators.
#[derive(Default)]
pub struct AssetStore {
    assets: HashMap<String, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        AssetStore::default()
    }

    pub fn add(&mut self, name: &str, asset: Asset) {
        self.assets.insert(name.to_string(), asset);
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_copies_data() {
        let asset = Asset::from_bytes(&[1, 2, 3]);
        assert_eq!(asset.data(), &[1, 2, 3]);
        assert_eq!(asset.len(), 3);
    }

    #[test]
    fn missing_file_yields_empty_asset() {
        let asset = Asset::from_file("no_such_dir/no_such_file.bin");
        assert!(asset.is_empty());
    }

    #[test]
    fn store_round_trip() {
        let mut store = AssetStore::new();
        store.add("images/logo.png", Asset::from_bytes(&[9]));
        assert!(store.contains("images/logo.png"));
        assert_eq!(store.get("images/logo.png").unwrap().len(), 1);
        assert!(store.get("images/other.png").is_none());
    }
}
