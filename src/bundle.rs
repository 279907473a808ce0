use std::{borrow::Cow, collections::BTreeMap, fmt, marker::PhantomData};

use rust_embed::{EmbeddedFile, RustEmbed};
use serde::de::DeserializeOwned;
use smol_str::SmolStr;

use crate::error::Error;

/// A name inside a bundle directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirEntry {
    name: SmolStr,
    is_dir: bool,
}

impl DirEntry {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Read-only view over an embedded bundle.
///
/// Paths are slash separated and unrooted (`file/sample1.json`), with `"."`
/// naming the root of the view. A view created with [`Bundle::sub`] resolves
/// every path relative to its sub-directory, so the same file can be reached
/// as `file/sample1.json` from the whole bundle and as `sample1.json` from
/// `sub("file")`.
///
/// Directories are not stored; they exist because some embedded file lives
/// underneath them.
pub struct Bundle<E> {
    _marker: PhantomData<fn() -> E>,
    root: SmolStr,
}

impl<E> Clone for Bundle<E> {
    fn clone(&self) -> Self {
        Self {
            _marker: PhantomData,
            root: self.root.clone(),
        }
    }
}

impl<E> fmt::Debug for Bundle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("source", &std::any::type_name::<E>())
            .field("root", &self.root)
            .finish()
    }
}

impl<E: RustEmbed> Default for Bundle<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed> Bundle<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
            root: SmolStr::default(),
        }
    }

    /// The sub-directory this view is rooted at, `""` for the whole bundle.
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Re-roots the view at `dir`.
    ///
    /// Only the shape of `dir` is checked. Re-rooting at a directory the
    /// bundle does not contain gives an empty view.
    pub fn sub(&self, dir: &str) -> Result<Self, Error> {
        let full = self.checked(dir)?;
        Ok(Self {
            _marker: PhantomData,
            root: SmolStr::new(full),
        })
    }

    /// Returns the embedded file together with its metadata.
    pub fn open(&self, path: &str) -> Result<EmbeddedFile, Error> {
        let full = self.checked(path)?;
        if !full.is_empty() {
            if let Some(file) = E::get(&full) {
                return Ok(file);
            }
        }

        if is_dir_key::<E>(&full) {
            Err(Error::IsDir(path.to_owned()))
        } else {
            Err(Error::NotFound(path.to_owned()))
        }
    }

    pub fn read_file(&self, path: &str) -> Result<Cow<'static, [u8]>, Error> {
        self.open(path).map(|file| file.data)
    }

    /// Lists the entries directly inside `dir`, sorted by name.
    pub fn read_dir(&self, dir: &str) -> Result<Vec<DirEntry>, Error> {
        let full = self.checked(dir)?;
        let prefix = if full.is_empty() {
            String::new()
        } else {
            format!("{full}/")
        };

        let mut entries: BTreeMap<SmolStr, bool> = BTreeMap::new();
        for key in E::iter() {
            let Some(rest) = key.strip_prefix(prefix.as_str()) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    entries.insert(SmolStr::new(child), true);
                }
                None => {
                    entries.entry(SmolStr::new(rest)).or_insert(false);
                }
            }
        }

        if entries.is_empty() && !full.is_empty() {
            return if E::get(&full).is_some() {
                Err(Error::NotDir(dir.to_owned()))
            } else {
                Err(Error::NotFound(dir.to_owned()))
            };
        }

        Ok(entries
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }

    pub fn exists(&self, path: &str) -> bool {
        match self.checked(path) {
            Ok(full) => (!full.is_empty() && E::get(&full).is_some()) || is_dir_key::<E>(&full),
            Err(_) => false,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.checked(path)
            .map(|full| is_dir_key::<E>(&full))
            .unwrap_or(false)
    }

    /// Reads `path` and decodes it as JSON.
    pub fn decode<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let data = self.read_file(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    // Maps a view-relative path onto the bundle's key space. The root of the
    // whole bundle maps to "".
    fn checked(&self, path: &str) -> Result<String, Error> {
        if !valid_path(path) {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        Ok(match (self.root.is_empty(), path == ".") {
            (_, true) => self.root.to_string(),
            (true, false) => path.to_owned(),
            (false, false) => format!("{}/{}", self.root, path),
        })
    }
}

fn is_dir_key<E: RustEmbed>(full: &str) -> bool {
    if full.is_empty() {
        return true;
    }
    E::iter().any(|key| {
        key.strip_prefix(full)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Reports whether `name` is a well-formed bundle path: unrooted, slash
/// separated, with no empty, `.` or `..` elements. `"."` alone is the root.
pub fn valid_path(name: &str) -> bool {
    if name == "." {
        return true;
    }
    !name.is_empty()
        && name
            .split('/')
            .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SampleFiles;

    #[test]
    fn valid_paths() {
        assert!(valid_path("."));
        assert!(valid_path("file"));
        assert!(valid_path("file/sample1.json"));

        assert!(!valid_path(""));
        assert!(!valid_path("/file"));
        assert!(!valid_path("file/"));
        assert!(!valid_path("file//sample1.json"));
        assert!(!valid_path("./file"));
        assert!(!valid_path("file/../file"));
    }

    #[test]
    fn root_lists_the_top_level_directory() {
        let bundle = Bundle::<SampleFiles>::new();
        let entries = bundle.read_dir(".").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "file");
        assert!(entries[0].is_dir());
    }

    #[test]
    fn sub_view_joins_roots() {
        let bundle = Bundle::<SampleFiles>::new().sub("file").unwrap();
        assert_eq!(bundle.root(), "file");
        assert_eq!(bundle.sub(".").unwrap().root(), "file");
        assert!(bundle.is_dir("."));
        assert!(bundle.exists("sample1.txt"));
        assert!(!bundle.exists("file/sample1.txt"));
    }

    #[test]
    fn sub_rejects_malformed_paths() {
        let bundle = Bundle::<SampleFiles>::new();
        assert!(matches!(bundle.sub("../file"), Err(Error::InvalidPath(_))));
        assert!(matches!(bundle.sub("/file"), Err(Error::InvalidPath(_))));
    }
}
