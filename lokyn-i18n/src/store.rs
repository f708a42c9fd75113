//! Message store
//!
//! Where message files come from ([`MessageSource`]) and how a file turns
//! into a [`Catalog`] ([`parse_message_file`]).
//!
//! # File naming
//!
//! The extension picks the format and the last dot-separated segment of the
//! file stem is the language tag:
//!
//! | File                 | Format | Language |
//! |----------------------|--------|----------|
//! | `fr.json`            | JSON   | `fr`     |
//! | `active.pt-BR.json`  | JSON   | `pt-BR`  |
//! | `de_AT.ftl`          | Fluent | `de-AT`  |

use crate::{Catalog, I18nError, JsonCatalog, LanguageTag, Result};
use lokyn_log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read access to a tree of message files.
///
/// Paths use `/` separators; directory entries are bare file names.
pub trait MessageSource {
    /// File names directly inside `dir`.
    fn list_dir(&self, dir: &str) -> io::Result<Vec<String>>;

    /// Contents of the file at `path`.
    fn read_file(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Join a directory and an entry name the way sources expect.
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Message files on the local filesystem, below `root`.
///
/// Source paths are joined onto the root, so the root itself may be any
/// [`Path`], UTF-8 or not. Symbolic links are followed.
#[derive(Debug, Clone, Default)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Source rooted at `root`. The default root is the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the source paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match (self.root.as_os_str().is_empty(), path.is_empty()) {
            (true, true) => PathBuf::from("."),
            (true, false) => PathBuf::from(path),
            (false, _) => self.root.join(path),
        }
    }
}

impl MessageSource for DirSource {
    /// Regular files and links to them. An entry whose link cannot be
    /// followed is still listed, so reading it fails and gets reported;
    /// an entry the directory iterator itself fails on is skipped.
    fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
        let dir = self.resolve(dir);
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(target: "lokyn::registry", "Skipping entry of {}: {}", dir.display(), error);
                    continue;
                }
            };
            let listed = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata.is_file(),
                Err(error) => {
                    debug!(target: "lokyn::registry", "Cannot stat {}: {}", entry.path().display(), error);
                    true
                }
            };
            if listed {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }
}

/// Message files held in memory, keyed by path.
///
/// ```
/// use lokyn_i18n::{MemorySource, MessageSource};
///
/// let source = MemorySource::new()
///     .with_file("locales/fr.json", r#"{"hello": "Bonjour"}"#)
///     .with_file("locales/de.json", r#"{"hello": "Hallo"}"#);
///
/// assert_eq!(source.list_dir("locales").unwrap(), vec!["de.json", "fr.json"]);
/// assert!(source.list_dir("missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl AsRef<[u8]>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl AsRef<[u8]>) {
        self.files.insert(path.into(), contents.as_ref().to_vec());
    }
}

fn list_paths<'a>(paths: impl Iterator<Item = &'a str>, dir: &str) -> io::Result<Vec<String>> {
    let dir = dir.trim_end_matches('/');
    let prefix = if dir.is_empty() {
        String::new()
    } else {
        format!("{}/", dir)
    };

    let mut found = false;
    let mut names = Vec::new();
    for path in paths {
        if let Some(rest) = path.strip_prefix(prefix.as_str()) {
            found = true;
            if !rest.contains('/') {
                names.push(rest.to_string());
            }
        }
    }

    if !found {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("directory not found: {}", dir),
        ));
    }
    names.sort();
    Ok(names)
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("file not found: {}", path))
}

impl MessageSource for MemorySource {
    fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
        list_paths(self.files.keys().map(String::as_str), dir)
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }
}

/// Message files compiled into the binary with `rust-embed`.
///
/// ```rust,ignore
/// #[derive(rust_embed::RustEmbed)]
/// #[folder = "locales/"]
/// struct Locales;
///
/// translator.add_translation_fs(&EmbeddedSource::<Locales>::new(), "")?;
/// ```
#[cfg(feature = "embed")]
pub struct EmbeddedSource<E> {
    _assets: std::marker::PhantomData<E>,
}

#[cfg(feature = "embed")]
impl<E: rust_embed::RustEmbed> EmbeddedSource<E> {
    /// Source over the files of `E`.
    pub fn new() -> Self {
        Self {
            _assets: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "embed")]
impl<E: rust_embed::RustEmbed> Default for EmbeddedSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embed")]
impl<E: rust_embed::RustEmbed> MessageSource for EmbeddedSource<E> {
    fn list_dir(&self, dir: &str) -> io::Result<Vec<String>> {
        let paths: Vec<_> = E::iter().collect();
        list_paths(paths.iter().map(|p| p.as_ref()), dir)
    }

    fn read_file(&self, path: &str) -> io::Result<Vec<u8>> {
        E::get(path)
            .map(|file| file.data.into_owned())
            .ok_or_else(|| not_found(path))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Supported message file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// `.json`
    Json,
    /// `.ftl`
    #[cfg(feature = "fluent")]
    Fluent,
}

impl MessageFormat {
    /// Format for a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            #[cfg(feature = "fluent")]
            "ftl" => Some(Self::Fluent),
            _ => None,
        }
    }
}

/// Language tag and format encoded in a message file name.
pub fn classify_file(filename: &str) -> Result<(LanguageTag, MessageFormat)> {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    let unsupported = || I18nError::UnsupportedFormat(base.to_string());

    let (stem, ext) = base.rsplit_once('.').ok_or_else(unsupported)?;
    let format = MessageFormat::from_extension(ext).ok_or_else(unsupported)?;
    let segment = stem.rsplit('.').next().unwrap_or(stem);

    let tag = LanguageTag::parse(segment).map_err(|e| I18nError::ParseError {
        file: base.to_string(),
        reason: e.to_string(),
    })?;
    Ok((tag, format))
}

/// Parse message file bytes into a catalog tagged with the file's language.
pub fn parse_message_file(bytes: &[u8], filename: &str) -> Result<Box<dyn Catalog>> {
    let (tag, format) = classify_file(filename)?;

    let text = std::str::from_utf8(bytes).map_err(|e| I18nError::ParseError {
        file: filename.to_string(),
        reason: e.to_string(),
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let catalog: Box<dyn Catalog> = match format {
        MessageFormat::Json => Box::new(JsonCatalog::from_json(tag, text)?),
        #[cfg(feature = "fluent")]
        MessageFormat::Fluent => Box::new(crate::FluentCatalog::from_ftl(tag, text)?),
    };
    Ok(catalog)
}
