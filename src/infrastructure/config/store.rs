//! Layered cluster configuration loading.
//!
//! Configuration lives in an INI-like `clusters.cfg` plus a sibling
//! `clusters.cfg.d/` directory of fragment files. Fragments are merged in
//! walk order as layers above the primary file: later layers override
//! earlier ones key-by-key within a section, never section-by-section.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::models::keys;

/// Primary configuration file name.
pub const PRIMARY_FILE: &str = "clusters.cfg";

/// Fragment directory name, sibling to the primary file.
pub const FRAGMENT_DIR: &str = "clusters.cfg.d";

/// Recognized extension for fragment files.
pub const CONFIG_EXTENSION: &str = "cfg";

/// Default config root under the home directory.
const DEFAULT_CONFIG_DIR: &str = ".corral";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("could not determine home directory (HOME is not set)")]
    NoHome,
}

/// The merged cluster sections: cluster name to key/value pairs.
///
/// Immutable once returned from [`ConfigStore::load`]; safe to share across
/// concurrent merge operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    map: BTreeMap<String, BTreeMap<String, String>>,
}

impl Sections {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.map.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Cluster names in sorted order. Each section name is a cluster name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Merge one parsed file into the accumulated view.
    ///
    /// Sections this file introduces are stamped with `this_dir` (the
    /// directory containing the file) and `config_dir` (the config root) so
    /// downstream resolution knows where relative paths anchor. Explicit
    /// keys in the file override the stamps.
    fn merge_fragment(&mut self, parsed: ParsedFragment, this_dir: &Path, config_dir: &Path) {
        for (name, pairs) in parsed {
            let section = match self.map.entry(name) {
                Entry::Vacant(entry) => {
                    let section = entry.insert(BTreeMap::new());
                    section.insert(keys::THIS_DIR.to_string(), this_dir.display().to_string());
                    section.insert(
                        keys::CONFIG_DIR.to_string(),
                        config_dir.display().to_string(),
                    );
                    section
                }
                Entry::Occupied(entry) => entry.into_mut(),
            };
            for (key, value) in pairs {
                section.insert(key, value);
            }
        }
    }
}

/// Key/value pairs per section, in file order within each section.
type ParsedFragment = BTreeMap<String, Vec<(String, String)>>;

/// Loads and cascades the cluster configuration tree.
pub struct ConfigStore {
    config_dir: PathBuf,
    explicit: bool,
}

impl ConfigStore {
    /// Create a store rooted at `config_dir`, or at `~/.corral` when the
    /// caller supplies none.
    ///
    /// # Errors
    /// [`ConfigError::NoHome`] when no directory was supplied and `HOME`
    /// is unset.
    pub fn new(config_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        match config_dir {
            Some(dir) => Ok(Self {
                config_dir: dir,
                explicit: true,
            }),
            None => {
                let home = std::env::var_os("HOME").ok_or(ConfigError::NoHome)?;
                Ok(Self {
                    config_dir: PathBuf::from(home).join(DEFAULT_CONFIG_DIR),
                    explicit: false,
                })
            }
        }
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load and merge all configuration layers.
    ///
    /// Layer order, lowest precedence first:
    /// 1. `clusters.cfg` in the current working directory — only when no
    ///    explicit config directory was supplied;
    /// 2. the primary `clusters.cfg` under the config root;
    /// 3. every `*.cfg` under `clusters.cfg.d/`, in walk order, following
    ///    symlinks.
    ///
    /// Unreadable or malformed files are logged and skipped.
    ///
    /// # Errors
    /// Only when the primary file path is unusable for a reason other than
    /// absence (e.g. permission denied).
    pub fn load(&self) -> Result<Sections, ConfigError> {
        let cwd = if self.explicit {
            None
        } else {
            std::env::current_dir().ok()
        };
        self.load_with_cwd(cwd.as_deref())
    }

    fn load_with_cwd(&self, cwd: Option<&Path>) -> Result<Sections, ConfigError> {
        let mut sections = Sections::default();

        if let Some(cwd) = cwd {
            self.merge_file(&mut sections, &cwd.join(PRIMARY_FILE), false)?;
        }

        self.merge_file(&mut sections, &self.config_dir.join(PRIMARY_FILE), true)?;

        let fragment_dir = self.config_dir.join(FRAGMENT_DIR);
        if fragment_dir.is_dir() {
            for entry in WalkDir::new(&fragment_dir)
                .follow_links(true)
                .sort_by_file_name()
            {
                match entry {
                    Ok(entry)
                        if entry.file_type().is_file()
                            && entry.path().extension().is_some_and(|ext| ext == CONFIG_EXTENSION) =>
                    {
                        self.merge_file(&mut sections, entry.path(), false)?;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(%err, dir = %fragment_dir.display(), "skipping unreadable fragment entry");
                    }
                }
            }
        }

        Ok(sections)
    }

    /// Parse one file and merge it in. Soft-fails unless this is the
    /// primary file and the failure is an I/O error other than absence.
    fn merge_file(
        &self,
        sections: &mut Sections,
        path: &Path,
        primary: bool,
    ) -> Result<(), ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file absent");
                return Ok(());
            }
            Err(err) if primary => {
                return Err(ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                warn!(%err, path = %path.display(), "skipping unreadable config file");
                return Ok(());
            }
        };

        match parse_fragment(&text, path) {
            Ok(parsed) => {
                let this_dir = path.parent().unwrap_or(Path::new("."));
                sections.merge_fragment(parsed, this_dir, &self.config_dir);
                debug!(path = %path.display(), "merged config layer");
            }
            Err(err) => {
                warn!(%err, "skipping malformed config file");
            }
        }
        Ok(())
    }
}

/// Parse INI-like text: `[section]` headers, `key = value` pairs, `#`/`;`
/// comments, blank lines ignored.
fn parse_fragment(text: &str, path: &Path) -> Result<ParsedFragment, ConfigError> {
    let mut parsed = ParsedFragment::new();
    let mut current: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err(ConfigError::Malformed {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: "unterminated section header".to_string(),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Malformed {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: "empty section name".to_string(),
                });
            }
            parsed.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::Malformed {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: format!("expected `key = value`, got '{line}'"),
            });
        };
        let Some(section) = &current else {
            return Err(ConfigError::Malformed {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: "property outside any [section]".to_string(),
            });
        };
        parsed
            .entry(section.clone())
            .or_default()
            .push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(parsed)
}
