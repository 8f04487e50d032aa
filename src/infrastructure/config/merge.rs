//! Option merging: stored configuration plus per-invocation overrides.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use super::store::Sections;
use crate::domain::models::{keys, ClusterSpec, Overrides, DEFAULT_REGION};

/// Resolve one cluster's parameter set.
///
/// Precedence, lowest to highest:
/// 1. global defaults,
/// 2. the named section's stored values,
/// 3. command-line overrides with non-empty values.
///
/// An override carrying an empty value means "not specified" and never
/// shadows a configured value. After the merge, `private_key` is expanded
/// against the home directory and a missing `config_dir` is filled from the
/// directory the store was rooted at. A cluster with no matching section
/// resolves from overrides alone, with a warning.
#[must_use]
pub fn merge(
    cluster: &str,
    sections: &Sections,
    overrides: &Overrides,
    config_dir: &Path,
) -> ClusterSpec {
    let mut options = global_defaults();

    match sections.get(cluster) {
        Some(section) => {
            for (key, value) in section {
                options.insert(key.clone(), value.clone());
            }
        }
        None => {
            warn!(cluster, "no configuration section found, using overrides only");
        }
    }

    for (key, value) in overrides.iter() {
        if value.is_empty() {
            continue;
        }
        options.insert(key.to_string(), value.to_string());
    }

    let expanded = options
        .get(keys::PRIVATE_KEY)
        .and_then(|path| expand_home(path));
    if let Some(expanded) = expanded {
        options.insert(keys::PRIVATE_KEY.to_string(), expanded);
    }

    options
        .entry(keys::CONFIG_DIR.to_string())
        .or_insert_with(|| config_dir.display().to_string());

    ClusterSpec::new(cluster, options)
}

fn global_defaults() -> BTreeMap<String, String> {
    let mut defaults = BTreeMap::new();
    defaults.insert(keys::REGION.to_string(), DEFAULT_REGION.to_string());
    defaults
}

/// Expand a leading `~` against `$HOME`. Returns `None` when the path needs
/// no expansion or `HOME` is unset.
fn expand_home(path: &str) -> Option<String> {
    if path == "~" {
        return std::env::var("HOME").ok();
    }
    let rest = path.strip_prefix("~/")?;
    match std::env::var("HOME") {
        Ok(home) => Some(format!("{}/{rest}", home.trim_end_matches('/'))),
        Err(_) => {
            debug!(path, "HOME unset, leaving private_key unexpanded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sections_with(cluster: &str, pairs: &[(&str, &str)]) -> Sections {
        // Round-trip through the store to build real Sections.
        let dir = tempfile::tempdir().unwrap();
        let mut text = format!("[{cluster}]\n");
        for (key, value) in pairs {
            text.push_str(&format!("{key} = {value}\n"));
        }
        fs::write(dir.path().join(super::super::store::PRIMARY_FILE), text).unwrap();
        let store = super::super::store::ConfigStore::new(Some(dir.path().to_path_buf())).unwrap();
        store.load().unwrap()
    }

    #[test]
    fn nonempty_override_wins_over_stored_value() {
        let sections = sections_with("web", &[("region", "us-west-1")]);
        let mut overrides = Overrides::new();
        overrides.set("region", "eu-west-1");

        let spec = merge("web", &sections, &overrides, Path::new("/cfg"));
        assert_eq!(spec.region(), "eu-west-1");
    }

    #[test]
    fn empty_override_does_not_shadow_stored_value() {
        let sections = sections_with("web", &[("region", "us-west-1")]);
        let mut overrides = Overrides::new();
        overrides.set("region", "");

        let spec = merge("web", &sections, &overrides, Path::new("/cfg"));
        assert_eq!(spec.region(), "us-west-1");
    }

    #[test]
    fn region_defaults_when_unset_everywhere() {
        let sections = sections_with("web", &[("service_type", "basic")]);
        let spec = merge("web", &sections, &Overrides::new(), Path::new("/cfg"));
        assert_eq!(spec.region(), DEFAULT_REGION);
    }

    #[test]
    fn missing_section_resolves_from_overrides_only() {
        let sections = Sections::default();
        let mut overrides = Overrides::new();
        overrides.set("service_type", "basic");

        let spec = merge("ghost", &sections, &overrides, Path::new("/cfg"));
        assert_eq!(spec.service_type(), Some("basic"));
        assert_eq!(spec.region(), DEFAULT_REGION);
    }

    #[test]
    fn private_key_is_home_expanded() {
        let sections = sections_with("web", &[("private_key", "~/.ssh/cluster.pem")]);
        temp_env::with_var("HOME", Some("/home/op"), || {
            let spec = merge("web", &sections, &Overrides::new(), Path::new("/cfg"));
            assert_eq!(spec.private_key(), Some("/home/op/.ssh/cluster.pem"));
        });
    }

    #[test]
    fn absolute_private_key_is_untouched() {
        let sections = sections_with("web", &[("private_key", "/keys/cluster.pem")]);
        let spec = merge("web", &sections, &Overrides::new(), Path::new("/cfg"));
        assert_eq!(spec.private_key(), Some("/keys/cluster.pem"));
    }

    #[test]
    fn config_dir_filled_from_store_root_when_absent() {
        let sections = Sections::default();
        let spec = merge("ghost", &sections, &Overrides::new(), Path::new("/cfg/root"));
        assert_eq!(spec.config_dir(), Some(Path::new("/cfg/root")));
    }

    #[test]
    fn stored_config_dir_stamp_survives_merge() {
        let sections = sections_with("web", &[("x", "1")]);
        let spec = merge("web", &sections, &Overrides::new(), Path::new("/elsewhere"));
        // The store stamped config_dir at load time; the fill-in only
        // applies when the key is absent.
        assert_ne!(spec.config_dir(), Some(Path::new("/elsewhere")));
    }
}
