//! Named style presets per visualization profile, persisted as TOML.
//!
//! Each visualization profile owns one namespace in the store, keyed by its
//! profile name, so two families' presets never collide. A namespace holds
//! the preset list and the name of the preset used last.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::VisualizationProfile;
use crate::style::{StyleOptions, PROFILE_NAME};

pub const NAMESPACE_PREFIX: &str = "gamepadVisualizationUserProfiles-";
pub const DEFAULT_NAME: &str = "Default";
pub const DARK_NAME: &str = "Default (Dark)";
const CUSTOMIZED_SUFFIX: &str = " (Customized)";
const DARK_CASE: &str = "#454545";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Namespace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used: Option<String>,
    /// Kept untyped so one damaged namespace cannot spoil the whole file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profiles: Option<toml::Value>,
}

/// Key/value backing for the presets: in memory, or a TOML file.
#[derive(Debug, Default)]
pub struct StyleStore {
    path: Option<PathBuf>,
    data: BTreeMap<String, Namespace>,
    /// File contents as last loaded or saved, to tell our own writes apart.
    synced: Option<String>,
}

impl StyleStore {
    pub fn in_memory() -> Self {
        StyleStore::default()
    }

    /// Strict load. A missing file is an error here.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let data = toml::from_str(&content).map_err(|e| Error::StoreParse(format!("{}: {e}", path.display())))?;
        Ok(StyleStore { path: Some(path.to_path_buf()), data, synced: Some(content) })
    }

    /// Load `path` if it holds a usable store, otherwise start empty. Either
    /// way later saves go to `path`.
    pub fn open(path: &Path) -> Self {
        if !path.exists() {
            info!("No style store at {}, starting with defaults", path.display());
            return Self::empty_at(path);
        }
        match Self::load(path) {
            Ok(store) => {
                info!("Loaded style store from {}", path.display());
                store
            }
            Err(e) => {
                warn!("Ignoring unreadable style store: {e}");
                Self::empty_at(path)
            }
        }
    }

    fn empty_at(path: &Path) -> Self {
        StyleStore { path: Some(path.to_path_buf()), ..Self::default() }
    }

    /// Re-read the backing file after an outside edit. Returns `false` when
    /// the file still holds what this store last loaded or saved. Keeps the
    /// current contents when the file cannot be read.
    pub fn reload(&mut self) -> Result<bool> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        let content = std::fs::read_to_string(&path)?;
        if self.synced.as_deref() == Some(content.as_str()) {
            debug!("Style store unchanged since last sync");
            return Ok(false);
        }
        *self = Self::load(&path)?;
        Ok(true)
    }

    pub fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let content = toml::to_string(&self.data)?;
        std::fs::write(path, &content)?;
        debug!("Saved style store to {}", path.display());
        self.synced = Some(content);
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn namespace(&self, vp: VisualizationProfile) -> Option<&Namespace> {
        self.data.get(&namespace_key(vp))
    }

    fn namespace_mut(&mut self, vp: VisualizationProfile) -> &mut Namespace {
        self.data.entry(namespace_key(vp)).or_default()
    }
}

pub fn namespace_key(vp: VisualizationProfile) -> String {
    format!("{NAMESPACE_PREFIX}{}", vp.name())
}

/// Preset management over a `StyleStore`. Every mutation is saved right
/// away; a failed save is logged and the in-memory state is kept.
#[derive(Debug)]
pub struct UserProfiles {
    store: StyleStore,
}

impl UserProfiles {
    pub fn new(store: StyleStore) -> Self {
        UserProfiles { store }
    }

    pub fn store(&self) -> &StyleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StyleStore {
        &mut self.store
    }

    /// Built-in presets. Hardware families also get a dark-case variant.
    pub fn defaults(vp: VisualizationProfile) -> Vec<StyleOptions> {
        let mut out = vec![StyleOptions::new().with(PROFILE_NAME, DEFAULT_NAME)];
        if vp.family().is_some() {
            out.push(StyleOptions::new().with(PROFILE_NAME, DARK_NAME).with("colorCase", DARK_CASE));
        }
        out
    }

    fn is_builtin(vp: VisualizationProfile, name: &str) -> bool {
        Self::defaults(vp).iter().any(|p| p.profile_name() == Some(name))
    }

    /// Stored presets for `vp`. Missing, empty or damaged lists are replaced
    /// by the defaults.
    pub fn profiles(&mut self, vp: VisualizationProfile) -> Vec<StyleOptions> {
        let stored = self.store.namespace(vp).and_then(|ns| ns.profiles.clone());
        let parsed = match stored {
            None => None,
            Some(value) => match value.try_into::<Vec<StyleOptions>>() {
                Ok(list) => {
                    let named: Vec<_> = list.into_iter().filter(|p| p.profile_name().is_some()).collect();
                    if named.is_empty() {
                        warn!("{}: no usable presets stored, resetting to defaults", vp.name());
                        None
                    } else {
                        Some(named)
                    }
                }
                Err(e) => {
                    warn!("{}: stored presets are damaged ({e}), resetting to defaults", vp.name());
                    None
                }
            },
        };
        match parsed {
            Some(list) => list,
            None => {
                let defaults = Self::defaults(vp);
                self.write_profiles(vp, &defaults);
                defaults
            }
        }
    }

    /// Insert or replace a preset by name and make it the last used one.
    /// A preset named like a built-in is stored as "<name> (Customized)";
    /// returns `true` when that rename happened.
    pub fn add_or_update(&mut self, vp: VisualizationProfile, style: &StyleOptions) -> bool {
        let name = style.profile_name().unwrap_or(DEFAULT_NAME).to_string();
        let mut style = style.clone();
        let renamed = Self::is_builtin(vp, &name);
        let name = if renamed {
            let customized = format!("{name}{CUSTOMIZED_SUFFIX}");
            info!("{}: preset {name:?} is built in, saving as {customized:?}", vp.name());
            customized
        } else {
            name
        };
        style.set(PROFILE_NAME, name.as_str());

        let mut list = self.profiles(vp);
        match list.iter_mut().find(|p| p.profile_name() == Some(name.as_str())) {
            Some(existing) => *existing = style,
            None => list.push(style),
        }
        self.write_profiles(vp, &list);
        self.set_last_used(vp, Some(name));
        renamed
    }

    /// Delete a user preset. Built-ins cannot be removed.
    pub fn remove(&mut self, vp: VisualizationProfile, name: &str) -> bool {
        if Self::is_builtin(vp, name) {
            warn!("{}: refusing to remove built-in preset {name:?}", vp.name());
            return false;
        }
        let mut list = self.profiles(vp);
        let before = list.len();
        list.retain(|p| p.profile_name() != Some(name));
        if list.len() == before {
            warn!("{}: no preset named {name:?}", vp.name());
            return false;
        }
        self.write_profiles(vp, &list);
        self.set_last_used(vp, None);
        true
    }

    /// Stored preset by name. Unlike `profile`, last used is left alone.
    pub fn find(&mut self, vp: VisualizationProfile, name: &str) -> Option<StyleOptions> {
        self.profiles(vp).into_iter().find(|p| p.profile_name() == Some(name))
    }

    /// Preset by name (the default when `None`), recorded as last used.
    pub fn profile(&mut self, vp: VisualizationProfile, name: Option<&str>) -> Option<StyleOptions> {
        let name = name.unwrap_or(DEFAULT_NAME);
        let found = self.find(vp, name);
        match &found {
            Some(_) => self.set_last_used(vp, Some(name.to_string())),
            None => warn!("{}: no preset named {name:?}", vp.name()),
        }
        found
    }

    pub fn last_used(&mut self, vp: VisualizationProfile) -> Option<StyleOptions> {
        let name = self.store.namespace(vp)?.last_used.clone()?;
        self.profiles(vp).into_iter().find(|p| p.profile_name() == Some(name.as_str()))
    }

    /// Style to draw a newly connected controller with: the last used
    /// preset, else the default one, else nothing (profile defaults).
    pub fn style_for(&mut self, vp: VisualizationProfile) -> StyleOptions {
        if let Some(style) = self.last_used(vp) {
            return style;
        }
        self.profiles(vp)
            .into_iter()
            .find(|p| p.profile_name() == Some(DEFAULT_NAME))
            .unwrap_or_default()
    }

    fn write_profiles(&mut self, vp: VisualizationProfile, list: &[StyleOptions]) {
        match toml::Value::try_from(list) {
            Ok(value) => {
                self.store.namespace_mut(vp).profiles = Some(value);
                self.persist();
            }
            Err(e) => warn!("{}: cannot encode presets: {e}", vp.name()),
        }
    }

    fn set_last_used(&mut self, vp: VisualizationProfile, name: Option<String>) {
        let ns = self.store.namespace_mut(vp);
        if ns.last_used != name {
            ns.last_used = name;
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save() {
            warn!("Failed to save style store: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XBOX: VisualizationProfile = VisualizationProfile::XboxChromium;

    fn names(list: &[StyleOptions]) -> Vec<&str> {
        list.iter().filter_map(|p| p.profile_name()).collect()
    }

    #[test]
    fn defaults_per_profile_kind() {
        let mut up = UserProfiles::new(StyleStore::in_memory());
        assert_eq!(names(&up.profiles(XBOX)), vec![DEFAULT_NAME, DARK_NAME]);
        assert_eq!(names(&up.profiles(VisualizationProfile::Unknown)), vec![DEFAULT_NAME]);
    }

    #[test]
    fn builtin_name_is_customized() {
        let mut up = UserProfiles::new(StyleStore::in_memory());
        let style = StyleOptions::new().with(PROFILE_NAME, DEFAULT_NAME).with("colorCase", "red");
        assert!(up.add_or_update(XBOX, &style));
        assert_eq!(names(&up.profiles(XBOX)), vec![DEFAULT_NAME, DARK_NAME, "Default (Customized)"]);
        let last = up.last_used(XBOX).unwrap();
        assert_eq!(last.profile_name(), Some("Default (Customized)"));
        assert_eq!(last.text("colorCase"), Some("red"));

        // Saving the customized one again updates in place.
        let again = last.with("colorCase", "blue");
        assert!(!up.add_or_update(XBOX, &again));
        assert_eq!(up.profiles(XBOX).len(), 3);
        assert_eq!(up.style_for(XBOX).text("colorCase"), Some("blue"));
    }

    #[test]
    fn remove_refuses_builtins_and_clears_last_used() {
        let mut up = UserProfiles::new(StyleStore::in_memory());
        assert!(!up.remove(XBOX, DARK_NAME));
        up.add_or_update(XBOX, &StyleOptions::new().with(PROFILE_NAME, "Mine"));
        assert!(up.last_used(XBOX).is_some());
        assert!(up.remove(XBOX, "Mine"));
        assert!(up.last_used(XBOX).is_none());
        assert!(!up.remove(XBOX, "Mine"));
    }

    #[test]
    fn profile_lookup_records_last_used() {
        let mut up = UserProfiles::new(StyleStore::in_memory());
        assert!(up.profile(XBOX, Some("Missing")).is_none());
        let dark = up.profile(XBOX, Some(DARK_NAME)).unwrap();
        assert_eq!(dark.text("colorCase"), Some(DARK_CASE));
        assert_eq!(up.style_for(XBOX), dark);
        assert_eq!(up.profile(XBOX, None).unwrap().profile_name(), Some(DEFAULT_NAME));
    }

    #[test]
    fn namespaces_are_separate() {
        let mut up = UserProfiles::new(StyleStore::in_memory());
        up.add_or_update(XBOX, &StyleOptions::new().with(PROFILE_NAME, "Mine"));
        assert_eq!(up.profiles(VisualizationProfile::XboxFirefox).len(), 2);
    }

    #[test]
    fn customized_name_survives_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.toml");

        let mut up = UserProfiles::new(StyleStore::open(&path));
        let style = StyleOptions::new()
            .with(PROFILE_NAME, DEFAULT_NAME)
            .with("showProfileName", true)
            .with("colorA", "#00ff00");
        up.add_or_update(XBOX, &style);

        let mut reopened = UserProfiles::new(StyleStore::open(&path));
        let last = reopened.last_used(XBOX).unwrap();
        assert_eq!(last.profile_name(), Some("Default (Customized)"));
        assert!(last.flag("showProfileName"));
        assert_eq!(last.text("colorA"), Some("#00ff00"));
    }

    #[test]
    fn damaged_namespace_resets_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.toml");
        std::fs::write(
            &path,
            "[gamepadVisualizationUserProfiles-XBoxOne360ControllerChromium]\nlast_used = \"Gone\"\nprofiles = 42\n",
        )
        .unwrap();

        let mut up = UserProfiles::new(StyleStore::open(&path));
        assert_eq!(names(&up.profiles(XBOX)), vec![DEFAULT_NAME, DARK_NAME]);
        assert!(up.last_used(XBOX).is_none());
    }

    #[test]
    fn reload_skips_own_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.toml");

        let mut up = UserProfiles::new(StyleStore::open(&path));
        up.profile(XBOX, Some(DARK_NAME));
        assert!(!up.store_mut().reload().unwrap());

        let mut other = UserProfiles::new(StyleStore::open(&path));
        other.add_or_update(XBOX, &StyleOptions::new().with(PROFILE_NAME, "Mine"));
        assert!(up.store_mut().reload().unwrap());
        assert!(up.find(XBOX, "Mine").is_some());
        assert!(!up.store_mut().reload().unwrap());
    }

    #[test]
    fn in_memory_reload_is_a_no_op() {
        let mut store = StyleStore::in_memory();
        assert!(!store.reload().unwrap());
    }

    #[test]
    fn unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(StyleStore::load(&path).is_err());
        let mut up = UserProfiles::new(StyleStore::open(&path));
        assert_eq!(up.style_for(XBOX).profile_name(), Some(DEFAULT_NAME));
    }
}
