//! Applies feed commands and preset reloads to a render session.

use log::{debug, warn};

use crate::feed::FeedCommand;
use crate::gamepad::RawControllerState;
use crate::profile::VisualizationProfile;
use crate::session::RenderSession;
use crate::user_profiles::UserProfiles;
use crate::watcher::StoreChanged;

/// Everything the frame loop receives from its worker threads.
#[derive(Debug)]
pub enum Signal {
    Feed(FeedCommand),
    StoreChanged,
}

impl From<FeedCommand> for Signal {
    fn from(cmd: FeedCommand) -> Self {
        Signal::Feed(cmd)
    }
}

impl From<StoreChanged> for Signal {
    fn from(_: StoreChanged) -> Self {
        Signal::StoreChanged
    }
}

pub struct App {
    pub session: RenderSession,
    pub presets: UserProfiles,
}

impl App {
    pub fn new(session: RenderSession, presets: UserProfiles) -> Self {
        App { session, presets }
    }

    pub fn handle(&mut self, signal: Signal) {
        match signal {
            Signal::Feed(cmd) => self.apply(cmd),
            Signal::StoreChanged => self.reload_presets(),
        }
    }

    pub fn apply(&mut self, cmd: FeedCommand) {
        debug!("feed: {cmd:?}");
        match cmd {
            FeedCommand::Connect { index, buttons, axes, id } => {
                self.connect(RawControllerState::idle(index, id, buttons, axes));
            }
            FeedCommand::State { index, buttons, axes } => {
                let raw = match self.session.entry(index) {
                    Some(entry) => entry.raw.with_readings(buttons, axes),
                    None => RawControllerState::new(index, "", buttons, axes),
                };
                if !self.session.update_state(raw.clone()) {
                    self.connect(raw);
                }
            }
            FeedCommand::Disconnect { index } => {
                if self.session.disconnect(index).is_none() {
                    debug!("disconnect for unknown controller {index}");
                }
            }
            FeedCommand::Profile { index, name } => match VisualizationProfile::from_name(&name) {
                Some(profile) => {
                    let style = self.presets.style_for(profile);
                    if !self.session.set_profile(index, profile, &style) {
                        warn!("profile override for unknown controller {index}");
                    }
                }
                None => warn!("no visualization profile named {name:?}"),
            },
            FeedCommand::Style { index, name } => {
                let Some(profile) = self.session.entry(index).map(|e| e.profile) else {
                    warn!("style change for unknown controller {index}");
                    return;
                };
                if let Some(style) = self.presets.profile(profile, Some(&name)) {
                    self.session.set_style(index, &style);
                }
            }
            FeedCommand::Mask(on) => self.session.set_mask(on),
            FeedCommand::Debug(on) => self.session.set_debug(on),
        }
    }

    /// The preset file changed: reread it and refresh each controller's
    /// preset by name. A controller whose preset is gone falls back to its
    /// profile's last used one. Our own saves are ignored.
    pub fn reload_presets(&mut self) {
        match self.presets.store_mut().reload() {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                warn!("Keeping current presets, reload failed: {e}");
                return;
            }
        }
        let current: Vec<_> = self
            .session
            .entries()
            .map(|e| (e.raw.index, e.profile, e.style.profile_name().map(str::to_string)))
            .collect();
        for (index, profile, name) in current {
            let style = name
                .and_then(|name| self.presets.find(profile, &name))
                .unwrap_or_else(|| self.presets.style_for(profile));
            self.session.set_style(index, &style);
        }
        self.session.mark_dirty();
    }

    fn connect(&mut self, raw: RawControllerState) {
        let profile = crate::resolver::resolve(&raw);
        let style = self.presets.style_for(profile);
        self.session.connect_as(raw, profile, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::gamepad::ButtonReading;
    use crate::style::{StyleOptions, PROFILE_NAME};
    use crate::user_profiles::{StyleStore, DARK_NAME};

    const FIREFOX_ID: &str = "045e-02ea-Microsoft X-Box One S pad";

    fn app() -> App {
        App::new(RenderSession::new(Color::WHITE), UserProfiles::new(StyleStore::in_memory()))
    }

    #[test]
    fn connect_then_state_keeps_identity() {
        let mut app = app();
        app.apply(FeedCommand::Connect { index: 0, buttons: 11, axes: 8, id: FIREFOX_ID.into() });
        let entry = app.session.entry(0).unwrap();
        assert_eq!(entry.profile, VisualizationProfile::XboxFirefox);
        assert_eq!(entry.style.profile_name(), Some("Default"));

        app.apply(FeedCommand::State { index: 0, buttons: vec![ButtonReading::new(1.0); 11], axes: vec![0.0; 8] });
        let entry = app.session.entry(0).unwrap();
        assert_eq!(entry.raw.id, FIREFOX_ID);
        assert!(entry.raw.button(0).pressed);
    }

    #[test]
    fn state_for_new_index_connects() {
        let mut app = app();
        app.apply(FeedCommand::State { index: 5, buttons: vec![ButtonReading::default(); 17], axes: vec![0.0; 4] });
        assert_eq!(app.session.entry(5).map(|e| e.profile), Some(VisualizationProfile::XboxChromium));
    }

    #[test]
    fn style_and_profile_overrides() {
        let mut app = app();
        app.apply(FeedCommand::Connect { index: 0, buttons: 17, axes: 4, id: "pad".into() });
        app.apply(FeedCommand::Style { index: 0, name: DARK_NAME.into() });
        assert_eq!(app.session.entry(0).unwrap().style.text("colorCase"), Some("#454545"));

        // The last used preset follows the controller into a new session.
        app.apply(FeedCommand::Disconnect { index: 0 });
        app.apply(FeedCommand::Connect { index: 1, buttons: 17, axes: 4, id: "pad".into() });
        assert_eq!(app.session.entry(1).unwrap().style.profile_name(), Some(DARK_NAME));

        app.apply(FeedCommand::Profile { index: 1, name: "Unknown".into() });
        let entry = app.session.entry(1).unwrap();
        assert_eq!(entry.profile, VisualizationProfile::Unknown);
        assert!(entry.style.is_empty());
    }

    fn two_pads_on_file(path: &std::path::Path) -> App {
        let mut app = App::new(RenderSession::new(Color::WHITE), UserProfiles::new(StyleStore::open(path)));
        app.apply(FeedCommand::Connect { index: 0, buttons: 17, axes: 4, id: "pad".into() });
        app.apply(FeedCommand::Connect { index: 1, buttons: 17, axes: 4, id: "pad".into() });
        app.apply(FeedCommand::Style { index: 0, name: DARK_NAME.into() });
        app.apply(FeedCommand::Style { index: 1, name: "Default".into() });
        app
    }

    fn preset_names(app: &App) -> Vec<Option<String>> {
        app.session.entries().map(|e| e.style.profile_name().map(str::to_string)).collect()
    }

    #[test]
    fn own_saves_do_not_restyle_other_controllers() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = two_pads_on_file(&dir.path().join("styles.toml"));
        let before = preset_names(&app);
        assert_eq!(before, vec![Some(DARK_NAME.to_string()), Some("Default".to_string())]);

        app.handle(Signal::StoreChanged);
        assert_eq!(preset_names(&app), before);
    }

    #[test]
    fn outside_edit_keeps_each_controllers_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styles.toml");
        let mut app = two_pads_on_file(&path);

        let mut editor = UserProfiles::new(StyleStore::open(&path));
        editor.add_or_update(
            VisualizationProfile::XboxChromium,
            &StyleOptions::new().with(PROFILE_NAME, "Mine"),
        );

        app.handle(Signal::StoreChanged);
        assert_eq!(preset_names(&app), vec![Some(DARK_NAME.to_string()), Some("Default".to_string())]);
        assert_eq!(app.session.entry(0).unwrap().style.text("colorCase"), Some("#454545"));
    }

    #[test]
    fn switches_reach_the_session() {
        let mut app = app();
        app.handle(Signal::Feed(FeedCommand::Mask(true)));
        app.handle(Signal::Feed(FeedCommand::Debug(true)));
        assert!(app.session.mask() && app.session.debug());
    }
}
