//! The theme engine as the rest of the application sees it.
//!
//! `ThemeEngine` owns the registry, the preference store, the preview
//! controller and the bridge, and keeps the published style tokens in step
//! with all of them. Construct one per process and pass it to consumers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::accessibility::{analyze, AccessibilityReport};
use crate::bridge::{effective_palette, ApplicationBridge, StyleTokens, TokenMap, TokenSurface};
use crate::builtin::default_theme;
use crate::clipboard::{Clipboard, ClipboardExport};
use crate::contrast::{check_palette, ContrastResult};
use crate::error::ThemeError;
use crate::palette::DerivedPalette;
use crate::persistence::{
    PersistHandle, PersistedState, PersistenceWriter, RetryPolicy, Storage,
};
use crate::preference::{AppearanceMode, Preference, PreferenceStore};
use crate::preview::{Clock, PreviewController, PreviewState, DEFAULT_PREVIEW_DURATION};
use crate::registry::{ThemeQuery, ThemeRegistry};
use crate::transport::{self, ThemeRecord};
use crate::types::ThemeDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub retry: RetryPolicy,
    /// Used when `preview_theme` is called without a duration.
    pub preview_duration: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            preview_duration: DEFAULT_PREVIEW_DURATION,
        }
    }
}

pub struct ThemeEngine<S: TokenSurface = TokenMap> {
    registry: ThemeRegistry,
    preferences: PreferenceStore,
    preview: PreviewController,
    bridge: ApplicationBridge<S>,
    clock: Arc<dyn Clock>,
    persist: PersistHandle,
    preview_duration: Duration,
    // last, so pending writes drain once everything else is gone
    writer: Option<PersistenceWriter>,
}

impl<S: TokenSurface> ThemeEngine<S> {
    /// Load stored state and start persisting to `storage`.
    ///
    /// Unreadable state is logged and replaced by defaults. Stored imports
    /// that no longer validate are skipped one by one.
    pub fn open<St: Storage>(
        storage: St,
        surface: S,
        clock: Arc<dyn Clock>,
        options: EngineOptions,
    ) -> Self {
        let loaded = match storage.load() {
            Ok(Some(state)) => {
                debug!(
                    version = state.version,
                    themes = state.themes.len(),
                    "Loaded theme state"
                );
                Some(state)
            }
            Ok(None) => {
                info!("No stored theme state, starting with defaults");
                None
            }
            Err(e) => {
                warn!(error = %e, "Stored theme state is unreadable, starting with defaults");
                None
            }
        };

        let mut registry = ThemeRegistry::new();
        let preference = match loaded {
            Some(state) => {
                restore_themes(&mut registry, state.themes);
                Some(state.preference)
            }
            None => None,
        };

        let mut preferences =
            PreferenceStore::restore(preference, &registry, PersistHandle::detached());
        let initial = PersistedState::new(preferences.get().clone(), imported_records(&registry));
        let writer = PersistenceWriter::spawn(storage, initial, options.retry);
        let persist = writer.handle();
        preferences.attach(persist.clone());

        Self::assemble(
            registry,
            preferences,
            surface,
            clock,
            persist,
            Some(writer),
            options.preview_duration,
        )
    }

    /// An engine with defaults and no storage behind it.
    pub fn detached(surface: S, clock: Arc<dyn Clock>) -> Self {
        let registry = ThemeRegistry::new();
        let preferences = PreferenceStore::restore(None, &registry, PersistHandle::detached());
        Self::assemble(
            registry,
            preferences,
            surface,
            clock,
            PersistHandle::detached(),
            None,
            DEFAULT_PREVIEW_DURATION,
        )
    }

    fn assemble(
        registry: ThemeRegistry,
        preferences: PreferenceStore,
        surface: S,
        clock: Arc<dyn Clock>,
        persist: PersistHandle,
        writer: Option<PersistenceWriter>,
        preview_duration: Duration,
    ) -> Self {
        let mut engine = Self {
            registry,
            preferences,
            preview: PreviewController::new(),
            bridge: ApplicationBridge::new(surface),
            clock,
            persist,
            preview_duration,
            writer,
        };
        engine.refresh();
        engine
    }

    /// The palette currently in effect, preview included.
    pub fn get_palette(&mut self) -> DerivedPalette {
        self.refresh();
        match self.bridge.current_palette() {
            Some(palette) => *palette,
            None => effective_palette(&default_theme(), self.preferences.get()),
        }
    }

    /// Id of the theme currently in effect, preview included.
    pub fn effective_theme_id(&mut self) -> String {
        self.refresh();
        self.bridge
            .current_theme_id()
            .unwrap_or(crate::builtin::DEFAULT_THEME_ID)
            .to_string()
    }

    /// Tokens last published to the surface.
    pub fn tokens(&mut self) -> StyleTokens {
        self.refresh();
        self.bridge.tokens().cloned().unwrap_or_default()
    }

    pub fn surface(&self) -> &S {
        self.bridge.surface()
    }

    pub fn list_themes(&self) -> &[ThemeDefinition] {
        self.registry.list()
    }

    pub fn query_themes(&self, query: &ThemeQuery) -> Vec<&ThemeDefinition> {
        self.registry.query(query)
    }

    pub fn theme(&self, id: &str) -> Option<&ThemeDefinition> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Palette `id` would get under the current preferences.
    pub fn palette_for(&self, id: &str) -> Option<DerivedPalette> {
        let theme = self.lookup(id, "palette")?;
        Some(effective_palette(theme, self.preferences.get()))
    }

    /// Select a theme permanently. Cancels any running preview.
    pub fn set_theme(&mut self, id: &str) -> bool {
        if !self.preferences.set_theme(id, &self.registry) {
            return false;
        }
        self.preview.cancel();
        info!(id, "Theme selected");
        self.refresh();
        true
    }

    /// Show `id` temporarily. Falls back to the configured duration.
    pub fn preview_theme(&mut self, id: &str, duration: Option<Duration>) -> bool {
        if self.lookup(id, "preview").is_none() {
            return false;
        }
        let duration = duration.unwrap_or(self.preview_duration);
        self.preview.start(id, duration, self.clock.now());
        self.refresh();
        true
    }

    pub fn cancel_preview(&mut self) -> bool {
        let cancelled = self.preview.cancel().is_some();
        self.refresh();
        cancelled
    }

    pub fn preview_state(&mut self) -> PreviewState {
        let state = self.preview.state(self.clock.now());
        self.refresh();
        state
    }

    pub fn export_theme(&self, id: &str) -> Option<String> {
        transport::export_theme(&self.registry, id)
    }

    /// Export and copy in one step. A clipboard failure keeps the text.
    pub fn export_to_clipboard(
        &self,
        id: &str,
        clipboard: &mut dyn Clipboard,
    ) -> Option<ClipboardExport> {
        let text = self.export_theme(id)?;
        let copied = clipboard.set_text(&text);
        if let Err(e) = &copied {
            warn!(id, error = %e, "Exported theme could not be copied");
        }
        Some(ClipboardExport { text, copied })
    }

    /// Validate and register a theme, then persist the imported set.
    pub fn import_theme(&mut self, content: &str) -> Result<String, ThemeError> {
        let id = transport::import_theme(&mut self.registry, content)?;
        info!(id = %id, "Theme imported");
        self.persist.submit_themes(imported_records(&self.registry));
        Ok(id)
    }

    pub fn accessibility_report(&self, id: &str) -> Option<AccessibilityReport> {
        let theme = self.lookup(id, "accessibility report")?;
        Some(analyze(theme.core()))
    }

    /// WCAG contrast of the palette `id` would get right now.
    pub fn contrast_audit(&self, id: &str) -> Option<Vec<ContrastResult>> {
        let theme = self.lookup(id, "contrast audit")?;
        let palette = effective_palette(theme, self.preferences.get());
        Some(check_palette(theme, &palette))
    }

    pub fn preference(&self) -> &Preference {
        self.preferences.get()
    }

    pub fn set_high_contrast(&mut self, enabled: bool) {
        self.preferences.set_high_contrast(enabled);
        self.refresh();
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.preferences.set_reduced_motion(enabled);
        self.refresh();
    }

    pub fn set_appearance(&mut self, mode: AppearanceMode) {
        self.preferences.set_appearance(mode);
        self.refresh();
    }

    pub fn reset_preferences(&mut self) {
        self.preview.cancel();
        self.preferences.reset();
        self.refresh();
    }

    /// Wait for every submitted write to finish.
    pub fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush();
        }
    }

    fn lookup(&self, id: &str, action: &str) -> Option<&ThemeDefinition> {
        match self.registry.require(id) {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!(id, action, error = %e, "Ignoring request for unknown theme");
                None
            }
        }
    }

    /// Re-resolve the effective theme and publish it.
    fn refresh(&mut self) {
        let now = self.clock.now();
        let previewing = self.preview.active(now).map(|s| s.theme_id.clone());
        let preference = self.preferences.get();

        let theme = previewing
            .as_deref()
            .and_then(|id| self.registry.get(id))
            .or_else(|| self.registry.get(&preference.active_theme_id));

        match theme {
            Some(theme) => {
                self.bridge.sync(theme, preference);
            }
            None => {
                self.bridge.sync(&default_theme(), preference);
            }
        }
    }
}

fn imported_records(registry: &ThemeRegistry) -> Vec<ThemeRecord> {
    registry.imported().map(ThemeRecord::from).collect()
}

fn restore_themes(registry: &mut ThemeRegistry, records: Vec<ThemeRecord>) {
    for record in records {
        let id = record.id.clone();
        let restored = ThemeDefinition::try_from(record)
            .map_err(ThemeError::from)
            .and_then(|theme| registry.insert(theme).map_err(ThemeError::from));
        if let Err(e) = restored {
            warn!(id = %id, error = %e, "Skipping stored theme");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::persistence::MemoryStorage;
    use crate::preview::ManualClock;

    struct FailingClipboard;

    impl Clipboard for FailingClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".to_string()))
        }
    }

    fn engine() -> (ThemeEngine, ManualClock) {
        let clock = ManualClock::new();
        let engine = ThemeEngine::detached(TokenMap::new(), Arc::new(clock.clone()));
        (engine, clock)
    }

    #[test]
    fn test_starts_on_default_theme() {
        let (mut engine, _) = engine();
        assert_eq!(engine.effective_theme_id(), "default-light");
        assert_eq!(engine.surface().apply_count(), 1);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut engine, _) = engine();
        assert!(!engine.set_theme("nope"));
        assert!(!engine.preview_theme("nope", None));
        assert!(engine.export_theme("nope").is_none());
        assert!(engine.accessibility_report("nope").is_none());
        assert!(engine.contrast_audit("nope").is_none());
        assert!(engine.palette_for("nope").is_none());
        assert_eq!(engine.effective_theme_id(), "default-light");
        assert!(engine.contrast_audit("default-dark").is_some());
    }

    #[test]
    fn test_preview_uses_configured_default_duration() {
        let (mut engine, clock) = engine();
        assert!(engine.preview_theme("default-dark", None));

        clock.advance(DEFAULT_PREVIEW_DURATION - Duration::from_millis(1));
        assert_eq!(engine.effective_theme_id(), "default-dark");

        clock.advance(Duration::from_millis(1));
        assert_eq!(engine.effective_theme_id(), "default-light");
    }

    #[test]
    fn test_clipboard_failure_keeps_export() {
        let (engine, _) = engine();
        let export = engine
            .export_to_clipboard("warm-hearth", &mut FailingClipboard)
            .unwrap();
        assert!(!export.is_copied());
        assert_eq!(Some(export.text), engine.export_theme("warm-hearth"));
    }

    #[test]
    fn test_preference_flags_republish_tokens() {
        let (mut engine, _) = engine();
        engine.set_reduced_motion(true);
        assert_eq!(engine.tokens().get("--motion-scale"), Some("0"));
        engine.set_reduced_motion(true);
        assert_eq!(engine.surface().apply_count(), 2);
    }

    #[test]
    fn test_open_skips_invalid_stored_themes() {
        let mut bad = ThemeRecord::from(&default_theme());
        bad.id = "bad".to_string();
        bad.core.base.l = 20.0; // dark background on a light theme
        let mut good = ThemeRecord::from(&default_theme());
        good.id = "good".to_string();

        let storage = MemoryStorage::with_state(PersistedState::new(
            Preference {
                active_theme_id: "good".to_string(),
                ..Default::default()
            },
            vec![bad, good],
        ));
        let mut engine = ThemeEngine::open(
            storage,
            TokenMap::new(),
            Arc::new(ManualClock::new()),
            EngineOptions::default(),
        );
        assert!(engine.theme("bad").is_none());
        assert!(engine.theme("good").is_some());
        assert_eq!(engine.effective_theme_id(), "good");
    }
}
