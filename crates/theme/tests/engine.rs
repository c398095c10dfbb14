use std::sync::Arc;
use std::time::Duration;

use carematch_theme::accessibility::{Grade, Temperature};
use carematch_theme::persistence::PersistedState;
use carematch_theme::{
    derive, AppearanceMode, EngineOptions, FileStorage, LchColor, ManualClock, MemoryStorage,
    PreviewState, RetryPolicy, SemanticRole, Storage, ThemeCore, ThemeEngine, ThemeRegistry,
    TokenMap, ValidationError, Variant,
};
use pretty_assertions::assert_eq;

fn options() -> EngineOptions {
    EngineOptions {
        retry: RetryPolicy::immediate(3),
        ..Default::default()
    }
}

fn open(storage: MemoryStorage) -> (ThemeEngine, ManualClock) {
    let clock = ManualClock::new();
    let engine = ThemeEngine::open(storage, TokenMap::new(), Arc::new(clock.clone()), options());
    (engine, clock)
}

fn palette_of(engine: &ThemeEngine, id: &str) -> carematch_theme::DerivedPalette {
    let theme = engine.theme(id).unwrap();
    derive(theme.core(), theme.variant())
}

#[test]
fn test_derive_is_total_and_idempotent() {
    let registry = ThemeRegistry::new();
    for theme in registry.list() {
        let a = derive(theme.core(), theme.variant());
        let b = derive(theme.core(), theme.variant());
        assert_eq!(a, b);
        assert_eq!(a.len(), SemanticRole::COUNT);
        for (_, color) in a.iter() {
            assert!((0.0..=100.0).contains(&color.l));
            assert!(color.c >= 0.0);
            assert!((0.0..360.0).contains(&color.h));
        }
    }
}

#[test]
fn test_preview_expires_back_to_persisted_theme() {
    let (mut engine, clock) = open(MemoryStorage::new());
    let persisted = engine.get_palette();

    assert!(engine.preview_theme("midnight-harbor", Some(Duration::from_millis(1000))));
    assert_eq!(engine.get_palette(), palette_of(&engine, "midnight-harbor"));

    clock.advance(Duration::from_millis(1000));
    assert_eq!(engine.get_palette(), persisted);
    assert_eq!(engine.preview_state(), PreviewState::Idle);
}

#[test]
fn test_cancel_preview_reverts_immediately() {
    let (mut engine, _clock) = open(MemoryStorage::new());
    let persisted = engine.get_palette();

    engine.preview_theme("forest-evening", Some(Duration::from_millis(1000)));
    assert!(engine.cancel_preview());
    assert_eq!(engine.get_palette(), persisted);
    assert!(!engine.cancel_preview());
}

#[test]
fn test_set_theme_cancels_preview_without_stale_revert() {
    let (mut engine, clock) = open(MemoryStorage::new());

    engine.preview_theme("forest-evening", Some(Duration::from_secs(5)));
    assert!(engine.set_theme("warm-hearth"));
    assert_eq!(engine.get_palette(), palette_of(&engine, "warm-hearth"));

    clock.advance(Duration::from_secs(10));
    assert_eq!(engine.get_palette(), palette_of(&engine, "warm-hearth"));
    assert_eq!(engine.effective_theme_id(), "warm-hearth");
}

#[test]
fn test_preview_is_not_persisted() {
    let storage = MemoryStorage::new();
    let (mut engine, _clock) = open(storage.clone());

    engine.preview_theme("default-dark", None);
    engine.flush();
    assert!(storage.saved().is_none());
    assert_eq!(engine.preference().active_theme_id, "default-light");
}

#[test]
fn test_out_of_range_import_is_rejected() {
    let (mut engine, _clock) = open(MemoryStorage::new());
    let before = engine.list_themes().len();
    let payload = r#"{"id":"glare","name":"Glare","variant":"light","category":"custom",
        "core":{"base":[150,4,250],"accent":[64,60,255]}}"#;

    let err = engine.import_theme(payload).unwrap_err();
    assert!(matches!(
        err.validation_errors(),
        [ValidationError::OutOfRange { field, .. }] if field == "core.base.L"
    ));
    assert_eq!(engine.list_themes().len(), before);
}

#[test]
fn test_export_import_roundtrip_across_engines() {
    let (source, _) = open(MemoryStorage::new());
    let text = source.export_theme("lavender-calm").unwrap();
    let renamed = text.replace("\"lavender-calm\"", "\"lavender-copy\"");

    let (mut target, _) = open(MemoryStorage::new());
    let id = target.import_theme(&renamed).unwrap();
    assert_eq!(id, "lavender-copy");
    assert_eq!(
        palette_of(&target, "lavender-copy"),
        palette_of(&source, "lavender-calm")
    );
}

#[test]
fn test_reference_accessibility_example() {
    let (mut engine, _) = open(MemoryStorage::new());
    let payload = r#"{"id":"harbor-copy","name":"Harbor","variant":"dark","category":"calm",
        "core":{"base":[8,4,250],"accent":[64,60,255]}}"#;
    engine.import_theme(payload).unwrap();

    let report = engine.accessibility_report("harbor-copy").unwrap();
    assert!((report.contrast_ratio - 11.76).abs() < 1e-9);
    assert_eq!(report.grade, Grade::Aaa);
    assert_eq!(report.temperature, Temperature::Cool);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["grade"], "AAA");
}

#[test]
fn test_grade_is_monotonic_in_lightness_delta() {
    let accent = LchColor::new(50.0, 40.0, 200.0);
    let mut previous = Grade::Fail;
    for step in 0..=50 {
        let base = LchColor::new(50.0 + step as f64, 5.0, 200.0);
        let grade = carematch_theme::accessibility::analyze(&ThemeCore::new(base, accent)).grade;
        assert!(grade >= previous);
        previous = grade;
    }
    assert_eq!(previous, Grade::Aaa);
}

#[test]
fn test_state_survives_restart() {
    let storage = MemoryStorage::new();
    {
        let (mut engine, _) = open(storage.clone());
        engine.set_theme("sage-garden");
        engine.set_high_contrast(true);
        engine.set_appearance(AppearanceMode::Dark);
        let payload = engine
            .export_theme("soft-sand")
            .unwrap()
            .replace("\"soft-sand\"", "\"my-sand\"");
        engine.import_theme(&payload).unwrap();
    }

    let saved = storage.saved().unwrap();
    assert_eq!(saved.themes.len(), 1);

    let (mut engine, _) = open(storage);
    let preference = engine.preference().clone();
    assert_eq!(preference.active_theme_id, "sage-garden");
    assert!(preference.high_contrast);
    assert_eq!(preference.appearance, AppearanceMode::Dark);
    assert!(engine.theme("my-sand").is_some());
    assert!(!engine.theme("my-sand").unwrap().is_builtin());

    // dark override on a light theme
    let palette = engine.get_palette();
    assert!(palette.get(SemanticRole::Background).l < 50.0);
}

#[test]
fn test_write_failures_are_retried() {
    let storage = MemoryStorage::new();
    storage.fail_next(2);
    let (mut engine, _) = open(storage.clone());

    engine.set_reduced_motion(true);
    assert!(engine.preference().reduced_motion);
    engine.flush();

    assert!(storage.saved().unwrap().preference.reduced_motion);
}

#[test]
fn test_exhausted_retries_keep_memory_state() {
    let storage = MemoryStorage::new();
    storage.fail_next(10);
    let (mut engine, _) = open(storage.clone());

    engine.set_theme("default-dark");
    engine.flush();

    assert!(storage.saved().is_none());
    assert_eq!(engine.preference().active_theme_id, "default-dark");
    assert_eq!(engine.effective_theme_id(), "default-dark");
}

#[test]
fn test_corrupt_storage_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.corrupt();
    let (mut engine, _) = open(storage);
    assert_eq!(engine.preference().active_theme_id, "default-light");
    assert!(!engine.preference().high_contrast);
    assert_eq!(engine.effective_theme_id(), "default-light");
}

#[test]
fn test_file_storage_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.toml");

    {
        let mut engine = ThemeEngine::open(
            FileStorage::new(&path),
            TokenMap::new(),
            Arc::new(ManualClock::new()),
            options(),
        );
        engine.set_theme("midnight-harbor");
    }

    let stored: PersistedState = FileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(stored.preference.active_theme_id, "midnight-harbor");
    assert!(stored.saved_at.is_some());

    std::fs::write(&path, "garbage = [").unwrap();
    let mut engine = ThemeEngine::open(
        FileStorage::new(&path),
        TokenMap::new(),
        Arc::new(ManualClock::new()),
        options(),
    );
    assert_eq!(engine.effective_theme_id(), "default-light");
}

#[test]
fn test_surface_receives_effective_tokens() {
    let (mut engine, clock) = open(MemoryStorage::new());
    let dark = palette_of(&engine, "default-dark");

    engine.preview_theme("default-dark", Some(Duration::from_secs(1)));
    assert_eq!(
        engine.surface().get("--color-background"),
        Some(dark.hex(SemanticRole::Background).as_str())
    );

    clock.advance(Duration::from_secs(1));
    engine.get_palette();
    let light = palette_of(&engine, "default-light");
    assert_eq!(
        engine.surface().get("--color-background"),
        Some(light.hex(SemanticRole::Background).as_str())
    );
    assert_eq!(engine.theme("default-dark").unwrap().variant(), Variant::Dark);
}
