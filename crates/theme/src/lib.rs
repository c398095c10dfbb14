pub mod accessibility;
pub mod bridge;
mod builtin;
pub mod clipboard;
pub mod contrast;
pub mod derive;
mod engine;
mod error;
pub mod lch;
pub mod palette;
pub mod persistence;
pub mod preference;
pub mod preview;
pub mod registry;
pub mod transport;
mod types;
pub mod validation;

pub use accessibility::AccessibilityReport;
pub use bridge::{ApplicationBridge, StyleTokens, TokenMap, TokenSurface};
pub use builtin::{builtin_themes, default_theme, DEFAULT_THEME_ID};
pub use clipboard::{Clipboard, ClipboardError, ClipboardExport};
pub use derive::{derive, derive_with, DeriveOptions};
pub use engine::{EngineOptions, ThemeEngine};
pub use error::{PersistenceError, ThemeError};
pub use lch::LchColor;
pub use palette::{DerivedPalette, Rgb, SemanticRole};
pub use persistence::{FileStorage, MemoryStorage, RetryPolicy, Storage};
pub use preference::{AppearanceMode, Preference};
pub use preview::{Clock, ManualClock, PreviewState, SystemClock};
pub use registry::{ThemeQuery, ThemeRegistry};
pub use types::{ThemeCore, ThemeDefinition, Variant, DEFAULT_CATEGORY};
pub use validation::ValidationError;
