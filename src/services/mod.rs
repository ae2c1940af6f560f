pub mod catalog;
pub mod session;
pub mod settings;

pub use catalog::{
    DEFAULT_FEATURED_LIMIT, apply_filter_and_sort, available_languages, locale_compare,
    select_featured,
};
pub use session::{CatalogSession, SubscriptionId, ViewHandler};
pub use settings::{SettingsError, SettingsStore, ShowcaseSettings, default_settings_dir};
