//! Configuration module

pub mod loader;
mod site;

pub use loader::{deep_merge, load, load_or_default};
pub use site::{
    AnalyticsFeature, BuildConfig, CommentsFeature, ContentConfig, ContentDirectories,
    ContentSettings, FeaturesConfig, NavItem, NavigationConfig, PermalinkStyle, SearchFeature,
    SiteConfig, SiteSection, TaxonomyConfig, ThemeConfig,
};

/// Default site config file name
pub const DEFAULT_CONFIG_FILE: &str = "folio.yml";
