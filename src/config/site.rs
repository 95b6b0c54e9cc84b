//! Site configuration (folio.yml)
//!
//! Every section carries its defaults in a `Default` impl. User documents are
//! merged over the serialized defaults in [`super::loader`], then deserialized
//! back into these types once.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Main site configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub theme: ThemeConfig,
    pub navigation: NavigationConfig,
    pub content: ContentConfig,
    pub features: FeaturesConfig,
    pub build: BuildConfig,
}

/// `site:` section, exposed to templates as `site`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Base URL, used for the sitemap. Empty disables the sitemap.
    pub url: String,
    pub language: String,
    pub timezone: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "My Folio Site".to_string(),
            description: "A site built with folio".to_string(),
            author: String::new(),
            url: String::new(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// `theme:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
    /// Theme directory relative to the site directory
    pub path: Option<String>,
    pub colors: IndexMap<String, serde_yaml::Value>,
    pub fonts: IndexMap<String, serde_yaml::Value>,
    pub layout: IndexMap<String, serde_yaml::Value>,
    pub components: IndexMap<String, serde_yaml::Value>,

    /// Any other theme keys, passed through to templates
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let system_font =
            r#"system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#;

        Self {
            name: "modern".to_string(),
            path: None,
            colors: string_map(&[
                ("primary", "#4285f4"),
                ("secondary", "#34a853"),
                ("accent", "#fbbc05"),
                ("text", "#333333"),
                ("background", "#ffffff"),
                ("link", "#1a73e8"),
            ]),
            fonts: string_map(&[
                ("heading", system_font),
                ("body", system_font),
                ("code", "monospace"),
            ]),
            layout: IndexMap::from([
                ("container_width".to_string(), "1200px".into()),
                ("sidebar".to_string(), false.into()),
                ("sidebar_position".to_string(), "left".into()),
                ("toc".to_string(), true.into()),
            ]),
            components: IndexMap::from([
                (
                    "header".to_string(),
                    yaml_mapping(&[("sticky", true.into()), ("height", "60px".into())]),
                ),
                (
                    "footer".to_string(),
                    yaml_mapping(&[
                        ("show_social", true.into()),
                        ("show_copyright", true.into()),
                    ]),
                ),
                (
                    "cards".to_string(),
                    yaml_mapping(&[
                        ("shadow", "medium".into()),
                        ("border_radius", "8px".into()),
                    ]),
                ),
            ]),
            extra: IndexMap::new(),
        }
    }
}

/// `navigation:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub main: Vec<NavItem>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            main: vec![NavItem {
                title: "Home".to_string(),
                url: "/".to_string(),
            }],
        }
    }
}

/// A single navigation link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub url: String,
}

/// `content:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub directories: ContentDirectories,
    pub settings: ContentSettings,
    pub taxonomies: Vec<TaxonomyConfig>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            directories: ContentDirectories::default(),
            settings: ContentSettings::default(),
            taxonomies: vec![
                TaxonomyConfig::new("categories", "categories", "category", "/categories/"),
                TaxonomyConfig::new("tags", "tags", "tag", "/tags/"),
            ],
        }
    }
}

/// Content directories, relative to the site directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDirectories {
    pub posts: String,
    pub pages: String,
    pub projects: String,
}

impl Default for ContentDirectories {
    fn default() -> Self {
        Self {
            posts: "content/posts".to_string(),
            pages: "content/pages".to_string(),
            projects: "content/projects".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    pub posts_per_page: usize,
    /// Excerpt budget in characters
    pub excerpt_length: usize,
    pub default_layout: String,
    pub date_format: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            excerpt_length: 250,
            default_layout: "post".to_string(),
            date_format: "%B %d, %Y".to_string(),
        }
    }
}

/// A taxonomy definition (e.g. tags)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Front-matter key holding the terms
    pub name: String,
    #[serde(default)]
    pub plural: String,
    #[serde(default)]
    pub singular: String,
    /// URL prefix for term pages, e.g. `/tags/`
    #[serde(default)]
    pub path: String,
}

impl TaxonomyConfig {
    pub fn new(name: &str, plural: &str, singular: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            plural: plural.to_string(),
            singular: singular.to_string(),
            path: path.to_string(),
        }
    }

    /// Label used in page titles, falling back to the taxonomy name
    pub fn singular_label(&self) -> &str {
        if self.singular.is_empty() {
            &self.name
        } else {
            &self.singular
        }
    }

    pub fn plural_label(&self) -> &str {
        if self.plural.is_empty() {
            &self.name
        } else {
            &self.plural
        }
    }
}

/// `features:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub search: SearchFeature,
    pub dark_mode: bool,
    pub comments: CommentsFeature,
    pub analytics: AnalyticsFeature,
    pub social_sharing: bool,
    pub code_highlighting: bool,
    pub table_of_contents: bool,
    pub responsive_images: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            search: SearchFeature::default(),
            dark_mode: true,
            comments: CommentsFeature::default(),
            analytics: AnalyticsFeature::default(),
            social_sharing: true,
            code_highlighting: true,
            table_of_contents: true,
            responsive_images: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFeature {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for SearchFeature {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: "client".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsFeature {
    pub enabled: bool,
    pub system: String,
    pub repo: String,
}

impl Default for CommentsFeature {
    fn default() -> Self {
        Self {
            enabled: false,
            system: "giscus".to_string(),
            repo: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsFeature {
    pub enabled: bool,
    pub provider: String,
    pub id: String,
}

impl Default for AnalyticsFeature {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "google".to_string(),
            id: String::new(),
        }
    }
}

/// `build:` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory relative to the site directory
    pub output: String,
    /// Asset directories copied verbatim into the output
    pub assets: Vec<String>,
    /// Glob patterns skipped during discovery and asset copying
    pub exclude: Vec<String>,
    pub permalink_style: PermalinkStyle,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "_site".to_string(),
            assets: vec![
                "assets/images".to_string(),
                "assets/fonts".to_string(),
                "assets/files".to_string(),
            ],
            exclude: vec![
                "*.tmp".to_string(),
                "*.log".to_string(),
                "node_modules".to_string(),
            ],
            permalink_style: PermalinkStyle::Pretty,
        }
    }
}

/// Output path convention for page URLs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermalinkStyle {
    /// `/a/b/` -> `a/b/index.html`
    #[default]
    Pretty,
    /// `/a/b/` -> `a/b.html`
    #[serde(alias = "plain", alias = "ugly")]
    Flat,
}

fn string_map(pairs: &[(&str, &str)]) -> IndexMap<String, serde_yaml::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_yaml::Value::from(*v)))
        .collect()
}

fn yaml_mapping(pairs: &[(&str, serde_yaml::Value)]) -> serde_yaml::Value {
    let mut map = serde_yaml::Mapping::new();
    for (k, v) in pairs {
        map.insert(serde_yaml::Value::from(*k), v.clone());
    }
    serde_yaml::Value::Mapping(map)
}
