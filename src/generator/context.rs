//! Render context and navigation

use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use tera::Context;

use crate::config::{NavItem, NavigationConfig, SiteConfig};
use crate::content::{ContentItem, ContentSet, ContentType, ItemSummary};
use crate::helpers::capitalize;

/// Generator name exposed to templates
pub const GENERATOR_NAME: &str = "folio";

/// Navigation for every page.
///
/// A non-empty `navigation.main` is used as is. Otherwise links are built from
/// Home, every page not marked `exclude_from_nav`, and the non-empty posts and
/// projects sections.
pub fn generate_navigation(config: &SiteConfig, content: &ContentSet) -> NavigationConfig {
    if !config.navigation.main.is_empty() {
        return config.navigation.clone();
    }

    let mut main = vec![NavItem {
        title: "Home".to_string(),
        url: "/".to_string(),
    }];

    for page in content.get(ContentType::Page) {
        if page.exclude_from_nav || page.url == "/" {
            continue;
        }
        main.push(NavItem {
            title: page.title.clone(),
            url: page.url.clone(),
        });
    }

    for content_type in [ContentType::Post, ContentType::Project] {
        if !content.get(content_type).is_empty() {
            main.push(NavItem {
                title: capitalize(content_type.section()),
                url: format!("/{}/", content_type.section()),
            });
        }
    }

    NavigationConfig { main }
}

/// Year in the configured timezone; an unknown zone falls back to UTC
pub fn current_year(timezone: &str) -> i32 {
    match timezone.parse::<Tz>() {
        Ok(tz) => Utc::now().with_timezone(&tz).year(),
        Err(_) => {
            tracing::warn!("Unknown timezone {:?}, using UTC", timezone);
            Utc::now().year()
        }
    }
}

/// Builds the per-page render context from values shared by the whole build
pub struct ContextBuilder {
    base: Context,
}

impl ContextBuilder {
    pub fn new(config: &SiteConfig, navigation: &NavigationConfig, content: &ContentSet) -> Self {
        let mut base = Context::new();

        base.insert("site", &config.site);
        base.insert("features", &config.features);
        base.insert("navigation", navigation);
        base.insert("theme", &theme_value(config));
        base.insert("current_year", &current_year(&config.site.timezone));
        base.insert(
            "generator",
            &json!({
                "name": GENERATOR_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }),
        );

        let taxonomies: IndexMap<&str, &str> = config
            .content
            .taxonomies
            .iter()
            .map(|t| (t.name.as_str(), t.path.as_str()))
            .collect();
        base.insert("taxonomies", &taxonomies);

        let recent_posts: Vec<ItemSummary> = content
            .get(ContentType::Post)
            .iter()
            .take(config.content.settings.posts_per_page)
            .map(ContentItem::summary)
            .collect();
        base.insert("recent_posts", &recent_posts);

        Self { base }
    }

    /// Fresh context for one page: the shared values plus `page` and `content`
    pub fn page<T: Serialize + ?Sized>(&self, page: &T, content: &str) -> Context {
        let mut context = self.base.clone();
        context.insert("page", page);
        context.insert("content", content);
        context
    }
}

/// Theme section with `appearance.dark_mode` taken from the features
fn theme_value(config: &SiteConfig) -> Value {
    let mut theme = serde_json::to_value(&config.theme).unwrap_or_else(|_| json!({}));

    if let Value::Object(map) = &mut theme {
        let appearance = map
            .entry("appearance")
            .or_insert_with(|| json!({}));
        if !appearance.is_object() {
            *appearance = json!({});
        }
        if let Value::Object(appearance) = appearance {
            appearance.insert("dark_mode".to_string(), json!(config.features.dark_mode));
        }
    }

    theme
}
