//! List site content

use anyhow::Result;
use std::fmt::Write as _;

use crate::config::SiteConfig;
use crate::content::{ContentSet, ContentType};
use crate::helpers::capitalize;
use crate::taxonomy::TaxonomyIndex;
use crate::Folio;

/// Print posts, pages, projects or the terms of a taxonomy
pub fn run(folio: &Folio, what: &str) -> Result<()> {
    let content = folio.discover();
    print!("{}", listing(&content, &folio.config, what)?);
    Ok(())
}

/// Text for `folio list`
pub fn listing(content: &ContentSet, config: &SiteConfig, what: &str) -> Result<String> {
    let mut out = String::new();

    if let Some(content_type) = ContentType::from_name(what) {
        let items = content.get(content_type);
        writeln!(out, "{} ({}):", capitalize(content_type.section()), items.len())?;
        for item in items {
            match &item.date {
                Some(date) => writeln!(
                    out,
                    "  {} - {} [{}]",
                    date.format("%Y-%m-%d"),
                    item.title,
                    item.url
                )?,
                None => writeln!(out, "  {} [{}]", item.title, item.url)?,
            }
        }
        return Ok(out);
    }

    let Some(definition) = config.content.taxonomies.iter().find(|t| t.name == what) else {
        let mut available = vec!["posts", "pages", "projects"];
        available.extend(config.content.taxonomies.iter().map(|t| t.name.as_str()));
        anyhow::bail!("Unknown type: {}. Available: {}", what, available.join(", "));
    };

    let index = TaxonomyIndex::build(content, std::slice::from_ref(definition));
    let mut terms: Vec<(&String, usize)> = index
        .get(&definition.name)
        .map(|terms| terms.iter().map(|(t, items)| (t, items.len())).collect())
        .unwrap_or_default();
    terms.sort_by(|a, b| b.1.cmp(&a.1));

    writeln!(out, "{} ({}):", capitalize(definition.plural_label()), terms.len())?;
    for (term, count) in terms {
        writeln!(out, "  {} ({})", term, count)?;
    }

    Ok(out)
}
