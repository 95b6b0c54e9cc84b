//! The built-in `modern` theme, embedded in the binary

/// Name selecting the built-in theme
pub const NAME: &str = "modern";

/// Templates as (name, source)
pub const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("modern/templates/base.html")),
    ("page.html", include_str!("modern/templates/page.html")),
    ("post.html", include_str!("modern/templates/post.html")),
    ("project.html", include_str!("modern/templates/project.html")),
    ("list.html", include_str!("modern/templates/list.html")),
    ("taxonomy.html", include_str!("modern/templates/taxonomy.html")),
    (
        "taxonomy_index.html",
        include_str!("modern/templates/taxonomy_index.html"),
    ),
    (
        "partials/terms.html",
        include_str!("modern/templates/partials/terms.html"),
    ),
    (
        "partials/toc.html",
        include_str!("modern/templates/partials/toc.html"),
    ),
];

/// Assets as (path under `{output}/theme/`, contents)
pub const ASSETS: &[(&str, &str)] = &[
    ("css/main.css", include_str!("modern/assets/css/main.css")),
    ("js/search.js", include_str!("modern/assets/js/search.js")),
];
