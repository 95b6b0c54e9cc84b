//! Build the site

use anyhow::Result;
use std::path::Path;

use crate::generator::BuildSummary;
use crate::{BuildOptions, Folio};

/// Open the site and run a full build
pub fn run(site_dir: &Path, options: &BuildOptions) -> Result<BuildSummary> {
    let folio = Folio::open(site_dir, options)?;
    folio.build()
}
