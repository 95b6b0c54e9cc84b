//! Empty the output directory

use anyhow::Result;

use crate::Folio;

/// Remove everything under the output directory, keeping the directory
pub fn run(folio: &Folio) -> Result<()> {
    folio.clean()?;
    tracing::info!("Cleaned: {:?}", folio.output_dir);
    Ok(())
}
