// ============================================================
// Layer 2 - EditUseCase
// ============================================================
// Open → rotate / mirror → save. The output format follows the
// output file's extension.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::data::editor;
use crate::domain::edit::EditOp;

pub struct EditUseCase {
    input:  PathBuf,
    output: PathBuf,
}

impl EditUseCase {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { input: input.into(), output: output.into() }
    }

    /// Returns the (width, height) of the saved image.
    pub fn execute(&self, edits: &[EditOp]) -> Result<(u32, u32)> {
        if same_file(&self.input, &self.output) && edits.is_empty() {
            bail!("Nothing to do: no edits and the output is the input");
        }

        let image = editor::open(&self.input)?;
        let image = editor::apply_all(image, edits);
        editor::save(&image, &self.output)?;

        tracing::info!(
            "Applied [{}] to '{}' → '{}'",
            edits.iter().map(EditOp::name).collect::<Vec<_>>().join(", "),
            self.input.display(),
            self.output.display(),
        );
        Ok((image.width(), image.height()))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
