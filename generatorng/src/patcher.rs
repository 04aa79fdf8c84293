//! Reads the target files, feeds their current regions to the generator and
//! writes the patched text back.
//!
//! A file that cannot be read or patched is skipped and remembered; the
//! others are still processed and the run ends with `FileAccessError`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use generatorng_tl_gen::patch::patch_text;
use generatorng_tl_gen::{FILES, Generated, PriorSections};

use crate::errors::RunError;

/// Target files loaded from the input directory.
pub struct Targets {
    /// Current region contents, for the merged sections.
    pub prior: PriorSections,
    loaded: Vec<(&'static str, String)>,
    failed: Vec<PathBuf>,
}

/// What [`Targets::apply`] did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub unchanged: usize,
}

impl Targets {
    pub fn load(dir: &Path) -> Self {
        let mut targets = Self { prior: PriorSections::new(), loaded: Vec::new(), failed: Vec::new() };

        for &file in FILES {
            let path = dir.join(file);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    log::error!("[patch] cannot read {}: {e}", path.display());
                    targets.failed.push(path);
                    continue;
                }
            };
            if let Err(e) = targets.prior.read_file(file, &text) {
                log::error!("[patch] {}: {e}", path.display());
                targets.failed.push(path);
                continue;
            }
            targets.loaded.push((file, text));
        }
        targets
    }

    /// Patches every loaded file and writes the ones whose text changed into
    /// `out_dir`. Nothing is written when `dry_run` is set.
    pub fn apply(self, generated: &Generated, out_dir: &Path, dry_run: bool) -> Result<Summary, RunError> {
        let mut failed = self.failed;
        let mut summary = Summary::default();

        for (file, text) in &self.loaded {
            let path = out_dir.join(file);
            let patched = match patch_text(text, &generated.for_file(file)) {
                Ok(patched) => patched,
                Err(e) => {
                    log::error!("[patch] {}: {e}", path.display());
                    failed.push(path);
                    continue;
                }
            };

            let current = match fs::read_to_string(&path) {
                Ok(current) => Some(current),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => {
                    log::error!("[patch] cannot read {}: {e}", path.display());
                    failed.push(path);
                    continue;
                }
            };
            if current.as_deref() == Some(patched.as_str()) {
                log::debug!("[patch] {file} unchanged");
                summary.unchanged += 1;
                continue;
            }

            if dry_run {
                log::info!("[patch] would update {}", path.display());
                summary.written += 1;
                continue;
            }
            if let Err(e) = fs::write(&path, patched) {
                log::error!("[patch] cannot write {}: {e}", path.display());
                failed.push(path);
                continue;
            }
            log::info!("[patch] updated {}", path.display());
            summary.written += 1;
        }

        if failed.is_empty() { Ok(summary) } else { Err(RunError::FileAccess { failed }) }
    }
}

/// Prints every section between its markers, grouped by file.
pub fn dump(generated: &Generated) {
    for (section, text) in generated.iter() {
        let marker = section.marker();
        println!("// {}", section.file());
        println!("{}", marker.begin());
        print!("{text}");
        println!("{}", marker.end());
    }
}
