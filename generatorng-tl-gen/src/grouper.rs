//! Selects and groups model entries for the emitters.

use std::collections::HashSet;

use crate::model::{GroupEntry, Method, SchemaModel};

/// `true` when `method` starts with `group` at a word boundary:
/// `auth` selects `authSendCode` but not `authorizationForm`.
fn in_group(method: &str, group: &str) -> bool {
    method
        .strip_prefix(group)
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// Methods selected by the API-group allow-list, in schema order.
/// Template methods never get stubs and are skipped.
pub(crate) fn allowed_methods<'a>(model: &'a SchemaModel, groups: &[String]) -> Vec<&'a Method> {
    let allowed: Vec<&Method> = model
        .methods()
        .iter()
        .filter(|m| {
            if m.template {
                log::debug!("[codegen] skipping template method {}", m.name);
                return false;
            }
            groups.iter().any(|g| in_group(&m.name, g))
        })
        .collect();
    log::info!("[codegen] {} of {} methods allowed", allowed.len(), model.methods().len());
    allowed
}

/// Schema-order enum blocks with duplicate constant names removed.
/// Blocks left empty by the removal are dropped.
pub(crate) fn value_blocks(model: &SchemaModel) -> Vec<Vec<&GroupEntry>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut blocks = Vec::new();
    for group in model.groups() {
        let mut block = Vec::with_capacity(group.entries.len());
        for entry in &group.entries {
            if seen.insert(&entry.value_name) {
                block.push(entry);
            } else {
                log::warn!("[codegen] duplicate value {} (id {:#010x}) skipped", entry.value_name, entry.id);
            }
        }
        if !block.is_empty() {
            blocks.push(block);
        }
    }
    blocks
}
