//! Member disambiguation ("baking").
//!
//! The C++ side flattens every constructor of a type into one struct, so a
//! field name must mean the same field type in every constructor. Names used
//! with several types are renamed per occurrence.

use std::collections::{BTreeSet, HashMap};

use crate::model::{Constructor, SchemaModel, Type};
use crate::namegen as n;

/// Bakes every type of the model. Returns the number of renamed fields.
pub fn bake(model: &mut SchemaModel) -> usize {
    let renamed: usize = model.types_mut().iter_mut().map(bake_type).sum();
    if renamed > 0 {
        log::info!("[model] baking renamed {renamed} fields");
    }
    renamed
}

/// The type a field contributes to the flattened struct. Flag-only fields
/// carry no payload and count as their own kind.
fn field_key(param: &crate::model::Param) -> &str {
    if param.is_flag_only() { "true" } else { &param.ty }
}

/// field name → distinct keys, in first-occurrence order.
fn key_table(ty: &Type) -> Vec<(String, Vec<String>)> {
    let mut table: Vec<(String, Vec<String>)> = Vec::new();
    for param in ty.constructors.iter().flat_map(|c| &c.params) {
        let key = field_key(param);
        match table.iter_mut().find(|(name, _)| *name == param.name) {
            Some((_, keys)) => {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_owned());
                }
            }
            None => table.push((param.name.clone(), vec![key.to_owned()])),
        }
    }
    table
}

fn rename_in(constructor: &mut Constructor, mut pick: impl FnMut(&str, &str) -> Option<String>) {
    let mut renames: HashMap<String, String> = HashMap::new();
    for param in &mut constructor.params {
        let key = field_key(param).to_owned();
        if let Some(new_name) = pick(&param.name, &key) {
            if param.is_flags() {
                renames.insert(param.name.clone(), new_name.clone());
            }
            log::debug!("[model] {}: {} → {new_name}", constructor.name, param.name);
            param.name = new_name;
        }
    }
    for param in &mut constructor.params {
        if let Some(flag) = &mut param.flag {
            if let Some(new_member) = renames.get(&flag.member) {
                flag.member = new_member.clone();
            }
        }
    }
}

fn bake_type(ty: &mut Type) -> usize {
    let ambiguous: BTreeSet<String> = key_table(ty)
        .into_iter()
        .filter(|(_, keys)| keys.len() > 1)
        .map(|(name, _)| name)
        .collect();
    if ambiguous.is_empty() {
        return 0;
    }

    let mut renamed = 0;

    // Type-suffix pass.
    for constructor in &mut ty.constructors {
        let types: HashMap<String, String> = constructor
            .params
            .iter()
            .map(|p| (p.name.clone(), p.ty.clone()))
            .collect();
        rename_in(constructor, |name, _| {
            if !ambiguous.contains(name) {
                return None;
            }
            let suffix = n::type_suffix(&types[name], name);
            if suffix.is_empty() {
                return None;
            }
            renamed += 1;
            Some(format!("{name}{suffix}"))
        });
    }

    // Residual collisions keep the first type and number the rest.
    let table = key_table(ty);
    let mut taken: BTreeSet<String> = table.iter().map(|(name, _)| name.clone()).collect();
    let mut numbered: HashMap<(String, String), String> = HashMap::new();
    for (name, keys) in table.iter().filter(|(_, keys)| keys.len() > 1) {
        let mut index = 2;
        for key in &keys[1..] {
            while taken.contains(&format!("{name}{index}")) {
                index += 1;
            }
            let new_name = format!("{name}{index}");
            taken.insert(new_name.clone());
            numbered.insert((name.clone(), key.clone()), new_name);
        }
    }
    if !numbered.is_empty() {
        for constructor in &mut ty.constructors {
            rename_in(constructor, |name, key| {
                let new_name = numbered.get(&(name.to_owned(), key.to_owned()))?;
                renamed += 1;
                Some(new_name.clone())
            });
        }
    }

    renamed
}
