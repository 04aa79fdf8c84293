//! Usage closures: which types and vector instantiations a set of roots
//! reaches through fields.

use std::collections::BTreeSet;

use crate::model::SchemaModel;
use crate::namegen as n;

/// Everything reachable from a set of root types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Usage {
    /// Generated (non-builtin) types reached.
    pub(crate) types: BTreeSet<String>,
    /// Every `TLVector<…>` spelling reached, innermost ones included.
    pub(crate) vectors: BTreeSet<String>,
}

impl Usage {
    /// Walks `roots` and everything they aggregate. Types in `excluded` are
    /// recorded but not descended into.
    pub(crate) fn collect<'a>(
        model: &SchemaModel,
        roots: impl IntoIterator<Item = &'a str>,
        excluded: &BTreeSet<String>,
    ) -> Self {
        let mut usage = Self::default();
        for root in roots {
            usage.visit(model, root, excluded);
        }
        usage
    }

    fn visit(&mut self, model: &SchemaModel, ty: &str, excluded: &BTreeSet<String>) {
        if let Some(inner) = n::vector_inner(ty) {
            self.vectors.insert(ty.to_owned());
            self.visit(model, inner, excluded);
            return;
        }
        if let Some(inner) = n::pointer_inner(ty) {
            self.visit(model, inner, excluded);
            return;
        }
        if n::is_builtin(ty) || !self.types.insert(ty.to_owned()) || excluded.contains(ty) {
            return;
        }
        let Some(def) = model.type_by_name(ty) else {
            return;
        };
        for param in def.constructors.iter().flat_map(|c| &c.params) {
            if !param.is_flag_only() {
                self.visit(model, &param.ty, excluded);
            }
        }
    }
}
