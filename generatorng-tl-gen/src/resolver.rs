//! Orders types so every type follows the types it aggregates by value.

use std::collections::HashMap;
use std::fmt;

use crate::model::SchemaModel;
use crate::namegen as n;

/// A type that could not be ordered, with the children holding it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unresolved {
    /// Target type name.
    pub name: String,
    /// Direct dependencies that are unsolved or unknown.
    pub blocking: Vec<String>,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (blocked by {})", self.name, self.blocking.join(", "))
    }
}

/// Result of [`resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Emittable order of the model's non-builtin types.
    pub ordered: Vec<String>,
    /// Types left over when no more progress was possible.
    pub unresolved: Vec<Unresolved>,
}

impl Resolution {
    /// `true` when every type was ordered.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

struct DependencyNode {
    name: String,
    deps: Vec<usize>,
    solved: bool,
}

#[derive(Default)]
struct Graph {
    nodes: Vec<DependencyNode>,
    index: HashMap<String, usize>,
}

impl Graph {
    fn node(&mut self, name: &str, solved: bool) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(DependencyNode { name: name.to_owned(), deps: Vec::new(), solved });
        self.index.insert(name.to_owned(), i);
        i
    }
}

/// Runs the resolver over every type of the model.
///
/// Builtins are solved up front. `TLPtr<T>` fields do not create an edge.
/// Fields naming a type the schema never defines create a node that is never
/// solved, so its users are reported rather than emitted against a hole.
pub fn resolve(model: &SchemaModel) -> Resolution {
    let mut graph = Graph::default();
    for builtin in n::BUILTIN_TYPES {
        graph.node(builtin, true);
    }

    let mut pending = Vec::new();
    for ty in model.types().iter().filter(|t| !t.is_builtin()) {
        let owner = graph.node(&ty.name, false);
        pending.push(owner);
        for param in ty.constructors.iter().flat_map(|c| &c.params) {
            let (base, indirect) = n::base_type(&param.ty);
            if indirect {
                continue;
            }
            let dep = graph.node(base, false);
            if !graph.nodes[owner].deps.contains(&dep) {
                graph.nodes[owner].deps.push(dep);
            }
        }
    }

    let mut ordered = Vec::with_capacity(pending.len());
    loop {
        let mut progress = false;
        for &i in &pending {
            if graph.nodes[i].solved {
                continue;
            }
            if graph.nodes[i].deps.iter().all(|&d| graph.nodes[d].solved) {
                graph.nodes[i].solved = true;
                ordered.push(graph.nodes[i].name.clone());
                progress = true;
            }
        }
        if !progress {
            break;
        }
    }

    let unresolved: Vec<Unresolved> = pending
        .iter()
        .map(|&i| &graph.nodes[i])
        .filter(|node| !node.solved)
        .map(|node| Unresolved {
            name: node.name.clone(),
            blocking: node
                .deps
                .iter()
                .filter(|&&d| !graph.nodes[d].solved)
                .map(|&d| graph.nodes[d].name.clone())
                .collect(),
        })
        .collect();

    for u in &unresolved {
        log::error!("[resolver] unable to resolve {u}");
    }
    log::info!("[resolver] {} types ordered, {} unresolved", ordered.len(), unresolved.len());

    Resolution { ordered, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use generatorng_tl_parser::parse_tl_schema;

    fn resolved(src: &str) -> Resolution {
        resolve(&SchemaModel::from_definitions(&parse_tl_schema(src).unwrap()))
    }

    #[test]
    fn dependencies_come_first() {
        let r = resolved(
            "user#1 id:long photo:UserPhoto = User;
             userPhoto#2 id:long = UserPhoto;
             users#3 list:Vector<User> = Users;",
        );
        assert!(r.is_complete());
        assert_eq!(r.ordered, ["TLUserPhoto", "TLUser", "TLUsers"]);
    }

    #[test]
    fn builtins_are_not_ordered() {
        let r = resolved("boolFalse#bc799737 = Bool;\nok#1 v:Bool = Ok;");
        assert_eq!(r.ordered, ["TLOk"]);
    }

    #[test]
    fn cycle_is_reported_with_blockers() {
        let r = resolved(
            "a#1 b:B = A;
             b#2 a:A = B;
             c#3 x:int = C;",
        );
        assert_eq!(r.ordered, ["TLC"]);
        assert_eq!(
            r.unresolved,
            [
                Unresolved { name: "TLA".into(), blocking: vec!["TLB".into()] },
                Unresolved { name: "TLB".into(), blocking: vec!["TLA".into()] },
            ]
        );
    }

    #[test]
    fn unknown_type_blocks() {
        let r = resolved("a#1 m:Missing = A;");
        assert_eq!(r.unresolved[0].blocking, ["TLMissing"]);
        assert!(r.ordered.is_empty());
    }

    #[test]
    fn indirection_breaks_self_reference() {
        let src = "textPlain#1 text:string = RichText;
                   textBold#2 text:RichText = RichText;";
        let mut m = SchemaModel::from_definitions(&parse_tl_schema(src).unwrap());
        assert!(!resolve(&m).is_complete());
        m.apply_indirections(&[("RichText".into(), "RichText".into())]);
        assert_eq!(resolve(&m).ordered, ["TLRichText"]);
    }
}
