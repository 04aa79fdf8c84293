//! The schema model: types as tagged unions of constructors, plus methods.
//!
//! Built once per run from parsed [`Definition`]s, mutated by indirection and
//! baking, read-only afterwards.

use std::collections::{HashMap, HashSet};

use generatorng_tl_parser::tl::{Category, Definition, Parameter, ParameterType};

use crate::namegen as n;

/// A flag gate: the field exists on the wire iff bit `bit` of `member` is set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// The sibling flags field (already member-formatted).
    pub member: String,
    /// Bit index, 0–31.
    pub bit: u32,
}

/// One field of a constructor or one argument of a method.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Member-formatted name, e.g. `phoneNumber`.
    pub name: String,
    /// Target type, e.g. `QString` or `TLVector<TLUser>`.
    pub ty: String,
    /// The TL type as written in the schema, e.g. `string` or `#`.
    pub tl_type: String,
    /// Present iff the field is conditional.
    pub flag: Option<Flag>,
}

impl Param {
    fn from_parameter(p: &Parameter) -> Self {
        match &p.ty {
            ParameterType::Flags => Self {
                name: n::member_name(&p.name),
                ty: "quint32".to_owned(),
                tl_type: "#".to_owned(),
                flag: None,
            },
            ParameterType::Normal { ty, flag } => Self {
                name: n::member_name(&p.name),
                ty: n::target_type(ty),
                tl_type: ty.to_string(),
                flag: flag.as_ref().map(|f| Flag {
                    member: n::member_name(&f.name),
                    bit: f.index,
                }),
            },
        }
    }

    /// `true` for `name:#` fields.
    pub fn is_flags(&self) -> bool {
        self.tl_type == "#"
    }

    /// `true` for `flags.N?true`: no payload, the bit itself is the value.
    pub fn is_flag_only(&self) -> bool {
        self.flag.is_some() && self.tl_type == "true"
    }
}

/// One concrete wire shape of a [`Type`].
#[derive(Clone, Debug, PartialEq)]
pub struct Constructor {
    /// Formatted name, e.g. `inputPeerUser`.
    pub name: String,
    /// Predicate id, exactly as in the schema.
    pub id: u32,
    /// Fields in wire order.
    pub params: Vec<Param>,
    /// The schema text this constructor came from.
    pub source: Option<String>,
}

impl Constructor {
    /// The `TLValue` constant naming this constructor's tag.
    pub fn value_name(&self) -> String {
        n::value_name(&self.name)
    }
}

/// A named sum of constructors sharing one result type.
#[derive(Clone, Debug, PartialEq)]
pub struct Type {
    /// Target name, e.g. `TLInputPeer`.
    pub name: String,
    /// TL name, e.g. `InputPeer`.
    pub tl_name: String,
    /// Constructors in schema order.
    pub constructors: Vec<Constructor>,
}

impl Type {
    /// Primitive-mapped types (`Bool`) and the vector template are never emitted.
    pub fn is_builtin(&self) -> bool {
        n::is_builtin(&self.name)
    }
}

/// An RPC method.
#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    /// Formatted name, e.g. `authSendCode`.
    pub name: String,
    /// Predicate id, exactly as in the schema.
    pub id: u32,
    /// Target result type, e.g. `TLAuthSentCode`.
    pub result: String,
    /// Request arguments in wire order.
    pub params: Vec<Param>,
    /// The schema text this method came from.
    pub source: Option<String>,
    /// `{X:Type}` methods have no modelled arguments and get no stub.
    pub template: bool,
}

impl Method {
    /// The `TLValue` constant naming this method's tag.
    pub fn value_name(&self) -> String {
        n::value_name(&self.name)
    }
}

/// One `TLValue` constant in a [`Group`].
#[derive(Clone, Debug, PartialEq)]
pub struct GroupEntry {
    /// Constant name, e.g. `AuthSendCode`.
    pub value_name: String,
    /// Predicate id.
    pub id: u32,
    /// Schema text, for `--add-spec-sources`.
    pub source: Option<String>,
}

/// A run of consecutive definitions sharing a result type (constructors) or
/// a namespace (methods). Groups keep enum blocks in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// Result type or method namespace the run is keyed by.
    pub label: String,
    /// Constants in schema order.
    pub entries: Vec<GroupEntry>,
}

/// The whole schema.
#[derive(Clone, Debug, Default)]
pub struct SchemaModel {
    types: Vec<Type>,
    type_index: HashMap<String, usize>,
    methods: Vec<Method>,
    method_index: HashMap<String, usize>,
    groups: Vec<Group>,
}

impl SchemaModel {
    /// Builds the model from parsed definitions in schema order.
    ///
    /// A constructor or method whose name was already seen is skipped; the
    /// first definition wins everywhere, enum constants included.
    pub fn from_definitions(defs: &[Definition]) -> Self {
        let mut model = Self::default();
        let mut last_key: Option<(Category, String)> = None;
        let mut constructor_names = HashSet::new();

        for def in defs {
            let name = n::entity_name(&def.full_name());
            let duplicate = match def.category {
                Category::Types => !constructor_names.insert(name.clone()),
                Category::Functions => model.method_index.contains_key(&name),
            };
            if duplicate {
                log::warn!("[model] `{}` defined twice, keeping the first (id {:#010x} dropped)", def.full_name(), def.id);
                continue;
            }
            let params: Vec<Param> = def.params.iter().map(Param::from_parameter).collect();

            let label = match def.category {
                Category::Types => def.ty.full_name(),
                Category::Functions => def.namespace.join("."),
            };
            let key = (def.category, label.clone());
            if last_key.as_ref() != Some(&key) {
                model.groups.push(Group { label, entries: Vec::new() });
                last_key = Some(key);
            }
            if let Some(group) = model.groups.last_mut() {
                group.entries.push(GroupEntry {
                    value_name: n::value_name(&name),
                    id: def.id,
                    source: def.source.clone(),
                });
            }

            match def.category {
                Category::Types => {
                    let constructor = Constructor {
                        name,
                        id: def.id,
                        params,
                        source: def.source.clone(),
                    };
                    let target = n::target_type(&def.ty);
                    match model.type_index.get(&target) {
                        Some(&i) => model.types[i].constructors.push(constructor),
                        None => {
                            model.type_index.insert(target.clone(), model.types.len());
                            model.types.push(Type {
                                name: target,
                                tl_name: def.ty.full_name(),
                                constructors: vec![constructor],
                            });
                        }
                    }
                }
                Category::Functions => {
                    let method = Method {
                        result: n::target_type(&def.ty),
                        name,
                        id: def.id,
                        params,
                        source: def.source.clone(),
                        template: def.template,
                    };
                    model.method_index.insert(method.name.clone(), model.methods.len());
                    model.methods.push(method);
                }
            }
        }

        log::info!(
            "[model] {} types, {} methods, {} groups",
            model.types.len(),
            model.methods.len(),
            model.groups.len()
        );
        model
    }

    /// All types in first-seen schema order.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub(crate) fn types_mut(&mut self) -> &mut [Type] {
        &mut self.types
    }

    /// Looks up a type by its target name (`TLUser`).
    pub fn type_by_name(&self, name: &str) -> Option<&Type> {
        self.type_index.get(name).map(|&i| &self.types[i])
    }

    /// All methods in schema order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Looks up a method by its formatted name (`authSendCode`).
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }

    /// Schema-order runs used for the value enum.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Finds the constructor with the given predicate id in any type.
    pub fn constructor_by_id(&self, id: u32) -> Option<(&Type, &Constructor)> {
        self.types.iter().find_map(|ty| {
            ty.constructors.iter().find(|c| c.id == id).map(|c| (ty, c))
        })
    }

    /// Wraps fields of `owner` that aggregate `member` by value into
    /// `TLPtr<member>`, one indirection per configured edge. Names are TL
    /// type names (`RichText`). Returns the number of fields rewritten.
    pub fn apply_indirections(&mut self, edges: &[(String, String)]) -> usize {
        let mut rewritten = 0;
        for (owner, member) in edges {
            let owner = format!("{}{}", n::TYPE_PREFIX, n::to_pascal(owner));
            let member = format!("{}{}", n::TYPE_PREFIX, n::to_pascal(member));
            let Some(&i) = self.type_index.get(&owner) else {
                log::debug!("[model] indirection owner `{owner}` not in schema");
                continue;
            };
            for constructor in &mut self.types[i].constructors {
                for param in &mut constructor.params {
                    if let Some(wrapped) = wrap_pointer(&param.ty, &member) {
                        log::debug!("[model] {owner}::{} → {wrapped}", param.name);
                        param.ty = wrapped;
                        rewritten += 1;
                    }
                }
            }
        }
        rewritten
    }
}

fn wrap_pointer(ty: &str, member: &str) -> Option<String> {
    if ty == member {
        return Some(format!("{}<{member}>", n::POINTER));
    }
    let inner = n::vector_inner(ty)?;
    wrap_pointer(inner, member).map(|w| format!("{}<{w}>", n::VECTOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use generatorng_tl_parser::parse_tl_schema;

    fn model(src: &str) -> SchemaModel {
        SchemaModel::from_definitions(&parse_tl_schema(src).unwrap())
    }

    #[test]
    fn constructors_append_to_known_type() {
        let m = model(
            "inputPeerEmpty#7f3b18ea = InputPeer;
             inputPeerSelf#7da07ec9 = InputPeer;
             inputPeerChat#35a95cb9 chat_id:long = InputPeer;",
        );
        let ty = m.type_by_name("TLInputPeer").unwrap();
        assert_eq!(ty.constructors.len(), 3);
        assert_eq!(ty.constructors[2].params[0].name, "chatId");
        assert_eq!(ty.constructors[2].params[0].ty, "quint64");
        assert_eq!(m.groups().len(), 1);
    }

    #[test]
    fn first_definition_wins() {
        let m = model(
            "photoEmpty#2331b22d id:long = Photo;
photoEmpty#1 id:long = Photo;
---functions---
auth.logOut#5717da40 = Bool;
auth.logOut#2 = Bool;
",
        );
        assert_eq!(m.type_by_name("TLPhoto").unwrap().constructors.len(), 1);
        assert_eq!(m.type_by_name("TLPhoto").unwrap().constructors[0].id, 0x2331b22d);
        assert_eq!(m.methods().len(), 1);
        assert_eq!(m.method("authLogOut").unwrap().id, 0x5717da40);
        let ids: Vec<u32> = m.groups().iter().flat_map(|g| g.entries.iter().map(|e| e.id)).collect();
        assert_eq!(ids, [0x2331b22d, 0x5717da40]);
    }

    #[test]
    fn groups_follow_schema_runs() {
        let m = model(
            "boolFalse#bc799737 = Bool;
             boolTrue#997275b5 = Bool;
             true#3fedd339 = True;
             ---functions---
             auth.sendCode#abcdef01 phone_number:string = auth.SentCode;
             auth.signIn#bcd51581 phone_number:string = auth.Authorization;
             help.getConfig#c4f9186b = Config;",
        );
        let labels: Vec<_> = m.groups().iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["Bool", "True", "auth", "help"]);
        assert_eq!(m.groups()[2].entries[0].value_name, "AuthSendCode");
        assert!(m.type_by_name("bool").unwrap().is_builtin());
    }

    #[test]
    fn flag_params() {
        let m = model("user#1 flags:# self:flags.10?true username:flags.3?string = User;");
        let c = &m.type_by_name("TLUser").unwrap().constructors[0];
        assert!(c.params[0].is_flags());
        assert!(c.params[1].is_flag_only());
        assert_eq!(c.params[2].flag, Some(Flag { member: "flags".into(), bit: 3 }));
        assert!(!c.params[2].is_flag_only());
    }

    #[test]
    fn indirection_wraps_vectors_and_values() {
        let mut m = model(
            "textPlain#744694e0 text:string = RichText;
             textBold#6724abc4 text:RichText = RichText;
             textConcat#7e6260d7 texts:Vector<RichText> = RichText;",
        );
        let n = m.apply_indirections(&[("RichText".into(), "RichText".into())]);
        assert_eq!(n, 2);
        let ty = m.type_by_name("TLRichText").unwrap();
        assert_eq!(ty.constructors[1].params[0].ty, "TLPtr<TLRichText>");
        assert_eq!(ty.constructors[2].params[0].ty, "TLVector<TLPtr<TLRichText>>");
        assert_eq!(ty.constructors[0].params[0].ty, "QString");
    }
}
