/// Whether a [`super::Definition`] is a data constructor or an RPC method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// A concrete data constructor (`---types---`, the default section).
    Types,
    /// An RPC method definition (after `---functions---`).
    Functions,
}
