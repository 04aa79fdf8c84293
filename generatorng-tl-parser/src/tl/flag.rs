/// A flag gate inside a parameter type, e.g. `flags.0` in `flags.0?string`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flag {
    /// The sibling field that holds the bit (usually `"flags"`).
    pub name: String,
    /// The bit index (0-based).
    pub index: u32,
}
