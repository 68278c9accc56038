use super::super::Repetition;

/// Common type information.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BasicTypeInfo {
    name: String,
    repetition: Repetition,
    id: Option<i32>,
    is_root: bool,
}

// Accessors
impl BasicTypeInfo {
    /// Returns field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the repetition of the type. The root carries none of its own;
    /// its stored value is never serialized.
    pub fn repetition(&self) -> &Repetition {
        &self.repetition
    }

    /// Returns the optional field id.
    pub fn id(&self) -> &Option<i32> {
        &self.id
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

// Constructors
impl BasicTypeInfo {
    pub fn new(name: String, repetition: Repetition, id: Option<i32>, is_root: bool) -> Self {
        Self {
            name,
            repetition,
            id,
            is_root,
        }
    }
}
