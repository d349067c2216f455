use crate::types::DataType;
use serde::{Deserialize, Serialize};

/// Rows by selected columns, each cell rendered as a string.
///
/// An empty result set means zero rows matched. Failures are never reported as an
/// empty result set.
pub type ResultSet = Vec<Vec<String>>;

/// One named, typed parameter of a parameterized statement.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Bind {
    name: String,
    value: String,
    data_type: DataType,
}

impl Bind {
    pub fn new(name: impl Into<String>, value: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            data_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

/// The bound parameters sent alongside a statement.
///
/// Order is kept as pushed. Whether placeholders are positional or named is up to
/// the engine.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Binds {
    binds: Vec<Bind>,
}

impl Binds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bind: Bind) {
        self.binds.push(bind);
    }

    /// Builder version of [`Binds::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>, data_type: DataType) -> Self {
        self.push(Bind::new(name, value, data_type));
        self
    }

    /// The first bind named exactly `name`.
    pub fn get(&self, name: &str) -> Option<&Bind> {
        self.binds.iter().find(|bind| bind.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bind> {
        self.binds.iter()
    }

    pub fn as_slice(&self) -> &[Bind] {
        &self.binds
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }
}

impl From<Vec<Bind>> for Binds {
    fn from(binds: Vec<Bind>) -> Self {
        Self { binds }
    }
}

impl FromIterator<Bind> for Binds {
    fn from_iter<I: IntoIterator<Item = Bind>>(iter: I) -> Self {
        Self {
            binds: iter.into_iter().collect(),
        }
    }
}

impl<'b> IntoIterator for &'b Binds {
    type Item = &'b Bind;
    type IntoIter = std::slice::Iter<'b, Bind>;

    fn into_iter(self) -> Self::IntoIter {
        self.binds.iter()
    }
}
