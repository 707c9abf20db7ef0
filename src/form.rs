use std::{fmt, sync::Arc};

use crate::{File, FileLike};

/// The value of a form entry.
#[derive(Clone)]
pub enum Value {
    /// A text value.
    Text(String),
    /// A file value.
    File(Arc<dyn FileLike>),
}

impl Value {
    /// Returns `true` if the value is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::File(file) => f.debug_tuple("File").field(file).finish(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<File> for Value {
    fn from(file: File) -> Self {
        Self::File(Arc::new(file))
    }
}

impl From<Arc<dyn FileLike>> for Value {
    fn from(file: Arc<dyn FileLike>) -> Self {
        Self::File(file)
    }
}

/// Anything which can enumerate `(name, value)` entries in insertion order.
pub trait FormDataLike {
    /// Returns the entries, names may repeat.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_>;
}

impl<K: AsRef<str>> FormDataLike for [(K, Value)] {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.as_ref(), v)))
    }
}

impl<K: AsRef<str>> FormDataLike for Vec<(K, Value)> {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        self.as_slice().entries()
    }
}

/// An ordered multimap of form entries.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    entries: Vec<(String, Value)>,
}

impl FormData {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, keeping existing values with the same name.
    pub fn append<N, V>(&mut self, name: N, value: V) -> &mut Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Sets a value, replacing all existing values with the same name.
    ///
    /// The value takes the position of the first replaced entry.
    pub fn set<N, V>(&mut self, name: N, value: V) -> &mut Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let name = name.into();
        let value = value.into();

        match self.entries.iter().position(|(k, _)| *k == name) {
            Some(i) => {
                self.entries[i].1 = value;
                let mut n = 0;
                self.entries.retain(|(k, _)| {
                    n += 1;
                    n <= i + 1 || *k != name
                });
            }
            None => self.entries.push((name, value)),
        }

        self
    }

    /// Gets the first value with the name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Gets all values with the name.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the form has a value with the name.
    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Removes all values with the name.
    pub fn delete(&mut self, name: &str) {
        self.entries.retain(|(k, _)| k != name);
    }

    /// Gets the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the form has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FormDataLike for FormData {
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(self.iter())
    }
}

impl<N, V> FromIterator<(N, V)> for FormData
where
    N: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (name, value) in iter {
            form.append(name, value);
        }
        form
    }
}
