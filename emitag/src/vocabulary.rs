use hashbrown::HashMap;

/// Reserved placeholder for words that did not appear in the training corpus.
pub const UNK: &str = "#UNK#";

/// Insertion-ordered set of strings.
///
/// Each distinct string gets the index of its first occurrence, so iterating a vocabulary built
/// from a corpus yields strings in first-occurrence order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    ids: HashMap<String, usize>,
    keys: Vec<String>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the index of `key`, inserting it at the end if it is new.
    pub fn get_or_insert(&mut self, key: &str) -> usize {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len();
            self.keys.push(key.to_string());
            self.ids.insert(key.to_string(), id);
            id
        }
    }

    /// Gets the index of `key`.
    #[inline(always)]
    pub fn id(&self, key: &str) -> Option<usize> {
        self.ids.get(key).copied()
    }

    /// Gets the string stored at `id`.
    #[inline(always)]
    pub fn get(&self, id: usize) -> Option<&str> {
        self.keys.get(id).map(String::as_str)
    }

    /// Returns `true` if `key` is in the vocabulary.
    pub fn contains(&self, key: &str) -> bool {
        self.ids.contains_key(key)
    }

    /// Gets the number of distinct strings.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the vocabulary has no strings.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates strings in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    /// Gets strings in index order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(keys: Vec<String>) -> Self {
        let mut vocab = Self::new();
        for key in &keys {
            vocab.get_or_insert(key);
        }
        vocab
    }
}

impl<'a> FromIterator<&'a str> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut vocab = Self::new();
        for key in iter {
            vocab.get_or_insert(key);
        }
        vocab
    }
}
