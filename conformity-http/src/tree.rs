// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

/// An ordered, string-keyed tree whose leaves are of type `T`.
///
/// This mirrors the nested form-field naming convention (`field[a][b]`) used
/// for query parameters, parsed bodies and uploaded files.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree<T> {
    entries: Vec<(String, Node<T>)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node<T> {
    Leaf(T),
    Branch(Tree<T>),
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node<T>> {
        self.entries.iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Follow the path of keys down the tree.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Node<T>> {
        let (first, rest) = path.split_first()?;
        let node = self.get(first)?;
        if rest.is_empty() {
            return Some(node);
        }

        match node {
            Node::Branch(tree) => tree.get_path(rest),
            Node::Leaf(..) => None,
        }
    }

    /// Returns the leaf value stored directly under the key.
    #[must_use]
    pub fn leaf(&self, key: &str) -> Option<&T> {
        match self.get(key)? {
            Node::Leaf(value) => Some(value),
            Node::Branch(..) => None,
        }
    }

    /// Insert a node, replacing the node previously stored under the key
    /// while keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, node: Node<T>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = node,
            None => self.entries.push((key, node)),
        }
    }

    pub fn insert_leaf(&mut self, key: impl Into<String>, value: T) {
        self.insert(key, Node::Leaf(value));
    }

    #[must_use]
    pub fn with_leaf(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert_leaf(key, value);
        self
    }

    #[must_use]
    pub fn with_branch(mut self, key: impl Into<String>, tree: Tree<T>) -> Self {
        self.insert(key, Node::Branch(tree));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node<T>)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }
}

impl<K: Into<String>, T> FromIterator<(K, Node<T>)> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = (K, Node<T>)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, node) in iter {
            tree.insert(key, node);
        }
        tree
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = (String, Node<T>);
    type IntoIter = std::vec::IntoIter<(String, Node<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
