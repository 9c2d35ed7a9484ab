use std::collections::HashMap;
use std::sync::RwLock;

/// Pattern trie for `/`-separated paths with MQTT-style wildcards.
///
/// - `+` matches exactly one level
/// - `#` matches zero or more remaining levels and must be last
pub struct Trie<T> {
    root: RwLock<Node<T>>,
}

struct Node<T> {
    children: HashMap<String, Node<T>>,
    one: Option<Box<Node<T>>>,
    /// Values registered with `#` at this level.
    rest: Vec<T>,
    /// Values whose pattern ends exactly here.
    here: Vec<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            one: None,
            rest: Vec::new(),
            here: Vec::new(),
        }
    }
}

impl<T: Clone> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::default()),
        }
    }

    pub fn insert(&self, pattern: &str, value: T) {
        let mut root = self.root.write().unwrap_or_else(|e| e.into_inner());
        let mut node = &mut *root;
        for segment in segments(pattern) {
            match segment {
                "#" => {
                    node.rest.push(value);
                    return;
                }
                "+" => node = node.one.get_or_insert_with(Default::default).as_mut(),
                s => node = node.children.entry(s.to_string()).or_default(),
            }
        }
        node.here.push(value);
    }

    /// All values whose pattern matches the concrete `path`.
    pub fn matches(&self, path: &str) -> Vec<T> {
        let root = self.root.read().unwrap_or_else(|e| e.into_inner());
        let parts: Vec<&str> = segments(path).collect();
        let mut out = Vec::new();
        root.collect(&parts, &mut out);
        out
    }

    /// Drop values at exactly `pattern` for which `predicate` holds.
    pub fn remove<F: Fn(&T) -> bool>(&self, pattern: &str, predicate: F) -> bool {
        let mut root = self.root.write().unwrap_or_else(|e| e.into_inner());
        let mut node = &mut *root;
        for segment in segments(pattern) {
            let next = match segment {
                "#" => return retain(&mut node.rest, &predicate),
                "+" => node.one.as_deref_mut(),
                s => node.children.get_mut(s),
            };
            match next {
                Some(n) => node = n,
                None => return false,
            }
        }
        retain(&mut node.here, &predicate)
    }
}

impl<T: Clone> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Node<T> {
    fn collect(&self, parts: &[&str], out: &mut Vec<T>) {
        out.extend(self.rest.iter().cloned());
        let Some((first, tail)) = parts.split_first() else {
            out.extend(self.here.iter().cloned());
            return;
        };
        if let Some(child) = self.children.get(*first) {
            child.collect(tail, out);
        }
        if let Some(one) = &self.one {
            one.collect(tail, out);
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn retain<T, F: Fn(&T) -> bool>(values: &mut Vec<T>, predicate: &F) -> bool {
    let before = values.len();
    values.retain(|v| !predicate(v));
    values.len() < before
}
