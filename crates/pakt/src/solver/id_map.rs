use std::collections::HashMap;

/// Assigns dense, positive solver variable ids to package names and
/// maps them back. Id 0 is reserved as invalid; the empty name always
/// maps to it. Ids are stable for the lifetime of the map.
#[derive(Debug)]
pub(crate) struct NameIdMap {
    ids: HashMap<String, i32>,
    /// Names indexed by id; index 0 holds the invalid empty name.
    names: Vec<String>,
}

impl NameIdMap {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            names: vec![String::new()],
        }
    }

    /// Number of names mapped.
    pub fn len(&self) -> usize {
        self.names.len() - 1
    }

    /// Return the id for a name, allocating the next unused id if the
    /// name is new. The empty name is invalid and returns 0.
    pub fn intern(&mut self, name: &str) -> i32 {
        if name.is_empty() {
            return 0;
        }
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as i32;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Look up the id of an already-mapped name.
    pub fn get(&self, name: &str) -> Option<i32> {
        self.ids.get(name).copied()
    }

    /// The name mapped to an id, or the empty string if the id is
    /// unknown. Negative ids resolve through their absolute value, as
    /// the SAT layer works with signed literals.
    pub fn name(&self, id: i32) -> &str {
        let index = id.unsigned_abs() as usize;
        self.names.get(index).map(String::as_str).unwrap_or("")
    }
}
