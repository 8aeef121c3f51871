//! Run-scoped record name allocation.

use std::collections::HashSet;

/// The set of record names already handed out in one generation run.
///
/// Callers own the registry and thread it through inference explicitly;
/// it is dropped with the run.
///
/// ## Examples
///
/// ```
/// use swiftreq_gen::names::NameRegistry;
///
/// let mut names = NameRegistry::new();
/// assert_eq!(names.allocate("UserModel"), "UserModel");
/// assert_eq!(names.allocate("UserModel"), "UserModel2");
/// assert_eq!(names.allocate("UserModel"), "UserModel3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `base`, or `base2`, `base3`, ... when it is taken.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut idx = 2;
        loop {
            let candidate = format!("{base}{idx}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            idx += 1;
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
