/// Candidate names the user has currently checked for one election.
///
/// Under a single-choice policy the set never holds more than one name:
/// checking a new option replaces the previous one. Under a multiple-choice
/// policy names are kept in check order without duplicates. The policy is
/// passed with every call and must stay the same for the lifetime of a
/// tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    checked: Vec<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_option(&mut self, name: &str, checked: bool, multiple: bool) {
        if !checked {
            self.checked.retain(|existing| existing != name);
            return;
        }

        if !multiple {
            self.checked.clear();
            self.checked.push(name.to_string());
        } else if !self.contains(name) {
            self.checked.push(name.to_string());
        }
    }

    pub fn current(&self) -> &[String] {
        &self.checked
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checked.iter().any(|existing| existing == name)
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
