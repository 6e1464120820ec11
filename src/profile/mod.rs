#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Facts the assistant knows about its user, injected into conversation
/// context. Held behind a mutex by the server; all mutation goes through
/// the setters so the rendering stays in one place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub location: String,
    pub interests: Vec<String>,
    pub preferences: BTreeMap<String, String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            age: 0,
            location: "Unknown".to_string(),
            interests: Vec::new(),
            preferences: BTreeMap::new(),
        }
    }
}

impl UserProfile {
    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = location.trim().to_string();
    }

    /// Record an interest, ignoring duplicates and blank entries.
    pub fn add_interest(&mut self, interest: &str) {
        let interest = interest.trim();
        if !interest.is_empty() && !self.interests.iter().any(|i| i == interest) {
            self.interests.push(interest.to_string());
        }
    }

    pub fn set_preference(&mut self, key: &str, value: &str) {
        self.preferences
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    /// Render the profile as the context block handed to the model.
    pub fn summary(&self) -> String {
        let mut out = String::from("User Info:\n");
        out.push_str(&format!("- Name: {}\n", self.name));
        out.push_str(&format!("- Age: {}\n", self.age));
        out.push_str(&format!("- Location: {}\n", self.location));

        if self.interests.is_empty() {
            out.push_str("- Interests: none recorded\n");
        } else {
            out.push_str(&format!("- Interests: {}\n", self.interests.join(", ")));
        }

        if !self.preferences.is_empty() {
            out.push_str("- Preferences:\n");
            for (key, value) in &self.preferences {
                out.push_str(&format!("  - {key}: {value}\n"));
            }
        }

        out
    }
}
