use super::*;

#[test]
fn default_profile_is_unknown() {
    let profile = UserProfile::default();

    assert_eq!(profile.name, "Unknown");
    assert_eq!(profile.age, 0);
    assert_eq!(profile.location, "Unknown");
    assert!(profile.interests.is_empty());
    assert!(profile.preferences.is_empty());
}

#[test]
fn setters_trim_input() {
    let mut profile = UserProfile::default();
    profile.set_name("  Alex  ");
    profile.set_location(" Lisbon ");

    assert_eq!(profile.name, "Alex");
    assert_eq!(profile.location, "Lisbon");
}

#[test]
fn interests_deduplicate_and_skip_blanks() {
    let mut profile = UserProfile::default();
    profile.add_interest("hiking");
    profile.add_interest("  hiking ");
    profile.add_interest("   ");
    profile.add_interest("chess");

    assert_eq!(profile.interests, vec!["hiking", "chess"]);
}

#[test]
fn preferences_overwrite_by_key() {
    let mut profile = UserProfile::default();
    profile.set_preference("tone", "formal");
    profile.set_preference("tone", "casual");

    assert_eq!(profile.preferences.get("tone").map(String::as_str), Some("casual"));
}

#[test]
fn summary_renders_all_sections() {
    let mut profile = UserProfile::default();
    profile.set_name("Alex");
    profile.set_age(34);
    profile.set_location("Lisbon");
    profile.add_interest("hiking");
    profile.set_preference("tone", "casual");

    let summary = profile.summary();

    assert!(summary.starts_with("User Info:\n"));
    assert!(summary.contains("- Name: Alex"));
    assert!(summary.contains("- Age: 34"));
    assert!(summary.contains("- Location: Lisbon"));
    assert!(summary.contains("- Interests: hiking"));
    assert!(summary.contains("  - tone: casual"));
}

#[test]
fn summary_notes_missing_interests() {
    let summary = UserProfile::default().summary();

    assert!(summary.contains("- Interests: none recorded"));
}
