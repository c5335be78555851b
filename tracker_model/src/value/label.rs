//! Display labels for compact field identifiers.

/// Turn a compact identifier into a spaced, capitalized label.
///
/// `recentEvents` becomes `Recent Events`, `npc_count` becomes `Npc Count`.
/// Runs of capitals are kept together, so `HP` stays `HP`.
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;

    for c in key.chars() {
        if c == '_' || c == '-' {
            spaced.push(' ');
        } else {
            if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                spaced.push(' ');
            }
            spaced.push(c);
        }
        prev = Some(c);
    }

    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("recentEvents"), "Recent Events");
        assert_eq!(humanize_key("npc_count"), "Npc Count");
        assert_eq!(humanize_key("location"), "Location");
        assert_eq!(humanize_key("HP"), "HP");
        assert_eq!(humanize_key("floor2Name"), "Floor2 Name");
        assert_eq!(humanize_key("  spaced  key "), "Spaced Key");
        assert_eq!(humanize_key(""), "");
    }
}
