//! Light suffix stemmer used for keyword equivalence

const MIN_STEM_LEN: usize = 3;

/// Reduce a normalized token to a comparison stem.
///
/// Handles plurals, `-ed`, `-ing` and a final `-e`, enough to make
/// "manages", "managed", "managing" and "manage" agree. Tokens carrying
/// non-letters (`node.js`, `c++`, `python3`) are returned unchanged.
pub fn stem(token: &str) -> String {
    if token.chars().count() < 4 || !token.chars().all(char::is_alphabetic) {
        return token.to_string();
    }

    let mut word = strip_plural(token);

    for suffix in ["ing", "ed"] {
        if let Some(base) = word.strip_suffix(suffix) {
            if base.chars().count() >= MIN_STEM_LEN && base.chars().any(is_vowel) {
                word = undouble(base).to_string();
                break;
            }
        }
    }

    if word.chars().count() > 4 {
        if let Some(base) = word.strip_suffix('e') {
            word = base.to_string();
        }
    }

    word
}

fn strip_plural(word: &str) -> String {
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(base) = word.strip_suffix("ies") {
        if base.chars().count() >= MIN_STEM_LEN {
            return format!("{base}y");
        }
    }
    if let Some(base) = word.strip_suffix("es") {
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| base.ends_with(end)) {
            return base.to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(base) if base.chars().count() >= MIN_STEM_LEN => base.to_string(),
        _ => word.to_string(),
    }
}

/// "runn" -> "run" after removing "-ing"
fn undouble(base: &str) -> &str {
    let mut chars = base.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a == b && !is_vowel(a) && !matches!(a, 'l' | 's' | 'z') => {
            &base[..base.len() - a.len_utf8()]
        }
        _ => base,
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_forms_agree() {
        let stems: Vec<String> = ["manage", "manages", "managed", "managing"]
            .iter()
            .map(|w| stem(w))
            .collect();

        assert!(stems.iter().all(|s| s == "manag"));
    }

    #[test]
    fn test_plurals() {
        assert_eq!(stem("skills"), "skill");
        assert_eq!(stem("processes"), stem("process"));
        assert_eq!(stem("technologies"), stem("technology"));
        assert_eq!(stem("analysis"), "analysis");
        assert_eq!(stem("status"), "status");
    }

    #[test]
    fn test_doubled_consonant() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("modelling"), "modell");
    }

    #[test]
    fn test_short_and_technical_tokens_unchanged() {
        assert_eq!(stem("sql"), "sql");
        assert_eq!(stem("node.js"), "node.js");
        assert_eq!(stem("c++"), "c++");
        assert_eq!(stem("bring"), "bring");
    }
}
