//! Naming conventions for module names typed by users.
//!
//! Rules (all pure and deterministic):
//! - [`studly`]: split on `-`, `_`, `.` and whitespace, upper-case the first
//!   letter of every word, concatenate (`blog-post` -> `BlogPost`).
//! - [`singular`]: English singular of the trailing word for regular nouns
//!   (`Categories` -> `Category`, `Boxes` -> `Box`, `Posts` -> `Post`).
//! - [`plural`]: the inverse for regular nouns.
//! - [`kebab`]: lower-case words joined by `-`.
//! - [`module_name`]: `studly`, then `singular`, then an upper-case first letter.

/// Converts `input` to StudlyCase.
#[must_use]
pub fn studly(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(upper_first)
        .collect()
}

/// Converts StudlyCase or camelCase to kebab-case (`BlogPost` -> `blog-post`).
#[must_use]
pub fn kebab(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, c) in studly(input).chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Singular form of a regular English noun; other words are returned unchanged.
#[must_use]
pub fn singular(word: &str) -> String {
    let lower = word.to_lowercase();

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return word[..word.len() - 2].to_string();
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

/// Plural form of a regular English noun.
#[must_use]
pub fn plural(word: &str) -> String {
    let lower = word.to_lowercase();

    if lower.ends_with('y')
        && !lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| "aeiou".contains(c))
    {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Canonical module name for user input (`posts` -> `Post`).
#[must_use]
pub fn module_name(input: &str) -> String {
    upper_first(&singular(&studly(input)))
}

/// Publish tag for a module's migrations (`Post` -> `post-migrations`).
#[must_use]
pub fn migrations_tag(module: &str) -> String {
    format!("{}-migrations", module.to_lowercase())
}

/// `"1 migration"`, `"3 migrations"`.
#[must_use]
pub fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {}", plural(noun))
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
