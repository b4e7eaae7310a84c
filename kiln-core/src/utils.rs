//! Case conversion helpers exposed to templates as filters.

/// Split an identifier into lowercase words.
///
/// Word boundaries are `_`, `-`, whitespace and lower-to-upper transitions,
/// so `"HTTPServer_name"` becomes `["httpserver", "name"]` and
/// `"helloWorld"` becomes `["hello", "world"]`.
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
pub fn to_pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert a string to camelCase (e.g., "hello_world" -> "helloWorld")
pub fn to_camel_case(s: &str) -> String {
    let words = words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// Convert a string to snake_case (e.g., "HelloWorld" -> "hello_world")
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Convert a string to kebab-case (e.g., "HelloWorld" -> "hello-world")
pub fn to_kebab_case(s: &str) -> String {
    words(s).join("-")
}
