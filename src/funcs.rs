//! String helpers exposed to templates.
//!
//! These are the only transformations a template can apply to catalog
//! descriptions. Their output ends up in generated identifiers, so the rules
//! below are kept byte-for-byte stable:
//!
//! | Function | Example |
//! |----------|---------|
//! | [`normalize`] | `"Foo Error (bar) - baz"` → `"Foo Error  bar"` |
//! | [`split`] | `split(" ", "a b")` → `["a", "b"]` |
//! | [`join`] | `join("", ["A", "B"])` → `"AB"` |
//! | [`title`] | `["hello world"]` → `["Hello World"]` |
//! | [`map_values`] | `map("a", "b", ["a", "c"])` → `["b", "c"]` |

/// How the template `map` function builds its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MapMode {
    /// Replace every element equal to `from` with `to`, in place.
    #[default]
    Substitute,
    /// Start from a buffer of `len` empty strings and append each mapped
    /// element after it. The result is twice the input length.
    Legacy,
}

/// Shorten a description into an identifier-friendly phrase.
///
/// If the text contains `)`, everything from the first `)` onward is dropped
/// and any `(` left in the prefix becomes a space. Hyphens are then replaced
/// with spaces.
///
/// - `"Foo Error (bar) - baz"` → `"Foo Error  bar"`
/// - `"no-parens-here"` → `"no parens here"`
pub fn normalize(desc: &str) -> String {
    let prefix = match desc.find(')') {
        Some(idx) => desc[..idx].replace('(', " "),
        None => desc.to_string(),
    };
    prefix.replace('-', " ")
}

/// Split `value` on every occurrence of `separator`.
///
/// An empty separator splits between every character.
pub fn split(separator: &str, value: &str) -> Vec<String> {
    if separator.is_empty() {
        return value.chars().map(String::from).collect();
    }
    value.split(separator).map(str::to_string).collect()
}

/// Concatenate `values` with `separator` between each pair.
pub fn join(separator: &str, values: &[String]) -> String {
    values.join(separator)
}

/// Upper-case the first letter of every word in each element.
///
/// Case mapping is locale-naive and one character to one character: a
/// letter whose upper-case form is longer than one character (`ß`) is left
/// unchanged, and the Latin digraphs map to their title-case form (`ǆ` →
/// `ǅ`).
pub fn title(values: &[String]) -> Vec<String> {
    values.iter().map(|v| title_case(v)).collect()
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = ' ';
    for c in s.chars() {
        if is_word_separator(prev) {
            out.push(title_char(c));
        } else {
            out.push(c);
        }
        prev = c;
    }
    out
}

fn title_char(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    match c {
        'Ǆ' | 'ǅ' | 'ǆ' => 'ǅ',
        'Ǉ' | 'ǈ' | 'ǉ' => 'ǈ',
        'Ǌ' | 'ǋ' | 'ǌ' => 'ǋ',
        'Ǳ' | 'ǲ' | 'ǳ' => 'ǲ',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}

/// ASCII letters, digits and `_` continue a word; other ASCII characters
/// break it. Outside ASCII only whitespace breaks a word.
fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}

/// Replace elements equal to `from` with `to`, shaped by `mode`.
pub fn map_values(mode: MapMode, from: &str, to: &str, values: &[String]) -> Vec<String> {
    let mapped = values.iter().map(|v| {
        if v == from {
            to.to_string()
        } else {
            v.clone()
        }
    });
    match mode {
        MapMode::Substitute => mapped.collect(),
        MapMode::Legacy => {
            let mut out = vec![String::new(); values.len()];
            out.extend(mapped);
            out
        }
    }
}
