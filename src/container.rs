//! Container and codec list matching
//!
//! Profiles describe containers and codecs as comma separated lists
//! (`"mp4,m4v,mkv"`). An empty list matches everything, and a list prefixed
//! with `-` matches everything except the listed names. Media sources may
//! report several container names at once (`"mov,mp4,m4a"`); a match on any
//! of them counts.

/// Split a comma separated list, dropping empty entries.
pub fn split(list: Option<&str>) -> Vec<String> {
    list.map(|l| {
        l.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Split a `|` separated condition literal, dropping empty entries.
pub fn split_pipe(value: &str) -> Vec<&str> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Check whether `input` is covered by the profile list.
pub fn contains_container(profile_list: Option<&str>, input: Option<&str>) -> bool {
    let (list, negated) = match profile_list.map(str::trim) {
        Some(l) if l.starts_with('-') => (&l[1..], true),
        Some(l) => (l, false),
        None => ("", false),
    };

    if list.is_empty() {
        return true;
    }

    let input = match input {
        Some(i) if !i.trim().is_empty() => i,
        _ => return negated,
    };

    let allowed = split(Some(list));
    let hit = input
        .split(',')
        .map(str::trim)
        .any(|name| allowed.iter().any(|a| a.eq_ignore_ascii_case(name)));

    hit != negated
}

/// Check whether any of `inputs` is covered by the profile list.
pub fn contains_any(profile_list: Option<&str>, inputs: &[String]) -> bool {
    if inputs.is_empty() {
        return contains_container(profile_list, None);
    }
    inputs
        .iter()
        .any(|i| contains_container(profile_list, Some(i)))
}

/// Case-insensitive membership in a plain list.
pub fn list_contains(list: &[String], value: &str) -> bool {
    list.iter().any(|v| v.eq_ignore_ascii_case(value))
}
