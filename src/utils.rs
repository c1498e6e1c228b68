/// Join a parent display name and a child label with `delimiter`.
///
/// A missing or empty parent yields the label alone.
#[inline]
pub fn join_name(parent: Option<&str>, label: &str, delimiter: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => {
            let mut name = String::with_capacity(p.len() + delimiter.len() + label.len());
            name.push_str(p);
            name.push_str(delimiter);
            name.push_str(label);
            name
        }
        _ => label.to_string(),
    }
}

/// Join name parts, skipping empty ones, e.g. `["Customer", "FirstName"]` → `Customer.FirstName`.
pub fn join_parts<S: AsRef<str>>(parts: &[S], delimiter: &str) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.is_empty())
        .fold(String::new(), |acc, part| join_name(Some(&acc), part, delimiter))
}
