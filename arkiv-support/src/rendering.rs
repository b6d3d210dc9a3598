//! Text rendering for container error messages.
//!
//! Keeps error output readable: resolution chains as one line,
//! fully qualified type names cut down to something a human scans,
//! and "similarly named" suggestions for typos in bootstrap code.

/// Renders a resolution chain as a single readable line.
///
/// # Examples
/// ```
/// use arkiv_support::rendering::render_chain;
///
/// let chain = vec!["MainModel", "PaneModel", "MainModel"];
/// assert_eq!(render_chain(&chain), "MainModel → PaneModel → MainModel");
/// ```
pub fn render_chain(links: &[impl AsRef<str>]) -> String {
    let mut out = String::new();
    for (i, link) in links.iter().enumerate() {
        if i > 0 {
            out.push_str(" → ");
        }
        out.push_str(link.as_ref());
    }
    out
}

/// Cuts a fully qualified type name down to its last path segments.
///
/// Path prefixes are dropped inside generic arguments as well.
///
/// ```
/// use arkiv_support::rendering::shorten_type_name;
///
/// assert_eq!(
///     shorten_type_name("arkiv::services::TreeScanner"),
///     "TreeScanner"
/// );
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn arkiv::services::TreeScanner>"),
///     "Arc<dyn TreeScanner>"
/// );
/// ```
pub fn shorten_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut pending_colon = false;

    for ch in full.chars() {
        match ch {
            ':' => {
                if pending_colon {
                    // a full "::" separator: everything before it was a path prefix
                    segment.clear();
                    pending_colon = false;
                } else {
                    pending_colon = true;
                }
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' => {
                pending_colon = false;
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            _ => {
                pending_colon = false;
                segment.push(ch);
            }
        }
    }

    out.push_str(&segment);
    out
}

/// Picks up to `limit` names from `available` that look like `requested`.
///
/// Matching is case-insensitive over shortened names: exact, containment,
/// then shared prefix of at least four characters.
pub fn suggest_similar(requested: &str, available: &[&str], limit: usize) -> Vec<String> {
    let wanted = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .filter_map(|&candidate| {
            let have = shorten_type_name(candidate).to_lowercase();
            if have == wanted {
                return Some((1000, candidate));
            }
            if have.contains(&wanted) || wanted.contains(&have) {
                return Some((500, candidate));
            }
            let prefix = have
                .bytes()
                .zip(wanted.bytes())
                .take_while(|(a, b)| a == b)
                .count();
            (prefix >= 4).then_some((prefix, candidate))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.truncate(limit);
    scored.into_iter().map(|(_, name)| name.to_string()).collect()
}
