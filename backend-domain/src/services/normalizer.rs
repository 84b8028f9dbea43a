const DASH_VARIANTS: [char; 5] = ['\u{2010}', '\u{2011}', '\u{2013}', '\u{2014}', '\u{2212}'];

/// Canonical form of a Beyblade name used for every name comparison.
pub fn normalize_beyblade_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        out.push(if DASH_VARIANTS.contains(&ch) { '-' } else { ch });
    }
    out
}

pub fn same_beyblade_name(left: &str, right: &str) -> bool {
    normalize_beyblade_name(left) == normalize_beyblade_name(right)
}
