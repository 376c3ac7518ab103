/// Assemble the full transcript from per-chunk texts, in chunk order,
/// separated by single spaces.
pub fn stitch(texts: &[String]) -> String {
    let joined = texts.join(" ");
    collapse_spaces(&joined).trim().to_string()
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::new();
    let mut in_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
            continue;
        }

        in_space = false;
        out.push(ch);
    }

    out
}
