use crate::runtime::handler::Handler;

const ANONYMOUS: &str = "anonymous";

/// Short display name of a handler: its qualified path without the module
/// prefix. Purely cosmetic; never affects invocation.
pub fn function_name(handler: &Handler) -> String {
    handler.path().map_or_else(|| ANONYMOUS.to_string(), short_name)
}

/// Reduces a qualified Rust path to its last segment.
///
/// Generic arguments are dropped first so that paths inside them cannot leak
/// into the result. Closures are named after their enclosing item, one
/// `.closure` per nesting level; function pointers are named `fn`.
pub fn short_name(path: &str) -> String {
    let path = path.trim_start_matches(['&', '*']);
    let path = path.strip_prefix("mut ").unwrap_or(path);
    if path.starts_with("fn(") || path.starts_with("unsafe fn(") || path.starts_with("extern ") {
        return "fn".to_string();
    }

    let stripped = strip_generics(path);
    let segments: Vec<&str> = stripped
        .split("::")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let Some(named_at) = segments.iter().rposition(|s| !is_synthetic(s)) else {
        return ANONYMOUS.to_string();
    };

    let mut name = segments[named_at].to_string();
    for segment in &segments[named_at + 1..] {
        name.push('.');
        name.push_str(segment.trim_matches(['{', '}']));
    }
    name
}

/// Compiler-generated segments such as `{{closure}}` or `{{constant}}`.
fn is_synthetic(segment: &str) -> bool {
    segment.starts_with("{{") && segment.ends_with("}}")
}

fn strip_generics(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    for ch in path.chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}
