// ============================================================================
// spark-mvvm - Text Interpolation
// Finding and substituting {{ expr }} occurrences
// ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

/// `{{ expr }}`, non-greedy so adjacent occurrences stay separate.
static INTERPOLATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("interpolation pattern is valid"));

/// True if `text` contains at least one non-blank `{{ expr }}`.
pub fn has_interpolation(text: &str) -> bool {
    expressions(text).next().is_some()
}

/// The trimmed expressions of every occurrence, in order. Blank
/// occurrences such as `{{ }}` are skipped.
///
/// ```
/// use spark_mvvm::compiler::interpolation::expressions;
///
/// let exprs: Vec<&str> = expressions("{{ a }}-{{b.c}}").collect();
/// assert_eq!(exprs, ["a", "b.c"]);
/// ```
pub fn expressions(text: &str) -> impl Iterator<Item = &str> {
    INTERPOLATION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|expr| !expr.is_empty())
}

/// Substitute every occurrence with `resolve(expr)`, keeping the text in
/// between untouched. Blank occurrences are kept as written. The first
/// resolution error aborts the render.
pub fn render(template: &str, mut resolve: impl FnMut(&str) -> Result<String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in INTERPOLATION_PATTERN.captures_iter(template) {
        let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let expr = expr.as_str().trim();
        if expr.is_empty() {
            continue;
        }
        out.push_str(&template[last..whole.start()]);
        out.push_str(&resolve(expr)?);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}
