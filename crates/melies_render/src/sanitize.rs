//! Rewriting of untrusted generated animation code.
//!
//! Generated code is never rejected; it is repaired. Every construct outside
//! the capability whitelist is removed or replaced with a harmless
//! placeholder so that a render attempt is always made, at the cost of
//! occasionally turning a meaningful element into a text label.

use melies_core::capability::{FORBIDDEN_ELEMENTS, REMOVED_PLACEHOLDER};
use regex::Regex;
use tracing::warn;

/// Passes applied until the text stops changing. Rewrites can expose new
/// matches (a removal can join two fragments into a forbidden call), so a
/// single sweep is not enough to guarantee a fixed point.
const MAX_PASSES: usize = 8;

struct ForbiddenRule {
    /// `.name(...)` dotted invocation, removed outright
    method: Regex,
    /// `name(...)` call-style invocation, replaced with the placeholder
    call: Regex,
}

/// Rewrites generated source text down to the safe capability subset.
///
/// The contract is total: any input produces output, nothing is ever
/// rejected, and sanitizing already-sanitized text is a no-op.
///
/// # Examples
///
/// ```
/// use melies_render::Sanitizer;
///
/// let sanitizer = Sanitizer::new();
/// let out = sanitizer.sanitize("title = MathTex(r\"\\int f\")");
/// assert_eq!(out, "title = Text(\"Element removed\")");
/// ```
pub struct Sanitizer {
    rules: Vec<ForbiddenRule>,
    legacy_mathtex: Regex,
    legacy_tex: Regex,
    unpack: Regex,
    wait_until: Regex,
    pause: Regex,
    empty_play: Regex,
    comma_line: Regex,
    comma_run: Regex,
}

impl Sanitizer {
    /// Compile the rewrite rules.
    pub fn new() -> Self {
        let rules = FORBIDDEN_ELEMENTS
            .iter()
            .map(|name| ForbiddenRule {
                method: Regex::new(&format!(r"\.{name}\s*\([^)]*\)"))
                    .expect("Valid method regex"),
                call: Regex::new(&format!(r"\b{name}\s*\([^)]*\)")).expect("Valid call regex"),
            })
            .collect();

        Self {
            rules,
            legacy_mathtex: Regex::new(r"\bMathTex\s*\(").expect("Valid legacy regex"),
            legacy_tex: Regex::new(r"\bTex\s*\(").expect("Valid legacy regex"),
            unpack: Regex::new(r"\*\*[a-zA-Z_][a-zA-Z0-9_]*\s*,?\s*").expect("Valid unpack regex"),
            wait_until: Regex::new(r"self\.wait_until\s*\([^)]*\)").expect("Valid wait regex"),
            pause: Regex::new(r"self\.pause\s*\([^)]*\)").expect("Valid pause regex"),
            empty_play: Regex::new(r"self\.play\(\s*\)").expect("Valid play regex"),
            comma_line: Regex::new(r"(?m)^\s*,\s*$").expect("Valid comma line regex"),
            comma_run: Regex::new(r",(\s*,)+").expect("Valid comma run regex"),
        }
    }

    /// Rewrite `code` to the safe subset.
    ///
    /// Applies the pass sequence until the text stabilizes, which makes the
    /// result idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
    pub fn sanitize(&self, code: &str) -> String {
        let mut out = code.to_string();
        for _ in 0..MAX_PASSES {
            let next = self.pass(&out);
            if next == out {
                return out;
            }
            out = next;
        }
        warn!(
            passes = MAX_PASSES,
            "sanitizer did not reach a fixed point, returning best effort"
        );
        out
    }

    fn pass(&self, code: &str) -> String {
        let mut out = code.to_string();

        // Dotted uses are removed before call-style uses so a method match
        // is never half-consumed as a bare call (the receiver expression
        // must survive the removal).
        for rule in &self.rules {
            out = rule.method.replace_all(&out, "").into_owned();
            out = rule.call.replace_all(&out, REMOVED_PLACEHOLDER).into_owned();
        }

        // Unclosed legacy constructors slip past the call rules above.
        out = self.legacy_mathtex.replace_all(&out, "Text(").into_owned();
        out = self.legacy_tex.replace_all(&out, "Text(").into_owned();

        // Keyword-dict unpacking causes duplicate-kwarg failures downstream.
        out = self.unpack.replace_all(&out, "").into_owned();

        // Hallucinated pause APIs become a real one-second wait.
        out = self.wait_until.replace_all(&out, "self.wait(1)").into_owned();
        out = self.pause.replace_all(&out, "self.wait(1)").into_owned();

        // Removals leave husks behind; tidy them.
        out = self.empty_play.replace_all(&out, "self.wait(0.5)").into_owned();
        out = self.comma_line.replace_all(&out, "").into_owned();
        out = self.comma_run.replace_all(&out, ",").into_owned();

        out
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip markdown code-fence framing from a model response.
///
/// Tolerates surrounding whitespace and both the bare and
/// language-annotated opening fence.
///
/// # Examples
///
/// ```
/// use melies_render::strip_markdown_fences;
///
/// let body = strip_markdown_fences("```python\nfrom manim import *\n```\n");
/// assert_eq!(body, "from manim import *");
/// ```
pub fn strip_markdown_fences(text: &str) -> String {
    let mut out = text.trim();
    if let Some(rest) = out.strip_prefix("```python") {
        out = rest;
    } else if let Some(rest) = out.strip_prefix("```") {
        out = rest;
    }
    if let Some(rest) = out.strip_prefix('\n') {
        out = rest;
    }
    if let Some(rest) = out.trim_end().strip_suffix("```") {
        out = rest;
    }
    out.trim().to_string()
}
