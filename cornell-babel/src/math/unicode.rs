//! LaTeX → Unicode approximation for targets without a math renderer.
//!
//! Best effort only: commands are looked up in a symbol table, `\frac{a}{b}` becomes `(a)/(b)`,
//! `\sqrt{x}` becomes `√x`, subscripts become `x[i]` and digit superscripts use the Unicode
//! superscript digits. Nested fractions, matrices and anything else not listed pass through as
//! written.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([A-Za-z]+)").expect("valid regex for latex commands"));
static FRACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\frac\{([^{}]+)\}\{([^{}]+)\}").expect("valid regex for fractions")
});
static SQUARE_ROOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\sqrt\{([^{}]+)\}").expect("valid regex for square roots"));
static BRACED_SUBSCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z\p{Greek}])_\{([^{}]+)\}").expect("valid regex for subscripts")
});
static SIMPLE_SUBSCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z\p{Greek}])_([A-Za-z0-9])").expect("valid regex for subscripts")
});
static SUPERSCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\^(?:\{([0-9]+)\}|([0-9]))").expect("valid regex for superscripts")
});

static SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // Greek, lower case
        ("alpha", "α"),
        ("beta", "β"),
        ("gamma", "γ"),
        ("delta", "δ"),
        ("epsilon", "ε"),
        ("varepsilon", "ε"),
        ("zeta", "ζ"),
        ("eta", "η"),
        ("theta", "θ"),
        ("iota", "ι"),
        ("kappa", "κ"),
        ("lambda", "λ"),
        ("mu", "μ"),
        ("nu", "ν"),
        ("xi", "ξ"),
        ("pi", "π"),
        ("rho", "ρ"),
        ("sigma", "σ"),
        ("tau", "τ"),
        ("upsilon", "υ"),
        ("phi", "φ"),
        ("varphi", "φ"),
        ("chi", "χ"),
        ("psi", "ψ"),
        ("omega", "ω"),
        // Greek, upper case
        ("Gamma", "Γ"),
        ("Delta", "Δ"),
        ("Theta", "Θ"),
        ("Lambda", "Λ"),
        ("Xi", "Ξ"),
        ("Pi", "Π"),
        ("Sigma", "Σ"),
        ("Phi", "Φ"),
        ("Psi", "Ψ"),
        ("Omega", "Ω"),
        // Operators and relations
        ("pm", "±"),
        ("mp", "∓"),
        ("times", "×"),
        ("div", "÷"),
        ("cdot", "·"),
        ("leq", "≤"),
        ("le", "≤"),
        ("geq", "≥"),
        ("ge", "≥"),
        ("neq", "≠"),
        ("ne", "≠"),
        ("approx", "≈"),
        ("equiv", "≡"),
        ("sim", "∼"),
        ("propto", "∝"),
        ("in", "∈"),
        // Arrows
        ("rightarrow", "→"),
        ("to", "→"),
        ("leftarrow", "←"),
        ("Rightarrow", "⇒"),
        ("Leftarrow", "⇐"),
        ("leftrightarrow", "↔"),
        // Calculus and big operators
        ("infty", "∞"),
        ("partial", "∂"),
        ("nabla", "∇"),
        ("sum", "∑"),
        ("prod", "∏"),
        ("int", "∫"),
        ("ldots", "…"),
        ("cdots", "⋯"),
    ]
    .into_iter()
    .collect()
});

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Converts the body of a math span (no delimiters) into a Unicode approximation.
pub fn latex_to_unicode(latex: &str) -> String {
    let text = COMMAND.replace_all(latex, |caps: &Captures| {
        let name = &caps[1];
        match SYMBOLS.get(name) {
            Some(glyph) => (*glyph).to_string(),
            None => caps[0].to_string(),
        }
    });
    let text = BRACED_SUBSCRIPT.replace_all(&text, "$1[$2]");
    let text = SIMPLE_SUBSCRIPT.replace_all(&text, "$1[$2]");
    let text = SUPERSCRIPT.replace_all(&text, |caps: &Captures| {
        let digits = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        digits.chars().map(superscript_digit).collect::<String>()
    });
    let text = FRACTION.replace_all(&text, "($1)/($2)");
    let text = SQUARE_ROOT.replace_all(&text, "√$1");
    text.into_owned()
}

fn superscript_digit(digit: char) -> char {
    digit
        .to_digit(10)
        .map_or(digit, |value| SUPERSCRIPT_DIGITS[value as usize])
}
