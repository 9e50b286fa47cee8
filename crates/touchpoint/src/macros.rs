/// Lazily compiled regex for a literal pattern, shared across calls.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("static regex compiles"));
        &*RE
    }};
}
