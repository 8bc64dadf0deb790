//! Command-variable grammar (spec §6): `host` looks a command string up in
//! the manifest's `commands` map, expands `%var%`/`%env:NAME%` tokens
//! against a caller-supplied variable table (falling back to the process
//! environment for unknown `env:` keys), then splits on whitespace
//! respecting double-quoted spans.

use std::collections::BTreeMap;

/// Expand every `%var%` and `%env:NAME%` placeholder in `template`.
/// An unknown plain variable name is left untouched (`%unknown%` stays
/// literal); an unknown `env:NAME` resolves to the process environment,
/// and to an empty string if that isn't set either.
#[must_use]
pub fn expand(template: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(end) = template[i + 1..].find('%') else {
            out.push('%');
            continue;
        };
        let name = &template[i + 1..i + 1 + end];
        // Consume the chars we just looked ahead at, including the closing `%`.
        for _ in 0..=end {
            chars.next();
        }

        if let Some(key) = name.strip_prefix("env:") {
            out.push_str(&vars.get(name).cloned().unwrap_or_else(|| std::env::var(key).unwrap_or_default()));
        } else if let Some(value) = vars.get(name) {
            out.push_str(value);
        } else {
            out.push('%');
            out.push_str(name);
            out.push('%');
        }
    }
    out
}

/// Split `command` into tokens on whitespace, treating a double-quoted span
/// as a single token (quotes themselves are stripped).
#[must_use]
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in command.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
    tokens
}

/// Expand then tokenize a manifest command string in one step.
#[must_use]
pub fn expand_and_tokenize(template: &str, vars: &BTreeMap<String, String>) -> Vec<String> {
    tokenize(&expand(template, vars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_var_expands() {
        let mut vars = BTreeMap::new();
        vars.insert("port".to_string(), "5000".to_string());
        assert_eq!(expand("--server %port%", &vars), "--server 5000");
    }

    #[test]
    fn env_var_falls_back_to_process_environment() {
        std::env::set_var("MODULUS_CLI_TEST_VAR", "hello");
        let vars = BTreeMap::new();
        assert_eq!(expand("%env:MODULUS_CLI_TEST_VAR%", &vars), "hello");
        std::env::remove_var("MODULUS_CLI_TEST_VAR");
    }

    #[test]
    fn unknown_plain_var_is_left_literal() {
        let vars = BTreeMap::new();
        assert_eq!(expand("%nope%", &vars), "%nope%");
    }

    #[test]
    fn tokenize_respects_quoted_spans() {
        let tokens = tokenize(r#"Microsoft.Host --server 5000 "app name.dll""#);
        assert_eq!(tokens, vec!["Microsoft.Host", "--server", "5000", "app name.dll"]);
    }

    #[test]
    fn scenario_s6_expands_and_tokenizes_together() {
        let mut vars = BTreeMap::new();
        vars.insert("env:PORT".to_string(), "5000".to_string());
        let tokens = expand_and_tokenize("Microsoft.Host --server %env:PORT% app.dll", &vars);
        assert_eq!(tokens, vec!["Microsoft.Host", "--server", "5000", "app.dll"]);
    }
}
