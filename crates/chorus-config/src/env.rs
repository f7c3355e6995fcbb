use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Expansion runs before deserialization so config structs
/// stay plain `String`/`SecretString`. Comment lines pass through untouched,
/// letting documented-out secrets live in the file without being required.
pub fn expand(input: &str) -> Result<String, String> {
    fn placeholder() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());
    let mut failure: Option<String> = None;

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let expanded = placeholder().replace_all(line, |caps: &regex::Captures<'_>| {
            let var = &caps[1];
            match std::env::var(var) {
                Ok(value) => value,
                Err(_) => caps.get(2).map_or_else(
                    || {
                        failure.get_or_insert_with(|| format!("environment variable not found: `{var}`"));
                        String::new()
                    },
                    |default| default.as_str().to_owned(),
                ),
            }
        });
        output.push_str(&expanded);
    }

    if let Some(err) = failure {
        return Err(err);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
