//! `{name}` placeholder parsing and substitution.
//!
//! Placeholders are `{` + identifier + `}` where the identifier matches
//! `[A-Za-z_][A-Za-z0-9_]*`. `{{` and `}}` render as single braces. Any other brace
//! sequence (JSON snippets, `{ spaced }`, `{0}`) is copied through untouched.

use crate::{TemplateError, TemplateVars};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn parse(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];
        if (byte == b'{' || byte == b'}') && bytes.get(index + 1) == Some(&byte) {
            // keep one brace of the escaped pair
            segments.push(Segment::Literal(&template[literal_start..=index]));
            index += 2;
            literal_start = index;
            continue;
        }

        if byte == b'{' {
            if let Some(len) = identifier_len(&bytes[index + 1..]) {
                if literal_start < index {
                    segments.push(Segment::Literal(&template[literal_start..index]));
                }
                segments.push(Segment::Placeholder(&template[index + 1..index + 1 + len]));
                index += len + 2;
                literal_start = index;
                continue;
            }
        }

        index += 1;
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    segments
}

/// Length of an identifier directly followed by `}`.
fn identifier_len(rest: &[u8]) -> Option<usize> {
    let first = *rest.first()?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }

    let len = rest
        .iter()
        .position(|byte| !(byte.is_ascii_alphanumeric() || *byte == b'_'))?;
    (rest[len] == b'}').then_some(len)
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in parse(template) {
        if let Segment::Placeholder(name) = segment {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Substitutes every placeholder, failing up front if any variable is absent.
pub fn render(
    template_name: &str,
    template: &str,
    vars: &TemplateVars,
) -> Result<String, TemplateError> {
    let segments = parse(template);

    let mut missing: Vec<&str> = Vec::new();
    for segment in &segments {
        if let Segment::Placeholder(name) = segment {
            if !vars.contains(name) && !missing.contains(name) {
                missing.push(name);
            }
        }
    }

    if !missing.is_empty() {
        return Err(TemplateError::missing_variable(format!(
            "template '{template_name}' is missing variables: {}",
            missing.join(", ")
        )));
    }

    let mut output = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder(name) => output.push_str(vars.get(name).unwrap_or_default()),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateErrorKind;

    #[test]
    fn substitutes_named_placeholders() {
        let vars = TemplateVars::new()
            .with("current_time", "09:15 AM")
            .with("location", "your private office");

        let rendered = render(
            "core/giulia_assistant",
            "It is {current_time} in {location}. Again: {location}.",
            &vars,
        )
        .expect("render should succeed");

        assert_eq!(
            rendered,
            "It is 09:15 AM in your private office. Again: your private office."
        );
    }

    #[test]
    fn doubled_braces_are_escapes_and_other_braces_are_literal() {
        let vars = TemplateVars::new().with("message", "hi");
        let rendered = render(
            "t",
            "{{message}} {message} {\"json\": 1} { message } {0} }",
            &vars,
        )
        .expect("render should succeed");

        assert_eq!(rendered, "{message} hi {\"json\": 1} { message } {0} }");
    }

    #[test]
    fn missing_variables_are_all_reported() {
        let error = render("core/boss_wrapper", "{a} {message} {b} {a}", &TemplateVars::new())
            .expect_err("render should fail");

        assert_eq!(error.kind, TemplateErrorKind::MissingVariable);
        assert!(error.message.contains("a, message, b"));
        assert!(error.message.contains("core/boss_wrapper"));
    }

    #[test]
    fn extra_variables_are_ignored() {
        let vars = TemplateVars::new().with("message", "hi").with("unused", "x");
        assert_eq!(render("t", "{message}", &vars).expect("render"), "hi");
    }

    #[test]
    fn placeholders_are_unique_and_ordered() {
        assert_eq!(
            placeholders("{b}{a}{{c}}{b}{_d1}{1x}{"),
            vec!["b", "a", "_d1"]
        );
    }

    #[test]
    fn values_are_not_reinterpreted() {
        let vars = TemplateVars::new().with("message", "{location}");
        assert_eq!(
            render("t", "says {message}", &vars).expect("render"),
            "says {location}"
        );
    }
}
