//! `{placeholder}` substitution for configured message templates.

use std::collections::HashMap;
use thiserror::Error;

/// Why a template could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("unbalanced brace at byte {0}")]
    Unbalanced(usize),
}

/// Substitute `{name}` placeholders from `args`.
///
/// `{{` and `}}` produce literal braces.
pub fn render(template: &str, args: &HashMap<&str, &str>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => return Err(TemplateError::Unbalanced(pos)),
                        Some((_, ch)) => name.push(ch),
                    }
                }
                let value = args
                    .get(name.trim())
                    .ok_or(TemplateError::UnknownPlaceholder(name))?;
                out.push_str(value);
            }
            '}' => return Err(TemplateError::Unbalanced(pos)),
            _ => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(pairs: &[(&'a str, &'a str)]) -> HashMap<&'a str, &'a str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_render_placeholders() {
        let rendered = render(
            "Text is too long ({current} chars). Max: {max}",
            &args(&[("current", "15000"), ("max", "10000")]),
        )
        .unwrap();
        assert_eq!(rendered, "Text is too long (15000 chars). Max: 10000");
    }

    #[test]
    fn test_render_escapes() {
        let rendered = render("{{literal}} {x}", &args(&[("x", "1")])).unwrap();
        assert_eq!(rendered, "{literal} 1");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = render("Hello {user}", &args(&[])).unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("user".to_string()));
    }

    #[test]
    fn test_unbalanced() {
        assert!(matches!(render("oops {", &args(&[])), Err(TemplateError::Unbalanced(5))));
        assert!(matches!(render("oops }", &args(&[])), Err(TemplateError::Unbalanced(5))));
    }

    #[test]
    fn test_extra_args_ignored() {
        let rendered = render("Done!", &args(&[("unused", "x")])).unwrap();
        assert_eq!(rendered, "Done!");
    }
}
