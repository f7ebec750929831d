use winnow::{
    Parser as _,
    ascii::{digit1, space0},
    combinator::{alt, delimited, opt, repeat},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{take_till, take_while},
};

use crate::error::FormatError;

/// Formatting requested by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `{n}`: the value as the field would show it.
    Plain,
    /// `{n,number}` or `{n,number,<pattern>}`.
    Number(Option<String>),
    /// `{n,date,<strftime>}`.
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { index: usize, style: PlaceholderStyle },
}

/// A parsed custom tooltip template.
///
/// Placeholders are numbered from zero and index the tooltip's candidate
/// fields. `{{` and `}}` stand for literal braces.
///
/// # Examples
///
/// ```
/// # use chartarea::tooltip::TooltipTemplate;
/// let template = TooltipTemplate::parse("{0}: {1,number,#,##0}").expect("valid template");
/// let text = template.render(|index, _| format!("<{index}>"));
/// assert_eq!(text, "<0>: <1>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipTemplate {
    segments: Vec<Segment>,
}

impl TooltipTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::Template`] with the byte offset of the first
    /// problem: an unterminated or unmatched brace, a non-numeric index, an
    /// unknown style or a date placeholder without a pattern.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut input = LocatingSlice::new(source);
        let segments = repeat(0.., segment)
            .fold(Vec::new, |mut segments: Vec<Segment>, segment| {
                push_segment(&mut segments, segment);
                segments
            })
            .parse_next(&mut input)
            .map_err(|err| template_error(err, input.current_token_start()))?;
        if !input.is_empty() {
            return Err(FormatError::Template {
                offset: input.current_token_start(),
                reason: "unexpected input",
            });
        }
        Ok(Self { segments })
    }

    /// Returns the placeholder indices in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { index, .. } => Some(*index),
            Segment::Literal(_) => None,
        })
    }

    /// Renders the template, asking `resolve` for each placeholder's text.
    pub fn render(&self, mut resolve: impl FnMut(usize, &PlaceholderStyle) -> String) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { index, style } => out.push_str(&resolve(*index, style)),
            }
        }
        out
    }
}

/// Problem found in a template, attached to winnow errors via `.context()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TemplateIssue {
    /// Byte offset of the offending brace.
    offset: usize,
    reason: &'static str,
}

type Input<'a> = LocatingSlice<&'a str>;
type TemplateResult<O> = ModalResult<O, ContextError<TemplateIssue>>;

/// Parser over the text between the braces of one placeholder. Errors carry
/// only the reason; the caller knows where the placeholder starts.
type BodyResult<O> = ModalResult<O, ContextError<&'static str>>;

const INDEX_NOT_A_NUMBER: &str = "placeholder index is not a number";

fn segment(input: &mut Input<'_>) -> TemplateResult<Segment> {
    alt((
        "{{".value(Segment::Literal("{".to_string())),
        "}}".value(Segment::Literal("}".to_string())),
        placeholder,
        unmatched_close,
        take_while(1.., |c: char| c != '{' && c != '}')
            .map(|text: &str| Segment::Literal(text.to_string())),
    ))
    .parse_next(input)
}

/// Parses `{n}`, `{n,number[,pattern]}` or `{n,date,pattern}`.
///
/// Commits once the opening brace is seen.
fn placeholder(input: &mut Input<'_>) -> TemplateResult<Segment> {
    let offset = input.current_token_start();
    let opened: TemplateResult<(char, &str, Option<char>)> =
        ('{', take_till(0.., ['{', '}']), opt(alt(('{', '}')))).parse_next(input);
    let (_, mut body, close) = opened?;
    match close {
        Some('}') => {}
        Some(_) => return Err(fail_at(input, offset, "nested placeholder")),
        None => return Err(fail_at(input, offset, "unterminated placeholder")),
    }

    placeholder_body.parse_next(&mut body).map_err(|err| {
        let reason = match &err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next().copied(),
            ErrMode::Incomplete(_) => None,
        };
        fail_at(input, offset, reason.unwrap_or(INDEX_NOT_A_NUMBER))
    })
}

fn unmatched_close(input: &mut Input<'_>) -> TemplateResult<Segment> {
    let offset = input.current_token_start();
    let closed: TemplateResult<char> = '}'.parse_next(input);
    closed?;
    Err(fail_at(input, offset, "unmatched closing brace"))
}

fn placeholder_body(body: &mut &str) -> BodyResult<Segment> {
    let index: BodyResult<usize> = delimited(space0, digit1.parse_to::<usize>(), space0)
        .context(INDEX_NOT_A_NUMBER)
        .parse_next(body);
    let index = index?;

    let comma: BodyResult<Option<char>> = opt(',').parse_next(body);
    let style = match comma? {
        Some(_) => style.parse_next(body)?,
        None if body.is_empty() => PlaceholderStyle::Plain,
        None => return Err(reject(body, INDEX_NOT_A_NUMBER)),
    };
    Ok(Segment::Placeholder { index, style })
}

/// Parses the style name and the optional pattern after it. The pattern is
/// the rest of the body, commas included.
fn style(body: &mut &str) -> BodyResult<PlaceholderStyle> {
    let head: BodyResult<(&str, Option<char>)> = (take_till(0.., ','), opt(',')).parse_next(body);
    let (name, comma) = head?;
    let pattern = comma
        .map(|_| body.finish().trim())
        .filter(|pattern| !pattern.is_empty());

    match (name.trim(), pattern) {
        ("number", pattern) => Ok(PlaceholderStyle::Number(pattern.map(str::to_string))),
        ("date", Some(pattern)) => Ok(PlaceholderStyle::Date(pattern.to_string())),
        ("date", None) => Err(reject(body, "date placeholder needs a pattern")),
        _ => Err(reject(body, "unknown placeholder style")),
    }
}

fn fail_at(input: &Input<'_>, offset: usize, reason: &'static str) -> ErrMode<ContextError<TemplateIssue>> {
    ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        TemplateIssue { offset, reason },
    ))
}

fn reject(body: &&str, reason: &'static str) -> ErrMode<ContextError<&'static str>> {
    ErrMode::Cut(ContextError::new().add_context(body, &body.checkpoint(), reason))
}

fn template_error(err: ErrMode<ContextError<TemplateIssue>>, position: usize) -> FormatError {
    let issue = match &err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.context().next().copied(),
        ErrMode::Incomplete(_) => None,
    };
    let TemplateIssue { offset, reason } = issue.unwrap_or(TemplateIssue {
        offset: position,
        reason: "unexpected input",
    });
    FormatError::Template { offset, reason }
}

/// Appends a segment, joining adjacent literals.
fn push_segment(segments: &mut Vec<Segment>, segment: Segment) {
    if let (Some(Segment::Literal(last)), Segment::Literal(text)) = (segments.last_mut(), &segment) {
        last.push_str(text);
        return;
    }
    segments.push(segment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let template = TooltipTemplate::parse("{0}: {1}").expect("valid template");
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec![0, 1]);
        let text = template.render(|index, _| ["East", "10"][index].to_string());
        assert_eq!(text, "East: 10");
    }

    #[test]
    fn test_styles() {
        let template = TooltipTemplate::parse("{0,number,#,##0.00} on {1, date, %Y-%m} ({2,number})")
            .expect("valid template");
        let mut styles = Vec::new();
        template.render(|_, style| {
            styles.push(style.clone());
            String::new()
        });
        assert_eq!(
            styles,
            vec![
                PlaceholderStyle::Number(Some("#,##0.00".to_string())),
                PlaceholderStyle::Date("%Y-%m".to_string()),
                PlaceholderStyle::Number(None),
            ]
        );
    }

    #[test]
    fn test_escaped_braces() {
        let template = TooltipTemplate::parse("{{{0}}}").expect("valid template");
        assert_eq!(template.render(|_, _| "x".to_string()), "{x}");
    }

    #[test]
    fn test_errors() {
        let cases = [
            ("{0", "unterminated placeholder"),
            ("a}b", "unmatched closing brace"),
            ("{x}", "placeholder index is not a number"),
            ("{0,currency}", "unknown placeholder style"),
            ("{0,date}", "date placeholder needs a pattern"),
        ];
        for (source, expected) in cases {
            match TooltipTemplate::parse(source) {
                Err(FormatError::Template { reason, .. }) => assert_eq!(reason, expected, "{source}"),
                other => panic!("expected template error for `{source}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_error_offsets_are_byte_offsets() {
        let cases = [
            ("ab}c", 2),
            ("x {0,currency}", 2),
            ("{0}{", 3),
            ("é {x}", 3),
            ("{0} {1 {2}", 4),
        ];
        for (source, expected) in cases {
            match TooltipTemplate::parse(source) {
                Err(FormatError::Template { offset, .. }) => assert_eq!(offset, expected, "{source}"),
                other => panic!("expected template error for `{source}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_adjacent_literals_join() {
        let template = TooltipTemplate::parse("a{{b}}c {0}").expect("valid template");
        assert_eq!(template.segments[0], Segment::Literal("a{b}c ".to_string()));
        assert_eq!(template.placeholders().count(), 1);
    }

    #[test]
    fn test_pattern_keeps_commas_and_spaces() {
        let template = TooltipTemplate::parse("{ 2 , number , #,##0.0 }").expect("valid template");
        let mut seen = None;
        template.render(|index, style| {
            seen = Some((index, style.clone()));
            String::new()
        });
        assert_eq!(
            seen,
            Some((2, PlaceholderStyle::Number(Some("#,##0.0".to_string()))))
        );
    }
}
