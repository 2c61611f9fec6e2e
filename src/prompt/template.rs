//! Template engine for prompt rendering.
//!
//! A deliberately small interpreter over a fixed grammar:
//!
//! - `{{name}}` - Substitutes the value of `name` (dotted paths like
//!   `{{file.path}}` walk into maps)
//! - `{{this}}` - The current element inside `{{#each}}`
//! - `{{#each list}}...{{/each}}` - Renders the block once per element;
//!   the element's fields shadow outer variables
//! - `{{#if cond}}...{{/if}}` - Renders the block when `cond` is truthy
//!   (non-empty text, `true`, non-empty list, any map)
//!
//! Output is plain text: nothing is escaped, and substituted values are never
//! re-read as template syntax. Unknown variables render as the empty string.
//! A block tag alone on its line consumes that whole line, so templates can
//! put `{{#each}}` on its own line without leaving blank lines behind.
//!
//! # Error Handling
//!
//! Rendering never fails. Structural problems (an unclosed `{{`, an empty
//! tag, an unknown `#helper`, mismatched or unclosed blocks) are reported
//! once, when the template is parsed.

use std::collections::BTreeMap;
use std::fmt;

/// Error type for template parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` without a matching `}}`.
    UnmatchedBrace {
        /// Byte offset of the unmatched `{{`.
        position: usize,
    },
    /// A tag with nothing inside (e.g., `{{ }}`).
    EmptyTag {
        /// Byte offset of the tag.
        position: usize,
    },
    /// A block helper other than `each` or `if`.
    UnknownHelper {
        /// The helper name.
        name: String,
        /// Byte offset of the tag.
        position: usize,
    },
    /// `{{#each}}` or `{{#if}}` without a variable.
    MissingArgument {
        /// The helper name.
        helper: String,
        /// Byte offset of the tag.
        position: usize,
    },
    /// A closing tag that does not match the innermost open block.
    UnexpectedClose {
        /// The closing tag's helper name.
        name: String,
        /// Byte offset of the tag.
        position: usize,
    },
    /// A block still open at the end of the template.
    UnclosedBlock {
        /// The helper name.
        name: String,
        /// Byte offset of the opening tag.
        position: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnmatchedBrace { position } => {
                write!(f, "unmatched '{{{{' at position {} in template", position)
            }
            TemplateError::EmptyTag { position } => {
                write!(f, "empty tag at position {} in template", position)
            }
            TemplateError::UnknownHelper { name, position } => {
                write!(
                    f,
                    "unknown block helper '#{}' at position {} in template",
                    name, position
                )
            }
            TemplateError::MissingArgument { helper, position } => {
                write!(
                    f,
                    "'#{}' needs a variable name at position {} in template",
                    helper, position
                )
            }
            TemplateError::UnexpectedClose { name, position } => {
                write!(
                    f,
                    "unexpected closing tag '/{}' at position {} in template",
                    name, position
                )
            }
            TemplateError::UnclosedBlock { name, position } => {
                write!(
                    f,
                    "block '#{}' opened at position {} is never closed",
                    name, position
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// A value available to templates.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text.
    Text(String),
    /// A flag.
    Bool(bool),
    /// A sequence, iterated with `{{#each}}`.
    List(Vec<Value>),
    /// Named fields.
    Map(Context),
}

impl Value {
    /// Truthiness used by `{{#if}}`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Text(text) => !text.is_empty(),
            Value::Bool(flag) => *flag,
            Value::List(items) => !items.is_empty(),
            Value::Map(_) => true,
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Value::Text(text) => out.push_str(text),
            Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_to(out);
                }
            }
            Value::Map(_) => {}
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Context> for Value {
    fn from(value: Context) -> Self {
        Value::Map(value)
    }
}

/// Named template variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Helper {
    Each,
    If,
}

impl Helper {
    fn name(self) -> &'static str {
        match self {
            Helper::Each => "each",
            Helper::If => "if",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Block {
        helper: Helper,
        name: String,
        body: Vec<Node>,
    },
}

#[derive(Debug, Clone)]
enum Token {
    Text(String),
    Var(String),
    Open {
        helper: Helper,
        name: String,
        position: usize,
    },
    Close {
        name: String,
        position: usize,
    },
}

impl Token {
    fn is_block_tag(&self) -> bool {
        matches!(self, Token::Open { .. } | Token::Close { .. })
    }
}

/// A parsed template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut tokens = tokenize(source)?;
        strip_standalone_lines(&mut tokens);
        let nodes = build_tree(tokens)?;
        Ok(Self { nodes })
    }

    /// Render with `context`. Unknown variables become empty strings.
    pub fn render(&self, context: &Context) -> String {
        let mut out = String::new();
        let mut scopes = vec![Scope::Root(context)];
        render_nodes(&self.nodes, &mut scopes, &mut out);
        out
    }
}

/// Parse and render in one step.
///
/// # Examples
///
/// ```ignore
/// let ctx = Context::new()
///     .with("branch", "main")
///     .with("files", vec![Value::from(Context::new().with("path", "a.rs"))]);
/// let out = render("{{branch}}:{{#each files}} {{path}}{{/each}}", &ctx).unwrap();
/// assert_eq!(out, "main: a.rs");
/// ```
pub fn render(template: &str, context: &Context) -> Result<String, TemplateError> {
    Ok(Template::parse(template)?.render(context))
}

fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            tokens.push(Token::Text(rest[..start].to_string()));
        }
        let position = offset + start;
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::UnmatchedBrace { position })?;

        tokens.push(parse_tag(after_open[..end].trim(), position)?);

        let consumed = start + 2 + end + 2;
        rest = &rest[consumed..];
        offset += consumed;
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest.to_string()));
    }

    Ok(tokens)
}

fn parse_tag(tag: &str, position: usize) -> Result<Token, TemplateError> {
    if tag.is_empty() {
        return Err(TemplateError::EmptyTag { position });
    }

    if let Some(open) = tag.strip_prefix('#') {
        let mut parts = open.split_whitespace();
        let helper_name = parts.next().unwrap_or_default();
        let helper = match helper_name {
            "each" => Helper::Each,
            "if" => Helper::If,
            other => {
                return Err(TemplateError::UnknownHelper {
                    name: other.to_string(),
                    position,
                });
            }
        };
        let name = parts.next().ok_or_else(|| TemplateError::MissingArgument {
            helper: helper.name().to_string(),
            position,
        })?;
        return Ok(Token::Open {
            helper,
            name: name.to_string(),
            position,
        });
    }

    if let Some(close) = tag.strip_prefix('/') {
        return Ok(Token::Close {
            name: close.trim().to_string(),
            position,
        });
    }

    Ok(Token::Var(tag.to_string()))
}

/// Remove the indentation and line break around block tags that sit alone
/// on their line. Standalone-ness is decided on the original text before
/// anything is removed.
fn strip_standalone_lines(tokens: &mut [Token]) {
    let standalone: Vec<usize> = (0..tokens.len())
        .filter(|&i| tokens[i].is_block_tag() && is_standalone(tokens, i))
        .collect();

    for i in standalone {
        if i > 0
            && let Token::Text(text) = &mut tokens[i - 1]
        {
            let keep = text.rfind('\n').map_or(0, |pos| pos + 1);
            text.truncate(keep);
        }
        if let Some(Token::Text(text)) = tokens.get_mut(i + 1) {
            match text.find('\n') {
                Some(pos) => text.replace_range(..=pos, ""),
                None => text.clear(),
            }
        }
    }
}

fn is_standalone(tokens: &[Token], i: usize) -> bool {
    let before = match i.checked_sub(1) {
        None => true,
        Some(prev) => match &tokens[prev] {
            Token::Text(text) => match text.rfind('\n') {
                Some(pos) => is_blank(&text[pos + 1..]),
                None => prev == 0 && is_blank(text),
            },
            _ => false,
        },
    };

    let after = match tokens.get(i + 1) {
        None => true,
        Some(Token::Text(text)) => match text.find('\n') {
            Some(pos) => is_blank(&text[..pos]),
            None => i + 2 == tokens.len() && is_blank(text),
        },
        Some(_) => false,
    };

    before && after
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

fn build_tree(tokens: Vec<Token>) -> Result<Vec<Node>, TemplateError> {
    // Each frame: (helper, name, position, collected children).
    let mut stack: Vec<(Helper, String, usize, Vec<Node>)> = Vec::new();
    let mut root: Vec<Node> = Vec::new();

    for token in tokens {
        let node = match token {
            Token::Text(text) if text.is_empty() => continue,
            Token::Text(text) => Node::Text(text),
            Token::Var(name) => Node::Var(name),
            Token::Open {
                helper,
                name,
                position,
            } => {
                stack.push((helper, name, position, Vec::new()));
                continue;
            }
            Token::Close { name, position } => match stack.pop() {
                Some((helper, var, _, body)) if helper.name() == name => Node::Block {
                    helper,
                    name: var,
                    body,
                },
                _ => return Err(TemplateError::UnexpectedClose { name, position }),
            },
        };

        match stack.last_mut() {
            Some((_, _, _, children)) => children.push(node),
            None => root.push(node),
        }
    }

    if let Some((helper, _, position, _)) = stack.pop() {
        return Err(TemplateError::UnclosedBlock {
            name: helper.name().to_string(),
            position,
        });
    }

    Ok(root)
}

enum Scope<'a> {
    Root(&'a Context),
    Item(&'a Value),
}

fn lookup<'a>(scopes: &[Scope<'a>], path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let head = segments.next()?;

    let mut value = if head == "this" {
        match scopes.last()? {
            Scope::Item(item) => *item,
            Scope::Root(_) => return None,
        }
    } else {
        scopes.iter().rev().find_map(|scope| match scope {
            Scope::Root(context) => context.get(head),
            Scope::Item(Value::Map(fields)) => fields.get(head),
            Scope::Item(_) => None,
        })?
    };

    for segment in segments {
        value = match value {
            Value::Map(fields) => fields.get(segment)?,
            _ => return None,
        };
    }

    Some(value)
}

fn render_nodes<'a>(nodes: &'a [Node], scopes: &mut Vec<Scope<'a>>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => {
                if let Some(value) = lookup(scopes, name) {
                    value.write_to(out);
                }
            }
            Node::Block {
                helper: Helper::If,
                name,
                body,
            } => {
                if lookup(scopes, name).is_some_and(Value::is_truthy) {
                    render_nodes(body, scopes, out);
                }
            }
            Node::Block {
                helper: Helper::Each,
                name,
                body,
            } => {
                if let Some(Value::List(items)) = lookup(scopes, name) {
                    for item in items {
                        scopes.push(Scope::Item(item));
                        render_nodes(body, scopes, out);
                        scopes.pop();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, diff: &str) -> Value {
        Context::new().with("path", path).with("diff", diff).into()
    }

    #[test]
    fn test_simple_substitution() {
        let ctx = Context::new().with("name", "Alice").with("greeting", "Hello");
        assert_eq!(render("{{greeting}}, {{name}}!", &ctx).unwrap(), "Hello, Alice!");
    }

    #[test]
    fn test_whitespace_inside_tags() {
        let ctx = Context::new().with("name", "Alice");
        assert_eq!(render("Hi {{ name }}", &ctx).unwrap(), "Hi Alice");
    }

    #[test]
    fn test_unknown_variable_renders_empty() {
        assert_eq!(render("a{{missing}}b", &Context::new()).unwrap(), "ab");
    }

    #[test]
    fn test_single_braces_are_literal() {
        let tpl = "{\n  \"summary\": \"string\"\n}";
        assert_eq!(render(tpl, &Context::new()).unwrap(), tpl);
    }

    #[test]
    fn test_values_are_not_escaped_or_reinterpreted() {
        let ctx = Context::new()
            .with("code", "<b>&\"{{name}}\"</b>")
            .with("name", "nope");
        assert_eq!(render("{{code}}", &ctx).unwrap(), "<b>&\"{{name}}\"</b>");
    }

    #[test]
    fn test_each_exposes_element_fields() {
        let ctx = Context::new().with(
            "files",
            vec![file("a.rs", "+a"), file("b.rs", "+b")],
        );
        let out = render("{{#each files}}[{{path}}:{{diff}}]{{/each}}", &ctx).unwrap();
        assert_eq!(out, "[a.rs:+a][b.rs:+b]");
    }

    #[test]
    fn test_each_element_fields_shadow_outer_variables() {
        let ctx = Context::new()
            .with("path", "outer")
            .with("branch", "main")
            .with("files", vec![file("inner", "")]);
        let out = render("{{#each files}}{{path}}@{{branch}}{{/each}} {{path}}", &ctx).unwrap();
        assert_eq!(out, "inner@main outer");
    }

    #[test]
    fn test_each_over_text_items_with_this() {
        let ctx = Context::new().with("labels", vec![Value::from("api"), Value::from("db")]);
        let out = render("{{#each labels}}- {{this}}\n{{/each}}", &ctx).unwrap();
        assert_eq!(out, "- api\n- db\n");
    }

    #[test]
    fn test_each_over_missing_or_empty_list_renders_nothing() {
        let ctx = Context::new().with("files", Vec::<Value>::new());
        assert_eq!(render("x{{#each files}}y{{/each}}z", &ctx).unwrap(), "xz");
        assert_eq!(render("x{{#each nope}}y{{/each}}z", &ctx).unwrap(), "xz");
    }

    #[test]
    fn test_if_truthiness() {
        let tpl = "{{#if v}}yes{{/if}}";
        let cases = [
            (Value::from(""), ""),
            (Value::from("text"), "yes"),
            (Value::from(false), ""),
            (Value::from(true), "yes"),
            (Value::List(Vec::new()), ""),
            (Value::List(vec![Value::from("x")]), "yes"),
            (Value::Map(Context::new()), "yes"),
        ];
        for (value, expected) in cases {
            let ctx = Context::new().with("v", value.clone());
            assert_eq!(render(tpl, &ctx).unwrap(), expected, "value {:?}", value);
        }
        assert_eq!(render(tpl, &Context::new()).unwrap(), "");
    }

    #[test]
    fn test_nested_blocks() {
        let ctx = Context::new().with(
            "files",
            vec![file("a.rs", "+a"), file("b.rs", "")],
        );
        let out = render(
            "{{#each files}}{{path}}{{#if diff}}={{diff}}{{/if}};{{/each}}",
            &ctx,
        )
        .unwrap();
        assert_eq!(out, "a.rs=+a;b.rs;");
    }

    #[test]
    fn test_dotted_paths() {
        let ctx = Context::new().with("task", Context::new().with("summary", "Fix login"));
        assert_eq!(render("{{task.summary}}", &ctx).unwrap(), "Fix login");
        assert_eq!(render("{{task.missing.deeper}}", &ctx).unwrap(), "");
    }

    #[test]
    fn test_standalone_block_lines_are_removed() {
        let tpl = "Changes:\n{{#each files}}\n---\nFile: {{path}}\n{{/each}}\nEnd\n";
        let ctx = Context::new().with("files", vec![file("a.rs", ""), file("b.rs", "")]);
        assert_eq!(
            render(tpl, &ctx).unwrap(),
            "Changes:\n---\nFile: a.rs\n---\nFile: b.rs\nEnd\n"
        );
    }

    #[test]
    fn test_indented_standalone_tags_and_adjacent_blocks() {
        let tpl = "A\n  {{#if x}}\n  x\n  {{/if}}\n{{#if y}}\ny\n{{/if}}\nB";
        let ctx = Context::new().with("x", "1").with("y", "1");
        assert_eq!(render(tpl, &ctx).unwrap(), "A\n  x\ny\nB");

        let ctx = Context::new();
        assert_eq!(render(tpl, &ctx).unwrap(), "A\nB");
    }

    #[test]
    fn test_inline_block_keeps_surrounding_text() {
        let ctx = Context::new().with("x", "1");
        assert_eq!(render("a {{#if x}}b{{/if}} c\n", &ctx).unwrap(), "a b c\n");
    }

    #[test]
    fn test_unmatched_brace_error() {
        let err = render("Hello {{name", &Context::new()).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 6 });
    }

    #[test]
    fn test_empty_tag_error() {
        let err = render("Hello {{  }}", &Context::new()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyTag { position: 6 });
    }

    #[test]
    fn test_unknown_helper_error() {
        let err = render("{{#with task}}{{/with}}", &Context::new()).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownHelper { ref name, .. } if name == "with"));
    }

    #[test]
    fn test_missing_argument_error() {
        let err = render("{{#each}}{{/each}}", &Context::new()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingArgument { ref helper, .. } if helper == "each"));
    }

    #[test]
    fn test_mismatched_close_error() {
        let err = render("{{#each files}}{{/if}}", &Context::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnexpectedClose {
                name: "if".to_string(),
                position: 15
            }
        );
    }

    #[test]
    fn test_unclosed_block_error() {
        let err = render("x {{#if a}}y", &Context::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnclosedBlock {
                name: "if".to_string(),
                position: 2
            }
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TemplateError::UnmatchedBrace { position: 5 }.to_string(),
            "unmatched '{{' at position 5 in template"
        );
        assert_eq!(
            TemplateError::UnclosedBlock {
                name: "each".to_string(),
                position: 3
            }
            .to_string(),
            "block '#each' opened at position 3 is never closed"
        );
    }

    #[test]
    fn test_unicode_in_template_and_values() {
        let ctx = Context::new().with("emoji", "🎉").with("text", "日本語");
        assert_eq!(render("Hello {{emoji}} {{text}}!", &ctx).unwrap(), "Hello 🎉 日本語!");
    }
}
