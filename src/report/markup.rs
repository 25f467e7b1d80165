// Markup errors - error text carrying HTML-like tags, rendered through the
// host's decorator table

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::RenderableError;
use super::decorator::ErrorDecorator;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)([^>]*)>").expect("valid tag regex"));

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class\s*=\s*"([^"]*)""#).expect("valid class regex"));

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Element { tag: String, children: Vec<Node> },
}

/// An error whose text is marked up with decorator tags, for example
/// `<div class="message">Element not found</div>`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupError {
    markup: String,
}

impl MarkupError {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Render with `decorator`, leaving unknown tags undecorated.
    pub fn render(&self, decorator: &ErrorDecorator) -> String {
        parse(&self.markup)
            .iter()
            .map(|node| render_node(node, decorator))
            .collect()
    }
}

impl RenderableError for MarkupError {
    fn format_message(&self, decorator: &ErrorDecorator, _max_width: usize) -> String {
        self.render(decorator)
    }
}

fn parse(markup: &str) -> Vec<Node> {
    // Stack of open elements; the bottom entry collects top-level nodes.
    let mut stack: Vec<(String, Vec<Node>)> = vec![(String::new(), Vec::new())];
    let mut last = 0;

    for caps in TAG_RE.captures_iter(markup) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        push_text(&mut stack, &markup[last..whole.start]);
        last = whole.end;

        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();

        if closing {
            let Some(depth) = stack.iter().rposition(|(open, _)| tag_name(open) == name) else {
                continue;
            };
            while stack.len() > depth {
                close_top(&mut stack);
            }
        } else {
            let tag = match CLASS_RE.captures(&caps[3]) {
                Some(class) if !class[1].trim().is_empty() => {
                    format!("{} {}", name, class[1].trim())
                }
                _ => name,
            };
            stack.push((tag, Vec::new()));
        }
    }

    push_text(&mut stack, &markup[last..]);
    while stack.len() > 1 {
        close_top(&mut stack);
    }

    stack.pop().map(|(_, nodes)| nodes).unwrap_or_default()
}

fn tag_name(tag: &str) -> &str {
    tag.split(' ').next().unwrap_or_default()
}

fn push_text(stack: &mut [(String, Vec<Node>)], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some((_, children)) = stack.last_mut() {
        children.push(Node::Text(decode_entities(text)));
    }
}

fn close_top(stack: &mut Vec<(String, Vec<Node>)>) {
    if stack.len() < 2 {
        return;
    }
    if let Some((tag, children)) = stack.pop()
        && let Some((_, parent)) = stack.last_mut()
    {
        parent.push(Node::Element { tag, children });
    }
}

fn render_node(node: &Node, decorator: &ErrorDecorator) -> String {
    match node {
        Node::Text(text) => text.clone(),
        Node::Element { tag, children } => {
            let inner: String = children
                .iter()
                .map(|child| render_node(child, decorator))
                .collect();
            decorator.decorate(tag, &inner).unwrap_or_else(|| {
                warn!("Unknown decorator tag '{}', rendering it as plain text", tag);
                inner
            })
        }
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
