//! Per-request style capture and inlining.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::StreamExt;

use crate::engine::BodyStream;

/// Style rules registered during one render.
#[derive(Debug, Default)]
struct StyleRules {
    /// Label to full CSS rule.
    rules: HashMap<String, String>,
    /// Labels in registration order.
    order: Vec<String>,
}

/// Handle through which rendered components register their styles.
///
/// Cloning shares the same underlying rules.
#[derive(Debug, Clone)]
pub struct StyleScope {
    key: Arc<str>,
    inner: Arc<Mutex<StyleRules>>,
}

impl StyleScope {
    fn lock(&self) -> MutexGuard<'_, StyleRules> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The key prefixing every class name in this scope.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Class name for a label (e.g., `css-header`).
    pub fn class_name(&self, label: &str) -> String {
        format!("{}-{}", self.key, sanitize_label(label))
    }

    /// Register declarations for a label and return its class name.
    ///
    /// Registering a label again keeps the first declarations.
    pub fn insert(&self, label: &str, declarations: &str) -> String {
        let label = sanitize_label(label);
        let class = format!("{}-{}", self.key, label);
        let mut rules = self.lock();
        if !rules.rules.contains_key(&label) {
            rules
                .rules
                .insert(label.clone(), format!(".{}{{{}}}", class, declarations.trim()));
            rules.order.push(label);
        }
        class
    }

    /// Full CSS rule registered for a label.
    pub fn rule(&self, label: &str) -> Option<String> {
        self.lock().rules.get(label).cloned()
    }

    /// Labels in registration order.
    pub fn labels(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Whether no rules have been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every registered rule as one stylesheet, in registration order.
    pub fn stylesheet(&self) -> String {
        let rules = self.lock();
        rules
            .order
            .iter()
            .filter_map(|label| rules.rules.get(label))
            .map(String::as_str)
            .collect()
    }
}

/// Key-scoped style cache created fresh for every request.
#[derive(Debug)]
pub struct StyleCache {
    scope: StyleScope,
}

impl StyleCache {
    /// Create an empty cache for the given key.
    pub fn new(key: &str) -> Self {
        Self {
            scope: StyleScope {
                key: Arc::from(key),
                inner: Arc::new(Mutex::new(StyleRules::default())),
            },
        }
    }

    /// The cache key.
    pub fn key(&self) -> &str {
        self.scope.key()
    }

    /// A handle for the rendering engine.
    pub fn scope(&self) -> StyleScope {
        self.scope.clone()
    }
}

/// Stage that merges captured styles into the rendered output.
pub trait StyleExtractor: Send + Sync {
    /// Wrap the raw body in a style-augmented body.
    fn extract(&self, cache: &StyleCache, body: BodyStream) -> BodyStream;
}

/// Inlines each rule in a `<style>` tag right before the first element
/// whose `class` attribute references it. Every rule is inlined at most once.
///
/// Rules referenced by `<html>`, `<head>` or `<body>` go inside `<head>`
/// when it opens in the same chunk, otherwise right after the element's
/// start tag, so nothing is ever written ahead of the doctype. Chunks that
/// are not valid UTF-8 pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStyles;

impl StyleExtractor for InlineStyles {
    fn extract(&self, cache: &StyleCache, body: BodyStream) -> BodyStream {
        let scope = cache.scope();
        let mut emitted = HashSet::new();
        Box::pin(body.map(move |chunk| inline_chunk(&scope, &mut emitted, chunk)))
    }
}

/// Passes the body through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyles;

impl StyleExtractor for NoStyles {
    fn extract(&self, _cache: &StyleCache, body: BodyStream) -> BodyStream {
        body
    }
}

fn inline_chunk(scope: &StyleScope, emitted: &mut HashSet<String>, chunk: Vec<u8>) -> Vec<u8> {
    let text = match std::str::from_utf8(&chunk) {
        Ok(text) => text,
        Err(_) => return chunk,
    };

    let tags = start_tags(text);
    let head_end = tags.iter().find(|tag| tag.name == "head").map(|tag| tag.end);

    // Insertion offset to labels, in document order.
    let mut inserts: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for tag in &tags {
        let classes = match class_attribute(&text[tag.start..tag.end]) {
            Some(classes) => classes,
            None => continue,
        };

        let offset = match tag.name.as_str() {
            "html" | "head" | "body" => head_end.unwrap_or(tag.end),
            _ => tag.start,
        };

        for label in class_labels(classes, scope.key()) {
            if emitted.contains(label) || scope.rule(label).is_none() {
                continue;
            }
            emitted.insert(label.to_string());
            inserts.entry(offset).or_default().push(label.to_string());
        }
    }

    if inserts.is_empty() {
        return chunk;
    }

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (offset, labels) in inserts {
        out.push_str(&text[copied..offset]);
        out.push_str(&style_tag(scope, &labels));
        copied = offset;
    }
    out.push_str(&text[copied..]);
    out.into_bytes()
}

fn style_tag(scope: &StyleScope, labels: &[String]) -> String {
    let css: String = labels.iter().filter_map(|label| scope.rule(label)).collect();
    format!(
        r#"<style data-style="{} {}">{}</style>"#,
        scope.key(),
        labels.join(" "),
        css
    )
}

/// A start tag found in a chunk.
#[derive(Debug)]
struct StartTag {
    /// Lowercased element name.
    name: String,
    /// Offset of the opening `<`.
    start: usize,
    /// Offset just past the closing `>`.
    end: usize,
}

/// Complete start tags in `text`. A tag cut off by the chunk end is skipped.
fn start_tags(text: &str) -> Vec<StartTag> {
    let mut tags = Vec::new();
    let mut from = 0;

    while let Some(pos) = text[from..].find('<') {
        let start = from + pos;
        from = start + 1;

        let rest = &text[from..];
        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        let end = match rest.find('>') {
            Some(close) => from + close + 1,
            None => break,
        };

        tags.push(StartTag {
            name: rest[..name_len].to_ascii_lowercase(),
            start,
            end,
        });
        from = end;
    }

    tags
}

/// Value of the `class` attribute in a start tag.
fn class_attribute(tag: &str) -> Option<&str> {
    let mut from = 0;

    while let Some(pos) = tag[from..].find("class=") {
        let at = from + pos;
        from = at + "class=".len();
        if !tag[..at].ends_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }

        let rest = &tag[from..];
        return match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let value = &rest[1..];
                value.find(quote).map(|close| &value[..close])
            }
            Some(_) => rest
                .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                .map(|close| &rest[..close]),
            None => None,
        };
    }

    None
}

/// Labels of the `{key}-{label}` class names in a class list.
fn class_labels<'a>(classes: &'a str, key: &str) -> Vec<&'a str> {
    let prefix = format!("{}-", key);
    classes
        .split_ascii_whitespace()
        .filter_map(|class| class.strip_prefix(prefix.as_str()))
        .filter(|label| !label.is_empty() && label.chars().all(is_label_char))
        .collect()
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn sanitize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| {
            if is_label_char(c) {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
