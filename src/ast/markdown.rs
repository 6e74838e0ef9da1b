//! Markdown front end built on pulldown-cmark.
//!
//! pulldown-cmark emits a flat event stream; this module folds it back into
//! the mdast-shaped tree the pipeline consumes.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use super::{Node, Root};

/// Parse Markdown text into a syntax tree.
pub fn parse_markdown(markdown: &str) -> Root {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.process(event);
    }
    builder.finish()
}

#[derive(Debug)]
enum FrameKind {
    Paragraph,
    Heading(u8),
    CodeBlock(Option<String>),
    List { ordered: bool, start: Option<u32> },
    Item { checked: Option<bool> },
    Strong,
    Emphasis,
    Link { url: String, title: Option<String> },
    Blockquote,
    // Strikethrough and image alt text: content joins the enclosing run
    Unwrap,
    // Tables, metadata and anything else without a counterpart
    Other,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
    code: String,
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    frames: Vec<Frame>,
}

impl TreeBuilder {
    fn process(&mut self, event: Event) {
        match event {
            Event::Start(tag) => {
                let kind = frame_kind(tag);
                self.frames.push(Frame {
                    kind,
                    children: Vec::new(),
                    code: String::new(),
                });
            }
            Event::End(_) => {
                if let Some(frame) = self.frames.pop() {
                    self.close(frame);
                }
            }
            Event::Text(text) => {
                if let Some(Frame {
                    kind: FrameKind::CodeBlock(_),
                    code,
                    ..
                }) = self.frames.last_mut()
                {
                    code.push_str(&text);
                } else {
                    push_text(self.children(), &text);
                }
            }
            Event::SoftBreak => push_text(self.children(), "\n"),
            Event::HardBreak => self.children().push(Node::Break),
            Event::Code(code) => self.children().push(Node::InlineCode {
                value: code.into_string(),
            }),
            Event::Html(html) | Event::InlineHtml(html) => self.children().push(Node::Html {
                value: html.into_string(),
            }),
            Event::Rule => self.children().push(Node::ThematicBreak),
            Event::TaskListMarker(done) => {
                let item = self.frames.iter_mut().rev().find_map(|f| match &mut f.kind {
                    FrameKind::Item { checked } => Some(checked),
                    _ => None,
                });
                if let Some(checked) = item {
                    *checked = Some(done);
                }
            }
            _ => {}
        }
    }

    fn children(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn close(&mut self, frame: Frame) {
        if let FrameKind::Unwrap = frame.kind {
            let parent = self.children();
            for child in frame.children {
                match child {
                    Node::Text { value } => push_text(parent, &value),
                    other => parent.push(other),
                }
            }
        } else {
            let node = build_node(frame);
            self.children().push(node);
        }
    }

    fn finish(mut self) -> Root {
        // Unbalanced streams should not happen, but never lose content
        while let Some(frame) = self.frames.pop() {
            self.close(frame);
        }
        Root::new(self.root)
    }
}

fn frame_kind(tag: Tag) -> FrameKind {
    match tag {
        Tag::Paragraph => FrameKind::Paragraph,
        Tag::Heading { level, .. } => FrameKind::Heading(heading_level_to_u8(level)),
        Tag::CodeBlock(kind) => FrameKind::CodeBlock(match kind {
            CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
            CodeBlockKind::Indented => None,
        }),
        Tag::List(start) => FrameKind::List {
            ordered: start.is_some(),
            start: start.map(|n| n.min(u32::MAX as u64) as u32),
        },
        Tag::Item => FrameKind::Item { checked: None },
        Tag::Strong => FrameKind::Strong,
        Tag::Emphasis => FrameKind::Emphasis,
        Tag::Link {
            dest_url, title, ..
        } => FrameKind::Link {
            url: dest_url.into_string(),
            title: if title.is_empty() {
                None
            } else {
                Some(title.into_string())
            },
        },
        Tag::BlockQuote(_) => FrameKind::Blockquote,
        Tag::Strikethrough | Tag::Image { .. } => FrameKind::Unwrap,
        _ => FrameKind::Other,
    }
}

fn build_node(frame: Frame) -> Node {
    let children = frame.children;
    match frame.kind {
        FrameKind::Paragraph => Node::Paragraph { children },
        FrameKind::Heading(depth) => Node::Heading { depth, children },
        FrameKind::CodeBlock(lang) => {
            let mut value = frame.code;
            if value.ends_with('\n') {
                value.pop();
            }
            Node::Code { lang, value }
        }
        FrameKind::List { ordered, start } => Node::List {
            ordered,
            start,
            children,
        },
        FrameKind::Item { checked } => Node::ListItem {
            checked,
            children: wrap_inline_runs(children),
        },
        FrameKind::Strong => Node::Strong { children },
        FrameKind::Emphasis => Node::Emphasis { children },
        FrameKind::Link { url, title } => Node::Link {
            url,
            title,
            children,
        },
        FrameKind::Blockquote => Node::Blockquote {
            children: wrap_inline_runs(children),
        },
        FrameKind::Unwrap | FrameKind::Other => Node::Unknown,
    }
}

/// Append text, merging with a preceding text node.
fn push_text(children: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text { value }) = children.last_mut() {
        value.push_str(text);
    } else {
        children.push(Node::text(text));
    }
}

/// Tight list items carry inline content directly; give each inline run a
/// paragraph so items always hold block content.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut blocks = Vec::with_capacity(children.len());
    let mut run = Vec::new();

    for child in children {
        if child.is_inline() {
            run.push(child);
        } else {
            if !run.is_empty() {
                blocks.push(Node::Paragraph {
                    children: std::mem::take(&mut run),
                });
            }
            blocks.push(child);
        }
    }
    if !run.is_empty() {
        blocks.push(Node::Paragraph { children: run });
    }
    blocks
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
