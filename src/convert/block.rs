//! Block-level dispatch.

use super::{CodeJob, Conversion, ConversionStats, ConvertOptions, Transformer};
use crate::ast;
use crate::model::{
    CodeBlockId, CodeBlockNode, HeadingNode, HeadingTag, Node, ParagraphNode, RootNode, TextFormat,
};

impl<'a> Transformer<'a> {
    /// Create a transformer.
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            stats: ConversionStats::new(),
            jobs: Vec::new(),
        }
    }

    /// Convert a syntax tree.
    ///
    /// Never fails: unrecognized nodes and unsafe links are skipped and
    /// code blocks are left pending for [`Conversion::resolve`].
    pub fn transform(mut self, root: &ast::Root) -> Conversion {
        let mut children = Vec::with_capacity(root.children.len());
        for node in &root.children {
            if let Some(block) = self.block(node) {
                self.stats.add_block();
                children.push(block);
            }
        }

        Conversion {
            root: RootNode::new(children),
            jobs: self.jobs,
            stats: self.stats,
        }
    }

    fn block(&mut self, node: &ast::Node) -> Option<Node> {
        match node {
            ast::Node::Paragraph { children } => {
                let inline = self.format_inline(children);
                self.stats.add_paragraph();
                Some(Node::Paragraph(ParagraphNode::new(inline, 0)))
            }
            ast::Node::Heading { depth, children } => {
                let inline = self.format_inline(children);
                self.stats.add_heading();
                Some(Node::Heading(HeadingNode::new(
                    HeadingTag::from_depth(*depth),
                    inline,
                )))
            }
            ast::Node::Code { lang, value } => {
                Some(Node::CodeBlock(self.code_block(lang.as_deref(), value)))
            }
            ast::Node::List {
                ordered,
                start,
                children,
            } => Some(Node::List(self.list(*ordered, *start, children, 0))),
            ast::Node::Link {
                url,
                title,
                children,
            } => self.link(url, title.as_deref(), children, TextFormat::PLAIN, None),
            other => {
                log::debug!("Skipping top-level {} node", other.kind());
                self.stats.skip_block();
                None
            }
        }
    }

    fn code_block(&mut self, lang: Option<&str>, code: &str) -> CodeBlockNode {
        let language = lang
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.options.default_language.as_str())
            .to_string();

        let id = CodeBlockId(self.jobs.len());
        self.jobs.push(CodeJob::new(id, language.clone(), code));
        self.stats.add_code_block();
        CodeBlockNode::pending(id, language, code)
    }
}
