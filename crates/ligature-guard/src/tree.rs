//! A small reference syntax tree.
//!
//! [`TokenTree`] covers a document with a flat run of tokens under a `FILE`
//! root, plus tag, attribute and text nodes for markup languages and code
//! fence nodes for markdown. It is what
//! the command-line tool scans with, and what tests build by hand through
//! [`TreeBuilder`] when they need a particular shape.

mod lexer;

use std::{borrow::Cow, ops::Range};

use log::debug;

use crate::element::{SyntaxElement, SyntaxTree};

pub use lexer::kind;

#[derive(Debug, Clone)]
struct Node {
    kind: Cow<'static, str>,
    range: Range<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// An immutable tree over one document.
#[derive(Debug, Clone)]
pub struct TokenTree {
    text: String,
    language: String,
    nodes: Vec<Node>,
    /// Leaf node indices, ordered by start offset.
    leaves: Vec<usize>,
}

impl TokenTree {
    /// Tokenizes `text` as `language`.
    pub fn parse(text: impl Into<String>, language: impl Into<String>) -> Self {
        let text = text.into();
        let language = language.into();
        let events = lexer::tokenize(&text, &language);

        let mut builder = TreeBuilder::new(text, language);
        for event in events {
            match event {
                lexer::Event::Open(kind, start) => builder.start_node(kind, start),
                lexer::Event::Close(end) => builder.finish_node(end),
                lexer::Event::Token(kind, range) => builder.token(kind, range),
            }
        }
        let tree = builder.finish();
        debug!(
            language = tree.language.as_str(),
            nodes = tree.nodes.len(),
            leaves = tree.leaves.len();
            "Token tree built"
        );
        tree
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Leaf elements in document order.
    pub fn leaves(&self) -> impl Iterator<Item = TokenElement<'_>> {
        self.leaves.iter().map(|&index| TokenElement { tree: self, index })
    }
}

impl SyntaxTree for TokenTree {
    type Element<'a> = TokenElement<'a>;

    fn text(&self) -> &str {
        &self.text
    }

    fn find_element_at(&self, offset: usize) -> Option<TokenElement<'_>> {
        let after = self
            .leaves
            .partition_point(|&index| self.nodes[index].range.start <= offset);
        let index = *self.leaves.get(after.checked_sub(1)?)?;
        self.nodes[index]
            .range
            .contains(&offset)
            .then_some(TokenElement { tree: self, index })
    }
}

/// A handle to one node of a [`TokenTree`].
#[derive(Debug, Clone, Copy)]
pub struct TokenElement<'t> {
    tree: &'t TokenTree,
    index: usize,
}

impl SyntaxElement for TokenElement<'_> {
    fn kind_tag(&self) -> &str {
        &self.tree.nodes[self.index].kind
    }

    fn text(&self) -> &str {
        &self.tree.text[self.tree.nodes[self.index].range.clone()]
    }

    fn start_offset(&self) -> usize {
        self.tree.nodes[self.index].range.start
    }

    fn end_offset(&self) -> usize {
        self.tree.nodes[self.index].range.end
    }

    fn parent(&self) -> Option<Self> {
        self.tree.nodes[self.index]
            .parent
            .map(|index| TokenElement { tree: self.tree, index })
    }

    fn child(&self, index: usize) -> Option<Self> {
        self.tree.nodes[self.index]
            .children
            .get(index)
            .map(|&index| TokenElement { tree: self.tree, index })
    }

    fn language(&self) -> &str {
        &self.tree.language
    }
}

/// Builds a [`TokenTree`] node by node.
///
/// The `FILE` root spanning the whole text is open from the start. Tokens
/// must be added in document order and must not overlap.
#[derive(Debug)]
pub struct TreeBuilder {
    text: String,
    language: String,
    nodes: Vec<Node>,
    leaves: Vec<usize>,
    open: Vec<usize>,
}

impl TreeBuilder {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        let text = text.into();
        let root = Node {
            kind: Cow::Borrowed(kind::FILE),
            range: 0..text.len(),
            parent: None,
            children: Vec::new(),
        };
        Self {
            text,
            language: language.into(),
            nodes: vec![root],
            leaves: Vec::new(),
            open: vec![0],
        }
    }

    /// Opens a composite node starting at `start`.
    pub fn start_node(&mut self, kind: impl Into<Cow<'static, str>>, start: usize) {
        let index = self.push(kind.into(), start..start);
        self.open.push(index);
    }

    /// Closes the innermost open composite node at `end`.
    ///
    /// The root cannot be closed this way.
    pub fn finish_node(&mut self, end: usize) {
        if self.open.len() <= 1 {
            return;
        }
        if let Some(index) = self.open.pop() {
            self.nodes[index].range.end = end;
        }
    }

    /// Adds a leaf token under the innermost open node.
    pub fn token(&mut self, kind: impl Into<Cow<'static, str>>, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let index = self.push(kind.into(), range);
        self.leaves.push(index);
    }

    /// Closes any nodes left open at the end of the text.
    pub fn finish(mut self) -> TokenTree {
        let end = self.text.len();
        while self.open.len() > 1 {
            self.finish_node(end);
        }
        TokenTree {
            text: self.text,
            language: self.language,
            nodes: self.nodes,
            leaves: self.leaves,
        }
    }

    fn push(&mut self, kind: Cow<'static, str>, range: Range<usize>) -> usize {
        let parent = self.open.last().copied();
        let index = self.nodes.len();
        self.nodes.push(Node {
            kind,
            range,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        index
    }
}
