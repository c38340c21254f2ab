//! The syntax-tree abstraction the engine reads from.
//!
//! The engine never builds syntax trees of its own for real documents; the
//! host editor owns them. These traits describe the little it needs: the
//! leaf at an offset, its tag, its text and position, its parent, its
//! children by index and its language.
//! [`TokenTree`](crate::tree::TokenTree) is a reference implementation.

use std::borrow::Cow;

/// A node of a host syntax tree.
///
/// Elements are cheap handles: cloning one must not copy the subtree.
pub trait SyntaxElement: Clone {
    /// The host's type tag, such as `"LINE_COMMENT"` or `"XML_ATTRIBUTE"`.
    fn kind_tag(&self) -> &str;

    /// The text the element covers.
    fn text(&self) -> &str;

    /// Byte offset of the element's first character in the document.
    fn start_offset(&self) -> usize;

    /// Byte offset just past the element's last character.
    fn end_offset(&self) -> usize {
        self.start_offset() + self.text().len()
    }

    fn parent(&self) -> Option<Self>;

    /// The `index`-th direct child, counting leaves and composite nodes.
    fn child(&self, index: usize) -> Option<Self>;

    /// The id of the language the element belongs to.
    fn language(&self) -> &str;
}

/// The language an element is judged by.
///
/// Inside a markdown code fence this is the fence's info string, lowercased
/// (`kotlin` for a fence opened with ```` ```kotlin ````). The nearest
/// enclosing fence decides; a fence without an info string leaves the
/// element's own language in place.
pub fn effective_language<E: SyntaxElement>(element: &E) -> Cow<'_, str> {
    let mut current = element.parent();
    while let Some(node) = current {
        if node.kind_tag().ends_with("CODE_FENCE") {
            let info = node
                .child(1)
                .filter(|child| child.kind_tag().ends_with("FENCE_LANG"))
                .map(|child| child.text().trim().to_lowercase())
                .filter(|id| !id.is_empty());
            if let Some(id) = info {
                return Cow::Owned(id);
            }
            break;
        }
        current = node.parent();
    }
    Cow::Borrowed(element.language())
}

/// A document together with its syntax tree.
pub trait SyntaxTree {
    type Element<'a>: SyntaxElement
    where
        Self: 'a;

    /// The full document text. Offsets everywhere are bytes into it.
    fn text(&self) -> &str;

    /// The innermost element containing `offset`, if any.
    fn find_element_at(&self, offset: usize) -> Option<Self::Element<'_>>;
}
