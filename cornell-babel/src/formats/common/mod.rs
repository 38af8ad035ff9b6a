//! DOM helpers shared by the HTML and PDF serializers
//!
//! Both formats build an `RcDom` fragment for the document body and serialize it with html5ever,
//! so text content is always escaped by the serializer and only elements created here end up as
//! markup.

use crate::error::FormatError;
use crate::inline::{parse_inline, MathLedger};
use crate::ir::nodes::InlineContent;
use crate::math::MathSpan;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Create an HTML element with attributes
pub(crate) fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub(crate) fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Append `child` to `parent` and return the child.
pub(crate) fn append(parent: &Handle, child: Handle) -> Handle {
    parent.children.borrow_mut().push(child.clone());
    child
}

/// Element with a single text child.
pub(crate) fn text_element(tag: &str, attrs: Vec<(&str, &str)>, text: &str) -> Handle {
    let element = create_element(tag, attrs);
    append(&element, create_text(text));
    element
}

/// Renders shielded text as inline nodes under `parent`.
///
/// Bold and code become `<strong>` and `<code>` (with `code_class`, if any). Each math span is
/// handed to `math`, which appends whatever the format wants for it.
pub(crate) fn append_inline(
    parent: &Handle,
    shielded: &str,
    ledger: &mut MathLedger<'_>,
    style: &InlineStyle<'_>,
) {
    for node in parse_inline(shielded, ledger) {
        append_inline_node(parent, &node, style);
    }
}

/// How inline nodes are decorated by one format.
pub(crate) struct InlineStyle<'a> {
    pub code_class: Option<&'a str>,
    pub math: &'a dyn Fn(&Handle, &MathSpan),
}

fn append_inline_node(parent: &Handle, node: &InlineContent, style: &InlineStyle<'_>) {
    match node {
        InlineContent::Text(text) => {
            append(parent, create_text(text));
        }
        InlineContent::Bold(children) => {
            let strong = append(parent, create_element("strong", vec![]));
            for child in children {
                append_inline_node(&strong, child, style);
            }
        }
        InlineContent::Code(code) => {
            let attrs = style.code_class.map(|class| vec![("class", class)]);
            append(parent, text_element("code", attrs.unwrap_or_default(), code));
        }
        InlineContent::Math(span) => (style.math)(parent, span),
    }
}

/// Serialize a list of nodes (each including itself) to an HTML string.
pub(crate) fn serialize_nodes(nodes: &[Handle]) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for node in nodes {
        let serializable = SerializableHandle::from(node.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
        output.push(b'\n');
    }

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

/// Escape HTML special characters in text
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::MathShield;

    #[test]
    fn text_is_escaped_on_serialization() {
        let p = text_element("p", vec![("class", "x")], "a < b & c");
        let html = serialize_nodes(&[p]).unwrap();
        assert_eq!(html, "<p class=\"x\">a &lt; b &amp; c</p>\n");
    }

    #[test]
    fn inline_nodes_use_the_math_callback() {
        let (shield, shielded) = MathShield::shield("**Risk** is `sd` and $\\sigma$").unwrap();
        let mut ledger = MathLedger::new(&shield);
        let p = create_element("p", vec![]);
        let style = InlineStyle {
            code_class: Some("mono"),
            math: &|parent, span| {
                append(parent, text_element("em", vec![], span.latex()));
            },
        };
        append_inline(&p, &shielded, &mut ledger, &style);
        ledger.finish().unwrap();

        let html = serialize_nodes(&[p]).unwrap();
        assert_eq!(
            html,
            "<p><strong>Risk</strong> is <code class=\"mono\">sd</code> and <em>\\sigma</em></p>\n"
        );
    }

    #[test]
    fn escapes_attribute_characters() {
        assert_eq!(html_escape("\"<T&C>\""), "&quot;&lt;T&amp;C&gt;&quot;");
    }
}
