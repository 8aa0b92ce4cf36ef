//! Namespace-aware XML lookup helpers.
//!
//! CaaS responses are shallow documents: the fields a caller needs (`orgId`,
//! `responseCode`, `message`) are direct children of the root element. An
//! [`XmlDocument`] keeps the root and its direct children with their resolved
//! namespaces, and [`XmlDocument::findtext`] looks a child up by namespace and
//! local name.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{Error, Result};

/// Base URI of the legacy (API 1) schemas.
pub const NAMESPACE_BASE: &str = "http://oec.api.opsource.net/schemas";
/// Organization schema namespace.
pub const ORGANIZATION_NS: &str = "http://oec.api.opsource.net/schemas/organization";
/// Server schema namespace; carries API 1 error fields.
pub const SERVER_NS: &str = "http://oec.api.opsource.net/schemas/server";
/// Network schema namespace.
pub const NETWORK_NS: &str = "http://oec.api.opsource.net/schemas/network";
/// Directory schema namespace; carries the account `orgId`.
pub const DIRECTORY_NS: &str = "http://oec.api.opsource.net/schemas/directory";
/// API 2 types namespace.
pub const TYPES_URN: &str = "urn:didata.com:api:cloud:types";

/// A single element with its resolved namespace and own text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Resolved namespace URI, if the element is namespaced
    pub namespace: Option<String>,
    /// Local name without prefix
    pub name: String,
    /// Text preceding the first nested element
    pub text: String,
}

impl XmlElement {
    fn matches(&self, tag: &str, namespace: &str) -> bool {
        self.name == tag && self.namespace.as_deref().unwrap_or_default() == namespace
    }
}

/// Parsed view of a response document: the root element and its direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
    children: Vec<XmlElement>,
}

impl XmlDocument {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the body is not a well-formed
    /// document with a single root element.
    pub fn parse(body: &str) -> Result<Self> {
        // Text is kept verbatim; whitespace between children never reaches a child.
        let mut reader = NsReader::from_str(body);

        let mut root: Option<XmlElement> = None;
        let mut children: Vec<XmlElement> = Vec::new();
        let mut depth = 0usize;
        // Text of a child only counts until its first nested element.
        let mut child_has_nested = false;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = owned_namespace(resolved)?;

            match event {
                Event::Start(start) if depth == 0 => {
                    set_root(&mut root, element(namespace, start.local_name().as_ref()))?;
                    depth = 1;
                }
                Event::Empty(start) if depth == 0 => {
                    set_root(&mut root, element(namespace, start.local_name().as_ref()))?;
                }
                Event::Start(start) => {
                    if depth == 1 {
                        children.push(element(namespace, start.local_name().as_ref()));
                        child_has_nested = false;
                    } else if depth == 2 {
                        child_has_nested = true;
                    }
                    depth += 1;
                }
                Event::Empty(start) => {
                    if depth == 1 {
                        children.push(element(namespace, start.local_name().as_ref()));
                    } else if depth == 2 {
                        child_has_nested = true;
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                }
                Event::Text(text) => {
                    if depth == 2 && !child_has_nested {
                        if let Some(child) = children.last_mut() {
                            child.text.push_str(&text.unescape()?);
                        }
                    }
                }
                Event::CData(data) => {
                    if depth == 2 && !child_has_nested {
                        if let Some(child) = children.last_mut() {
                            child.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(Error::MalformedResponse(
                "unexpected end of document".to_string(),
            ));
        }
        let root = root.ok_or_else(|| {
            Error::MalformedResponse("document has no root element".to_string())
        })?;

        Ok(Self { root, children })
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Direct children of the root, in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Text of the first direct child of the root named `tag` in `namespace`.
    ///
    /// An element without text yields an empty string; a missing element yields `None`.
    #[must_use]
    pub fn findtext(&self, tag: &str, namespace: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.matches(tag, namespace))
            .map(|child| child.text.as_str())
    }

    /// Tries each `(tag, namespace)` candidate in order and returns the first match.
    #[must_use]
    pub fn findtext_any(&self, candidates: &[(&str, &str)]) -> Option<&str> {
        candidates
            .iter()
            .find_map(|(tag, namespace)| self.findtext(tag, namespace))
    }
}

/// Parses `body` and looks up a single field.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the body is not well-formed XML.
pub fn findtext(body: &str, tag: &str, namespace: &str) -> Result<Option<String>> {
    let document = XmlDocument::parse(body)?;
    Ok(document.findtext(tag, namespace).map(str::to_string))
}

fn set_root(root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    if root.is_some() {
        return Err(Error::MalformedResponse(
            "document has more than one root element".to_string(),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn element(namespace: Option<String>, local_name: &[u8]) -> XmlElement {
    XmlElement {
        namespace,
        name: String::from_utf8_lossy(local_name).into_owned(),
        text: String::new(),
    }
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(Error::MalformedResponse(format!(
            "undeclared namespace prefix `{}`",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}
