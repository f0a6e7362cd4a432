//! Fragment parsing into a [`Dom`].

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;

use crate::tree::{Dom, NodeId};

/// Error building a tree from a committed fragment.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("malformed fragment: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("fragment is not valid UTF-8")]
    Utf8,

    #[error("unknown entity reference '&{0};'")]
    UnknownEntity(String),
}

impl Dom {
    /// Parse a well-formed HTML fragment into a tree rooted at a `div`
    /// container.
    ///
    /// The viewer engine serializes void elements self-closed, so its
    /// output always satisfies the well-formedness requirement. Raw
    /// HTML passed through from note content may not; the caller treats
    /// a parse failure as "nothing to post-process".
    pub fn parse_fragment(fragment: &str) -> Result<Self, DomError> {
        let mut dom = Self::new();
        let mut stack: Vec<NodeId> = vec![dom.root()];
        let mut reader = Reader::from_str(fragment);

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = open_element(&mut dom, *stack.last().expect("stack root"), &start)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    open_element(&mut dom, *stack.last().expect("stack root"), &start)?;
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Event::Text(text) => {
                    let raw = str_of(&text)?;
                    let unescaped = quick_xml::escape::unescape(raw)?;
                    dom.append_text(*stack.last().expect("stack root"), &unescaped);
                }
                Event::CData(data) => {
                    let raw = str_of(&data)?;
                    dom.append_text(*stack.last().expect("stack root"), raw);
                }
                Event::GeneralRef(entity) => {
                    let resolved = resolve_entity(str_of(&entity)?)?;
                    dom.append_text(*stack.last().expect("stack root"), &resolved);
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        Ok(dom)
    }
}

fn str_of(bytes: &[u8]) -> Result<&str, DomError> {
    std::str::from_utf8(bytes).map_err(|_| DomError::Utf8)
}

fn open_element(
    dom: &mut Dom,
    parent: NodeId,
    start: &quick_xml::events::BytesStart<'_>,
) -> Result<NodeId, DomError> {
    let tag = str_of(start.name().as_ref())?.to_owned();
    let id = dom.create_element(tag);

    for attr in start.attributes() {
        let attr = attr?;
        let name = str_of(attr.key.as_ref())?.to_owned();
        let raw = str_of(&attr.value)?;
        let value = quick_xml::escape::unescape(raw)?.into_owned();

        if name == "class" {
            for class in value.split_whitespace() {
                dom.add_class(id, class);
            }
        } else {
            dom.set_attribute(id, &name, value);
        }
    }

    dom.append_child(parent, id);
    Ok(id)
}

/// Resolve a general entity reference (`amp`, `#64`, `#x40`, ...).
fn resolve_entity(name: &str) -> Result<String, DomError> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name.strip_prefix('#').and_then(|num| {
            let code = num
                .strip_prefix(['x', 'X'])
                .map_or_else(|| num.parse::<u32>().ok(), |hex| u32::from_str_radix(hex, 16).ok());
            code.and_then(char::from_u32)
        }),
    };

    resolved
        .map(String::from)
        .ok_or_else(|| DomError::UnknownEntity(name.to_owned()))
}
