use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use quick_xml::{
    escape::escape,
    events::{attributes::AttrError, BytesStart, Event},
    Reader,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{math::Map, prelude::*};

/// Errors that can occur while reading or writing automata in the JFLAP format.
#[derive(Error, Debug)]
pub enum JflapError {
    /// Reading from or writing to a file or stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    /// No state carries an `<initial/>` marker.
    #[error("no state is marked as initial")]
    MissingInitial,
    /// More than one state carries an `<initial/>` marker.
    #[error("states {0} and {1} are both marked as initial")]
    MultipleInitial(usize, usize),
    /// A `<state>` element lacks its `id` attribute.
    #[error("state element without id attribute")]
    MissingId,
    /// A state id is not a non-negative integer.
    #[error("invalid state id \"{0}\"")]
    InvalidId(String),
    /// Two states have the same id.
    #[error("state id {0} is declared more than once")]
    DuplicateId(usize),
    /// A transition refers to a state id which is not declared.
    #[error("transition refers to undeclared state {0}")]
    UndeclaredState(usize),
    /// A transition lacks one of its `<from>`, `<to>` or `<read>` children.
    #[error("transition without <{0}> element")]
    MissingElement(&'static str),
    /// A transition reads the empty word.
    #[error("transition from {0} reads the empty word, which is not allowed in a DFA")]
    EmptySymbol(usize),
    /// The transitions do not form a deterministic automaton.
    #[error("the automaton is not deterministic: {0}")]
    Automaton(#[from] DfaError),
    /// Any of the other errors, annotated with the file in which it occurred.
    #[error("{}: {source}", .path.display())]
    InFile {
        /// The file that was read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<JflapError>,
    },
}

impl JflapError {
    fn in_file<P: AsRef<Path>>(self, path: P) -> Self {
        JflapError::InFile {
            path: path.as_ref().to_path_buf(),
            source: Box::new(self),
        }
    }
}

/// Produces the JFLAP representation of `dfa`. Every state `i` becomes a `<state>` element with
/// id `i` and name `qi`, followed by one `<transition>` element per transition, ordered by
/// source state and then by the position of the symbol in the alphabet.
pub fn to_jflap_string(dfa: &DFA) -> String {
    let initial = dfa.initial().ok();
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    out.push_str("<structure>\n\t<type>fa</type>\n\t<automaton>\n");
    for q in dfa.state_indices() {
        out.push_str(&format!("\t\t<state id=\"{q}\" name=\"q{q}\">\n"));
        out.push_str("\t\t\t<x>0</x>\n\t\t\t<y>0</y>\n");
        if Some(q) == initial {
            out.push_str("\t\t\t<initial/>\n");
        }
        if dfa.is_accepting(q) {
            out.push_str("\t\t\t<final/>\n");
        }
        out.push_str("\t\t</state>\n");
    }
    for (q, a, p) in dfa.edges() {
        let symbol = dfa.alphabet().symbol(a).unwrap_or_default();
        out.push_str(&format!(
            "\t\t<transition>\n\t\t\t<from>{q}</from>\n\t\t\t<to>{p}</to>\n\t\t\t<read>{}</read>\n\t\t</transition>\n",
            escape(symbol)
        ));
    }
    out.push_str("\t</automaton>\n</structure>\n");
    out
}

/// Writes the JFLAP representation of `dfa` to `writer`, see [`to_jflap_string`].
pub fn write_jflap<W: Write>(dfa: &DFA, mut writer: W) -> Result<(), JflapError> {
    writer.write_all(to_jflap_string(dfa).as_bytes())?;
    Ok(())
}

/// Saves `dfa` to the file at `path`, which is created or truncated.
pub fn save<P: AsRef<Path>>(dfa: &DFA, path: P) -> Result<(), JflapError> {
    std::fs::write(&path, to_jflap_string(dfa)).map_err(|e| JflapError::from(e).in_file(&path))?;
    debug!("saved {} to {}", dfa.summary(), path.as_ref().display());
    Ok(())
}

/// Reads an automaton in the JFLAP format from `reader`, see [`from_jflap_str`].
pub fn read_jflap<R: Read>(mut reader: R) -> Result<DFA, JflapError> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    from_jflap_str(&xml)
}

/// Loads an automaton from the JFLAP file at `path`. Errors carry the path.
pub fn load<P: AsRef<Path>>(path: P) -> Result<DFA, JflapError> {
    let xml = std::fs::read_to_string(&path).map_err(|e| JflapError::from(e).in_file(&path))?;
    let dfa = from_jflap_str(&xml).map_err(|e| e.in_file(&path))?;
    debug!("loaded {} from {}", dfa.summary(), path.as_ref().display());
    Ok(dfa)
}

#[derive(Debug, Default)]
struct PendingTransition {
    from: Option<String>,
    to: Option<String>,
    read: Option<String>,
}

/// Collects the contents of a document while it is being parsed.
#[derive(Debug, Default)]
struct Document {
    ids: Map<usize, StateIndex>,
    initial: Option<StateIndex>,
    accepting: Vec<StateIndex>,
    transitions: Vec<PendingTransition>,
    current_state: Option<StateIndex>,
    current_transition: Option<PendingTransition>,
}

fn parse_id(id: &str) -> Result<usize, JflapError> {
    id.trim()
        .parse()
        .map_err(|_| JflapError::InvalidId(id.to_string()))
}

impl Document {
    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), JflapError> {
        match element.name().as_ref() {
            b"state" => {
                let mut id = None;
                for attribute in element.attributes() {
                    let attribute = attribute?;
                    if attribute.key.as_ref() == b"id" {
                        id = Some(parse_id(&attribute.unescape_value()?)?);
                    }
                }
                let id = id.ok_or(JflapError::MissingId)?;
                let index = self.ids.len();
                if self.ids.insert(id, index).is_some() {
                    return Err(JflapError::DuplicateId(id));
                }
                trace!("state with id {id} gets index {index}");
                self.current_state = Some(index);
            }
            b"initial" => match self.current_state {
                Some(q) => match self.initial.replace(q) {
                    Some(previous) if previous != q => {
                        return Err(JflapError::MultipleInitial(previous, q))
                    }
                    _ => {}
                },
                None => warn!("ignoring <initial/> outside of a state"),
            },
            b"final" => match self.current_state {
                Some(q) => self.accepting.push(q),
                None => warn!("ignoring <final/> outside of a state"),
            },
            b"transition" => self.current_transition = Some(PendingTransition::default()),
            child @ (b"from" | b"to" | b"read") => {
                if let Some(transition) = self.current_transition.as_mut() {
                    let slot = match child {
                        b"from" => &mut transition.from,
                        b"to" => &mut transition.to,
                        _ => &mut transition.read,
                    };
                    *slot = Some(String::new());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, element: Option<&[u8]>, text: &str) {
        if let Some(transition) = self.current_transition.as_mut() {
            let slot = match element {
                Some(b"from") => &mut transition.from,
                Some(b"to") => &mut transition.to,
                Some(b"read") => &mut transition.read,
                _ => return,
            };
            slot.get_or_insert_with(String::new).push_str(text);
        } else if element == Some(b"type".as_slice()) && text.trim() != "fa" {
            warn!("expected a finite automaton but document has type \"{text}\"");
        }
    }

    fn close(&mut self, element: &[u8]) {
        match element {
            b"state" => self.current_state = None,
            b"transition" => {
                if let Some(transition) = self.current_transition.take() {
                    self.transitions.push(transition);
                }
            }
            _ => {}
        }
    }

    fn resolve(&self, id: Option<&str>, element: &'static str) -> Result<StateIndex, JflapError> {
        let id = parse_id(id.ok_or(JflapError::MissingElement(element))?)?;
        self.ids
            .get(&id)
            .copied()
            .ok_or(JflapError::UndeclaredState(id))
    }

    fn into_dfa(self) -> Result<DFA, JflapError> {
        let mut edges = Vec::with_capacity(self.transitions.len());
        let mut alphabet = Alphabet::default();
        for transition in &self.transitions {
            let from = self.resolve(transition.from.as_deref(), "from")?;
            let to = self.resolve(transition.to.as_deref(), "to")?;
            let symbol = transition
                .read
                .as_deref()
                .ok_or(JflapError::MissingElement("read"))?;
            if symbol.is_empty() {
                return Err(JflapError::EmptySymbol(from));
            }
            edges.push((from, alphabet.push(symbol), to));
        }

        let mut dfa = DFA::new(self.ids.len(), alphabet);
        for (from, symbol, to) in edges {
            dfa.add_transition_index(from, symbol, to)?;
        }
        for q in &self.accepting {
            dfa.set_accepting(*q, true)?;
        }
        dfa.set_initial(self.initial.ok_or(JflapError::MissingInitial)?)?;
        Ok(dfa)
    }
}

/// Parses an automaton in the XML format of JFLAP. The states are numbered in the order in which
/// they appear in the document, and the alphabet consists of the symbols that are read by some
/// transition, in the order of their first appearance. The `<initial/>` and `<final/>` markers
/// refer to the state in which they are contained. Elements that are not needed, such as the
/// coordinates of states, are skipped.
///
/// # Example
/// ```
/// use dfamin::{jflap, prelude::*};
///
/// let xml = r#"<structure><type>fa</type><automaton>
///     <state id="7" name="q7"><initial/></state>
///     <state id="3" name="q3"><final/></state>
///     <transition><from>7</from><to>3</to><read>x</read></transition>
/// </automaton></structure>"#;
/// let dfa = jflap::from_jflap_str(xml).unwrap();
/// assert_eq!(dfa.size(), 2);
/// assert!(dfa.accepts(["x"]));
/// ```
pub fn from_jflap_str(xml: &str) -> Result<DFA, JflapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = Document::default();
    let mut open_elements: Vec<Vec<u8>> = vec![];
    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                document.open(&element)?;
                open_elements.push(element.name().as_ref().to_vec());
            }
            Event::Empty(element) => {
                document.open(&element)?;
                document.close(element.name().as_ref());
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                document.text(open_elements.last().map(|e| e.as_slice()), &text);
            }
            Event::End(_) => {
                if let Some(element) = open_elements.pop() {
                    document.close(&element);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    document.into_dfa()
}
