//! Diagram source parsing.
//!
//! Line-oriented: the first meaningful line selects the diagram type, every
//! following line must match one of the statement patterns for that type.
//! `%%` comments and blank lines are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::DiagramError;

/// A parsed diagram, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagram {
    Flowchart(Flowchart),
    Sequence(Sequence),
}

/// Flow direction from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// TD / TB
    TopDown,
    /// LR
    LeftRight,
}

/// Node shape, from the bracket style around the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// `[label]`
    Rect,
    /// `(label)`
    Round,
    /// `{label}`
    Decision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Index into `Flowchart::nodes`.
    pub from: usize,
    /// Index into `Flowchart::nodes`.
    pub to: usize,
    pub label: Option<String>,
    /// False for plain `---` links.
    pub arrow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flowchart {
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMessage {
    /// Index into `Sequence::participants`.
    pub from: usize,
    /// Index into `Sequence::participants`.
    pub to: usize,
    pub text: String,
    /// True for `-->>` replies.
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub participants: Vec<String>,
    pub messages: Vec<SequenceMessage>,
}

static FLOW_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:flowchart|graph)\s+(TD|TB|LR)\s*;?$").unwrap());

// Node reference with optional shape brackets, e.g. `A`, `A[Start]`,
// `B(Round)`, `C{Pick}`.
const NODE_REF: &str = r"(\w+)(?:\[([^\]]*)\]|\(([^)]*)\)|\{([^}]*)\})?";

static FLOW_EDGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{NODE_REF}\s*(-->|---)\s*(?:\|([^|]*)\|\s*)?{NODE_REF}\s*;?$"
    ))
    .unwrap()
});

static FLOW_NODE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"^{NODE_REF}\s*;?$")).unwrap());

static SEQ_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s*(-->>|->>)\s*(\w+)\s*:\s*(.*)$").unwrap());

static SEQ_PARTICIPANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^participant\s+(\w+)\s*$").unwrap());

/// Parse diagram source into its structured form.
///
/// # Errors
/// See [`DiagramError`].
pub fn parse(source: &str) -> Result<Diagram, DiagramError> {
    let mut lines = meaningful_lines(source);
    let Some((_, header)) = lines.next() else {
        return Err(DiagramError::Empty);
    };

    if header == "sequenceDiagram" {
        return parse_sequence(lines).map(Diagram::Sequence);
    }
    if let Some(caps) = FLOW_HEADER.captures(header) {
        let direction = match &caps[1] {
            "LR" => Direction::LeftRight,
            _ => Direction::TopDown,
        };
        return parse_flowchart(direction, lines).map(Diagram::Flowchart);
    }

    let kind = header.split_whitespace().next().unwrap_or(header);
    Err(DiagramError::UnsupportedType(kind.to_string()))
}

/// Trimmed, non-blank, non-comment lines with their 1-based line numbers.
fn meaningful_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("%%"))
}

fn parse_flowchart<'a>(
    direction: Direction,
    lines: impl Iterator<Item = (usize, &'a str)>,
) -> Result<Flowchart, DiagramError> {
    let mut flow = Flowchart {
        direction,
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    for (line_no, line) in lines {
        if let Some(caps) = FLOW_EDGE.captures(line) {
            // Groups 1-4 are the source node, 5 the connector, 6 the edge
            // label, 7-10 the target node.
            let from = intern_node(&mut flow.nodes, &caps, 1);
            let to = intern_node(&mut flow.nodes, &caps, 7);
            let arrow = &caps[5] == "-->";
            let label = caps
                .get(6)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            flow.edges.push(Edge {
                from,
                to,
                label,
                arrow,
            });
        } else if let Some(caps) = FLOW_NODE.captures(line) {
            intern_node(&mut flow.nodes, &caps, 1);
        } else {
            return Err(DiagramError::Syntax {
                line: line_no,
                message: format!("expected a node or edge statement, got '{line}'"),
            });
        }
    }

    if flow.nodes.is_empty() {
        return Err(DiagramError::Empty);
    }
    Ok(flow)
}

/// Find or create the node captured at `base` (id) and `base+1..base+3`
/// (shape-specific label groups). A later shaped mention upgrades a bare
/// reference's label and shape.
fn intern_node(nodes: &mut Vec<Node>, caps: &regex::Captures<'_>, base: usize) -> usize {
    let id = caps[base].to_string();
    let (label, shape) = if let Some(m) = caps.get(base + 1) {
        (Some(m.as_str().to_string()), NodeShape::Rect)
    } else if let Some(m) = caps.get(base + 2) {
        (Some(m.as_str().to_string()), NodeShape::Round)
    } else if let Some(m) = caps.get(base + 3) {
        (Some(m.as_str().to_string()), NodeShape::Decision)
    } else {
        (None, NodeShape::Rect)
    };

    if let Some(idx) = nodes.iter().position(|n| n.id == id) {
        if let Some(label) = label {
            nodes[idx].label = label;
            nodes[idx].shape = shape;
        }
        return idx;
    }
    nodes.push(Node {
        label: label.unwrap_or_else(|| id.clone()),
        id,
        shape,
    });
    nodes.len() - 1
}

fn parse_sequence<'a>(
    lines: impl Iterator<Item = (usize, &'a str)>,
) -> Result<Sequence, DiagramError> {
    let mut seq = Sequence {
        participants: Vec::new(),
        messages: Vec::new(),
    };

    for (line_no, line) in lines {
        if let Some(caps) = SEQ_PARTICIPANT.captures(line) {
            intern_participant(&mut seq.participants, &caps[1]);
        } else if let Some(caps) = SEQ_MESSAGE.captures(line) {
            let from = intern_participant(&mut seq.participants, &caps[1]);
            let to = intern_participant(&mut seq.participants, &caps[3]);
            seq.messages.push(SequenceMessage {
                from,
                to,
                text: caps[4].trim().to_string(),
                dashed: &caps[2] == "-->>",
            });
        } else {
            return Err(DiagramError::Syntax {
                line: line_no,
                message: format!("expected a participant or message statement, got '{line}'"),
            });
        }
    }

    if seq.participants.is_empty() {
        return Err(DiagramError::Empty);
    }
    Ok(seq)
}

fn intern_participant(participants: &mut Vec<String>, name: &str) -> usize {
    if let Some(idx) = participants.iter().position(|p| p == name) {
        return idx;
    }
    participants.push(name.to_string());
    participants.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(source: &str) -> Flowchart {
        match parse(source).expect("parse") {
            Diagram::Flowchart(f) => f,
            Diagram::Sequence(_) => panic!("expected flowchart"),
        }
    }

    fn seq(source: &str) -> Sequence {
        match parse(source).expect("parse") {
            Diagram::Sequence(s) => s,
            Diagram::Flowchart(_) => panic!("expected sequence"),
        }
    }

    #[test]
    fn test_parse_flowchart_header_directions() {
        assert_eq!(flow("flowchart TD\nA").direction, Direction::TopDown);
        assert_eq!(flow("flowchart TB\nA").direction, Direction::TopDown);
        assert_eq!(flow("graph LR\nA").direction, Direction::LeftRight);
    }

    #[test]
    fn test_parse_edge_with_labels_on_nodes() {
        let f = flow("flowchart TD\n  A[Start] --> B[End]");
        assert_eq!(f.nodes.len(), 2);
        assert_eq!(f.nodes[0].label, "Start");
        assert_eq!(f.nodes[1].label, "End");
        assert_eq!(f.edges.len(), 1);
        assert!(f.edges[0].arrow);
    }

    #[test]
    fn test_parse_edge_label() {
        let f = flow("flowchart TD\n  A -->|yes| B");
        assert_eq!(f.edges[0].label.as_deref(), Some("yes"));
    }

    #[test]
    fn test_parse_plain_link() {
        let f = flow("flowchart TD\n  A --- B");
        assert!(!f.edges[0].arrow);
    }

    #[test]
    fn test_parse_node_shapes() {
        let f = flow("flowchart TD\n  A[Box]\n  B(Round)\n  C{Pick}");
        assert_eq!(f.nodes[0].shape, NodeShape::Rect);
        assert_eq!(f.nodes[1].shape, NodeShape::Round);
        assert_eq!(f.nodes[2].shape, NodeShape::Decision);
    }

    #[test]
    fn test_bare_reference_upgraded_by_later_shape() {
        let f = flow("flowchart TD\n  A --> B\n  B{Choice}");
        assert_eq!(f.nodes[1].label, "Choice");
        assert_eq!(f.nodes[1].shape, NodeShape::Decision);
    }

    #[test]
    fn test_bare_node_label_defaults_to_id() {
        let f = flow("flowchart TD\n  A --> B");
        assert_eq!(f.nodes[0].label, "A");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let f = flow("flowchart TD\n\n  %% setup\n  A --> B\n");
        assert_eq!(f.edges.len(), 1);
    }

    #[test]
    fn test_parse_sequence_messages() {
        let s = seq("sequenceDiagram\n  Alice->>Bob: Hello\n  Bob-->>Alice: Hi");
        assert_eq!(s.participants, ["Alice", "Bob"]);
        assert_eq!(s.messages.len(), 2);
        assert!(!s.messages[0].dashed);
        assert!(s.messages[1].dashed);
        assert_eq!(s.messages[1].text, "Hi");
    }

    #[test]
    fn test_parse_explicit_participants_keep_order() {
        let s = seq("sequenceDiagram\n  participant Bob\n  participant Alice\n  Alice->>Bob: x");
        assert_eq!(s.participants, ["Bob", "Alice"]);
        assert_eq!(s.messages[0].from, 1);
        assert_eq!(s.messages[0].to, 0);
    }

    #[test]
    fn test_syntax_error_has_line_number() {
        let err = parse("sequenceDiagram\n  Alice->>Bob: hi\n  nonsense here").unwrap_err();
        assert_eq!(
            err,
            DiagramError::Syntax {
                line: 3,
                message: "expected a participant or message statement, got 'nonsense here'"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_header_only_flowchart_is_empty() {
        assert_eq!(parse("flowchart TD").unwrap_err(), DiagramError::Empty);
    }
}
