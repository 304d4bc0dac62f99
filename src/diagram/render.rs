//! Text-art painting for parsed diagrams.

use unicode_width::UnicodeWidthStr;

use super::DiagramConfig;
use super::layout;
use super::parser::{Direction, Flowchart, NodeShape, Sequence};

struct Charset {
    h: char,
    v: char,
    tl: char,
    tr: char,
    bl: char,
    br: char,
    rtl: char,
    rtr: char,
    rbl: char,
    rbr: char,
    dh: char,
    dv: char,
    dtl: char,
    dtr: char,
    dbl: char,
    dbr: char,
    down: char,
    right: char,
    left: char,
    dash: char,
}

const UNICODE: Charset = Charset {
    h: '─',
    v: '│',
    tl: '┌',
    tr: '┐',
    bl: '└',
    br: '┘',
    rtl: '╭',
    rtr: '╮',
    rbl: '╰',
    rbr: '╯',
    dh: '═',
    dv: '║',
    dtl: '╔',
    dtr: '╗',
    dbl: '╚',
    dbr: '╝',
    down: '▼',
    right: '▶',
    left: '◀',
    dash: '┄',
};

const ASCII: Charset = Charset {
    h: '-',
    v: '|',
    tl: '+',
    tr: '+',
    bl: '+',
    br: '+',
    rtl: '.',
    rtr: '.',
    rbl: '\'',
    rbr: '\'',
    dh: '=',
    dv: '|',
    dtl: '+',
    dtr: '+',
    dbl: '+',
    dbr: '+',
    down: 'v',
    right: '>',
    left: '<',
    dash: '.',
};

const fn charset(ascii: bool) -> &'static Charset {
    if ascii { &ASCII } else { &UNICODE }
}

/// A three-line node box. Width is label width + 4.
fn node_box(label: &str, shape: NodeShape, cs: &Charset) -> Vec<String> {
    let w = UnicodeWidthStr::width(label);
    let (tl, tr, bl, br, h, v) = match shape {
        NodeShape::Rect => (cs.tl, cs.tr, cs.bl, cs.br, cs.h, cs.v),
        NodeShape::Round => (cs.rtl, cs.rtr, cs.rbl, cs.rbr, cs.h, cs.v),
        NodeShape::Decision => (cs.dtl, cs.dtr, cs.dbl, cs.dbr, cs.dh, cs.dv),
    };
    let bar: String = std::iter::repeat_n(h, w + 2).collect();
    vec![
        format!("{tl}{bar}{tr}"),
        format!("{v} {label} {v}"),
        format!("{bl}{bar}{br}"),
    ]
}

const fn box_width(label_width: usize) -> usize {
    label_width + 4
}

fn blank_row(width: usize) -> Vec<char> {
    vec![' '; width]
}

fn put_str(row: &mut [char], at: usize, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(cell) = row.get_mut(at + i) {
            *cell = ch;
        }
    }
}

fn row_to_string(row: &[char]) -> String {
    row.iter().collect::<String>().trim_end().to_string()
}

pub fn render_flowchart(flow: &Flowchart, config: &DiagramConfig) -> Vec<String> {
    let cs = charset(config.ascii);
    let ranks = layout::ranks(flow);
    match flow.direction {
        Direction::TopDown => render_top_down(flow, &ranks, cs),
        Direction::LeftRight => render_left_right(flow, &ranks, cs),
    }
}

fn render_top_down(flow: &Flowchart, ranks: &[Vec<usize>], cs: &Charset) -> Vec<String> {
    const GAP: usize = 3;

    // Lay each rank out as a row of boxes, then center rows on the widest.
    struct RankRow {
        lines: Vec<String>,
        width: usize,
        // (node, center x within the row)
        centers: Vec<(usize, usize)>,
    }

    let mut rows: Vec<RankRow> = Vec::new();
    for rank in ranks {
        let mut lines = vec![String::new(); 3];
        let mut centers = Vec::new();
        let mut x = 0;
        for (i, &node) in rank.iter().enumerate() {
            if i > 0 {
                for line in &mut lines {
                    line.push_str(&" ".repeat(GAP));
                }
                x += GAP;
            }
            let n = &flow.nodes[node];
            let w = box_width(UnicodeWidthStr::width(n.label.as_str()));
            centers.push((node, x + w / 2));
            for (line, box_line) in lines.iter_mut().zip(node_box(&n.label, n.shape, cs)) {
                line.push_str(&box_line);
            }
            x += w;
        }
        rows.push(RankRow {
            lines,
            width: x,
            centers,
        });
    }

    let mut total = rows.iter().map(|r| r.width).max().unwrap_or(0);
    // Edge labels hang to the right of the drop line at center + 2; widen
    // the canvas so they are never truncated. With total = 2 * extent -
    // row.width the centering pad leaves exactly enough room.
    for row in rows.iter().skip(1) {
        for &(node, local_center) in &row.centers {
            let label_len = flow
                .edges
                .iter()
                .filter(|e| e.to == node)
                .find_map(|e| e.label.as_deref())
                .map_or(0, |label| label.chars().count());
            if label_len > 0 {
                let extent = local_center + 2 + label_len;
                total = total.max((2 * extent).saturating_sub(row.width));
            }
        }
    }
    let mut out: Vec<String> = Vec::new();

    for (rank_idx, row) in rows.iter().enumerate() {
        let pad = (total - row.width) / 2;
        if rank_idx > 0 {
            // Drop lines above every node in this rank that has a parent.
            let mut drop = blank_row(total);
            let mut head = blank_row(total);
            let mut any = false;
            for &(node, local_center) in &row.centers {
                let incoming: Vec<_> = flow.edges.iter().filter(|e| e.to == node).collect();
                if incoming.is_empty() {
                    continue;
                }
                any = true;
                let cx = pad + local_center;
                drop[cx.min(total.saturating_sub(1))] = cs.v;
                if let Some(label) = incoming.iter().find_map(|e| e.label.as_deref()) {
                    put_str(&mut drop, cx + 2, label);
                }
                let head_ch = if incoming.iter().any(|e| e.arrow) {
                    cs.down
                } else {
                    cs.v
                };
                head[cx.min(total.saturating_sub(1))] = head_ch;
            }
            if any {
                out.push(row_to_string(&drop));
                out.push(row_to_string(&head));
            }
        }
        for line in &row.lines {
            out.push(format!("{}{}", " ".repeat(pad), line.trim_end()));
        }
    }

    out
}

fn render_left_right(flow: &Flowchart, ranks: &[Vec<usize>], cs: &Charset) -> Vec<String> {
    // Each rank becomes a column of stacked boxes; columns are joined by a
    // horizontal connector at the first box row.
    let mut columns: Vec<(Vec<String>, usize)> = Vec::new();
    for rank in ranks {
        let width = rank
            .iter()
            .map(|&n| box_width(UnicodeWidthStr::width(flow.nodes[n].label.as_str())))
            .max()
            .unwrap_or(0);
        let mut lines: Vec<String> = Vec::new();
        for (i, &node) in rank.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            let n = &flow.nodes[node];
            for box_line in node_box(&n.label, n.shape, cs) {
                let fill = width.saturating_sub(UnicodeWidthStr::width(box_line.as_str()));
                lines.push(format!("{box_line}{}", " ".repeat(fill)));
            }
        }
        columns.push((lines, width));
    }

    let height = columns.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    // Connector text between consecutive ranks.
    let mut connectors: Vec<String> = Vec::new();
    for gap in 0..columns.len().saturating_sub(1) {
        let from_rank = &ranks[gap];
        let to_rank = &ranks[gap + 1];
        let between: Vec<_> = flow
            .edges
            .iter()
            .filter(|e| from_rank.contains(&e.from) && to_rank.contains(&e.to))
            .collect();
        let arrow = between.iter().any(|e| e.arrow);
        let tip = if arrow { cs.right } else { cs.h };
        let core = between
            .iter()
            .find_map(|e| e.label.as_deref())
            .map_or_else(
                || format!("{}{}{tip}", cs.h, cs.h),
                |label| format!("{} {label} {}{tip}", cs.h, cs.h),
            );
        connectors.push(format!(" {core} "));
    }

    let mut out = Vec::new();
    for row in 0..height {
        let mut line = String::new();
        for (col, (lines, width)) in columns.iter().enumerate() {
            line.push_str(
                lines
                    .get(row)
                    .map_or_else(|| " ".repeat(*width), Clone::clone)
                    .as_str(),
            );
            if let Some(conn) = connectors.get(col) {
                if row == 1 {
                    line.push_str(conn);
                } else {
                    line.push_str(&" ".repeat(UnicodeWidthStr::width(conn.as_str())));
                }
            }
        }
        out.push(line.trim_end().to_string());
    }
    out
}

pub fn render_sequence(seq: &Sequence, config: &DiagramConfig) -> Vec<String> {
    let cs = charset(config.ascii);

    let box_widths: Vec<usize> = seq
        .participants
        .iter()
        .map(|p| box_width(UnicodeWidthStr::width(p.as_str())))
        .collect();
    let max_text = seq
        .messages
        .iter()
        .map(|m| UnicodeWidthStr::width(m.text.as_str()))
        .max()
        .unwrap_or(0);
    let gap = (max_text + 4).max(6);

    let mut lefts = Vec::new();
    let mut x = 0;
    for (i, w) in box_widths.iter().enumerate() {
        if i > 0 {
            x += gap;
        }
        lefts.push(x);
        x += w;
    }
    let centers: Vec<usize> = lefts
        .iter()
        .zip(&box_widths)
        .map(|(l, w)| l + w / 2)
        .collect();
    // Self-message text sits to the right of its lifeline at center + 2
    // and can run past the last participant box.
    let self_extent = seq
        .messages
        .iter()
        .filter(|m| m.from == m.to)
        .map(|m| centers[m.from] + 2 + m.text.chars().count())
        .max()
        .unwrap_or(0);
    let total = x.max(self_extent).max(1);

    let lifeline = || {
        let mut row = blank_row(total);
        for &c in &centers {
            row[c] = cs.v;
        }
        row
    };

    let mut out: Vec<String> = Vec::new();

    // Participant boxes.
    let boxes: Vec<Vec<String>> = seq
        .participants
        .iter()
        .map(|p| node_box(p, NodeShape::Rect, cs))
        .collect();
    for row_idx in 0..3 {
        let mut row = blank_row(total);
        for (b, &left) in boxes.iter().zip(&lefts) {
            put_str(&mut row, left, &b[row_idx]);
        }
        out.push(row_to_string(&row));
    }

    for msg in &seq.messages {
        out.push(row_to_string(&lifeline()));

        let mut label_row = lifeline();
        let text_width = UnicodeWidthStr::width(msg.text.as_str());
        if msg.from == msg.to {
            put_str(&mut label_row, centers[msg.from] + 2, &msg.text);
            out.push(row_to_string(&label_row));
            out.push(row_to_string(&lifeline()));
            continue;
        }
        let (lo, hi) = if centers[msg.from] < centers[msg.to] {
            (centers[msg.from], centers[msg.to])
        } else {
            (centers[msg.to], centers[msg.from])
        };
        let mid = usize::midpoint(lo, hi);
        let start = mid.saturating_sub(text_width / 2).max(lo + 1);
        put_str(&mut label_row, start, &msg.text);
        out.push(row_to_string(&label_row));

        let mut arrow_row = lifeline();
        let line_ch = if msg.dashed { cs.dash } else { cs.h };
        for cell in arrow_row.iter_mut().take(hi).skip(lo + 1) {
            *cell = line_ch;
        }
        if centers[msg.to] > centers[msg.from] {
            arrow_row[hi - 1] = cs.right;
        } else {
            arrow_row[lo + 1] = cs.left;
        }
        out.push(row_to_string(&arrow_row));
    }

    out.push(row_to_string(&lifeline()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::parser::{Diagram, parse};

    fn rendered(source: &str) -> String {
        let config = DiagramConfig::default();
        let lines = match parse(source).expect("parse") {
            Diagram::Flowchart(f) => render_flowchart(&f, &config),
            Diagram::Sequence(s) => render_sequence(&s, &config),
        };
        lines.join("\n")
    }

    #[test]
    fn test_top_down_boxes_and_arrow() {
        let art = rendered("flowchart TD\n  A[Start] --> B[End]");
        assert!(art.contains("│ Start │"));
        assert!(art.contains("│ End │"));
        assert!(art.contains('▼'));
    }

    #[test]
    fn test_top_down_edge_label_appears() {
        let art = rendered("flowchart TD\n  A -->|yes| B");
        assert!(art.contains("yes"));
    }

    #[test]
    fn test_decision_uses_double_border() {
        let art = rendered("flowchart TD\n  A{Pick}");
        assert!(art.contains("║ Pick ║"));
    }

    #[test]
    fn test_round_node_corners() {
        let art = rendered("flowchart TD\n  A(Soft)");
        assert!(art.contains('╭'));
        assert!(art.contains('╯'));
    }

    #[test]
    fn test_left_right_connector() {
        let art = rendered("flowchart LR\n  A[One] --> B[Two]");
        assert!(art.contains('▶'));
        let first_box_line = art.lines().nth(1).expect("middle row");
        assert!(first_box_line.contains("One"));
        assert!(first_box_line.contains("Two"));
    }

    #[test]
    fn test_left_right_plain_link_has_no_arrowhead() {
        let art = rendered("flowchart LR\n  A --- B");
        assert!(!art.contains('▶'));
    }

    #[test]
    fn test_sequence_has_boxes_lifelines_and_text() {
        let art = rendered("sequenceDiagram\n  Alice->>Bob: Hello");
        assert!(art.contains("│ Alice │"));
        assert!(art.contains("│ Bob │"));
        assert!(art.contains("Hello"));
        assert!(art.contains('▶'));
    }

    #[test]
    fn test_sequence_reply_is_dashed_and_points_left() {
        let art = rendered("sequenceDiagram\n  Alice->>Bob: q\n  Bob-->>Alice: a");
        assert!(art.contains('┄'));
        assert!(art.contains('◀'));
    }

    #[test]
    fn test_sequence_self_message() {
        let art = rendered("sequenceDiagram\n  Alice->>Alice: think");
        assert!(art.contains("think"));
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let art = rendered("flowchart TD\n  A[Start] --> B[End]\n  A --> C[Alt]");
        for line in art.lines() {
            assert_eq!(line, line.trim_end());
        }
    }
}
