//! Three-way text merge and conflict-marker detection.
//!
//! The merge works on lines. When all three versions have the same number of
//! lines each line is merged on its own, so edits to different lines combine
//! cleanly. Otherwise the common prefix and suffix are set aside and the
//! differing middle is merged as one block.

pub const CONFLICT_START: &str = "<<<<<<<";
pub const CONFLICT_DIVIDER: &str = "=======";
pub const CONFLICT_END: &str = ">>>>>>>";

/// The result of merging one file.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum FileMerge {
    Clean(String),
    /// Merged text with conflict regions marked.
    Conflict(String),
}

/// Labels written after the start and end markers.
pub(super) struct Labels<'a> {
    pub ours: &'a str,
    pub theirs: &'a str,
}

pub(super) fn merge_text(base: &str, ours: &str, theirs: &str, labels: &Labels<'_>) -> FileMerge {
    let b: Vec<&str> = base.split_inclusive('\n').collect();
    let o: Vec<&str> = ours.split_inclusive('\n').collect();
    let t: Vec<&str> = theirs.split_inclusive('\n').collect();

    let mut out = String::new();
    let conflicted = if b.len() == o.len() && b.len() == t.len() {
        merge_line_by_line(&b, &o, &t, labels, &mut out)
    } else {
        merge_middle(&b, &o, &t, labels, &mut out)
    };

    if conflicted {
        FileMerge::Conflict(out)
    } else {
        FileMerge::Clean(out)
    }
}

/// Returns whether any conflict region was written.
fn merge_line_by_line(
    b: &[&str],
    o: &[&str],
    t: &[&str],
    labels: &Labels<'_>,
    out: &mut String,
) -> bool {
    let mut conflicted = false;
    let mut pending_ours: Vec<&str> = Vec::new();
    let mut pending_theirs: Vec<&str> = Vec::new();

    for i in 0..b.len() {
        match pick(&b[i..=i], &o[i..=i], &t[i..=i]) {
            Some(lines) => {
                if !pending_ours.is_empty() {
                    push_conflict(out, &pending_ours, &pending_theirs, labels);
                    pending_ours.clear();
                    pending_theirs.clear();
                }
                out.extend(lines.iter().copied());
            }
            None => {
                conflicted = true;
                pending_ours.push(o[i]);
                pending_theirs.push(t[i]);
            }
        }
    }
    if !pending_ours.is_empty() {
        push_conflict(out, &pending_ours, &pending_theirs, labels);
    }
    conflicted
}

fn merge_middle(
    b: &[&str],
    o: &[&str],
    t: &[&str],
    labels: &Labels<'_>,
    out: &mut String,
) -> bool {
    let shortest = b.len().min(o.len()).min(t.len());

    let mut prefix = 0;
    while prefix < shortest && b[prefix] == o[prefix] && b[prefix] == t[prefix] {
        prefix += 1;
    }

    let mut suffix = 0;
    while suffix < shortest - prefix
        && b[b.len() - 1 - suffix] == o[o.len() - 1 - suffix]
        && b[b.len() - 1 - suffix] == t[t.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let b_mid = &b[prefix..b.len() - suffix];
    let o_mid = &o[prefix..o.len() - suffix];
    let t_mid = &t[prefix..t.len() - suffix];

    out.extend(b[..prefix].iter().copied());
    let conflicted = match pick(b_mid, o_mid, t_mid) {
        Some(lines) => {
            out.extend(lines.iter().copied());
            false
        }
        None => {
            push_conflict(out, o_mid, t_mid, labels);
            true
        }
    };
    out.extend(b[b.len() - suffix..].iter().copied());
    conflicted
}

/// Picks the merged version of a region, or `None` when both sides
/// changed it differently.
fn pick<'a>(base: &[&'a str], ours: &[&'a str], theirs: &[&'a str]) -> Option<Vec<&'a str>> {
    if ours == theirs || theirs == base {
        Some(ours.to_vec())
    } else if ours == base {
        Some(theirs.to_vec())
    } else {
        None
    }
}

fn push_conflict(out: &mut String, ours: &[&str], theirs: &[&str], labels: &Labels<'_>) {
    out.push_str(&format!("{CONFLICT_START} {}\n", labels.ours));
    push_lines(out, ours);
    out.push_str(CONFLICT_DIVIDER);
    out.push('\n');
    push_lines(out, theirs);
    out.push_str(&format!("{CONFLICT_END} {}\n", labels.theirs));
}

fn push_lines(out: &mut String, lines: &[&str]) {
    for line in lines {
        out.push_str(line);
        if !line.ends_with('\n') {
            out.push('\n');
        }
    }
}

/// Whether `content` holds at least one complete conflict region:
/// a start marker, then a divider, then an end marker, each at the
/// start of its own line.
pub fn has_conflict_markers(content: &str) -> bool {
    let mut seen_start = false;
    let mut seen_divider = false;
    for line in content.lines() {
        if !seen_start {
            seen_start = line.starts_with(CONFLICT_START);
        } else if !seen_divider {
            seen_divider = line.starts_with(CONFLICT_DIVIDER);
        } else if line.starts_with(CONFLICT_END) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: Labels<'static> = Labels {
        ours: "HEAD",
        theirs: "feature",
    };

    #[test]
    fn same_line_changed_on_both_sides_conflicts() {
        let result = merge_text("title\nbody\n", "ours\nbody\n", "theirs\nbody\n", &LABELS);
        assert_eq!(
            result,
            FileMerge::Conflict(
                "<<<<<<< HEAD\nours\n=======\ntheirs\n>>>>>>> feature\nbody\n".to_string()
            )
        );
    }

    #[test]
    fn different_lines_combine_cleanly() {
        let result = merge_text("a\nb\nc\n", "A\nb\nc\n", "a\nb\nC\n", &LABELS);
        assert_eq!(result, FileMerge::Clean("A\nb\nC\n".to_string()));
    }

    #[test]
    fn one_sided_change_with_new_lines_is_taken() {
        let result = merge_text("a\n", "a\n", "a\nb\nc\n", &LABELS);
        assert_eq!(result, FileMerge::Clean("a\nb\nc\n".to_string()));
    }

    #[test]
    fn diverging_blocks_keep_common_prefix_and_suffix() {
        let result = merge_text("top\nmid\nend\n", "top\nx\ny\nend\n", "top\nz\nend\n", &LABELS);
        assert_eq!(
            result,
            FileMerge::Conflict(
                "top\n<<<<<<< HEAD\nx\ny\n=======\nz\n>>>>>>> feature\nend\n".to_string()
            )
        );
    }

    #[test]
    fn missing_trailing_newline_keeps_markers_on_their_own_lines() {
        let FileMerge::Conflict(text) = merge_text("a", "b", "c", &LABELS) else {
            panic!("expected a conflict");
        };
        assert_eq!(text, "<<<<<<< HEAD\nb\n=======\nc\n>>>>>>> feature\n");
    }

    #[test]
    fn detects_complete_marker_triple() {
        assert!(has_conflict_markers(
            "<<<<<<< HEAD\nmine\n=======\nyours\n>>>>>>> other\n"
        ));
    }

    #[test]
    fn incomplete_or_misplaced_markers_are_not_conflicts() {
        assert!(!has_conflict_markers("<<<<<<< HEAD\nmine\n=======\n"));
        assert!(!has_conflict_markers("=======\n>>>>>>> other\n"));
        assert!(!has_conflict_markers("text <<<<<<<\n=======\n>>>>>>>\n"));
        assert!(!has_conflict_markers("<h1>Plain page</h1>\n"));
    }
}
