//! Output formatting for CLI display.

use crate::hint::{HINT_END, HINT_START};
use crate::model::{ActivityConfig, MissionRef, MissionResult};

/// Splits a response into its text and its hint block, if any.
///
/// Text after the closing marker is kept with the response text.
pub(super) fn split_hint(response: &str) -> (String, Option<String>) {
    let Some(start) = response.find(HINT_START) else {
        return (response.to_string(), None);
    };

    let before = response[..start].trim_end();
    let rest = &response[start + HINT_START.len()..];
    let (hint, after) = match rest.find(HINT_END) {
        Some(end) => (&rest[..end], rest[end + HINT_END.len()..].trim()),
        None => (rest, ""),
    };

    let text = match (before.is_empty(), after.is_empty()) {
        (_, true) => before.to_string(),
        (true, false) => after.to_string(),
        (false, false) => format!("{before}\n{after}"),
    };
    let hint = hint.trim();
    (text, (!hint.is_empty()).then(|| hint.to_string()))
}

pub(super) fn format_hint(hint: &str) -> String {
    let body: Vec<String> = hint.lines().map(|line| format!("  {line}")).collect();
    format!("Hint:\n{}", body.join("\n"))
}

pub(super) fn format_missions(results: &[(&MissionRef, MissionResult)]) -> String {
    if results.is_empty() {
        return "No missions in this activity.".to_string();
    }

    let mut lines = Vec::new();
    for (mission, result) in results {
        let mark = if result.ok { "[x]" } else { "[ ]" };
        lines.push(format!("{mark} {}", mission.title));
        if !result.ok {
            if !mission.description.is_empty() {
                lines.push(format!("    {}", mission.description));
            }
            lines.extend(result.errors.iter().map(|e| format!("    - {e}")));
        }
    }

    let done = results.iter().filter(|(_, r)| r.ok).count();
    lines.push(String::new());
    lines.push(format!("{done}/{} missions complete", results.len()));
    lines.join("\n")
}

pub(super) fn format_activities(activities: &[ActivityConfig]) -> String {
    activities
        .iter()
        .map(|a| {
            let missions = a.missions.len();
            let noun = if missions == 1 { "mission" } else { "missions" };
            let mut entry = format!("{}  {} ({missions} {noun})", a.id, a.title);
            if !a.description.is_empty() {
                entry.push_str("\n    ");
                entry.push_str(&a.description);
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("\n")
}
