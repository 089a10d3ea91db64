//! The interactive shell: one session, read-eval-print over lines.
//!
//! Lines starting with `:` drive the trainer itself; everything else is
//! handed to the session as a command.

use std::io::{self, BufRead, Write};

use crate::catalog::Catalog;
use crate::session::Session;
use crate::vcs::VersionControl;

use super::format::{format_activities, format_hint, format_missions, split_hint};

const META_HELP: &str = "Shell commands: :missions, :activity [<id>], :write <file>, :quit";

/// Runs until `:quit` or end of input.
pub(super) fn run<I: BufRead, O: Write>(
    session: &mut Session,
    catalog: &Catalog,
    mut input: I,
    mut output: O,
) -> io::Result<()> {
    greet(session, &mut output)?;

    loop {
        write!(output, "{}", prompt(session))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
        let line = line.trim();

        if let Some(meta) = line.strip_prefix(':') {
            let (name, arg) = meta
                .split_once(char::is_whitespace)
                .map_or((meta, ""), |(n, a)| (n, a.trim()));
            match name {
                "quit" | "q" => return Ok(()),
                "missions" => {
                    let report = format_missions(&session.validate_missions());
                    writeln!(output, "{report}")?;
                }
                "activity" => switch_activity(session, catalog, arg, &mut output)?,
                "write" => write_file(session, arg, &mut input, &mut output)?,
                _ => writeln!(output, "Unknown shell command: :{name}\n{META_HELP}")?,
            }
            continue;
        }

        let response = session.execute(line);
        let (text, hint) = split_hint(&response);
        if !text.is_empty() {
            writeln!(output, "{text}")?;
        }
        if let Some(hint) = hint {
            writeln!(output, "\n{}", format_hint(&hint))?;
        }
    }
}

fn greet<O: Write>(session: &Session, output: &mut O) -> io::Result<()> {
    if let Some(activity) = session.activity() {
        writeln!(output, "{}", activity.title)?;
        if !activity.description.is_empty() {
            writeln!(output, "{}", activity.description)?;
        }
    }
    writeln!(output, "Type \"help\" for commands. {META_HELP}")
}

/// `main$ ` on a branch, `(detached)$ ` without one, `$ ` before `git init`.
fn prompt(session: &Session) -> String {
    let engine = session.engine();
    if !engine.is_initialized() {
        return "$ ".to_string();
    }
    match engine.current_branch() {
        Ok(Some(branch)) => format!("{branch}$ "),
        Ok(None) => "(detached)$ ".to_string(),
        Err(_) => "$ ".to_string(),
    }
}

fn switch_activity<O: Write>(
    session: &mut Session,
    catalog: &Catalog,
    id: &str,
    output: &mut O,
) -> io::Result<()> {
    if id.is_empty() {
        return writeln!(output, "{}", format_activities(catalog.list()));
    }
    let Some(activity) = catalog.get(id) else {
        return writeln!(output, "Unknown activity: {id}");
    };
    match session.select_activity(Some(activity.clone())) {
        Ok(()) => greet(session, output),
        Err(e) => writeln!(output, "Could not reset the simulated remote: {e}"),
    }
}

/// Reads content lines until a lone `.` and saves them as the file.
fn write_file<I: BufRead, O: Write>(
    session: &mut Session,
    path: &str,
    input: &mut I,
    output: &mut O,
) -> io::Result<()> {
    if path.is_empty() {
        return writeln!(output, "Usage: :write <file>");
    }
    writeln!(output, "Enter the content of {path}. Finish with a line containing only \".\"")?;
    output.flush()?;

    let mut content = String::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "." {
            break;
        }
        content.push_str(line);
        content.push('\n');
    }

    session.write_file(path, &content);
    writeln!(output, "Saved {path} ({} bytes)", content.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crate::storage::MemoryRemoteStore;
    use crate::vcs::Signature;

    fn transcript(activity: &str, script: &str) -> (Session, String) {
        let catalog = Catalog::builtin().unwrap();
        let mut session = Session::new(
            Box::new(MemoryRemoteStore::new()),
            Signature {
                name: "Learner".into(),
                email: "learner@example.com".into(),
            },
        );
        session
            .select_activity(catalog.get(activity).cloned())
            .unwrap();
        let mut out = Vec::new();
        run(&mut session, &catalog, Cursor::new(script), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn greets_with_the_activity() {
        let (_, out) = transcript("act-1", ":quit\n");
        assert!(out.starts_with("Activity 1: local Git basics\n"));
    }

    #[test]
    fn prompt_follows_the_branch() {
        let (_, out) = transcript(
            "act-1",
            "git init\ngit add README.md\ngit commit -m first\ngit checkout -b work\n:quit\n",
        );
        assert!(out.contains("\nmain$ "), "{out}");
        assert!(out.contains("\nwork$ "), "{out}");
    }

    #[test]
    fn hints_are_printed_apart_from_the_response() {
        let (_, out) = transcript("act-1", "git init\n:quit\n");
        assert!(out.contains("Initialized empty Git repository in /repo/.git"));
        assert!(out.contains("\nHint:\n  "));
        assert!(!out.contains(crate::hint::HINT_START));
    }

    #[test]
    fn write_collects_lines_until_a_dot() {
        let (session, out) = transcript(
            "act-1",
            ":write index.html\n<h1>Git</h1>\n<p>hi</p>\n.\n:quit\n",
        );
        assert_eq!(
            session.engine().read_file("index.html"),
            Some("<h1>Git</h1>\n<p>hi</p>\n")
        );
        assert!(out.contains("Saved index.html (23 bytes)"));
    }

    #[test]
    fn missions_report_after_a_commit() {
        let (_, out) = transcript(
            "act-1",
            "git init\n\
             touch index.html\n\
             git add index.html\n\
             git commit -m \"Primer commit\"\n\
             :missions\n",
        );
        assert!(out.contains("[x] Mission 1: your first commit"), "{out}");
        assert!(out.contains("1/1 missions complete"));
    }

    #[test]
    fn activity_switch_resets_the_tree() {
        let (session, out) = transcript("act-1", "touch notes.txt\n:activity act-3\n:quit\n");
        assert!(out.contains("Activity 3: Git, GitHub and HTML"));
        assert!(!session.engine().file_exists("notes.txt"));
        assert!(session.engine().file_exists("index.html"));
    }

    #[test]
    fn unknown_meta_commands_are_reported() {
        let (_, out) = transcript("act-1", ":frobnicate\n:activity act-99\n");
        assert!(out.contains("Unknown shell command: :frobnicate"));
        assert!(out.contains("Unknown activity: act-99"));
    }

    #[test]
    fn listing_activities() {
        let (_, out) = transcript("act-1", ":activity\n:quit\n");
        assert!(out.contains("act-4  Activity 4: pull requests and pages (3 missions)"));
    }
}
