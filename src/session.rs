//! A learner's session: one lesson, one working tree, one simulated remote.
//!
//! Everything session-scoped lives in [`Session`]; nothing is global.
//! Commands flow parser → activity gate → dispatcher, and every outcome,
//! success or failure, comes back as the text to show.

use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::dispatch::Dispatcher;
use crate::error::{CommandError, Result};
use crate::gate::{self, ActivityGate};
use crate::hint::HintEngine;
use crate::mission;
use crate::model::{ActivityConfig, MissionRef, MissionResult};
use crate::parser;
use crate::remote::{RemoteError, RemoteSimulator};
use crate::storage::RemoteStore;
use crate::vcs::{MemoryRepository, Signature, VersionControl};

pub struct Session<E = MemoryRepository> {
    id: Uuid,
    activity: Option<ActivityConfig>,
    engine: E,
    remote: RemoteSimulator,
    hints: HintEngine,
    author: Signature,
}

impl Session {
    /// A session over a fresh in-memory repository.
    pub fn new(store: Box<dyn RemoteStore>, author: Signature) -> Self {
        Self::with_engine(MemoryRepository::new(), store, author)
    }
}

impl<E: VersionControl> Session<E> {
    pub fn with_engine(engine: E, store: Box<dyn RemoteStore>, author: Signature) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity: None,
            engine,
            remote: RemoteSimulator::new(store),
            hints: HintEngine::new(),
            author,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn activity(&self) -> Option<&ActivityConfig> {
        self.activity.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn remote(&self) -> &RemoteSimulator {
        &self.remote
    }

    /// Switches lessons. The working tree, the remote record and the
    /// hint state all start over, then the lesson's seed files are written
    /// as untracked files.
    pub fn select_activity(
        &mut self,
        activity: Option<ActivityConfig>,
    ) -> core::result::Result<(), RemoteError> {
        self.engine.clear();
        self.hints = HintEngine::new();
        self.remote.reset()?;

        if let Some(activity) = &activity {
            for seed in &activity.seed_files {
                self.engine.write_file(&seed.path, &seed.content);
            }
            info!(
                session = %self.id,
                activity = %activity.id,
                seeds = activity.seed_files.len(),
                "selected activity"
            );
        }
        self.activity = activity;
        Ok(())
    }

    /// Runs one line of input. Never fails: errors become their message.
    pub fn execute(&mut self, input: &str) -> String {
        let span = info_span!("command", session = %self.id);
        let _enter = span.enter();

        match self.run(input) {
            Ok(response) => response,
            Err(err) => {
                debug!(kind = err.kind(), "command failed");
                err.to_string()
            }
        }
    }

    fn run(&mut self, input: &str) -> Result<String> {
        let Some(intent) = parser::parse(input)? else {
            return Ok(String::new());
        };

        if let Some(key) = gate::canonicalize(input) {
            let gate = ActivityGate::new(self.activity.as_ref());
            if !gate.is_allowed(&key) {
                return Err(CommandError::Blocked {
                    activity: gate.activity_title().to_string(),
                    key,
                });
            }
        }

        Dispatcher::new(
            &mut self.engine,
            &mut self.remote,
            &mut self.hints,
            &self.author,
        )
        .execute(intent)
    }

    /// Evaluates every mission of the current lesson, in order.
    pub fn validate_missions(&self) -> Vec<(&MissionRef, MissionResult)> {
        self.activity
            .iter()
            .flat_map(|activity| activity.missions.iter())
            .map(|m| (m, mission::validate(&m.check, &self.engine, &self.remote)))
            .collect()
    }

    /// Replaces a file's content, as an editor save would.
    pub fn write_file(&mut self, path: &str, content: &str) {
        debug!(session = %self.id, path, bytes = content.len(), "file written");
        self.engine.write_file(path, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::Catalog;
    use crate::hint::{HINT_END, HINT_START};
    use crate::storage::MemoryRemoteStore;

    fn session(activity: Option<&str>) -> Session {
        let mut session = Session::new(
            Box::new(MemoryRemoteStore::new()),
            Signature {
                name: "Learner".into(),
                email: "learner@example.com".into(),
            },
        );
        let config = activity.map(|id| Catalog::builtin().unwrap().get(id).unwrap().clone());
        session.select_activity(config).unwrap();
        session
    }

    fn mission(session: &Session, id: &str) -> MissionResult {
        session
            .validate_missions()
            .into_iter()
            .find(|(m, _)| m.id == id)
            .map(|(_, result)| result)
            .unwrap_or_else(|| panic!("no mission {id}"))
    }

    #[test]
    fn blank_input_prints_nothing() {
        let mut session = session(None);
        assert_eq!(session.execute(""), "");
        assert_eq!(session.execute("   "), "");
    }

    #[test]
    fn first_commit_completes_mission_one() {
        let mut session = session(Some("act-1"));
        session.execute("git init");
        session.execute("touch index.html");
        session.execute("git add index.html");
        session.execute(r#"git commit -m "Primer commit""#);

        let result = mission(&session, "m1");
        assert!(result.ok, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn pushing_without_commits_changes_nothing() {
        let mut session = session(Some("act-2"));
        session.execute("git init");
        session.execute("github create demo");
        let response = session.execute("git push origin main");
        assert!(response.contains("Could not read branch 'main'"), "{response}");

        let remote = session.remote().repository().unwrap().unwrap();
        assert!(remote.commits.is_empty());
        assert_eq!(remote.last_pushed_branch, None);
    }

    #[test]
    fn blocked_commands_name_the_activity() {
        let mut session = session(Some("act-1"));
        session.execute("git init");
        let response = session.execute("git push origin main");
        assert!(response.contains("\"git push\" is not available in Activity 1: local Git basics"));
        assert!(session.execute("github create demo").contains("not available"));
        assert!(session.remote().repository().unwrap().is_none());
    }

    #[test]
    fn quoting_a_command_does_not_get_past_the_gate() {
        let mut session = session(Some("act-1"));
        let response = session.execute("\"github\" create demo");
        assert!(response.contains("\"github create\" is not available"), "{response}");
        let response = session.execute("git \"push\" origin main");
        assert!(response.contains("\"git push\" is not available"), "{response}");
        assert!(session.remote().repository().unwrap().is_none());
    }

    #[test]
    fn misspellings_are_suggested_even_when_gated() {
        let mut session = session(Some("act-1"));
        let response = session.execute("git stauts");
        assert!(response.contains("Did you mean \"git status\"?"), "{response}");
    }

    #[test]
    fn hints_are_shown_once() {
        let mut session = session(None);
        let first = session.execute("git init");
        assert!(first.contains(HINT_START) && first.contains(HINT_END));
        session.execute("git init");
        let again = session.execute("git status");
        assert!(again.contains(HINT_START));
        assert!(!session.execute("git status").contains(HINT_START));
    }

    #[test]
    fn switching_activity_resets_everything() {
        let mut session = session(Some("act-2"));
        session.execute("git init");
        session.execute("github create demo");
        session.execute("touch notes.txt");

        let act3 = Catalog::builtin().unwrap().get("act-3").unwrap().clone();
        session.select_activity(Some(act3)).unwrap();

        assert!(!session.engine().is_initialized());
        assert!(session.remote().repository().unwrap().is_none());
        assert!(!session.engine().file_exists("notes.txt"));
        assert_eq!(
            session.engine().visible_files(),
            vec!["README.md".to_string(), "index.html".to_string()]
        );
        assert!(session.execute("git init").contains(HINT_START));
    }

    #[test]
    fn same_line_edits_conflict_and_are_listed() {
        let mut session = session(Some("act-3"));
        session.execute("git init");
        session.execute("git add index.html");
        session.execute("git add README.md");
        session.execute("git commit -m base");
        let seeded = session.engine().read_file("index.html").unwrap().to_string();

        session.execute("git checkout -b other");
        session.write_file(
            "index.html",
            &seeded.replace("<h1>Practicing Git</h1>", "<h1>Git on other</h1>"),
        );
        session.execute("git add index.html");
        session.execute("git commit -m other");

        session.execute("git checkout main");
        session.write_file(
            "index.html",
            &seeded.replace("<h1>Practicing Git</h1>", "<h1>Git on main</h1>"),
        );
        session.execute("git add index.html");
        session.execute("git commit -m main");

        let merged = session.execute("git merge other");
        assert!(merged.contains("Merge conflict between main and other"), "{merged}");

        let listed = session.execute("git conflicts");
        assert!(listed.contains("Files with conflicts:\n  - index.html"), "{listed}");
        assert!(!listed.contains("README.md"));
        assert!(mission(&session, "m7").ok);
    }

    #[test]
    fn activity_three_walkthrough() {
        let mut session = session(Some("act-3"));
        session.execute("git init");
        session.execute("git add index.html");
        session.execute(r#"git commit -m "Primer commit""#);
        assert!(mission(&session, "m1").ok);
        assert!(mission(&session, "m5").ok);
        assert!(!mission(&session, "m2").ok);

        session.execute("github create demo");
        session.execute("git push origin main");
        assert!(mission(&session, "m2").ok);
        assert!(!mission(&session, "m3").ok);

        session.execute("git add README.md");
        session.execute(r#"git commit -m "Add readme""#);
        session.execute("git push origin main");
        assert!(mission(&session, "m3").ok);

        session.execute("git checkout -b feature/login");
        session.write_file("login.html", "<h1>Login</h1>\n");
        session.execute("git add login.html");
        session.execute(r#"git commit -m "Login page""#);
        session.execute("git push origin feature/login");
        assert!(mission(&session, "m4").ok);

        session.execute("github pr create feature/login main");
        assert!(mission(&session, "m9").ok);

        assert!(!mission(&session, "m6").ok);
        session.execute("git checkout main");
        assert!(session.execute("git merge feature/login").contains("Fast-forward"));
        assert!(mission(&session, "m6").ok);

        session.execute("git checkout -b conflict");
        let seeded = session.engine().read_file("index.html").unwrap().to_string();
        session.write_file(
            "index.html",
            &seeded.replace("<h1>Practicing Git</h1>", "<h1>Git from a branch</h1>"),
        );
        session.execute("git add index.html");
        session.execute(r#"git commit -m "Branch title""#);
        session.execute("git checkout main");
        session.write_file(
            "index.html",
            &seeded.replace("<h1>Practicing Git</h1>", "<h1>Git from main</h1>"),
        );
        session.execute("git add index.html");
        session.execute(r#"git commit -m "Main title""#);
        session.execute("git merge conflict");
        assert!(mission(&session, "m7").ok);
        assert!(!mission(&session, "m8").ok);

        session.write_file(
            "index.html",
            &seeded.replace("<h1>Practicing Git</h1>", "<h1>Git, resolved</h1>"),
        );
        session.execute("git add index.html");
        let committed = session.execute(r#"git commit -m "Resolve conflict""#);
        assert!(committed.contains("Commit created"), "{committed}");
        assert!(mission(&session, "m8").ok);
        assert!(!mission(&session, "m7").ok);
    }

    #[test]
    fn missions_follow_the_selected_activity() {
        let session = session(Some("act-2"));
        let ids: Vec<&str> = session
            .validate_missions()
            .into_iter()
            .map(|(m, _)| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["m1", "m2", "m3", "m4", "m6"]);

        let without_activity = self::session(None);
        assert!(without_activity.validate_missions().is_empty());
    }
}
