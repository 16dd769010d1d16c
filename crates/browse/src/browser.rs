//! Drives a [`BrowseSession`] through a [`Prompter`].

use std::path::Path;

use {
    skillbox_skills::{ClassifiedEntry, EntryKind, entries::directory_entries},
    tracing::debug,
};

use crate::{
    error::Result,
    prompt::{Choice, NoteLevel, Prompter, Validator},
    state::{Action, BrowseSession, Loaded, MenuItem, Outcome, Transition},
};

enum SearchResult {
    Chosen(Action),
    Back,
    Cancelled,
}

/// Let the user walk the tree under `root` and pick skills and resources.
///
/// Returns [`Outcome::Cancelled`] when the user cancels, interrupts a prompt,
/// or the root has nothing to offer. Fails only if `root` cannot be listed.
pub async fn browse_and_select(root: &Path, prompter: &mut dyn Prompter) -> Result<Outcome> {
    let mut session = BrowseSession::new();

    loop {
        let entries = directory_entries(root, session.current_path()).await?;
        match session.load(entries) {
            Loaded::Ready => {},
            Loaded::MovedUp { from } => {
                prompter.note(NoteLevel::Muted, &format!("Nothing to show in {from}, going back"));
                continue;
            },
            Loaded::Finished(outcome) => {
                prompter.note(NoteLevel::Warn, "No skills or resources found");
                return Ok(outcome);
            },
        }

        // Prompt until the view changes or the session ends.
        loop {
            let items = session.menu();
            let choices = items.iter().map(|item| menu_choice(item, &session)).collect();
            let Some(index) = prompter.select(&header(&session), choices, 0)? else {
                return Ok(Outcome::Cancelled);
            };
            let Some(item) = items.get(index) else {
                continue;
            };

            let action = match item.action() {
                Some(action) => action,
                None => match search(&session, prompter)? {
                    SearchResult::Chosen(action) => action,
                    SearchResult::Back => continue,
                    SearchResult::Cancelled => return Ok(Outcome::Cancelled),
                },
            };
            debug!(?action, path = session.current_path(), "browse action");

            match session.apply(action) {
                Transition::Moved => break,
                Transition::Updated | Transition::Ignored => {},
                Transition::NothingSelected => {
                    prompter.note(NoteLevel::Warn, "No items selected yet");
                },
                Transition::Finished(outcome) => return Ok(outcome),
            }
        }
    }
}

fn search(session: &BrowseSession, prompter: &mut dyn Prompter) -> Result<SearchResult> {
    let Some(query) = prompter.text("Search", None, Some(Validator::required("Enter a search term")))?
    else {
        return Ok(SearchResult::Cancelled);
    };
    let hits = session.search(&query);
    if hits.is_empty() {
        prompter.note(NoteLevel::Warn, &format!("No matches for \"{}\"", query.trim()));
        return Ok(SearchResult::Back);
    }

    let mut choices: Vec<Choice> = hits
        .iter()
        .map(|entry| entry_choice(entry, session.is_selected(&entry.path)))
        .collect();
    choices.push(Choice::new("← Back"));
    let message = format!("{} match(es)", hits.len());
    match prompter.select(&message, choices, 0)? {
        None => Ok(SearchResult::Cancelled),
        Some(index) => Ok(hits
            .get(index)
            .map(|entry| SearchResult::Chosen(Action::Activate(entry.path.clone())))
            .unwrap_or(SearchResult::Back)),
    }
}

fn header(session: &BrowseSession) -> String {
    let count = session.selected().len();
    format!("/{}  ({count} selected)", session.current_path())
}

fn entry_choice(entry: &ClassifiedEntry, selected: bool) -> Choice {
    let label = match entry.kind {
        EntryKind::Directory => format!("📁 {}/", entry.name),
        EntryKind::Skill if entry.is_root() => {
            format!("{} ⭐ {} (repository root)", mark(selected), entry.name)
        },
        EntryKind::Skill => format!("{} ⭐ {}", mark(selected), entry.name),
        EntryKind::Resource => format!("{} 📄 {}", mark(selected), entry.name),
    };
    let choice = Choice::new(label);
    match &entry.description {
        Some(description) => choice.with_hint(description.clone()),
        None => choice,
    }
}

fn mark(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn menu_choice(item: &MenuItem, session: &BrowseSession) -> Choice {
    match item {
        MenuItem::Up => Choice::new("..").with_hint("parent directory"),
        MenuItem::Open(entry) => entry_choice(entry, false),
        MenuItem::Pick { entry, selected } => entry_choice(entry, *selected),
        MenuItem::ToggleAll { all_selected: true } => Choice::new("Deselect all here"),
        MenuItem::ToggleAll {
            all_selected: false,
        } => Choice::new("Select all here"),
        MenuItem::Search => Choice::new("🔍 Search"),
        MenuItem::Confirm { count } => {
            Choice::new(format!("✅ Confirm ({count} selected)")).with_hint(summary(session))
        },
        MenuItem::Cancel => Choice::new("❌ Cancel"),
    }
}

fn summary(session: &BrowseSession) -> String {
    if session.selected().is_empty() {
        return "nothing selected".into();
    }
    session
        .selected()
        .iter()
        .map(|path| {
            session
                .cached(path)
                .map_or(path.as_str(), |entry| entry.name.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::prompt::{Answer, scripted::ScriptedPrompter},
    };

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn pick(index: usize) -> Option<Answer> {
        Some(Answer::Index(index))
    }

    /// root: `dirA/` (an `inner` skill and a `loose` resource), `skillB`.
    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "dirA/inner/skill.md", "# Inner");
        write(tmp.path(), "dirA/loose/notes.txt", "n");
        write(tmp.path(), "skillB/SKILL.md", "# Skill B");
        tmp
    }

    #[tokio::test]
    async fn toggle_and_confirm() {
        let tmp = fixture();
        // Root menu: [dirA, skillB, toggle-all, search, confirm, cancel]
        let mut p = ScriptedPrompter::new([pick(1), pick(4)]);

        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        let picked = outcome.into_candidates();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "skillB");
        assert!(picked[0].has_skill_file);
        assert_eq!(picked[0].description.as_deref(), Some("Skill B"));
    }

    #[tokio::test]
    async fn empty_confirm_reprompts() {
        let tmp = fixture();
        let mut p = ScriptedPrompter::new([pick(4), pick(5)]);

        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(p.noted("No items selected yet"));
        assert_eq!(p.asked.len(), 2);
    }

    #[tokio::test]
    async fn selections_made_in_subdirectories_survive_going_back() {
        let tmp = fixture();
        let mut p = ScriptedPrompter::new([
            pick(0), // open dirA
            // dirA menu: [.., inner, loose, toggle-all, search, confirm, cancel]
            pick(3), // select all here
            pick(0), // back to root
            pick(1), // toggle skillB
            pick(4), // confirm
        ]);

        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        let paths: Vec<String> = outcome.into_candidates().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["dirA/inner", "dirA/loose", "skillB"]);
    }

    #[tokio::test]
    async fn interrupt_cancels() {
        let tmp = fixture();
        let mut p = ScriptedPrompter::new([pick(1), None]);
        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
    }

    #[tokio::test]
    async fn search_picks_a_match() {
        let tmp = fixture();
        let mut p = ScriptedPrompter::new([
            pick(3), // search
            Some(Answer::Text("skill b".into())),
            pick(0), // the only hit
            pick(4), // confirm
        ]);

        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        let names: Vec<String> = outcome.into_candidates().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["skillB"]);
    }

    #[tokio::test]
    async fn search_without_hits_goes_back_and_interrupt_cancels() {
        let tmp = fixture();
        let mut p = ScriptedPrompter::new([
            pick(3),
            Some(Answer::Text("nothing-like-this".into())),
            pick(3),
            None,
        ]);
        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(p.noted("No matches"));
    }

    #[tokio::test]
    async fn empty_root_cancels_without_prompting() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("empty")).unwrap();
        let mut p = ScriptedPrompter::new([]);

        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(p.asked.is_empty());
    }

    /// Empties a directory right before answering the first prompt.
    struct EmptyingPrompter {
        inner: ScriptedPrompter,
        doomed: Option<std::path::PathBuf>,
    }

    impl Prompter for EmptyingPrompter {
        fn ask(&mut self, prompt: &crate::prompt::Prompt) -> Result<Option<Answer>> {
            if let Some(dir) = self.doomed.take() {
                for entry in std::fs::read_dir(&dir).unwrap() {
                    std::fs::remove_dir_all(entry.unwrap().path()).unwrap();
                }
            }
            self.inner.ask(prompt)
        }

        fn note(&mut self, level: NoteLevel, text: &str) {
            self.inner.note(level, text);
        }
    }

    #[tokio::test]
    async fn emptied_directory_steps_back_up() {
        let tmp = fixture();
        let mut p = EmptyingPrompter {
            // Open dirA, which is empty by now; back at the root only skillB
            // is left: [skillB, toggle-all, search, confirm, cancel].
            inner: ScriptedPrompter::new([pick(0), pick(4)]),
            doomed: Some(tmp.path().join("dirA")),
        };

        let outcome = browse_and_select(tmp.path(), &mut p).await.unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(p.inner.noted("Nothing to show in dirA"));
        assert_eq!(p.inner.last_labels()[0], "[ ] ⭐ skillB");
    }

    #[tokio::test]
    async fn labels_show_kind_and_selection() {
        let tmp = fixture();
        let mut p = ScriptedPrompter::new([pick(1), None]);
        browse_and_select(tmp.path(), &mut p).await.unwrap();

        let labels = p.last_labels();
        assert_eq!(labels[0], "📁 dirA/");
        assert_eq!(labels[1], "[x] ⭐ skillB");
        assert_eq!(labels[2], "Deselect all here");
        assert_eq!(labels[4], "✅ Confirm (1 selected)");
    }
}
