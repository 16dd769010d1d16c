//! Pure state machine for the browse-and-select session. No I/O.
//!
//! The driver lists the directory at [`BrowseSession::current_path`], feeds
//! the entries to [`BrowseSession::load`], then applies user [`Action`]s
//! until one yields [`Transition::Moved`] (list again) or
//! [`Transition::Finished`].

use std::collections::HashMap;

use skillbox_common::relpath;
use skillbox_skills::{ClassifiedEntry, SkillCandidate};

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a directory.
    Navigate(String),
    /// Go to the parent directory.
    Up,
    /// Flip one selectable entry in or out of the selection.
    Toggle(String),
    /// Select every selectable entry at this level, or clear them if all are
    /// already selected.
    ToggleAll,
    /// Open or toggle an entry of the current listing, depending on its kind.
    Activate(String),
    Confirm,
    Cancel,
}

/// How the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Non-empty, in selection order.
    Selected(Vec<SkillCandidate>),
    Cancelled,
}

impl Outcome {
    /// Candidates to install; empty when cancelled.
    pub fn into_candidates(self) -> Vec<SkillCandidate> {
        match self {
            Self::Selected(candidates) => candidates,
            Self::Cancelled => Vec::new(),
        }
    }
}

/// Result of feeding a fresh listing to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    Ready,
    /// The listing was empty; the session stepped up to the parent and needs
    /// another listing.
    MovedUp { from: String },
    /// Empty at the root: nothing to browse.
    Finished(Outcome),
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// `current_path` changed; list it and call [`BrowseSession::load`].
    Moved,
    /// Selection changed.
    Updated,
    /// The action did not apply here.
    Ignored,
    /// Confirm with an empty selection. The session keeps going.
    NothingSelected,
    Finished(Outcome),
}

/// One line of the browser menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Up,
    Open(ClassifiedEntry),
    Pick {
        entry: ClassifiedEntry,
        selected: bool,
    },
    ToggleAll {
        all_selected: bool,
    },
    Search,
    Confirm {
        count: usize,
    },
    Cancel,
}

impl MenuItem {
    /// The action this item stands for. Search needs a follow-up prompt.
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Up => Some(Action::Up),
            Self::Open(entry) => Some(Action::Navigate(entry.path.clone())),
            Self::Pick { entry, .. } => Some(Action::Toggle(entry.path.clone())),
            Self::ToggleAll { .. } => Some(Action::ToggleAll),
            Self::Search => None,
            Self::Confirm { .. } => Some(Action::Confirm),
            Self::Cancel => Some(Action::Cancel),
        }
    }
}

/// One user's browse over one scan root.
#[derive(Debug, Clone, Default)]
pub struct BrowseSession {
    current_path: String,
    listing: Vec<ClassifiedEntry>,
    /// Unique paths, in the order they were first selected.
    selected: Vec<String>,
    /// Every entry seen during the session. Never shrinks.
    cache: HashMap<String, ClassifiedEntry>,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// `""` is the root.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn at_root(&self) -> bool {
        self.current_path.is_empty()
    }

    pub fn listing(&self) -> &[ClassifiedEntry] {
        &self.listing
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.iter().any(|p| p == path)
    }

    pub fn cached(&self, path: &str) -> Option<&ClassifiedEntry> {
        self.cache.get(path)
    }

    /// Install the listing of `current_path`.
    pub fn load(&mut self, entries: Vec<ClassifiedEntry>) -> Loaded {
        for entry in &entries {
            self.cache.insert(entry.path.clone(), entry.clone());
        }
        if !entries.is_empty() {
            self.listing = entries;
            return Loaded::Ready;
        }

        self.listing.clear();
        if self.at_root() {
            return Loaded::Finished(Outcome::Cancelled);
        }
        let from = std::mem::take(&mut self.current_path);
        self.current_path = relpath::parent(&from);
        Loaded::MovedUp { from }
    }

    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::Navigate(path) => {
                self.current_path = path;
                Transition::Moved
            },
            Action::Up => {
                if self.at_root() {
                    return Transition::Ignored;
                }
                self.current_path = relpath::parent(&self.current_path);
                Transition::Moved
            },
            Action::Toggle(path) => self.toggle(&path),
            Action::ToggleAll => self.toggle_all(),
            Action::Activate(path) => {
                match self.listing.iter().find(|e| e.path == path).map(|e| e.kind) {
                    Some(kind) if kind.is_selectable() => self.toggle(&path),
                    Some(_) => self.apply(Action::Navigate(path)),
                    None => Transition::Ignored,
                }
            },
            Action::Confirm => {
                if self.selected.is_empty() {
                    Transition::NothingSelected
                } else {
                    Transition::Finished(Outcome::Selected(self.materialize()))
                }
            },
            Action::Cancel => Transition::Finished(Outcome::Cancelled),
        }
    }

    /// Current-level entries matching `query` by name or description.
    pub fn search(&self, query: &str) -> Vec<&ClassifiedEntry> {
        let query = query.trim();
        self.listing.iter().filter(|e| e.matches(query)).collect()
    }

    /// The menu for the current level, in display order.
    pub fn menu(&self) -> Vec<MenuItem> {
        let mut items = Vec::with_capacity(self.listing.len() + 5);
        if !self.at_root() {
            items.push(MenuItem::Up);
        }
        for entry in &self.listing {
            if entry.kind.is_selectable() {
                items.push(MenuItem::Pick {
                    selected: self.is_selected(&entry.path),
                    entry: entry.clone(),
                });
            } else {
                items.push(MenuItem::Open(entry.clone()));
            }
        }
        if self.selectable_here().next().is_some() {
            items.push(MenuItem::ToggleAll {
                all_selected: self.all_selected_here(),
            });
        }
        items.push(MenuItem::Search);
        items.push(MenuItem::Confirm {
            count: self.selected.len(),
        });
        items.push(MenuItem::Cancel);
        items
    }

    fn toggle(&mut self, path: &str) -> Transition {
        let selectable = self
            .cache
            .get(path)
            .is_some_and(|entry| entry.kind.is_selectable());
        if !selectable {
            return Transition::Ignored;
        }
        match self.selected.iter().position(|p| p == path) {
            Some(index) => {
                self.selected.remove(index);
            },
            None => self.selected.push(path.to_string()),
        }
        Transition::Updated
    }

    fn toggle_all(&mut self) -> Transition {
        let here: Vec<String> = self.selectable_here().map(|e| e.path.clone()).collect();
        if here.is_empty() {
            return Transition::Ignored;
        }
        if self.all_selected_here() {
            self.selected.retain(|p| !here.contains(p));
        } else {
            for path in here {
                if !self.is_selected(&path) {
                    self.selected.push(path);
                }
            }
        }
        Transition::Updated
    }

    fn selectable_here(&self) -> impl Iterator<Item = &ClassifiedEntry> {
        self.listing.iter().filter(|e| e.kind.is_selectable())
    }

    fn all_selected_here(&self) -> bool {
        self.selectable_here().all(|e| self.is_selected(&e.path))
    }

    fn materialize(&self) -> Vec<SkillCandidate> {
        self.selected
            .iter()
            .filter_map(|path| self.cache.get(path))
            .map(ClassifiedEntry::to_candidate)
            .collect()
    }
}
