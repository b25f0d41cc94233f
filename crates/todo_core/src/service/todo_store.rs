//! Todo list store: the single owner of the ordered todo collection.
//!
//! # Responsibility
//! - Enforce text/identity invariants on every add and edit.
//! - Apply ordered mutations (prepend, move, remove, in-place update).
//! - Serve filtered/searched views and aggregate stats.
//! - Persist the whole collection as one JSON blob after every mutation.
//!
//! # Invariants
//! - Ids are unique; trimmed texts are unique ignoring case; text is never
//!   blank.
//! - A mutation is committed in memory only after its blob write succeeds,
//!   so a failed operation leaves the collection untouched.
//! - Loading never fails: unreadable or inconsistent blobs yield an empty
//!   collection and a `LoadOutcome::Recovered` report.
//! - Todo text is never written to logs.

use crate::config::StoreConfig;
use crate::model::query::{FilterStatus, TodoStats};
use crate::model::todo::{match_key, Todo, TodoId, TodoValidationError};
use crate::repo::blob_store::{BlobStore, RepoError};
use log::{debug, info, warn};
use serde_json::error::Category;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Text is blank or duplicates another todo.
    Validation(TodoValidationError),
    /// No todo has the given id.
    NotFound(TodoId),
    /// A reorder index is outside `[0, len - 1]`.
    IndexOutOfRange { from: usize, to: usize, len: usize },
    /// The collection could not be encoded.
    Serialize(serde_json::Error),
    /// The blob store rejected the write.
    Repo(RepoError),
}

impl StoreError {
    /// Stable machine-readable code for logs and UI message lookup.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(TodoValidationError::EmptyText) => "empty_text",
            Self::Validation(TodoValidationError::DuplicateText(_)) => "duplicate_text",
            Self::Validation(TodoValidationError::EmptyId) => "empty_id",
            Self::NotFound(_) => "not_found",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::Serialize(_) => "serialize_failed",
            Self::Repo(_) => "storage_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::IndexOutOfRange { from, to, len } => write!(
                f,
                "reorder indices out of range: from={from} to={to} len={len}"
            ),
            Self::Serialize(err) => write!(f, "failed to encode todo collection: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) | Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<TodoValidationError> for StoreError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Why a persisted collection was discarded at load time.
#[derive(Debug)]
pub enum LoadError {
    /// The blob store could not be read.
    Repo(RepoError),
    /// The blob is not a valid JSON todo list.
    ///
    /// Only the error category and position are kept; the decoder message
    /// quotes offending values, which may be todo text.
    Malformed {
        category: &'static str,
        line: usize,
        column: usize,
    },
    /// The blob parsed but breaks collection invariants.
    Inconsistent(String),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "failed to read stored todos: {err}"),
            Self::Malformed {
                category,
                line,
                column,
            } => write!(
                f,
                "stored todos are malformed: {category} error at line {line} column {column}"
            ),
            Self::Inconsistent(message) => write!(f, "stored todos are inconsistent: {message}"),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        let category = match value.classify() {
            Category::Io => "io",
            Category::Syntax => "syntax",
            Category::Data => "data",
            Category::Eof => "eof",
        };
        Self::Malformed {
            category,
            line: value.line(),
            column: value.column(),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Malformed { .. } | Self::Inconsistent(_) => None,
        }
    }
}

/// Result of the most recent [`TodoStore::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing was stored under the key.
    Empty,
    /// The stored collection was loaded.
    Loaded { count: usize },
    /// The stored blob was unusable; the store started empty.
    Recovered(LoadError),
}

/// Owner of the ordered todo collection.
///
/// Callers hold one instance and route every mutation through it.
pub struct TodoStore<S: BlobStore> {
    storage: S,
    config: StoreConfig,
    todos: Vec<Todo>,
    last_load: LoadOutcome,
}

impl<S: BlobStore> TodoStore<S> {
    /// Opens a store on `storage` with the default key and loads it.
    pub fn open(storage: S) -> Self {
        Self::open_with_config(storage, StoreConfig::default())
    }

    /// Opens a store with explicit settings and loads it.
    pub fn open_with_config(storage: S, config: StoreConfig) -> Self {
        let mut store = Self {
            storage,
            config,
            todos: Vec::new(),
            last_load: LoadOutcome::Empty,
        };
        store.load();
        store
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// Never fails. On any read, decode or consistency error the collection
    /// becomes empty and the stored blob is left as-is until the next save.
    pub fn load(&mut self) -> &LoadOutcome {
        let started_at = Instant::now();
        let (todos, outcome) = match read_collection(&self.storage, self.config.storage_key()) {
            Ok(Some(todos)) => {
                let count = todos.len();
                (todos, LoadOutcome::Loaded { count })
            }
            Ok(None) => (Vec::new(), LoadOutcome::Empty),
            Err(err) => {
                warn!(
                    "event=todo_load module=store status=recovered duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                (Vec::new(), LoadOutcome::Recovered(err))
            }
        };

        if !matches!(outcome, LoadOutcome::Recovered(_)) {
            info!(
                "event=todo_load module=store status=ok count={} duration_ms={}",
                todos.len(),
                started_at.elapsed().as_millis()
            );
        }

        self.todos = todos;
        self.last_load = outcome;
        &self.last_load
    }

    /// Writes the current collection to the blob store.
    ///
    /// Writing twice without a mutation in between produces identical blobs.
    pub fn save(&mut self) -> StoreResult<()> {
        let blob = encode_collection(&self.todos, self.config.pretty_json)?;
        self.storage.set(self.config.storage_key(), &blob)?;
        debug!(
            "event=todo_save module=store status=ok count={} bytes={}",
            self.todos.len(),
            blob.len()
        );
        Ok(())
    }

    /// Flushes the collection and hands the blob store back.
    pub fn close(mut self) -> StoreResult<S> {
        self.save()?;
        info!(
            "event=todo_close module=store status=ok count={}",
            self.todos.len()
        );
        Ok(self.storage)
    }

    /// Checks `text` against the empty and duplicate rules.
    ///
    /// The todo identified by `exclude` is skipped by the duplicate check so
    /// an edit may keep (or re-case) its own text.
    pub fn validate(
        &self,
        text: &str,
        exclude: Option<&TodoId>,
    ) -> Result<(), TodoValidationError> {
        let key = match_key(text);
        if key.is_empty() {
            return Err(TodoValidationError::EmptyText);
        }

        let duplicate = self
            .todos
            .iter()
            .any(|todo| Some(&todo.id) != exclude && todo.match_key() == key);
        if duplicate {
            return Err(TodoValidationError::DuplicateText(text.trim().to_string()));
        }

        Ok(())
    }

    /// Creates a todo from `text` and places it at index 0.
    pub fn add(&mut self, text: &str) -> StoreResult<Todo> {
        let result = self.try_add(text);
        log_outcome("todo_add", &result);
        result
    }

    /// Flips the completion flag of one todo.
    pub fn toggle(&mut self, id: &TodoId) -> StoreResult<Todo> {
        let result = self.try_toggle(id);
        log_outcome("todo_toggle", &result);
        result
    }

    /// Removes one todo; the rest keep their relative order.
    pub fn delete(&mut self, id: &TodoId) -> StoreResult<Todo> {
        let result = self.try_delete(id);
        log_outcome("todo_delete", &result);
        result
    }

    /// Replaces the text of one todo in place.
    ///
    /// Text is validated before the id is looked up, so blank or duplicate
    /// text is reported even for an unknown id.
    pub fn edit(&mut self, id: &TodoId, text: &str) -> StoreResult<Todo> {
        let result = self.try_edit(id, text);
        log_outcome("todo_edit", &result);
        result
    }

    /// Moves the todo at `from` so that it ends up at index `to`.
    ///
    /// Remove-then-insert semantics, not a swap. Returns the moved todo.
    pub fn reorder(&mut self, from: usize, to: usize) -> StoreResult<Todo> {
        let result = self.try_reorder(from, to);
        match &result {
            Ok(moved) => info!(
                "event=todo_reorder module=store status=ok todo_id={} from={} to={}",
                moved.id, from, to
            ),
            Err(err) => log_rejected("todo_reorder", err),
        }
        result
    }

    /// Returns todos passing `filter` whose text contains `search`
    /// (case-insensitive), in collection order.
    ///
    /// A blank `search` matches everything.
    pub fn query(&self, filter: FilterStatus, search: &str) -> Vec<&Todo> {
        let needle = search.trim().to_lowercase();
        self.todos
            .iter()
            .filter(|todo| filter.accepts(todo.completed))
            .filter(|todo| needle.is_empty() || todo.text.to_lowercase().contains(&needle))
            .collect()
    }

    /// Aggregate counters over the whole collection, ignoring any filter.
    pub fn stats(&self) -> TodoStats {
        let completed = self.todos.iter().filter(|todo| todo.completed).count();
        TodoStats::from_counts(self.todos.len(), completed)
    }

    /// The full collection in display order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Outcome of the most recent load.
    pub fn last_load(&self) -> &LoadOutcome {
        &self.last_load
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read access to the backing blob store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn try_add(&mut self, text: &str) -> StoreResult<Todo> {
        self.validate(text, None)?;

        let mut todo = Todo::new(text)?;
        while self.get(&todo.id).is_some() {
            todo.id = TodoId::generate();
        }

        let mut next = Vec::with_capacity(self.todos.len() + 1);
        next.push(todo.clone());
        next.extend(self.todos.iter().cloned());
        self.commit(next)?;
        Ok(todo)
    }

    fn try_toggle(&mut self, id: &TodoId) -> StoreResult<Todo> {
        let index = self.position(id)?;
        let mut next = self.todos.clone();
        next[index].completed = !next[index].completed;
        let updated = next[index].clone();
        self.commit(next)?;
        Ok(updated)
    }

    fn try_delete(&mut self, id: &TodoId) -> StoreResult<Todo> {
        let index = self.position(id)?;
        let mut next = self.todos.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    fn try_edit(&mut self, id: &TodoId, text: &str) -> StoreResult<Todo> {
        self.validate(text, Some(id))?;
        let index = self.position(id)?;
        let mut next = self.todos.clone();
        next[index].text = text.trim().to_string();
        let updated = next[index].clone();
        self.commit(next)?;
        Ok(updated)
    }

    fn try_reorder(&mut self, from: usize, to: usize) -> StoreResult<Todo> {
        let len = self.todos.len();
        if from >= len || to >= len {
            return Err(StoreError::IndexOutOfRange { from, to, len });
        }

        let mut next = self.todos.clone();
        let moved = next.remove(from);
        next.insert(to, moved.clone());
        self.commit(next)?;
        Ok(moved)
    }

    fn position(&self, id: &TodoId) -> StoreResult<usize> {
        self.todos
            .iter()
            .position(|todo| &todo.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Persists `next` and, only once the write succeeded, adopts it.
    fn commit(&mut self, next: Vec<Todo>) -> StoreResult<()> {
        let blob = encode_collection(&next, self.config.pretty_json)?;
        self.storage.set(self.config.storage_key(), &blob)?;
        self.todos = next;
        Ok(())
    }
}

fn encode_collection(todos: &[Todo], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(todos)
    } else {
        serde_json::to_string(todos)
    }
}

fn read_collection<S: BlobStore>(storage: &S, key: &str) -> Result<Option<Vec<Todo>>, LoadError> {
    let Some(blob) = storage.get(key).map_err(LoadError::Repo)? else {
        return Ok(None);
    };
    if blob.trim().is_empty() {
        return Ok(None);
    }

    let todos: Vec<Todo> = serde_json::from_str(&blob)?;
    check_collection(&todos).map_err(LoadError::Inconsistent)?;
    Ok(Some(todos))
}

fn check_collection(todos: &[Todo]) -> Result<(), String> {
    let mut ids = HashSet::with_capacity(todos.len());
    let mut keys = HashSet::with_capacity(todos.len());
    for (index, todo) in todos.iter().enumerate() {
        if !ids.insert(&todo.id) {
            return Err(format!("duplicate id `{}` at index {index}", todo.id));
        }
        if !keys.insert(todo.match_key()) {
            return Err(format!("duplicate text at index {index}"));
        }
    }
    Ok(())
}

fn log_outcome(event: &str, result: &StoreResult<Todo>) {
    match result {
        Ok(todo) => info!(
            "event={} module=store status=ok todo_id={} completed={}",
            event, todo.id, todo.completed
        ),
        Err(err) => log_rejected(event, err),
    }
}

fn log_rejected(event: &str, err: &StoreError) {
    match err {
        StoreError::Serialize(_) | StoreError::Repo(_) => warn!(
            "event={} module=store status=error error_code={} error={}",
            event,
            err.code(),
            err
        ),
        _ => debug!(
            "event={} module=store status=rejected error_code={}",
            event,
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{check_collection, encode_collection, read_collection, LoadError, StoreError};
    use crate::repo::memory::MemoryBlobStore;
    use crate::model::todo::{Todo, TodoId, TodoValidationError};
    use chrono::{TimeZone, Utc};

    fn todo(id: &str, text: &str) -> Todo {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Todo::with_id(TodoId::from(id), text, created_at).unwrap()
    }

    #[test]
    fn check_collection_rejects_duplicate_ids() {
        let err = check_collection(&[todo("a", "one"), todo("a", "two")]).unwrap_err();
        assert!(err.contains("duplicate id"));
    }

    #[test]
    fn check_collection_rejects_case_insensitive_duplicate_text() {
        let err = check_collection(&[todo("a", "Milk"), todo("b", "milk")]).unwrap_err();
        assert!(err.contains("index 1"));
        assert!(!err.contains("milk"), "text must not leak into messages");
    }

    #[test]
    fn malformed_blob_error_keeps_position_but_not_values() {
        let blob = r#"[{"id":"a","text":"Diary","completed":"my secret diary","createdAt":"2024-05-01T10:00:00Z"}]"#;
        let storage = MemoryBlobStore::with_entry("todos", blob);

        let err = read_collection(&storage, "todos").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Malformed {
                category: "data",
                line: 1,
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.contains("data error at line 1"));
        assert!(!message.contains("secret"), "stored values must not leak");
    }

    #[test]
    fn truncated_blob_reports_eof() {
        let storage = MemoryBlobStore::with_entry("todos", r#"[{"id":"a""#);
        let err = read_collection(&storage, "todos").unwrap_err();
        assert!(matches!(err, LoadError::Malformed { category: "eof", .. }));
    }

    #[test]
    fn pretty_and_compact_encodings_hold_the_same_records() {
        let todos = vec![todo("a", "one"), todo("b", "two")];
        let compact = encode_collection(&todos, false).unwrap();
        let pretty = encode_collection(&todos, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let decoded: Vec<Todo> = serde_json::from_str(&pretty).unwrap();
        assert_eq!(decoded, todos);
    }

    #[test]
    fn error_codes_are_stable() {
        let err = StoreError::from(TodoValidationError::DuplicateText("x".to_string()));
        assert_eq!(err.code(), "duplicate_text");
        let err = StoreError::IndexOutOfRange {
            from: 3,
            to: 0,
            len: 2,
        };
        assert_eq!(err.code(), "index_out_of_range");
        assert!(err.to_string().contains("len=2"));
    }
}
