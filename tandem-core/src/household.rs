//! Household data directory management.
//!
//! Events and chores live as one TOML file each under the data directory
//! (`events/` and `tasks/`), with human-readable date + slug filenames.

use std::path::{Path, PathBuf};

use config::{Config, File};

use crate::config::TandemConfig;
use crate::error::{TandemError, TandemResult};
use crate::event::Event;
use crate::task::Task;

#[derive(Clone)]
pub struct Household {
    config: TandemConfig,
}

impl Household {
    pub fn load() -> TandemResult<Self> {
        let config_path = TandemConfig::config_path()?;

        if !config_path.exists() {
            TandemConfig::create_default_config(&config_path)?;
        }

        let config: TandemConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| TandemError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TandemError::Config(e.to_string()))?;

        Ok(Household { config })
    }

    /// Build a household over an explicit config (tests, embedded use).
    pub fn with_config(config: TandemConfig) -> Self {
        Household { config }
    }

    pub fn config(&self) -> &TandemConfig {
        &self.config
    }

    pub fn partners(&self) -> &[String] {
        &self.config.partners
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    fn events_dir(&self) -> PathBuf {
        self.data_path().join("events")
    }

    fn tasks_dir(&self) -> PathBuf {
        self.data_path().join("tasks")
    }

    // =========================================================================
    // Event operations
    // =========================================================================

    pub fn events(&self) -> TandemResult<Vec<Event>> {
        read_records(&self.events_dir())
    }

    pub fn find_event(&self, event_id: &str) -> TandemResult<Event> {
        self.events()?
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| TandemError::EventNotFound(event_id.to_string()))
    }

    pub fn create_event(&self, event: &Event) -> TandemResult<()> {
        let dir = self.events_dir();
        std::fs::create_dir_all(&dir)?;

        let content = to_toml(event)?;
        let filename = filename_for(&dir, &base_filename(&event.title, event.date, event.recurrence.is_some()), &event.id)?;

        std::fs::write(dir.join(filename), content)?;
        Ok(())
    }

    pub fn update_event(&self, event_id: &str, event: &Event) -> TandemResult<()> {
        self.delete_event(event_id)?;
        self.create_event(event)
    }

    pub fn delete_event(&self, event_id: &str) -> TandemResult<()> {
        if let Some(path) = find_record_file(&self.events_dir(), event_id)? {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    pub fn tasks(&self) -> TandemResult<Vec<Task>> {
        read_records(&self.tasks_dir())
    }

    pub fn find_task(&self, task_id: &str) -> TandemResult<Task> {
        self.tasks()?
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TandemError::TaskNotFound(task_id.to_string()))
    }

    pub fn create_task(&self, task: &Task) -> TandemResult<()> {
        let dir = self.tasks_dir();
        std::fs::create_dir_all(&dir)?;

        let content = to_toml(task)?;
        let filename = filename_for(&dir, &base_filename(&task.title, task.date, task.recurrence.is_some()), &task.id)?;

        std::fs::write(dir.join(filename), content)?;
        Ok(())
    }

    pub fn update_task(&self, task_id: &str, task: &Task) -> TandemResult<()> {
        self.delete_task(task_id)?;
        self.create_task(task)
    }

    pub fn delete_task(&self, task_id: &str) -> TandemResult<()> {
        if let Some(path) = find_record_file(&self.tasks_dir(), task_id)? {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn to_toml<T: serde::Serialize>(record: &T) -> TandemResult<String> {
    toml::to_string_pretty(record).map_err(|e| TandemError::Serialization(e.to_string()))
}

/// Load every parseable .toml record in a directory. A missing directory is
/// an empty household, not an error.
fn read_records<T: serde::de::DeserializeOwned>(dir: &Path) -> TandemResult<Vec<T>> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let records = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "toml"))
        .filter_map(|path| std::fs::read_to_string(&path).ok())
        .filter_map(|content| toml::from_str(&content).ok())
        .collect();

    Ok(records)
}

/// Locate the file holding the record with this id, if any.
fn find_record_file(dir: &Path, id: &str) -> TandemResult<Option<PathBuf>> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Ok(None);
    };

    Ok(entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "toml"))
        .find(|path| path_has_id(path, id)))
}

fn path_has_id(path: &Path, id: &str) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| toml::from_str::<toml::Value>(&content).ok())
        .and_then(|value| value.get("id").and_then(|v| v.as_str().map(String::from)))
        .is_some_and(|file_id| file_id == id)
}

// =============================================================================
// Filename generation
// =============================================================================

/// Generate a unique filename for a record, handling collisions.
fn filename_for(dir: &Path, base: &str, id: &str) -> TandemResult<String> {
    let stem = base.trim_end_matches(".toml");

    // Try base filename first
    if !dir.join(base).exists() || path_has_id(&dir.join(base), id) {
        return Ok(base.to_string());
    }

    // Collision - try suffixes
    for n in 2..=100 {
        let suffixed = format!("{}-{}.toml", stem, n);
        if !dir.join(&suffixed).exists() || path_has_id(&dir.join(&suffixed), id) {
            return Ok(suffixed);
        }
    }

    Err(TandemError::Store(format!(
        "Too many filename collisions for {}",
        base
    )))
}

fn base_filename(title: &str, date: chrono::NaiveDate, recurring: bool) -> String {
    let slug = slugify(title);

    if recurring {
        return format!("_recurring__{}.toml", slug);
    }

    format!("{}__{}.toml", date.format("%Y-%m-%d"), slug)
}

pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
