use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::io::store::JsonStore;
use crate::model::config::AgendaConfig;
use crate::model::{Email, Event, Task};
use crate::parse::schedule::ScheduleDefaults;

/// The three stores of one data directory, wired from its configuration.
#[derive(Debug, Clone)]
pub struct Agenda {
    pub data_dir: PathBuf,
    pub config: AgendaConfig,
    pub events: JsonStore<Event>,
    pub tasks: JsonStore<Task>,
    pub inbox: JsonStore<Email>,
}

impl Agenda {
    /// Read `agenda.toml` (if any) from `data_dir` and open its stores.
    pub fn open(data_dir: &Path) -> Result<Self, ConfigError> {
        let config = config_io::read_config(data_dir)?;
        Ok(Self::with_config(data_dir, config))
    }

    pub fn with_config(data_dir: &Path, config: AgendaConfig) -> Self {
        Agenda {
            data_dir: data_dir.to_path_buf(),
            events: JsonStore::new(data_dir, &config.calendar.file),
            tasks: JsonStore::new(data_dir, &config.tasks.file),
            inbox: JsonStore::new(data_dir, &config.inbox.file),
            config,
        }
    }

    pub fn schedule_defaults(&self) -> ScheduleDefaults {
        ScheduleDefaults {
            title: self.config.calendar.default_title.clone(),
            description: self.config.calendar.default_description.clone(),
        }
    }
}
