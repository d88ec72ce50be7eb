use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use anyhow::Context;
use debounce::EventDebouncer;
use log::warn;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

pub struct ConfigManager<T> {
    path: PathBuf,
    current: Arc<RwLock<T>>,
    debouncer: debounce::EventDebouncer<UpdateConfigEvent>,
}

const CONFIG_DEBOUNCE_DURATION_MS: u64 = 200;

pub trait Config:
    Sized + Default + Clone + Send + Sync + Serialize + for<'a> Deserialize<'a> + 'static
{
    fn get_path() -> &'static str;

    fn is_valid(&self) -> bool {
        true
    }

    fn create_manager() -> anyhow::Result<ConfigManager<Self>> {
        let mut manager = ConfigManager::new(PathBuf::from(Self::get_path()));
        manager
            .load_if_exists()
            .with_context(|| format!("Failed to load config from {}", Self::get_path()))?;
        Ok(manager)
    }
}

#[derive(Clone, Copy, PartialEq)]
struct UpdateConfigEvent;

// A panic while holding the lock leaves the config itself intact
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_config_file<T: Config>(path: &Path, config: &T) -> anyhow::Result<()> {
    let serialized = ron::ser::to_string_pretty(config, PrettyConfig::default())
        .context("Failed to serialize config")?;
    std::fs::write(path, serialized)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

impl<T> ConfigManager<T>
where
    T: Config,
{
    pub fn new(path: PathBuf) -> Self {
        let current = Arc::new(RwLock::new(T::default()));
        let current_clone = current.clone();
        let path_clone = path.clone();

        let write_config = move |_event: UpdateConfigEvent| {
            let config = read_lock(&current_clone).clone();

            if !config.is_valid() {
                warn!("Attempted to write invalid config to {:?}", &path_clone);
                return;
            }

            if let Err(error) = write_config_file(&path_clone, &config) {
                log::error!("{error:#}");
            }
        };

        Self {
            path,
            current,
            debouncer: EventDebouncer::new(
                Duration::from_millis(CONFIG_DEBOUNCE_DURATION_MS),
                write_config,
            ),
        }
    }

    pub fn get(&self) -> Arc<RwLock<T>> {
        self.current.clone()
    }

    /// A copy of the current config.
    pub fn snapshot(&self) -> T {
        read_lock(&self.current).clone()
    }

    pub fn load_if_exists(&mut self) -> anyhow::Result<()> {
        if self.path.exists() {
            let config_data = std::fs::read_to_string(&self.path)?;

            if config_data.is_empty() {
                return Ok(());
            }

            let config: T = ron::from_str(&config_data)
                .with_context(|| format!("Failed to parse config from {:?}", &self.path))?;

            if !config.is_valid() {
                warn!("Ignoring invalid config in {:?}, using defaults", &self.path);
                return Ok(());
            }

            write_lock(&self.current).clone_from(&config);
        }
        Ok(())
    }

    pub fn update_and_save<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut config = write_lock(&self.current);
            update_fn(&mut *config);
        }
        self.debouncer.put(UpdateConfigEvent);
    }
}
