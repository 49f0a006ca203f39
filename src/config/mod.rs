use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_scan_debounce_ms")]
    pub scan_debounce_ms: u64,
    #[serde(default = "default_employee_timeout_secs")]
    pub employee_timeout_secs: u64,
    #[serde(default = "default_identification_timeout_secs")]
    pub identification_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Export destination. `TIME_CLOCK_EXPORT_PATH` takes precedence; an
    /// empty string means "resolve at export time" (see export::fs_utils).
    pub export_path: String,
}

// ---------------------------------------------
// DEFAULT VALUE FUNCTIONS
// ---------------------------------------------
fn default_scan_debounce_ms() -> u64 {
    1200
}
fn default_employee_timeout_secs() -> u64 {
    120
}
fn default_identification_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_ms() -> u64 {
    100
}

// ---------------------------------------------
// CONFIG DEFAULT IMPL
// ---------------------------------------------
impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            scan_debounce_ms: default_scan_debounce_ms(),
            employee_timeout_secs: default_employee_timeout_secs(),
            identification_timeout_secs: default_identification_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            export_path: String::new(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timeclock")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".timeclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timeclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timeclock.db")
    }

    pub fn scan_debounce(&self) -> Duration {
        Duration::from_millis(self.scan_debounce_ms)
    }

    pub fn employee_timeout(&self) -> Duration {
        Duration::from_secs(self.employee_timeout_secs)
    }

    pub fn identification_timeout(&self) -> Duration {
        Duration::from_secs(self.identification_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load configuration from file, or return defaults if not found.
    /// If some fields are missing in the YAML, they are added with default
    /// values and the file is updated.
    pub fn load() -> Self {
        let path = Self::config_file();

        // File missing: create directory + file with defaults
        if !path.exists() {
            let defaults = Config::default();

            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            if let Ok(yaml) = serde_yaml::to_string(&defaults) {
                if let Err(e) = fs::write(&path, yaml) {
                    eprintln!("Failed to write default config file: {e}");
                }
            }

            return defaults;
        }

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to read config file ({e}), using defaults.");
                return Config::default();
            }
        };

        if content.trim().is_empty() {
            eprintln!("Config file is empty, regenerating defaults.");
            let defaults = Config::default();
            if let Ok(yaml) = serde_yaml::to_string(&defaults) {
                let _ = fs::write(&path, yaml);
            }
            return defaults;
        }

        // Parse raw YAML to see which keys actually exist in the file
        let raw_yaml: serde_yaml::Value = match serde_yaml::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Failed to parse config file ({e}), using defaults.");
                let defaults = Config::default();
                if let Ok(yaml) = serde_yaml::to_string(&defaults) {
                    let _ = fs::write(&path, yaml);
                }
                return defaults;
            }
        };

        // Serde fills missing fields in memory
        let mut loaded: Config = match serde_yaml::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to parse Config struct ({e}), using defaults.");
                let defaults = Config::default();
                if let Ok(yaml) = serde_yaml::to_string(&defaults) {
                    let _ = fs::write(&path, yaml);
                }
                return defaults;
            }
        };

        let defaults = Config::default();
        let mut modified = false;

        macro_rules! ensure_field {
            ($yaml_key:literal, $field:ident) => {
                if raw_yaml.get($yaml_key).is_none() {
                    loaded.$field = defaults.$field.clone();
                    eprintln!(
                        "Missing field '{}' in config file, inserting default.",
                        $yaml_key
                    );
                    modified = true;
                }
            };
        }

        ensure_field!("database", database);
        ensure_field!("export_path", export_path);
        ensure_field!("scan_debounce_ms", scan_debounce_ms);
        ensure_field!("employee_timeout_secs", employee_timeout_secs);
        ensure_field!("identification_timeout_secs", identification_timeout_secs);
        ensure_field!("poll_interval_ms", poll_interval_ms);

        // Rewrite the file so the next load sees the full key set
        if modified {
            if let Ok(yaml) = serde_yaml::to_string(&loaded) {
                if let Some(parent) = path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                if let Err(e) = fs::write(&path, yaml) {
                    eprintln!("Failed to update config file: {e}");
                }
            }
        }

        loaded
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(format!("serialize config: {e}")))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("Config file: {:?}", Self::config_file());
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("Database:    {:?}", db_path);

        Ok(())
    }
}
