use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// Directory of registered face images (`<name>.jpg`).
    pub images_dir: PathBuf,
    /// Directory of per-user age records (`<name>.json`).
    pub age_dir: PathBuf,
    /// Daily attendance CSV.
    pub attendance_path: PathBuf,
    /// Optional TOML roster mapping names to roll numbers.
    pub roster_path: PathBuf,
    /// Directory containing the genderage ONNX model.
    pub model_dir: PathBuf,
    /// Simulated webcam scan time in the console.
    pub scan_delay: Duration,
    /// Colour the attendance column.
    pub color: bool,
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("ROLLCALL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var("XDG_DATA_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                        PathBuf::from(home).join(".local/share")
                    })
                    .join("rollcall")
            });

        Self {
            images_dir: env_path("ROLLCALL_IMAGES_DIR", data_dir.join("registered_faces")),
            age_dir: env_path("ROLLCALL_AGE_DIR", data_dir.join("age_predictions")),
            attendance_path: env_path("ROLLCALL_ATTENDANCE_PATH", data_dir.join("attendance.csv")),
            roster_path: env_path("ROLLCALL_ROSTER_PATH", data_dir.join("roster.toml")),
            model_dir: env_path("ROLLCALL_MODEL_DIR", data_dir.join("models")),
            scan_delay: Duration::from_millis(env_u64("ROLLCALL_SCAN_DELAY_MS", 1500)),
            color: std::env::var("ROLLCALL_COLOR")
                .map(|v| v != "0")
                .unwrap_or(true),
        }
    }

    /// Path to the genderage classification model.
    pub fn gender_model_path(&self) -> String {
        self.model_dir
            .join(rollcall_core::gender::GENDERAGE_MODEL_FILE)
            .to_string_lossy()
            .into_owned()
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
