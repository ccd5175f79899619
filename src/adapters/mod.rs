//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements          | Connects to                    |
//! |--------------|---------------------|--------------------------------|
//! | `display`    | DisplayPort         | configured / scripted geometry |
//! |              | WindowPort          | headless window state          |
//! | `dock_prefs` | DockPreferencePort  | `defaults` (macOS)             |
//! | `input`      | —                   | stdin line reader thread       |
//! | `log_sink`   | EventSink           | `log` output                   |
//! | `prefs`      | ConfigPort          | config.json / in-memory        |
//! |              | StoragePort         | prefs.json / in-memory         |
//! | `sprites`    | SpritePort          | sprite image directory         |
//! | `ticks`      | TickSource          | `/proc/stat` (Linux)           |
//! | `time`       | ClockPort           | std monotonic + wall clock     |

pub mod display;
pub mod dock_prefs;
pub mod input;
pub mod log_sink;
pub mod prefs;
pub mod sprites;
pub mod ticks;
pub mod time;
