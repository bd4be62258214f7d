//! Library module: the track model and every way a track can enter the
//! playlist (built-in defaults, a scanned directory, a single local file).

mod defaults;
mod display;
mod local;
mod model;
mod scan;

pub use defaults::default_playlist;
pub use display::display_from_fields;
pub use local::{LoadError, load_local_file, probe_duration};
pub use model::{Track, TrackSource};
pub use scan::scan;
