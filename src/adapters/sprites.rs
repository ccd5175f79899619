//! Sprite loader.
//!
//! Frames for a state are looked up under the sprite root in this order,
//! for each frame index `i` from 0:
//!
//! ```text
//!   <root>/<state>/<state>_<i>.png   .PNG   .jpg   .JPG
//!   <root>/<state>_<i>.png           .PNG   .jpg   .JPG
//! ```
//!
//! The first missing index ends the animation.  A state without frame 0
//! gets a single placeholder tile.  Every lookup is cached per
//! `(state, frame)`, misses included.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::app::ports::SpritePort;
use crate::app::sprites::{FrameSet, MAX_FRAMES, SpriteFrame, placeholder_set};
use crate::fsm::PetState;
use crate::fsm::states::{StateDescriptor, build_state_table};

const EXTENSIONS: [&str; 4] = ["png", "PNG", "jpg", "JPG"];

pub struct SpriteLoader {
    root: Option<PathBuf>,
    table: [StateDescriptor; PetState::COUNT],
    cache: HashMap<(PetState, usize), Option<PathBuf>>,
}

impl SpriteLoader {
    /// Loader rooted at `root`; `None` serves placeholders only.
    pub fn new(root: Option<PathBuf>) -> Self {
        match &root {
            Some(dir) => info!("Sprites: loading from {}", dir.display()),
            None => info!("Sprites: no sprite directory, using placeholders"),
        }
        Self {
            root,
            table: build_state_table(),
            cache: HashMap::new(),
        }
    }

    /// Path of frame `index` of `state`, if one exists on disk.
    pub fn frame_path(&mut self, state: PetState, index: usize) -> Option<PathBuf> {
        let root = self.root.as_deref()?;
        self.cache
            .entry((state, index))
            .or_insert_with(|| find_frame(root, state, index))
            .clone()
    }

    /// Number of cached lookups.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn find_frame(root: &Path, state: PetState, index: usize) -> Option<PathBuf> {
    let name = state.name();
    let dirs = [root.join(name), root.to_path_buf()];
    dirs.iter()
        .flat_map(|dir| {
            EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{name}_{index}.{ext}")))
        })
        .find(|p| p.is_file())
}

impl SpritePort for SpriteLoader {
    fn frames(&mut self, state: PetState) -> FrameSet {
        let mut set = FrameSet::new();
        for i in 0..MAX_FRAMES {
            let Some(path) = self.frame_path(state, i) else {
                break;
            };
            if set.push(SpriteFrame::File(path)).is_err() {
                break;
            }
        }

        if set.is_empty() {
            debug!("Sprites: {} has no frames, using placeholder", state);
            return placeholder_set(state, self.table[state as usize].placeholder_rgb);
        }
        debug!("Sprites: {} has {} frames", state, set.len());
        set
    }
}
