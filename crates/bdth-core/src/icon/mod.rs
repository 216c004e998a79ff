//! Lazily fetched icon textures.
//!
//! Each icon id is absent, pending, or ready. Requesting an absent id marks it
//! pending before the fetch is spawned, so a second request made while the
//! first is still in flight never issues another decode. A failed decode
//! stays in the cache as a failure and is not retried.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Icon ids at or above this value are not real icons and are never fetched
pub const MAX_ICON_ID: u16 = 65000;

/// Bytes per pixel in every decoded icon (RGBA8)
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconError {
    #[error("Icon {0} not found")]
    NotFound(u16),

    #[error("Icon decode failed: {0}")]
    Decode(String),

    #[error("Pixel buffer is {actual} bytes, expected {expected}")]
    BadSize { expected: usize, actual: usize },
}

/// Decoded pixels handed over by the image subsystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIcon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RawIcon {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, IconError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if rgba.len() != expected {
            return Err(IconError::BadSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }
}

/// Where icon pixels come from
pub trait IconSource: Send + Sync {
    fn load_icon(&self, id: u16) -> Result<RawIcon, IconError>;
}

/// Runs fetch jobs off the coordinating thread
pub trait IconSpawner: Send + Sync {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

/// One detached OS thread per fetch
#[derive(Debug, Default)]
pub struct ThreadSpawner;

impl IconSpawner for ThreadSpawner {
    fn spawn(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        if let Err(e) = thread::Builder::new()
            .name("icon-fetch".to_string())
            .spawn(job)
        {
            warn!("Failed to spawn icon fetch: {}", e);
        }
    }
}

/// Texture handle for the rendering side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTexture {
    pub id: u16,
    pub width: u32,
    pub height: u32,
    pixels: Arc<[u8]>,
}

impl IconTexture {
    fn from_raw(id: u16, raw: RawIcon) -> Self {
        Self {
            id,
            width: raw.width,
            height: raw.height,
            pixels: raw.rgba.into(),
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconState {
    Pending,
    /// Pending forever; rendered with the fallback glyph
    Failed(IconError),
    Ready(IconTexture),
}

/// What the renderer should draw for an icon id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconView {
    /// Not a drawable icon id
    Hidden,
    /// Empty frame while the fetch is in flight
    Placeholder,
    /// Icon id drawn as text in a red frame
    Fallback(u16),
    Image(IconTexture),
}

type IconStates = Arc<Mutex<HashMap<u16, IconState>>>;

pub struct IconCache {
    states: IconStates,
    source: Arc<dyn IconSource>,
    spawner: Arc<dyn IconSpawner>,
}

impl IconCache {
    pub fn new(source: Arc<dyn IconSource>) -> Self {
        Self::with_spawner(source, Arc::new(ThreadSpawner))
    }

    pub fn with_spawner(source: Arc<dyn IconSource>, spawner: Arc<dyn IconSpawner>) -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
            source,
            spawner,
        }
    }

    /// View of an icon, starting its fetch on first request
    pub fn request(&self, id: u16) -> IconView {
        if id >= MAX_ICON_ID {
            return IconView::Hidden;
        }

        if self.begin_fetch(id) {
            let states = Arc::clone(&self.states);
            let source = Arc::clone(&self.source);
            self.spawner.spawn(Box::new(move || {
                let result = source.load_icon(id);
                Self::finish(&states, id, result);
            }));
        }

        self.view(id)
    }

    /// Absent → pending. Returns whether the caller should issue the fetch.
    pub fn begin_fetch(&self, id: u16) -> bool {
        let mut states = self.states.lock();
        if states.contains_key(&id) {
            return false;
        }
        states.insert(id, IconState::Pending);
        true
    }

    /// Pending → ready, or pending → failed
    pub fn complete(&self, id: u16, result: Result<RawIcon, IconError>) {
        Self::finish(&self.states, id, result);
    }

    fn finish(states: &Mutex<HashMap<u16, IconState>>, id: u16, result: Result<RawIcon, IconError>) {
        let state = match result {
            Ok(raw) => IconState::Ready(IconTexture::from_raw(id, raw)),
            Err(e) => {
                debug!("Icon {} failed: {}", id, e);
                IconState::Failed(e)
            }
        };
        states.lock().insert(id, state);
    }

    pub fn state(&self, id: u16) -> Option<IconState> {
        self.states.lock().get(&id).cloned()
    }

    /// Current view without starting a fetch
    pub fn view(&self, id: u16) -> IconView {
        if id >= MAX_ICON_ID {
            return IconView::Hidden;
        }
        match self.states.lock().get(&id) {
            None | Some(IconState::Pending) => IconView::Placeholder,
            Some(IconState::Failed(_)) => IconView::Fallback(id),
            Some(IconState::Ready(texture)) => IconView::Image(texture.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry; only done at teardown
    pub fn clear(&self) {
        self.states.lock().clear();
    }
}
