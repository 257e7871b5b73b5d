//! Interfaces to image and font collaborators.
//!
//! Fetching is asynchronous and happens outside the editor. The host awaits
//! a source, then hands the result to the editor's synchronous completion
//! methods, so the editor is never borrowed across an await point.

use crate::shapes::{LoadedImage, ShapeId, parse_data_url};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors reported by acquisition collaborators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcquireError {
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("Invalid image data: {0}")]
    InvalidData(String),
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),
}

/// Result type for acquisition operations.
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRequestSource {
    Url(String),
    /// A `data:` URL or bare base64 (treated as PNG).
    Data(String),
}

impl ImageRequestSource {
    fn describe(&self) -> &str {
        match self {
            ImageRequestSource::Url(url) => url,
            ImageRequestSource::Data(_) => "embedded data",
        }
    }
}

/// Resolves image requests to encoded bytes with known dimensions.
pub trait ImageSource {
    fn fetch(&self, source: &ImageRequestSource) -> BoxFuture<'_, AcquireResult<LoadedImage>>;
}

/// Ensures a font family is available for measurement and rendering.
pub trait FontSource {
    fn load(&self, family: &str) -> BoxFuture<'_, AcquireResult<()>>;
}

/// Decode embedded image data without any network access.
pub fn decode_embedded(data: &str) -> AcquireResult<LoadedImage> {
    let (declared, bytes) = parse_data_url(data)
        .ok_or_else(|| AcquireError::InvalidData("malformed data URL".to_string()))?;
    let loaded = LoadedImage::from_bytes(bytes)
        .ok_or_else(|| AcquireError::InvalidData("unrecognized image header".to_string()))?;
    if let Some(format) = declared.filter(|f| *f != loaded.format) {
        log::debug!(
            "declared {} but found {}",
            format.mime_type(),
            loaded.format.mime_type()
        );
    }
    Ok(loaded)
}

/// Image source that only understands embedded data.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedImageSource;

impl ImageSource for EmbeddedImageSource {
    fn fetch(&self, source: &ImageRequestSource) -> BoxFuture<'_, AcquireResult<LoadedImage>> {
        let result = match source {
            ImageRequestSource::Data(data) => decode_embedded(data),
            ImageRequestSource::Url(url) if url.starts_with("data:") => decode_embedded(url),
            ImageRequestSource::Url(url) => Err(AcquireError::Fetch(format!(
                "no network source for {url}"
            ))),
        };
        Box::pin(async move { result })
    }
}

/// Where a loaded image lands in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    pub left: f64,
    pub top: f64,
    /// Scale uniformly to this width.
    pub width: Option<f64>,
    /// Scale uniformly to this height (applied after `width`).
    pub height: Option<f64>,
    /// Center on the viewport instead of using `left`/`top`.
    pub center_in_viewport: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            left: 100.0,
            top: 100.0,
            width: None,
            height: None,
            center_in_viewport: false,
        }
    }
}

/// Handle for an in-flight image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTicket(pub(crate) u64);

/// Bookkeeping for one outstanding image request.
#[derive(Debug, Clone)]
pub(crate) struct PendingImage {
    pub(crate) description: String,
    pub(crate) placement: PlacementOptions,
    /// Existing image whose pixels the result replaces.
    pub(crate) target: Option<ShapeId>,
}

impl PendingImage {
    pub(crate) fn new(
        source: &ImageRequestSource,
        placement: PlacementOptions,
        target: Option<ShapeId>,
    ) -> Self {
        Self {
            description: source.describe().to_string(),
            placement,
            target,
        }
    }
}

/// Fonts that never need fetching.
pub const SYSTEM_FONTS: &[&str] = &[
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Verdana",
    "Trebuchet MS",
    "Courier New",
    "Impact",
    "Comic Sans MS",
    "Palatino Linotype",
    "Garamond",
];

/// Fonts available from a web font service.
pub const WEB_FONTS: &[&str] = &[
    "Inter",
    "Roboto",
    "Open Sans",
    "Lato",
    "Montserrat",
    "Poppins",
    "Playfair Display",
    "Merriweather",
    "Raleway",
    "Oswald",
    "Source Sans 3",
    "Nunito",
    "PT Sans",
    "Work Sans",
    "Libre Baskerville",
    "DM Sans",
    "Space Grotesk",
    "Bebas Neue",
];

/// Tracks which font families can be used and what to use instead.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    loaded: HashSet<String>,
    failed: HashSet<String>,
    fallback: String,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self {
            loaded: HashSet::new(),
            failed: HashSet::new(),
            fallback: "Arial".to_string(),
        }
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_system_font(family: &str) -> bool {
        SYSTEM_FONTS.contains(&family)
    }

    /// Every family offered to users.
    pub fn all_fonts() -> impl Iterator<Item = &'static str> {
        SYSTEM_FONTS.iter().chain(WEB_FONTS).copied()
    }

    pub fn is_available(&self, family: &str) -> bool {
        Self::is_system_font(family) || self.loaded.contains(family)
    }

    /// Whether a load should be requested for this family.
    pub fn needs_load(&self, family: &str) -> bool {
        !self.is_available(family) && !self.failed.contains(family)
    }

    /// Record the outcome of a font load.
    pub fn complete(&mut self, family: &str, result: &AcquireResult<()>) {
        match result {
            Ok(()) => {
                self.failed.remove(family);
                self.loaded.insert(family.to_string());
            }
            Err(err) => {
                log::warn!("font {family} unavailable, using {}: {err}", self.fallback);
                self.failed.insert(family.to_string());
            }
        }
    }

    /// Family to render with: the requested one when available, else the fallback.
    pub fn resolve<'a>(&'a self, family: &'a str) -> &'a str {
        if self.is_available(family) {
            family
        } else {
            &self.fallback
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Simple blocking executor for tests.
    pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    /// 1x1 transparent PNG.
    pub(crate) const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
}
