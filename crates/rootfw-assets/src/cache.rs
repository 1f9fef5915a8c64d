//! Path-keyed image cache and shared values.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AssetError;
use crate::image_handle::ImageHandle;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// Lexically normalise a path: drop `.` components and fold `..` into the
/// preceding component. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Keyed store of loaded images plus free-form shared values.
///
/// Keys are normalised absolute paths, so `"sprites/./a.png"` and
/// `"sprites/a.png"` hit the same entry. The cache assumes a single owner;
/// loading from several threads would need an external lock around it.
pub struct ResourceCache {
    resource_path: PathBuf,
    images: HashMap<PathBuf, ImageHandle>,
    shared: HashMap<String, Box<dyn Any>>,
}

impl ResourceCache {
    /// Cache whose relative paths resolve against `resource_path`.
    pub fn new(resource_path: impl AsRef<Path>) -> Self {
        let mut cache = Self {
            resource_path: PathBuf::from("."),
            images: HashMap::new(),
            shared: HashMap::new(),
        };
        cache.set_resource_path(resource_path);
        cache
    }

    /// Change the base directory. Relative paths are taken from the current
    /// working directory.
    pub fn set_resource_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.resource_path = normalize_path(&absolute);
        debug!(path = %self.resource_path.display(), "resource path set");
    }

    pub fn resource_path(&self) -> &Path {
        &self.resource_path
    }

    /// Cache key for `path`: joined onto the resource path and normalised.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize_path(&self.resource_path.join(path))
    }

    /// Load an image, or return the cached copy.
    ///
    /// A file that cannot be read or decoded is replaced by
    /// [`ImageHandle::placeholder`] and a warning; the placeholder is not
    /// cached so a later call retries the file.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> ImageHandle {
        match self.try_load_image(path) {
            Ok(image) => image,
            Err(err) => {
                warn!("{err}; using placeholder");
                ImageHandle::placeholder()
            }
        }
    }

    /// Load an image, or return the cached copy, reporting failures.
    pub fn try_load_image(&mut self, path: impl AsRef<Path>) -> Result<ImageHandle, AssetError> {
        let key = self.resolve(path);
        if let Some(image) = self.images.get(&key) {
            return Ok(image.clone());
        }
        let image = ImageHandle::open(&key)?;
        debug!(path = %key.display(), size = ?image.size(), "image loaded");
        self.images.insert(key, image.clone());
        Ok(image)
    }

    /// Cached image for `path`, without touching the disk.
    pub fn get_image(&self, path: impl AsRef<Path>) -> Option<ImageHandle> {
        self.images.get(&self.resolve(path)).cloned()
    }

    /// Put an already decoded image into the cache under `path`.
    pub fn insert_image(&mut self, path: impl AsRef<Path>, image: ImageHandle) {
        let key = self.resolve(path);
        self.images.insert(key, image);
    }

    pub fn contains_image(&self, path: impl AsRef<Path>) -> bool {
        self.images.contains_key(&self.resolve(path))
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    /// Recursively load every image below `dir`, skipping hidden files and
    /// directories. Audio and font files are reported as unsupported.
    ///
    /// Returns how many images were newly cached.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, AssetError> {
        let root = self.resolve(dir);
        let mut pending = vec![root];
        let mut loaded = 0;

        while let Some(dir) = pending.pop() {
            let entries = std::fs::read_dir(&dir).map_err(|source| AssetError::ReadDir {
                path: dir.clone(),
                source,
            })?;
            let mut paths: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| !is_hidden(path))
                .collect();
            paths.sort();

            for path in paths {
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                let extension = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_default();

                if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                    let was_cached = self.images.contains_key(&path);
                    match self.try_load_image(&path) {
                        Ok(_) if !was_cached => loaded += 1,
                        Ok(_) => {}
                        Err(err) => warn!("{err}"),
                    }
                } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
                    debug!(path = %path.display(), "audio loading not supported, skipping");
                } else if FONT_EXTENSIONS.contains(&extension.as_str()) {
                    debug!(path = %path.display(), "font loading not supported, skipping");
                }
            }
        }
        Ok(loaded)
    }

    /// Store a value that any holder of the cache can read back by name.
    pub fn set_shared<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.shared.insert(name.into(), Box::new(value));
    }

    /// Shared value by name, if present and of type `T`.
    pub fn get_shared<T: Any>(&self, name: &str) -> Option<&T> {
        self.shared.get(name)?.downcast_ref::<T>()
    }

    pub fn get_shared_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.shared.get_mut(name)?.downcast_mut::<T>()
    }

    pub fn remove_shared(&mut self, name: &str) -> bool {
        self.shared.remove(name).is_some()
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(".")
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLACEHOLDER_SIZE;

    fn write_image(path: &Path, width: u32, height: u32) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize_path(Path::new("/x/../../y")), PathBuf::from("/y"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_resource_path_is_absolute() {
        let cache = ResourceCache::new("assets");
        assert!(cache.resource_path().is_absolute());
        assert!(cache.resource_path().ends_with("assets"));
    }

    #[test]
    fn test_load_and_get_image() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("hero.png"), 3, 5);
        let mut cache = ResourceCache::new(dir.path());

        assert!(cache.get_image("hero.png").is_none());
        let image = cache.load_image("hero.png");
        assert_eq!(image.size(), (3, 5));

        let cached = cache.get_image("./hero.png").unwrap();
        assert!(cached.ptr_eq(&image));
        assert_eq!(cache.image_count(), 1);
    }

    #[test]
    fn test_missing_image_yields_uncached_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResourceCache::new(dir.path());
        let image = cache.load_image("nope.png");
        assert_eq!(image.size(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
        assert!(cache.get_image("nope.png").is_none());
        assert!(cache.try_load_image("nope.png").is_err());
    }

    #[test]
    fn test_corrupt_image_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        let mut cache = ResourceCache::new(dir.path());
        assert_eq!(cache.load_image("bad.png").width(), PLACEHOLDER_SIZE);
    }

    #[test]
    fn test_load_from_dir_skips_hidden_and_non_images() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("tiles/grass.png"), 2, 2);
        write_image(&dir.path().join("tiles/deep/rock.png"), 2, 2);
        write_image(&dir.path().join(".cache/skip.png"), 2, 2);
        write_image(&dir.path().join(".hidden.png"), 2, 2);
        std::fs::write(dir.path().join("theme.ogg"), b"").unwrap();

        let mut cache = ResourceCache::new(dir.path());
        assert_eq!(cache.load_from_dir(".").unwrap(), 2);
        assert!(cache.contains_image("tiles/grass.png"));
        assert!(cache.contains_image("tiles/deep/rock.png"));
        assert!(!cache.contains_image(".cache/skip.png"));

        // A second pass finds nothing new.
        assert_eq!(cache.load_from_dir(".").unwrap(), 0);
    }

    #[test]
    fn test_load_from_dir_includes_gif() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("anim/spin.gif"), 4, 4);
        write_image(&dir.path().join("anim/still.png"), 4, 4);

        let mut cache = ResourceCache::new(dir.path());
        assert_eq!(cache.load_from_dir("anim").unwrap(), 2);
        assert_eq!(cache.get_image("anim/spin.gif").unwrap().size(), (4, 4));
    }

    #[test]
    fn test_load_from_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ResourceCache::new(dir.path());
        assert!(matches!(
            cache.load_from_dir("missing"),
            Err(AssetError::ReadDir { .. })
        ));
    }

    #[test]
    fn test_shared_values_are_typed() {
        let mut cache = ResourceCache::default();
        cache.set_shared("score", 42_u32);
        assert_eq!(cache.get_shared::<u32>("score"), Some(&42));
        assert_eq!(cache.get_shared::<String>("score"), None);

        *cache.get_shared_mut::<u32>("score").unwrap() += 1;
        assert_eq!(cache.get_shared::<u32>("score"), Some(&43));
        assert!(cache.remove_shared("score"));
        assert!(!cache.remove_shared("score"));
    }
}
