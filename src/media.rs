//! Profile photo preparation: EXIF-corrective rotation plus a fixed-quality
//! re-encode of a picked image.
//!
//! The pipeline is a single bounded unit of work per invocation: probe the
//! picked reference, stage it to a scoped temp file, read the orientation
//! tag, decode, rotate, re-encode. An unreachable reference yields
//! `Ok(None)` ("no image"); a corrupt one fails at decode and the error
//! propagates to the caller.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use image::{
    codecs::jpeg::JpegEncoder, codecs::webp::WebPEncoder, DynamicImage, ImageFormat, ImageReader,
};

/// Fixed re-encode quality for the lossy formats, out of 100. Small blobs
/// beat fidelity for a list-screen avatar.
const JPEG_QUALITY: u8 = 20;

/// Failure in the preparation pipeline. Note that an unreachable source is
/// `Ok(None)`, not an error.
#[derive(Debug)]
pub enum MediaError {
    /// Staging or file I/O failure.
    Io(std::io::Error),
    /// Decode or re-encode failure, including corrupt input.
    Image(image::ImageError),
    /// Any other pipeline failure, described in text.
    Message(String),
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Io(e) => write!(f, "io error: {e}"),
            MediaError::Image(e) => write!(f, "image error: {e}"),
            MediaError::Message(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaError::Io(e) => Some(e),
            MediaError::Image(e) => Some(e),
            MediaError::Message(_) => None,
        }
    }
}

impl From<std::io::Error> for MediaError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<image::ImageError> for MediaError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

/// An opaque picked-image reference, as handed over by the platform's media
/// picker and content access collaborators.
pub trait ImageSource {
    /// The source's declared MIME type, if any. Drives the re-encode format
    /// choice; unknown types fall back to JPEG.
    fn mime_type(&self) -> Option<String>;

    /// Opens the reference as a byte stream. `None` means the reference is
    /// unreachable and the caller sees "no image".
    fn open(&self) -> Option<Box<dyn Read + Send>>;
}

/// File-backed [`ImageSource`], with the MIME type guessed from the
/// extension unless overridden.
pub struct FileImageSource {
    path: PathBuf,
    mime: Option<String>,
}

impl FileImageSource {
    /// Source at `path`; MIME type guessed from the file extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mime_from_extension(&path);
        Self { path, mime }
    }

    /// Source at `path` with an explicitly declared MIME type.
    pub fn with_mime(path: impl Into<PathBuf>, mime: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime: Some(mime.into()),
        }
    }
}

impl ImageSource for FileImageSource {
    fn mime_type(&self) -> Option<String> {
        self.mime.clone()
    }

    fn open(&self) -> Option<Box<dyn Read + Send>> {
        File::open(&self.path)
            .ok()
            .map(|f| Box::new(f) as Box<dyn Read + Send>)
    }
}

fn mime_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png".to_string()),
        "jpg" | "jpeg" => Some("image/jpeg".to_string()),
        "webp" => Some("image/webp".to_string()),
        _ => None,
    }
}

/// Prepares the photo blob from `source`, reading pixels and the
/// orientation tag from the staged copy at `staged`.
///
/// Returns `Ok(None)` when the source cannot be opened at all; decode
/// failures propagate as [`MediaError`].
pub fn prepare<S: ImageSource + ?Sized>(
    source: &S,
    staged: &Path,
) -> Result<Option<Vec<u8>>, MediaError> {
    let mime = source.mime_type();

    // Reachability probe only; pixels always come from the staged copy.
    let Some(probe) = source.open() else {
        return Ok(None);
    };
    drop(probe);

    let orientation = staged_orientation(staged);
    let decoded = ImageReader::open(staged)?.with_guessed_format()?.decode()?;
    let upright = match orientation {
        6 => decoded.rotate90(),
        3 => decoded.rotate180(),
        8 => decoded.rotate270(),
        // Normal, mirrored and unknown orientations pass through.
        _ => decoded,
    };

    let bytes = encode(&upright, mime.as_deref())?;
    tracing::debug!(
        orientation,
        mime = mime.as_deref().unwrap_or("unknown"),
        len = bytes.len(),
        "prepared profile image"
    );
    Ok(Some(bytes))
}

/// The full staging choreography: open the picked reference, copy it to a
/// scoped temporary file, run [`prepare`] against the copy, then discard
/// the temp file.
pub fn prepare_picked<S: ImageSource + ?Sized>(source: &S) -> Result<Option<Vec<u8>>, MediaError> {
    let Some(mut stream) = source.open() else {
        return Ok(None);
    };

    let mut staged = tempfile::NamedTempFile::new()?;
    std::io::copy(&mut stream, &mut staged)?;
    staged.flush()?;
    drop(stream);

    prepare(source, staged.path())
}

/// [`prepare_picked`] dispatched off the interactive thread.
pub async fn prepare_picked_async<S>(source: S) -> Result<Option<Vec<u8>>, MediaError>
where
    S: ImageSource + Send + 'static,
{
    tokio::task::spawn_blocking(move || prepare_picked(&source))
        .await
        .map_err(|e| MediaError::Message(format!("join error: {e}")))?
}

/// Reads the EXIF orientation tag from the staged file. Missing or
/// unreadable metadata means "normal".
fn staged_orientation(staged: &Path) -> u32 {
    let Ok(file) = File::open(staged) else {
        return 1;
    };
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(meta) => meta
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .unwrap_or(1),
        Err(_) => 1,
    }
}

fn encode(img: &DynamicImage, mime: Option<&str>) -> Result<Vec<u8>, MediaError> {
    let mut buf = Vec::new();
    match mime {
        Some("image/png") => {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        }
        Some("image/webp") => {
            img.write_with_encoder(WebPEncoder::new_lossless(&mut buf))?;
        }
        // image/jpeg and the fallback for anything else. JPEG carries no
        // alpha channel, so flatten first.
        _ => {
            let rgb = img.to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
        }
    }
    Ok(buf)
}
