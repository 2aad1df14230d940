//! Reescritura de imágenes sin metadata EXIF.

use image::codecs::gif::GifDecoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

use crate::error::RemovalError;

const JPEG_QUALITY: u8 = 95;

/// Decodifica y vuelve a codificar la imagen en su mismo formato.
///
/// Solo se conservan los píxeles; cualquier bloque EXIF, XMP o de texto se pierde.
/// Las imágenes animadas se rechazan porque solo se reescribiría el primer fotograma.
pub(super) fn remove_image_metadata(bytes: &[u8], mime: &str) -> Result<Vec<u8>, RemovalError> {
    let format = match ImageFormat::from_mime_type(mime) {
        Some(format) => format,
        None => image::guess_format(bytes)?,
    };
    if is_animated(bytes, format)? {
        return Err(RemovalError::AnimatedImage(mime.to_string()));
    }
    let decoded = image::load_from_memory_with_format(bytes, format)?;

    let mut output = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let rgb = flatten_onto_white(&decoded);
            JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY).encode_image(&rgb)?;
        }
        _ => decoded.write_to(&mut Cursor::new(&mut output), format)?,
    }
    debug!(?format, before = bytes.len(), after = output.len(), "imagen reescrita");

    if !verify_image_metadata_clean(&output)? {
        return Err(RemovalError::VerificationFailed(
            "la imagen conserva campos EXIF".to_string(),
        ));
    }
    Ok(output)
}

fn is_animated(bytes: &[u8], format: ImageFormat) -> Result<bool, RemovalError> {
    let animated = match format {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes))?;
            decoder.into_frames().take(2).count() > 1
        }
        ImageFormat::Png => PngDecoder::new(Cursor::new(bytes))?.is_apng()?,
        ImageFormat::WebP => WebPDecoder::new(Cursor::new(bytes))?.has_animation(),
        _ => false,
    };
    Ok(animated)
}

/// JPEG no admite transparencia: los píxeles translúcidos se mezclan sobre blanco.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        let blend = |channel: u8| ((channel as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Comprueba que una imagen carece de campos EXIF.
pub(crate) fn verify_image_metadata_clean(bytes: &[u8]) -> Result<bool, RemovalError> {
    match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => Ok(exif.fields().next().is_none()),
        Err(exif::Error::NotFound(_))
        | Err(exif::Error::BlankValue(_))
        | Err(exif::Error::InvalidFormat(_)) => Ok(true),
        Err(exif::Error::Io(error)) => Err(RemovalError::Io(error)),
        Err(other) => Err(RemovalError::VerificationFailed(other.to_string())),
    }
}
