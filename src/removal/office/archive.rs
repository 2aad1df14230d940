use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::RemovalError;

/// Reescribe un paquete OOXML en memoria aplicando una transformación por entrada.
///
/// Devuelve el nuevo contenido y si alguna entrada cambió.
pub(super) fn rewrite_package<F>(
    bytes: &[u8],
    mut transform: F,
) -> Result<(Vec<u8>, bool), RemovalError>
where
    F: FnMut(&str, Vec<u8>) -> Result<(Vec<u8>, bool), RemovalError>,
{
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut modified_any = false;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();

        let mut options = FileOptions::<'_, ()>::default().compression_method(file.compression());
        if let Some(mode) = file.unix_mode() {
            options = options.unix_permissions(mode);
        }
        if let Some(time) = file.last_modified() {
            options = options.last_modified_time(time);
        }

        if file.is_dir() {
            writer.add_directory(name, options)?;
            continue;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;

        let (data_to_write, changed) = transform(&name, contents)?;
        modified_any |= changed;

        writer.start_file(name, options)?;
        writer.write_all(&data_to_write)?;
    }

    let output = writer.finish()?.into_inner();
    Ok((output, modified_any))
}
