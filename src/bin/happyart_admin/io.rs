#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use happyart::domain::uploads::ImageFile;

use crate::ctx::CliError;

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

pub fn read_value(val: Option<String>, file: Option<PathBuf>) -> Result<String, CliError> {
    read_opt_value(val, file)?.ok_or_else(|| CliError::InvalidInput("value required".into()))
}

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        let data = String::from_utf8(read_file(&path)?)
            .map_err(|e| CliError::InvalidInput(format!("{}: {e}", path.display())))?;
        return Ok(Some(data.trim_end_matches(['\r', '\n']).to_string()));
    }
    Ok(val)
}

/// Load an image from disk, guessing its content type from the extension.
pub fn read_image(path: &Path) -> Result<ImageFile, CliError> {
    let bytes = read_file(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(ImageFile::new(name, content_type, Bytes::from(bytes)))
}
