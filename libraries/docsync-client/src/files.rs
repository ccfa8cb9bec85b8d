//! File content operations for the documents REST API.

use crate::client::{check_status, parse_json, Session};
use crate::error::{ClientError, Result};
use crate::types::UploadParameters;
use docsync_core::{CreatedFile, ItemId};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;
use tracing::{debug, info};

/// File client for a documents server.
pub struct FileClient<'a> {
    session: Session<'a>,
}

impl<'a> FileClient<'a> {
    pub(crate) fn new(session: Session<'a>) -> Self {
        Self { session }
    }

    /// Read the whole content of a file.
    pub async fn read_data(&self, id: &ItemId) -> Result<Vec<u8>> {
        let url = self.session.documents(&["files", id.as_str(), "data"])?;
        debug!(id = %id, "Reading file data");

        let request = self.session.request(Method::GET, url);
        let response = self.session.send(request).await?;
        let response = check_status(response, "file", id.as_str()).await?;
        let bytes = response.bytes().await?;

        debug!(id = %id, size = bytes.len(), "File data read");
        Ok(bytes.to_vec())
    }

    /// Upload a file into a folder.
    ///
    /// An existing file with the same name gets a new version.
    ///
    /// # Arguments
    /// * `parent` - Target folder id
    /// * `name` - File name in the target folder
    /// * `contents` - Whole file content
    pub async fn create(&self, parent: &ItemId, name: &str, contents: Vec<u8>) -> Result<CreatedFile> {
        let url = self.session.documents(&["files", "data"])?;
        let size = contents.len();

        let parameters = serde_json::to_string(&UploadParameters {
            parent_id: parent.as_str(),
        })
        .map_err(|e| ClientError::ParseError(e.to_string()))?;

        let file_part = Part::bytes(contents)
            .file_name(name.to_string())
            .mime_str(&mime_type_for_file(Path::new(name)))?;

        let form = Form::new()
            .text("jsonInputParameters", parameters)
            .part("primaryFile", file_part);

        let request = self.session.request(Method::POST, url).multipart(form);
        let response = self.session.send(request).await?;
        let response = check_status(response, "folder", parent.as_str()).await?;
        let created: CreatedFile = parse_json(response, "upload response").await?;

        info!(
            id = %created.id,
            name = %created.name,
            version = %created.version,
            size,
            "File uploaded"
        );

        Ok(created)
    }
}

/// MIME type sent with an uploaded file, guessed from its extension.
fn mime_type_for_file(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
