use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::info;

use crate::error::AttendanceResult;
use crate::helpers::google::{endpoint, send, send_bytes, send_json};
use crate::models::{
    docs::BatchUpdateDocumentRequest,
    drive::{File, FileList},
};
use crate::ports::{DocumentStore, FileEntry, FileMetadata, FilePage, Replacement};

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DOCUMENTS_URL: &str = "https://docs.googleapis.com/v1/documents";

/// Google Drive v3 and Docs v1 backed [`DocumentStore`].
#[derive(Clone)]
pub struct GoogleDrive {
    client: Client,
}

impl GoogleDrive {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn get_file_request(client: &Client, file_id: &str) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(FILES_URL, &[file_id])?;
    Ok(client.get(url).query(&[("fields", "parents, id, name")]))
}

fn list_files_request(
    client: &Client,
    folder_id: &str,
    page_token: Option<&str>,
) -> RequestBuilder {
    let request = client.get(FILES_URL).query(&[
        ("q", format!("'{}' in parents", folder_id)),
        ("fields", "nextPageToken, files(id, name)".to_string()),
    ]);
    match page_token {
        Some(token) => request.query(&[("pageToken", token)]),
        None => request,
    }
}

fn delete_file_request(client: &Client, file_id: &str) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(FILES_URL, &[file_id])?;
    Ok(client.delete(url))
}

fn copy_file_request(
    client: &Client,
    file_id: &str,
    new_name: &str,
    parent_folder_id: &str,
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(FILES_URL, &[file_id, "copy"])?;
    let body = File {
        id: None,
        name: Some(new_name.to_string()),
        parents: vec![parent_folder_id.to_string()],
    };
    Ok(client
        .post(url)
        .query(&[("fields", "id, name")])
        .body(serde_json::to_string(&body)?))
}

fn replace_text_request(
    client: &Client,
    file_id: &str,
    replacements: &[Replacement],
) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(DOCUMENTS_URL, &[&format!("{file_id}:batchUpdate")])?;
    let body = BatchUpdateDocumentRequest::from(replacements);
    Ok(client.post(url).body(serde_json::to_string(&body)?))
}

fn export_file_request(client: &Client, file_id: &str) -> AttendanceResult<RequestBuilder> {
    let url = endpoint(FILES_URL, &[file_id, "export"])?;
    Ok(client.get(url).query(&[("mimeType", "application/pdf")]))
}

#[async_trait]
impl DocumentStore for GoogleDrive {
    async fn get_file_metadata(&self, file_id: &str) -> AttendanceResult<FileMetadata> {
        let request = get_file_request(&self.client, file_id)?;

        let file: File = send_json(request, "get template").await?;
        Ok(file.into())
    }

    async fn list_files_in_folder(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> AttendanceResult<FilePage> {
        let request = list_files_request(&self.client, folder_id, page_token);

        let list: FileList = send_json(request, "list files").await?;
        info!("Listed {} files in folder {}", list.files.len(), folder_id);
        Ok(list.into())
    }

    async fn delete_file(&self, file_id: &str) -> AttendanceResult<()> {
        let request = delete_file_request(&self.client, file_id)?;
        send(request, "delete existing document").await?;
        Ok(())
    }

    async fn copy_file(
        &self,
        file_id: &str,
        new_name: &str,
        parent_folder_id: &str,
    ) -> AttendanceResult<FileEntry> {
        let request = copy_file_request(&self.client, file_id, new_name, parent_folder_id)?;

        let copied: File = send_json(request, "copy template").await?;
        Ok(copied.into())
    }

    async fn replace_all_text(
        &self,
        file_id: &str,
        replacements: &[Replacement],
    ) -> AttendanceResult<()> {
        let request = replace_text_request(&self.client, file_id, replacements)?;

        send(request, "update document").await?;
        Ok(())
    }

    async fn export_file_as_pdf(&self, file_id: &str) -> AttendanceResult<Vec<u8>> {
        let request = export_file_request(&self.client, file_id)?;

        send_bytes(request, "export document").await
    }
}
