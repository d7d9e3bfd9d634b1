use serde::{Deserialize, Serialize};

use crate::ports::{FileEntry, FileMetadata, FilePage};

// Drive v3 file resource, limited to the fields requested
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct File {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<File>,
    pub next_page_token: Option<String>,
}

impl From<File> for FileMetadata {
    fn from(file: File) -> Self {
        FileMetadata {
            id: file.id.unwrap_or_default(),
            name: file.name.unwrap_or_default(),
            parents: file.parents,
        }
    }
}

impl From<File> for FileEntry {
    fn from(file: File) -> Self {
        FileEntry {
            id: file.id.unwrap_or_default(),
            name: file.name.unwrap_or_default(),
        }
    }
}

impl From<FileList> for FilePage {
    fn from(list: FileList) -> Self {
        FilePage {
            files: list.files.into_iter().map(Into::into).collect(),
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}
