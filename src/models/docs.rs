use serde::{Deserialize, Serialize};

use crate::ports::Replacement;

// Docs v1 documents.batchUpdate
#[derive(Serialize, Deserialize, Debug)]
pub struct BatchUpdateDocumentRequest {
    pub requests: Vec<Request>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub replace_all_text: ReplaceAllTextRequest,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceAllTextRequest {
    pub contains_text: SubstringMatchCriteria,
    pub replace_text: String,
}

// `matchCase` is left unset, so matching ignores case
#[derive(Serialize, Deserialize, Debug)]
pub struct SubstringMatchCriteria {
    pub text: String,
}

impl From<&[Replacement]> for BatchUpdateDocumentRequest {
    fn from(replacements: &[Replacement]) -> Self {
        BatchUpdateDocumentRequest {
            requests: replacements
                .iter()
                .map(|r| Request {
                    replace_all_text: ReplaceAllTextRequest {
                        contains_text: SubstringMatchCriteria {
                            text: r.find.clone(),
                        },
                        replace_text: r.replace.clone(),
                    },
                })
                .collect(),
        }
    }
}
