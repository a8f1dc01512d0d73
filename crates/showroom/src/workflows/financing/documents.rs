use serde::{Deserialize, Serialize};

/// Document types an application needs before it counts as complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredDocument {
    IneFront,
    IneBack,
    ProofOfAddress,
    ProofOfIncome,
}

impl RequiredDocument {
    pub const ALL: [RequiredDocument; 4] = [
        RequiredDocument::IneFront,
        RequiredDocument::IneBack,
        RequiredDocument::ProofOfAddress,
        RequiredDocument::ProofOfIncome,
    ];

    /// Type name the upload pipeline stores.
    pub const fn document_type(self) -> &'static str {
        match self {
            RequiredDocument::IneFront => "INE Front",
            RequiredDocument::IneBack => "INE Back",
            RequiredDocument::ProofOfAddress => "Comprobante Domicilio",
            RequiredDocument::ProofOfIncome => "Comprobante Ingresos",
        }
    }
}

/// Metadata of a file attached to an application. Storage lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub file_name: String,
}

impl UploadedDocument {
    pub fn new(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            file_name: String::new(),
        }
    }
}

/// Lower-case, trim and collapse inner whitespace.
pub fn normalize_document_type(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn missing_documents(documents: &[UploadedDocument]) -> Vec<RequiredDocument> {
    let available: Vec<String> = documents
        .iter()
        .map(|document| normalize_document_type(&document.document_type))
        .collect();

    RequiredDocument::ALL
        .into_iter()
        .filter(|required| {
            let wanted = normalize_document_type(required.document_type());
            !available.contains(&wanted)
        })
        .collect()
}

pub fn has_all_documents(documents: &[UploadedDocument]) -> bool {
    !documents.is_empty() && missing_documents(documents).is_empty()
}
