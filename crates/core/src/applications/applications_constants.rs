/// Object storage bucket holding uploaded identity documents.
pub const DOCUMENTS_BUCKET: &str = "student-documents";

/// Largest accepted document, in bytes (10 MiB).
pub const MAX_DOCUMENT_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for document photos.
pub const ALLOWED_DOCUMENT_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Longest file-name extension kept in generated object paths.
pub const MAX_EXTENSION_LEN: usize = 5;

/// First and last accepted graduation years (inclusive).
pub const GRADUATION_YEAR_FIRST: u16 = 2024;
pub const GRADUATION_YEAR_LAST: u16 = 2028;

/// Status strings as persisted in the record store.
pub mod application_statuses {
    pub const DRAFT: &str = "draft";
    pub const SUBMITTED: &str = "submitted";
}

/// Storage folders, one per document kind.
pub mod document_folders {
    pub const STUDENT_IDS: &str = "student-ids";
    pub const DRIVERS_LICENSES: &str = "drivers-licenses";
}

/// Marketing description of one account product offered on step 1.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProduct {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

/// Products selectable as the account type.
pub const ACCOUNT_PRODUCTS: [AccountProduct; 3] = [
    AccountProduct {
        id: "checking",
        title: "Student Checking",
        description: "No fees, no minimums, perfect for daily banking",
        features: &[
            "No monthly fees",
            "Free debit card",
            "ATM fee rebates",
            "Mobile banking",
        ],
    },
    AccountProduct {
        id: "savings",
        title: "High-Yield Savings",
        description: "Build your savings with 2.5% APY",
        features: &[
            "2.5% APY",
            "No minimum balance",
            "Automatic savings",
            "Goal tracking",
        ],
    },
    AccountProduct {
        id: "both",
        title: "Checking + Savings Bundle",
        description: "Get both accounts and save more",
        features: &[
            "All checking benefits",
            "High-yield savings",
            "Linked accounts",
            "Financial planning",
        ],
    },
];

/// Returns true if the MIME type is accepted for document photos.
pub fn is_allowed_document_mime_type(mime_type: &str) -> bool {
    ALLOWED_DOCUMENT_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(mime_type.trim()))
}

/// File extension used when an uploaded file name carries none.
pub fn extension_for_mime_type(mime_type: &str) -> &'static str {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    }
}
