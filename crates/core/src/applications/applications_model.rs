//! Application domain models.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use super::applications_constants::{
    application_statuses, document_folders, extension_for_mime_type,
    is_allowed_document_mime_type, GRADUATION_YEAR_FIRST, GRADUATION_YEAR_LAST,
    MAX_DOCUMENT_SIZE_BYTES, MAX_EXTENSION_LEN,
};
use crate::errors::ValidationError;
use crate::wizard::WizardStep;

/// Product the applicant wants to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Both,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Both => "both",
        }
    }
}

/// States the bank currently operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UsState {
    Ca,
    Ny,
    Tx,
    Fl,
    Il,
}

impl UsState {
    /// Two-letter postal code.
    pub fn code(&self) -> &'static str {
        match self {
            UsState::Ca => "CA",
            UsState::Ny => "NY",
            UsState::Tx => "TX",
            UsState::Fl => "FL",
            UsState::Il => "IL",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UsState::Ca => "California",
            UsState::Ny => "New York",
            UsState::Tx => "Texas",
            UsState::Fl => "Florida",
            UsState::Il => "Illinois",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum University {
    Stanford,
    Ucla,
    Berkeley,
    Usc,
    Other,
}

impl University {
    pub fn as_str(&self) -> &'static str {
        match self {
            University::Stanford => "stanford",
            University::Ucla => "ucla",
            University::Berkeley => "berkeley",
            University::Usc => "usc",
            University::Other => "other",
        }
    }
}

/// Expected graduation year, limited to the range offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct GraduationYear(u16);

impl GraduationYear {
    pub fn year(&self) -> u16 {
        self.0
    }

    /// All selectable years, oldest first.
    pub fn all() -> impl Iterator<Item = GraduationYear> {
        (GRADUATION_YEAR_FIRST..=GRADUATION_YEAR_LAST).map(GraduationYear)
    }
}

impl TryFrom<u16> for GraduationYear {
    type Error = ValidationError;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        if (GRADUATION_YEAR_FIRST..=GRADUATION_YEAR_LAST).contains(&year) {
            Ok(GraduationYear(year))
        } else {
            Err(ValidationError::InvalidGraduationYear(year))
        }
    }
}

impl From<GraduationYear> for u16 {
    fn from(year: GraduationYear) -> Self {
        year.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    Unemployed,
    PartTime,
    FullTime,
    Internship,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::PartTime => "part-time",
            EmploymentStatus::FullTime => "full-time",
            EmploymentStatus::Internship => "internship",
        }
    }
}

/// Annual income bracket, in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnualIncome {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1-5000")]
    UpTo5000,
    #[serde(rename = "5001-15000")]
    UpTo15000,
    #[serde(rename = "15001-30000")]
    UpTo30000,
    #[serde(rename = "30000+")]
    Over30000,
}

impl AnnualIncome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnualIncome::Zero => "0",
            AnnualIncome::UpTo5000 => "1-5000",
            AnnualIncome::UpTo15000 => "5001-15000",
            AnnualIncome::UpTo30000 => "15001-30000",
            AnnualIncome::Over30000 => "30000+",
        }
    }
}

/// Government identification number.
///
/// The value is opaque to the wizard. `Debug` and `Serialize` only ever emit
/// the masked form; the plaintext is reachable through [`SensitiveId::expose`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SensitiveId(String);

impl SensitiveId {
    pub fn new(value: impl Into<String>) -> Self {
        SensitiveId(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters prefixed by a fixed mask.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***-**-{}", tail)
    }

    fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SensitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SensitiveId").field(&self.masked()).finish()
    }
}

impl Serialize for SensitiveId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.masked())
    }
}

/// Document slots on the personal-information step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    StudentIdPhoto,
    DriversLicensePhoto,
}

impl DocumentKind {
    /// Upload order used by the persistence gateway.
    pub const ALL: [DocumentKind; 2] = [DocumentKind::StudentIdPhoto, DocumentKind::DriversLicensePhoto];

    /// Storage folder the document is uploaded into.
    pub fn folder(&self) -> &'static str {
        match self {
            DocumentKind::StudentIdPhoto => document_folders::STUDENT_IDS,
            DocumentKind::DriversLicensePhoto => document_folders::DRIVERS_LICENSES,
        }
    }

    /// Draft field name, as used in validation messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            DocumentKind::StudentIdPhoto => "studentIdPhoto",
            DocumentKind::DriversLicensePhoto => "driversLicensePhoto",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::StudentIdPhoto => write!(f, "student ID"),
            DocumentKind::DriversLicensePhoto => write!(f, "driver's license"),
        }
    }
}

/// A file picked by the applicant for one of the document slots.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Extension of the original file name, falling back to one derived from
    /// the MIME type when the name has none or its extension is not a short
    /// ASCII-alphanumeric token.
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && is_safe_extension(ext) => {
                ext.to_ascii_lowercase()
            }
            _ => extension_for_mime_type(&self.mime_type).to_string(),
        }
    }
}

fn is_safe_extension(ext: &str) -> bool {
    (1..=MAX_EXTENSION_LEN).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Checks a candidate document against the accepted types and size limit.
pub fn validate_document(file: &DocumentFile) -> Result<(), ValidationError> {
    if !is_allowed_document_mime_type(&file.mime_type) {
        return Err(ValidationError::UnsupportedDocumentType(
            file.mime_type.clone(),
        ));
    }
    if file.size() > MAX_DOCUMENT_SIZE_BYTES {
        return Err(ValidationError::DocumentTooLarge {
            size: file.size(),
            max: MAX_DOCUMENT_SIZE_BYTES,
        });
    }
    Ok(())
}

/// A document bound to a draft slot.
///
/// `stored_path` is set once a save has uploaded the file; until then the
/// attachment is pending and the next save uploads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAttachment {
    pub file: DocumentFile,
    pub stored_path: Option<String>,
}

impl DocumentAttachment {
    pub fn pending(file: DocumentFile) -> Self {
        Self {
            file,
            stored_path: None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.stored_path.is_some()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSummary<'a> {
    file_name: &'a str,
    mime_type: &'a str,
    size_bytes: usize,
    stored_path: Option<&'a str>,
}

impl Serialize for DocumentAttachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentSummary {
            file_name: &self.file.file_name,
            mime_type: &self.file.mime_type,
            size_bytes: self.file.size(),
            stored_path: self.stored_path.as_deref(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => application_statuses::DRAFT,
            ApplicationStatus::Submitted => application_statuses::SUBMITTED,
        }
    }
}

/// The in-memory application being filled in by one wizard session.
///
/// Every user-editable field is optional; `None` is the single "unset"
/// representation. Navigation state and attachments are only changed by the
/// wizard controller and the persistence gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub account_type: Option<AccountType>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub sensitive_id_number: Option<SensitiveId>,
    pub(crate) student_id_photo: Option<DocumentAttachment>,
    pub(crate) drivers_license_photo: Option<DocumentAttachment>,

    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<UsState>,
    pub zip_code: Option<String>,

    pub university: Option<University>,
    pub student_id: Option<String>,
    pub graduation_year: Option<GraduationYear>,
    pub employment_status: Option<EmploymentStatus>,
    pub annual_income: Option<AnnualIncome>,

    pub agree_to_terms: bool,
    pub agree_to_privacy: bool,
    pub agree_to_credit: bool,

    pub(crate) current_step: WizardStep,
    pub(crate) status: ApplicationStatus,
}

impl Default for ApplicationDraft {
    fn default() -> Self {
        Self {
            account_type: None,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            date_of_birth: None,
            sensitive_id_number: None,
            student_id_photo: None,
            drivers_license_photo: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            university: None,
            student_id: None,
            graduation_year: None,
            employment_status: None,
            annual_income: None,
            agree_to_terms: false,
            agree_to_privacy: false,
            agree_to_credit: false,
            current_step: WizardStep::AccountType,
            status: ApplicationStatus::Draft,
        }
    }
}

impl ApplicationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn document(&self, kind: DocumentKind) -> Option<&DocumentAttachment> {
        match kind {
            DocumentKind::StudentIdPhoto => self.student_id_photo.as_ref(),
            DocumentKind::DriversLicensePhoto => self.drivers_license_photo.as_ref(),
        }
    }

    fn document_slot(&mut self, kind: DocumentKind) -> &mut Option<DocumentAttachment> {
        match kind {
            DocumentKind::StudentIdPhoto => &mut self.student_id_photo,
            DocumentKind::DriversLicensePhoto => &mut self.drivers_license_photo,
        }
    }

    pub(crate) fn attach_document(&mut self, kind: DocumentKind, file: DocumentFile) {
        *self.document_slot(kind) = Some(DocumentAttachment::pending(file));
    }

    pub(crate) fn remove_document(&mut self, kind: DocumentKind) -> Option<DocumentAttachment> {
        self.document_slot(kind).take()
    }

    /// Records where a pending attachment was uploaded to.
    pub(crate) fn mark_uploaded(&mut self, kind: DocumentKind, path: String) {
        if let Some(attachment) = self.document_slot(kind).as_mut() {
            attachment.stored_path = Some(path);
        }
    }

    /// Applies one user edit. Blank text clears the field.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::AccountType(value) => self.account_type = value,
            FieldUpdate::FirstName(value) => self.first_name = normalize_text(value),
            FieldUpdate::LastName(value) => self.last_name = normalize_text(value),
            FieldUpdate::Email(value) => self.email = normalize_text(value),
            FieldUpdate::Phone(value) => self.phone = normalize_text(value),
            FieldUpdate::DateOfBirth(value) => self.date_of_birth = normalize_text(value),
            FieldUpdate::SensitiveIdNumber(value) => {
                self.sensitive_id_number = Some(value).filter(|id| !id.is_blank())
            }
            FieldUpdate::Address(value) => self.address = normalize_text(value),
            FieldUpdate::City(value) => self.city = normalize_text(value),
            FieldUpdate::State(value) => self.state = value,
            FieldUpdate::ZipCode(value) => self.zip_code = normalize_text(value),
            FieldUpdate::University(value) => self.university = value,
            FieldUpdate::StudentId(value) => self.student_id = normalize_text(value),
            FieldUpdate::GraduationYear(value) => self.graduation_year = value,
            FieldUpdate::EmploymentStatus(value) => self.employment_status = value,
            FieldUpdate::AnnualIncome(value) => self.annual_income = value,
            FieldUpdate::AgreeToTerms(value) => self.agree_to_terms = value,
            FieldUpdate::AgreeToPrivacy(value) => self.agree_to_privacy = value,
            FieldUpdate::AgreeToCredit(value) => self.agree_to_credit = value,
        }
    }
}

fn normalize_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A single user edit to the draft.
///
/// Serialized as `{"field": "<camelCaseName>", "value": ...}`. Choice fields
/// accept `null` to clear the selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    AccountType(Option<AccountType>),
    FirstName(String),
    LastName(String),
    Email(String),
    Phone(String),
    DateOfBirth(String),
    SensitiveIdNumber(SensitiveId),
    Address(String),
    City(String),
    State(Option<UsState>),
    ZipCode(String),
    University(Option<University>),
    StudentId(String),
    GraduationYear(Option<GraduationYear>),
    EmploymentStatus(Option<EmploymentStatus>),
    AnnualIncome(Option<AnnualIncome>),
    AgreeToTerms(bool),
    AgreeToPrivacy(bool),
    AgreeToCredit(bool),
}

/// Object store paths of the two document photos for one save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPaths {
    pub student_id_photo: Option<String>,
    pub drivers_license_photo: Option<String>,
}

impl DocumentPaths {
    pub fn set(&mut self, kind: DocumentKind, path: Option<String>) {
        match kind {
            DocumentKind::StudentIdPhoto => self.student_id_photo = path,
            DocumentKind::DriversLicensePhoto => self.drivers_license_photo = path,
        }
    }
}

/// Flat, storage-ready shape of a draft, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecordInput {
    pub account_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub sensitive_id_number: Option<SensitiveId>,
    pub student_id_photo_path: Option<String>,
    pub drivers_license_photo_path: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub university: Option<String>,
    pub student_id: Option<String>,
    pub graduation_year: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income: Option<String>,
    pub agree_to_terms: bool,
    pub agree_to_privacy: bool,
    pub agree_to_credit: bool,
    pub current_step: i32,
    pub status: String,
}

impl ApplicationRecordInput {
    /// Maps a draft into its persisted shape with the given status and
    /// document locations.
    pub fn from_draft(
        draft: &ApplicationDraft,
        status: ApplicationStatus,
        documents: DocumentPaths,
    ) -> Self {
        Self {
            account_type: draft.account_type.map(|t| t.as_str().to_string()),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            date_of_birth: draft.date_of_birth.clone(),
            sensitive_id_number: draft.sensitive_id_number.clone(),
            student_id_photo_path: documents.student_id_photo,
            drivers_license_photo_path: documents.drivers_license_photo,
            address: draft.address.clone(),
            city: draft.city.clone(),
            state: draft.state.map(|s| s.code().to_string()),
            zip_code: draft.zip_code.clone(),
            university: draft.university.map(|u| u.as_str().to_string()),
            student_id: draft.student_id.clone(),
            graduation_year: draft.graduation_year.map(|y| y.year().to_string()),
            employment_status: draft.employment_status.map(|e| e.as_str().to_string()),
            annual_income: draft.annual_income.map(|i| i.as_str().to_string()),
            agree_to_terms: draft.agree_to_terms,
            agree_to_privacy: draft.agree_to_privacy,
            agree_to_credit: draft.agree_to_credit,
            current_step: i32::from(draft.current_step.number()),
            status: status.as_str().to_string(),
        }
    }
}

/// Domain model of a persisted application row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub account_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub sensitive_id_number: Option<SensitiveId>,
    pub student_id_photo_path: Option<String>,
    pub drivers_license_photo_path: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub university: Option<String>,
    pub student_id: Option<String>,
    pub graduation_year: Option<String>,
    pub employment_status: Option<String>,
    pub annual_income: Option<String>,
    pub agree_to_terms: bool,
    pub agree_to_privacy: bool,
    pub agree_to_credit: bool,
    pub current_step: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
