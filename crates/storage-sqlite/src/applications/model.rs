//! Database models for applications.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use studentbank_core::applications::{ApplicationRecord, ApplicationRecordInput, SensitiveId};

/// Database model for application rows.
///
/// Holds the identification number in plaintext, so it is never serialized.
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::applications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ApplicationDB {
    pub id: String,
    pub account_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub sensitive_id_number: Option<String>,
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

/// Full overwrite of an application row.
///
/// `None` writes NULL so a cleared draft field clears its column.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::applications)]
#[diesel(treat_none_as_null = true)]
pub struct ApplicationChangesetDB {
    pub account_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub sensitive_id_number: Option<String>,
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
    pub updated_at: NaiveDateTime,
}

impl ApplicationDB {
    /// Builds a fresh row for `input` with both timestamps set to `now`.
    pub fn new_row(id: String, input: ApplicationRecordInput, now: NaiveDateTime) -> Self {
        Self {
            id,
            account_type: input.account_type,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            sensitive_id_number: input.sensitive_id_number.map(|s| s.expose().to_string()),
            student_id_photo_path: input.student_id_photo_path,
            drivers_license_photo_path: input.drivers_license_photo_path,
            address: input.address,
            city: input.city,
            state: input.state,
            zip_code: input.zip_code,
            university: input.university,
            student_id: input.student_id,
            graduation_year: input.graduation_year,
            employment_status: input.employment_status,
            annual_income: input.annual_income,
            agree_to_terms: input.agree_to_terms,
            agree_to_privacy: input.agree_to_privacy,
            agree_to_credit: input.agree_to_credit,
            current_step: input.current_step,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ApplicationChangesetDB {
    pub fn from_input(input: ApplicationRecordInput, now: NaiveDateTime) -> Self {
        Self {
            account_type: input.account_type,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            sensitive_id_number: input.sensitive_id_number.map(|s| s.expose().to_string()),
            student_id_photo_path: input.student_id_photo_path,
            drivers_license_photo_path: input.drivers_license_photo_path,
            address: input.address,
            city: input.city,
            state: input.state,
            zip_code: input.zip_code,
            university: input.university,
            student_id: input.student_id,
            graduation_year: input.graduation_year,
            employment_status: input.employment_status,
            annual_income: input.annual_income,
            agree_to_terms: input.agree_to_terms,
            agree_to_privacy: input.agree_to_privacy,
            agree_to_credit: input.agree_to_credit,
            current_step: input.current_step,
            status: input.status,
            updated_at: now,
        }
    }
}

// Conversion to domain models
impl From<ApplicationDB> for ApplicationRecord {
    fn from(db: ApplicationDB) -> Self {
        Self {
            id: db.id,
            account_type: db.account_type,
            first_name: db.first_name,
            last_name: db.last_name,
            email: db.email,
            phone: db.phone,
            date_of_birth: db.date_of_birth,
            sensitive_id_number: db.sensitive_id_number.map(SensitiveId::new),
            student_id_photo_path: db.student_id_photo_path,
            drivers_license_photo_path: db.drivers_license_photo_path,
            address: db.address,
            city: db.city,
            state: db.state,
            zip_code: db.zip_code,
            university: db.university,
            student_id: db.student_id,
            graduation_year: db.graduation_year,
            employment_status: db.employment_status,
            annual_income: db.annual_income,
            agree_to_terms: db.agree_to_terms,
            agree_to_privacy: db.agree_to_privacy,
            agree_to_credit: db.agree_to_credit,
            current_step: db.current_step,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
