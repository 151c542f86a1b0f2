//! In-memory collaborators shared by the gateway and wizard tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::{
    ApplicationRecord, ApplicationRecordInput, ApplicationRepositoryTrait, DocumentFile,
    DocumentStoreTrait,
};
use crate::errors::{DatabaseError, Error, Result};

#[derive(Default)]
pub struct MockApplicationRepository {
    records: RwLock<HashMap<String, ApplicationRecord>>,
    inserts: AtomicUsize,
    updates: AtomicUsize,
    fail_writes: AtomicBool,
    stall_next_insert: AtomicBool,
}

impl MockApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes the next insert never complete.
    pub fn stall_next_insert(&self) {
        self.stall_next_insert.store(true, Ordering::SeqCst);
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.insert_count() + self.update_count()
    }

    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    fn to_record(id: String, input: ApplicationRecordInput) -> ApplicationRecord {
        let now = Utc::now().naive_utc();
        ApplicationRecord {
            id,
            account_type: input.account_type,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            date_of_birth: input.date_of_birth,
            sensitive_id_number: input.sensitive_id_number,
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

    fn check_failure(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepositoryTrait for MockApplicationRepository {
    async fn insert(&self, input: ApplicationRecordInput) -> Result<ApplicationRecord> {
        self.check_failure()?;
        if self.stall_next_insert.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        let record = Self::to_record(format!("app-{}", n), input);
        self.records
            .write()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        application_id: &str,
        input: ApplicationRecordInput,
    ) -> Result<ApplicationRecord> {
        self.check_failure()?;
        let mut records = self.records.write().unwrap();
        let created_at = records
            .get(application_id)
            .map(|existing| existing.created_at)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(application_id.to_string())))?;
        let mut record = Self::to_record(application_id.to_string(), input);
        record.created_at = created_at;
        records.insert(record.id.clone(), record.clone());
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    fn get_by_id(&self, application_id: &str) -> Result<ApplicationRecord> {
        self.records
            .read()
            .unwrap()
            .get(application_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(application_id.to_string())))
    }
}

#[derive(Default)]
pub struct MockDocumentStore {
    uploads: Mutex<Vec<String>>,
    failing_folder: Mutex<Option<String>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upload into `folder` fail.
    pub fn fail_folder(&self, folder: &str) {
        *self.failing_folder.lock().unwrap() = Some(folder.to_string());
    }

    pub fn clear_failure(&self) {
        *self.failing_folder.lock().unwrap() = None;
    }

    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStoreTrait for MockDocumentStore {
    fn bucket(&self) -> &str {
        "test-bucket"
    }

    async fn upload(&self, path: &str, _file: &DocumentFile) -> Result<String> {
        if let Some(folder) = self.failing_folder.lock().unwrap().as_deref() {
            if path.starts_with(folder) {
                return Err(Error::DocumentStore("bucket unavailable".to_string()));
            }
        }
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(path.to_string())
    }
}

pub fn jpeg(size: usize) -> DocumentFile {
    DocumentFile::new("photo.jpg", "image/jpeg", vec![0xFF; size])
}

pub fn png(size: usize) -> DocumentFile {
    DocumentFile::new("scan.png", "image/png", vec![0x89; size])
}
