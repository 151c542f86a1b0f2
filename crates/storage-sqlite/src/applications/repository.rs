use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use studentbank_core::applications::{
    ApplicationRecord, ApplicationRecordInput, ApplicationRepositoryTrait,
};
use studentbank_core::errors::{DatabaseError, Error, Result};

use super::model::{ApplicationChangesetDB, ApplicationDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::applications;

/// Repository for application rows.
///
/// Reads go through the pool; writes are serialized through the writer actor.
pub struct ApplicationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ApplicationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ApplicationRepositoryTrait for ApplicationRepository {
    async fn insert(&self, input: ApplicationRecordInput) -> Result<ApplicationRecord> {
        let row = ApplicationDB::new_row(
            Uuid::new_v4().to_string(),
            input,
            Utc::now().naive_utc(),
        );

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ApplicationRecord> {
                let inserted = diesel::insert_into(applications::table)
                    .values(&row)
                    .returning(ApplicationDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                debug!("Inserted application {}", inserted.id);
                Ok(inserted.into())
            })
            .await
    }

    async fn update(
        &self,
        application_id: &str,
        input: ApplicationRecordInput,
    ) -> Result<ApplicationRecord> {
        let id_owned = application_id.to_string();
        let changes = ApplicationChangesetDB::from_input(input, Utc::now().naive_utc());

        let updated = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<ApplicationDB>> {
                diesel::update(applications::table.find(id_owned))
                    .set(&changes)
                    .returning(ApplicationDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .into_core()
            })
            .await?;

        updated.map(ApplicationRecord::from).ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!(
                "Application {} not found",
                application_id
            )))
        })
    }

    fn get_by_id(&self, application_id: &str) -> Result<ApplicationRecord> {
        let mut conn = get_connection(&self.pool)?;

        let row = applications::table
            .select(ApplicationDB::as_select())
            .find(application_id)
            .first::<ApplicationDB>(&mut conn)
            .into_core()?;

        Ok(row.into())
    }
}
