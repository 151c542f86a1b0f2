use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::error;
use std::any::Any;
use studentbank_core::errors::{DatabaseError, Error, Result};
use tokio::sync::{mpsc, oneshot};

// A job runs against the writer's connection and returns a core Result,
// which is what repository callers expect.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction; an `Err` rolls it back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_stopped())?;

        ret_rx
            .await
            .map_err(|_| writer_stopped())?
            .and_then(|boxed: Box<dyn Any + Send + 'static>| {
                boxed.downcast::<T>().map(|v| *v).map_err(|_| {
                    Error::Database(DatabaseError::Internal(
                        "Writer actor returned an unexpected result type".to_string(),
                    ))
                })
            })
    }
}

fn writer_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "Writer actor is not running".to_string(),
    ))
}

/// Spawns a background Tokio task that acts as the single writer to the database.
///
/// The actor owns one pooled connection for its lifetime and processes jobs
/// serially. It stops once every `WriteHandle` has been dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                while let Some((_, reply_tx)) = rx.recv().await {
                    let _ = reply_tx.send(Err(Error::Database(DatabaseError::ConnectionFailed(
                        e.to_string(),
                    ))));
                }
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // The requester may have gone away; nothing to report then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
