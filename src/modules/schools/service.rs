use openschool_core::AppError;
use openschool_db::Store;
use openschool_models::{School, SchoolPayload};
use tracing::{debug, info, instrument, warn};

use crate::metrics;

pub struct SchoolService;

impl SchoolService {
    #[instrument(skip(store), fields(db.operation = "SELECT", db.table = "schools"))]
    pub async fn list_schools(store: &dyn Store) -> Result<Vec<School>, AppError> {
        let schools = store.list_schools().await?;
        debug!(count = schools.len(), "Fetched schools");
        Ok(schools)
    }

    #[instrument(skip(store, payload), fields(school.name = %payload.name, db.operation = "INSERT", db.table = "schools"))]
    pub async fn create_school(
        store: &dyn Store,
        payload: &SchoolPayload,
    ) -> Result<School, AppError> {
        debug!(school.address = %payload.address, "Creating new school");

        let school = store.create_school(payload).await.inspect_err(|e| {
            if e.status.is_client_error() {
                warn!(error = %e, "School creation rejected");
            }
        })?;

        metrics::track_school_created();
        info!(school.id = %school.id, school.name = %school.name, "School created successfully");

        Ok(school)
    }

    #[instrument(skip(store, payload), fields(school.id = %id, db.operation = "UPDATE", db.table = "schools"))]
    pub async fn update_school(
        store: &dyn Store,
        id: i32,
        payload: &SchoolPayload,
    ) -> Result<School, AppError> {
        let school = store.update_school(id, payload).await.inspect_err(|e| {
            if e.status.is_client_error() {
                warn!(error = %e, "School update rejected");
            }
        })?;

        metrics::track_school_updated();
        info!(school.name = %school.name, "School updated successfully");

        Ok(school)
    }

    #[instrument(skip(store), fields(school.id = %id, db.operation = "DELETE", db.table = "schools"))]
    pub async fn delete_school(store: &dyn Store, id: i32) -> Result<(), AppError> {
        store.delete_school(id).await.inspect_err(|e| {
            if e.status.is_client_error() {
                warn!(error = %e, "School deletion rejected");
            }
        })?;

        metrics::track_school_deleted();
        info!("School deleted successfully");

        Ok(())
    }
}
