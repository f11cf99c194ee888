//! Repository for the `merge_fields` table.

use postforge_core::types::DbId;
use sqlx::PgPool;

use crate::error::StorageError;
use crate::models::merge_field::{CreateMergeField, MergeField, MergeFieldRow};

const COLUMNS: &str = "id, campaign_id, name, description, value_type, default_value, \
     start_time, end_time, sort_order, created_at, updated_at";

/// Merge fields are only written as part of campaign creation; see
/// [`CampaignRepo::create`](crate::repositories::CampaignRepo::create).
pub struct MergeFieldRepo;

impl MergeFieldRepo {
    /// All merge fields of a campaign in submission order.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<MergeField>, StorageError> {
        let query = format!(
            "SELECT {COLUMNS} FROM merge_fields
             WHERE campaign_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, MergeFieldRow>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(MergeField::try_from).collect()
    }

    /// Insert merge fields for a campaign inside an open transaction.
    pub(crate) async fn insert_many_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        campaign_id: DbId,
        fields: &[CreateMergeField],
    ) -> Result<Vec<MergeField>, StorageError> {
        let query = format!(
            "INSERT INTO merge_fields
                (campaign_id, name, description, value_type, default_value,
                 start_time, end_time, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(fields.len());
        for field in fields {
            let row = sqlx::query_as::<_, MergeFieldRow>(&query)
                .bind(campaign_id)
                .bind(&field.name)
                .bind(&field.description)
                .bind(field.value_type.as_str())
                .bind(&field.default_value)
                .bind(field.start_time)
                .bind(field.end_time)
                .bind(field.sort_order)
                .fetch_one(&mut **tx)
                .await?;
            inserted.push(MergeField::try_from(row)?);
        }
        Ok(inserted)
    }
}
