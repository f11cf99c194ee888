//! Repository for the `campaigns` table and its join tables.

use postforge_core::types::DbId;
use sqlx::PgPool;

use crate::error::StorageError;
use crate::models::campaign::{
    CampaignAggregate, CampaignCountsRow, CampaignFilter, CampaignRecord, CampaignRow,
    CampaignSummary, CreateCampaign, HydratedCampaign,
};
use crate::repositories::{CharacterRepo, MergeFieldRepo, PersonaRepo};

/// Column list shared across queries.
const COLUMNS: &str = "id, creator_id, title, objective, narrative_context, days_of_week, \
     frequency, post_type, post_length, video_length, start_date, end_date, \
     is_active, is_archived, created_at, updated_at";

/// Live relation counts. Links to soft-deleted personas or characters are
/// not counted. Expects the campaign table aliased as `c`.
const COUNT_COLUMNS: &str = "\
    (SELECT COUNT(*) FROM campaign_personas cp
       JOIN personas p ON p.key = cp.persona_key
      WHERE cp.campaign_id = c.id AND p.deleted_at IS NULL) AS persona_count,
    (SELECT COUNT(*) FROM campaign_characters cc
       JOIN characters ch ON ch.id = cc.character_id
      WHERE cc.campaign_id = c.id AND ch.deleted_at IS NULL) AS character_count";

/// Lifecycle flags that can be toggled by [`CampaignRepo::set_flag`].
#[derive(Debug, Clone, Copy)]
enum Flag {
    Archived,
    Active,
}

impl Flag {
    fn column(self) -> &'static str {
        match self {
            Self::Archived => "is_archived",
            Self::Active => "is_active",
        }
    }
}

/// Persistence for campaigns, their persona/character links and merge
/// fields.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a campaign with all of its relations in one transaction.
    ///
    /// Every persona key and character id must reference a live row; any that
    /// do not abort the whole insert with [`StorageError::MissingReference`]
    /// listing the offending keys. Nothing is written on failure.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCampaign,
    ) -> Result<HydratedCampaign, StorageError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO campaigns
                (creator_id, title, objective, narrative_context, days_of_week, frequency,
                 post_type, post_length, video_length, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CampaignRow>(&query)
            .bind(&input.creator_id)
            .bind(&input.title)
            .bind(&input.objective)
            .bind(&input.narrative_context)
            .bind(input.day_tags())
            .bind(input.cadence.frequency.as_storage_str())
            .bind(input.post_type.as_str())
            .bind(input.post_length.as_str())
            .bind(input.video_length.map(|v| v.seconds()))
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&mut *tx)
            .await?;
        let campaign = CampaignRecord::try_from(row)?;

        let persona_keys =
            Self::link_personas_inner(&mut tx, campaign.id, &input.persona_keys).await?;
        let character_ids =
            Self::link_characters_inner(&mut tx, campaign.id, &input.character_ids).await?;
        let merge_fields =
            MergeFieldRepo::insert_many_inner(&mut tx, campaign.id, &input.merge_fields).await?;

        tx.commit().await?;

        tracing::debug!(
            campaign_id = campaign.id,
            personas = persona_keys.len(),
            characters = character_ids.len(),
            merge_fields = merge_fields.len(),
            "Campaign inserted",
        );

        Ok(HydratedCampaign {
            campaign,
            persona_keys,
            character_ids,
            merge_fields,
        })
    }

    /// List live campaigns with live relation counts, most recently updated
    /// first. Status is date-dependent and left to the caller.
    pub async fn find_many(
        pool: &PgPool,
        filter: &CampaignFilter,
    ) -> Result<Vec<CampaignSummary>, StorageError> {
        let query = format!(
            "SELECT {}, {COUNT_COLUMNS}
             FROM campaigns c
             WHERE c.deleted_at IS NULL
               AND ($1 OR NOT c.is_archived)
               AND ($2::BOOLEAN IS NULL OR c.is_active = $2)
               AND ($3::TEXT IS NULL
                    OR position(lower($3) IN lower(c.title)) > 0
                    OR position(lower($3) IN lower(c.objective)) > 0)
             ORDER BY c.updated_at DESC, c.id DESC",
            qualified_columns("c")
        );
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let rows = sqlx::query_as::<_, CampaignCountsRow>(&query)
            .bind(filter.include_archived)
            .bind(filter.is_active)
            .bind(search)
            .fetch_all(pool)
            .await?;

        rows.into_iter().map(CampaignSummary::try_from).collect()
    }

    /// Find a live campaign by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CampaignRecord>, StorageError> {
        let query =
            format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1 AND deleted_at IS NULL");
        let row = sqlx::query_as::<_, CampaignRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(CampaignRecord::try_from).transpose()
    }

    /// A live campaign with personas, characters (with default images) and
    /// merge fields. The three relation queries run concurrently.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CampaignAggregate>, StorageError> {
        let Some(record) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let (personas, characters, merge_fields) = tokio::try_join!(
            PersonaRepo::list_by_campaign(pool, id),
            CharacterRepo::list_by_campaign(pool, id),
            MergeFieldRepo::list_by_campaign(pool, id),
        )?;

        Ok(Some(CampaignAggregate {
            record,
            personas,
            characters,
            merge_fields,
        }))
    }

    /// Set `is_archived`. Returns `false` if no live campaign has this id.
    pub async fn set_archived(
        pool: &PgPool,
        id: DbId,
        archived: bool,
    ) -> Result<bool, StorageError> {
        Self::set_flag(pool, id, Flag::Archived, archived).await
    }

    /// Set `is_active`. Returns `false` if no live campaign has this id.
    pub async fn set_active(pool: &PgPool, id: DbId, active: bool) -> Result<bool, StorageError> {
        Self::set_flag(pool, id, Flag::Active, active).await
    }

    /// Soft-delete a campaign.
    ///
    /// Returns `true` whenever the campaign exists, including when it was
    /// already deleted; the original `deleted_at` is kept on repeats.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, StorageError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "WITH target AS (SELECT id FROM campaigns WHERE id = $1),
                  updated AS (
                      UPDATE campaigns SET deleted_at = NOW()
                      WHERE id = $1 AND deleted_at IS NULL
                      RETURNING id
                  )
             SELECT EXISTS (SELECT 1 FROM target)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Write a boolean flag only when it differs from the stored value, so a
    /// repeated call leaves `updated_at` untouched.
    async fn set_flag(
        pool: &PgPool,
        id: DbId,
        flag: Flag,
        value: bool,
    ) -> Result<bool, StorageError> {
        let column = flag.column();
        let query = format!(
            "WITH target AS (
                 SELECT id FROM campaigns WHERE id = $1 AND deleted_at IS NULL
             ),
             updated AS (
                 UPDATE campaigns SET {column} = $2
                 WHERE id IN (SELECT id FROM target) AND {column} <> $2
                 RETURNING id
             )
             SELECT EXISTS (SELECT 1 FROM target)"
        );
        let exists = sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .bind(value)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Link live personas to a campaign and report any keys that did not
    /// match one.
    async fn link_personas_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        campaign_id: DbId,
        keys: &[String],
    ) -> Result<Vec<String>, StorageError> {
        let linked: Vec<String> = sqlx::query_scalar(
            "INSERT INTO campaign_personas (campaign_id, persona_key)
             SELECT $1, p.key FROM personas p
             WHERE p.key = ANY($2) AND p.deleted_at IS NULL
             RETURNING persona_key",
        )
        .bind(campaign_id)
        .bind(keys)
        .fetch_all(&mut **tx)
        .await?;

        let missing: Vec<String> = keys
            .iter()
            .filter(|k| !linked.contains(*k))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(StorageError::MissingReference {
                entity: "persona",
                keys: missing,
            });
        }
        Ok(keys.to_vec())
    }

    /// Link live characters to a campaign and report any ids that did not
    /// match one.
    async fn link_characters_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        campaign_id: DbId,
        ids: &[String],
    ) -> Result<Vec<String>, StorageError> {
        let linked: Vec<String> = sqlx::query_scalar(
            "INSERT INTO campaign_characters (campaign_id, character_id)
             SELECT $1, ch.id FROM characters ch
             WHERE ch.id = ANY($2) AND ch.deleted_at IS NULL
             RETURNING character_id",
        )
        .bind(campaign_id)
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;

        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !linked.contains(*id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(StorageError::MissingReference {
                entity: "character",
                keys: missing,
            });
        }
        Ok(ids.to_vec())
    }
}

/// `COLUMNS` prefixed with a table alias.
fn qualified_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_columns_prefix_every_column() {
        let cols = qualified_columns("c");
        assert!(cols.starts_with("c.id, c.creator_id, "));
        assert!(cols.ends_with("c.created_at, c.updated_at"));
        assert_eq!(cols.matches("c.").count(), COLUMNS.split(',').count());
    }
}
