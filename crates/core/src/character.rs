//! Character image resolution.
//!
//! A character owns zero or more image assets. List and detail views show a
//! single "default image" per character; [`default_image`] decides which.

use crate::types::{DbId, Timestamp};

/// The fields of an image asset that default-image selection looks at.
pub trait ImageAsset {
    fn asset_id(&self) -> DbId;
    fn is_primary(&self) -> bool;
    fn created_at(&self) -> Timestamp;
    fn is_deleted(&self) -> bool;
}

/// Pick the default image among a character's assets.
///
/// Soft-deleted assets are ignored. A primary asset wins; otherwise the
/// oldest asset by creation time. Ties (several primaries, or identical
/// timestamps) go to the smallest id so the result does not depend on the
/// order of `assets`.
pub fn default_image<A: ImageAsset>(assets: &[A]) -> Option<&A> {
    assets
        .iter()
        .filter(|a| !a.is_deleted())
        .min_by_key(|a| (!a.is_primary(), a.created_at(), a.asset_id()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    struct Asset {
        id: DbId,
        primary: bool,
        created: Timestamp,
        deleted: bool,
    }

    impl ImageAsset for Asset {
        fn asset_id(&self) -> DbId {
            self.id
        }
        fn is_primary(&self) -> bool {
            self.primary
        }
        fn created_at(&self) -> Timestamp {
            self.created
        }
        fn is_deleted(&self) -> bool {
            self.deleted
        }
    }

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn asset(id: DbId, primary: bool, created: i64) -> Asset {
        Asset {
            id,
            primary,
            created: at(created),
            deleted: false,
        }
    }

    #[test]
    fn primary_wins_regardless_of_creation_order() {
        let older_plain = [asset(1, false, 0), asset(2, true, 100)];
        assert_eq!(default_image(&older_plain).map(|a| a.id), Some(2));

        let newer_plain = [asset(1, false, 100), asset(2, true, 0)];
        assert_eq!(default_image(&newer_plain).map(|a| a.id), Some(2));
    }

    #[test]
    fn without_primary_the_oldest_live_asset_wins() {
        let assets = [asset(7, false, 50), asset(3, false, 10), asset(5, false, 30)];
        assert_eq!(default_image(&assets).map(|a| a.id), Some(3));
    }

    #[test]
    fn deleted_assets_are_ignored() {
        let mut deleted_primary = asset(1, true, 0);
        deleted_primary.deleted = true;
        let assets = [deleted_primary, asset(2, false, 20), asset(3, false, 10)];
        assert_eq!(default_image(&assets).map(|a| a.id), Some(3));
    }

    #[test]
    fn identical_timestamps_fall_back_to_smallest_id() {
        let forward = [asset(4, false, 0), asset(9, false, 0)];
        let backward = [asset(9, false, 0), asset(4, false, 0)];
        assert_eq!(default_image(&forward).map(|a| a.id), Some(4));
        assert_eq!(default_image(&backward).map(|a| a.id), Some(4));
    }

    #[test]
    fn no_live_assets_means_no_image() {
        let empty: [Asset; 0] = [];
        assert!(default_image(&empty).is_none());

        let mut gone = asset(1, true, 0);
        gone.deleted = true;
        assert!(default_image(&[gone]).is_none());
    }
}
