use async_trait::async_trait;
use metrics::counter;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    entities::{
        mrp_production_tag::{self, Entity as ProductionTagEntity},
        mrp_tag::{self, Entity as TagEntity},
    },
    errors::ServiceError,
    hierarchy::{ensure_acyclic, ParentResolver, TreeSnapshot, DISPLAY_NAME_SEPARATOR},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTag {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub parent_id: Option<i32>,
    pub color: Option<i32>,
}

/// Partial update. `parent_id: null` detaches the tag; an absent field
/// leaves the parent unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTag {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub parent_id: Option<Option<i32>>,
    pub color: Option<i32>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagView {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub display_name: String,
    pub color: i32,
}

/// Operators accepted when searching on the computed display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchOperator {
    #[serde(alias = "=")]
    Eq,
    #[serde(alias = "!=")]
    NotEq,
    Like,
    Ilike,
}

impl SearchOperator {
    fn matches(self, display_name: &str, value: &str) -> bool {
        match self {
            SearchOperator::Eq => display_name == value,
            SearchOperator::NotEq => display_name != value,
            SearchOperator::Like => display_name.contains(value),
            SearchOperator::Ilike => display_name
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// Parent lookups straight from the `mrp_tags` table
pub struct DbParentResolver<'a, C> {
    conn: &'a C,
}

impl<'a, C> DbParentResolver<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'a, C> ParentResolver for DbParentResolver<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn parent_of(&self, id: i32) -> Result<Option<i32>, ServiceError> {
        let parent = TagEntity::find_by_id(id)
            .select_only()
            .column(mrp_tag::Column::ParentId)
            .into_tuple::<Option<i32>>()
            .one(self.conn)
            .await?;
        Ok(parent.flatten())
    }
}

/// Manufacturing tag tree
#[derive(Clone)]
pub struct TagService {
    db: Arc<DatabaseConnection>,
}

impl TagService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_tag(&self, input: CreateTag) -> Result<TagView, ServiceError> {
        input.validate()?;
        let name = validated_name(&input.name)?;
        let txn = self.db.begin().await?;

        if let Some(parent_id) = input.parent_id {
            find_tag(&txn, parent_id).await?;
        }

        let mut tag = mrp_tag::ActiveModel {
            name: Set(name),
            parent_id: Set(input.parent_id),
            ..Default::default()
        };
        if let Some(color) = input.color {
            tag.color = Set(color);
        }
        let created = tag.insert(&txn).await?;

        let snapshot = load_snapshot(&txn).await?;
        txn.commit().await?;

        counter!("mrp_addons.tags.created", 1);
        info!(tag_id = created.id, parent_id = ?created.parent_id, "Tag created");
        Ok(to_view(&snapshot, created))
    }

    /// Applies a partial update. A new parent is checked for cycles before
    /// anything is written; a rejected update leaves the tag untouched.
    #[instrument(skip(self, input))]
    pub async fn update_tag(&self, id: i32, input: UpdateTag) -> Result<TagView, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;
        let tag = find_tag(&txn, id).await?;

        if let Some(parent_id) = input.parent_id {
            if let Some(parent_id) = parent_id {
                find_tag(&txn, parent_id).await?;
            }
            if let Err(err) = ensure_acyclic(&DbParentResolver::new(&txn), id, parent_id).await {
                warn!(tag_id = id, ?parent_id, "Rejected recursive tag hierarchy");
                return Err(err);
            }
        }

        let mut active: mrp_tag::ActiveModel = tag.into();
        if let Some(name) = input.name.as_deref() {
            active.name = Set(validated_name(name)?);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        let updated = active.update(&txn).await?;

        let snapshot = load_snapshot(&txn).await?;
        txn.commit().await?;

        info!(tag_id = id, "Tag updated");
        Ok(to_view(&snapshot, updated))
    }

    /// Deletes a tag. Children are detached and keep existing as roots.
    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        find_tag(&txn, id).await?;

        let detached = TagEntity::update_many()
            .col_expr(mrp_tag::Column::ParentId, Expr::value(Option::<i32>::None))
            .filter(mrp_tag::Column::ParentId.eq(id))
            .exec(&txn)
            .await?;

        ProductionTagEntity::delete_many()
            .filter(mrp_production_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await?;

        TagEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        counter!("mrp_addons.tags.deleted", 1);
        info!(
            tag_id = id,
            detached_children = detached.rows_affected,
            "Tag deleted"
        );
        Ok(())
    }

    pub async fn get_tag(&self, id: i32) -> Result<TagView, ServiceError> {
        let db = &*self.db;
        let tag = find_tag(db, id).await?;
        let snapshot = load_snapshot(db).await?;
        Ok(to_view(&snapshot, tag))
    }

    pub async fn list_tags(&self) -> Result<Vec<TagView>, ServiceError> {
        let db = &*self.db;
        let tags = TagEntity::find()
            .order_by_asc(mrp_tag::Column::Id)
            .all(db)
            .await?;
        let snapshot = TreeSnapshot::from_nodes(
            tags.iter()
                .map(|tag| (tag.id, tag.name.clone(), tag.parent_id)),
        );
        Ok(tags
            .into_iter()
            .map(|tag| to_view(&snapshot, tag))
            .collect())
    }

    pub async fn display_name(&self, id: i32) -> Result<String, ServiceError> {
        let snapshot = load_snapshot(&*self.db).await?;
        snapshot
            .display_name(id)
            .ok_or_else(|| ServiceError::not_found("Tag", id))
    }

    /// Searches on the computed display name, ordered by id.
    ///
    /// Equality only needs the rows whose own name is a tail of the value
    /// starting on a separator, so those are selected in SQL first.
    #[instrument(skip(self))]
    pub async fn search_tags(
        &self,
        operator: SearchOperator,
        value: &str,
    ) -> Result<Vec<TagView>, ServiceError> {
        let db = &*self.db;
        let mut query = TagEntity::find().order_by_asc(mrp_tag::Column::Id);
        if operator == SearchOperator::Eq {
            query = query.filter(mrp_tag::Column::Name.is_in(name_suffixes(value)));
        }

        let candidates = query.all(db).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = load_snapshot(db).await?;
        Ok(candidates
            .into_iter()
            .map(|tag| to_view(&snapshot, tag))
            .filter(|view| operator.matches(&view.display_name, value))
            .collect())
    }

    pub async fn child_tags(&self, id: i32) -> Result<Vec<TagView>, ServiceError> {
        let db = &*self.db;
        find_tag(db, id).await?;
        let children = TagEntity::find()
            .filter(mrp_tag::Column::ParentId.eq(id))
            .order_by_asc(mrp_tag::Column::Id)
            .all(db)
            .await?;
        let snapshot = load_snapshot(db).await?;
        Ok(children
            .into_iter()
            .map(|tag| to_view(&snapshot, tag))
            .collect())
    }
}

fn validated_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Tag name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

pub(crate) async fn find_tag<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<mrp_tag::Model, ServiceError> {
    TagEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tag", id))
}

/// Loads every tag's `(id, name, parent_id)` in one query
pub(crate) async fn load_snapshot<C: ConnectionTrait>(
    conn: &C,
) -> Result<TreeSnapshot, ServiceError> {
    let rows = TagEntity::find()
        .select_only()
        .columns([
            mrp_tag::Column::Id,
            mrp_tag::Column::Name,
            mrp_tag::Column::ParentId,
        ])
        .into_tuple::<(i32, String, Option<i32>)>()
        .all(conn)
        .await?;
    Ok(TreeSnapshot::from_nodes(rows))
}

pub(crate) fn to_view(snapshot: &TreeSnapshot, tag: mrp_tag::Model) -> TagView {
    let display_name = snapshot
        .display_name(tag.id)
        .unwrap_or_else(|| tag.name.clone());
    TagView {
        id: tag.id,
        name: tag.name,
        parent_id: tag.parent_id,
        display_name,
        color: tag.color,
    }
}

/// Every tail of `value` that could be a tag's own name when `value` is a
/// display name. Names may themselves contain the separator.
fn name_suffixes(value: &str) -> Vec<&str> {
    let mut suffixes = vec![value];
    suffixes.extend(
        value
            .match_indices(DISPLAY_NAME_SEPARATOR)
            .map(|(pos, sep)| &value[pos + sep.len()..]),
    );
    suffixes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_suffixes_start_on_separator_boundaries() {
        assert_eq!(name_suffixes("A / B / C"), vec!["A / B / C", "B / C", "C"]);
        assert_eq!(name_suffixes("Kit / "), vec!["Kit / ", ""]);
        assert_eq!(name_suffixes("Plain"), vec!["Plain"]);
    }

    #[test]
    fn ilike_ignores_case_but_like_does_not() {
        assert!(SearchOperator::Ilike.matches("Line A / Station C", "station c"));
        assert!(!SearchOperator::Like.matches("Line A / Station C", "station c"));
        assert!(SearchOperator::Like.matches("Line A / Station C", "Station"));
    }

    #[test]
    fn eq_and_not_eq_compare_the_full_path() {
        assert!(SearchOperator::Eq.matches("A / B", "A / B"));
        assert!(!SearchOperator::Eq.matches("A / B", "B"));
        assert!(SearchOperator::NotEq.matches("A / B", "B"));
    }

    #[test]
    fn operators_accept_symbolic_aliases() {
        let op: SearchOperator = serde_json::from_str("\"=\"").unwrap();
        assert_eq!(op, SearchOperator::Eq);
        let op: SearchOperator = serde_json::from_str("\"ilike\"").unwrap();
        assert_eq!(op, SearchOperator::Ilike);
    }

    #[test]
    fn update_distinguishes_null_parent_from_missing_parent() {
        let detach: UpdateTag = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(detach.parent_id, Some(None));

        let untouched: UpdateTag = serde_json::from_str(r#"{"name": "B"}"#).unwrap();
        assert_eq!(untouched.parent_id, None);
    }
}
