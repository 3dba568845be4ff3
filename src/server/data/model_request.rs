use chrono::Utc;
use entity::sea_orm_active_enums::RequestStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

pub struct ModelRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ModelRequestRepository<'a, C> {
    /// Creates a new instance of [`ModelRequestRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        requested_name: String,
        vendor: Option<String>,
        requester_id: i32,
    ) -> Result<entity::standard_model_request::Model, DbErr> {
        entity::standard_model_request::ActiveModel {
            requested_name: ActiveValue::Set(requested_name),
            vendor: ActiveValue::Set(vendor),
            requester_id: ActiveValue::Set(requester_id),
            status: ActiveValue::Set(RequestStatus::Pending),
            admin_notes: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn get(
        &self,
        request_id: i32,
    ) -> Result<Option<entity::standard_model_request::Model>, DbErr> {
        entity::prelude::StandardModelRequest::find_by_id(request_id)
            .one(self.db)
            .await
    }

    pub async fn find_pending_by_name(
        &self,
        requested_name: &str,
    ) -> Result<Option<entity::standard_model_request::Model>, DbErr> {
        entity::prelude::StandardModelRequest::find()
            .filter(entity::standard_model_request::Column::RequestedName.eq(requested_name))
            .filter(entity::standard_model_request::Column::Status.eq(RequestStatus::Pending))
            .order_by_asc(entity::standard_model_request::Column::Id)
            .one(self.db)
            .await
    }

    pub async fn list_pending_with_requester(
        &self,
    ) -> Result<
        Vec<(
            entity::standard_model_request::Model,
            Option<entity::user::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::StandardModelRequest::find()
            .find_also_related(entity::prelude::User)
            .filter(entity::standard_model_request::Column::Status.eq(RequestStatus::Pending))
            .order_by_asc(entity::standard_model_request::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn update_status(
        &self,
        request_id: i32,
        status: RequestStatus,
    ) -> Result<entity::standard_model_request::Model, DbErr> {
        entity::standard_model_request::ActiveModel {
            id: ActiveValue::Unchanged(request_id),
            status: ActiveValue::Set(status),
            ..Default::default()
        }
        .update(self.db)
        .await
    }
}
