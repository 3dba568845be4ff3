use sea_orm::DatabaseConnection;

use crate::{
    model::standard_model::{CreateStandardModelDto, StandardModelDto, UpdateStandardModelDto},
    server::{
        data::standard_model::StandardModelRepository,
        error::{admin::AdminError, price::PriceError, Error},
    },
};

pub struct StandardModelService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StandardModelService<'a> {
    /// Creates a new instance of [`StandardModelService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<StandardModelDto>, Error> {
        Ok(StandardModelRepository::new(self.db)
            .list()
            .await?
            .into_iter()
            .map(StandardModelDto::from)
            .collect())
    }

    pub async fn create(&self, model: CreateStandardModelDto) -> Result<StandardModelDto, Error> {
        if model.name.trim().is_empty() {
            return Err(PriceError::InvalidField("name".to_string()).into());
        }

        let model = CreateStandardModelDto {
            name: model.name.trim().to_string(),
            official_currency: model
                .official_currency
                .map(|code| code.trim().to_uppercase()),
            ..model
        };

        let created = StandardModelRepository::new(self.db).create(model).await?;

        tracing::info!("Created standard model {} ({})", created.name, created.id);

        Ok(created.into())
    }

    pub async fn update(
        &self,
        model_id: i32,
        changes: UpdateStandardModelDto,
    ) -> Result<StandardModelDto, Error> {
        let changes = UpdateStandardModelDto {
            official_currency: changes
                .official_currency
                .map(|code| code.trim().to_uppercase()),
            ..changes
        };

        match StandardModelRepository::new(self.db)
            .update(model_id, changes)
            .await?
        {
            Some(model) => Ok(model.into()),
            None => Err(AdminError::ModelNotFound.into()),
        }
    }
}
