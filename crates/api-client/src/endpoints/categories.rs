//! Category endpoints

use crate::client::BulletinClient;
use crate::error::ApiResult;
use bulletin_core::model::{Category, CategoryInput};

/// Categories API interface
#[derive(Clone)]
pub struct CategoriesApi {
    client: BulletinClient,
}

impl CategoriesApi {
    pub(crate) fn new(client: BulletinClient) -> Self {
        Self { client }
    }

    /// All categories, id ascending
    ///
    /// GET /api/categories
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        self.client.get("api/categories").await
    }

    /// GET /api/categories/{id}
    pub async fn get(&self, id: i64) -> ApiResult<Category> {
        self.client.get(&format!("api/categories/{id}")).await
    }

    /// Create a category (admin)
    ///
    /// POST /api/categories
    pub async fn create(&self, category: &Category) -> ApiResult<Category> {
        self.client
            .post("api/categories", &CategoryInput::from(category))
            .await
    }

    /// Rename a category (admin)
    ///
    /// PUT /api/categories/{id}
    pub async fn update(&self, id: i64, name: &str) -> ApiResult<Category> {
        let input = CategoryInput {
            id: None,
            name: name.to_string(),
        };
        self.client.put(&format!("api/categories/{id}"), &input).await
    }

    /// Delete a category (admin); fails with 409 while announcements use it
    ///
    /// DELETE /api/categories/{id}
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("api/categories/{id}")).await
    }

    /// Category names sorted for a picker
    pub async fn names(&self) -> ApiResult<Vec<String>> {
        let mut names: Vec<String> = self.list().await?.into_iter().map(|c| c.name).collect();
        names.sort_by(|a, b| bulletin_search::compare_labels(a, b));
        Ok(names)
    }
}
