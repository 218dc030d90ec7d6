//! Kit-related API endpoints

use jobscout_core::domain::kit::ApplicationKit;
use jobscout_core::dto::kit::{GenerateKit, KitList, KitQuery};

use crate::error::Result;
use crate::{ApiClient, Method, to_body};

impl ApiClient {
    /// Generate an application kit
    ///
    /// Kit generation answers directly; there is no task to poll.
    pub async fn generate_kit(&self, req: &GenerateKit) -> Result<ApplicationKit> {
        let body = to_body(req)?;
        self.request(Method::POST, &self.endpoints.generate_kit, Some(&body))
            .await
    }

    /// List saved kits for a job, or fetch one kit by id
    pub async fn list_kits(&self, query: &KitQuery) -> Result<KitList> {
        self.send(
            Method::GET,
            &self.endpoints.list_kits,
            &query.to_query_pairs(),
            None,
        )
        .await
    }
}
