//! Form-fill API endpoints

use jobscout_core::dto::form::FillForm;
use jobscout_core::dto::task::TaskHandle;

use crate::error::Result;
use crate::{ApiClient, Method, to_body};

impl ApiClient {
    /// Submit a form-fill request
    ///
    /// The fill runs in the background; poll the returned task for the
    /// filled fields and screenshot.
    pub async fn fill_form(&self, req: &FillForm) -> Result<TaskHandle> {
        let body = to_body(req)?;
        self.request(Method::POST, &self.endpoints.fill_form, Some(&body))
            .await
    }
}
