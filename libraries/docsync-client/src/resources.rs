//! Site, theme and component lookups.

use crate::client::{check_status, parse_json, Session};
use crate::error::{ClientError, Result};
use crate::types::ResourceResponse;
use docsync_core::{ItemId, ResourceKind};
use reqwest::Method;
use tracing::debug;

/// Path prefix of the sites management API.
const MANAGEMENT_API: [&str; 4] = ["sites", "management", "api", "v1"];

/// Resource client for a documents server.
pub struct ResourceClient<'a> {
    session: Session<'a>,
}

impl<'a> ResourceClient<'a> {
    pub(crate) fn new(session: Session<'a>) -> Self {
        Self { session }
    }

    /// Root folder id of the named resource, or `None` when it does not exist.
    pub async fn get_id(&self, kind: ResourceKind, name: &str) -> Result<Option<ItemId>> {
        let selector = format!("name:{}", name);
        let mut segments: Vec<&str> = MANAGEMENT_API.to_vec();
        segments.push(collection(kind));
        segments.push(&selector);
        let url = self.session.endpoint(&segments)?;

        debug!(kind = %kind, name = %name, "Looking up resource");

        let request = self
            .session
            .request(Method::GET, url)
            .query(&[("fields", "id,name")]);
        let response = self.session.send(request).await?;

        match check_status(response, kind.as_str(), name).await {
            Ok(response) => {
                let resource: ResourceResponse = parse_json(response, "resource").await?;
                debug!(kind = %kind, name = %name, id = %resource.id, "Resource found");
                Ok(Some(ItemId::new(resource.id)))
            }
            Err(ClientError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn collection(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Site => "sites",
        ResourceKind::Theme => "themes",
        ResourceKind::Component => "components",
    }
}
