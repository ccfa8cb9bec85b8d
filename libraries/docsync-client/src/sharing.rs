//! User lookup and folder sharing.

use crate::client::{check_status, parse_json, Session};
use crate::error::{ClientError, Result};
use crate::types::{MembersResponse, RevokeRequest, ShareRequest, ShareResponse, UsersResponse};
use docsync_core::{ItemId, Member, Role, User};
use reqwest::Method;
use tracing::{debug, info, warn};

/// Sharing client for a documents server.
pub struct ShareClient<'a> {
    session: Session<'a>,
}

impl<'a> ShareClient<'a> {
    pub(crate) fn new(session: Session<'a>) -> Self {
        Self { session }
    }

    /// Search users by name.
    pub async fn find_users(&self, name: &str) -> Result<Vec<User>> {
        let url = self.session.documents(&["users", "items"])?;
        debug!(name = %name, "Searching users");

        let request = self
            .session
            .request(Method::GET, url)
            .query(&[("info", name)]);
        let response = self.session.send(request).await?;
        let response = check_status(response, "user", name).await?;
        let users: UsersResponse = parse_json(response, "users").await?;

        Ok(users.items)
    }

    /// List the members of a folder.
    pub async fn list_members(&self, folder: &ItemId) -> Result<Vec<Member>> {
        let url = self.session.documents(&["shares", folder.as_str(), "items"])?;
        debug!(folder = %folder, "Listing folder members");

        let request = self.session.request(Method::GET, url);
        let response = self.session.send(request).await?;
        let response = check_status(response, "folder", folder.as_str()).await?;
        let members: MembersResponse = parse_json(response, "folder members").await?;

        Ok(members
            .items
            .into_iter()
            .map(|entry| Member {
                role: entry.role.as_deref().and_then(|r| r.parse().ok()),
                user: entry.user,
            })
            .collect())
    }

    /// Share a folder with a user, or change the role of an existing member.
    pub async fn grant(
        &self,
        folder: &ItemId,
        user: &User,
        role: Role,
        new_member: bool,
    ) -> Result<()> {
        let (method, url) = if new_member {
            (Method::POST, self.session.documents(&["shares", folder.as_str()])?)
        } else {
            (
                Method::PUT,
                self.session.documents(&["shares", folder.as_str(), "role"])?,
            )
        };
        let body = ShareRequest {
            user_id: &user.id,
            role: role.as_str(),
        };

        let request = self.session.request(method, url).json(&body);
        let response = self.session.send(request).await?;
        let response = check_status(response, "folder", folder.as_str()).await?;
        share_outcome(response).await?;

        info!(folder = %folder, user = %user.login_name, role = %role, new_member, "Access granted");
        Ok(())
    }

    /// Remove a user's access to a folder.
    pub async fn revoke(&self, folder: &ItemId, user: &User) -> Result<()> {
        let url = self.session.documents(&["shares", folder.as_str(), "user"])?;
        let body = RevokeRequest { user_id: &user.id };

        let request = self.session.request(Method::DELETE, url).json(&body);
        let response = self.session.send(request).await?;
        let response = check_status(response, "folder", folder.as_str()).await?;
        share_outcome(response).await?;

        info!(folder = %folder, user = %user.login_name, "Access revoked");
        Ok(())
    }
}

/// Share endpoints report failures inside a 200 body.
async fn share_outcome(response: reqwest::Response) -> Result<()> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(());
    }

    let outcome: ShareResponse =
        serde_json::from_str(&text).map_err(|e| ClientError::ParseError(e.to_string()))?;
    if outcome.is_success() {
        Ok(())
    } else {
        let message = outcome.title.unwrap_or_else(|| "share request rejected".to_string());
        warn!(error = %message, "Share request failed");
        Err(ClientError::ServerError { status, message })
    }
}
