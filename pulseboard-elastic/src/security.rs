//! Role and customer-user provisioning over the security API.

use crate::{client::ElasticClient, error::Result};
use serde_json::{Value, json};
use tracing::info;

/// Handle for one security role.
#[derive(Debug, Clone)]
pub struct Role {
    client: ElasticClient,
    name: String,
}

impl Role {
    /// Create a role handle.
    pub fn new(client: &ElasticClient, name: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            name: name.into(),
        }
    }

    /// Fetch the role definition, unwrapping the `{name: ...}` envelope
    /// when present (error bodies come back unwrapped).
    pub async fn get(&self) -> Result<Value> {
        let result = self
            .client
            .get(&format!("/_security/role/{}", self.name))
            .await?;

        match result.get(&self.name) {
            Some(role) => Ok(role.clone()),
            None => Ok(result),
        }
    }

    /// Write the full role definition.
    pub async fn put(&self, role: &Value) -> Result<Value> {
        self.client
            .post(&format!("/_security/role/{}", self.name), role)
            .await
    }
}

/// What to provision for a new customer account.
#[derive(Debug, Clone)]
pub struct CustomerSpec {
    /// Customer identifier, also used in the role name.
    pub customer_id: String,
    /// Password for the new user.
    pub password: String,
    /// Index pattern the customer may read.
    pub index_pattern: String,
    /// Restrict reads to documents labelled with the customer id.
    pub id_filter: bool,
}

impl CustomerSpec {
    /// Spec with the default `cu-*` read pattern and id filtering on.
    pub fn new(customer_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            password: password.into(),
            index_pattern: "cu-*".to_string(),
            id_filter: true,
        }
    }

    /// Set the readable index pattern.
    pub fn with_index_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.index_pattern = pattern.into();
        self
    }

    /// Let the customer read every document under the pattern.
    pub fn without_id_filter(mut self) -> Self {
        self.id_filter = false;
        self
    }
}

/// Handle provisioning and inspecting one customer user.
#[derive(Debug, Clone)]
pub struct Customer {
    client: ElasticClient,
    username: String,
}

impl Customer {
    /// Create a customer handle. The client must carry admin credentials.
    pub fn new(client: &ElasticClient, username: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            username: username.into(),
        }
    }

    /// Create the customer's read-only role (with Kibana dashboard
    /// access) and the user bound to it. Returns both API responses.
    pub async fn create(&self, spec: &CustomerSpec) -> Result<Vec<Value>> {
        let role_id = format!("cu-{}", spec.customer_id);
        info!(username = %self.username, role = %role_id, "Provisioning customer");

        let mut role = json!({
            "indices": [{
                "names": [spec.index_pattern],
                "privileges": ["read"]
            }],
            "applications": [{
                "application": "kibana-.kibana",
                "privileges": ["feature_dashboard.read"],
                "resources": ["space:products"]
            }],
        });
        if spec.id_filter {
            role["indices"][0]["query"] = json!({
                "term": { "labels.customer_id": spec.customer_id }
            });
        }

        let mut out = Vec::new();
        out.push(
            self.client
                .post(&format!("/_security/role/{role_id}"), &role)
                .await?,
        );

        let user = json!({
            "password": spec.password,
            "roles": [role_id]
        });
        out.push(
            self.client
                .post(&format!("/_security/user/{}", self.username), &user)
                .await?,
        );

        Ok(out)
    }

    /// Fetch the user record.
    pub async fn user(&self) -> Result<Value> {
        self.client
            .get(&format!("/_security/user/{}", self.username))
            .await
    }

    /// Fetch one role by id.
    pub async fn role(&self, role_id: &str) -> Result<Value> {
        self.client.get(&format!("/_security/role/{role_id}")).await
    }

    /// Fetch every role assigned to the user.
    pub async fn roles(&self) -> Result<Vec<Value>> {
        let user = self.user().await?;
        let role_ids: Vec<String> = user[self.username.as_str()]["roles"]
            .as_array()
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(|role| role.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        let mut roles = Vec::with_capacity(role_ids.len());
        for role_id in &role_ids {
            roles.push(self.role(role_id).await?);
        }
        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_spec_defaults() {
        let spec = CustomerSpec::new("7", "pw");
        assert_eq!(spec.index_pattern, "cu-*");
        assert!(spec.id_filter);
    }

    #[test]
    fn test_customer_spec_builder() {
        let spec = CustomerSpec::new("7", "pw")
            .with_index_pattern("cu-7-*")
            .without_id_filter();

        assert_eq!(spec.index_pattern, "cu-7-*");
        assert!(!spec.id_filter);
    }
}
