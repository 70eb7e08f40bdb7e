use serde::{Deserialize, Serialize};

/// The signed-in customer or staff member, as the backend describes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Actor {
    /// Name sent with orders: username, then first name, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [&self.username, &self.first_name, &self.email]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.trim().is_empty())
            .unwrap_or("Customer")
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor {
            id: 9,
            username: None,
            first_name: None,
            email: None,
            role: None,
        }
    }

    #[test]
    fn display_name_prefers_username() {
        let mut a = actor();
        a.username = Some("ada".to_string());
        a.first_name = Some("Ada".to_string());
        assert_eq!(a.display_name(), "ada");
    }

    #[test]
    fn display_name_skips_blank_fields() {
        let mut a = actor();
        a.username = Some(String::new());
        a.email = Some("ada@example.com".to_string());
        assert_eq!(a.display_name(), "ada@example.com");
    }

    #[test]
    fn display_name_falls_back_to_customer() {
        assert_eq!(actor().display_name(), "Customer");
    }

    #[test]
    fn admin_role_is_recognised() {
        let mut a = actor();
        assert!(!a.is_admin());
        a.role = Some("admin".to_string());
        assert!(a.is_admin());
    }
}
