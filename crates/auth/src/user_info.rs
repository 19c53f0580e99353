//! Request-scoped identity descriptor.

use serde::Serialize;

use accounthub_core::{TenantId, UserId, UserRole};

use crate::claims::JwtClaims;
use crate::locale::{DEFAULT_LOCALE, resolve_locale};

/// Details about the caller of the current request.
///
/// Built once per request from the verified token (if any). Anonymous callers
/// get `is_authenticated = false`, no profile fields and a locale negotiated
/// from their browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub is_authenticated: bool,
    pub locale: String,
    pub user_id: Option<UserId>,
    pub tenant_id: Option<TenantId>,
    pub user_role: Option<UserRole>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserInfo {
    /// The identity used for background work that no user initiated.
    pub fn system() -> Self {
        Self::anonymous(DEFAULT_LOCALE.to_string())
    }

    /// Resolve the descriptor for a request.
    ///
    /// `claims` are the already-verified token claims; `browser_locale` is only
    /// consulted for anonymous callers.
    pub fn from_claims(claims: Option<&JwtClaims>, browser_locale: Option<&str>) -> Self {
        let Some(claims) = claims else {
            return Self::anonymous(resolve_locale(browser_locale));
        };

        Self {
            is_authenticated: true,
            locale: resolve_locale(claims.locale.as_deref()),
            user_id: Some(claims.sub),
            tenant_id: Some(claims.tenant_id.clone()),
            user_role: Some(claims.role),
            email: Some(claims.email.clone()),
            first_name: claims.given_name.clone(),
            last_name: claims.family_name.clone(),
            title: claims.title.clone(),
            avatar_url: claims.avatar_url.clone(),
        }
    }

    fn anonymous(locale: String) -> Self {
        Self {
            is_authenticated: false,
            locale,
            user_id: None,
            tenant_id: None,
            user_role: None,
            email: None,
            first_name: None,
            last_name: None,
            title: None,
            avatar_url: None,
        }
    }
}
