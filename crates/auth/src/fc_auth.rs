//! Friend Connect authentication cookie passed as `fcauth`.

use async_trait::async_trait;
use opensocial::{AuthError, AuthScheme, HttpMessage, Provider};

use crate::params::append_query;

pub const FC_AUTH_PARAM: &str = "fcauth";

/// Appends `fcauth=<token>` to every request URL.
#[derive(Clone, PartialEq, Eq)]
pub struct FcAuth {
    token: String,
}

impl FcAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for FcAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FcAuth")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AuthScheme for FcAuth {
    fn name(&self) -> &'static str {
        "fc-auth"
    }

    async fn sign(
        &self,
        _provider: &Provider,
        mut message: HttpMessage,
    ) -> Result<HttpMessage, AuthError> {
        append_query(&mut message.url, &[(FC_AUTH_PARAM, self.token.as_str())]);
        Ok(message)
    }
}
